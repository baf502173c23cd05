//! Data models consumed from the REST backend
//!
//! These are read-only snapshots: entities are created and mutated
//! exclusively by the backend, and every field is deserialized defensively
//! so a partially-populated payload never fails to decode.

pub mod book;
pub mod borrow;
pub mod category;
pub mod enums;
pub mod fine;
pub mod reservation;
pub mod user;

pub use book::Book;
pub use borrow::BorrowRecord;
pub use category::{Category, CategoryRef};
pub use enums::{ReservationStatus, Role};
pub use fine::Fine;
pub use reservation::Reservation;
pub use user::User;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a normalized list of JSON values into typed models, skipping (and
/// logging) any element that does not decode. Used at the boundary between
/// the aggregator's raw lists and the statistics engine.
pub fn decode_list<T: DeserializeOwned>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter_map(|v| match serde_json::from_value::<T>(v.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping undecodable {}: {}", std::any::type_name::<T>(), e);
                None
            }
        })
        .collect()
}

/// Parse a date out of the formats the backend actually emits: RFC 3339
/// timestamps, bare `YYYY-MM-DD` dates, and space-separated datetimes.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    // Some serializers emit fractional seconds without a zone.
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Render a raw date string as "Mon DD, YYYY", or "-" when absent or
/// unparseable. Matches the on-screen table formatting.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_skips_bad_elements() {
        let values = vec![json!({"id": 1, "title": "Dune"}), json!("not a book")];
        let books: Vec<Book> = decode_list(&values);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-03-05").is_some());
        assert!(parse_date("2024-03-05T10:30:00Z").is_some());
        assert!(parse_date("2024-03-05 10:30:00").is_some());
        assert!(parse_date("2024-03-05T10:30:00.123456").is_some());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_format_date_fallback() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some("garbage")), "-");
        assert_eq!(format_date(Some("2024-03-05")), "Mar 05, 2024");
    }
}
