//! Borrow record model

use serde::{Deserialize, Serialize};

/// Borrow record as returned by `/borrow-records/`.
///
/// `is_overdue` and `fine_amount` are computed by the server; this client
/// only renders them and never re-derives overdue status locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorrowRecord {
    #[serde(default)]
    pub id: i64,
    /// Weak reference to the borrowed book.
    #[serde(default)]
    pub book: Option<i64>,
    /// Weak reference to the borrowing user.
    #[serde(default)]
    pub borrower: Option<i64>,
    #[serde(default)]
    pub borrow_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_returned: bool,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default, deserialize_with = "super::fine::deserialize_optional_amount")]
    pub fine_amount: Option<rust_decimal::Decimal>,
    /// Denormalized display fields, present on some backend serializers.
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub borrower_name: Option<String>,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        !self.is_returned
    }
}
