//! Reservation model

use serde::{Deserialize, Serialize};

use super::enums::ReservationStatus;

/// Reservation as returned by `/reservations/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: i64,
    /// Weak reference to the reserved book.
    #[serde(default)]
    pub book: Option<i64>,
    /// Weak reference to the reserving user.
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub reservation_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Denormalized display fields, present on some backend serializers.
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Reservation {
    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}
