//! Book model

use serde::{Deserialize, Serialize};

use super::category::CategoryRef;

/// Book as returned by `/books/`. Every field except the id is defaulted so
/// a sparse payload still decodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Weak reference: either a bare category id or an embedded object.
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub available_copies: i64,
    #[serde(default)]
    pub total_copies: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}
