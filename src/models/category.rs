//! Category model and weak reference form

use serde::{Deserialize, Serialize};

/// Category as returned by `/categories/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A category reference on a book: the server sends either the bare id or
/// the embedded category object depending on the serializer in use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Embedded(Category),
}

impl CategoryRef {
    pub fn id(&self) -> i64 {
        match self {
            CategoryRef::Id(id) => *id,
            CategoryRef::Embedded(c) => c.id,
        }
    }
}
