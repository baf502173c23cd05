//! User model

use serde::{Deserialize, Serialize};

use super::enums::Role;

/// User account as returned by `/users/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user_type: Role,
    #[serde(default)]
    pub is_active: bool,
}

impl User {
    /// Display name: "First Last", falling back to the username when both
    /// name parts are empty.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            username: "jdoe".into(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "jdoe");
    }

    #[test]
    fn test_display_name_trims_partial_names() {
        let user = User {
            first_name: "Ada".into(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Ada");
    }
}
