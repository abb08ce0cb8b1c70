//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// User database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub code: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub promotion: i32,
    pub sex: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub total_service_hours: i32,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-area accumulated service hours row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AreaHours {
    pub area_id: Uuid,
    pub area_name: String,
    pub hours: i32,
}

/// A user's role set, loaded from the user_roles table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleSet(pub Vec<String>);

impl RoleSet {
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(roles::ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_set() {
        let set = RoleSet(vec![
            roles::SCHOLARSHIP_HOLDER.to_string(),
            roles::AREA_RESPONSIBLE.to_string(),
        ]);
        assert!(set.contains(roles::AREA_RESPONSIBLE));
        assert!(!set.contains(roles::ADMIN));
        assert!(!set.is_admin());
    }
}
