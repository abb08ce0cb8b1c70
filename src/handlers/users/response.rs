//! User response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::models::{AreaHours, PromotionGroup, User};

/// Compact user representation embedded in other resources
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub code: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub promotion: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_group: Option<String>,
}

impl UserSummary {
    pub fn from_user(user: User) -> Self {
        Self::with_group(user, None)
    }

    pub fn with_group(user: User, group: Option<PromotionGroup>) -> Self {
        Self {
            id: user.id,
            code: user.code,
            name: user.name,
            lastname: user.lastname,
            email: user.email,
            promotion: user.promotion,
            promotion_group: group.map(|g| g.to_string()),
        }
    }
}

/// Full user representation
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub code: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub promotion: i32,
    pub sex: String,
    pub blocked: bool,
    pub roles: Vec<String>,
}

impl UserResponse {
    pub fn from_parts(user: User, roles: Vec<String>) -> Self {
        Self {
            id: user.id,
            code: user.code,
            name: user.name,
            lastname: user.lastname,
            email: user.email,
            promotion: user.promotion,
            sex: user.sex,
            blocked: user.blocked,
            roles,
        }
    }
}

/// Accumulated service hours, per area and in total
#[derive(Debug, Serialize)]
pub struct ServiceHoursResponse {
    pub areas: Vec<AreaHours>,
    pub total: i32,
}

/// Own-profile response including the service-hour ledger
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub service_hours: ServiceHoursResponse,
}

/// Paginated users listing
#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
