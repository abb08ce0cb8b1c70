//! Area response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    handlers::users::response::UserSummary,
    models::{Area, PromotionGroup, User},
};

/// Area with its responsible users
#[derive(Debug, Serialize)]
pub struct AreaResponse {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub blocked: bool,
    pub responsible: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AreaResponse {
    /// Assemble from the row and its responsible users; `groups`, when
    /// present, carries one promotion-group slot per responsible user
    pub fn from_parts(
        area: Area,
        responsible: Vec<User>,
        groups: Option<Vec<Option<PromotionGroup>>>,
    ) -> Self {
        let responsible = match groups {
            Some(groups) => responsible
                .into_iter()
                .zip(groups)
                .map(|(user, group)| UserSummary::with_group(user, group))
                .collect(),
            None => responsible.into_iter().map(UserSummary::from_user).collect(),
        };

        Self {
            id: area.id,
            name: area.name,
            color: area.color,
            blocked: area.blocked,
            responsible,
            created_at: area.created_at,
            updated_at: area.updated_at,
        }
    }
}

/// Areas listing
#[derive(Debug, Serialize)]
pub struct AreasListResponse {
    pub areas: Vec<AreaResponse>,
}
