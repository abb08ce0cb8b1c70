//! Activity response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    handlers::users::response::UserSummary,
    models::{Activity, User},
};

/// Activity with its area and responsible users
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub service_hours: i32,
    pub area: ActivityAreaResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    pub registration_start_date: DateTime<Utc>,
    pub registration_end_date: DateTime<Utc>,
    pub participating_promotions: Option<Vec<String>>,
    pub max_participants: i32,
    pub available_spaces: i32,
    pub blocked: bool,
    pub responsible: Vec<UserSummary>,
}

/// Owning area reference
#[derive(Debug, Serialize)]
pub struct ActivityAreaResponse {
    pub id: Uuid,
    pub name: String,
}

impl ActivityResponse {
    pub fn from_parts(activity: Activity, area_name: String, responsible: Vec<User>) -> Self {
        Self {
            id: activity.id,
            name: activity.name,
            date: activity.date,
            service_hours: activity.service_hours,
            area: ActivityAreaResponse {
                id: activity.area_id,
                name: area_name,
            },
            payment_id: activity.payment_id,
            registration_start_date: activity.registration_start_date,
            registration_end_date: activity.registration_end_date,
            participating_promotions: activity.participating_promotions,
            max_participants: activity.max_participants,
            available_spaces: activity.available_spaces,
            blocked: activity.blocked,
            responsible: responsible.into_iter().map(UserSummary::from_user).collect(),
        }
    }
}

/// Activities listing
#[derive(Debug, Serialize)]
pub struct ActivitiesListResponse {
    pub activities: Vec<ActivityResponse>,
}
