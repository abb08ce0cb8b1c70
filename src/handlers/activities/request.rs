//! Activity request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_NAME_LENGTH;

/// Create activity request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    /// When the activity takes place
    pub date: DateTime<Utc>,

    /// Base hours granted on completion
    #[validate(range(min = 0))]
    pub service_hours: i32,

    /// Users responsible for the activity
    #[validate(length(min = 1))]
    pub responsible: Vec<Uuid>,

    pub area_id: Uuid,

    /// When present, a linked payment is generated for this amount
    #[validate(range(min = 0.0))]
    pub payment_amount: Option<f64>,

    pub registration_start_date: DateTime<Utc>,

    pub registration_end_date: DateTime<Utc>,

    /// Promotion years and/or group names allowed to enroll (empty = open)
    pub participating_promotions: Option<Vec<String>>,

    #[validate(range(min = 0))]
    pub max_participants: i32,
}

/// Update activity request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 0))]
    pub service_hours: Option<i32>,

    #[validate(length(min = 1))]
    pub responsible: Option<Vec<Uuid>>,

    pub area_id: Option<Uuid>,

    pub registration_start_date: Option<DateTime<Utc>>,

    pub registration_end_date: Option<DateTime<Utc>>,

    pub participating_promotions: Option<Vec<String>>,

    #[validate(range(min = 0))]
    pub max_participants: Option<i32>,
}

/// List activities query parameters
#[derive(Debug, Deserialize)]
pub struct ListActivitiesQuery {
    /// Filter by owning area
    pub area: Option<Uuid>,
    /// Upper bound on the activity date
    pub limit_date: Option<DateTime<Utc>>,
    /// Free-text name search
    pub search: Option<String>,
}
