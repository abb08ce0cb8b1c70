//! Assignment request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Enroll request body (single user)
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Mark the enrollment completed at creation (staff only)
    pub completed: Option<bool>,
}

/// Bulk enroll request body
#[derive(Debug, Deserialize, Validate)]
pub struct AssignManyRequest {
    #[validate(length(min = 1))]
    pub user_ids: Vec<Uuid>,

    pub completed: Option<bool>,
}

/// Update enrollment request body
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub completed: Option<bool>,
    pub additional_service_hours: Option<i32>,
}

/// List assignments query parameters
#[derive(Debug, Deserialize)]
pub struct ListAssignmentsQuery {
    pub user_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    /// Case-insensitive substring match on the activity name
    pub search: Option<String>,
    pub lower_date: Option<DateTime<Utc>>,
    pub upper_date: Option<DateTime<Utc>>,
    /// Zero-based page index; omit for the full listing
    pub page: Option<u32>,
    /// Enrich each user with their promotion group (default true)
    pub include_promotion_group: Option<bool>,
}
