//! Assignment response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::repositories::assignment_repo::AssignmentDetail,
    models::{Activity, Assignment, PromotionGroup, User},
};

/// Enrollment joined with its activity and user data
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub completed: bool,
    pub additional_service_hours: Option<i32>,
    pub pending_payment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_assignment_id: Option<Uuid>,
    pub activity: AssignmentActivityResponse,
    pub user: AssignmentUserResponse,
    pub created_at: DateTime<Utc>,
}

/// The assigned activity
#[derive(Debug, Serialize)]
pub struct AssignmentActivityResponse {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub service_hours: i32,
    pub area_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
}

/// The enrolled user
#[derive(Debug, Serialize)]
pub struct AssignmentUserResponse {
    pub id: Uuid,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub promotion: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_group: Option<String>,
}

impl AssignmentResponse {
    /// Assemble from freshly written rows (mutation paths)
    pub fn from_parts(assignment: Assignment, activity: Activity, user: User) -> Self {
        Self {
            id: assignment.id,
            completed: assignment.completed,
            additional_service_hours: assignment.additional_service_hours,
            pending_payment: assignment.pending_payment,
            payment_assignment_id: assignment.payment_assignment_id,
            activity: AssignmentActivityResponse {
                id: activity.id,
                name: activity.name,
                date: activity.date,
                service_hours: activity.service_hours,
                area_id: activity.area_id,
                area_name: None,
            },
            user: AssignmentUserResponse {
                id: user.id,
                name: user.name,
                lastname: user.lastname,
                email: user.email,
                promotion: user.promotion,
                promotion_group: None,
            },
            created_at: assignment.created_at,
        }
    }

    /// Assemble from a joined listing row
    pub fn from_detail(detail: AssignmentDetail, group: Option<PromotionGroup>) -> Self {
        Self {
            id: detail.id,
            completed: detail.completed,
            additional_service_hours: detail.additional_service_hours,
            pending_payment: detail.pending_payment,
            payment_assignment_id: detail.payment_assignment_id,
            activity: AssignmentActivityResponse {
                id: detail.activity_id,
                name: detail.activity_name,
                date: detail.activity_date,
                service_hours: detail.activity_service_hours,
                area_id: detail.area_id,
                area_name: Some(detail.area_name),
            },
            user: AssignmentUserResponse {
                id: detail.user_id,
                name: detail.user_name,
                lastname: detail.user_lastname,
                email: detail.user_email,
                promotion: detail.user_promotion,
                promotion_group: group.map(|g| g.to_string()),
            },
            created_at: detail.created_at,
        }
    }
}

/// Assignments listing
#[derive(Debug, Serialize)]
pub struct AssignmentsListResponse {
    pub assignments: Vec<AssignmentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}
