//! Payment response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    handlers::users::response::UserSummary,
    models::{Payment, PaymentAssignment, User},
};

/// Payment with its treasurers
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub name: String,
    pub limit_date: DateTime<Utc>,
    pub amount: f64,
    pub description: Option<String>,
    pub target_users: Option<String>,
    pub activity_payment: bool,
    pub treasurer: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl PaymentResponse {
    pub fn from_parts(payment: Payment, treasurers: Vec<User>) -> Self {
        Self {
            id: payment.id,
            name: payment.name,
            limit_date: payment.limit_date,
            amount: payment.amount,
            description: payment.description,
            target_users: payment.target_users,
            activity_payment: payment.activity_payment,
            treasurer: treasurers.into_iter().map(UserSummary::from_user).collect(),
            created_at: payment.created_at,
        }
    }
}

/// Payment with its per-user ledger
#[derive(Debug, Serialize)]
pub struct PaymentDetailResponse {
    #[serde(flatten)]
    pub payment: PaymentResponse,
    pub assignments: Vec<PaymentAssignment>,
}

/// Payments listing
#[derive(Debug, Serialize)]
pub struct PaymentsListResponse {
    pub payments: Vec<PaymentResponse>,
}

/// Payment assignments listing
#[derive(Debug, Serialize)]
pub struct PaymentAssignmentsResponse {
    pub assignments: Vec<PaymentAssignment>,
}
