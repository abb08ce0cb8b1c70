//! Payment request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

/// Create payment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    pub limit_date: DateTime<Utc>,

    #[validate(range(min = 0.0))]
    pub amount: f64,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    /// Users managing this payment's ledger
    #[validate(length(min = 1))]
    pub treasurer: Vec<Uuid>,

    /// Free-text description of the target audience
    pub target_users: Option<String>,
}

/// Update payment request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    pub limit_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub treasurer: Option<Vec<Uuid>>,
}

/// Bulk payment assignment request
#[derive(Debug, Deserialize, Validate)]
pub struct AssignPaymentRequest {
    #[validate(length(min = 1))]
    pub user_ids: Vec<Uuid>,
}

/// Complete payment assignment request
#[derive(Debug, Deserialize, Validate)]
pub struct CompletePaymentRequest {
    /// Object-store keys of the submitted vouchers
    #[validate(length(min = 1))]
    pub voucher_keys: Vec<String>,
}
