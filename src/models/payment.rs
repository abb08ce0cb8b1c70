//! Payment and payment assignment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Monetary obligation, optionally auto-generated from an activity
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub name: String,
    pub limit_date: DateTime<Utc>,
    pub amount: f64,
    pub description: Option<String>,
    /// Free-text description of the audience the payment applies to
    pub target_users: Option<String>,
    /// True when the payment was generated from an activity
    pub activity_payment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user obligation record for a payment (unique per pair)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentAssignment {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub user_id: Uuid,
    /// Evidence submitted (vouchers attached)
    pub completed: bool,
    /// A treasurer confirmed the completed submission
    pub confirmed: bool,
    pub voucher_keys: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentAssignment {
    /// Deletion is restricted to untouched assignments
    pub fn is_deletable(&self) -> bool {
        !self.completed && self.voucher_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletable_rules() {
        let mut assignment = PaymentAssignment {
            id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            completed: false,
            confirmed: false,
            voucher_keys: vec![],
            created_at: Utc::now(),
        };
        assert!(assignment.is_deletable());

        assignment.voucher_keys.push("vouchers/abc".to_string());
        assert!(!assignment.is_deletable());

        assignment.voucher_keys.clear();
        assignment.completed = true;
        assert!(!assignment.is_deletable());
    }
}
