//! Activity model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::promotion::{promotion_allowed, PromotionGroup};

/// Volunteer activity database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    /// Base service hours granted when an assignment is completed
    pub service_hours: i32,
    pub area_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub registration_start_date: DateTime<Utc>,
    pub registration_end_date: DateTime<Utc>,
    /// Promotion years and/or group names allowed to enroll; None = open to all
    pub participating_promotions: Option<Vec<String>>,
    pub max_participants: i32,
    pub available_spaces: i32,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Check if self-enrollment is currently open
    pub fn is_registration_open(&self) -> bool {
        let now = Utc::now();
        !self.blocked && now >= self.registration_start_date && now <= self.registration_end_date
    }

    /// Check if a promotion cohort may enroll in this activity
    pub fn allows_promotion(&self, promotion: i32, group: PromotionGroup) -> bool {
        promotion_allowed(self.participating_promotions.as_deref(), promotion, group)
    }

    pub fn has_available_spaces(&self) -> bool {
        self.available_spaces > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_activity() -> Activity {
        let now = Utc::now();
        Activity {
            id: Uuid::new_v4(),
            name: "Food drive".to_string(),
            date: now + Duration::days(7),
            service_hours: 5,
            area_id: Uuid::new_v4(),
            payment_id: None,
            registration_start_date: now - Duration::days(1),
            registration_end_date: now + Duration::days(1),
            participating_promotions: None,
            max_participants: 10,
            available_spaces: 10,
            blocked: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_registration_window() {
        let mut activity = sample_activity();
        assert!(activity.is_registration_open());

        activity.registration_end_date = Utc::now() - Duration::hours(1);
        assert!(!activity.is_registration_open());
    }

    #[test]
    fn test_blocked_closes_registration() {
        let mut activity = sample_activity();
        activity.blocked = true;
        assert!(!activity.is_registration_open());
    }

    #[test]
    fn test_promotion_restriction() {
        let mut activity = sample_activity();
        assert!(activity.allows_promotion(2024, PromotionGroup::Student));

        activity.participating_promotions = Some(vec!["2025".to_string()]);
        assert!(activity.allows_promotion(2025, PromotionGroup::Student));
        assert!(!activity.allows_promotion(2024, PromotionGroup::Student));
    }
}
