//! Promotion cohorts and their classification into groups
//!
//! A user's promotion is their graduation-year cohort. Relative to the range
//! of promotions currently considered active students, a promotion falls
//! into one of three groups: incoming students ("chick"), active students,
//! and graduates.

use serde::{Deserialize, Serialize};

use crate::constants::promotion_groups;

/// Derived classification of a promotion year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionGroup {
    Chick,
    Student,
    Graduate,
}

impl PromotionGroup {
    /// Classify a promotion year against the active-student range
    pub fn classify(promotion: i32, first_promotion: i32, last_promotion: i32) -> Self {
        if promotion > last_promotion {
            Self::Chick
        } else if promotion >= first_promotion {
            Self::Student
        } else {
            Self::Graduate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chick => promotion_groups::CHICK,
            Self::Student => promotion_groups::STUDENT,
            Self::Graduate => promotion_groups::GRADUATE,
        }
    }
}

impl std::fmt::Display for PromotionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check a promotion against an activity's restriction list.
///
/// An entry matches if it equals the promotion year or names the group the
/// year classifies into. An absent list means no restriction.
pub fn promotion_allowed(
    restrictions: Option<&[String]>,
    promotion: i32,
    group: PromotionGroup,
) -> bool {
    match restrictions {
        None => true,
        Some(entries) => entries
            .iter()
            .any(|entry| entry == &promotion.to_string() || entry == group.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            PromotionGroup::classify(2027, 2022, 2026),
            PromotionGroup::Chick
        );
        assert_eq!(
            PromotionGroup::classify(2026, 2022, 2026),
            PromotionGroup::Student
        );
        assert_eq!(
            PromotionGroup::classify(2022, 2022, 2026),
            PromotionGroup::Student
        );
        assert_eq!(
            PromotionGroup::classify(2021, 2022, 2026),
            PromotionGroup::Graduate
        );
    }

    #[test]
    fn test_no_restriction_allows_everyone() {
        assert!(promotion_allowed(None, 2024, PromotionGroup::Student));
    }

    #[test]
    fn test_year_match() {
        let list = vec!["2024".to_string(), "2025".to_string()];
        assert!(promotion_allowed(Some(&list), 2024, PromotionGroup::Student));
        assert!(!promotion_allowed(
            Some(&list),
            2020,
            PromotionGroup::Graduate
        ));
    }

    #[test]
    fn test_group_match() {
        let list = vec!["student".to_string()];
        assert!(promotion_allowed(Some(&list), 2024, PromotionGroup::Student));
        assert!(!promotion_allowed(Some(&list), 2020, PromotionGroup::Graduate));
    }

    #[test]
    fn test_empty_list_rejects() {
        let list: Vec<String> = vec![];
        assert!(!promotion_allowed(Some(&list), 2024, PromotionGroup::Student));
    }
}
