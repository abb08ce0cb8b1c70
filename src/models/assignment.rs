//! Activity assignment model and service-hour accounting rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Enrollment of one user in one activity (unique per pair)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub completed: bool,
    /// Signed manual adjustment on top of the activity's base hours
    pub additional_service_hours: Option<i32>,
    pub pending_payment: bool,
    pub payment_assignment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Hours this assignment currently contributes to the user's ledger
    pub fn credited_hours(&self, base_hours: i32) -> i32 {
        if self.completed {
            base_hours + self.additional_service_hours.unwrap_or(0)
        } else {
            0
        }
    }
}

/// Compute the service-hour delta to apply to the user's per-area ledger when
/// an assignment update changes `completed` and/or the additional hours.
///
/// Four mutually exclusive cases:
/// 1. Only additional hours supplied and the assignment is already completed:
///    the delta between new and previous additional hours (negative values
///    subtract).
/// 2. `completed` transitions false to true: base hours plus the newest
///    additional value (the incoming one when supplied, else the stored one).
/// 3. `completed` transitions true to false: base hours plus the *previous*
///    additional value are removed, even when additional hours were edited in
///    the same request.
/// 4. `completed` supplied but unchanged: no adjustment, even if additional
///    hours changed.
///
/// Transitions never apply a net-negative total: a completion whose combined
/// hours come out negative yields no delta.
pub fn service_hours_delta(
    base_hours: i32,
    prev_completed: bool,
    prev_additional: Option<i32>,
    new_completed: Option<bool>,
    new_additional: Option<i32>,
) -> i32 {
    match (new_completed, new_additional) {
        (None, Some(new_extra)) if prev_completed => new_extra - prev_additional.unwrap_or(0),
        (Some(completed), _) if completed != prev_completed => {
            if completed {
                let hours = base_hours + new_additional.or(prev_additional).unwrap_or(0);
                if hours > 0 { hours } else { 0 }
            } else {
                let hours = base_hours + prev_additional.unwrap_or(0);
                if hours > 0 { -hours } else { 0 }
            }
        }
        _ => 0,
    }
}

/// Hours to subtract from the user's ledger when an assignment is deleted
pub fn unassign_hours(base_hours: i32, completed: bool, additional: Option<i32>) -> i32 {
    if completed {
        base_hours + additional.unwrap_or(0)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additional_only_while_completed() {
        // Completed with base 5, additional goes null -> 3: total rises by 3, not 8
        assert_eq!(service_hours_delta(5, true, None, None, Some(3)), 3);
    }

    #[test]
    fn test_additional_only_negative_values_subtract() {
        assert_eq!(service_hours_delta(5, true, Some(3), None, Some(1)), -2);
        assert_eq!(service_hours_delta(5, true, Some(3), None, Some(-4)), -7);
    }

    #[test]
    fn test_additional_only_while_not_completed_is_noop() {
        assert_eq!(service_hours_delta(5, false, None, None, Some(3)), 0);
    }

    #[test]
    fn test_completion_adds_base_plus_newest_additional() {
        assert_eq!(service_hours_delta(5, false, None, Some(true), Some(3)), 8);
        // No incoming additional: stored value is used
        assert_eq!(service_hours_delta(5, false, Some(2), Some(true), None), 7);
    }

    #[test]
    fn test_uncompletion_removes_previous_additional() {
        // The simultaneous edit to additional hours is ignored on the way down
        assert_eq!(
            service_hours_delta(5, true, Some(2), Some(false), Some(10)),
            -7
        );
        assert_eq!(service_hours_delta(5, true, None, Some(false), None), -5);
    }

    #[test]
    fn test_unchanged_completed_is_noop_even_with_additional() {
        assert_eq!(service_hours_delta(5, true, Some(2), Some(true), Some(9)), 0);
        assert_eq!(
            service_hours_delta(5, false, Some(2), Some(false), Some(9)),
            0
        );
    }

    #[test]
    fn test_net_negative_transitions_yield_no_delta() {
        assert_eq!(service_hours_delta(2, false, None, Some(true), Some(-5)), 0);
        assert_eq!(service_hours_delta(2, true, Some(-5), Some(false), None), 0);
    }

    #[test]
    fn test_completion_round_trip_restores_total() {
        let base = 5;
        let additional = Some(3);

        let down = service_hours_delta(base, true, additional, Some(false), None);
        let up = service_hours_delta(base, false, additional, Some(true), None);
        assert_eq!(down + up, 0);
    }

    #[test]
    fn test_credited_hours() {
        let assignment = Assignment {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            completed: true,
            additional_service_hours: Some(3),
            pending_payment: false,
            payment_assignment_id: None,
            created_at: Utc::now(),
        };
        assert_eq!(assignment.credited_hours(5), 8);

        let pending = Assignment {
            completed: false,
            ..assignment
        };
        assert_eq!(pending.credited_hours(5), 0);
    }

    #[test]
    fn test_unassign_hours() {
        assert_eq!(unassign_hours(5, true, Some(3)), 8);
        assert_eq!(unassign_hours(5, true, None), 5);
        assert_eq!(unassign_hours(5, false, Some(3)), 0);
    }
}
