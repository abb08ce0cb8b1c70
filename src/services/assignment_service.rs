//! Assignment service
//!
//! The transactional core: every mutation combines the assignment write, the
//! capacity adjustment and the service-hour delta in one transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{
        assignment_repo::AssignmentFilter, ActivityRepository, AreaRepository,
        AssignmentRepository, PaymentRepository, UserRepository,
    },
    error::{AppError, AppResult},
    handlers::assignments::response::AssignmentResponse,
    middleware::auth::AuthenticatedUser,
    models::{
        assignment::{service_hours_delta, unassign_hours},
        Activity, PromotionGroup, User,
    },
};

/// Assignment service for business logic
pub struct AssignmentService;

impl AssignmentService {
    /// Check that the caller may manage a user's enrollment: admins, area
    /// responsibles of the activity's area, activity responsibles of the
    /// activity, or the user themself while registration is open
    async fn ensure_can_manage_enrollment(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity: &Activity,
        target_user: &Uuid,
    ) -> AppResult<()> {
        if auth_user.is_admin() {
            return Ok(());
        }

        if AreaRepository::is_responsible(pool, &activity.area_id, &auth_user.id).await? {
            return Ok(());
        }

        if ActivityRepository::is_responsible(pool, &activity.id, &auth_user.id).await? {
            return Ok(());
        }

        if auth_user.id == *target_user && activity.is_registration_open() {
            return Ok(());
        }

        Err(AppError::Forbidden(
            "Caller may not manage this enrollment".to_string(),
        ))
    }

    /// Completion and hour adjustments are staff-only: self-enrollment does
    /// not extend to editing the ledger
    async fn ensure_can_edit_completion(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity: &Activity,
    ) -> AppResult<()> {
        if auth_user.is_admin() {
            return Ok(());
        }

        if AreaRepository::is_responsible(pool, &activity.area_id, &auth_user.id).await? {
            return Ok(());
        }

        if ActivityRepository::is_responsible(pool, &activity.id, &auth_user.id).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(
            "Caller may not edit this enrollment".to_string(),
        ))
    }

    /// Enroll one user into an activity.
    ///
    /// Validates promotion eligibility and capacity, links the activity's
    /// payment when present, and credits service hours when created as
    /// completed. All steps share one transaction.
    pub async fn assign(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity_id: &Uuid,
        user_id: &Uuid,
        completed: bool,
    ) -> AppResult<AssignmentResponse> {
        let mut tx = pool.begin().await?;

        let user = UserRepository::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::Validation("The provided user does not exist".to_string()))?;

        let activity = ActivityRepository::find_by_id_for_update(&mut *tx, activity_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("The provided activity does not exist".to_string())
            })?;

        if activity.blocked {
            return Err(AppError::Validation(
                "The provided activity does not exist".to_string(),
            ));
        }

        Self::ensure_can_manage_enrollment(pool, auth_user, &activity, user_id).await?;
        if completed {
            Self::ensure_can_edit_completion(pool, auth_user, &activity).await?;
        }

        Self::check_promotion(&mut tx, &activity, &user).await?;

        if !ActivityRepository::reserve_spaces(&mut *tx, &activity.id, 1).await? {
            return Err(AppError::NoAvailableSpaces);
        }

        // Link the activity's payment: reuse the user's obligation when it
        // already exists
        let payment_assignment_id = match activity.payment_id.as_ref() {
            Some(payment_id) => {
                let existing =
                    PaymentRepository::find_assignment(&mut *tx, payment_id, &user.id).await?;
                let assignment = match existing {
                    Some(assignment) => assignment,
                    None => {
                        PaymentRepository::insert_assignment(&mut *tx, payment_id, &user.id)
                            .await?
                    }
                };
                Some(assignment.id)
            }
            None => None,
        };

        let assignment = AssignmentRepository::insert(
            &mut *tx,
            &activity.id,
            &user.id,
            completed,
            None,
            payment_assignment_id.is_some(),
            payment_assignment_id.as_ref(),
        )
        .await
        .map_err(map_duplicate_enrollment)?;

        if completed && activity.service_hours > 0 {
            UserRepository::adjust_service_hours(
                &mut tx,
                &user.id,
                &activity.area_id,
                activity.service_hours,
            )
            .await?;
        }

        tx.commit().await?;

        Ok(AssignmentResponse::from_parts(assignment, activity, user))
    }

    /// Enroll a batch of users into one activity.
    ///
    /// Capacity is checked once against the whole batch size; a user already
    /// enrolled surfaces as the duplicate-enrollment error and aborts the
    /// batch. Hours are not credited on this path.
    pub async fn assign_many(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity_id: &Uuid,
        user_ids: &[Uuid],
        completed: bool,
    ) -> AppResult<Vec<AssignmentResponse>> {
        if user_ids.is_empty() {
            return Err(AppError::Validation(
                "The user list must not be empty".to_string(),
            ));
        }

        let mut tx = pool.begin().await?;

        let activity = ActivityRepository::find_by_id_for_update(&mut *tx, activity_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("The provided activity does not exist".to_string())
            })?;

        Self::ensure_can_manage_enrollment(pool, auth_user, &activity, &auth_user.id).await?;

        let users = UserRepository::find_in_list(&mut *tx, user_ids).await?;
        if users.len() != user_ids.len() {
            return Err(AppError::Validation(
                "Some of the provided users do not exist".to_string(),
            ));
        }

        for user in &users {
            Self::check_promotion_named(&mut tx, &activity, user).await?;
        }

        if activity.available_spaces < user_ids.len() as i32 {
            return Err(AppError::NoAvailableSpaces);
        }

        let assignments = AssignmentRepository::insert_many(
            &mut *tx,
            &activity.id,
            user_ids,
            completed,
            activity.payment_id.is_some(),
        )
        .await
        .map_err(map_duplicate_enrollment)?;

        if !ActivityRepository::reserve_spaces(&mut *tx, &activity.id, user_ids.len() as i32)
            .await?
        {
            return Err(AppError::NoAvailableSpaces);
        }

        tx.commit().await?;

        let responses = assignments
            .into_iter()
            .filter_map(|assignment| {
                users
                    .iter()
                    .find(|u| u.id == assignment.user_id)
                    .cloned()
                    .map(|user| AssignmentResponse::from_parts(assignment, activity.clone(), user))
            })
            .collect();

        Ok(responses)
    }

    /// Remove a user's enrollment, releasing one space and debiting any
    /// credited hours
    pub async fn unassign(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<AssignmentResponse> {
        let mut tx = pool.begin().await?;

        let activity = ActivityRepository::find_by_id_for_update(&mut *tx, activity_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("The provided activity does not exist".to_string())
            })?;

        Self::ensure_can_manage_enrollment(pool, auth_user, &activity, user_id).await?;

        let assignment = AssignmentRepository::delete(&mut *tx, activity_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("The user is not enrolled in the activity".to_string())
            })?;

        ActivityRepository::release_spaces(&mut *tx, &activity.id, 1).await?;

        let hours = unassign_hours(
            activity.service_hours,
            assignment.completed,
            assignment.additional_service_hours,
        );
        if hours > 0 {
            UserRepository::adjust_service_hours(
                &mut tx,
                user_id,
                &activity.area_id,
                -hours,
            )
            .await?;
        }

        tx.commit().await?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(AssignmentResponse::from_parts(assignment, activity, user))
    }

    /// Update completion state and/or additional hours, applying exactly one
    /// of the four ledger cases
    pub async fn update_assignment(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        activity_id: &Uuid,
        user_id: &Uuid,
        completed: Option<bool>,
        additional_service_hours: Option<i32>,
    ) -> AppResult<AssignmentResponse> {
        let mut tx = pool.begin().await?;

        let activity = ActivityRepository::find_by_id_for_update(&mut *tx, activity_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("The provided activity does not exist".to_string())
            })?;

        Self::ensure_can_edit_completion(pool, auth_user, &activity).await?;

        let previous = AssignmentRepository::find_for_update(&mut *tx, activity_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("The user is not enrolled in the activity".to_string())
            })?;

        let delta = service_hours_delta(
            activity.service_hours,
            previous.completed,
            previous.additional_service_hours,
            completed,
            additional_service_hours,
        );

        let updated = AssignmentRepository::update_flags(
            &mut *tx,
            activity_id,
            user_id,
            completed,
            additional_service_hours,
        )
        .await?;

        if delta != 0 {
            UserRepository::adjust_service_hours(&mut tx, user_id, &activity.area_id, delta)
                .await?;
        }

        tx.commit().await?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(AssignmentResponse::from_parts(updated, activity, user))
    }

    /// List assignments with joined data, optionally enriching each user
    /// with their promotion group (non-critical, degrades to omitted)
    pub async fn list_assignments(
        pool: &PgPool,
        filter: &AssignmentFilter<'_>,
        include_promotion_group: bool,
    ) -> AppResult<Vec<AssignmentResponse>> {
        let rows = AssignmentRepository::list(pool, filter).await?;

        let range = if include_promotion_group {
            UserRepository::promotion_range(pool).await.ok()
        } else {
            None
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let group = range
                    .map(|(first, last)| PromotionGroup::classify(row.user_promotion, first, last));
                AssignmentResponse::from_detail(row, group)
            })
            .collect())
    }

    /// Fetch one assignment by its (activity, user) pair
    pub async fn get_assignment(
        pool: &PgPool,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<AssignmentResponse> {
        let filter = AssignmentFilter {
            user_id: Some(user_id),
            activity_id: Some(activity_id),
            ..Default::default()
        };

        let mut rows = Self::list_assignments(pool, &filter, true).await?;
        rows.pop()
            .ok_or_else(|| AppError::NotFound("The user is not enrolled in the activity".to_string()))
    }

    /// Reject enrollment when the user's promotion is excluded
    async fn check_promotion(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        activity: &Activity,
        user: &User,
    ) -> AppResult<()> {
        if activity.participating_promotions.is_none() {
            return Ok(());
        }

        let (first, last) = UserRepository::promotion_range(&mut **tx).await?;
        let group = PromotionGroup::classify(user.promotion, first, last);

        if activity.allows_promotion(user.promotion, group) {
            Ok(())
        } else {
            Err(AppError::Validation(
                "The activity is not available for the user's promotion".to_string(),
            ))
        }
    }

    /// Same check, naming the rejected user (bulk path)
    async fn check_promotion_named(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        activity: &Activity,
        user: &User,
    ) -> AppResult<()> {
        Self::check_promotion(tx, activity, user).await.map_err(|e| match e {
            AppError::Validation(_) => AppError::Validation(format!(
                "The activity is not available for the promotion of user {} {}",
                user.name, user.lastname
            )),
            other => other,
        })
    }
}

/// Surface the (activity, user) unique violation as the domain error
fn map_duplicate_enrollment(err: AppError) -> AppError {
    match err {
        AppError::AlreadyExists(_) => {
            AppError::AlreadyExists("The user is already enrolled in the activity".to_string())
        }
        other => other,
    }
}
