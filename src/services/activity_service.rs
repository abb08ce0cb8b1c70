//! Activity service

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::repositories::{
        ActivityRepository, AreaRepository, AssignmentRepository, PaymentRepository,
        UserRepository,
    },
    error::{AppError, AppResult},
    handlers::activities::{
        request::{CreateActivityRequest, UpdateActivityRequest},
        response::ActivityResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::{Activity, User},
    services::AuthService,
};

/// Activity service for business logic
pub struct ActivityService;

impl ActivityService {
    /// Check that the caller may manage activities of an area: admins always,
    /// others only when they are a verified responsible of that area
    pub async fn ensure_can_manage_area(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        area_id: &Uuid,
    ) -> AppResult<()> {
        if auth_user.is_admin() {
            return Ok(());
        }

        if auth_user.has_role(roles::AREA_RESPONSIBLE)
            && AreaRepository::is_responsible(pool, area_id, &auth_user.id).await?
        {
            return Ok(());
        }

        Err(AppError::Forbidden(
            "Caller is not responsible for this area".to_string(),
        ))
    }

    /// Create an activity, optionally generating its linked payment
    pub async fn create_activity(
        pool: &PgPool,
        redis: ConnectionManager,
        auth_user: &AuthenticatedUser,
        payload: CreateActivityRequest,
    ) -> AppResult<ActivityResponse> {
        Self::ensure_can_manage_area(pool, auth_user, &payload.area_id).await?;

        let mut tx = pool.begin().await?;

        let area = AreaRepository::find_by_id(&mut *tx, &payload.area_id)
            .await?
            .ok_or_else(|| AppError::Validation("The area does not exist".to_string()))?;

        let responsibles = Self::resolve_responsibles(&mut tx, &payload.responsible).await?;

        // An enrollment fee turns into a payment owned by the responsibles
        let payment_id = match payload.payment_amount {
            Some(amount) => {
                let payment = PaymentRepository::create(
                    &mut *tx,
                    &payload.name,
                    payload.date,
                    amount,
                    None,
                    Some("Activity participants"),
                    true,
                )
                .await?;

                for user in &responsibles {
                    PaymentRepository::add_treasurer(&mut *tx, &payment.id, &user.id).await?;
                }

                Some(payment.id)
            }
            None => None,
        };

        let activity = ActivityRepository::create(
            &mut *tx,
            &payload.name,
            payload.date,
            payload.service_hours,
            &area.id,
            payment_id.as_ref(),
            payload.registration_start_date,
            payload.registration_end_date,
            normalize_promotions(payload.participating_promotions.as_deref()),
            payload.max_participants,
        )
        .await?;

        for user in &responsibles {
            ActivityRepository::add_responsible(&mut *tx, &activity.id, &user.id).await?;
            UserRepository::add_role(&mut *tx, &user.id, roles::ACTIVITY_RESPONSIBLE).await?;
        }

        tx.commit().await?;

        let affected: Vec<Uuid> = responsibles.iter().map(|u| u.id).collect();
        AuthService::force_logout_all(redis, &affected).await;

        Ok(ActivityResponse::from_parts(activity, area.name, responsibles))
    }

    /// Update an activity.
    ///
    /// Lowering the participant count below the registered count is rejected;
    /// otherwise `available_spaces` is recomputed. A base-hours change
    /// re-credits every already-completed assignment individually.
    pub async fn update_activity(
        pool: &PgPool,
        redis: ConnectionManager,
        auth_user: &AuthenticatedUser,
        id: &Uuid,
        payload: UpdateActivityRequest,
    ) -> AppResult<ActivityResponse> {
        let mut tx = pool.begin().await?;

        let activity = ActivityRepository::find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        if activity.blocked {
            return Err(AppError::Validation(
                "A blocked activity cannot be updated".to_string(),
            ));
        }

        Self::ensure_can_manage_area(pool, auth_user, &activity.area_id).await?;

        if let Some(area_id) = payload.area_id.as_ref() {
            AreaRepository::find_by_id(&mut *tx, area_id)
                .await?
                .ok_or_else(|| AppError::Validation("The area does not exist".to_string()))?;
        }

        // Recompute available spaces against the current registration count
        let available_spaces = match payload.max_participants {
            Some(new_count) => {
                let registered =
                    AssignmentRepository::count_for_activity(&mut *tx, &activity.id).await? as i32;
                if registered > new_count {
                    return Err(AppError::Validation(
                        "The new participant count is lower than the number of users already enrolled"
                            .to_string(),
                    ));
                }
                Some(new_count - registered)
            }
            None => None,
        };

        let new_responsibles = match payload.responsible.as_deref() {
            Some(ids) => Some(Self::resolve_responsibles(&mut tx, ids).await?),
            None => None,
        };

        let updated = ActivityRepository::update(
            &mut *tx,
            &activity.id,
            payload.name.as_deref(),
            payload.date,
            payload.service_hours,
            payload.area_id.as_ref(),
            payload.registration_start_date,
            payload.registration_end_date,
            payload
                .participating_promotions
                .as_ref()
                .map(|list| normalize_promotions(Some(list.as_slice()))),
            payload.max_participants,
            available_spaces,
        )
        .await?;

        // Re-credit completed assignments one by one when base hours changed
        if let Some(new_hours) = payload.service_hours {
            let delta = new_hours - activity.service_hours;
            if delta != 0 {
                let completed =
                    AssignmentRepository::completed_for_activity(&mut *tx, &activity.id).await?;
                for assignment in &completed {
                    UserRepository::adjust_service_hours(
                        &mut tx,
                        &assignment.user_id,
                        &updated.area_id,
                        delta,
                    )
                    .await?;
                }
            }
        }

        let mut affected = Vec::new();
        let responsibles = match new_responsibles {
            Some(users) => {
                let previous = ActivityRepository::responsibles(&mut *tx, &activity.id).await?;
                affected =
                    Self::apply_responsible_diff(&mut tx, &activity.id, &previous, &users).await?;
                users
            }
            None => ActivityRepository::responsibles(&mut *tx, &activity.id).await?,
        };

        let area_name = AreaRepository::find_by_id(&mut *tx, &updated.area_id)
            .await?
            .map(|a| a.name)
            .unwrap_or_default();

        tx.commit().await?;

        AuthService::force_logout_all(redis, &affected).await;

        Ok(ActivityResponse::from_parts(updated, area_name, responsibles))
    }

    /// Delete an activity; forbidden while any enrollment exists
    pub async fn delete_activity(
        pool: &PgPool,
        redis: ConnectionManager,
        auth_user: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        let activity = ActivityRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        Self::ensure_can_manage_area(pool, auth_user, &activity.area_id).await?;

        if AssignmentRepository::count_for_activity(&mut *tx, &activity.id).await? > 0 {
            return Err(AppError::Conflict(
                "Users are enrolled in the activity and it cannot be deleted".to_string(),
            ));
        }

        let previous = ActivityRepository::responsibles(&mut *tx, &activity.id).await?;

        let deleted = ActivityRepository::delete(&mut *tx, &activity.id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Activity not found".to_string()));
        }

        let mut affected = Vec::new();
        for user in &previous {
            if ActivityRepository::count_responsible_activities(&mut *tx, &user.id).await? == 0 {
                UserRepository::remove_role(&mut *tx, &user.id, roles::ACTIVITY_RESPONSIBLE)
                    .await?;
            }
            affected.push(user.id);
        }

        tx.commit().await?;

        AuthService::force_logout_all(redis, &affected).await;

        Ok(())
    }

    /// Toggle the blocked flag; spaces and hours are untouched
    pub async fn set_blocked(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        id: &Uuid,
        blocked: bool,
    ) -> AppResult<ActivityResponse> {
        let activity = ActivityRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        Self::ensure_can_manage_area(pool, auth_user, &activity.area_id).await?;

        let updated = ActivityRepository::set_blocked(pool, id, blocked).await?;

        Self::to_response(pool, updated).await
    }

    /// List activities with optional filters.
    ///
    /// Non-admin area responsibles only see activities of their own areas;
    /// the areas lookup is non-critical and degrades to an empty set.
    pub async fn list_activities(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        area_id: Option<&Uuid>,
        upper_date: Option<chrono::DateTime<chrono::Utc>>,
        search: Option<&str>,
    ) -> AppResult<Vec<ActivityResponse>> {
        let visible_area_ids: Option<Vec<Uuid>> =
            if !auth_user.is_admin() && auth_user.has_role(roles::AREA_RESPONSIBLE) {
                let areas = AreaRepository::areas_where_responsible(pool, &auth_user.id)
                    .await
                    .unwrap_or_default();
                Some(areas.into_iter().map(|a| a.id).collect())
            } else {
                None
            };

        let activities = ActivityRepository::list(
            pool,
            area_id,
            upper_date,
            search,
            visible_area_ids.as_deref(),
        )
        .await?;

        futures::future::try_join_all(
            activities.into_iter().map(|a| Self::to_response(pool, a)),
        )
        .await
    }

    /// Fetch one activity
    pub async fn get_activity(pool: &PgPool, id: &Uuid) -> AppResult<ActivityResponse> {
        let activity = ActivityRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        Self::to_response(pool, activity).await
    }

    /// Activities a user is enrolled in
    pub async fn user_activities(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<ActivityResponse>> {
        UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let activities = ActivityRepository::user_activities(pool, user_id).await?;

        futures::future::try_join_all(
            activities.into_iter().map(|a| Self::to_response(pool, a)),
        )
        .await
    }

    async fn to_response(pool: &PgPool, activity: Activity) -> AppResult<ActivityResponse> {
        let area_name = AreaRepository::find_by_id(pool, &activity.area_id)
            .await?
            .map(|a| a.name)
            .unwrap_or_default();

        let responsibles = ActivityRepository::responsibles(pool, &activity.id).await?;

        Ok(ActivityResponse::from_parts(activity, area_name, responsibles))
    }

    /// Fail unless every id resolves to a user
    async fn resolve_responsibles(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[Uuid],
    ) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Err(AppError::Validation(
                "No valid users were provided as responsibles".to_string(),
            ));
        }

        let users = UserRepository::find_in_list(&mut **tx, ids).await?;
        if users.len() != ids.len() {
            return Err(AppError::Validation(
                "Some of the selected responsibles do not exist".to_string(),
            ));
        }

        Ok(users)
    }

    /// Apply a responsible-list diff with the last-holder role rule
    async fn apply_responsible_diff(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        activity_id: &Uuid,
        previous: &[User],
        current: &[User],
    ) -> AppResult<Vec<Uuid>> {
        let mut affected = Vec::new();

        for removed in previous.iter().filter(|p| !current.iter().any(|c| c.id == p.id)) {
            ActivityRepository::remove_responsible(&mut **tx, activity_id, &removed.id).await?;
            if ActivityRepository::count_responsible_activities(&mut **tx, &removed.id).await? == 0
            {
                UserRepository::remove_role(&mut **tx, &removed.id, roles::ACTIVITY_RESPONSIBLE)
                    .await?;
            }
            affected.push(removed.id);
        }

        for added in current.iter().filter(|c| !previous.iter().any(|p| p.id == c.id)) {
            ActivityRepository::add_responsible(&mut **tx, activity_id, &added.id).await?;
            UserRepository::add_role(&mut **tx, &added.id, roles::ACTIVITY_RESPONSIBLE).await?;
            affected.push(added.id);
        }

        Ok(affected)
    }
}

/// An empty restriction list means no restriction
fn normalize_promotions(list: Option<&[String]>) -> Option<&[String]> {
    match list {
        Some([]) | None => None,
        Some(entries) => Some(entries),
    }
}
