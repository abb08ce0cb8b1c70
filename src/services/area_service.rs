//! Area service

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::repositories::{AreaRepository, UserRepository},
    error::{AppError, AppResult},
    handlers::areas::{
        request::{CreateAreaRequest, UpdateAreaRequest},
        response::AreaResponse,
    },
    models::{PromotionGroup, User},
    services::AuthService,
};

/// Area service for business logic
pub struct AreaService;

impl AreaService {
    /// Create a new area and grant the responsible role to its managers
    pub async fn create_area(
        pool: &PgPool,
        redis: ConnectionManager,
        payload: CreateAreaRequest,
    ) -> AppResult<AreaResponse> {
        let mut tx = pool.begin().await?;

        let users = Self::resolve_responsibles(&mut tx, &payload.responsible).await?;

        let area = AreaRepository::create(
            &mut *tx,
            payload.name.trim(),
            payload.color.as_deref(),
        )
        .await
        .map_err(map_duplicate_name)?;

        for user in &users {
            AreaRepository::add_responsible(&mut *tx, &area.id, &user.id).await?;
            UserRepository::add_role(&mut *tx, &user.id, roles::AREA_RESPONSIBLE).await?;
        }

        tx.commit().await?;

        let affected: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        AuthService::force_logout_all(redis, &affected).await;

        Ok(AreaResponse::from_parts(area, users, None))
    }

    /// Update an area, diffing the responsible list
    pub async fn update_area(
        pool: &PgPool,
        redis: ConnectionManager,
        id: &Uuid,
        payload: UpdateAreaRequest,
    ) -> AppResult<AreaResponse> {
        let mut tx = pool.begin().await?;

        let area = AreaRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Area not found".to_string()))?;

        let users = Self::resolve_responsibles(&mut tx, &payload.responsible).await?;

        let updated = AreaRepository::update(
            &mut *tx,
            &area.id,
            payload.name.trim(),
            payload.color.as_deref(),
        )
        .await
        .map_err(map_duplicate_name)?;

        let previous = AreaRepository::responsibles(&mut *tx, &area.id).await?;
        let affected =
            Self::apply_responsible_diff(&mut tx, &area.id, &previous, &users).await?;

        tx.commit().await?;

        AuthService::force_logout_all(redis, &affected).await;

        Ok(AreaResponse::from_parts(updated, users, None))
    }

    /// Delete an area; rejected while activities still reference it
    pub async fn delete_area(pool: &PgPool, redis: ConnectionManager, id: &Uuid) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        if AreaRepository::count_activities(&mut *tx, id).await? > 0 {
            return Err(AppError::Conflict(
                "The area still owns activities and cannot be deleted".to_string(),
            ));
        }

        let previous = AreaRepository::responsibles(&mut *tx, id).await?;

        let deleted = AreaRepository::delete(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Area not found".to_string()));
        }

        // The membership rows are gone with the area; drop the role from
        // users not responsible for any other area
        let mut affected = Vec::new();
        for user in &previous {
            if AreaRepository::count_responsible_areas(&mut *tx, &user.id).await? == 0 {
                UserRepository::remove_role(&mut *tx, &user.id, roles::AREA_RESPONSIBLE).await?;
            }
            affected.push(user.id);
        }

        tx.commit().await?;

        AuthService::force_logout_all(redis, &affected).await;

        Ok(())
    }

    /// Toggle the blocked flag
    pub async fn set_blocked(pool: &PgPool, id: &Uuid, blocked: bool) -> AppResult<AreaResponse> {
        AreaRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Area not found".to_string()))?;

        let area = AreaRepository::set_blocked(pool, id, blocked).await?;
        let responsibles = AreaRepository::responsibles(pool, id).await?;

        Ok(AreaResponse::from_parts(area, responsibles, None))
    }

    /// List all areas with their responsible users
    pub async fn list_areas(pool: &PgPool) -> AppResult<Vec<AreaResponse>> {
        let areas = AreaRepository::list(pool).await?;

        let responses = futures::future::try_join_all(areas.into_iter().map(|area| async move {
            let responsibles = AreaRepository::responsibles(pool, &area.id).await?;
            Ok::<_, AppError>(AreaResponse::from_parts(area, responsibles, None))
        }))
        .await?;

        Ok(responses)
    }

    /// Fetch one area, enriching responsibles with their promotion group.
    /// The enrichment is non-critical and degrades to omitted on error.
    pub async fn get_area(pool: &PgPool, id: &Uuid) -> AppResult<AreaResponse> {
        let area = AreaRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Area not found".to_string()))?;

        let responsibles = AreaRepository::responsibles(pool, &area.id).await?;

        let range = UserRepository::promotion_range(pool).await.ok();
        let groups = responsibles
            .iter()
            .map(|user| range.map(|(first, last)| PromotionGroup::classify(user.promotion, first, last)))
            .collect();

        Ok(AreaResponse::from_parts(area, responsibles, Some(groups)))
    }

    /// Fail unless every id resolves to a user
    async fn resolve_responsibles(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[Uuid],
    ) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Err(AppError::Validation(
                "At least one responsible user is required".to_string(),
            ));
        }

        let users = UserRepository::find_in_list(&mut **tx, ids).await?;
        if users.len() != ids.len() {
            return Err(AppError::NotFound(
                "Some of the selected responsible users do not exist".to_string(),
            ));
        }

        Ok(users)
    }

    /// Apply a responsible-list diff: revoke the role from removed users that
    /// hold no other area, grant it to added ones. Returns the users whose
    /// membership changed.
    async fn apply_responsible_diff(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        area_id: &Uuid,
        previous: &[User],
        current: &[User],
    ) -> AppResult<Vec<Uuid>> {
        let mut affected = Vec::new();

        for removed in previous.iter().filter(|p| !current.iter().any(|c| c.id == p.id)) {
            AreaRepository::remove_responsible(&mut **tx, area_id, &removed.id).await?;
            if AreaRepository::count_responsible_areas(&mut **tx, &removed.id).await? == 0 {
                UserRepository::remove_role(&mut **tx, &removed.id, roles::AREA_RESPONSIBLE)
                    .await?;
            }
            affected.push(removed.id);
        }

        for added in current.iter().filter(|c| !previous.iter().any(|p| p.id == c.id)) {
            AreaRepository::add_responsible(&mut **tx, area_id, &added.id).await?;
            UserRepository::add_role(&mut **tx, &added.id, roles::AREA_RESPONSIBLE).await?;
            affected.push(added.id);
        }

        Ok(affected)
    }
}

/// Surface the store's duplicate-key error as the domain name conflict
fn map_duplicate_name(err: AppError) -> AppError {
    match err {
        AppError::AlreadyExists(_) => {
            AppError::AlreadyExists("An area with that name already exists".to_string())
        }
        other => other,
    }
}
