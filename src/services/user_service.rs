//! User service

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    handlers::users::request::{CreateUserRequest, UpdateUserRequest},
    models::{AreaHours, User},
    services::AuthService,
    utils::{crypto, validation},
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Create a new scholarship holder
    pub async fn create_user(pool: &PgPool, payload: CreateUserRequest) -> AppResult<User> {
        validation::validate_email(&payload.email)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_password(&payload.password)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let password_hash = crypto::hash_password(&payload.password)?;

        let mut tx = pool.begin().await?;

        let user = UserRepository::create(
            &mut *tx,
            payload.code,
            validation::sanitize_string(&payload.name).as_str(),
            validation::sanitize_string(&payload.lastname).as_str(),
            &payload.email,
            payload.promotion,
            &payload.sex,
            &password_hash,
        )
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists("A user with that code or email already exists".to_string())
            }
            other => other,
        })?;

        UserRepository::add_role(&mut *tx, &user.id, roles::SCHOLARSHIP_HOLDER).await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get a user's role set
    pub async fn get_roles(pool: &PgPool, id: &Uuid) -> AppResult<Vec<String>> {
        UserRepository::get_roles(pool, id).await
    }

    /// Per-area service hours for a user
    pub async fn get_area_hours(pool: &PgPool, id: &Uuid) -> AppResult<Vec<AreaHours>> {
        UserRepository::area_hours(pool, id).await
    }

    /// List users with pagination
    pub async fn list_users(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        promotion: Option<i32>,
    ) -> AppResult<(Vec<User>, i64)> {
        let offset = ((page - 1) * per_page) as i64;
        let limit = per_page as i64;

        UserRepository::list(pool, offset, limit, search, promotion).await
    }

    /// Update identity fields (admin)
    pub async fn update_user(
        pool: &PgPool,
        id: &Uuid,
        payload: UpdateUserRequest,
    ) -> AppResult<User> {
        if let Some(email) = payload.email.as_deref() {
            validation::validate_email(email).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        // Existence check first so a missing user reports 404, not a no-op
        Self::get_user(pool, id).await?;

        UserRepository::update(
            pool,
            id,
            payload.name.as_deref(),
            payload.lastname.as_deref(),
            payload.email.as_deref(),
            payload.promotion,
            payload.sex.as_deref(),
        )
        .await
    }

    /// Change a user's own password
    pub async fn update_password(
        pool: &PgPool,
        id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validation::validate_password(new_password)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = Self::get_user(pool, id).await?;

        if !crypto::verify_password(current_password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = crypto::hash_password(new_password)?;
        UserRepository::update_password(pool, id, &password_hash).await
    }

    /// Block or unblock a user; blocking invalidates their sessions
    pub async fn set_blocked(
        pool: &PgPool,
        redis: ConnectionManager,
        id: &Uuid,
        blocked: bool,
    ) -> AppResult<()> {
        Self::get_user(pool, id).await?;
        UserRepository::set_blocked(pool, id, blocked).await?;

        if blocked {
            AuthService::force_logout_all(redis, std::slice::from_ref(id)).await;
        }

        Ok(())
    }
}
