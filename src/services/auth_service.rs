//! Authentication service

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::Config,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    utils::crypto,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<(User, Vec<String>, String, String, i64)> {
        // Find user
        let user = UserRepository::find_by_email(pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Blocked users cannot log in
        if user.blocked {
            return Err(AppError::Forbidden("Account is blocked".to_string()));
        }

        // Verify password
        if !crypto::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let roles = UserRepository::get_roles(pool, &user.id).await?;

        // Generate tokens
        let (access_token, expires_in) = Self::generate_access_token(&user, &roles, config)?;
        let refresh_token = Self::generate_refresh_token();

        // Store refresh token in Redis
        let key = format!("refresh_token:{}:{}", user.id, refresh_token);
        let expiry = config.jwt.refresh_token_expiry_days * 24 * 60 * 60;
        redis.set_ex::<_, _, ()>(&key, "1", expiry as u64).await?;

        Ok((user, roles, access_token, refresh_token, expires_in))
    }

    /// Refresh access token, rotating the refresh token
    pub async fn refresh_token(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<(String, String, i64)> {
        // Find the refresh token in Redis (check all users)
        let pattern = format!("refresh_token:*:{}", refresh_token);
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut redis)
            .await?;

        if keys.is_empty() {
            return Err(AppError::InvalidToken);
        }

        // Extract user_id from key
        let key = &keys[0];
        let parts: Vec<&str> = key.split(':').collect();
        if parts.len() != 3 {
            return Err(AppError::InvalidToken);
        }

        let user_id = Uuid::parse_str(parts[1]).map_err(|_| AppError::InvalidToken)?;

        // Get user
        let user = UserRepository::find_by_id(pool, &user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.blocked {
            return Err(AppError::Forbidden("Account is blocked".to_string()));
        }

        let roles = UserRepository::get_roles(pool, &user.id).await?;

        // Delete old refresh token
        redis.del::<_, ()>(key).await?;

        // Generate new tokens
        let (access_token, expires_in) = Self::generate_access_token(&user, &roles, config)?;
        let new_refresh_token = Self::generate_refresh_token();

        // Store new refresh token
        let new_key = format!("refresh_token:{}:{}", user.id, new_refresh_token);
        let expiry = config.jwt.refresh_token_expiry_days * 24 * 60 * 60;
        redis.set_ex::<_, _, ()>(&new_key, "1", expiry as u64).await?;

        Ok((access_token, new_refresh_token, expires_in))
    }

    /// Logout (invalidate tokens)
    pub async fn logout(
        mut redis: ConnectionManager,
        user_id: &Uuid,
        all_sessions: bool,
    ) -> AppResult<()> {
        if all_sessions {
            return Self::force_logout(redis, user_id).await;
        }

        // Without a specific token, drop the newest session key only
        let pattern = format!("refresh_token:{}:*", user_id);
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut redis)
            .await?;

        if let Some(key) = keys.first() {
            redis.del::<_, ()>(key).await?;
        }

        Ok(())
    }

    /// Delete every refresh token of a user so a role change takes effect at
    /// the next token refresh
    pub async fn force_logout(mut redis: ConnectionManager, user_id: &Uuid) -> AppResult<()> {
        let pattern = format!("refresh_token:{}:*", user_id);
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut redis)
            .await?;

        for key in keys {
            redis.del::<_, ()>(&key).await?;
        }

        Ok(())
    }

    /// Force-logout a batch of users, tolerating per-user failures.
    ///
    /// Called after a committed role change; a session-store failure must not
    /// turn the already-applied change into an error response.
    pub async fn force_logout_all(redis: ConnectionManager, user_ids: &[Uuid]) {
        for user_id in user_ids {
            if let Err(e) = Self::force_logout(redis.clone(), user_id).await {
                tracing::warn!(user_id = %user_id, error = ?e, "Failed to invalidate sessions");
            }
        }
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Generate access token
    fn generate_access_token(
        user: &User,
        roles: &[String],
        config: &Config,
    ) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(config.jwt.expiry_hours);
        let expires_in = config.jwt.expiry_hours * 3600;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Generate refresh token
    fn generate_refresh_token() -> String {
        Uuid::new_v4().to_string()
    }
}
