//! User repository

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AreaHours, User},
};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        executor: impl PgExecutor<'_>,
        code: i32,
        name: &str,
        lastname: &str,
        email: &str,
        promotion: i32,
        sex: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (code, name, lastname, email, promotion, sex, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(lastname)
        .bind(email)
        .bind(promotion)
        .bind(sex)
        .bind(password_hash)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Find user by email (for login)
    pub async fn find_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Find all users in an id list
    pub async fn find_in_list(
        executor: impl PgExecutor<'_>,
        ids: &[Uuid],
    ) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(executor)
            .await?;

        Ok(users)
    }

    /// List users with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        search: Option<&str>,
        promotion: Option<i32>,
    ) -> AppResult<(Vec<User>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR lastname ILIKE $1 OR email ILIKE $1)
                AND ($2::int IS NULL OR promotion = $2)
            ORDER BY lastname, name
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(&search_pattern)
        .bind(promotion)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR lastname ILIKE $1 OR email ILIKE $1)
                AND ($2::int IS NULL OR promotion = $2)
            "#,
        )
        .bind(&search_pattern)
        .bind(promotion)
        .fetch_one(pool)
        .await?;

        Ok((users, count))
    }

    /// Update user identity fields
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        name: Option<&str>,
        lastname: Option<&str>,
        email: Option<&str>,
        promotion: Option<i32>,
        sex: Option<&str>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                promotion = COALESCE($5, promotion),
                sex = COALESCE($6, sex),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(lastname)
        .bind(email)
        .bind(promotion)
        .bind(sex)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Update password hash
    pub async fn update_password(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        password_hash: &str,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1"#)
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Set the blocked flag
    pub async fn set_blocked(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        blocked: bool,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE users SET blocked = $2, updated_at = NOW() WHERE id = $1"#)
            .bind(id)
            .bind(blocked)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Get the role set for a user
    pub async fn get_roles(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<Vec<String>> {
        let roles: Vec<String> =
            sqlx::query_scalar(r#"SELECT role FROM user_roles WHERE user_id = $1"#)
                .bind(id)
                .fetch_all(executor)
                .await?;

        Ok(roles)
    }

    /// Grant a role (no-op when already held)
    pub async fn add_role(executor: impl PgExecutor<'_>, id: &Uuid, role: &str) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING"#,
        )
        .bind(id)
        .bind(role)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Revoke a role
    pub async fn remove_role(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        role: &str,
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM user_roles WHERE user_id = $1 AND role = $2"#)
            .bind(id)
            .bind(role)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Apply a signed service-hour delta to a user's ledger for one area.
    ///
    /// Upserts the per-area row and applies the same delta to the user total;
    /// both writes belong to the caller's transaction.
    pub async fn adjust_service_hours(
        conn: &mut PgConnection,
        user_id: &Uuid,
        area_id: &Uuid,
        delta: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_area_hours (user_id, area_id, hours)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, area_id)
            DO UPDATE SET hours = user_area_hours.hours + EXCLUDED.hours
            "#,
        )
        .bind(user_id)
        .bind(area_id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET total_service_hours = total_service_hours + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Per-area service hours for a user
    pub async fn area_hours(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<AreaHours>> {
        let hours = sqlx::query_as::<_, AreaHours>(
            r#"
            SELECT uah.area_id, a.name AS area_name, uah.hours
            FROM user_area_hours uah
            JOIN areas a ON a.id = uah.area_id
            WHERE uah.user_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(hours)
    }

    /// Range of promotion years currently considered active students
    pub async fn promotion_range(executor: impl PgExecutor<'_>) -> AppResult<(i32, i32)> {
        let range: (i32, i32) = sqlx::query_as(
            r#"SELECT first_promotion, last_promotion FROM promotion_settings LIMIT 1"#,
        )
        .fetch_one(executor)
        .await?;

        Ok(range)
    }
}
