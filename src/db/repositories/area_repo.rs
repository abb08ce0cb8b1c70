//! Area repository

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Area, User},
};

/// Repository for area database operations
pub struct AreaRepository;

impl AreaRepository {
    /// Create a new area
    pub async fn create(
        executor: impl PgExecutor<'_>,
        name: &str,
        color: Option<&str>,
    ) -> AppResult<Area> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            INSERT INTO areas (name, color)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(color)
        .fetch_one(executor)
        .await?;

        Ok(area)
    }

    /// Find area by ID
    pub async fn find_by_id(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<Option<Area>> {
        let area = sqlx::query_as::<_, Area>(r#"SELECT * FROM areas WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(area)
    }

    /// List all areas
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Area>> {
        let areas = sqlx::query_as::<_, Area>(r#"SELECT * FROM areas ORDER BY name"#)
            .fetch_all(pool)
            .await?;

        Ok(areas)
    }

    /// Update name and color
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        name: &str,
        color: Option<&str>,
    ) -> AppResult<Area> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            UPDATE areas
            SET name = $2, color = COALESCE($3, color), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_one(executor)
        .await?;

        Ok(area)
    }

    /// Set the blocked flag
    pub async fn set_blocked(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        blocked: bool,
    ) -> AppResult<Area> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            UPDATE areas
            SET blocked = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(blocked)
        .fetch_one(executor)
        .await?;

        Ok(area)
    }

    /// Delete an area, returning the number of deleted rows
    pub async fn delete(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM areas WHERE id = $1"#)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Responsible users for an area
    pub async fn responsibles(executor: impl PgExecutor<'_>, area_id: &Uuid) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM users u
            JOIN area_responsible ar ON ar.user_id = u.id
            WHERE ar.area_id = $1
            ORDER BY u.lastname, u.name
            "#,
        )
        .bind(area_id)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Register a user as responsible for an area
    pub async fn add_responsible(
        executor: impl PgExecutor<'_>,
        area_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO area_responsible (area_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(area_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Remove a user from an area's responsible list
    pub async fn remove_responsible(
        executor: impl PgExecutor<'_>,
        area_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM area_responsible WHERE area_id = $1 AND user_id = $2"#)
            .bind(area_id)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Check whether a user is responsible for an area
    pub async fn is_responsible(
        executor: impl PgExecutor<'_>,
        area_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: Option<i32> = sqlx::query_scalar(
            r#"SELECT 1 FROM area_responsible WHERE area_id = $1 AND user_id = $2"#,
        )
        .bind(area_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(exists.is_some())
    }

    /// Areas where a user is responsible
    pub async fn areas_where_responsible(
        executor: impl PgExecutor<'_>,
        user_id: &Uuid,
    ) -> AppResult<Vec<Area>> {
        let areas = sqlx::query_as::<_, Area>(
            r#"
            SELECT a.* FROM areas a
            JOIN area_responsible ar ON ar.area_id = a.id
            WHERE ar.user_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(areas)
    }

    /// Number of areas a user remains responsible for
    pub async fn count_responsible_areas(
        executor: impl PgExecutor<'_>,
        user_id: &Uuid,
    ) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM area_responsible WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    /// Number of activities owned by an area (delete guard)
    pub async fn count_activities(executor: impl PgExecutor<'_>, area_id: &Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM activities WHERE area_id = $1"#)
                .bind(area_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }
}
