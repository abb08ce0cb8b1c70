//! Activity repository

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Activity, User},
};

/// Repository for activity database operations
pub struct ActivityRepository;

impl ActivityRepository {
    /// Create a new activity
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        executor: impl PgExecutor<'_>,
        name: &str,
        date: DateTime<Utc>,
        service_hours: i32,
        area_id: &Uuid,
        payment_id: Option<&Uuid>,
        registration_start_date: DateTime<Utc>,
        registration_end_date: DateTime<Utc>,
        participating_promotions: Option<&[String]>,
        max_participants: i32,
    ) -> AppResult<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (
                name, date, service_hours, area_id, payment_id,
                registration_start_date, registration_end_date,
                participating_promotions, max_participants, available_spaces
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(date)
        .bind(service_hours)
        .bind(area_id)
        .bind(payment_id)
        .bind(registration_start_date)
        .bind(registration_end_date)
        .bind(participating_promotions)
        .bind(max_participants)
        .fetch_one(executor)
        .await?;

        Ok(activity)
    }

    /// Find activity by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
    ) -> AppResult<Option<Activity>> {
        let activity = sqlx::query_as::<_, Activity>(r#"SELECT * FROM activities WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(activity)
    }

    /// Find activity by ID, locking the row for the current transaction
    pub async fn find_by_id_for_update(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
    ) -> AppResult<Option<Activity>> {
        let activity =
            sqlx::query_as::<_, Activity>(r#"SELECT * FROM activities WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(activity)
    }

    /// List activities with optional filters.
    ///
    /// When `visible_area_ids` is supplied, only activities in those areas
    /// are returned (role-based narrowing for non-admin callers).
    pub async fn list(
        pool: &PgPool,
        area_id: Option<&Uuid>,
        upper_date: Option<DateTime<Utc>>,
        search: Option<&str>,
        visible_area_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<Activity>> {
        let search_pattern = search.map(|s| format!("%{}%", s));

        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT * FROM activities
            WHERE
                ($1::uuid IS NULL OR area_id = $1)
                AND ($2::timestamptz IS NULL OR date <= $2)
                AND ($3::text IS NULL OR name ILIKE $3)
                AND ($4::uuid[] IS NULL OR area_id = ANY($4))
            ORDER BY date DESC
            "#,
        )
        .bind(area_id)
        .bind(upper_date)
        .bind(&search_pattern)
        .bind(visible_area_ids)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }

    /// Activities a user is enrolled in
    pub async fn user_activities(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT a.* FROM activities a
            JOIN activity_assignments aa ON aa.activity_id = a.id
            WHERE aa.user_id = $1
            ORDER BY a.date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }

    /// Update activity fields (None leaves the column unchanged)
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        name: Option<&str>,
        date: Option<DateTime<Utc>>,
        service_hours: Option<i32>,
        area_id: Option<&Uuid>,
        registration_start_date: Option<DateTime<Utc>>,
        registration_end_date: Option<DateTime<Utc>>,
        participating_promotions: Option<Option<&[String]>>,
        max_participants: Option<i32>,
        available_spaces: Option<i32>,
    ) -> AppResult<Activity> {
        // participating_promotions distinguishes "leave unchanged" (outer None)
        // from "clear the restriction" (Some(None))
        let (set_promotions, promotions) = match participating_promotions {
            Some(value) => (true, value),
            None => (false, None),
        };

        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET
                name = COALESCE($2, name),
                date = COALESCE($3, date),
                service_hours = COALESCE($4, service_hours),
                area_id = COALESCE($5, area_id),
                registration_start_date = COALESCE($6, registration_start_date),
                registration_end_date = COALESCE($7, registration_end_date),
                participating_promotions = CASE WHEN $8 THEN $9::text[] ELSE participating_promotions END,
                max_participants = COALESCE($10, max_participants),
                available_spaces = COALESCE($11, available_spaces),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(date)
        .bind(service_hours)
        .bind(area_id)
        .bind(registration_start_date)
        .bind(registration_end_date)
        .bind(set_promotions)
        .bind(promotions)
        .bind(max_participants)
        .bind(available_spaces)
        .fetch_one(executor)
        .await?;

        Ok(activity)
    }

    /// Set the blocked flag
    pub async fn set_blocked(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        blocked: bool,
    ) -> AppResult<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET blocked = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(blocked)
        .fetch_one(executor)
        .await?;

        Ok(activity)
    }

    /// Delete an activity, returning the number of deleted rows
    pub async fn delete(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM activities WHERE id = $1"#)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Atomically claim `count` spaces; returns false when not enough remain.
    ///
    /// The guard serializes racing enrollments on the row lock; the loser
    /// sees zero affected rows instead of a constraint violation.
    pub async fn reserve_spaces(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        count: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET available_spaces = available_spaces - $2, updated_at = NOW()
            WHERE id = $1 AND available_spaces >= $2
            "#,
        )
        .bind(id)
        .bind(count)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Release previously claimed spaces
    pub async fn release_spaces(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        count: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE activities
            SET available_spaces = available_spaces + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(count)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Responsible users for an activity
    pub async fn responsibles(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
    ) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM users u
            JOIN activity_responsible ar ON ar.user_id = u.id
            WHERE ar.activity_id = $1
            ORDER BY u.lastname, u.name
            "#,
        )
        .bind(activity_id)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Register a user as responsible for an activity
    pub async fn add_responsible(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_responsible (activity_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Remove a user from an activity's responsible list
    pub async fn remove_responsible(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM activity_responsible WHERE activity_id = $1 AND user_id = $2"#)
            .bind(activity_id)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Check whether a user is responsible for an activity
    pub async fn is_responsible(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: Option<i32> = sqlx::query_scalar(
            r#"SELECT 1 FROM activity_responsible WHERE activity_id = $1 AND user_id = $2"#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(exists.is_some())
    }

    /// Number of activities a user remains responsible for
    pub async fn count_responsible_activities(
        executor: impl PgExecutor<'_>,
        user_id: &Uuid,
    ) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM activity_responsible WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    /// Detach a deleted payment from every activity referencing it
    pub async fn clear_payment_refs(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE activities SET payment_id = NULL, updated_at = NOW() WHERE payment_id = $1"#,
        )
        .bind(payment_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
