//! Activity assignment repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{constants::RESULTS_PER_PAGE, error::AppResult, models::Assignment};

/// Assignment joined with its activity, area and user data for listings
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub completed: bool,
    pub additional_service_hours: Option<i32>,
    pub pending_payment: bool,
    pub payment_assignment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub activity_name: String,
    pub activity_date: DateTime<Utc>,
    pub activity_service_hours: i32,
    pub area_id: Uuid,
    pub area_name: String,
    pub user_name: String,
    pub user_lastname: String,
    pub user_email: String,
    pub user_promotion: i32,
}

/// Filters for assignment listings
#[derive(Debug, Default)]
pub struct AssignmentFilter<'a> {
    pub user_id: Option<&'a Uuid>,
    pub activity_id: Option<&'a Uuid>,
    /// Case-insensitive substring match on the activity name
    pub search: Option<&'a str>,
    pub lower_date: Option<DateTime<Utc>>,
    pub upper_date: Option<DateTime<Utc>>,
    /// Zero-based page index; None returns the full listing
    pub page: Option<u32>,
}

/// Repository for activity assignment database operations
pub struct AssignmentRepository;

impl AssignmentRepository {
    /// Insert a single assignment
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
        completed: bool,
        additional_service_hours: Option<i32>,
        pending_payment: bool,
        payment_assignment_id: Option<&Uuid>,
    ) -> AppResult<Assignment> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO activity_assignments (
                activity_id, user_id, completed, additional_service_hours,
                pending_payment, payment_assignment_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .bind(completed)
        .bind(additional_service_hours)
        .bind(pending_payment)
        .bind(payment_assignment_id)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Insert assignments for a batch of users in one statement
    pub async fn insert_many(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_ids: &[Uuid],
        completed: bool,
        pending_payment: bool,
    ) -> AppResult<Vec<Assignment>> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO activity_assignments (activity_id, user_id, completed, pending_payment)
            SELECT $1, u, $3, $4 FROM UNNEST($2::uuid[]) AS u
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(user_ids)
        .bind(completed)
        .bind(pending_payment)
        .fetch_all(executor)
        .await?;

        Ok(assignments)
    }

    /// Find one assignment, locking the row for the current transaction
    pub async fn find_for_update(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM activity_assignments
            WHERE activity_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    /// Update completion state and/or additional hours (None leaves unchanged)
    pub async fn update_flags(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
        completed: Option<bool>,
        additional_service_hours: Option<i32>,
    ) -> AppResult<Assignment> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE activity_assignments
            SET
                completed = COALESCE($3, completed),
                additional_service_hours = COALESCE($4, additional_service_hours)
            WHERE activity_id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .bind(completed)
        .bind(additional_service_hours)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Delete one assignment, returning the deleted row when it existed
    pub async fn delete(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            DELETE FROM activity_assignments
            WHERE activity_id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    /// Number of live assignments for an activity
    pub async fn count_for_activity(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM activity_assignments WHERE activity_id = $1"#,
        )
        .bind(activity_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Completed assignments for an activity
    pub async fn completed_for_activity(
        executor: impl PgExecutor<'_>,
        activity_id: &Uuid,
    ) -> AppResult<Vec<Assignment>> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"SELECT * FROM activity_assignments WHERE activity_id = $1 AND completed = TRUE"#,
        )
        .bind(activity_id)
        .fetch_all(executor)
        .await?;

        Ok(assignments)
    }

    /// List assignments with joined activity/user data.
    ///
    /// Sorted by activity id, completed descending, pending payment
    /// ascending; paginated with a fixed page size when a page index is
    /// supplied.
    pub async fn list(pool: &PgPool, filter: &AssignmentFilter<'_>) -> AppResult<Vec<AssignmentDetail>> {
        let search_pattern = filter.search.map(|s| format!("%{}%", s));
        // LIMIT NULL disables pagination
        let (offset, limit): (i64, Option<i64>) = match filter.page {
            Some(page) => (
                (page as i64) * (RESULTS_PER_PAGE as i64),
                Some(RESULTS_PER_PAGE as i64),
            ),
            None => (0, None),
        };

        let assignments = sqlx::query_as::<_, AssignmentDetail>(
            r#"
            SELECT
                aa.id, aa.activity_id, aa.user_id, aa.completed,
                aa.additional_service_hours, aa.pending_payment,
                aa.payment_assignment_id, aa.created_at,
                a.name AS activity_name,
                a.date AS activity_date,
                a.service_hours AS activity_service_hours,
                a.area_id,
                ar.name AS area_name,
                u.name AS user_name,
                u.lastname AS user_lastname,
                u.email AS user_email,
                u.promotion AS user_promotion
            FROM activity_assignments aa
            JOIN activities a ON a.id = aa.activity_id
            JOIN areas ar ON ar.id = a.area_id
            JOIN users u ON u.id = aa.user_id
            WHERE
                ($1::uuid IS NULL OR aa.user_id = $1)
                AND ($2::uuid IS NULL OR aa.activity_id = $2)
                AND ($3::text IS NULL OR a.name ILIKE $3)
                AND ($4::timestamptz IS NULL OR a.date >= $4)
                AND ($5::timestamptz IS NULL OR a.date <= $5)
            ORDER BY aa.activity_id, aa.completed DESC, aa.pending_payment ASC
            OFFSET $6 LIMIT $7
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.activity_id)
        .bind(&search_pattern)
        .bind(filter.lower_date)
        .bind(filter.upper_date)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    /// Detach a deleted payment's assignments from every activity assignment
    pub async fn clear_payment_assignment_refs(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE activity_assignments aa
            SET payment_assignment_id = NULL, pending_payment = FALSE
            FROM payment_assignments pa
            WHERE aa.payment_assignment_id = pa.id AND pa.payment_id = $1
            "#,
        )
        .bind(payment_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
