//! Payment repository

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Payment, PaymentAssignment, User},
};

/// Repository for payment database operations
pub struct PaymentRepository;

impl PaymentRepository {
    /// Create a new payment
    pub async fn create(
        executor: impl PgExecutor<'_>,
        name: &str,
        limit_date: DateTime<Utc>,
        amount: f64,
        description: Option<&str>,
        target_users: Option<&str>,
        activity_payment: bool,
    ) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (name, limit_date, amount, description, target_users, activity_payment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(limit_date)
        .bind(amount)
        .bind(description)
        .bind(target_users)
        .bind(activity_payment)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    /// Find payment by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
    ) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(r#"SELECT * FROM payments WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(payment)
    }

    /// List all payments
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Payment>> {
        let payments =
            sqlx::query_as::<_, Payment>(r#"SELECT * FROM payments ORDER BY limit_date DESC"#)
                .fetch_all(pool)
                .await?;

        Ok(payments)
    }

    /// Update payment fields (None leaves the column unchanged)
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        name: Option<&str>,
        limit_date: Option<DateTime<Utc>>,
        amount: Option<f64>,
        description: Option<&str>,
    ) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET
                name = COALESCE($2, name),
                limit_date = COALESCE($3, limit_date),
                amount = COALESCE($4, amount),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(limit_date)
        .bind(amount)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    /// Delete a payment, returning the deleted row when it existed
    pub async fn delete(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<Option<Payment>> {
        let payment =
            sqlx::query_as::<_, Payment>(r#"DELETE FROM payments WHERE id = $1 RETURNING *"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(payment)
    }

    /// Register a treasurer for a payment
    pub async fn add_treasurer(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_treasurers (payment_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(payment_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Remove every treasurer of a payment
    pub async fn clear_treasurers(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM payment_treasurers WHERE payment_id = $1"#)
            .bind(payment_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Treasurers of a payment
    pub async fn treasurers(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM users u
            JOIN payment_treasurers pt ON pt.user_id = u.id
            WHERE pt.payment_id = $1
            ORDER BY u.lastname, u.name
            "#,
        )
        .bind(payment_id)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Check whether a user is a treasurer of a payment
    pub async fn is_treasurer(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: Option<i32> = sqlx::query_scalar(
            r#"SELECT 1 FROM payment_treasurers WHERE payment_id = $1 AND user_id = $2"#,
        )
        .bind(payment_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(exists.is_some())
    }

    /// Payments where a user is a treasurer
    pub async fn payments_where_treasurer(
        executor: impl PgExecutor<'_>,
        user_id: &Uuid,
    ) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.* FROM payments p
            JOIN payment_treasurers pt ON pt.payment_id = p.id
            WHERE pt.user_id = $1
            ORDER BY p.limit_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    /// Find a payment assignment by its (payment, user) pair
    pub async fn find_assignment(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<PaymentAssignment>> {
        let assignment = sqlx::query_as::<_, PaymentAssignment>(
            r#"SELECT * FROM payment_assignments WHERE payment_id = $1 AND user_id = $2"#,
        )
        .bind(payment_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    /// Find a payment assignment by ID
    pub async fn find_assignment_by_id(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
    ) -> AppResult<Option<PaymentAssignment>> {
        let assignment = sqlx::query_as::<_, PaymentAssignment>(
            r#"SELECT * FROM payment_assignments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    /// Insert a payment assignment
    pub async fn insert_assignment(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<PaymentAssignment> {
        let assignment = sqlx::query_as::<_, PaymentAssignment>(
            r#"
            INSERT INTO payment_assignments (payment_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Assignments of a payment
    pub async fn assignments_for_payment(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<Vec<PaymentAssignment>> {
        let assignments = sqlx::query_as::<_, PaymentAssignment>(
            r#"SELECT * FROM payment_assignments WHERE payment_id = $1 ORDER BY created_at"#,
        )
        .bind(payment_id)
        .fetch_all(executor)
        .await?;

        Ok(assignments)
    }

    /// Append voucher keys and mark the assignment completed
    pub async fn complete_assignment(
        executor: impl PgExecutor<'_>,
        id: &Uuid,
        voucher_keys: &[String],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE payment_assignments
            SET voucher_keys = voucher_keys || $2, completed = TRUE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(voucher_keys)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Confirm a completed assignment; zero rows means it was not completed
    pub async fn confirm_assignment(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE payment_assignments
            SET confirmed = TRUE
            WHERE id = $1 AND completed = TRUE
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Clear the completed flag after a rejected submission
    pub async fn reset_assignment(executor: impl PgExecutor<'_>, id: &Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE payment_assignments
            SET completed = FALSE, confirmed = FALSE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete one untouched assignment; returns whether a row was removed
    pub async fn delete_assignment(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM payment_assignments
            WHERE payment_id = $1 AND user_id = $2
              AND completed = FALSE AND voucher_keys = '{}'
            "#,
        )
        .bind(payment_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every untouched assignment of a payment
    pub async fn delete_untouched_assignments(
        executor: impl PgExecutor<'_>,
        payment_id: &Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM payment_assignments
            WHERE payment_id = $1 AND completed = FALSE AND voucher_keys = '{}'
            "#,
        )
        .bind(payment_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
