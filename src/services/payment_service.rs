//! Payment service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{
        ActivityRepository, AssignmentRepository, PaymentRepository, UserRepository,
    },
    error::{AppError, AppResult},
    handlers::payments::{
        request::{CreatePaymentRequest, UpdatePaymentRequest},
        response::PaymentResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::{Payment, PaymentAssignment},
};

/// Payment service for business logic
pub struct PaymentService;

impl PaymentService {
    /// Create a standalone payment with its treasurers
    pub async fn create_payment(
        pool: &PgPool,
        payload: CreatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        let mut tx = pool.begin().await?;

        let treasurers = UserRepository::find_in_list(&mut *tx, &payload.treasurer).await?;
        if treasurers.len() != payload.treasurer.len() {
            return Err(AppError::NotFound(
                "Some of the selected treasurers do not exist".to_string(),
            ));
        }

        let payment = PaymentRepository::create(
            &mut *tx,
            payload.name.trim(),
            payload.limit_date,
            payload.amount,
            payload.description.as_deref(),
            payload.target_users.as_deref(),
            false,
        )
        .await?;

        for user in &treasurers {
            PaymentRepository::add_treasurer(&mut *tx, &payment.id, &user.id).await?;
        }

        tx.commit().await?;

        Ok(PaymentResponse::from_parts(payment, treasurers))
    }

    /// Update a payment. Activity-linked payments are only editable when the
    /// caller explicitly includes them.
    pub async fn update_payment(
        pool: &PgPool,
        id: &Uuid,
        payload: UpdatePaymentRequest,
        include_activity_payments: bool,
    ) -> AppResult<PaymentResponse> {
        let mut tx = pool.begin().await?;

        let payment = PaymentRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if !include_activity_payments && payment.activity_payment {
            return Err(AppError::Validation(
                "Payments linked to activities cannot be updated".to_string(),
            ));
        }

        let updated = PaymentRepository::update(
            &mut *tx,
            id,
            payload.name.as_deref().map(str::trim),
            payload.limit_date,
            payload.amount,
            payload.description.as_deref().map(str::trim),
        )
        .await?;

        // A supplied treasurer list replaces the current one
        if let Some(ids) = payload.treasurer.as_deref() {
            let users = UserRepository::find_in_list(&mut *tx, ids).await?;
            if users.len() != ids.len() {
                return Err(AppError::NotFound(
                    "Some of the selected treasurers do not exist".to_string(),
                ));
            }

            PaymentRepository::clear_treasurers(&mut *tx, id).await?;
            for user in &users {
                PaymentRepository::add_treasurer(&mut *tx, id, &user.id).await?;
            }
        }

        let treasurers = PaymentRepository::treasurers(&mut *tx, id).await?;

        tx.commit().await?;

        Ok(PaymentResponse::from_parts(updated, treasurers))
    }

    /// Assign a payment to a list of users, reusing existing obligations
    pub async fn assign_to_users(
        pool: &PgPool,
        payment_id: &Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<Vec<PaymentAssignment>> {
        if user_ids.is_empty() {
            return Err(AppError::Validation(
                "The user list must not be empty".to_string(),
            ));
        }

        let mut tx = pool.begin().await?;

        let payment = PaymentRepository::find_by_id(&mut *tx, payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        let users = UserRepository::find_in_list(&mut *tx, user_ids).await?;
        if users.len() != user_ids.len() {
            return Err(AppError::Validation(
                "Some of the provided users do not exist".to_string(),
            ));
        }

        let mut assignments = Vec::with_capacity(users.len());
        for user in &users {
            let existing =
                PaymentRepository::find_assignment(&mut *tx, &payment.id, &user.id).await?;
            let assignment = match existing {
                Some(assignment) => assignment,
                None => PaymentRepository::insert_assignment(&mut *tx, &payment.id, &user.id).await?,
            };
            assignments.push(assignment);
        }

        tx.commit().await?;

        Ok(assignments)
    }

    /// Attach voucher evidence and mark the obligation completed
    pub async fn complete(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        assignment_id: &Uuid,
        voucher_keys: &[String],
    ) -> AppResult<()> {
        if voucher_keys.is_empty() {
            return Err(AppError::Validation(
                "At least one voucher is required".to_string(),
            ));
        }

        let assignment = Self::get_assignment(pool, assignment_id).await?;

        // The obligated user submits their own evidence; staff can too
        if assignment.user_id != auth_user.id {
            Self::ensure_treasurer(pool, auth_user, &assignment.payment_id).await?;
        }

        let updated = PaymentRepository::complete_assignment(pool, assignment_id, voucher_keys).await?;
        if updated == 0 {
            return Err(AppError::NotFound("Payment assignment not found".to_string()));
        }

        Ok(())
    }

    /// Confirm a completed obligation (second phase)
    pub async fn confirm(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        assignment_id: &Uuid,
    ) -> AppResult<()> {
        let assignment = Self::get_assignment(pool, assignment_id).await?;
        Self::ensure_treasurer(pool, auth_user, &assignment.payment_id).await?;

        let updated = PaymentRepository::confirm_assignment(pool, assignment_id).await?;
        if updated == 0 {
            return Err(AppError::Conflict(
                "Only a completed payment assignment can be confirmed".to_string(),
            ));
        }

        Ok(())
    }

    /// Clear the completed flag after a rejected submission
    pub async fn reset_completed(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        assignment_id: &Uuid,
    ) -> AppResult<()> {
        let assignment = Self::get_assignment(pool, assignment_id).await?;
        Self::ensure_treasurer(pool, auth_user, &assignment.payment_id).await?;

        let updated = PaymentRepository::reset_assignment(pool, assignment_id).await?;
        if updated == 0 {
            return Err(AppError::NotFound("Payment assignment not found".to_string()));
        }

        Ok(())
    }

    /// Delete a payment, cascading reference cleanup into activities and
    /// their assignments
    pub async fn delete_payment(pool: &PgPool, id: &Uuid) -> AppResult<PaymentResponse> {
        let mut tx = pool.begin().await?;

        // Order matters: the payment-assignment references resolve through
        // the payment's rows, which go away with it
        AssignmentRepository::clear_payment_assignment_refs(&mut *tx, id).await?;
        ActivityRepository::clear_payment_refs(&mut *tx, id).await?;

        let treasurers = PaymentRepository::treasurers(&mut *tx, id).await?;

        let payment = PaymentRepository::delete(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        tx.commit().await?;

        Ok(PaymentResponse::from_parts(payment, treasurers))
    }

    /// Delete every untouched assignment of a payment
    pub async fn delete_assignments(pool: &PgPool, payment_id: &Uuid) -> AppResult<u64> {
        PaymentRepository::find_by_id(pool, payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        PaymentRepository::delete_untouched_assignments(pool, payment_id).await
    }

    /// Delete one assignment; completed or vouchered rows are kept
    pub async fn delete_assignment(
        pool: &PgPool,
        payment_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        let assignment = PaymentRepository::find_assignment(pool, payment_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment assignment not found".to_string()))?;

        if !assignment.is_deletable() {
            return Err(AppError::Conflict(
                "A completed or vouchered payment assignment cannot be deleted".to_string(),
            ));
        }

        let deleted = PaymentRepository::delete_assignment(pool, payment_id, user_id).await?;
        if !deleted {
            return Err(AppError::NotFound("Payment assignment not found".to_string()));
        }

        Ok(())
    }

    /// List all payments
    pub async fn list_payments(pool: &PgPool) -> AppResult<Vec<PaymentResponse>> {
        let payments = PaymentRepository::list(pool).await?;

        futures::future::try_join_all(payments.into_iter().map(|payment| async move {
            let treasurers = PaymentRepository::treasurers(pool, &payment.id).await?;
            Ok::<_, AppError>(PaymentResponse::from_parts(payment, treasurers))
        }))
        .await
    }

    /// Fetch one payment with its treasurers and assignments
    pub async fn get_payment(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<(PaymentResponse, Vec<PaymentAssignment>)> {
        let payment = PaymentRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        let treasurers = PaymentRepository::treasurers(pool, id).await?;
        let assignments = PaymentRepository::assignments_for_payment(pool, id).await?;

        Ok((PaymentResponse::from_parts(payment, treasurers), assignments))
    }

    /// Payments where the user is a treasurer
    pub async fn payments_where_treasurer(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> AppResult<Vec<Payment>> {
        PaymentRepository::payments_where_treasurer(pool, user_id).await
    }

    async fn get_assignment(pool: &PgPool, id: &Uuid) -> AppResult<PaymentAssignment> {
        PaymentRepository::find_assignment_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment assignment not found".to_string()))
    }

    /// Admins and the payment's treasurers may manage its ledger
    async fn ensure_treasurer(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        payment_id: &Uuid,
    ) -> AppResult<()> {
        if auth_user.is_admin() {
            return Ok(());
        }

        if PaymentRepository::is_treasurer(pool, payment_id, &auth_user.id).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(
            "Caller is not a treasurer of this payment".to_string(),
        ))
    }
}
