//! Payment handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::roles,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::PaymentService,
    state::AppState,
};

use super::{
    request::{AssignPaymentRequest, CompletePaymentRequest, CreatePaymentRequest, UpdatePaymentRequest},
    response::{
        PaymentAssignmentsResponse, PaymentDetailResponse, PaymentResponse, PaymentsListResponse,
    },
};

/// List all payments (admin)
pub async fn list_payments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PaymentsListResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;

    let payments = PaymentService::list_payments(state.db()).await?;
    Ok(Json(PaymentsListResponse { payments }))
}

/// Create a standalone payment (admin)
pub async fn create_payment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentResponse>)> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let payment = PaymentService::create_payment(state.db(), payload).await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

/// Payments where the caller is a treasurer
pub async fn list_own_treasurer_payments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PaymentsListResponse>> {
    let payments = PaymentService::payments_where_treasurer(state.db(), &auth_user.id).await?;

    let payments = payments
        .into_iter()
        .map(|payment| PaymentResponse::from_parts(payment, vec![]))
        .collect();

    Ok(Json(PaymentsListResponse { payments }))
}

/// Get one payment with its ledger
pub async fn get_payment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PaymentDetailResponse>> {
    auth_user.require_any(&[roles::ADMIN, roles::AREA_RESPONSIBLE, roles::ACTIVITY_RESPONSIBLE])?;

    let (payment, assignments) = PaymentService::get_payment(state.db(), &id).await?;

    Ok(Json(PaymentDetailResponse { payment, assignments }))
}

/// Update a payment (admin)
pub async fn update_payment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> AppResult<Json<PaymentResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    // Standalone payments only; activity payments follow their activity
    let payment = PaymentService::update_payment(state.db(), &id, payload, false).await?;

    Ok(Json(payment))
}

/// Delete a payment and cascade reference cleanup (admin)
pub async fn delete_payment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    PaymentService::delete_payment(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a payment to a list of users (admin)
pub async fn assign_payment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignPaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentAssignmentsResponse>)> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let assignments =
        PaymentService::assign_to_users(state.db(), &id, &payload.user_ids).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentAssignmentsResponse { assignments }),
    ))
}

/// Delete every untouched assignment of a payment (admin)
pub async fn delete_assignments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    PaymentService::delete_assignments(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one untouched assignment (admin)
pub async fn delete_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    PaymentService::delete_assignment(state.db(), &id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit voucher evidence for an obligation
pub async fn complete_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletePaymentRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    PaymentService::complete(state.db(), &auth_user, &id, &payload.voucher_keys).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirm a completed obligation (treasurer)
pub async fn confirm_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    PaymentService::confirm(state.db(), &auth_user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reject a submission, clearing its completed state (treasurer)
pub async fn reset_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    PaymentService::reset_completed(state.db(), &auth_user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
