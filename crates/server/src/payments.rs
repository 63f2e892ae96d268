//! Payment records API endpoints.

use api_types::payment::{PaymentNew, PaymentStatusUpdate, PaymentView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::NewPaymentCmd;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser, views};

pub async fn payment_new(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentView>), ServerError> {
    let mut cmd = NewPaymentCmd::new(
        payload.order_id,
        payload.amount_minor,
        views::engine_payment_method(payload.method),
    );
    if let Some(transaction_id) = payload.transaction_id {
        cmd = cmd.transaction_id(transaction_id);
    }
    let payment = state.engine.create_payment(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::payment(payment))))
}

pub async fn update_status(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<PaymentStatusUpdate>,
) -> Result<Json<PaymentView>, ServerError> {
    let payment = state
        .engine
        .update_payment_record_status(
            payment_id,
            views::engine_payment_record_status(payload.status),
            payload.transaction_id.as_deref(),
        )
        .await?;
    Ok(Json(views::payment(payment)))
}

pub async fn list(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PaymentView>>, ServerError> {
    let payments = state.engine.payments().await?;
    Ok(Json(payments.into_iter().map(views::payment).collect()))
}
