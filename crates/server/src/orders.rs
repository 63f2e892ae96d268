//! Orders API endpoints.

use api_types::order::{
    DriverAssign, OrderList, OrderNew, OrderUpdate, OrderView, PaymentUpdate, RefundNew,
    SenderPayoutNew, StatusUpdate, TrackingNew,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewOrderCmd, OrderListFilter, UpdateOrderCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser, views};

pub async fn order_new(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<OrderNew>,
) -> Result<(StatusCode, Json<OrderView>), ServerError> {
    let cmd = NewOrderCmd {
        created_by: user.username,
        sender_customer_id: payload.sender_customer_id,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        receiver_name: payload.receiver_name,
        receiver_phone: payload.receiver_phone,
        origin: payload.origin,
        destination: payload.destination,
        product_details: payload.product_details,
        pieces: payload.pieces,
        weight: payload.weight,
        product_price_minor: payload.product_price_minor,
        shipping_cost_minor: payload.shipping_cost_minor,
        price_minor: payload.price_minor,
        driver_id: payload.driver_id,
        order_number: payload.order_number,
    };
    let order = state.engine.create_order(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::order(order))))
}

pub async fn list(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<OrderList>,
) -> Result<Json<Vec<OrderView>>, ServerError> {
    let filter = OrderListFilter {
        status: query.status.map(views::engine_order_status),
        driver_id: query.driver_id,
        sender_customer_id: query.sender_customer_id,
        from: query.from,
        to: query.to,
    };
    let orders = state.engine.list_orders(&filter).await?;
    Ok(Json(orders.into_iter().map(views::order).collect()))
}

pub async fn get(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderView>, ServerError> {
    Ok(Json(views::order(state.engine.order(order_id).await?)))
}

pub async fn update(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<OrderUpdate>,
) -> Result<Json<OrderView>, ServerError> {
    if payload == OrderUpdate::default() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }
    let cmd = UpdateOrderCmd {
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        receiver_name: payload.receiver_name,
        receiver_phone: payload.receiver_phone,
        origin: payload.origin,
        destination: payload.destination,
        product_details: payload.product_details,
        pieces: payload.pieces,
        weight: payload.weight,
        product_price_minor: payload.product_price_minor,
        shipping_cost_minor: payload.shipping_cost_minor,
        price_minor: payload.price_minor,
        return_reason: payload.return_reason,
        driver_id: payload.driver_id,
    };
    let order = state.engine.update_order(order_id, cmd).await?;
    Ok(Json(views::order(order)))
}

pub async fn update_status(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state
        .engine
        .update_status(
            order_id,
            views::engine_order_status(payload.status),
            payload.location.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn update_payment(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state
        .engine
        .update_payment_status(order_id, views::engine_payment_status(payload.payment_status))
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn assign(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<DriverAssign>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state
        .engine
        .assign_driver(order_id, payload.driver_id)
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn tracking_new(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<TrackingNew>,
) -> Result<(StatusCode, Json<OrderView>), ServerError> {
    let order = state
        .engine
        .add_tracking_update(
            order_id,
            &payload.status,
            payload.location.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::order(order))))
}

pub async fn refund(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<RefundNew>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state
        .engine
        .refund_order(order_id, payload.amount_minor, payload.notes.as_deref())
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn sender_payout(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<SenderPayoutNew>,
) -> Result<Json<OrderView>, ServerError> {
    user.require_admin()?;
    let order = state
        .engine
        .payout_to_sender(order_id, payload.amount_minor, &user.username)
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn settle_return(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderView>, ServerError> {
    let order = state.engine.settle_return_to_customer(order_id).await?;
    Ok(Json(views::order(order)))
}
