//! Customers API endpoints.

use api_types::customer::{
    CustomerDetails, CustomerNew, CustomerUpdate, CustomerView, LinkedOrders, PayoutNew,
};
use api_types::order::OrderView;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewCustomerCmd, UpdateCustomerCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser, views};

pub async fn customer_new(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let cmd = NewCustomerCmd {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        notes: payload.notes,
        created_by: user.username,
    };
    let customer = state.engine.create_customer(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::customer(customer))))
}

pub async fn list(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomerView>>, ServerError> {
    let customers = state.engine.customers().await?;
    Ok(Json(customers.into_iter().map(views::customer).collect()))
}

pub async fn get(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    Ok(Json(views::customer(
        state.engine.customer(customer_id).await?,
    )))
}

pub async fn update(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CustomerUpdate>,
) -> Result<Json<CustomerView>, ServerError> {
    let cmd = UpdateCustomerCmd {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        notes: payload.notes,
    };
    let customer = state.engine.update_customer(customer_id, cmd).await?;
    Ok(Json(views::customer(customer)))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    user.require_admin()?;
    state.engine.delete_customer(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn orders(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<OrderView>>, ServerError> {
    let orders = state.engine.customer_orders(customer_id).await?;
    Ok(Json(orders.into_iter().map(views::order).collect()))
}

pub async fn details(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerDetails>, ServerError> {
    let details = state.engine.customer_details(customer_id).await?;
    Ok(Json(views::customer_details(details)))
}

pub async fn payout(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<PayoutNew>,
) -> Result<Json<CustomerView>, ServerError> {
    user.require_admin()?;
    let customer = state
        .engine
        .payout_customer(
            customer_id,
            payload.amount_minor,
            payload.notes.as_deref(),
            &user.username,
        )
        .await?;
    Ok(Json(views::customer(customer)))
}

pub async fn link_orders(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<LinkedOrders>, ServerError> {
    user.require_admin()?;
    let linked = state.engine.link_orders_to_customers().await?;
    Ok(Json(LinkedOrders { linked }))
}
