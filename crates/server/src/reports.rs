//! Admin reports. Read only.

use api_types::{
    order::OrderView,
    report::{
        CustomerReportRow, DriverReportRow, EmployeeReportRow, OrderReportRow, ReportQuery,
        Revenue,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::ReportRange;

use crate::{ServerError, server::ServerState, user::AuthUser, views};

fn range(query: &ReportQuery) -> ReportRange {
    ReportRange {
        from: query.from,
        to: query.to,
    }
}

pub async fn orders(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<OrderReportRow>>, ServerError> {
    user.require_admin()?;
    let rows = state.engine.orders_report(range(&query)).await?;
    Ok(Json(rows.into_iter().map(views::order_report_row).collect()))
}

pub async fn employees(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<EmployeeReportRow>>, ServerError> {
    user.require_admin()?;
    let rows = state.engine.employees_report(range(&query)).await?;
    Ok(Json(
        rows.into_iter().map(views::employee_report_row).collect(),
    ))
}

pub async fn drivers(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DriverReportRow>>, ServerError> {
    user.require_admin()?;
    let rows = state.engine.drivers_report().await?;
    Ok(Json(rows.into_iter().map(views::driver_report_row).collect()))
}

pub async fn revenue(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Revenue>, ServerError> {
    user.require_admin()?;
    let summary = state.engine.revenue_report(range(&query)).await?;
    Ok(Json(views::revenue(summary)))
}

pub async fn customers(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomerReportRow>>, ServerError> {
    user.require_admin()?;
    let rows = state.engine.customers_report().await?;
    Ok(Json(
        rows.into_iter().map(views::customer_report_row).collect(),
    ))
}

pub async fn returns(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<OrderView>>, ServerError> {
    user.require_admin()?;
    let orders = state.engine.returned_orders_report(range(&query)).await?;
    Ok(Json(orders.into_iter().map(views::order).collect()))
}
