use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{customers, drivers, orders, payments, reports, user, user::AuthUser};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves the basic credentials to an [`AuthUser`] extension.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "credential lookup failed");
            StatusCode::UNAUTHORIZED
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let role = user.role().map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(AuthUser {
        username: user.username,
        role,
    });
    Ok(next.run(request).await)
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", post(orders::order_new).get(orders::list))
        .route("/orders/{id}", get(orders::get).put(orders::update))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/orders/{id}/payment", put(orders::update_payment))
        .route("/orders/{id}/assign", put(orders::assign))
        .route("/orders/{id}/tracking", post(orders::tracking_new))
        .route("/orders/{id}/refund", post(orders::refund))
        .route("/orders/{id}/payout", post(orders::sender_payout))
        .route("/orders/{id}/settle-return", post(orders::settle_return))
}

fn customer_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/customers",
            post(customers::customer_new).get(customers::list),
        )
        .route("/customers/link-orders", post(customers::link_orders))
        .route("/customers/stats", get(reports::customers))
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/customers/{id}/orders", get(customers::orders))
        .route("/customers/{id}/details", get(customers::details))
        .route("/customers/{id}/payout", post(customers::payout))
}

fn fleet_and_payment_routes() -> Router<ServerState> {
    Router::new()
        .route("/drivers", post(drivers::driver_new).get(drivers::list))
        .route(
            "/drivers/{id}",
            get(drivers::get)
                .put(drivers::update)
                .delete(drivers::delete),
        )
        .route("/drivers/{id}/status", put(drivers::update_status))
        .route("/payments", post(payments::payment_new).get(payments::list))
        .route("/payments/{id}/status", put(payments::update_status))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/reports/orders", get(reports::orders))
        .route("/reports/employees", get(reports::employees))
        .route("/reports/drivers", get(reports::drivers))
        .route("/reports/revenue", get(reports::revenue))
        .route("/reports/customers", get(reports::customers))
        .route("/reports/returns", get(reports::returns))
        .route("/users", post(user::user_new).get(user::list))
}

/// Every endpoint, behind basic authentication.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(order_routes())
        .merge(customer_routes())
        .merge(fleet_and_payment_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Serves the API on an already bound listener until the server stops.
pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, policy = engine.transition_policy().as_str(), "courier api listening");

    let state = ServerState {
        engine: Arc::new(engine),
    };
    axum::serve(listener, router(state)).await
}
