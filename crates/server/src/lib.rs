use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorBody;
pub use server::{ServerState, router, run_with_listener};

mod customers;
mod drivers;
mod orders;
mod payments;
mod reports;
mod server;
mod user;
mod views;

pub use user::AuthUser;

/// Failure of a request handler, rendered as an [`ErrorBody`].
pub enum ServerError {
    Engine(EngineError),
    /// Malformed request the engine never saw.
    Generic(String),
}

impl ServerError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        let err = match self {
            ServerError::Generic(message) => {
                return (StatusCode::BAD_REQUEST, "bad_request", message);
            }
            ServerError::Engine(err) => err,
        };
        let kind = err.kind();
        let status = match &err {
            EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::ExistingKey(_) | EngineError::InvalidState(_) | EngineError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            EngineError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
            EngineError::Database(db_err) => {
                tracing::error!(error = %db_err, "request failed on the database");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind,
                    "internal server error".to_string(),
                );
            }
        };
        (status, kind, err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, error) = self.parts();
        let body = ErrorBody {
            kind: kind.to_string(),
            error,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::*;

    #[test]
    fn engine_errors_map_to_http_statuses() {
        let cases = [
            (EngineError::KeyNotFound("order".into()), StatusCode::NOT_FOUND, "not_found"),
            (EngineError::ExistingKey("ORD-1".into()), StatusCode::CONFLICT, "already_exists"),
            (EngineError::InvalidState("busy".into()), StatusCode::CONFLICT, "invalid_state"),
            (EngineError::Conflict("stale".into()), StatusCode::CONFLICT, "conflict"),
            (
                EngineError::InvalidArgument("price".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_argument",
            ),
            (EngineError::Forbidden("admin".into()), StatusCode::FORBIDDEN, "forbidden"),
        ];
        for (err, status, kind) in cases {
            let (got_status, got_kind, _) = ServerError::from(err).parts();
            assert_eq!(got_status, status);
            assert_eq!(got_kind, kind);
        }
    }

    #[test]
    fn database_errors_are_masked() {
        let err = EngineError::Database(DbErr::Custom("secret table".to_string()));
        let (status, _, message) = ServerError::from(err).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal server error");
    }

    #[test]
    fn generic_errors_are_bad_requests() {
        let res = ServerError::Generic("empty patch".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
