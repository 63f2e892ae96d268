//! The authenticated principal and the users endpoints.

use api_types::user::{UserNew, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{EngineError, Role};

use crate::{ServerError, server::ServerState, views};

/// User attached to the request by the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Reports, deletes, payouts and user management are admin only.
    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(EngineError::Forbidden(format!("{} is not an admin", self.username)).into())
        }
    }
}

pub async fn user_new(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    user.require_admin()?;
    let role = views::engine_role(payload.role);
    let created = state
        .engine
        .create_user(&payload.username, &payload.password, role)
        .await?;
    Ok((StatusCode::CREATED, Json(views::user(created.username, role))))
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    user.require_admin()?;
    let users = state
        .engine
        .users()
        .await?
        .into_iter()
        .map(|model| {
            let role = model.role()?;
            Ok(views::user(model.username, role))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    Ok(Json(users))
}
