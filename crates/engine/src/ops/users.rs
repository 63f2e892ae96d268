use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Role, users};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Adds a login. Passwords are stored as given.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> ResultEngine<users::Model> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::InvalidArgument(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }
            let user = users::ActiveModel {
                username: ActiveValue::Set(username),
                password: ActiveValue::Set(password.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(username = %user.username, role = role.as_str(), "user created");
            Ok(user)
        })
    }

    /// Returns the user matching the credentials.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Option<users::Model>> {
        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?;
            Ok(user.filter(|u| u.password == password))
        })
    }

    pub async fn users(&self) -> ResultEngine<Vec<users::Model>> {
        with_tx!(self, |db_tx| Ok(users::Entity::find().all(&db_tx).await?))
    }
}
