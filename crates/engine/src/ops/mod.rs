use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, TransitionPolicy};

mod access;
mod customers;
mod drivers;
mod lifecycle;
mod orders;
mod payments;
mod reports;
mod users;

pub use customers::{CustomerDetails, CustomerStats};
pub use orders::OrderListFilter;
pub use reports::{
    CustomerSummary, DriverSummary, EmployeeSummary, OrderReportRow, ReportRange, RevenueSummary,
};

/// Runs `$body` in one database transaction.
///
/// The transaction commits when the body returns `Ok`; on `Err` it is dropped,
/// which rolls back every write of the body, ledger counters included.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        match $body {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    policy: TransitionPolicy,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The status graph enforced by [`Engine::update_status`].
    pub fn transition_policy(&self) -> TransitionPolicy {
        self.policy
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn normalize_email(value: Option<&str>) -> Option<String> {
    normalize_optional_text(value).map(|email| email.to_lowercase())
}

fn ensure_positive(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must be > 0"
        )));
    }
    Ok(())
}

/// Assembles an [`Engine`] from its connection and policy.
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
    policy: TransitionPolicy,
}

impl EngineBuilder {
    /// Migrated database the engine reads and writes.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    /// How order status changes are validated, permissive unless set.
    pub fn transition_policy(mut self, policy: TransitionPolicy) -> EngineBuilder {
        self.policy = policy;
        self
    }

    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self.database.ok_or_else(|| {
            EngineError::InvalidArgument("engine needs a database connection".to_string())
        })?;
        tracing::debug!(policy = self.policy.as_str(), "engine ready");
        Ok(Engine {
            database,
            policy: self.policy,
        })
    }
}
