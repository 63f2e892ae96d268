//! The module contains the errors the engine can throw.
//!
//! The errors are grouped by the kind of failure the caller has to react to:
//!
//! - [`KeyNotFound`] the referenced order, customer, driver or payment does
//!   not exist.
//! - [`InvalidArgument`] malformed or out of range input (negative amounts,
//!   refunds above the order price, empty names).
//! - [`InvalidState`] the operation is not allowed in the current state of the
//!   entity (driver not available, payout before payment, illegal status
//!   transition).
//! - [`Conflict`] the row was modified by a concurrent request.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidArgument`]: EngineError::InvalidArgument
//!  [`InvalidState`]: EngineError::InvalidState
//!  [`Conflict`]: EngineError::Conflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Stable machine readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KeyNotFound(_) => "not_found",
            Self::ExistingKey(_) => "already_exists",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidState(_) => "invalid_state",
            Self::Conflict(_) => "conflict",
            Self::Forbidden(_) => "forbidden",
            Self::Database(_) => "internal",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
