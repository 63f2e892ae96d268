//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Declares a fieldless enum persisted as a string column.
///
/// Generates `as_str`, `TryFrom<&str>` and serde impls that use the same
/// spelling as the database.
macro_rules! str_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::EngineError::InvalidArgument(format!(
                        concat!("invalid ", $label, ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

pub(crate) use str_enum;

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidArgument(format!("invalid {label} id")))
}

/// Parse an optional UUID column.
pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|v| parse_uuid(v, label)).transpose()
}

/// Human readable order number: `ORD-<unix millis>-<0..999>`.
pub(crate) fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("ORD-{}-{suffix}", now.timestamp_millis())
}

/// Validates a `[from, to]` window used by list filters and reports.
pub(crate) fn validate_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(EngineError::InvalidArgument(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn order_number_has_prefix_and_timestamp() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD-1700000000000-"));
        let suffix: u16 = number.rsplit('-').next().unwrap().parse().unwrap();
        assert!(suffix < 1000);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let from = Utc.timestamp_opt(10, 0).unwrap();
        let to = Utc.timestamp_opt(5, 0).unwrap();
        assert!(validate_range(Some(from), Some(to)).is_err());
        assert!(validate_range(Some(to), Some(from)).is_ok());
        assert!(validate_range(None, Some(to)).is_ok());
    }
}
