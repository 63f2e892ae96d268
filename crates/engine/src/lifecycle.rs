//! Order status transitions.
//!
//! ```text
//! pending --assign--> assigned --> in-transit --> delivered --> paid
//!    |  any state --(cancel | return)--> cancelled / returned
//! returned --> delivered   (re-entry)
//! ```
//!
//! Ledger effects are keyed by the target status:
//!
//! | target                 | ledger  |
//! |------------------------|---------|
//! | `delivered`            | accrue  |
//! | `cancelled`/`returned` | reverse |
//! | others                 | -       |
//!
//! The driver is released only when the order leaves an open status
//! (pending, assigned, in-transit) for a final one. Moving between final
//! statuses, such as `delivered -> paid`, leaves drivers alone.
//!
//! Whether a transition is legal depends on the configured
//! [`TransitionPolicy`].

use serde::{Deserialize, Serialize};

use crate::{EngineError, OrderStatus, ResultEngine};

/// How the order status graph is enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Every status can move to every other status.
    #[default]
    Permissive,
    /// Only the edges of the shipping graph are accepted.
    Strict,
}

impl TransitionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }

    /// Validates `from -> to` and returns the side effects to run.
    pub fn transition(self, from: OrderStatus, to: OrderStatus) -> ResultEngine<Transition> {
        if self == Self::Strict && from != to && !is_shipping_edge(from, to) {
            return Err(EngineError::InvalidState(format!(
                "order cannot move from {} to {}",
                from.as_str(),
                to.as_str()
            )));
        }
        Ok(Transition::keyed_by_target(from, to))
    }
}

impl TryFrom<&str> for TransitionPolicy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid transition policy: {other}"
            ))),
        }
    }
}

fn is_shipping_edge(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;

    matches!(
        (from, to),
        (Pending, Assigned | Cancelled)
            | (Assigned, Pending | InTransit | Cancelled | Returned)
            | (InTransit, Delivered | Returned | Cancelled)
            | (Delivered, Paid | Returned)
            | (Returned, Delivered)
    )
}

/// Effect of a transition on the sender ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerEffect {
    None,
    /// Add the order price to the sender balance (once).
    Accrue,
    /// Remove a previously accrued order price from the sender balance (once).
    Reverse,
}

/// An accepted status change with its side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub ledger: LedgerEffect,
    pub release_driver: bool,
}

impl Transition {
    pub(crate) fn keyed_by_target(from: OrderStatus, to: OrderStatus) -> Self {
        let ledger = match to {
            OrderStatus::Delivered => LedgerEffect::Accrue,
            OrderStatus::Cancelled | OrderStatus::Returned => LedgerEffect::Reverse,
            _ => LedgerEffect::None,
        };
        Self {
            from,
            to,
            ledger,
            release_driver: to.ends_delivery() && !from.ends_delivery(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 7] = [
        Pending, Assigned, InTransit, Delivered, Paid, Cancelled, Returned,
    ];

    #[test]
    fn permissive_accepts_every_pair() {
        for from in ALL {
            for to in ALL {
                assert!(TransitionPolicy::Permissive.transition(from, to).is_ok());
            }
        }
    }

    #[test]
    fn strict_rejects_paid_back_to_pending() {
        let err = TransitionPolicy::Strict
            .transition(Paid, Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn strict_accepts_return_reentry() {
        let t = TransitionPolicy::Strict
            .transition(Returned, Delivered)
            .unwrap();
        assert_eq!(t.ledger, LedgerEffect::Accrue);
    }

    #[test]
    fn strict_accepts_same_status() {
        for status in ALL {
            assert!(TransitionPolicy::Strict.transition(status, status).is_ok());
        }
    }

    #[test]
    fn cancelled_and_returned_reverse_and_release() {
        for to in [Cancelled, Returned] {
            let t = TransitionPolicy::Permissive.transition(InTransit, to).unwrap();
            assert_eq!(t.ledger, LedgerEffect::Reverse);
            assert!(t.release_driver);
        }
    }

    #[test]
    fn moves_between_final_statuses_keep_the_driver() {
        for (from, to) in [
            (Delivered, Paid),
            (Delivered, Delivered),
            (Delivered, Returned),
            (Paid, Cancelled),
            (Returned, Delivered),
        ] {
            let t = TransitionPolicy::Permissive.transition(from, to).unwrap();
            assert!(!t.release_driver, "{from:?} -> {to:?}");
        }
        assert!(
            TransitionPolicy::Permissive
                .transition(InTransit, Delivered)
                .unwrap()
                .release_driver
        );
    }

    #[test]
    fn in_transit_has_no_side_effects() {
        let t = TransitionPolicy::Permissive
            .transition(Assigned, InTransit)
            .unwrap();
        assert_eq!(t.ledger, LedgerEffect::None);
        assert!(!t.release_driver);
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            TransitionPolicy::try_from("strict").unwrap(),
            TransitionPolicy::Strict
        );
        assert!(TransitionPolicy::try_from("loose").is_err());
    }
}
