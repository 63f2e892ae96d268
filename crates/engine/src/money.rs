use std::fmt;

use crate::{EngineError, ResultEngine};

/// An order amount in minor units (piastres).
///
/// Every price, refund, payout and balance is kept as an `i64` count of minor
/// units. Pricing goes through this type so negative or overflowing amounts
/// are rejected before they reach an order.
///
/// ```rust
/// use engine::MoneyCents;
///
/// let fee = MoneyCents::non_negative(2_550, "shipping_cost").unwrap();
/// assert_eq!(fee.to_string(), "25.50");
/// assert!(MoneyCents::non_negative(-1, "price").is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Accepts `minor` as an order amount, `label` naming it in the error.
    pub fn non_negative(minor: i64, label: &str) -> ResultEngine<Self> {
        if minor < 0 {
            return Err(EngineError::InvalidArgument(format!(
                "{label} must be >= 0"
            )));
        }
        Ok(Self(minor))
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Sum of two amounts, an error when it no longer fits.
    pub fn plus(self, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
        self.0
            .checked_add(rhs.0)
            .map(MoneyCents)
            .ok_or_else(|| EngineError::InvalidArgument("amount too large".to_string()))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_print_with_two_decimals() {
        assert_eq!(MoneyCents::ZERO.to_string(), "0.00");
        assert_eq!(MoneyCents::new(5).to_string(), "0.05");
        assert_eq!(MoneyCents::new(12_000).to_string(), "120.00");
        assert_eq!(MoneyCents::new(-1_050).to_string(), "-10.50");
    }

    #[test]
    fn negative_amounts_are_rejected_with_their_label() {
        let err = MoneyCents::non_negative(-300, "product_price").unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidArgument(ref msg) if msg == "product_price must be >= 0")
        );
        assert_eq!(MoneyCents::non_negative(0, "price").unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let max = MoneyCents::new(i64::MAX);
        assert!(max.plus(MoneyCents::new(1)).is_err());
        assert_eq!(
            MoneyCents::new(1_000).plus(MoneyCents::new(250)).unwrap(),
            MoneyCents::new(1_250)
        );
    }
}
