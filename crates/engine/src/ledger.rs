//! Sender customer ledger.
//!
//! A customer balance is what the company owes the sender for the orders it
//! shipped. Every order linked to a customer contributes to the customer row:
//!
//! | counter                  | contribution of one order                  |
//! |--------------------------|--------------------------------------------|
//! | `balance_minor`          | `price` while `accrual_status == accrued`  |
//! | `total_orders`           | 1                                          |
//! | `total_value_minor`      | `price`                                    |
//! | `pending_payments_minor` | `price` while `payment_status == pending`  |
//! | `returned_orders`        | 1 while `accrual_status == reversed`       |
//!
//! Payouts are subtracted from the balance on top of that.
//!
//! Operations never add to the counters directly: they take a [`LedgerView`]
//! of the order before and after the change and apply the difference
//! ([`LedgerDelta::between`]). Because the accrual flag only moves through
//! [`accrue`]/[`reverse`], which are check-and-set, replaying the same status
//! change twice cannot count the same order twice.
//!
//! The counters are a projection of the orders, so they always equal what
//! [`Engine::rebuild_customer_ledger`](crate::Engine::rebuild_customer_ledger)
//! would recompute. Two consequences differ from plain increment-only
//! counters on purpose:
//!
//! - `returned_orders` goes down again when a returned order is re-delivered
//!   and re-accrued;
//! - a price edit moves `total_value_minor` for every linked order, cancelled
//!   or returned ones included, since they still count in `total_orders`.

use crate::{AccrualStatus, Customer, Order, PaymentStatus};

/// The ledger-relevant part of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerView {
    pub price_minor: i64,
    pub accrual: AccrualStatus,
    pub payment: PaymentStatus,
}

impl LedgerView {
    fn balance_minor(self) -> i64 {
        if self.accrual == AccrualStatus::Accrued {
            self.price_minor
        } else {
            0
        }
    }

    fn pending_minor(self) -> i64 {
        if self.payment == PaymentStatus::Pending {
            self.price_minor
        } else {
            0
        }
    }

    fn returned(self) -> i64 {
        i64::from(self.accrual == AccrualStatus::Reversed)
    }
}

/// Change to apply to a customer row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerDelta {
    pub balance_minor: i64,
    pub total_orders: i64,
    pub total_value_minor: i64,
    pub pending_payments_minor: i64,
    pub returned_orders: i64,
}

impl LedgerDelta {
    /// Contribution of one order, as if it had just been linked.
    pub fn of(view: LedgerView) -> Self {
        Self {
            balance_minor: view.balance_minor(),
            total_orders: 1,
            total_value_minor: view.price_minor,
            pending_payments_minor: view.pending_minor(),
            returned_orders: view.returned(),
        }
    }

    /// Difference between two snapshots of the same order. `None` means the
    /// order was not linked to the customer.
    pub fn between(before: Option<LedgerView>, after: Option<LedgerView>) -> Self {
        let before = before.map(Self::of).unwrap_or_default();
        let after = after.map(Self::of).unwrap_or_default();
        Self {
            balance_minor: after.balance_minor - before.balance_minor,
            total_orders: after.total_orders - before.total_orders,
            total_value_minor: after.total_value_minor - before.total_value_minor,
            pending_payments_minor: after.pending_payments_minor - before.pending_payments_minor,
            returned_orders: after.returned_orders - before.returned_orders,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, customer: &mut Customer) {
        customer.balance_minor += self.balance_minor;
        customer.total_orders += self.total_orders;
        customer.total_value_minor += self.total_value_minor;
        customer.pending_payments_minor += self.pending_payments_minor;
        customer.returned_orders += self.returned_orders;
    }
}

impl std::ops::Add for LedgerDelta {
    type Output = LedgerDelta;

    fn add(self, rhs: LedgerDelta) -> Self::Output {
        Self {
            balance_minor: self.balance_minor + rhs.balance_minor,
            total_orders: self.total_orders + rhs.total_orders,
            total_value_minor: self.total_value_minor + rhs.total_value_minor,
            pending_payments_minor: self.pending_payments_minor + rhs.pending_payments_minor,
            returned_orders: self.returned_orders + rhs.returned_orders,
        }
    }
}

/// Marks the order price as counted in the sender balance.
///
/// Returns `false` (and changes nothing) when there is no sender or the order
/// is already accrued.
pub(crate) fn accrue(order: &mut Order) -> bool {
    if order.sender_customer_id.is_none() || order.accrual_status == AccrualStatus::Accrued {
        return false;
    }
    order.accrual_status = AccrualStatus::Accrued;
    true
}

/// Removes a previously accrued order price from the sender balance.
///
/// Returns `false` (and changes nothing) unless the order is accrued.
pub(crate) fn reverse(order: &mut Order) -> bool {
    if order.accrual_status != AccrualStatus::Accrued {
        return false;
    }
    order.accrual_status = AccrualStatus::Reversed;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(price_minor: i64, accrual: AccrualStatus, payment: PaymentStatus) -> LedgerView {
        LedgerView {
            price_minor,
            accrual,
            payment,
        }
    }

    #[test]
    fn new_accrued_order_counts_everything() {
        let delta = LedgerDelta::between(
            None,
            Some(view(12_000, AccrualStatus::Accrued, PaymentStatus::Pending)),
        );
        assert_eq!(
            delta,
            LedgerDelta {
                balance_minor: 12_000,
                total_orders: 1,
                total_value_minor: 12_000,
                pending_payments_minor: 12_000,
                returned_orders: 0,
            }
        );
    }

    #[test]
    fn reversal_removes_balance_and_counts_return() {
        let delta = LedgerDelta::between(
            Some(view(12_000, AccrualStatus::Accrued, PaymentStatus::Pending)),
            Some(view(12_000, AccrualStatus::Reversed, PaymentStatus::Pending)),
        );
        assert_eq!(delta.balance_minor, -12_000);
        assert_eq!(delta.returned_orders, 1);
        assert_eq!(delta.total_orders, 0);
        assert_eq!(delta.total_value_minor, 0);
    }

    #[test]
    fn price_edit_on_accrued_order_moves_balance_by_the_difference() {
        let delta = LedgerDelta::between(
            Some(view(10_000, AccrualStatus::Accrued, PaymentStatus::Paid)),
            Some(view(12_500, AccrualStatus::Accrued, PaymentStatus::Paid)),
        );
        assert_eq!(delta.balance_minor, 2_500);
        assert_eq!(delta.total_value_minor, 2_500);
        assert_eq!(delta.pending_payments_minor, 0);
    }

    #[test]
    fn price_edit_on_reversed_order_leaves_balance() {
        let delta = LedgerDelta::between(
            Some(view(10_000, AccrualStatus::Reversed, PaymentStatus::Failed)),
            Some(view(15_000, AccrualStatus::Reversed, PaymentStatus::Failed)),
        );
        assert_eq!(delta.balance_minor, 0);
    }

    #[test]
    fn unchanged_view_is_zero() {
        let v = view(1_000, AccrualStatus::Accrued, PaymentStatus::Paid);
        assert!(LedgerDelta::between(Some(v), Some(v)).is_zero());
    }

    #[test]
    fn sum_of_contributions() {
        let a = LedgerDelta::of(view(1_000, AccrualStatus::Accrued, PaymentStatus::Pending));
        let b = LedgerDelta::of(view(500, AccrualStatus::Reversed, PaymentStatus::Failed));
        let total = a + b;
        assert_eq!(total.total_orders, 2);
        assert_eq!(total.balance_minor, 1_000);
        assert_eq!(total.total_value_minor, 1_500);
        assert_eq!(total.pending_payments_minor, 1_000);
        assert_eq!(total.returned_orders, 1);
    }
}
