use chrono::Utc;
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerDelta, LedgerEffect, LedgerView, Order, OrderStatus, PAYMENT_FAILED_REASON, PaymentStatus,
    ResultEngine, Transition, customer_payouts, ledger,
};

use super::{Engine, access::DriverRelease, ensure_positive, normalize_optional_text, with_tx};

impl Engine {
    /// Moves an order to `status` and runs the side effects of the target
    /// status:
    ///
    /// - `delivered` accrues the price to the sender (once);
    /// - `cancelled`/`returned` reverse a previous accrual (once);
    /// - `delivered`/`paid`/`cancelled`/`returned` free a driver still busy.
    ///
    /// A tracking entry is always appended. Under
    /// [`crate::TransitionPolicy::Strict`] edges outside the shipping graph fail
    /// with `InvalidState`.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        let location = normalize_optional_text(location).unwrap_or_else(|| "System".to_string());
        let notes = normalize_optional_text(notes).unwrap_or_else(|| "Status updated".to_string());

        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            let transition = self.policy.transition(order.status, status)?;
            let before = order.ledger_view();

            self.apply_transition(&db_tx, &mut order, transition)
                .await?;
            let entry = order.track(status.as_str(), Some(location), Some(notes), now);
            self.insert_tracking(&db_tx, &entry).await?;
            self.commit_order(&db_tx, &mut order, before).await?;

            tracing::info!(
                order = %order.order_number,
                from = transition.from.as_str(),
                to = transition.to.as_str(),
                "order status changed"
            );
            Ok(order)
        })
    }

    /// Records the outcome of the receiver's payment.
    ///
    /// - `paid` on a delivered order promotes it to `paid`;
    /// - `failed` sends the order back (`returned`), defaults the return
    ///   reason and reverses the sender accrual once. The return is forced
    ///   regardless of the transition policy.
    pub async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment: PaymentStatus,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            let before = order.ledger_view();
            order.payment_status = payment;

            match payment {
                PaymentStatus::Paid if order.status == OrderStatus::Delivered => {
                    let transition = self.policy.transition(order.status, OrderStatus::Paid)?;
                    self.apply_transition(&db_tx, &mut order, transition)
                        .await?;
                    let entry = order.track(
                        OrderStatus::Paid.as_str(),
                        Some("System".to_string()),
                        Some("Payment received".to_string()),
                        now,
                    );
                    self.insert_tracking(&db_tx, &entry).await?;
                }
                PaymentStatus::Failed => {
                    let transition = Transition::keyed_by_target(order.status, OrderStatus::Returned);
                    self.apply_transition(&db_tx, &mut order, transition)
                        .await?;
                    if order.return_reason.is_none() {
                        order.return_reason = Some(PAYMENT_FAILED_REASON.to_string());
                    }
                    let entry = order.track(
                        OrderStatus::Returned.as_str(),
                        Some("System".to_string()),
                        Some(PAYMENT_FAILED_REASON.to_string()),
                        now,
                    );
                    self.insert_tracking(&db_tx, &entry).await?;
                }
                _ => {}
            }

            self.commit_order(&db_tx, &mut order, before).await?;
            tracing::info!(
                order = %order.order_number,
                payment = payment.as_str(),
                status = order.status.as_str(),
                "payment status changed"
            );
            Ok(order)
        })
    }

    /// Gives back part or all of the order price.
    pub async fn refund_order(
        &self,
        order_id: Uuid,
        amount_minor: i64,
        notes: Option<&str>,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        ensure_positive(amount_minor, "refund amount")?;
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            order.apply_refund(amount_minor, normalize_optional_text(notes), now)?;
            self.save_order(&db_tx, &mut order).await?;
            tracing::info!(
                order = %order.order_number,
                amount = amount_minor,
                refund_status = order.refund_status.as_str(),
                "order refunded"
            );
            Ok(order)
        })
    }

    /// Pays the sender for a paid order.
    ///
    /// When the order has a sender customer the money leaves the customer
    /// balance, so the amount must also fit in it, and the payout is recorded
    /// in the customer history with the order reference.
    pub async fn payout_to_sender(
        &self,
        order_id: Uuid,
        amount_minor: i64,
        by: &str,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        ensure_positive(amount_minor, "payout amount")?;
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            order.apply_sender_payout(amount_minor, now)?;

            if let Some(customer_id) = order.sender_customer_id {
                let mut customer = self.require_customer(&db_tx, customer_id).await?;
                let payout = customer.record_payout(
                    amount_minor,
                    Some(format!("Payout for order {}", order.order_number)),
                    by,
                    Some(order.id),
                    now,
                )?;
                customer_payouts::ActiveModel::from(&payout)
                    .insert(&db_tx)
                    .await?;
                self.save_customer(&db_tx, &mut customer).await?;
            }

            self.save_order(&db_tx, &mut order).await?;
            tracing::info!(
                order = %order.order_number,
                amount = amount_minor,
                by,
                "sender paid out"
            );
            Ok(order)
        })
    }

    /// Marks a returned order as reconciled with the sender. Calling it again
    /// is a no-op.
    pub async fn settle_return_to_customer(&self, order_id: Uuid) -> ResultEngine<Order> {
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            if order.settle_return()? {
                self.save_order(&db_tx, &mut order).await?;
                tracing::info!(order = %order.order_number, "return settled");
            }
            Ok(order)
        })
    }

    async fn apply_transition(
        &self,
        db: &DatabaseTransaction,
        order: &mut Order,
        transition: Transition,
    ) -> ResultEngine<()> {
        order.status = transition.to;
        match transition.ledger {
            LedgerEffect::Accrue => {
                if ledger::accrue(order) {
                    tracing::debug!(order = %order.order_number, "price accrued to sender");
                }
            }
            LedgerEffect::Reverse => {
                if ledger::reverse(order) {
                    tracing::debug!(order = %order.order_number, "sender accrual reversed");
                }
            }
            LedgerEffect::None => {}
        }
        if transition.release_driver
            && let Some(driver_id) = order.assigned_driver_id
        {
            self.release_driver(db, driver_id, order.id, DriverRelease::DeliveryEnded)
                .await?;
        }
        Ok(())
    }

    /// Saves the order and moves its sender counters from `before` to the
    /// current state.
    pub(super) async fn commit_order(
        &self,
        db: &DatabaseTransaction,
        order: &mut Order,
        before: LedgerView,
    ) -> ResultEngine<()> {
        self.save_order(db, order).await?;
        if order.sender_customer_id.is_some() {
            let delta = LedgerDelta::between(Some(before), Some(order.ledger_view()));
            self.apply_ledger(db, order.sender_customer_id, delta)
                .await?;
        }
        Ok(())
    }
}
