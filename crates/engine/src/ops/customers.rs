use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Customer, EngineError, LedgerDelta, NewCustomerCmd, Order, OrderStatus, PaymentStatus, Payout,
    ResultEngine, UpdateCustomerCmd, customer_payouts, customers, orders,
};

use super::{
    Engine, ensure_positive, normalize_email, normalize_optional_text, normalize_required_text,
    with_tx,
};

/// Figures of a customer computed from its orders at read time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CustomerStats {
    pub total_orders: i64,
    pub total_value_minor: i64,
    pub pending_payments_minor: i64,
    pub returned_orders: i64,
}

impl CustomerStats {
    fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut stats, order| {
            stats.total_orders += 1;
            stats.total_value_minor += order.price_minor;
            if order.payment_status == PaymentStatus::Pending {
                stats.pending_payments_minor += order.price_minor;
            }
            if order.status == OrderStatus::Returned {
                stats.returned_orders += 1;
            }
            stats
        })
    }
}

/// A customer with its orders, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerDetails {
    pub customer: Customer,
    pub orders: Vec<Order>,
    pub stats: CustomerStats,
}

impl Engine {
    pub async fn create_customer(&self, cmd: NewCustomerCmd) -> ResultEngine<Customer> {
        let name = normalize_required_text(&cmd.name, "customer name")?;
        let phone = normalize_required_text(&cmd.phone, "customer phone")?;
        let created_by = normalize_required_text(&cmd.created_by, "created_by")?;
        let mut customer = Customer::new(name, phone, created_by, Utc::now());
        customer.email = normalize_email(cmd.email.as_deref());
        customer.address = normalize_optional_text(cmd.address.as_deref());
        customer.notes = normalize_optional_text(cmd.notes.as_deref());

        with_tx!(self, |db_tx| {
            customers::ActiveModel::from(&customer)
                .insert(&db_tx)
                .await?;
            tracing::info!(customer = %customer.id, name = %customer.name, "customer created");
            Ok(customer)
        })
    }

    /// List customers, newest first.
    pub async fn customers(&self) -> ResultEngine<Vec<Customer>> {
        with_tx!(self, |db_tx| {
            let mut payouts: HashMap<Uuid, Vec<Payout>> = HashMap::new();
            for model in customer_payouts::Entity::find()
                .order_by_asc(customer_payouts::Column::PaidAt)
                .all(&db_tx)
                .await?
            {
                let payout = Payout::try_from(model)?;
                payouts.entry(payout.customer_id).or_default().push(payout);
            }

            customers::Entity::find()
                .order_by_desc(customers::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| {
                    let mut customer = Customer::try_from(model)?;
                    customer.payout_history = payouts.remove(&customer.id).unwrap_or_default();
                    Ok(customer)
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| self.require_customer(&db_tx, customer_id).await)
    }

    /// Updates contact fields. Ledger fields only change through orders and
    /// payouts.
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        cmd: UpdateCustomerCmd,
    ) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let mut customer = self.require_customer(&db_tx, customer_id).await?;
            if let Some(name) = cmd.name.as_deref() {
                customer.name = normalize_required_text(name, "customer name")?;
            }
            if let Some(phone) = cmd.phone.as_deref() {
                customer.phone = normalize_required_text(phone, "customer phone")?;
            }
            if let Some(email) = cmd.email.as_deref() {
                customer.email = normalize_email(Some(email));
            }
            if let Some(address) = cmd.address.as_deref() {
                customer.address = normalize_optional_text(Some(address));
            }
            if let Some(notes) = cmd.notes.as_deref() {
                customer.notes = normalize_optional_text(Some(notes));
            }
            self.save_customer(&db_tx, &mut customer).await?;
            Ok(customer)
        })
    }

    /// Deletes a customer without orders.
    pub async fn delete_customer(&self, customer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let customer = self.require_customer(&db_tx, customer_id).await?;
            let orders = orders::Entity::find()
                .filter(orders::Column::SenderCustomerId.eq(customer_id.to_string()))
                .count(&db_tx)
                .await?;
            if orders > 0 {
                return Err(EngineError::InvalidState(format!(
                    "customer {} has {orders} orders",
                    customer.name
                )));
            }
            customer_payouts::Entity::delete_many()
                .filter(customer_payouts::Column::CustomerId.eq(customer_id.to_string()))
                .exec(&db_tx)
                .await?;
            customers::Entity::delete_by_id(customer_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(customer = %customer_id, "customer deleted");
            Ok(())
        })
    }

    /// Orders sent by the customer, newest first.
    pub async fn customer_orders(&self, customer_id: Uuid) -> ResultEngine<Vec<Order>> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let models = orders::Entity::find()
                .filter(orders::Column::SenderCustomerId.eq(customer_id.to_string()))
                .order_by_desc(orders::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            self.orders_with_tracking(&db_tx, models).await
        })
    }

    /// The customer, its orders and figures recomputed from those orders.
    pub async fn customer_details(&self, customer_id: Uuid) -> ResultEngine<CustomerDetails> {
        with_tx!(self, |db_tx| {
            let customer = self.require_customer(&db_tx, customer_id).await?;
            let models = orders::Entity::find()
                .filter(orders::Column::SenderCustomerId.eq(customer_id.to_string()))
                .order_by_desc(orders::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            let orders = self.orders_with_tracking(&db_tx, models).await?;
            let stats = CustomerStats::from_orders(&orders);
            Ok(CustomerDetails {
                customer,
                orders,
                stats,
            })
        })
    }

    /// Pays `amount_minor` out of the customer balance.
    pub async fn payout_customer(
        &self,
        customer_id: Uuid,
        amount_minor: i64,
        notes: Option<&str>,
        by: &str,
    ) -> ResultEngine<Customer> {
        ensure_positive(amount_minor, "payout amount")?;
        let by = normalize_required_text(by, "payout author")?;
        with_tx!(self, |db_tx| {
            let mut customer = self.require_customer(&db_tx, customer_id).await?;
            let payout = customer.record_payout(
                amount_minor,
                normalize_optional_text(notes),
                &by,
                None,
                Utc::now(),
            )?;
            customer_payouts::ActiveModel::from(&payout)
                .insert(&db_tx)
                .await?;
            self.save_customer(&db_tx, &mut customer).await?;
            tracing::info!(
                customer = %customer_id,
                amount = amount_minor,
                balance = customer.balance_minor,
                by = %by,
                "customer paid out"
            );
            Ok(customer)
        })
    }

    /// Links orders carrying only a free-text sender to the customer with the
    /// same name and phone. Returns how many orders were linked.
    ///
    /// Linked orders count towards the customer totals but are not accrued
    /// to the balance.
    pub async fn link_orders_to_customers(&self) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let customers = customers::Entity::find().all(&db_tx).await?;
            let mut linked = 0_u64;
            for model in customers {
                let customer = Customer::try_from(model)?;
                let candidates = orders::Entity::find()
                    .filter(orders::Column::SenderCustomerId.is_null())
                    .filter(orders::Column::CustomerName.eq(customer.name.clone()))
                    .filter(orders::Column::CustomerPhone.eq(customer.phone.clone()))
                    .all(&db_tx)
                    .await?;

                let mut delta = LedgerDelta::default();
                for order_model in candidates {
                    let mut order = Order::try_from(order_model)?;
                    order.sender_customer_id = Some(customer.id);
                    self.save_order(&db_tx, &mut order).await?;
                    delta = delta + LedgerDelta::between(None, Some(order.ledger_view()));
                    linked += 1;
                }
                self.apply_ledger(&db_tx, Some(customer.id), delta).await?;
            }
            tracing::info!(linked, "orders linked to customers");
            Ok(linked)
        })
    }

    /// Recomputes the counters and the balance of a customer from its orders
    /// and payouts.
    pub async fn rebuild_customer_ledger(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let mut customer = self.require_customer(&db_tx, customer_id).await?;
            let total = orders::Entity::find()
                .filter(orders::Column::SenderCustomerId.eq(customer_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| Order::try_from(model).map(|o| LedgerDelta::of(o.ledger_view())))
                .try_fold(LedgerDelta::default(), |acc, delta| {
                    delta.map(|delta| acc + delta)
                })?;

            let previous_balance = customer.balance_minor;
            customer.balance_minor = total.balance_minor - customer.paid_out_minor();
            customer.total_orders = total.total_orders;
            customer.total_value_minor = total.total_value_minor;
            customer.pending_payments_minor = total.pending_payments_minor;
            customer.returned_orders = total.returned_orders;
            self.save_customer(&db_tx, &mut customer).await?;

            if previous_balance != customer.balance_minor {
                tracing::warn!(
                    customer = %customer_id,
                    previous_balance,
                    balance = customer.balance_minor,
                    "customer balance drifted, rebuilt from orders"
                );
            }
            Ok(customer)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{orders::OrderParties, pricing::Quote};

    fn order(price_minor: i64, status: OrderStatus, payment: PaymentStatus) -> Order {
        let mut order = Order::new(
            "ORD-1-1".to_string(),
            OrderParties {
                receiver_name: "Rana".to_string(),
                pieces: 1,
                ..OrderParties::default()
            },
            Quote {
                price_minor,
                ..Quote::default()
            },
            "alice".to_string(),
            Utc::now(),
        );
        order.status = status;
        order.payment_status = payment;
        order
    }

    #[test]
    fn stats_are_computed_from_orders() {
        let orders = [
            order(1_000, OrderStatus::Delivered, PaymentStatus::Pending),
            order(2_000, OrderStatus::Paid, PaymentStatus::Paid),
            order(500, OrderStatus::Returned, PaymentStatus::Failed),
        ];
        let stats = CustomerStats::from_orders(&orders);
        assert_eq!(
            stats,
            CustomerStats {
                total_orders: 3,
                total_value_minor: 3_500,
                pending_payments_minor: 1_000,
                returned_orders: 1,
            }
        );
    }
}
