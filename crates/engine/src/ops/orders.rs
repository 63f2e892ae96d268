use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LedgerDelta, NewOrderCmd, Order, OrderStatus, ResultEngine, UpdateOrderCmd,
    ledger,
    orders::{self, OrderParties},
    pricing::quote,
    util::{generate_order_number, validate_range},
};

use super::{
    Engine, access::DriverRelease, normalize_optional_text, normalize_required_text, with_tx,
};

/// Filters for [`Engine::list_orders`]. Empty filter returns every order.
#[derive(Clone, Debug, Default)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    pub driver_id: Option<Uuid>,
    pub sender_customer_id: Option<Uuid>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
}

fn validate_pieces(pieces: i32) -> ResultEngine<i32> {
    if pieces < 1 {
        return Err(EngineError::InvalidArgument(
            "pieces must be >= 1".to_string(),
        ));
    }
    Ok(pieces)
}

fn validate_weight(weight: Option<f64>) -> ResultEngine<Option<f64>> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(EngineError::InvalidArgument(
            "weight must be a non negative number".to_string(),
        )),
        other => Ok(other),
    }
}

impl Engine {
    /// Creates an order.
    ///
    /// The price comes from [`crate::quote`]. With a driver the order starts
    /// `assigned` and the driver becomes busy; the driver must be available.
    /// With a sender customer the price is accrued to its balance right away.
    pub async fn create_order(&self, cmd: NewOrderCmd) -> ResultEngine<Order> {
        let now = Utc::now();
        let created_by = normalize_required_text(&cmd.created_by, "created_by")?;
        let parties = OrderParties {
            sender_customer_id: cmd.sender_customer_id,
            customer_name: normalize_optional_text(cmd.customer_name.as_deref()),
            customer_phone: normalize_optional_text(cmd.customer_phone.as_deref()),
            receiver_name: normalize_required_text(&cmd.receiver_name, "receiver_name")?,
            receiver_phone: normalize_required_text(&cmd.receiver_phone, "receiver_phone")?,
            origin: normalize_required_text(&cmd.origin, "origin")?,
            destination: normalize_required_text(&cmd.destination, "destination")?,
            product_details: normalize_optional_text(cmd.product_details.as_deref()),
            pieces: validate_pieces(cmd.pieces.unwrap_or(1))?,
            weight: validate_weight(cmd.weight)?,
        };
        let quote = quote(
            cmd.product_price_minor,
            cmd.shipping_cost_minor,
            cmd.price_minor,
        )?;
        let order_number = normalize_optional_text(cmd.order_number.as_deref())
            .unwrap_or_else(|| generate_order_number(now));

        with_tx!(self, |db_tx| {
            let taken = orders::Entity::find()
                .filter(orders::Column::OrderNumber.eq(order_number.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(order_number));
            }
            if let Some(customer_id) = parties.sender_customer_id {
                self.require_customer(&db_tx, customer_id).await?;
            }

            let mut order = Order::new(order_number, parties, quote, created_by, now);
            if let Some(driver_id) = cmd.driver_id {
                let mut driver = self.require_driver(&db_tx, driver_id).await?;
                self.occupy_driver(&db_tx, &mut driver).await?;
                order.assigned_driver_id = Some(driver_id);
                order.status = OrderStatus::Assigned;
            }
            ledger::accrue(&mut order);

            orders::ActiveModel::from(&order).insert(&db_tx).await?;
            let status = order.status;
            let entry = order.track(
                status.as_str(),
                Some("System".to_string()),
                Some("Order created".to_string()),
                now,
            );
            self.insert_tracking(&db_tx, &entry).await?;

            self.apply_ledger(
                &db_tx,
                order.sender_customer_id,
                LedgerDelta::between(None, Some(order.ledger_view())),
            )
            .await?;

            tracing::info!(
                order = %order.order_number,
                price = order.price_minor,
                created_by = %order.created_by,
                "order created"
            );
            Ok(order)
        })
    }

    /// Applies a patch to an order.
    ///
    /// Price edits on an order already accrued to its sender move the sender
    /// balance by the difference. A different driver releases the previous
    /// one and puts the order back to `assigned`.
    pub async fn update_order(&self, order_id: Uuid, cmd: UpdateOrderCmd) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            let before = order.ledger_view();

            if let Some(name) = cmd.customer_name.as_deref() {
                order.customer_name = normalize_optional_text(Some(name));
            }
            if let Some(phone) = cmd.customer_phone.as_deref() {
                order.customer_phone = normalize_optional_text(Some(phone));
            }
            if let Some(name) = cmd.receiver_name.as_deref() {
                order.receiver_name = normalize_required_text(name, "receiver_name")?;
            }
            if let Some(phone) = cmd.receiver_phone.as_deref() {
                order.receiver_phone = normalize_required_text(phone, "receiver_phone")?;
            }
            if let Some(origin) = cmd.origin.as_deref() {
                order.origin = normalize_required_text(origin, "origin")?;
            }
            if let Some(destination) = cmd.destination.as_deref() {
                order.destination = normalize_required_text(destination, "destination")?;
            }
            if let Some(details) = cmd.product_details.as_deref() {
                order.product_details = normalize_optional_text(Some(details));
            }
            if let Some(pieces) = cmd.pieces {
                order.pieces = validate_pieces(pieces)?;
            }
            if cmd.weight.is_some() {
                order.weight = validate_weight(cmd.weight)?;
            }
            if let Some(reason) = cmd.return_reason.as_deref() {
                order.return_reason = normalize_optional_text(Some(reason));
            }

            if cmd.touches_price() {
                let quote = if cmd.product_price_minor.is_some() || cmd.shipping_cost_minor.is_some()
                {
                    quote(
                        Some(cmd.product_price_minor.unwrap_or(order.product_price_minor)),
                        Some(cmd.shipping_cost_minor.unwrap_or(order.shipping_cost_minor)),
                        None,
                    )?
                } else {
                    if order.product_price_minor != 0 || order.shipping_cost_minor != 0 {
                        return Err(EngineError::InvalidArgument(
                            "price is derived from product_price and shipping_cost".to_string(),
                        ));
                    }
                    quote(None, None, cmd.price_minor)?
                };
                order.reprice(quote)?;
            }

            if let Some(driver_id) = cmd.driver_id
                && order.assigned_driver_id != Some(driver_id)
            {
                self.assign_to(&db_tx, &mut order, driver_id, now).await?;
            }

            self.commit_order(&db_tx, &mut order, before).await?;

            tracing::info!(order = %order.order_number, "order updated");
            Ok(order)
        })
    }

    /// Return an order with its tracking log.
    pub async fn order(&self, order_id: Uuid) -> ResultEngine<Order> {
        with_tx!(self, |db_tx| self.require_order(&db_tx, order_id).await)
    }

    /// List orders, newest first.
    pub async fn list_orders(&self, filter: &OrderListFilter) -> ResultEngine<Vec<Order>> {
        validate_range(filter.from, filter.to)?;
        with_tx!(self, |db_tx| {
            let mut query = orders::Entity::find();
            if let Some(status) = filter.status {
                query = query.filter(orders::Column::Status.eq(status.as_str()));
            }
            if let Some(driver_id) = filter.driver_id {
                query = query.filter(orders::Column::AssignedDriverId.eq(driver_id.to_string()));
            }
            if let Some(customer_id) = filter.sender_customer_id {
                query =
                    query.filter(orders::Column::SenderCustomerId.eq(customer_id.to_string()));
            }
            if let Some(from) = filter.from {
                query = query.filter(orders::Column::CreatedAt.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(orders::Column::CreatedAt.lte(to));
            }
            let models = query
                .order_by_desc(orders::Column::CreatedAt)
                .order_by_desc(orders::Column::OrderNumber)
                .all(&db_tx)
                .await?;
            self.orders_with_tracking(&db_tx, models).await
        })
    }

    /// Hands the order to a driver, who must be available.
    ///
    /// The previously assigned driver, if any, becomes available again.
    pub async fn assign_driver(&self, order_id: Uuid, driver_id: Uuid) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            self.assign_to(&db_tx, &mut order, driver_id, now).await?;
            self.save_order(&db_tx, &mut order).await?;
            Ok(order)
        })
    }

    /// Appends an audit entry without touching the order status.
    pub async fn add_tracking_update(
        &self,
        order_id: Uuid,
        status: &str,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        let status = normalize_required_text(status, "tracking status")?;
        with_tx!(self, |db_tx| {
            let mut order = self.require_order(&db_tx, order_id).await?;
            let entry = order.track(
                &status,
                normalize_optional_text(location),
                normalize_optional_text(notes),
                now,
            );
            self.insert_tracking(&db_tx, &entry).await?;
            self.save_order(&db_tx, &mut order).await?;
            Ok(order)
        })
    }

    async fn assign_to(
        &self,
        db: &DatabaseTransaction,
        order: &mut Order,
        driver_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        self.policy.transition(order.status, OrderStatus::Assigned)?;
        let mut driver = self.require_driver(db, driver_id).await?;
        driver.ensure_available()?;

        if let Some(previous) = order.assigned_driver_id {
            self.release_driver(db, previous, order.id, DriverRelease::Reassigned)
                .await?;
        }
        self.occupy_driver(db, &mut driver).await?;

        order.assigned_driver_id = Some(driver_id);
        order.status = OrderStatus::Assigned;
        let entry = order.track(
            OrderStatus::Assigned.as_str(),
            None,
            Some(format!("Assigned to driver {}", driver.name)),
            now,
        );
        self.insert_tracking(db, &entry).await?;

        tracing::info!(
            order = %order.order_number,
            driver = %driver_id,
            "driver assigned"
        );
        Ok(())
    }
}
