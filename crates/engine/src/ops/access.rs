use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*,
};
use uuid::Uuid;

use crate::{
    Customer, Driver, DriverAvailability, EngineError, LedgerDelta, Order, OrderStatus, Payout,
    ResultEngine, TrackingEntry, customer_payouts, customers, drivers, order_tracking, orders,
};

use super::Engine;

/// Generates a `save_*` method that writes the whole row only if nobody else
/// bumped its `version` since it was loaded.
macro_rules! impl_versioned_save {
    ($save_fn:ident, $domain:ty, $module:ident, $label:literal) => {
        pub(super) async fn $save_fn(
            &self,
            db: &DatabaseTransaction,
            value: &mut $domain,
        ) -> ResultEngine<()> {
            let expected = value.version;
            value.updated_at = Utc::now();
            let mut active: $module::ActiveModel = (&*value).into();
            active.version = ActiveValue::Set(expected + 1);

            let result = $module::Entity::update_many()
                .set(active)
                .filter($module::Column::Id.eq(value.id.to_string()))
                .filter($module::Column::Version.eq(expected))
                .exec(db)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::Conflict(format!(
                    concat!($label, " {} was modified concurrently"),
                    value.id
                )));
            }
            value.version = expected + 1;
            Ok(())
        }
    };
}

impl Engine {
    impl_versioned_save!(save_order, Order, orders, "order");
    impl_versioned_save!(save_customer, Customer, customers, "customer");
    impl_versioned_save!(save_driver, Driver, drivers, "driver");

    pub(super) async fn require_order(
        &self,
        db: &DatabaseTransaction,
        order_id: Uuid,
    ) -> ResultEngine<Order> {
        let model = orders::Entity::find_by_id(order_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))?;
        let mut order = Order::try_from(model)?;
        order.tracking = order_tracking::Entity::find()
            .filter(order_tracking::Column::OrderId.eq(order_id.to_string()))
            .order_by_asc(order_tracking::Column::Seq)
            .all(db)
            .await?
            .into_iter()
            .map(TrackingEntry::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(order)
    }

    /// Converts order rows and loads their tracking logs with one query.
    pub(super) async fn orders_with_tracking(
        &self,
        db: &DatabaseTransaction,
        models: Vec<orders::Model>,
    ) -> ResultEngine<Vec<Order>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut tracking: HashMap<Uuid, Vec<TrackingEntry>> = HashMap::new();
        for model in order_tracking::Entity::find()
            .filter(order_tracking::Column::OrderId.is_in(ids))
            .order_by_asc(order_tracking::Column::Seq)
            .all(db)
            .await?
        {
            let entry = TrackingEntry::try_from(model)?;
            tracking.entry(entry.order_id).or_default().push(entry);
        }

        models
            .into_iter()
            .map(|model| {
                let mut order = Order::try_from(model)?;
                order.tracking = tracking.remove(&order.id).unwrap_or_default();
                Ok(order)
            })
            .collect()
    }

    pub(super) async fn insert_tracking(
        &self,
        db: &DatabaseTransaction,
        entry: &TrackingEntry,
    ) -> ResultEngine<()> {
        order_tracking::ActiveModel::from(entry).insert(db).await?;
        Ok(())
    }

    pub(super) async fn require_customer(
        &self,
        db: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<Customer> {
        let model = customers::Entity::find_by_id(customer_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
        let mut customer = Customer::try_from(model)?;
        customer.payout_history = customer_payouts::Entity::find()
            .filter(customer_payouts::Column::CustomerId.eq(customer_id.to_string()))
            .order_by_asc(customer_payouts::Column::PaidAt)
            .all(db)
            .await?
            .into_iter()
            .map(Payout::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(customer)
    }

    pub(super) async fn require_driver(
        &self,
        db: &DatabaseTransaction,
        driver_id: Uuid,
    ) -> ResultEngine<Driver> {
        self.find_driver(db, driver_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("driver not exists".to_string()))
    }

    pub(super) async fn find_driver(
        &self,
        db: &DatabaseTransaction,
        driver_id: Uuid,
    ) -> ResultEngine<Option<Driver>> {
        drivers::Entity::find_by_id(driver_id.to_string())
            .one(db)
            .await?
            .map(Driver::try_from)
            .transpose()
    }

    /// Applies a ledger difference to the sender of an order.
    pub(super) async fn apply_ledger(
        &self,
        db: &DatabaseTransaction,
        customer_id: Option<Uuid>,
        delta: LedgerDelta,
    ) -> ResultEngine<()> {
        let Some(customer_id) = customer_id else {
            return Ok(());
        };
        if delta.is_zero() {
            return Ok(());
        }
        let mut customer = self.require_customer(db, customer_id).await?;
        delta.apply_to(&mut customer);
        self.save_customer(db, &mut customer).await?;
        tracing::debug!(
            customer = %customer_id,
            balance_delta = delta.balance_minor,
            balance = customer.balance_minor,
            "customer ledger adjusted"
        );
        Ok(())
    }

    /// Flips an available driver to busy for a new assignment.
    pub(super) async fn occupy_driver(
        &self,
        db: &DatabaseTransaction,
        driver: &mut Driver,
    ) -> ResultEngine<()> {
        driver.ensure_available()?;
        driver.availability = DriverAvailability::Busy;
        self.save_driver(db, driver).await?;
        tracing::debug!(driver = %driver.id, "driver busy");
        Ok(())
    }

    /// Lets `driver_id` go from `order_id` and puts it back to available.
    ///
    /// A driver that no longer exists is skipped, and so is one still
    /// assigned to another open order.
    pub(super) async fn release_driver(
        &self,
        db: &DatabaseTransaction,
        driver_id: Uuid,
        order_id: Uuid,
        release: DriverRelease,
    ) -> ResultEngine<()> {
        let Some(mut driver) = self.find_driver(db, driver_id).await? else {
            tracing::warn!(driver = %driver_id, "assigned driver no longer exists");
            return Ok(());
        };
        let open_elsewhere = orders::Entity::find()
            .filter(orders::Column::AssignedDriverId.eq(driver_id.to_string()))
            .filter(orders::Column::Id.ne(order_id.to_string()))
            .filter(orders::Column::Status.is_in(OPEN_STATUSES.map(OrderStatus::as_str)))
            .count(db)
            .await?;
        if open_elsewhere > 0 {
            tracing::debug!(driver = %driver_id, open_elsewhere, "driver kept busy");
            return Ok(());
        }
        if release == DriverRelease::DeliveryEnded
            && driver.availability != DriverAvailability::Busy
        {
            return Ok(());
        }
        if driver.availability == DriverAvailability::Available {
            return Ok(());
        }
        driver.availability = DriverAvailability::Available;
        self.save_driver(db, &mut driver).await?;
        tracing::debug!(driver = %driver_id, ?release, "driver released");
        Ok(())
    }
}

/// Statuses in which an order still holds its driver.
const OPEN_STATUSES: [OrderStatus; 3] = [
    OrderStatus::Pending,
    OrderStatus::Assigned,
    OrderStatus::InTransit,
];

/// Why a driver is let go from an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DriverRelease {
    /// Another driver took the order: always back to available.
    Reassigned,
    /// The order reached a final status: only a driver still busy is freed.
    DeliveryEnded,
}
