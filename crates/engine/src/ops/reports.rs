//! Read-only projections for the admin dashboard.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, Select, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Driver, Order, OrderStatus, PaymentStatus, ResultEngine, Role, customers, drivers, orders,
    users,
    util::{parse_uuid, validate_range},
};

use super::{Engine, with_tx};

/// Optional `created_at` window of a report, both ends inclusive.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ReportRange {
    fn apply(self, mut query: Select<orders::Entity>) -> Select<orders::Entity> {
        if let Some(from) = self.from {
            query = query.filter(orders::Column::CreatedAt.gte(from));
        }
        if let Some(to) = self.to {
            query = query.filter(orders::Column::CreatedAt.lte(to));
        }
        query
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderReportRow {
    pub order: Order,
    pub driver_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub username: String,
    pub role: Option<Role>,
    pub total_orders: i64,
    pub total_amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverSummary {
    pub driver: Driver,
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub in_transit_orders: i64,
    /// Sum of the prices of the driver's orders whose payment was collected.
    pub total_collected_minor: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevenueSummary {
    pub total_revenue_minor: i64,
    pub paid_orders: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerSummary {
    pub customer_id: Uuid,
    pub name: String,
    pub phone: String,
    pub balance_minor: i64,
    pub total_orders: i64,
    pub total_value_minor: i64,
    pub pending_payments_minor: i64,
    pub returned_orders: i64,
}

impl Engine {
    /// Orders in the range, newest first, with the name of their driver.
    pub async fn orders_report(&self, range: ReportRange) -> ResultEngine<Vec<OrderReportRow>> {
        validate_range(range.from, range.to)?;
        with_tx!(self, |db_tx| {
            let names: HashMap<String, String> = drivers::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|d| (d.id, d.name))
                .collect();
            let models = range
                .apply(orders::Entity::find())
                .order_by_desc(orders::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            let rows: Vec<_> = self
                .orders_with_tracking(&db_tx, models)
                .await?
                .into_iter()
                .map(|order| {
                    let driver_name = order
                        .assigned_driver_id
                        .and_then(|id| names.get(&id.to_string()).cloned());
                    OrderReportRow { order, driver_name }
                })
                .collect();
            Ok(rows)
        })
    }

    /// Orders created and amount handled per user, busiest first.
    pub async fn employees_report(&self, range: ReportRange) -> ResultEngine<Vec<EmployeeSummary>> {
        validate_range(range.from, range.to)?;
        with_tx!(self, |db_tx| {
            let mut summaries: BTreeMap<String, EmployeeSummary> = BTreeMap::new();
            for user in users::Entity::find().all(&db_tx).await? {
                let role = user.role().ok();
                summaries.insert(
                    user.username.clone(),
                    EmployeeSummary {
                        username: user.username,
                        role,
                        total_orders: 0,
                        total_amount_minor: 0,
                    },
                );
            }
            for order in range.apply(orders::Entity::find()).all(&db_tx).await? {
                let summary = summaries
                    .entry(order.created_by.clone())
                    .or_insert_with(|| EmployeeSummary {
                        username: order.created_by.clone(),
                        role: None,
                        total_orders: 0,
                        total_amount_minor: 0,
                    });
                summary.total_orders += 1;
                summary.total_amount_minor += order.price_minor;
            }

            let mut rows: Vec<_> = summaries.into_values().collect();
            rows.sort_by(|a, b| b.total_orders.cmp(&a.total_orders));
            Ok(rows)
        })
    }

    /// Workload and collected money per driver.
    pub async fn drivers_report(&self) -> ResultEngine<Vec<DriverSummary>> {
        with_tx!(self, |db_tx| {
            let mut by_driver: HashMap<String, Vec<orders::Model>> = HashMap::new();
            for order in orders::Entity::find()
                .filter(orders::Column::AssignedDriverId.is_not_null())
                .all(&db_tx)
                .await?
            {
                if let Some(driver_id) = order.assigned_driver_id.clone() {
                    by_driver.entry(driver_id).or_default().push(order);
                }
            }

            let mut rows = Vec::new();
            for model in drivers::Entity::find()
                .order_by_asc(drivers::Column::Name)
                .all(&db_tx)
                .await?
            {
                let orders = by_driver.remove(&model.id).unwrap_or_default();
                let driver = Driver::try_from(model)?;
                let mut summary = DriverSummary {
                    driver,
                    total_orders: 0,
                    delivered_orders: 0,
                    in_transit_orders: 0,
                    total_collected_minor: 0,
                };
                for order in orders {
                    summary.total_orders += 1;
                    let status = OrderStatus::try_from(order.status.as_str())?;
                    match status {
                        OrderStatus::Delivered | OrderStatus::Paid => summary.delivered_orders += 1,
                        OrderStatus::InTransit => summary.in_transit_orders += 1,
                        _ => {}
                    }
                    if order.payment_status == PaymentStatus::Paid.as_str() {
                        summary.total_collected_minor += order.price_minor;
                    }
                }
                rows.push(summary);
            }
            Ok(rows)
        })
    }

    /// Money collected from receivers in the range.
    pub async fn revenue_report(&self, range: ReportRange) -> ResultEngine<RevenueSummary> {
        validate_range(range.from, range.to)?;
        with_tx!(self, |db_tx| {
            let paid = range
                .apply(orders::Entity::find())
                .filter(orders::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
                .all(&db_tx)
                .await?;
            Ok(RevenueSummary {
                total_revenue_minor: paid.iter().map(|o| o.price_minor).sum(),
                paid_orders: paid.len() as i64,
            })
        })
    }

    /// Stored ledger figures of every customer, most orders first.
    pub async fn customers_report(&self) -> ResultEngine<Vec<CustomerSummary>> {
        with_tx!(self, |db_tx| {
            customers::Entity::find()
                .order_by_desc(customers::Column::TotalOrders)
                .order_by_asc(customers::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| {
                    Ok(CustomerSummary {
                        customer_id: parse_uuid(&model.id, "customer")?,
                        name: model.name,
                        phone: model.phone,
                        balance_minor: model.balance_minor,
                        total_orders: model.total_orders,
                        total_value_minor: model.total_value_minor,
                        pending_payments_minor: model.pending_payments_minor,
                        returned_orders: model.returned_orders,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Returned orders in the range, newest first.
    pub async fn returned_orders_report(&self, range: ReportRange) -> ResultEngine<Vec<Order>> {
        validate_range(range.from, range.to)?;
        with_tx!(self, |db_tx| {
            let models = range
                .apply(orders::Entity::find())
                .filter(orders::Column::Status.eq(OrderStatus::Returned.as_str()))
                .order_by_desc(orders::Column::UpdatedAt)
                .all(&db_tx)
                .await?;
            self.orders_with_tracking(&db_tx, models).await
        })
    }
}
