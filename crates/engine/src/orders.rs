//! Shipment orders.
//!
//! An `Order` moves a parcel from a sender to a receiver. Besides the shipping
//! status it tracks three money sub-states:
//!
//! - `payment_status`: whether the receiver paid on delivery;
//! - `refund_status`/`refunded_minor`: money given back on the order;
//! - `sender_payout_status`/`sender_payout_minor`: money handed to the sender.
//!
//! `accrual_status` records whether the order price is currently counted in
//! the sender customer balance (see [`crate::ledger`]).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    ledger::LedgerView,
    order_tracking::TrackingEntry,
    pricing::Quote,
    util::{parse_optional_uuid, parse_uuid, str_enum},
};

str_enum! {
    /// Shipping status of an order.
    pub enum OrderStatus ("order status") {
        Pending => "pending",
        Assigned => "assigned",
        InTransit => "in-transit",
        Delivered => "delivered",
        Paid => "paid",
        Cancelled => "cancelled",
        Returned => "returned",
    }
}

impl OrderStatus {
    /// `true` for the statuses where the assigned driver is done with the
    /// order.
    pub fn ends_delivery(self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Paid | Self::Cancelled | Self::Returned
        )
    }
}

str_enum! {
    /// Payment collected for the order.
    pub enum PaymentStatus ("payment status") {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
    }
}

str_enum! {
    /// Whether the order price is counted in the sender balance.
    pub enum AccrualStatus ("accrual status") {
        Pending => "pending",
        Accrued => "accrued",
        Reversed => "reversed",
    }
}

str_enum! {
    pub enum RefundStatus ("refund status") {
        NotRefunded => "none",
        Partial => "partial",
        Full => "full",
    }
}

str_enum! {
    pub enum SenderPayoutStatus ("sender payout status") {
        NotPaid => "none",
        Pending => "pending",
        Paid => "paid",
    }
}

/// Reason recorded when a failed payment sends the order back.
pub const PAYMENT_FAILED_REASON: &str = "Payment failed";

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: Uuid,
    /// `ORD-<millis>-<n>`, immutable once assigned.
    pub order_number: String,
    pub sender_customer_id: Option<Uuid>,
    /// Free-text sender kept for orders created before customers existed.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub origin: String,
    pub destination: String,
    pub product_details: Option<String>,
    pub pieces: i32,
    pub weight: Option<f64>,
    pub product_price_minor: i64,
    pub shipping_cost_minor: i64,
    pub price_minor: i64,
    pub assigned_driver_id: Option<Uuid>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub return_reason: Option<String>,
    pub refund_status: RefundStatus,
    pub refunded_minor: i64,
    pub refund_notes: Option<String>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub accrual_status: AccrualStatus,
    pub sender_payout_status: SenderPayoutStatus,
    pub sender_payout_minor: i64,
    pub sender_payout_at: Option<DateTime<Utc>>,
    pub return_settled: bool,
    pub tracking: Vec<TrackingEntry>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Descriptive fields of a new order.
#[derive(Clone, Debug, Default)]
pub(crate) struct OrderParties {
    pub sender_customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub origin: String,
    pub destination: String,
    pub product_details: Option<String>,
    pub pieces: i32,
    pub weight: Option<f64>,
}

impl Order {
    pub(crate) fn new(
        order_number: String,
        parties: OrderParties,
        quote: Quote,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_number,
            sender_customer_id: parties.sender_customer_id,
            customer_name: parties.customer_name,
            customer_phone: parties.customer_phone,
            receiver_name: parties.receiver_name,
            receiver_phone: parties.receiver_phone,
            origin: parties.origin,
            destination: parties.destination,
            product_details: parties.product_details,
            pieces: parties.pieces,
            weight: parties.weight,
            product_price_minor: quote.product_price_minor,
            shipping_cost_minor: quote.shipping_cost_minor,
            price_minor: quote.price_minor,
            assigned_driver_id: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            return_reason: None,
            refund_status: RefundStatus::NotRefunded,
            refunded_minor: 0,
            refund_notes: None,
            refunded_at: None,
            accrual_status: AccrualStatus::Pending,
            sender_payout_status: SenderPayoutStatus::NotPaid,
            sender_payout_minor: 0,
            sender_payout_at: None,
            return_settled: false,
            tracking: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Snapshot of the fields the sender ledger depends on.
    pub fn ledger_view(&self) -> LedgerView {
        LedgerView {
            price_minor: self.price_minor,
            accrual: self.accrual_status,
            payment: self.payment_status,
        }
    }

    /// `true` once the receiver's payment has been collected.
    pub fn is_payment_cleared(&self) -> bool {
        self.payment_status == PaymentStatus::Paid || self.status == OrderStatus::Paid
    }

    /// Appends an audit entry and returns it.
    pub(crate) fn track(
        &mut self,
        status: &str,
        location: Option<String>,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> TrackingEntry {
        let entry = TrackingEntry {
            id: Uuid::new_v4(),
            order_id: self.id,
            seq: self.tracking.len() as i64,
            status: status.to_string(),
            location,
            notes,
            timestamp: at,
        };
        self.tracking.push(entry.clone());
        entry
    }

    /// Replaces the order amounts, keeping refunds and payouts within the new
    /// price.
    pub(crate) fn reprice(&mut self, quote: Quote) -> ResultEngine<()> {
        if self.refunded_minor > quote.price_minor {
            return Err(EngineError::InvalidArgument(
                "price cannot be lower than the refunded amount".to_string(),
            ));
        }
        if self.sender_payout_minor > quote.price_minor {
            return Err(EngineError::InvalidArgument(
                "price cannot be lower than the amount paid out to the sender".to_string(),
            ));
        }
        self.product_price_minor = quote.product_price_minor;
        self.shipping_cost_minor = quote.shipping_cost_minor;
        self.price_minor = quote.price_minor;

        if self.refunded_minor > 0 {
            self.refund_status = refund_status_for(self.refunded_minor, self.price_minor);
        }
        if self.sender_payout_minor > 0 {
            self.sender_payout_status =
                payout_status_for(self.sender_payout_minor, self.price_minor);
        }
        Ok(())
    }

    /// Accumulates a refund on the order.
    pub(crate) fn apply_refund(
        &mut self,
        amount_minor: i64,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "refund amount must be > 0".to_string(),
            ));
        }
        let total = self
            .refunded_minor
            .checked_add(amount_minor)
            .filter(|total| *total <= self.price_minor)
            .ok_or_else(|| {
                EngineError::InvalidArgument("refund exceeds the order price".to_string())
            })?;

        self.refunded_minor = total;
        self.refund_status = refund_status_for(total, self.price_minor);
        if notes.is_some() {
            self.refund_notes = notes;
        }
        self.refunded_at = Some(at);
        Ok(())
    }

    /// Accumulates money handed to the sender for this order.
    pub(crate) fn apply_sender_payout(
        &mut self,
        amount_minor: i64,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if !self.is_payment_cleared() {
            return Err(EngineError::InvalidState(
                "sender payout requires the order to be paid".to_string(),
            ));
        }
        if amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "payout amount must be > 0".to_string(),
            ));
        }
        let total = self
            .sender_payout_minor
            .checked_add(amount_minor)
            .filter(|total| *total <= self.price_minor)
            .ok_or_else(|| {
                EngineError::InvalidArgument("payout exceeds the order price".to_string())
            })?;

        self.sender_payout_minor = total;
        self.sender_payout_status = payout_status_for(total, self.price_minor);
        self.sender_payout_at = Some(at);
        Ok(())
    }

    /// Marks a returned order as reconciled with the sender.
    ///
    /// Returns `false` when it was already settled.
    pub(crate) fn settle_return(&mut self) -> ResultEngine<bool> {
        if self.status != OrderStatus::Returned {
            return Err(EngineError::InvalidState(
                "only returned orders can be settled".to_string(),
            ));
        }
        if self.return_settled {
            return Ok(false);
        }
        self.return_settled = true;
        Ok(true)
    }
}

fn refund_status_for(refunded_minor: i64, price_minor: i64) -> RefundStatus {
    if refunded_minor >= price_minor {
        RefundStatus::Full
    } else {
        RefundStatus::Partial
    }
}

fn payout_status_for(paid_minor: i64, price_minor: i64) -> SenderPayoutStatus {
    if paid_minor >= price_minor {
        SenderPayoutStatus::Paid
    } else {
        SenderPayoutStatus::Pending
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub order_number: String,
    pub sender_customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub origin: String,
    pub destination: String,
    pub product_details: Option<String>,
    pub pieces: i32,
    pub weight: Option<f64>,
    pub product_price_minor: i64,
    pub shipping_cost_minor: i64,
    pub price_minor: i64,
    pub assigned_driver_id: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub return_reason: Option<String>,
    pub refund_status: String,
    pub refunded_minor: i64,
    pub refund_notes: Option<String>,
    pub refunded_at: Option<DateTimeUtc>,
    pub accrual_status: String,
    pub sender_payout_status: String,
    pub sender_payout_minor: i64,
    pub sender_payout_at: Option<DateTimeUtc>,
    pub return_settled: bool,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_tracking::Entity")]
    Tracking,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::SenderCustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    SenderCustomer,
}

impl Related<super::order_tracking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracking.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SenderCustomer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        Self {
            id: ActiveValue::Set(order.id.to_string()),
            order_number: ActiveValue::Set(order.order_number.clone()),
            sender_customer_id: ActiveValue::Set(
                order.sender_customer_id.map(|id| id.to_string()),
            ),
            customer_name: ActiveValue::Set(order.customer_name.clone()),
            customer_phone: ActiveValue::Set(order.customer_phone.clone()),
            receiver_name: ActiveValue::Set(order.receiver_name.clone()),
            receiver_phone: ActiveValue::Set(order.receiver_phone.clone()),
            origin: ActiveValue::Set(order.origin.clone()),
            destination: ActiveValue::Set(order.destination.clone()),
            product_details: ActiveValue::Set(order.product_details.clone()),
            pieces: ActiveValue::Set(order.pieces),
            weight: ActiveValue::Set(order.weight),
            product_price_minor: ActiveValue::Set(order.product_price_minor),
            shipping_cost_minor: ActiveValue::Set(order.shipping_cost_minor),
            price_minor: ActiveValue::Set(order.price_minor),
            assigned_driver_id: ActiveValue::Set(
                order.assigned_driver_id.map(|id| id.to_string()),
            ),
            status: ActiveValue::Set(order.status.as_str().to_string()),
            payment_status: ActiveValue::Set(order.payment_status.as_str().to_string()),
            return_reason: ActiveValue::Set(order.return_reason.clone()),
            refund_status: ActiveValue::Set(order.refund_status.as_str().to_string()),
            refunded_minor: ActiveValue::Set(order.refunded_minor),
            refund_notes: ActiveValue::Set(order.refund_notes.clone()),
            refunded_at: ActiveValue::Set(order.refunded_at),
            accrual_status: ActiveValue::Set(order.accrual_status.as_str().to_string()),
            sender_payout_status: ActiveValue::Set(
                order.sender_payout_status.as_str().to_string(),
            ),
            sender_payout_minor: ActiveValue::Set(order.sender_payout_minor),
            sender_payout_at: ActiveValue::Set(order.sender_payout_at),
            return_settled: ActiveValue::Set(order.return_settled),
            created_by: ActiveValue::Set(order.created_by.clone()),
            created_at: ActiveValue::Set(order.created_at),
            updated_at: ActiveValue::Set(order.updated_at),
            version: ActiveValue::Set(order.version),
        }
    }
}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "order")?,
            order_number: model.order_number,
            sender_customer_id: parse_optional_uuid(
                model.sender_customer_id.as_deref(),
                "customer",
            )?,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            receiver_name: model.receiver_name,
            receiver_phone: model.receiver_phone,
            origin: model.origin,
            destination: model.destination,
            product_details: model.product_details,
            pieces: model.pieces,
            weight: model.weight,
            product_price_minor: model.product_price_minor,
            shipping_cost_minor: model.shipping_cost_minor,
            price_minor: model.price_minor,
            assigned_driver_id: parse_optional_uuid(
                model.assigned_driver_id.as_deref(),
                "driver",
            )?,
            status: OrderStatus::try_from(model.status.as_str())?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            return_reason: model.return_reason,
            refund_status: RefundStatus::try_from(model.refund_status.as_str())?,
            refunded_minor: model.refunded_minor,
            refund_notes: model.refund_notes,
            refunded_at: model.refunded_at,
            accrual_status: AccrualStatus::try_from(model.accrual_status.as_str())?,
            sender_payout_status: SenderPayoutStatus::try_from(
                model.sender_payout_status.as_str(),
            )?,
            sender_payout_minor: model.sender_payout_minor,
            sender_payout_at: model.sender_payout_at,
            return_settled: model.return_settled,
            tracking: Vec::new(),
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn order(price_minor: i64) -> Order {
        let quote = Quote {
            price_minor,
            ..Quote::default()
        };
        Order::new(
            "ORD-1-1".to_string(),
            OrderParties {
                receiver_name: "Rana".to_string(),
                receiver_phone: "0100".to_string(),
                origin: "Cairo".to_string(),
                destination: "Giza".to_string(),
                pieces: 1,
                ..OrderParties::default()
            },
            quote,
            "alice".to_string(),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(100, 0).unwrap()
    }

    #[test]
    fn partial_then_full_refund() {
        let mut order = order(12_000);
        order.apply_refund(2_000, Some("damaged".to_string()), now()).unwrap();
        assert_eq!(order.refund_status, RefundStatus::Partial);
        assert_eq!(order.refunded_minor, 2_000);

        order.apply_refund(10_000, None, now()).unwrap();
        assert_eq!(order.refund_status, RefundStatus::Full);
        assert_eq!(order.refund_notes.as_deref(), Some("damaged"));
        assert_eq!(order.refunded_at, Some(now()));
    }

    #[test]
    fn refund_above_price_is_rejected_without_changes() {
        let mut order = order(12_000);
        let err = order.apply_refund(15_000, None, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(order.refunded_minor, 0);
        assert_eq!(order.refund_status, RefundStatus::NotRefunded);
    }

    #[test]
    fn refund_must_be_positive() {
        let mut order = order(12_000);
        assert!(order.apply_refund(0, None, now()).is_err());
        assert!(order.apply_refund(-1, None, now()).is_err());
    }

    #[test]
    fn sender_payout_requires_payment() {
        let mut order = order(12_000);
        let err = order.apply_sender_payout(1_000, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        order.payment_status = PaymentStatus::Paid;
        order.apply_sender_payout(1_000, now()).unwrap();
        assert_eq!(order.sender_payout_status, SenderPayoutStatus::Pending);
        order.apply_sender_payout(11_000, now()).unwrap();
        assert_eq!(order.sender_payout_status, SenderPayoutStatus::Paid);
        assert!(order.apply_sender_payout(1, now()).is_err());
    }

    #[test]
    fn paid_status_alone_allows_payout() {
        let mut order = order(5_000);
        order.status = OrderStatus::Paid;
        order.apply_sender_payout(5_000, now()).unwrap();
        assert_eq!(order.sender_payout_status, SenderPayoutStatus::Paid);
    }

    #[test]
    fn settle_return_is_idempotent() {
        let mut order = order(5_000);
        assert!(order.settle_return().is_err());
        order.status = OrderStatus::Returned;
        assert!(order.settle_return().unwrap());
        assert!(!order.settle_return().unwrap());
        assert!(order.return_settled);
    }

    #[test]
    fn reprice_keeps_refund_within_price() {
        let mut order = order(10_000);
        order.apply_refund(4_000, None, now()).unwrap();
        let lower = Quote {
            price_minor: 3_000,
            ..Quote::default()
        };
        assert!(order.reprice(lower).is_err());

        let exact = Quote {
            price_minor: 4_000,
            ..Quote::default()
        };
        order.reprice(exact).unwrap();
        assert_eq!(order.refund_status, RefundStatus::Full);
    }

    #[test]
    fn tracking_is_append_only_and_ordered() {
        let mut order = order(1_000);
        order.track("pending", Some("System".to_string()), None, now());
        order.track("assigned", None, Some("driver on the way".to_string()), now());
        assert_eq!(order.tracking.len(), 2);
        assert_eq!(order.tracking[0].seq, 0);
        assert_eq!(order.tracking[1].seq, 1);
        assert_eq!(order.tracking[1].status, "assigned");
    }

    #[test]
    fn status_strings_round_trip_with_storage() {
        assert_eq!(OrderStatus::InTransit.as_str(), "in-transit");
        assert_eq!(
            OrderStatus::try_from("in-transit").unwrap(),
            OrderStatus::InTransit
        );
        assert!(OrderStatus::try_from("lost").is_err());
        assert_eq!(RefundStatus::NotRefunded.as_str(), "none");
    }
}
