//! Request and response bodies of the courier HTTP API.
//!
//! Amounts are integer minor units (`*_minor`). Enum values use the same
//! spelling as the server stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine readable kind (`not_found`, `invalid_state`, ...).
    pub kind: String,
    pub error: String,
}

pub mod order {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum OrderStatus {
        Pending,
        Assigned,
        InTransit,
        Delivered,
        Paid,
        Cancelled,
        Returned,
    }

    impl OrderStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Assigned => "assigned",
                Self::InTransit => "in-transit",
                Self::Delivered => "delivered",
                Self::Paid => "paid",
                Self::Cancelled => "cancelled",
                Self::Returned => "returned",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentStatus {
        Pending,
        Paid,
        Failed,
    }

    impl PaymentStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Paid => "paid",
                Self::Failed => "failed",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        /// Linked sender customer.
        pub sender_customer_id: Option<Uuid>,
        /// Free-text sender, for orders without a customer record.
        pub customer_name: Option<String>,
        pub customer_phone: Option<String>,
        pub receiver_name: String,
        pub receiver_phone: String,
        pub origin: String,
        pub destination: String,
        pub product_details: Option<String>,
        pub pieces: Option<i32>,
        pub weight: Option<f64>,
        pub product_price_minor: Option<i64>,
        pub shipping_cost_minor: Option<i64>,
        /// Used only when neither component is given.
        pub price_minor: Option<i64>,
        pub driver_id: Option<Uuid>,
        pub order_number: Option<String>,
    }

    /// Patch of an order. Fields not listed here are rejected.
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct OrderUpdate {
        pub customer_name: Option<String>,
        pub customer_phone: Option<String>,
        pub receiver_name: Option<String>,
        pub receiver_phone: Option<String>,
        pub origin: Option<String>,
        pub destination: Option<String>,
        pub product_details: Option<String>,
        pub pieces: Option<i32>,
        pub weight: Option<f64>,
        pub product_price_minor: Option<i64>,
        pub shipping_cost_minor: Option<i64>,
        pub price_minor: Option<i64>,
        pub return_reason: Option<String>,
        pub driver_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OrderList {
        pub status: Option<OrderStatus>,
        pub driver_id: Option<Uuid>,
        pub sender_customer_id: Option<Uuid>,
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusUpdate {
        pub status: OrderStatus,
        pub location: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub payment_status: PaymentStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverAssign {
        pub driver_id: Uuid,
    }

    /// Free-form audit entry; `status` does not have to be an order status.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackingNew {
        pub status: String,
        pub location: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RefundNew {
        pub amount_minor: i64,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SenderPayoutNew {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackingView {
        pub status: String,
        pub location: Option<String>,
        pub notes: Option<String>,
        pub timestamp: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: Uuid,
        pub order_number: String,
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
        pub product_price_minor: i64,
        pub shipping_cost_minor: i64,
        pub price_minor: i64,
        pub assigned_driver_id: Option<Uuid>,
        pub status: OrderStatus,
        pub payment_status: PaymentStatus,
        pub return_reason: Option<String>,
        /// `none`, `partial` or `full`.
        pub refund_status: String,
        pub refunded_minor: i64,
        pub refund_notes: Option<String>,
        pub refunded_at: Option<DateTime<Utc>>,
        /// `pending`, `accrued` or `reversed`.
        pub accrual_status: String,
        /// `none`, `pending` or `paid`.
        pub sender_payout_status: String,
        pub sender_payout_minor: i64,
        pub sender_payout_at: Option<DateTime<Utc>>,
        pub return_settled: bool,
        pub tracking: Vec<TrackingView>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub version: i64,
    }
}

pub mod customer {
    use super::*;
    use crate::order::OrderView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub phone: String,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct CustomerUpdate {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PayoutNew {
        pub amount_minor: i64,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PayoutView {
        pub id: Uuid,
        pub order_id: Option<Uuid>,
        pub amount_minor: i64,
        pub notes: Option<String>,
        pub by: String,
        pub at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub phone: String,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
        pub balance_minor: i64,
        pub total_orders: i64,
        pub total_value_minor: i64,
        pub pending_payments_minor: i64,
        pub returned_orders: i64,
        pub payout_history: Vec<PayoutView>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub version: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerStats {
        pub total_orders: i64,
        pub total_value_minor: i64,
        pub pending_payments_minor: i64,
        pub returned_orders: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerDetails {
        pub customer: CustomerView,
        pub orders: Vec<OrderView>,
        pub stats: CustomerStats,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LinkedOrders {
        pub linked: u64,
    }
}

pub mod driver {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DriverAvailability {
        Available,
        Busy,
        Off,
    }

    impl DriverAvailability {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Available => "available",
                Self::Busy => "busy",
                Self::Off => "off",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverNew {
        pub name: String,
        pub phone: String,
        pub vehicle: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct DriverUpdate {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub vehicle: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverStatusUpdate {
        pub status: DriverAvailability,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverView {
        pub id: Uuid,
        pub name: String,
        pub phone: String,
        pub vehicle: Option<String>,
        pub status: DriverAvailability,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod payment {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        CreditCard,
    }

    impl PaymentMethod {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Cash => "cash",
                Self::CreditCard => "credit_card",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentRecordStatus {
        Pending,
        Completed,
        Failed,
    }

    impl PaymentRecordStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Completed => "completed",
                Self::Failed => "failed",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub order_id: Uuid,
        pub amount_minor: i64,
        pub method: PaymentMethod,
        pub transaction_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentStatusUpdate {
        pub status: PaymentRecordStatus,
        pub transaction_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub order_id: Uuid,
        pub amount_minor: i64,
        pub method: PaymentMethod,
        pub status: PaymentRecordStatus,
        pub transaction_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod report {
    use super::*;
    use crate::{driver::DriverView, order::OrderView, user::Role};

    /// Optional `created_at` window shared by the report endpoints.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderReportRow {
        #[serde(flatten)]
        pub order: OrderView,
        pub driver_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeReportRow {
        pub username: String,
        pub role: Option<Role>,
        pub total_orders: i64,
        pub total_amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverReportRow {
        pub driver: DriverView,
        pub total_orders: i64,
        pub delivered_orders: i64,
        pub in_transit_orders: i64,
        pub total_collected_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Revenue {
        pub total_revenue_minor: i64,
        pub paid_orders: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerReportRow {
        pub customer_id: Uuid,
        pub name: String,
        pub phone: String,
        pub balance_minor: i64,
        pub total_orders: i64,
        pub total_value_minor: i64,
        pub pending_payments_minor: i64,
        pub returned_orders: i64,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Admin,
        Employee,
    }

    impl Role {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "admin",
                Self::Employee => "employee",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub password: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub role: Role,
    }
}
