//! Courier engine: orders, sender customers, drivers and their ledger.
//!
//! All operations are methods of [`Engine`]; each one runs inside a single
//! database transaction so that the order, its tracking log, the assigned
//! driver and the sender customer are committed together.

pub use commands::{
    NewCustomerCmd, NewDriverCmd, NewOrderCmd, NewPaymentCmd, UpdateCustomerCmd, UpdateDriverCmd,
    UpdateOrderCmd,
};
pub use customer_payouts::Payout;
pub use customers::Customer;
pub use drivers::{Driver, DriverAvailability};
pub use error::EngineError;
pub use ledger::{LedgerDelta, LedgerView};
pub use lifecycle::{LedgerEffect, Transition, TransitionPolicy};
pub use money::MoneyCents;
pub use ops::{
    CustomerDetails, CustomerStats, CustomerSummary, DriverSummary, Engine, EngineBuilder,
    EmployeeSummary, OrderListFilter, OrderReportRow, ReportRange, RevenueSummary,
};
pub use order_tracking::TrackingEntry;
pub use orders::{
    AccrualStatus, Order, OrderStatus, PAYMENT_FAILED_REASON, PaymentStatus, RefundStatus,
    SenderPayoutStatus,
};
pub use payments::{Payment, PaymentMethod, PaymentRecordStatus};
pub use pricing::{Quote, quote};
pub use users::Role;

mod commands;
pub mod customer_payouts;
pub mod customers;
pub mod drivers;
mod error;
mod ledger;
mod lifecycle;
mod money;
mod ops;
pub mod order_tracking;
pub mod orders;
pub mod payments;
mod pricing;
pub mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
