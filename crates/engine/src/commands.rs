//! Command structs for engine operations.
//!
//! These types group parameters for write operations (orders, customers,
//! drivers, payments), keeping call sites readable and avoiding long argument
//! lists.

use uuid::Uuid;

use crate::PaymentMethod;

/// Create an order.
///
/// Amounts are in minor units. When `product_price_minor` or
/// `shipping_cost_minor` is set the price is their sum, otherwise
/// `price_minor` is required.
#[derive(Clone, Debug, Default)]
pub struct NewOrderCmd {
    pub created_by: String,
    pub sender_customer_id: Option<Uuid>,
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
    pub price_minor: Option<i64>,
    pub driver_id: Option<Uuid>,
    pub order_number: Option<String>,
}

impl NewOrderCmd {
    #[must_use]
    pub fn new(
        created_by: impl Into<String>,
        receiver_name: impl Into<String>,
        receiver_phone: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            created_by: created_by.into(),
            receiver_name: receiver_name.into(),
            receiver_phone: receiver_phone.into(),
            origin: origin.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sender_customer(mut self, customer_id: Uuid) -> Self {
        self.sender_customer_id = Some(customer_id);
        self
    }

    /// Free-text sender for orders without a registered customer.
    #[must_use]
    pub fn legacy_sender(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self.customer_phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn product_details(mut self, details: impl Into<String>) -> Self {
        self.product_details = Some(details.into());
        self
    }

    #[must_use]
    pub fn pieces(mut self, pieces: i32) -> Self {
        self.pieces = Some(pieces);
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn product_price(mut self, amount_minor: i64) -> Self {
        self.product_price_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn shipping_cost(mut self, amount_minor: i64) -> Self {
        self.shipping_cost_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn price(mut self, amount_minor: i64) -> Self {
        self.price_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn driver(mut self, driver_id: Uuid) -> Self {
        self.driver_id = Some(driver_id);
        self
    }

    #[must_use]
    pub fn order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }
}

/// Patch an order. Only the fields listed here are mutable; `None` leaves
/// the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateOrderCmd {
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

impl UpdateOrderCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn receiver(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.receiver_name = Some(name.into());
        self.receiver_phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn product_price(mut self, amount_minor: i64) -> Self {
        self.product_price_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn shipping_cost(mut self, amount_minor: i64) -> Self {
        self.shipping_cost_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn price(mut self, amount_minor: i64) -> Self {
        self.price_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn driver(mut self, driver_id: Uuid) -> Self {
        self.driver_id = Some(driver_id);
        self
    }

    pub(crate) fn touches_price(&self) -> bool {
        self.product_price_minor.is_some()
            || self.shipping_cost_minor.is_some()
            || self.price_minor.is_some()
    }
}

/// Register a sender customer.
#[derive(Clone, Debug, Default)]
pub struct NewCustomerCmd {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

impl NewCustomerCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            created_by: created_by.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Patch the contact fields of a customer. Ledger fields are not editable.
#[derive(Clone, Debug, Default)]
pub struct UpdateCustomerCmd {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NewDriverCmd {
    pub name: String,
    pub phone: String,
    pub vehicle: Option<String>,
}

impl NewDriverCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            vehicle: None,
        }
    }

    #[must_use]
    pub fn vehicle(mut self, vehicle: impl Into<String>) -> Self {
        self.vehicle = Some(vehicle.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateDriverCmd {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub vehicle: Option<String>,
}

/// Record a payment against an order.
#[derive(Clone, Debug)]
pub struct NewPaymentCmd {
    pub order_id: Uuid,
    pub amount_minor: i64,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
}

impl NewPaymentCmd {
    #[must_use]
    pub fn new(order_id: Uuid, amount_minor: i64, method: PaymentMethod) -> Self {
        Self {
            order_id,
            amount_minor,
            method,
            transaction_id: None,
        }
    }

    #[must_use]
    pub fn transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}
