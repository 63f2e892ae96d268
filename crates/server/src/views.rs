//! Conversions from engine values to API bodies, and back for enums.

use api_types::{
    customer::{CustomerDetails, CustomerStats, CustomerView, PayoutView},
    driver::{DriverAvailability, DriverView},
    order::{OrderStatus, OrderView, PaymentStatus, TrackingView},
    payment::{PaymentMethod, PaymentRecordStatus, PaymentView},
    report::{CustomerReportRow, DriverReportRow, EmployeeReportRow, OrderReportRow, Revenue},
    user::{Role, UserView},
};

pub fn order_status(status: engine::OrderStatus) -> OrderStatus {
    match status {
        engine::OrderStatus::Pending => OrderStatus::Pending,
        engine::OrderStatus::Assigned => OrderStatus::Assigned,
        engine::OrderStatus::InTransit => OrderStatus::InTransit,
        engine::OrderStatus::Delivered => OrderStatus::Delivered,
        engine::OrderStatus::Paid => OrderStatus::Paid,
        engine::OrderStatus::Cancelled => OrderStatus::Cancelled,
        engine::OrderStatus::Returned => OrderStatus::Returned,
    }
}

pub fn engine_order_status(status: OrderStatus) -> engine::OrderStatus {
    match status {
        OrderStatus::Pending => engine::OrderStatus::Pending,
        OrderStatus::Assigned => engine::OrderStatus::Assigned,
        OrderStatus::InTransit => engine::OrderStatus::InTransit,
        OrderStatus::Delivered => engine::OrderStatus::Delivered,
        OrderStatus::Paid => engine::OrderStatus::Paid,
        OrderStatus::Cancelled => engine::OrderStatus::Cancelled,
        OrderStatus::Returned => engine::OrderStatus::Returned,
    }
}

pub fn payment_status(status: engine::PaymentStatus) -> PaymentStatus {
    match status {
        engine::PaymentStatus::Pending => PaymentStatus::Pending,
        engine::PaymentStatus::Paid => PaymentStatus::Paid,
        engine::PaymentStatus::Failed => PaymentStatus::Failed,
    }
}

pub fn engine_payment_status(status: PaymentStatus) -> engine::PaymentStatus {
    match status {
        PaymentStatus::Pending => engine::PaymentStatus::Pending,
        PaymentStatus::Paid => engine::PaymentStatus::Paid,
        PaymentStatus::Failed => engine::PaymentStatus::Failed,
    }
}

pub fn availability(value: engine::DriverAvailability) -> DriverAvailability {
    match value {
        engine::DriverAvailability::Available => DriverAvailability::Available,
        engine::DriverAvailability::Busy => DriverAvailability::Busy,
        engine::DriverAvailability::Off => DriverAvailability::Off,
    }
}

pub fn engine_availability(value: DriverAvailability) -> engine::DriverAvailability {
    match value {
        DriverAvailability::Available => engine::DriverAvailability::Available,
        DriverAvailability::Busy => engine::DriverAvailability::Busy,
        DriverAvailability::Off => engine::DriverAvailability::Off,
    }
}

pub fn engine_payment_method(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::Cash => engine::PaymentMethod::Cash,
        PaymentMethod::CreditCard => engine::PaymentMethod::CreditCard,
    }
}

pub fn engine_payment_record_status(status: PaymentRecordStatus) -> engine::PaymentRecordStatus {
    match status {
        PaymentRecordStatus::Pending => engine::PaymentRecordStatus::Pending,
        PaymentRecordStatus::Completed => engine::PaymentRecordStatus::Completed,
        PaymentRecordStatus::Failed => engine::PaymentRecordStatus::Failed,
    }
}

pub fn role(role: engine::Role) -> Role {
    match role {
        engine::Role::Admin => Role::Admin,
        engine::Role::Employee => Role::Employee,
    }
}

pub fn engine_role(role: Role) -> engine::Role {
    match role {
        Role::Admin => engine::Role::Admin,
        Role::Employee => engine::Role::Employee,
    }
}

pub fn order(order: engine::Order) -> OrderView {
    OrderView {
        id: order.id,
        order_number: order.order_number,
        sender_customer_id: order.sender_customer_id,
        customer_name: order.customer_name,
        customer_phone: order.customer_phone,
        receiver_name: order.receiver_name,
        receiver_phone: order.receiver_phone,
        origin: order.origin,
        destination: order.destination,
        product_details: order.product_details,
        pieces: order.pieces,
        weight: order.weight,
        product_price_minor: order.product_price_minor,
        shipping_cost_minor: order.shipping_cost_minor,
        price_minor: order.price_minor,
        assigned_driver_id: order.assigned_driver_id,
        status: order_status(order.status),
        payment_status: payment_status(order.payment_status),
        return_reason: order.return_reason,
        refund_status: order.refund_status.as_str().to_string(),
        refunded_minor: order.refunded_minor,
        refund_notes: order.refund_notes,
        refunded_at: order.refunded_at,
        accrual_status: order.accrual_status.as_str().to_string(),
        sender_payout_status: order.sender_payout_status.as_str().to_string(),
        sender_payout_minor: order.sender_payout_minor,
        sender_payout_at: order.sender_payout_at,
        return_settled: order.return_settled,
        tracking: order
            .tracking
            .into_iter()
            .map(|entry| TrackingView {
                status: entry.status,
                location: entry.location,
                notes: entry.notes,
                timestamp: entry.timestamp,
            })
            .collect(),
        created_by: order.created_by,
        created_at: order.created_at,
        updated_at: order.updated_at,
        version: order.version,
    }
}

pub fn customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
        address: customer.address,
        notes: customer.notes,
        balance_minor: customer.balance_minor,
        total_orders: customer.total_orders,
        total_value_minor: customer.total_value_minor,
        pending_payments_minor: customer.pending_payments_minor,
        returned_orders: customer.returned_orders,
        payout_history: customer
            .payout_history
            .into_iter()
            .map(|payout| PayoutView {
                id: payout.id,
                order_id: payout.order_id,
                amount_minor: payout.amount_minor,
                notes: payout.notes,
                by: payout.by,
                at: payout.at,
            })
            .collect(),
        created_by: customer.created_by,
        created_at: customer.created_at,
        updated_at: customer.updated_at,
        version: customer.version,
    }
}

pub fn customer_details(details: engine::CustomerDetails) -> CustomerDetails {
    CustomerDetails {
        customer: customer(details.customer),
        orders: details.orders.into_iter().map(order).collect(),
        stats: CustomerStats {
            total_orders: details.stats.total_orders,
            total_value_minor: details.stats.total_value_minor,
            pending_payments_minor: details.stats.pending_payments_minor,
            returned_orders: details.stats.returned_orders,
        },
    }
}

pub fn driver(driver: engine::Driver) -> DriverView {
    DriverView {
        id: driver.id,
        name: driver.name,
        phone: driver.phone,
        vehicle: driver.vehicle,
        status: availability(driver.availability),
        created_at: driver.created_at,
        updated_at: driver.updated_at,
    }
}

pub fn payment(payment: engine::Payment) -> PaymentView {
    PaymentView {
        id: payment.id,
        order_id: payment.order_id,
        amount_minor: payment.amount_minor,
        method: match payment.method {
            engine::PaymentMethod::Cash => PaymentMethod::Cash,
            engine::PaymentMethod::CreditCard => PaymentMethod::CreditCard,
        },
        status: match payment.status {
            engine::PaymentRecordStatus::Pending => PaymentRecordStatus::Pending,
            engine::PaymentRecordStatus::Completed => PaymentRecordStatus::Completed,
            engine::PaymentRecordStatus::Failed => PaymentRecordStatus::Failed,
        },
        transaction_id: payment.transaction_id,
        created_at: payment.created_at,
    }
}

pub fn order_report_row(row: engine::OrderReportRow) -> OrderReportRow {
    OrderReportRow {
        order: order(row.order),
        driver_name: row.driver_name,
    }
}

pub fn employee_report_row(row: engine::EmployeeSummary) -> EmployeeReportRow {
    EmployeeReportRow {
        username: row.username,
        role: row.role.map(role),
        total_orders: row.total_orders,
        total_amount_minor: row.total_amount_minor,
    }
}

pub fn driver_report_row(row: engine::DriverSummary) -> DriverReportRow {
    DriverReportRow {
        driver: driver(row.driver),
        total_orders: row.total_orders,
        delivered_orders: row.delivered_orders,
        in_transit_orders: row.in_transit_orders,
        total_collected_minor: row.total_collected_minor,
    }
}

pub fn revenue(summary: engine::RevenueSummary) -> Revenue {
    Revenue {
        total_revenue_minor: summary.total_revenue_minor,
        paid_orders: summary.paid_orders,
    }
}

pub fn customer_report_row(row: engine::CustomerSummary) -> CustomerReportRow {
    CustomerReportRow {
        customer_id: row.customer_id,
        name: row.name,
        phone: row.phone,
        balance_minor: row.balance_minor,
        total_orders: row.total_orders,
        total_value_minor: row.total_value_minor,
        pending_payments_minor: row.pending_payments_minor,
        returned_orders: row.returned_orders,
    }
}

pub fn user(username: String, user_role: engine::Role) -> UserView {
    UserView {
        username,
        role: role(user_role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_statuses_keep_their_wire_spelling() {
        for status in [
            engine::OrderStatus::Pending,
            engine::OrderStatus::Assigned,
            engine::OrderStatus::InTransit,
            engine::OrderStatus::Delivered,
            engine::OrderStatus::Paid,
            engine::OrderStatus::Cancelled,
            engine::OrderStatus::Returned,
        ] {
            let dto = order_status(status);
            assert_eq!(dto.as_str(), status.as_str());
            assert_eq!(engine_order_status(dto), status);
        }
    }

    #[test]
    fn availability_keeps_its_wire_spelling() {
        for value in [
            engine::DriverAvailability::Available,
            engine::DriverAvailability::Busy,
            engine::DriverAvailability::Off,
        ] {
            assert_eq!(availability(value).as_str(), value.as_str());
        }
    }
}
