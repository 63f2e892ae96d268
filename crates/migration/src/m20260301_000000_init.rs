//! Initial schema:
//!
//! - `users`: logins and their role
//! - `customers`: senders with their denormalized ledger
//! - `customer_payouts`: money handed to a sender
//! - `drivers`: couriers and their availability
//! - `orders`: shipments, with the `version` used for optimistic locking
//! - `order_tracking`: append-only audit log of an order
//! - `payments`: payment records attached to an order

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Address,
    Notes,
    BalanceMinor,
    TotalOrders,
    TotalValueMinor,
    PendingPaymentsMinor,
    ReturnedOrders,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(Iden)]
enum CustomerPayouts {
    Table,
    Id,
    CustomerId,
    OrderId,
    AmountMinor,
    Notes,
    PaidBy,
    PaidAt,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Name,
    Phone,
    Vehicle,
    Availability,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    SenderCustomerId,
    CustomerName,
    CustomerPhone,
    ReceiverName,
    ReceiverPhone,
    Origin,
    Destination,
    ProductDetails,
    Pieces,
    Weight,
    ProductPriceMinor,
    ShippingCostMinor,
    PriceMinor,
    AssignedDriverId,
    Status,
    PaymentStatus,
    ReturnReason,
    RefundStatus,
    RefundedMinor,
    RefundNotes,
    RefundedAt,
    AccrualStatus,
    SenderPayoutStatus,
    SenderPayoutMinor,
    SenderPayoutAt,
    ReturnSettled,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(Iden)]
enum OrderTracking {
    Table,
    Id,
    OrderId,
    Seq,
    Status,
    Location,
    Notes,
    Timestamp,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    OrderId,
    AmountMinor,
    Method,
    Status,
    TransactionId,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("employee"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Customers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(ColumnDef::new(Customers::Address).string())
                    .col(ColumnDef::new(Customers::Notes).string())
                    .col(ledger_counter(Customers::BalanceMinor))
                    .col(ledger_counter(Customers::TotalOrders))
                    .col(ledger_counter(Customers::TotalValueMinor))
                    .col(ledger_counter(Customers::PendingPaymentsMinor))
                    .col(ledger_counter(Customers::ReturnedOrders))
                    .col(ColumnDef::new(Customers::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                    .col(ledger_counter(Customers::Version))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customers-name-phone")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .col(Customers::Phone)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Customer payouts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CustomerPayouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerPayouts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerPayouts::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerPayouts::OrderId).string())
                    .col(
                        ColumnDef::new(CustomerPayouts::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerPayouts::Notes).string())
                    .col(ColumnDef::new(CustomerPayouts::PaidBy).string().not_null())
                    .col(
                        ColumnDef::new(CustomerPayouts::PaidAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customer_payouts-customer_id")
                            .from(CustomerPayouts::Table, CustomerPayouts::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customer_payouts-customer_id")
                    .table(CustomerPayouts::Table)
                    .col(CustomerPayouts::CustomerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Drivers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drivers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::Phone).string().not_null())
                    .col(ColumnDef::new(Drivers::Vehicle).string())
                    .col(
                        ColumnDef::new(Drivers::Availability)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(Drivers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Drivers::UpdatedAt).timestamp().not_null())
                    .col(ledger_counter(Drivers::Version))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Orders
        // ───────────────────────────────────────────────────────────────────
        // `assigned_driver_id` has no foreign key: deleting a driver leaves
        // its orders pointing at the old id.
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::OrderNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::SenderCustomerId).string())
                    .col(ColumnDef::new(Orders::CustomerName).string())
                    .col(ColumnDef::new(Orders::CustomerPhone).string())
                    .col(ColumnDef::new(Orders::ReceiverName).string().not_null())
                    .col(ColumnDef::new(Orders::ReceiverPhone).string().not_null())
                    .col(ColumnDef::new(Orders::Origin).string().not_null())
                    .col(ColumnDef::new(Orders::Destination).string().not_null())
                    .col(ColumnDef::new(Orders::ProductDetails).string())
                    .col(
                        ColumnDef::new(Orders::Pieces)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Orders::Weight).double())
                    .col(ledger_counter(Orders::ProductPriceMinor))
                    .col(ledger_counter(Orders::ShippingCostMinor))
                    .col(ColumnDef::new(Orders::PriceMinor).big_integer().not_null())
                    .col(ColumnDef::new(Orders::AssignedDriverId).string())
                    .col(status_column(Orders::Status, "pending"))
                    .col(status_column(Orders::PaymentStatus, "pending"))
                    .col(ColumnDef::new(Orders::ReturnReason).string())
                    .col(status_column(Orders::RefundStatus, "none"))
                    .col(ledger_counter(Orders::RefundedMinor))
                    .col(ColumnDef::new(Orders::RefundNotes).string())
                    .col(ColumnDef::new(Orders::RefundedAt).timestamp())
                    .col(status_column(Orders::AccrualStatus, "pending"))
                    .col(status_column(Orders::SenderPayoutStatus, "none"))
                    .col(ledger_counter(Orders::SenderPayoutMinor))
                    .col(ColumnDef::new(Orders::SenderPayoutAt).timestamp())
                    .col(
                        ColumnDef::new(Orders::ReturnSettled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Orders::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
                    .col(ledger_counter(Orders::Version))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-orders-sender_customer_id")
                            .from(Orders::Table, Orders::SenderCustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx-orders-status", Orders::Status),
            ("idx-orders-sender_customer_id", Orders::SenderCustomerId),
            ("idx-orders-assigned_driver_id", Orders::AssignedDriverId),
            ("idx-orders-created_at", Orders::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Orders::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // ───────────────────────────────────────────────────────────────────
        // 6. Order tracking
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(OrderTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderTracking::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderTracking::OrderId).string().not_null())
                    .col(ColumnDef::new(OrderTracking::Seq).big_integer().not_null())
                    .col(ColumnDef::new(OrderTracking::Status).string().not_null())
                    .col(ColumnDef::new(OrderTracking::Location).string())
                    .col(ColumnDef::new(OrderTracking::Notes).string())
                    .col(
                        ColumnDef::new(OrderTracking::Timestamp)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_tracking-order_id")
                            .from(OrderTracking::Table, OrderTracking::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-order_tracking-order_id-seq-unique")
                    .table(OrderTracking::Table)
                    .col(OrderTracking::OrderId)
                    .col(OrderTracking::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::OrderId).string().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(status_column(Payments::Status, "pending"))
                    .col(ColumnDef::new(Payments::TransactionId).string())
                    .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-order_id")
                            .from(Payments::Table, Payments::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderTracking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomerPayouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Non null integer column starting at zero.
fn ledger_counter(column: impl IntoIden) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

fn status_column(column: impl IntoIden, default: &str) -> ColumnDef {
    ColumnDef::new(column)
        .string()
        .not_null()
        .default(default)
        .to_owned()
}
