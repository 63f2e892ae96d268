mod common;

use engine::{
    AccrualStatus, DriverAvailability, EngineError, OrderListFilter, OrderStatus, PaymentStatus,
    RefundStatus, SenderPayoutStatus, TransitionPolicy, UpdateOrderCmd,
};
use uuid::Uuid;

use common::{customer, driver, engine_with_db, engine_with_policy, order_cmd};

#[tokio::test]
async fn price_is_derived_from_product_and_shipping() {
    let (engine, _db) = engine_with_db().await;

    let order = engine
        .create_order(order_cmd().product_price(10_000).shipping_cost(2_000))
        .await
        .unwrap();

    assert_eq!(order.price_minor, 12_000);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.accrual_status, AccrualStatus::Pending);
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.pieces, 1);
    assert_eq!(order.tracking.len(), 1);
    assert_eq!(order.created_by, "alice");
}

#[tokio::test]
async fn explicit_price_is_used_without_components() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(7_500)).await.unwrap();
    assert_eq!(order.price_minor, 7_500);

    let err = engine.create_order(order_cmd()).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn missing_receiver_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_order(engine::NewOrderCmd::new("alice", "  ", "0111", "Cairo", "Giza").price(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn order_numbers_are_unique() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_order(order_cmd().price(100).order_number("ORD-1-1"))
        .await
        .unwrap();
    let err = engine
        .create_order(order_cmd().price(100).order_number("ORD-1-1"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("ORD-1-1".to_string()));
}

#[tokio::test]
async fn create_with_sender_accrues_once() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;

    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(12_000))
        .await
        .unwrap();
    assert_eq!(order.accrual_status, AccrualStatus::Accrued);

    let c = engine.customer(c.id).await.unwrap();
    assert_eq!(c.balance_minor, 12_000);
    assert_eq!(c.total_orders, 1);
    assert_eq!(c.total_value_minor, 12_000);
    assert_eq!(c.pending_payments_minor, 12_000);
}

#[tokio::test]
async fn create_with_unknown_sender_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_order(order_cmd().sender_customer(Uuid::new_v4()).price(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn cancel_reverses_accrual_and_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(12_000))
        .await
        .unwrap();

    let cancelled = engine
        .update_status(order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(cancelled.accrual_status, AccrualStatus::Reversed);
    let last = cancelled.tracking.last().unwrap();
    assert_eq!(last.status, "cancelled");
    assert_eq!(last.location.as_deref(), Some("System"));
    assert_eq!(last.notes.as_deref(), Some("Status updated"));

    let after_first = engine.customer(c.id).await.unwrap();
    assert_eq!(after_first.balance_minor, 0);
    assert_eq!(after_first.returned_orders, 1);

    engine
        .update_status(order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    engine
        .update_status(order.id, OrderStatus::Returned, None, None)
        .await
        .unwrap();
    let after_repeat = engine.customer(c.id).await.unwrap();
    assert_eq!(after_repeat.balance_minor, 0);
    assert_eq!(after_repeat.returned_orders, 1);
    assert_eq!(after_repeat.total_orders, 1);
}

#[tokio::test]
async fn redelivery_after_return_accrues_again() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(5_000))
        .await
        .unwrap();

    engine
        .update_status(order.id, OrderStatus::Returned, Some("Warehouse"), Some("refused"))
        .await
        .unwrap();
    let delivered = engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    assert_eq!(delivered.accrual_status, AccrualStatus::Accrued);

    // delivering twice does not double count
    engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();

    let c = engine.customer(c.id).await.unwrap();
    assert_eq!(c.balance_minor, 5_000);
    assert_eq!(c.returned_orders, 0);
}

#[tokio::test]
async fn payment_paid_promotes_delivered_order() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(3_000))
        .await
        .unwrap();

    let pending = engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(pending.status, OrderStatus::Pending);

    engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    let paid = engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let c = engine.customer(c.id).await.unwrap();
    assert_eq!(c.pending_payments_minor, 0);
    assert_eq!(c.balance_minor, 3_000);
}

#[tokio::test]
async fn failed_payment_returns_order_once() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(4_000))
        .await
        .unwrap();

    let failed = engine
        .update_payment_status(order.id, PaymentStatus::Failed)
        .await
        .unwrap();
    assert_eq!(failed.status, OrderStatus::Returned);
    assert_eq!(failed.return_reason.as_deref(), Some(engine::PAYMENT_FAILED_REASON));
    assert_eq!(failed.tracking.last().unwrap().status, "returned");

    engine
        .update_payment_status(order.id, PaymentStatus::Failed)
        .await
        .unwrap();
    engine
        .update_status(order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();

    let c = engine.customer(c.id).await.unwrap();
    assert_eq!(c.balance_minor, 0);
    assert_eq!(c.returned_orders, 1);
    assert_eq!(c.pending_payments_minor, 0);
}

#[tokio::test]
async fn assign_busy_driver_fails_without_changes() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let first = engine.create_order(order_cmd().price(100)).await.unwrap();
    let second = engine.create_order(order_cmd().price(100)).await.unwrap();

    engine.assign_driver(first.id, x.id).await.unwrap();
    let err = engine.assign_driver(second.id, x.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    let second = engine.order(second.id).await.unwrap();
    assert_eq!(second.status, OrderStatus::Pending);
    assert_eq!(second.assigned_driver_id, None);
    assert_eq!(second.tracking.len(), 1);
    let x = engine.driver(x.id).await.unwrap();
    assert_eq!(x.availability, DriverAvailability::Busy);
}

#[tokio::test]
async fn reassignment_frees_previous_driver() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let y = driver(&engine, "Yara").await;
    let order = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Assigned);
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );

    let order = engine.assign_driver(order.id, y.id).await.unwrap();
    assert_eq!(order.assigned_driver_id, Some(y.id));
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Available
    );
    assert_eq!(
        engine.driver(y.id).await.unwrap().availability,
        DriverAvailability::Busy
    );
}

#[tokio::test]
async fn create_with_unavailable_driver_creates_nothing() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    engine
        .update_driver_status(x.id, DriverAvailability::Off)
        .await
        .unwrap();

    let err = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    assert!(
        engine
            .list_orders(&OrderListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn delivery_releases_busy_driver() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let order = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();

    engine
        .update_status(order.id, OrderStatus::InTransit, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );

    engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Available
    );
}

#[tokio::test]
async fn finished_order_does_not_free_driver_on_next_job() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let first = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    engine
        .update_status(first.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();

    let second = engine.create_order(order_cmd().price(200)).await.unwrap();
    engine.assign_driver(second.id, x.id).await.unwrap();

    let first = engine
        .update_payment_status(first.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(first.status, OrderStatus::Paid);
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );

    engine
        .update_status(first.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    engine
        .update_status(first.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );

    let third = engine.create_order(order_cmd().price(300)).await.unwrap();
    let err = engine.assign_driver(third.id, x.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn reopened_order_does_not_free_driver_held_elsewhere() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let first = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    engine
        .update_status(first.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    let second = engine.create_order(order_cmd().price(200)).await.unwrap();
    engine.assign_driver(second.id, x.id).await.unwrap();

    engine
        .update_status(first.id, OrderStatus::InTransit, None, None)
        .await
        .unwrap();
    engine
        .update_status(first.id, OrderStatus::Returned, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );

    engine
        .update_status(second.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Available
    );
}

#[tokio::test]
async fn release_skips_driver_taken_off_duty() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let order = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    engine
        .update_driver_status(x.id, DriverAvailability::Off)
        .await
        .unwrap();

    engine
        .update_status(order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Off
    );
}

#[tokio::test]
async fn deleted_driver_does_not_block_status_changes() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let order = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    engine.delete_driver(x.id).await.unwrap();

    let order = engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn price_edit_moves_balance_by_the_difference() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(
            order_cmd()
                .sender_customer(c.id)
                .product_price(10_000)
                .shipping_cost(2_000),
        )
        .await
        .unwrap();

    let order = engine
        .update_order(order.id, UpdateOrderCmd::new().shipping_cost(3_000))
        .await
        .unwrap();
    assert_eq!(order.price_minor, 13_000);
    assert_eq!(order.product_price_minor, 10_000);

    let c_now = engine.customer(c.id).await.unwrap();
    assert_eq!(c_now.balance_minor, 13_000);
    assert_eq!(c_now.total_value_minor, 13_000);
    assert_eq!(c_now.total_orders, 1);

    // a cancelled order is no longer counted in the balance
    engine
        .update_status(order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    engine
        .update_order(order.id, UpdateOrderCmd::new().product_price(20_000))
        .await
        .unwrap();
    let c_now = engine.customer(c.id).await.unwrap();
    assert_eq!(c_now.balance_minor, 0);
    assert_eq!(c_now.total_value_minor, 23_000);
}

#[tokio::test]
async fn explicit_price_cannot_override_components() {
    let (engine, _db) = engine_with_db().await;
    let order = engine
        .create_order(order_cmd().product_price(1_000))
        .await
        .unwrap();
    let err = engine
        .update_order(order.id, UpdateOrderCmd::new().price(5_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn update_with_new_driver_reassigns() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let y = driver(&engine, "Yara").await;
    let order = engine
        .create_order(order_cmd().price(100).driver(x.id))
        .await
        .unwrap();
    engine
        .update_status(order.id, OrderStatus::InTransit, None, None)
        .await
        .unwrap();

    let order = engine
        .update_order(
            order.id,
            UpdateOrderCmd::new().destination("Alexandria").driver(y.id),
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Assigned);
    assert_eq!(order.destination, "Alexandria");
    assert_eq!(order.assigned_driver_id, Some(y.id));
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Available
    );
}

#[tokio::test]
async fn update_unknown_order_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .update_order(Uuid::new_v4(), UpdateOrderCmd::new().destination("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn tracking_update_keeps_status() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(100)).await.unwrap();
    let order = engine
        .add_tracking_update(order.id, "at hub", Some("Nasr City"), None)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.tracking.len(), 2);
    assert_eq!(order.tracking[1].status, "at hub");
    assert_eq!(order.tracking[1].location.as_deref(), Some("Nasr City"));

    let reloaded = engine.order(order.id).await.unwrap();
    let statuses: Vec<_> = reloaded.tracking.iter().map(|t| t.status.as_str()).collect();
    assert_eq!(statuses, ["pending", "at hub"]);
}

#[tokio::test]
async fn refund_above_price_fails() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(12_000)).await.unwrap();

    let err = engine.refund_order(order.id, 15_000, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    assert_eq!(engine.order(order.id).await.unwrap().refunded_minor, 0);

    let order = engine
        .refund_order(order.id, 2_000, Some("broken item"))
        .await
        .unwrap();
    assert_eq!(order.refund_status, RefundStatus::Partial);
    let order = engine.refund_order(order.id, 10_000, None).await.unwrap();
    assert_eq!(order.refund_status, RefundStatus::Full);
    assert!(order.refunded_at.is_some());
}

#[tokio::test]
async fn sender_payout_requires_paid_order() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(1_000)).await.unwrap();

    let err = engine
        .payout_to_sender(order.id, 500, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    let paid = engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.status, OrderStatus::Pending);
    let order = engine.payout_to_sender(order.id, 500, "alice").await.unwrap();
    assert_eq!(order.sender_payout_status, SenderPayoutStatus::Pending);
    let order = engine.payout_to_sender(order.id, 500, "alice").await.unwrap();
    assert_eq!(order.sender_payout_status, SenderPayoutStatus::Paid);
    assert!(order.sender_payout_at.is_some());

    let err = engine
        .payout_to_sender(order.id, 1, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn payment_before_delivery_keeps_status() {
    let (engine, _db) = engine_with_db().await;
    let x = driver(&engine, "Karim").await;
    let order = engine
        .create_order(order_cmd().price(1_000).driver(x.id))
        .await
        .unwrap();
    engine
        .update_status(order.id, OrderStatus::InTransit, None, None)
        .await
        .unwrap();

    let order = engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::InTransit);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(
        engine.driver(x.id).await.unwrap().availability,
        DriverAvailability::Busy
    );
}

#[tokio::test]
async fn sender_payout_debits_customer_balance() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(8_000))
        .await
        .unwrap();
    engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();

    engine
        .payout_to_sender(order.id, 3_000, "bob")
        .await
        .unwrap();

    let c = engine.customer(c.id).await.unwrap();
    assert_eq!(c.balance_minor, 5_000);
    assert_eq!(c.payout_history.len(), 1);
    assert_eq!(c.payout_history[0].order_id, Some(order.id));
    assert_eq!(c.payout_history[0].by, "bob");
}

#[tokio::test]
async fn sender_payout_cannot_exceed_customer_balance() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let order = engine
        .create_order(order_cmd().sender_customer(c.id).price(8_000))
        .await
        .unwrap();
    engine
        .update_payment_status(order.id, PaymentStatus::Paid)
        .await
        .unwrap();
    engine
        .payout_customer(c.id, 6_000, Some("advance"), "bob")
        .await
        .unwrap();

    let err = engine
        .payout_to_sender(order.id, 3_000, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    let order = engine.order(order.id).await.unwrap();
    assert_eq!(order.sender_payout_minor, 0);
    assert_eq!(engine.customer(c.id).await.unwrap().balance_minor, 2_000);
}

#[tokio::test]
async fn settle_return_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(100)).await.unwrap();

    let err = engine.settle_return_to_customer(order.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    engine
        .update_status(order.id, OrderStatus::Returned, None, None)
        .await
        .unwrap();
    let first = engine.settle_return_to_customer(order.id).await.unwrap();
    let second = engine.settle_return_to_customer(order.id).await.unwrap();
    assert!(first.return_settled);
    assert!(second.return_settled);
    assert_eq!(first.version, second.version);
}

#[tokio::test]
async fn strict_policy_rejects_paid_back_to_pending() {
    let (engine, _db) = engine_with_policy(TransitionPolicy::Strict).await;
    let order = engine.create_order(order_cmd().price(100)).await.unwrap();

    let err = engine
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    let unchanged = engine.order(order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Pending);
    assert_eq!(unchanged.tracking.len(), 1);

    for status in [
        OrderStatus::Assigned,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Paid,
    ] {
        engine
            .update_status(order.id, status, None, None)
            .await
            .unwrap();
    }
    let err = engine
        .update_status(order.id, OrderStatus::Pending, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn permissive_policy_accepts_any_transition() {
    let (engine, _db) = engine_with_db().await;
    let order = engine.create_order(order_cmd().price(100)).await.unwrap();
    engine
        .update_status(order.id, OrderStatus::Paid, None, None)
        .await
        .unwrap();
    let order = engine
        .update_status(order.id, OrderStatus::Pending, None, None)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn list_filters_by_status_driver_and_sender() {
    let (engine, _db) = engine_with_db().await;
    let c = customer(&engine, "Omar", "0101").await;
    let x = driver(&engine, "Karim").await;
    let a = engine
        .create_order(order_cmd().price(100).sender_customer(c.id))
        .await
        .unwrap();
    let b = engine
        .create_order(order_cmd().price(200).driver(x.id))
        .await
        .unwrap();

    let all = engine
        .list_orders(&OrderListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let assigned = engine
        .list_orders(&OrderListFilter {
            status: Some(OrderStatus::Assigned),
            ..OrderListFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, b.id);

    let by_driver = engine
        .list_orders(&OrderListFilter {
            driver_id: Some(x.id),
            ..OrderListFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_driver.len(), 1);

    let by_sender = engine
        .list_orders(&OrderListFilter {
            sender_customer_id: Some(c.id),
            ..OrderListFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_sender.len(), 1);
    assert_eq!(by_sender[0].id, a.id);
    assert_eq!(by_sender[0].tracking.len(), 1);
}

#[tokio::test]
async fn list_rejects_inverted_range() {
    let (engine, _db) = engine_with_db().await;
    let now = chrono::Utc::now();
    let err = engine
        .list_orders(&OrderListFilter {
            from: Some(now),
            to: Some(now - chrono::Duration::days(1)),
            ..OrderListFilter::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}
