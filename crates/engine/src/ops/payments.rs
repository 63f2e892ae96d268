use chrono::Utc;
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewPaymentCmd, Payment, PaymentRecordStatus, ResultEngine, payments,
};

use super::{Engine, ensure_positive, normalize_optional_text, with_tx};

impl Engine {
    /// Records a payment for an existing order. The order itself is not
    /// changed.
    pub async fn create_payment(&self, cmd: NewPaymentCmd) -> ResultEngine<Payment> {
        ensure_positive(cmd.amount_minor, "payment amount")?;
        let payment = Payment {
            id: Uuid::new_v4(),
            order_id: cmd.order_id,
            amount_minor: cmd.amount_minor,
            method: cmd.method,
            status: PaymentRecordStatus::Pending,
            transaction_id: normalize_optional_text(cmd.transaction_id.as_deref()),
            created_at: Utc::now(),
        };
        with_tx!(self, |db_tx| {
            self.require_order(&db_tx, cmd.order_id).await?;
            payments::ActiveModel::from(&payment).insert(&db_tx).await?;
            Ok(payment)
        })
    }

    pub async fn update_payment_record_status(
        &self,
        payment_id: Uuid,
        status: PaymentRecordStatus,
        transaction_id: Option<&str>,
    ) -> ResultEngine<Payment> {
        with_tx!(self, |db_tx| {
            let model = payments::Entity::find_by_id(payment_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))?;
            let mut payment = Payment::try_from(model)?;
            payment.status = status;
            if let Some(transaction_id) = normalize_optional_text(transaction_id) {
                payment.transaction_id = Some(transaction_id);
            }
            payments::ActiveModel::from(&payment).update(&db_tx).await?;
            Ok(payment)
        })
    }

    /// List payments, newest first.
    pub async fn payments(&self) -> ResultEngine<Vec<Payment>> {
        with_tx!(self, |db_tx| {
            payments::Entity::find()
                .order_by_desc(payments::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
