//! Standalone payment records.
//!
//! Kept separate from `Order::payment_status`: recording a payment here never
//! changes the order.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_uuid, str_enum},
};

str_enum! {
    pub enum PaymentMethod ("payment method") {
        Cash => "cash",
        CreditCard => "credit_card",
    }
}

str_enum! {
    pub enum PaymentRecordStatus ("payment record status") {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount_minor: i64,
    pub method: PaymentMethod,
    pub status: PaymentRecordStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub amount_minor: i64,
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(value: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            order_id: ActiveValue::Set(value.order_id.to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            method: ActiveValue::Set(value.method.as_str().to_string()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            transaction_id: ActiveValue::Set(value.transaction_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "payment")?,
            order_id: parse_uuid(&model.order_id, "order")?,
            amount_minor: model.amount_minor,
            method: PaymentMethod::try_from(model.method.as_str())?,
            status: PaymentRecordStatus::try_from(model.status.as_str())?,
            transaction_id: model.transaction_id,
            created_at: model.created_at,
        })
    }
}
