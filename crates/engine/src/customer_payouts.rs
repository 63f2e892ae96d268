//! Payout history of a customer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_optional_uuid, parse_uuid},
};

/// Money handed to a sender.
///
/// `order_id` is set when the payout settles a specific order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount_minor: i64,
    pub notes: Option<String>,
    pub by: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_payouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub order_id: Option<String>,
    pub amount_minor: i64,
    pub notes: Option<String>,
    pub paid_by: String,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payout> for ActiveModel {
    fn from(value: &Payout) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            customer_id: ActiveValue::Set(value.customer_id.to_string()),
            order_id: ActiveValue::Set(value.order_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(value.amount_minor),
            notes: ActiveValue::Set(value.notes.clone()),
            paid_by: ActiveValue::Set(value.by.clone()),
            paid_at: ActiveValue::Set(value.at),
        }
    }
}

impl TryFrom<Model> for Payout {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "payout")?,
            customer_id: parse_uuid(&model.customer_id, "customer")?,
            order_id: parse_optional_uuid(model.order_id.as_deref(), "order")?,
            amount_minor: model.amount_minor,
            notes: model.notes,
            by: model.paid_by,
            at: model.paid_at,
        })
    }
}
