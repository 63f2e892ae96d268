//! Audit log of an order.
//!
//! Entries are only ever appended; `seq` keeps them in insertion order.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackingEntry {
    pub id: Uuid,
    pub order_id: Uuid,
    pub seq: i64,
    pub status: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_tracking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub seq: i64,
    pub status: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TrackingEntry> for ActiveModel {
    fn from(entry: &TrackingEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            order_id: ActiveValue::Set(entry.order_id.to_string()),
            seq: ActiveValue::Set(entry.seq),
            status: ActiveValue::Set(entry.status.clone()),
            location: ActiveValue::Set(entry.location.clone()),
            notes: ActiveValue::Set(entry.notes.clone()),
            timestamp: ActiveValue::Set(entry.timestamp),
        }
    }
}

impl TryFrom<Model> for TrackingEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "tracking entry")?,
            order_id: parse_uuid(&model.order_id, "order")?,
            seq: model.seq,
            status: model.status,
            location: model.location,
            notes: model.notes,
            timestamp: model.timestamp,
        })
    }
}
