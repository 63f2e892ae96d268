//! The module contains `Customer`, the sender account, and its
//! implementation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, customer_payouts::Payout, util::parse_uuid};

/// A sender.
///
/// `balance_minor` is what the company owes the customer for shipped orders
/// minus what was already paid out. The other counters are a cache of the
/// linked orders, maintained by the ledger in the same transaction as the
/// order changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
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
    pub payout_history: Vec<Payout>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl Customer {
    pub fn new(name: String, phone: String, created_by: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            email: None,
            address: None,
            notes: None,
            balance_minor: 0,
            total_orders: 0,
            total_value_minor: 0,
            pending_payments_minor: 0,
            returned_orders: 0,
            payout_history: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Pays `amount_minor` out of the balance and records it in the history.
    pub(crate) fn record_payout(
        &mut self,
        amount_minor: i64,
        notes: Option<String>,
        by: &str,
        order_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> ResultEngine<Payout> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "payout amount must be > 0".to_string(),
            ));
        }
        if amount_minor > self.balance_minor {
            return Err(EngineError::InvalidArgument(
                "payout exceeds customer balance".to_string(),
            ));
        }

        self.balance_minor -= amount_minor;
        let payout = Payout {
            id: Uuid::new_v4(),
            customer_id: self.id,
            order_id,
            amount_minor,
            notes,
            by: by.to_string(),
            at,
        };
        self.payout_history.push(payout.clone());
        Ok(payout)
    }

    /// Sum of every payout made so far.
    pub fn paid_out_minor(&self) -> i64 {
        self.payout_history.iter().map(|p| p.amount_minor).sum()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
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
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::customer_payouts::Entity")]
    Payouts,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::customer_payouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payouts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(value: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            email: ActiveValue::Set(value.email.clone()),
            address: ActiveValue::Set(value.address.clone()),
            notes: ActiveValue::Set(value.notes.clone()),
            balance_minor: ActiveValue::Set(value.balance_minor),
            total_orders: ActiveValue::Set(value.total_orders),
            total_value_minor: ActiveValue::Set(value.total_value_minor),
            pending_payments_minor: ActiveValue::Set(value.pending_payments_minor),
            returned_orders: ActiveValue::Set(value.returned_orders),
            created_by: ActiveValue::Set(value.created_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Customer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "customer")?,
            name: model.name,
            phone: model.phone,
            email: model.email,
            address: model.address,
            notes: model.notes,
            balance_minor: model.balance_minor,
            total_orders: model.total_orders,
            total_value_minor: model.total_value_minor,
            pending_payments_minor: model.pending_payments_minor,
            returned_orders: model.returned_orders,
            payout_history: Vec::new(),
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn customer(balance_minor: i64) -> Customer {
        let mut c = Customer::new(
            "Omar".to_string(),
            "0101".to_string(),
            "alice".to_string(),
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        c.balance_minor = balance_minor;
        c
    }

    #[test]
    fn payout_reduces_balance_and_appends_history() {
        let mut c = customer(10_000);
        let at = Utc.timestamp_opt(50, 0).unwrap();
        let payout = c
            .record_payout(4_000, Some("cash".to_string()), "bob", None, at)
            .unwrap();
        assert_eq!(c.balance_minor, 6_000);
        assert_eq!(c.payout_history.len(), 1);
        assert_eq!(payout.amount_minor, 4_000);
        assert_eq!(payout.by, "bob");
        assert_eq!(c.paid_out_minor(), 4_000);
    }

    #[test]
    fn payout_above_balance_is_rejected() {
        let mut c = customer(3_000);
        let err = c
            .record_payout(5_000, None, "bob", None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(c.balance_minor, 3_000);
        assert!(c.payout_history.is_empty());
    }

    #[test]
    fn payout_must_be_positive() {
        let mut c = customer(3_000);
        assert!(c.record_payout(0, None, "bob", None, Utc::now()).is_err());
        assert!(c.record_payout(-10, None, "bob", None, Utc::now()).is_err());
    }
}
