//! Couriers and their availability.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{parse_uuid, str_enum},
};

str_enum! {
    /// Whether a driver can take a new order.
    pub enum DriverAvailability ("driver status") {
        Available => "available",
        Busy => "busy",
        Off => "off",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub vehicle: Option<String>,
    pub availability: DriverAvailability,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl Driver {
    pub fn new(name: String, phone: String, vehicle: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            vehicle,
            availability: DriverAvailability::Available,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Fails unless the driver can be assigned to an order right now.
    pub fn ensure_available(&self) -> ResultEngine<()> {
        if self.availability != DriverAvailability::Available {
            return Err(EngineError::InvalidState(format!(
                "driver {} is {}",
                self.name,
                self.availability.as_str()
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub vehicle: Option<String>,
    pub availability: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Driver> for ActiveModel {
    fn from(value: &Driver) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            vehicle: ActiveValue::Set(value.vehicle.clone()),
            availability: ActiveValue::Set(value.availability.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Driver {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "driver")?,
            name: model.name,
            phone: model.phone,
            vehicle: model.vehicle,
            availability: DriverAvailability::try_from(model.availability.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_drivers_can_be_assigned() {
        let mut driver = Driver::new("Karim".to_string(), "0102".to_string(), None, Utc::now());
        assert!(driver.ensure_available().is_ok());

        driver.availability = DriverAvailability::Busy;
        let err = driver.ensure_available().unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        driver.availability = DriverAvailability::Off;
        assert!(driver.ensure_available().is_err());
    }
}
