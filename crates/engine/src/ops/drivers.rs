use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Driver, DriverAvailability, NewDriverCmd, OrderStatus, ResultEngine, UpdateDriverCmd, drivers,
    orders,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Registers a driver, available by default.
    pub async fn create_driver(&self, cmd: NewDriverCmd) -> ResultEngine<Driver> {
        let driver = Driver::new(
            normalize_required_text(&cmd.name, "driver name")?,
            normalize_required_text(&cmd.phone, "driver phone")?,
            normalize_optional_text(cmd.vehicle.as_deref()),
            Utc::now(),
        );
        with_tx!(self, |db_tx| {
            drivers::ActiveModel::from(&driver).insert(&db_tx).await?;
            tracing::info!(driver = %driver.id, name = %driver.name, "driver created");
            Ok(driver)
        })
    }

    /// List drivers by name.
    pub async fn drivers(&self) -> ResultEngine<Vec<Driver>> {
        with_tx!(self, |db_tx| {
            drivers::Entity::find()
                .order_by_asc(drivers::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Driver::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn driver(&self, driver_id: Uuid) -> ResultEngine<Driver> {
        with_tx!(self, |db_tx| self.require_driver(&db_tx, driver_id).await)
    }

    pub async fn update_driver(&self, driver_id: Uuid, cmd: UpdateDriverCmd) -> ResultEngine<Driver> {
        with_tx!(self, |db_tx| {
            let mut driver = self.require_driver(&db_tx, driver_id).await?;
            if let Some(name) = cmd.name.as_deref() {
                driver.name = normalize_required_text(name, "driver name")?;
            }
            if let Some(phone) = cmd.phone.as_deref() {
                driver.phone = normalize_required_text(phone, "driver phone")?;
            }
            if let Some(vehicle) = cmd.vehicle.as_deref() {
                driver.vehicle = normalize_optional_text(Some(vehicle));
            }
            self.save_driver(&db_tx, &mut driver).await?;
            Ok(driver)
        })
    }

    /// Deletes a driver. Orders keep the dangling reference.
    pub async fn delete_driver(&self, driver_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_driver(&db_tx, driver_id).await?;
            drivers::Entity::delete_by_id(driver_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(driver = %driver_id, "driver deleted");
            Ok(())
        })
    }

    /// Manual override of a driver availability.
    ///
    /// Nothing is checked against the orders assigned to the driver; a driver
    /// marked available or off while still carrying an order is only logged.
    pub async fn update_driver_status(
        &self,
        driver_id: Uuid,
        availability: DriverAvailability,
    ) -> ResultEngine<Driver> {
        with_tx!(self, |db_tx| {
            let mut driver = self.require_driver(&db_tx, driver_id).await?;
            if availability != DriverAvailability::Busy {
                let active = orders::Entity::find()
                    .filter(orders::Column::AssignedDriverId.eq(driver_id.to_string()))
                    .filter(orders::Column::Status.is_in([
                        OrderStatus::Assigned.as_str(),
                        OrderStatus::InTransit.as_str(),
                    ]))
                    .count(&db_tx)
                    .await?;
                if active > 0 {
                    tracing::warn!(
                        driver = %driver_id,
                        availability = availability.as_str(),
                        active,
                        "driver availability overridden while carrying orders"
                    );
                }
            }
            driver.availability = availability;
            self.save_driver(&db_tx, &mut driver).await?;
            Ok(driver)
        })
    }
}
