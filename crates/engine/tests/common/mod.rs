#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{
    Customer, Driver, Engine, NewCustomerCmd, NewDriverCmd, NewOrderCmd, Role, TransitionPolicy,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_policy(TransitionPolicy::Permissive).await
}

pub async fn engine_with_policy(policy: TransitionPolicy) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .transition_policy(policy)
        .build()
        .await
        .unwrap();
    engine
        .create_user("alice", "password", Role::Employee)
        .await
        .unwrap();
    (engine, db)
}

pub async fn customer(engine: &Engine, name: &str, phone: &str) -> Customer {
    engine
        .create_customer(NewCustomerCmd::new(name, phone, "alice"))
        .await
        .unwrap()
}

pub async fn driver(engine: &Engine, name: &str) -> Driver {
    engine
        .create_driver(NewDriverCmd::new(name, "0100000000").vehicle("van"))
        .await
        .unwrap()
}

pub fn order_cmd() -> NewOrderCmd {
    NewOrderCmd::new("alice", "Rana", "0111111111", "Cairo", "Giza")
}
