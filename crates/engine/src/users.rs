//! Users table.
//!
//! The username is the identity recorded in `created_by` and payout `by`
//! fields.

use sea_orm::entity::prelude::*;

use crate::util::str_enum;

str_enum! {
    pub enum Role ("role") {
        Admin => "admin",
        Employee => "employee",
    }
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub role: String,
}

impl Model {
    pub fn role(&self) -> crate::ResultEngine<Role> {
        Role::try_from(self.role.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
