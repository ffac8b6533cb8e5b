//! `SeaORM` Entity for money_amounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "money_amounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(None)")]
    pub amount: Decimal,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(None)")]
    pub base_amount: Decimal,
    pub base_currency: String,
    #[sea_orm(column_type = "Decimal(None)")]
    pub base_exchange_rate: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
