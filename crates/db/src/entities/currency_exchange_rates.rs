//! `SeaORM` Entity for currency_exchange_rates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "currency_exchange_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub iso_code: String,
    pub name: String,
    pub symbol: String,
    #[sea_orm(column_type = "Decimal(Some((19, 10)))")]
    pub exchange_rate: Decimal,
    pub decimal_mark: String,
    pub thousand_mark: String,
    pub decimal_places: i16,
    pub remove_trailing_zeros: bool,
    pub active: bool,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
