//! Currency rate repository.
//!
//! Stores one row per currency code. The row flagged active is the one the
//! rate table reads.

use chrono::Utc;
use fxcommerce_core::currency::{CurrencyError, CurrencyRate, RateStore};
use fxcommerce_shared::{CurrencyRateId, IsoCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};

use crate::entities::currency_exchange_rates;

/// Currency rate repository for reading and maintaining rate records.
#[derive(Debug, Clone)]
pub struct CurrencyRateRepository {
    db: DatabaseConnection,
}

impl CurrencyRateRepository {
    /// Creates a new currency rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or updates the record for `rate.iso_code`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` or `InvalidConfiguration` if the record is
    /// unusable, or `Storage` if the write fails.
    pub async fn upsert(&self, rate: &CurrencyRate) -> Result<CurrencyRate, CurrencyError> {
        rate.validate()?;
        let decimal_places = i16::try_from(rate.decimal_places).map_err(|_| {
            CurrencyError::InvalidConfiguration(format!(
                "{} decimal places out of range",
                rate.iso_code
            ))
        })?;

        let existing = currency_exchange_rates::Entity::find()
            .filter(currency_exchange_rates::Column::IsoCode.eq(rate.iso_code.as_str()))
            .order_by_desc(currency_exchange_rates::Column::Active)
            .order_by_desc(currency_exchange_rates::Column::UpdatedAt)
            .one(&self.db)
            .await
            .map_err(storage)?;

        let now = Utc::now().into();

        let model = if let Some(existing) = existing {
            let mut active: currency_exchange_rates::ActiveModel = existing.into();
            active.name = Set(rate.name.clone());
            active.symbol = Set(rate.symbol.clone());
            active.exchange_rate = Set(rate.exchange_rate);
            active.decimal_mark = Set(rate.decimal_mark.clone());
            active.thousand_mark = Set(rate.thousand_mark.clone());
            active.decimal_places = Set(decimal_places);
            active.remove_trailing_zeros = Set(rate.remove_trailing_zeros);
            active.active = Set(rate.active);
            active.updated_at = Set(now);
            active.update(&self.db).await.map_err(storage)?
        } else {
            currency_exchange_rates::ActiveModel {
                id: Set(CurrencyRateId::new().into_inner()),
                iso_code: Set(rate.iso_code.to_string()),
                name: Set(rate.name.clone()),
                symbol: Set(rate.symbol.clone()),
                exchange_rate: Set(rate.exchange_rate),
                decimal_mark: Set(rate.decimal_mark.clone()),
                thousand_mark: Set(rate.thousand_mark.clone()),
                decimal_places: Set(decimal_places),
                remove_trailing_zeros: Set(rate.remove_trailing_zeros),
                active: Set(rate.active),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map_err(storage)?
        };

        tracing::info!(
            currency = %rate.iso_code,
            rate = %rate.exchange_rate,
            active = rate.active,
            "upserted exchange rate"
        );
        CurrencyRate::try_from(model)
    }

    /// Activates or deactivates the record for `code`. Returns false if no
    /// record exists.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the update fails.
    pub async fn set_active(&self, code: &IsoCode, active: bool) -> Result<bool, CurrencyError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = currency_exchange_rates::Entity::update_many()
            .col_expr(currency_exchange_rates::Column::Active, Expr::value(active))
            .col_expr(currency_exchange_rates::Column::UpdatedAt, Expr::value(now))
            .filter(currency_exchange_rates::Column::IsoCode.eq(code.as_str()))
            .exec(&self.db)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected > 0)
    }

    /// Lists every record, active or not, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails, or `InvalidConfiguration` if a
    /// row is malformed.
    pub async fn list(&self) -> Result<Vec<CurrencyRate>, CurrencyError> {
        currency_exchange_rates::Entity::find()
            .order_by_asc(currency_exchange_rates::Column::IsoCode)
            .all(&self.db)
            .await
            .map_err(storage)?
            .into_iter()
            .map(CurrencyRate::try_from)
            .collect()
    }
}

impl RateStore for CurrencyRateRepository {
    async fn find_active_rate(&self, code: &IsoCode) -> Result<Option<CurrencyRate>, CurrencyError> {
        currency_exchange_rates::Entity::find()
            .filter(currency_exchange_rates::Column::IsoCode.eq(code.as_str()))
            .filter(currency_exchange_rates::Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(storage)?
            .map(CurrencyRate::try_from)
            .transpose()
    }

    async fn find_all_active_rates(&self) -> Result<Vec<CurrencyRate>, CurrencyError> {
        currency_exchange_rates::Entity::find()
            .filter(currency_exchange_rates::Column::Active.eq(true))
            .order_by_asc(currency_exchange_rates::Column::IsoCode)
            .all(&self.db)
            .await
            .map_err(storage)?
            .into_iter()
            .map(CurrencyRate::try_from)
            .collect()
    }
}

impl TryFrom<currency_exchange_rates::Model> for CurrencyRate {
    type Error = CurrencyError;

    fn try_from(model: currency_exchange_rates::Model) -> Result<Self, Self::Error> {
        let iso_code = IsoCode::new(&model.iso_code).map_err(|e| {
            CurrencyError::InvalidConfiguration(format!("stored currency code: {e}"))
        })?;
        let decimal_places = u32::try_from(model.decimal_places).map_err(|_| {
            CurrencyError::InvalidConfiguration(format!(
                "{iso_code} has negative decimal places ({})",
                model.decimal_places
            ))
        })?;
        if model.exchange_rate <= rust_decimal::Decimal::ZERO {
            return Err(CurrencyError::InvalidConfiguration(format!(
                "{iso_code} has non-positive exchange rate {}",
                model.exchange_rate
            )));
        }

        Ok(Self {
            iso_code,
            name: model.name,
            symbol: model.symbol,
            exchange_rate: model.exchange_rate,
            decimal_mark: model.decimal_mark,
            thousand_mark: model.thousand_mark,
            decimal_places,
            remove_trailing_zeros: model.remove_trailing_zeros,
            active: model.active,
            updated: model.updated_at.with_timezone(&Utc),
        })
    }
}

fn storage(err: DbErr) -> CurrencyError {
    tracing::error!(error = %err, "currency rate query failed");
    CurrencyError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::prelude::Uuid;

    fn model() -> currency_exchange_rates::Model {
        currency_exchange_rates::Model {
            id: Uuid::nil(),
            iso_code: "USD".to_string(),
            name: "US Dollar".to_string(),
            symbol: "$".to_string(),
            exchange_rate: dec!(8.5),
            decimal_mark: ".".to_string(),
            thousand_mark: ",".to_string(),
            decimal_places: 2,
            remove_trailing_zeros: true,
            active: true,
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_model_maps_to_rate() {
        let rate = CurrencyRate::try_from(model()).unwrap();
        assert_eq!(rate.iso_code.as_str(), "USD");
        assert_eq!(rate.symbol, "$");
        assert_eq!(rate.exchange_rate, dec!(8.5));
        assert_eq!(rate.decimal_places, 2);
    }

    #[test]
    fn test_negative_decimal_places_rejected() {
        let model = currency_exchange_rates::Model {
            decimal_places: -1,
            ..model()
        };
        assert!(matches!(
            CurrencyRate::try_from(model),
            Err(CurrencyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let model = currency_exchange_rates::Model {
            exchange_rate: dec!(0),
            ..model()
        };
        assert!(matches!(
            CurrencyRate::try_from(model),
            Err(CurrencyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_code_rejected() {
        let model = currency_exchange_rates::Model {
            iso_code: "U$D".to_string(),
            ..model()
        };
        assert!(CurrencyRate::try_from(model).is_err());
    }
}
