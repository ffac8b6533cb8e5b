//! Money amount repository.

use chrono::Utc;
use fxcommerce_core::money::{MoneyAmount, MoneyAmountRecord, MoneyAmountStore, MoneyError};
use fxcommerce_shared::{IsoCode, MoneyAmountId};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DbErr, EntityTrait, Set};

use crate::entities::money_amounts;

/// Money amount repository implementing [`MoneyAmountStore`].
#[derive(Debug, Clone)]
pub struct MoneyAmountRepository {
    db: DatabaseConnection,
}

impl MoneyAmountRepository {
    /// Creates a new money amount repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert(&self, amount: &MoneyAmount) -> Result<money_amounts::Model, DbErr> {
        let now = Utc::now().into();
        money_amounts::ActiveModel {
            id: Set(MoneyAmountId::new().into_inner()),
            amount: Set(amount.amount()),
            currency: Set(amount.currency().to_string()),
            base_amount: Set(amount.base_amount()),
            base_currency: Set(amount.base_currency().to_string()),
            base_exchange_rate: Set(amount.base_exchange_rate()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    async fn update(
        &self,
        id: MoneyAmountId,
        amount: &MoneyAmount,
    ) -> Result<money_amounts::Model, DbErr> {
        money_amounts::ActiveModel {
            id: Set(id.into_inner()),
            amount: Set(amount.amount()),
            currency: Set(amount.currency().to_string()),
            base_amount: Set(amount.base_amount()),
            base_currency: Set(amount.base_currency().to_string()),
            base_exchange_rate: Set(amount.base_exchange_rate()),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await
    }
}

impl MoneyAmountStore for MoneyAmountRepository {
    async fn find_by_id(&self, id: MoneyAmountId) -> Result<Option<MoneyAmount>, MoneyError> {
        money_amounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage)?
            .map(to_money_amount)
            .transpose()
    }

    async fn save(&self, amount: &MoneyAmount) -> Result<MoneyAmount, MoneyError> {
        let model = match amount.id() {
            None => self.insert(amount).await.map_err(storage)?,
            Some(id) => match self.update(id, amount).await {
                Err(DbErr::RecordNotUpdated) => return Err(MoneyError::NotFound(id)),
                result => result.map_err(storage)?,
            },
        };
        to_money_amount(model)
    }

    async fn delete(&self, id: MoneyAmountId) -> Result<bool, MoneyError> {
        let result = money_amounts::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected > 0)
    }
}

fn to_money_amount(model: money_amounts::Model) -> Result<MoneyAmount, MoneyError> {
    Ok(MoneyAmount::from_stored(MoneyAmountRecord {
        id: Some(MoneyAmountId::from_uuid(model.id)),
        amount: model.amount,
        currency: stored_code(&model.currency)?,
        base_amount: model.base_amount,
        base_currency: stored_code(&model.base_currency)?,
        base_exchange_rate: model.base_exchange_rate,
    }))
}

fn stored_code(code: &str) -> Result<IsoCode, MoneyError> {
    IsoCode::new(code).map_err(|e| MoneyError::Storage(format!("stored currency code: {e}")))
}

fn storage(err: DbErr) -> MoneyError {
    tracing::error!(error = %err, "money amount query failed");
    MoneyError::Storage(err.to_string())
}
