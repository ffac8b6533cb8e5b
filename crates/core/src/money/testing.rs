//! In-memory money amount store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use fxcommerce_shared::MoneyAmountId;

use super::amount::{MoneyAmount, MoneyAmountRecord};
use super::error::MoneyError;
use super::store::MoneyAmountStore;

#[derive(Debug, Default)]
pub(crate) struct MemoryMoneyStore {
    amounts: Mutex<HashMap<MoneyAmountId, MoneyAmount>>,
}

impl MemoryMoneyStore {
    pub(crate) fn get(&self, id: MoneyAmountId) -> Option<MoneyAmount> {
        self.amounts.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn contains(&self, id: MoneyAmountId) -> bool {
        self.amounts.lock().unwrap().contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.amounts.lock().unwrap().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MoneyAmountStore for MemoryMoneyStore {
    async fn find_by_id(&self, id: MoneyAmountId) -> Result<Option<MoneyAmount>, MoneyError> {
        Ok(self.get(id))
    }

    async fn save(&self, amount: &MoneyAmount) -> Result<MoneyAmount, MoneyError> {
        let id = amount.id().unwrap_or_default();
        let stored = MoneyAmount::from_stored(MoneyAmountRecord {
            id: Some(id),
            ..amount.to_record()
        });
        self.amounts.lock().unwrap().insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: MoneyAmountId) -> Result<bool, MoneyError> {
        Ok(self.amounts.lock().unwrap().remove(&id).is_some())
    }
}
