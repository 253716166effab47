use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;

use super::{Error, Result, SubscriptionStorage};
use crate::model::{Subscription, ValidSubscription};

/// `SubscriptionStorage` kept in process memory.
/// Behaves like the postgres table: ids start at 1, are never reused and rows come back ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: Mutex<Table>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Subscription>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.table().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means another test thread panicked mid-write; the map itself is intact.
    fn table(&self) -> std::sync::MutexGuard<'_, Table> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SubscriptionStorage for InMemoryStorage {
    async fn create(&self, subscription: &ValidSubscription) -> Result<i64> {
        let mut table = self.table();
        table.last_id += 1;
        let id = table.last_id;
        table
            .rows
            .insert(id, Subscription::from_valid(id, subscription));

        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Subscription> {
        self.table()
            .rows
            .get(&id)
            .cloned()
            .ok_or(Error::SubscriptionNotFound)
    }

    async fn list(&self) -> Result<Vec<Subscription>> {
        let table = self.table();
        if table.rows.is_empty() {
            return Err(Error::NoSubscriptions);
        }

        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, subscription: &ValidSubscription) -> Result<()> {
        let mut table = self.table();
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(Error::SubscriptionNotFound)?;
        *row = Subscription::from_valid(id, subscription);

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.table()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::SubscriptionNotFound)
    }

    async fn total_sum(&self) -> Result<i64> {
        Ok(self
            .table()
            .rows
            .values()
            .map(|row| i64::from(row.price))
            .sum())
    }
}
