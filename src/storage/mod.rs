//! Persistence of `Subscription` rows.
//!
//! Storage performs no business validation. It accepts only `ValidSubscription`s and reports
//! persistence-level outcomes: a missing row, an empty table, or a driver failure.

mod memory;
mod postgres;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;

use crate::model::{Subscription, ValidSubscription};

#[async_trait]
pub trait SubscriptionStorage: Send + Sync {
    /// Inserts a new row and returns the id assigned to it.
    async fn create(&self, subscription: &ValidSubscription) -> Result<i64>;

    async fn get_by_id(&self, id: i64) -> Result<Subscription>;

    /// All rows ordered by id. An empty table is reported as `Error::NoSubscriptions`.
    async fn list(&self) -> Result<Vec<Subscription>>;

    /// Replaces every field except the id.
    async fn update(&self, id: i64, subscription: &ValidSubscription) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// Sum of all prices, `0` for an empty table.
    async fn total_sum(&self) -> Result<i64>;
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("no subscriptions found")]
    NoSubscriptions,

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl Error {
    /// `true` for the expected "nothing there" outcomes, `false` for real failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SubscriptionNotFound | Error::NoSubscriptions)
    }
}
