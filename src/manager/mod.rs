//! Business rules sitting between the web layer and storage.
//!
//! Every operation validates its input before storage is touched, so a request that fails
//! validation never issues a query.

use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    model::{self, Subscription, SubscriptionPayload, ValidSubscription, ValidationError},
    storage::{self, SubscriptionStorage},
};

#[derive(Clone)]
pub struct Manager {
    storage: Arc<dyn SubscriptionStorage>,
}

impl Manager {
    pub fn new(storage: Arc<dyn SubscriptionStorage>) -> Self {
        Self { storage }
    }

    /// Validates the payload and stores it, returning the new id.
    pub async fn create_subscription(&self, payload: SubscriptionPayload) -> Result<i64> {
        let subscription = validate("create_subscription", payload)?;
        let id = self
            .storage
            .create(&subscription)
            .await
            .inspect_err(log_storage("create_subscription", None))?;
        Ok(id)
    }

    pub async fn get_subscription(&self, id: &str) -> Result<Subscription> {
        let id = validate_id("get_subscription", id)?;
        let subscription = self
            .storage
            .get_by_id(id)
            .await
            .inspect_err(log_storage("get_subscription", Some(id)))?;
        Ok(subscription)
    }

    pub async fn get_all_subscriptions(&self) -> Result<Vec<Subscription>> {
        let subscriptions = self
            .storage
            .list()
            .await
            .inspect_err(log_storage("get_all_subscriptions", None))?;
        Ok(subscriptions)
    }

    /// Full replace of the subscription under `id`.
    /// A body carrying an id of its own has to agree with the path.
    pub async fn update_subscription(&self, id: &str, payload: SubscriptionPayload) -> Result<()> {
        let id = validate_id("update_subscription", id)?;
        if payload.id.is_some_and(|body_id| body_id != id) {
            warn!(id, body_id = payload.id, "update_subscription - id mismatch");
            return Err(ValidationError::IdMismatch.into());
        }
        let subscription = validate("update_subscription", payload)?;

        self.storage
            .update(id, &subscription)
            .await
            .inspect_err(log_storage("update_subscription", Some(id)))?;
        Ok(())
    }

    pub async fn delete_subscription(&self, id: &str) -> Result<()> {
        let id = validate_id("delete_subscription", id)?;
        self.storage
            .delete(id)
            .await
            .inspect_err(log_storage("delete_subscription", Some(id)))?;
        Ok(())
    }

    pub async fn get_all_subscriptions_sum(&self) -> Result<i64> {
        let sum = self
            .storage
            .total_sum()
            .await
            .inspect_err(log_storage("get_all_subscriptions_sum", None))?;
        Ok(sum)
    }
}

fn validate_id(operation: &str, id: &str) -> Result<i64> {
    model::parse_id(id).map_err(|er| {
        warn!(operation, id, "{er}");
        er.into()
    })
}

/// Missing rows are an expected outcome, only real failures are logged.
fn log_storage(operation: &str, id: Option<i64>) -> impl Fn(&storage::Error) + '_ {
    move |er| {
        if !er.is_not_found() {
            error!(operation, id, "storage failure: {er}");
        }
    }
}

fn validate(operation: &str, payload: SubscriptionPayload) -> Result<ValidSubscription> {
    ValidSubscription::try_from(payload).map_err(|er| {
        warn!(operation, "{er}");
        er.into()
    })
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] storage::Error),
}

/// The categories callers switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something invalid.
    BadRequest,
    /// The requested subscription does not exist.
    NotFound,
    /// There are no subscriptions at all.
    EmptyCollection,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::BadRequest,
            Error::Storage(storage::Error::SubscriptionNotFound) => ErrorKind::NotFound,
            Error::Storage(storage::Error::NoSubscriptions) => ErrorKind::EmptyCollection,
            Error::Storage(storage::Error::Sqlx(_)) => ErrorKind::Internal,
        }
    }
}
