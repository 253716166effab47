//! The `Subscription` record and the types a request body goes through on its way to storage.
//!
//! `SubscriptionPayload` is what gets deserialized from the request body and can contain anything,
//! `ValidSubscription` is what is left once every field has been checked. Storage only ever accepts
//! the latter.

use chrono::NaiveDate;
use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// The only date format accepted on the wire and stored in the database.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

// ###################################
// ->   STRUCTS
// ###################################
/// A stored subscription row, also the shape returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub user_id: String,
    pub service_name: String,
    pub price: i32,
    pub start_date: String,
}

impl Subscription {
    /// Builds the row storage hands back for a `ValidSubscription` stored under `id`.
    pub fn from_valid(id: i64, valid: &ValidSubscription) -> Self {
        Self {
            id,
            user_id: valid.user_id.to_string(),
            service_name: valid.service_name.to_string(),
            price: *valid.price,
            start_date: valid.start_date.to_string(),
        }
    }
}

/// Deserializable Subscription
/// Missing fields fall back to their defaults so that the validation layer, not the JSON decoder,
/// decides which field is wrong.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriptionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    pub service_name: String,
    pub price: i32,
    pub start_date: String,
}

impl SubscriptionPayload {
    pub fn new(
        user_id: impl Into<String>,
        service_name: impl Into<String>,
        price: i32,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            service_name: service_name.into(),
            price,
            start_date: start_date.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Validated Subscription
/// Fields are checked in declaration order and the first failure is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubscription {
    pub user_id: UserId,
    pub service_name: ServiceName,
    pub start_date: StartDate,
    pub price: Price,
}

impl TryFrom<SubscriptionPayload> for ValidSubscription {
    type Error = ValidationError;

    fn try_from(payload: SubscriptionPayload) -> Result<Self, Self::Error> {
        Ok(ValidSubscription {
            user_id: UserId::parse(payload.user_id)?,
            service_name: ServiceName::parse(payload.service_name)?,
            start_date: StartDate::parse(payload.start_date)?,
            price: Price::parse(payload.price)?,
        })
    }
}

/// Identifier of the user owning the subscription, never blank.
#[derive(Debug, Clone, PartialEq, Eq, Deref, derive_more::Display)]
pub struct UserId(String);

impl UserId {
    pub fn parse<S>(value: S) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        if value.trim().is_empty() {
            return Err(ValidationError::UserIdEmpty);
        }

        Ok(UserId(value.to_owned()))
    }
}

/// Free-text service label, never blank.
#[derive(Debug, Clone, PartialEq, Eq, Deref, derive_more::Display)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse<S>(value: S) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        if value.trim().is_empty() {
            return Err(ValidationError::ServiceNameEmpty);
        }

        Ok(ServiceName(value.to_owned()))
    }
}

/// A calendar date that round-trips through `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, derive_more::Display)]
#[display("{}", _0.format(START_DATE_FORMAT))]
pub struct StartDate(NaiveDate);

impl StartDate {
    pub fn parse<S>(value: S) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        let date = NaiveDate::parse_from_str(value, START_DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidStartDate)?;

        // chrono accepts unpadded months and days, the stored text has to stay canonical.
        if date.format(START_DATE_FORMAT).to_string() != value {
            return Err(ValidationError::InvalidStartDate);
        }

        Ok(StartDate(date))
    }
}

/// Whole-currency-unit price, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, derive_more::Display)]
pub struct Price(i32);

impl Price {
    pub fn parse(value: i32) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::PriceNotPositive);
        }

        Ok(Price(value))
    }
}

/// Parses a subscription id taken from the request path.
pub fn parse_id(value: &str) -> Result<i64, ValidationError> {
    let id: i64 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidId)?;
    if id <= 0 {
        return Err(ValidationError::IdNotPositive);
    }

    Ok(id)
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::AsRefStr, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid subscription ID")]
    InvalidId,
    #[error("ID must be greater than 0")]
    IdNotPositive,
    #[error("subscription ID in body does not match the path")]
    IdMismatch,

    #[error("user ID cannot be empty")]
    UserIdEmpty,
    #[error("service name cannot be empty")]
    ServiceNameEmpty,
    #[error("start date must be in format YYYY-MM-DD")]
    InvalidStartDate,
    #[error("price must be greater than 0")]
    PriceNotPositive,
}
