use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::manager::{self, ErrorKind};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("failed to decode the request body: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("manager error: {0}")]
    Manager(#[from] manager::Error),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::utils::error_chain_fmt(self, f)
    }
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::JsonRejection(rejection) => {
                (StatusCode::BAD_REQUEST, InvalidInput(rejection.body_text()))
            }
            Error::Manager(manager_er) => match manager_er.kind() {
                ErrorKind::BadRequest => {
                    (StatusCode::BAD_REQUEST, InvalidInput(manager_er.to_string()))
                }
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, SubscriptionNotFound),
                ErrorKind::EmptyCollection => (StatusCode::NOT_FOUND, SubscriptionsNotFound),
                ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see, the `Display` output is the `error` field of the response body.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("{_0}")]
    InvalidInput(String),
    #[display("Subscription not found")]
    SubscriptionNotFound,
    #[display("Subscriptions not found")]
    SubscriptionsNotFound,
    #[display("Internal Server Error")]
    ServiceError,
}
