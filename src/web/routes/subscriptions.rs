use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    model::{Subscription, SubscriptionPayload},
    web::WebResult,
    AppState,
};

pub const STATUS_CREATED: &str = "created";
pub const STATUS_UPDATED: &str = "updated";

/// Body returned by the write endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn new(status: &str) -> Json<Self> {
        Json(Self {
            status: status.to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalSumResponse {
    pub total_sum: i64,
}

#[tracing::instrument(name = "Creating a subscription", skip_all)]
pub async fn create(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> WebResult<(StatusCode, Json<StatusResponse>)> {
    let Json(payload) = payload?;
    let (service_name, user_id) = (payload.service_name.clone(), payload.user_id.clone());

    let id = app_state.manager.create_subscription(payload).await?;
    info!(id, %service_name, %user_id, "Subscription created successfully");

    Ok((StatusCode::CREATED, StatusResponse::new(STATUS_CREATED)))
}

#[tracing::instrument(name = "Fetching a subscription", skip(app_state))]
pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Subscription>> {
    let subscription = app_state.manager.get_subscription(&id).await?;
    info!("Subscription retrieved successfully");

    Ok(Json(subscription))
}

#[tracing::instrument(name = "Listing subscriptions", skip_all)]
pub async fn list(State(app_state): State<AppState>) -> WebResult<Json<Vec<Subscription>>> {
    let subscriptions = app_state.manager.get_all_subscriptions().await?;
    info!(
        count = subscriptions.len(),
        "Subscriptions list retrieved successfully"
    );

    Ok(Json(subscriptions))
}

#[tracing::instrument(name = "Updating a subscription", skip(app_state, payload))]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> WebResult<Json<StatusResponse>> {
    let Json(payload) = payload?;

    app_state.manager.update_subscription(&id, payload).await?;
    info!("Subscription updated successfully");

    Ok(StatusResponse::new(STATUS_UPDATED))
}

#[tracing::instrument(name = "Deleting a subscription", skip(app_state))]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<StatusCode> {
    app_state.manager.delete_subscription(&id).await?;
    info!("Subscription deleted successfully");

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Summing subscription prices", skip_all)]
pub async fn sum(State(app_state): State<AppState>) -> WebResult<Json<TotalSumResponse>> {
    let total_sum = app_state.manager.get_all_subscriptions_sum().await?;
    info!(total_sum, "Total subscription price sum retrieved successfully");

    Ok(Json(TotalSumResponse { total_sum }))
}
