use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::web::{log, ClientError, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into the JSON error body
/// `{"error": <message>}` with the matching status code, and logs the request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let request_id = resp.headers().get(REQUEST_ID_HEADER).cloned();

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(web_error), Some((_, ClientError::ServiceError))) =
        (web_error, &client_status_and_error)
    {
        tracing::error!("SERVER ERROR: {web_error:?}");
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({ "error": cl_err.to_string() });
        let mut err_resp = (*status, Json(client_error_body)).into_response();
        // The error response replaces the original, keep the request id on it.
        if let Some(request_id) = &request_id {
            err_resp
                .headers_mut()
                .insert(REQUEST_ID_HEADER, request_id.clone());
        }
        err_resp
    });

    log::log_request(
        request_id.as_ref().and_then(|id| id.to_str().ok()),
        &req_method,
        &uri,
        client_status_and_error
            .as_ref()
            .map(|(status, _)| *status)
            .unwrap_or(resp.status()),
        web_error,
        client_status_and_error.as_ref().map(|(_, ce)| ce),
    );

    err_resp.unwrap_or(resp)
}
