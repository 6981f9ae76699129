use axum::{extract::{Path, State}, Json};
use models::{Message, MessagePayload};

use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::extract::ValidJson;
use crate::startup::AppState;

#[utoipa::path(
    get, path = "/messages", tag = "messages",
    responses(
        (status = 200, description = "All stored messages", body = [crate::openapi::MessageDoc]),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, JsonApiError> {
    Ok(Json(state.messages.list_messages().await?))
}

#[utoipa::path(
    get, path = "/messages/{id}", tag = "messages",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message found", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid Input", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.messages.get_message(&id).await?))
}

#[utoipa::path(
    post, path = "/messages", tag = "messages",
    request_body = crate::openapi::MessagePayloadDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn add_message(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<MessagePayload>,
) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.messages.create_message(payload).await?))
}

#[utoipa::path(
    put, path = "/messages/{id}", tag = "messages",
    params(("id" = String, Path, description = "Message id")),
    request_body = crate::openapi::MessagePayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid Input or Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<MessagePayload>,
) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.messages.update_message(&id, payload).await?))
}

/// Returns the removed message.
#[utoipa::path(
    delete, path = "/messages/{id}", tag = "messages",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid Input", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.messages.delete_message(&id).await?))
}

/// `/messages/` with no id segment: same answer as an empty id.
pub async fn empty_id() -> JsonApiError {
    ServiceError::invalid_id().into()
}
