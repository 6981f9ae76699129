use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc { pub error: String, pub message: Option<String> }

#[derive(Serialize, ToSchema)]
pub struct MessagePayloadDoc {
    pub title: String,
    pub body: String,
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDoc {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
    /// Nanoseconds since the Unix epoch.
    pub created_at: u64,
    pub updated_at: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::messages::list_messages,
        crate::routes::messages::get_message,
        crate::routes::messages::add_message,
        crate::routes::messages::update_message,
        crate::routes::messages::delete_message,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            MessagePayloadDoc,
            MessageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "messages")
    )
)]
pub struct ApiDoc;
