use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ModelError;

/// A stored message.
/// - id: generated server side, never changes
/// - created_at / updated_at: nanoseconds since the Unix epoch
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: Option<u64>,
}

/// Caller-supplied fields for create and update; id and timestamps are assigned by the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, rename = "attachmentURL")]
    pub attachment_url: String,
}

impl MessagePayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>, attachment_url: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into(), attachment_url: attachment_url.into() }
    }

    /// Strip surrounding whitespace from the attachment URL; title and body are kept as written.
    pub fn normalized(mut self) -> Self {
        self.attachment_url = self.attachment_url.trim().to_string();
        self
    }

    /// Every field must be non-blank and the attachment must be an absolute URL.
    pub fn validate(&self) -> Result<(), ModelError> {
        let missing: Vec<&'static str> = [
            ("title", &self.title),
            ("body", &self.body),
            ("attachmentURL", &self.attachment_url),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(ModelError::MissingFields(missing));
        }
        validate_attachment_url(&self.attachment_url)
    }
}

/// Schemes accepted without a host (`data:...`, `mailto:...`).
const OPAQUE_SCHEMES: &[&str] = &["data", "mailto"];

/// Accepts an absolute URL with a non-empty host, or an opaque URL in one of
/// [`OPAQUE_SCHEMES`]. The value is checked as given; surrounding whitespace fails.
pub fn validate_attachment_url(raw: &str) -> Result<(), ModelError> {
    // Url::parse strips surrounding whitespace itself
    if raw.trim() != raw {
        return Err(ModelError::InvalidUrl(format!("{raw:?}: surrounding whitespace")));
    }
    let url = Url::parse(raw).map_err(|e| ModelError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        if OPAQUE_SCHEMES.contains(&url.scheme()) {
            return Ok(());
        }
        return Err(ModelError::InvalidUrl(format!("{raw}: scheme `{}` is not allowed", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ModelError::InvalidUrl(format!("{raw}: missing host")));
    }
    Ok(())
}

impl Message {
    /// Compose a fresh message; `updated_at` starts absent.
    pub fn new(id: String, payload: MessagePayload, created_at: u64) -> Self {
        Self {
            id,
            title: payload.title,
            body: payload.body,
            attachment_url: payload.attachment_url,
            created_at,
            updated_at: None,
        }
    }

    /// Replace the payload fields and stamp the update time, never earlier than `created_at`.
    pub fn apply_update(&mut self, payload: MessagePayload, now: u64) {
        self.title = payload.title;
        self.body = payload.body;
        self.attachment_url = payload.attachment_url;
        self.updated_at = Some(now.max(self.created_at));
    }
}
