use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Missing required fields in the payload: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid attachment URL: {0}")]
    InvalidUrl(String),
}
