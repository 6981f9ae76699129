//! Entity definitions shared by the service and HTTP layers.

pub mod errors;
pub mod message;

pub use message::{Message, MessagePayload};
