//! Service layer providing the message CRUD operations on top of a key-value store.
//! - Separates business rules (validation, id/timestamp assignment) from storage.
//! - Reuses entity definitions and payload validation from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod storage;
pub mod message;
