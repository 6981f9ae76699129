//! Message repository: CRUD over a [`KvStore`](crate::storage::KvStore) keyed by message id.

pub mod clock;
pub mod ids;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use ids::{IdGenerator, UuidV4Generator};
pub use service::{DynMessageStore, MessageService};
