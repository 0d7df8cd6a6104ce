//! Pure domain logic for the lenslot photography-booking marketplace.
//!
//! This crate has zero internal deps and performs no I/O so it can be used
//! by the API/repository layer and any future worker or CLI tooling. All
//! functions are synchronous and side-effect-free; callers own record
//! retrieval, query-state mutation, and timer scheduling.

pub mod engine;
pub mod error;
pub mod query;
pub mod record;
pub mod session_window;
pub mod status;
pub mod types;

pub use engine::{apply, QueryOutput};
pub use error::CoreError;
pub use query::QueryState;
pub use record::{Record, RecordSchema};
