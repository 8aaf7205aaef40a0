//! Intent dispatch use-case layer.
//!
//! # Responsibility
//! - Map one voice request to at most one store query and one response.
//! - Keep the host adapter decoupled from storage details.
//!
//! # Invariants
//! - Unrecognized intents always produce the default response.
//! - Store failures propagate; only an empty search result is success.

pub mod dispatcher;
pub mod intent;
pub mod message;
