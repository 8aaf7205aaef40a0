//! Document-store access contracts and the SQLite-backed collection.
//!
//! # Responsibility
//! - Define the two query shapes the dispatcher may issue.
//! - Isolate SQL and document decoding from dispatch logic.
//!
//! # Invariants
//! - Every store call honours the supplied `InvocationContext`.
//! - Absence of a document is `Ok(None)`, never an error, at this layer.

pub mod recipe_repo;
