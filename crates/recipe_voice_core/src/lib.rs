//! Core of the recipe voice-command handler.
//! Maps voice intents to recipe lookups against a shared document-store
//! connection and shapes the spoken response.

pub mod config;
pub mod context;
pub mod db;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{ConfigError, HandlerConfig, StoreConfig};
pub use context::{ContextError, InvocationContext};
pub use db::{ConnectionHolder, Database, DbError, DbResult};
pub use dispatch::dispatcher::{DispatchError, DispatchResult, IntentDispatcher};
pub use dispatch::intent::Intent;
pub use dispatch::message::{Request, Response};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::recipe::{Recipe, RecipeId, RecipeValidationError};
pub use repo::recipe_repo::{RecipeStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
