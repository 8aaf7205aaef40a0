//! Recipe document model.
//!
//! # Responsibility
//! - Define the canonical recipe document read from the store.
//! - Provide validation used by both the write (seed) and read paths.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `name` is non-empty; it is the exact-match lookup key.
//! - `ingredients` keeps stored order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque store-assigned document identifier.
pub type RecipeId = Uuid;

/// One document of the `recipes` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub name: String,
    /// Ordered ingredient list as stored.
    pub ingredients: Vec<String>,
}

/// Validation errors for recipe documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyName,
}

impl Display for RecipeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "recipe name must not be empty"),
        }
    }
}

impl Error for RecipeValidationError {}

impl Recipe {
    /// Builds a recipe value with a caller-provided id.
    pub fn with_id(id: RecipeId, name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ingredients,
        }
    }

    /// Checks document-level invariants.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        Ok(())
    }
}
