//! Read-only domain model for recipe documents.
//!
//! # Responsibility
//! - Define the document shape returned by the recipe collection.
//!
//! # Invariants
//! - Every recipe is identified by a store-assigned, immutable `RecipeId`.
//! - Core never creates or mutates recipes during dispatch.

pub mod recipe;
