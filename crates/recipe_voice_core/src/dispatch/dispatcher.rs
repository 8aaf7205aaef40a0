//! Intent dispatcher.
//!
//! # Responsibility
//! - Translate one `Request` into one `Response` or a typed failure.
//! - Issue at most one store query per invocation.
//!
//! # Invariants
//! - `About` and unknown intents never touch the store.
//! - A missing or empty `recipe` slot fails before any query is issued.
//! - A missing recipe is `NotFound`; an empty ingredient search is success.
//! - Failures are logged by code only and always returned to the caller.

use super::intent::{Intent, SLOT_INGREDIENT_ONE, SLOT_INGREDIENT_TWO, SLOT_RECIPE};
use super::message::{Request, Response};
use crate::context::{ContextError, InvocationContext};
use crate::repo::recipe_repo::{RecipeStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const TITLE_INGREDIENTS: &str = "Ingredients";
pub const TITLE_RECIPES: &str = "Recipes";
pub const TITLE_ABOUT: &str = "About";
pub const ABOUT_BODY: &str = "Created by Nic Raboy in Tracy, CA";
pub const TITLE_UNKNOWN: &str = "Unknown Request";
pub const UNKNOWN_BODY: &str = "The intent was unrecognized";

const INGREDIENT_SEPARATOR: &str = ", ";

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Typed dispatch failure handed back to the host.
#[derive(Debug)]
pub enum DispatchError {
    /// A slot the intent requires is absent or empty.
    InvalidInput { slot: &'static str },
    /// Exact lookup matched no document.
    NotFound { recipe: String },
    /// Query failed, was cancelled, or ran past its deadline.
    Store(StoreError),
}

impl DispatchError {
    /// Stable machine-readable code for logs and host error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::Store(StoreError::Context(ContextError::Cancelled)) => "cancelled",
            Self::Store(StoreError::Context(ContextError::DeadlineExceeded)) => {
                "deadline_exceeded"
            }
            Self::Store(_) => "store_error",
        }
    }
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { slot } => {
                write!(f, "required slot `{slot}` is not present in the request")
            }
            Self::NotFound { recipe } => write!(f, "no recipe named `{recipe}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidInput { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Stateless dispatcher over an injected, shared recipe store.
#[derive(Debug, Clone)]
pub struct IntentDispatcher<S: RecipeStore> {
    store: S,
}

impl<S: RecipeStore> IntentDispatcher<S> {
    /// Creates a dispatcher over the held store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Handles one invocation.
    ///
    /// # Errors
    /// - `InvalidInput` when `recipe` is missing for an ingredient lookup.
    /// - `NotFound` when the looked-up recipe does not exist.
    /// - `Store` for query failures, cancellation and deadline expiry.
    pub fn dispatch(&self, ctx: &InvocationContext, request: &Request) -> DispatchResult<Response> {
        let started_at = Instant::now();
        let intent = Intent::from_name(&request.intent_name);

        let result = match intent {
            Intent::GetIngredientsForRecipe => self.ingredients_for_recipe(ctx, request),
            Intent::GetRecipeFromIngredients => self.recipes_from_ingredients(ctx, request),
            Intent::About => Ok(Response::simple(TITLE_ABOUT, ABOUT_BODY)),
            Intent::Unknown => Ok(Response::simple(TITLE_UNKNOWN, UNKNOWN_BODY)),
        };

        match &result {
            Ok(_) => info!(
                "event=dispatch module=dispatch status=ok intent={} duration_ms={}",
                intent.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=dispatch module=dispatch status=error intent={} duration_ms={} error_code={}",
                intent.as_str(),
                started_at.elapsed().as_millis(),
                err.kind()
            ),
        }
        result
    }

    fn ingredients_for_recipe(
        &self,
        ctx: &InvocationContext,
        request: &Request,
    ) -> DispatchResult<Response> {
        let recipe_name = request.slot_or_empty(SLOT_RECIPE);
        if recipe_name.is_empty() {
            return Err(DispatchError::InvalidInput { slot: SLOT_RECIPE });
        }

        let recipe = self
            .store
            .find_recipe_by_name(ctx, recipe_name)?
            .ok_or_else(|| DispatchError::NotFound {
                recipe: recipe_name.to_string(),
            })?;

        Ok(Response::simple(
            TITLE_INGREDIENTS,
            recipe.ingredients.join(INGREDIENT_SEPARATOR),
        ))
    }

    fn recipes_from_ingredients(
        &self,
        ctx: &InvocationContext,
        request: &Request,
    ) -> DispatchResult<Response> {
        let wanted = [
            request.slot_or_empty(SLOT_INGREDIENT_ONE),
            request.slot_or_empty(SLOT_INGREDIENT_TWO),
        ];
        let recipes = self.store.find_recipes_with_ingredients(ctx, &wanted)?;

        // Names are joined without a separator to keep parity with the
        // deployed skill's output.
        let body: String = recipes.iter().map(|recipe| recipe.name.as_str()).collect();
        Ok(Response::simple(TITLE_RECIPES, body))
    }
}
