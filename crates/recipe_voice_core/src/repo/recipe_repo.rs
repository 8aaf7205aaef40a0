//! Recipe collection contract and SQLite implementation.
//!
//! # Responsibility
//! - Exact-match lookup by `name` and containment search over `ingredients`.
//! - Abandon a running statement as soon as the invocation context is done.
//!
//! # Invariants
//! - Read paths reject invalid persisted documents instead of masking them.
//! - Results are returned in insertion order.
//! - Write paths (seeding) call `Recipe::validate()` before SQL mutations.

use crate::context::{ContextError, InvocationContext};
use crate::db::{Database, DbError, RECIPES_COLLECTION};
use crate::model::recipe::{Recipe, RecipeId, RecipeValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use uuid::Uuid;


/// VM instructions between two cancellation checks of a running statement.
const PROGRESS_CHECK_OPS: i32 = 1_000;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by the document store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// The invocation context ended before the query completed.
    Context(ContextError),
    Validation(RecipeValidationError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Context(err) => write!(f, "query abandoned: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted recipe data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ContextError> for StoreError {
    fn from(value: ContextError) -> Self {
        Self::Context(value)
    }
}

impl From<RecipeValidationError> for StoreError {
    fn from(value: RecipeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Read-only query capability the dispatcher depends on.
///
/// Implementations must be safe for concurrent use by in-flight invocations.
pub trait RecipeStore {
    /// Returns the first document whose `name` equals `name` exactly.
    fn find_recipe_by_name(
        &self,
        ctx: &InvocationContext,
        name: &str,
    ) -> StoreResult<Option<Recipe>>;

    /// Returns every document whose ingredients contain all of `ingredients`.
    ///
    /// Order-independent superset match; an empty `ingredients` list matches
    /// nothing.
    fn find_recipes_with_ingredients(
        &self,
        ctx: &InvocationContext,
        ingredients: &[&str],
    ) -> StoreResult<Vec<Recipe>>;
}

impl<S: RecipeStore + ?Sized> RecipeStore for &S {
    fn find_recipe_by_name(
        &self,
        ctx: &InvocationContext,
        name: &str,
    ) -> StoreResult<Option<Recipe>> {
        (**self).find_recipe_by_name(ctx, name)
    }

    fn find_recipes_with_ingredients(
        &self,
        ctx: &InvocationContext,
        ingredients: &[&str],
    ) -> StoreResult<Vec<Recipe>> {
        (**self).find_recipes_with_ingredients(ctx, ingredients)
    }
}

impl<S: RecipeStore + ?Sized> RecipeStore for Arc<S> {
    fn find_recipe_by_name(
        &self,
        ctx: &InvocationContext,
        name: &str,
    ) -> StoreResult<Option<Recipe>> {
        (**self).find_recipe_by_name(ctx, name)
    }

    fn find_recipes_with_ingredients(
        &self,
        ctx: &InvocationContext,
        ingredients: &[&str],
    ) -> StoreResult<Vec<Recipe>> {
        (**self).find_recipes_with_ingredients(ctx, ingredients)
    }
}

impl RecipeStore for Database {
    fn find_recipe_by_name(
        &self,
        ctx: &InvocationContext,
        name: &str,
    ) -> StoreResult<Option<Recipe>> {
        self.run_query(ctx, |conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE name = ?1 ORDER BY rowid ASC LIMIT 1;",
                select_sql()
            ))?;
            let mut rows = stmt.query([name])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_recipe_row(row)?));
            }
            Ok(None)
        })
    }

    fn find_recipes_with_ingredients(
        &self,
        ctx: &InvocationContext,
        ingredients: &[&str],
    ) -> StoreResult<Vec<Recipe>> {
        if ingredients.is_empty() {
            ctx.check()?;
            return Ok(Vec::new());
        }

        let mut sql = format!("{} AS r WHERE 1 = 1", select_sql());
        let mut bind_values: Vec<Value> = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM json_each(r.ingredients) AS item WHERE item.value = ?)",
            );
            bind_values.push(Value::Text((*ingredient).to_string()));
        }
        sql.push_str(" ORDER BY r.rowid ASC;");

        self.run_query(ctx, |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut recipes = Vec::new();
            while let Some(row) = rows.next()? {
                recipes.push(parse_recipe_row(row)?);
            }
            Ok(recipes)
        })
    }
}

impl Database {
    /// Inserts a recipe document and returns its store-assigned id.
    ///
    /// Seeding entry point; the dispatch path never writes.
    pub fn insert_recipe(&self, name: &str, ingredients: &[String]) -> StoreResult<RecipeId> {
        let recipe = Recipe::with_id(Uuid::new_v4(), name, ingredients.to_vec());
        recipe.validate()?;

        let encoded = serde_json::to_string(&recipe.ingredients)
            .map_err(|err| StoreError::InvalidData(format!("cannot encode ingredients: {err}")))?;
        let sql =
            format!("INSERT INTO {RECIPES_COLLECTION} (id, name, ingredients) VALUES (?1, ?2, ?3);");
        self.conn().execute(
            &sql,
            params![recipe.id.to_string(), recipe.name.as_str(), encoded],
        )?;

        Ok(recipe.id)
    }

    /// Runs one read under the driver lock with context-driven interruption.
    ///
    /// Waiting for the lock itself is not bounded by the context; the
    /// deadline is re-checked once the lock is held.
    fn run_query<T>(
        &self,
        ctx: &InvocationContext,
        query: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        ctx.check()?;
        let conn = self.conn();
        // Waiting for the lock may have consumed the deadline.
        ctx.check()?;

        // The handler only reads the token and clock.
        let watched = AssertUnwindSafe(ctx.clone());
        conn.progress_handler(PROGRESS_CHECK_OPS, Some(move || watched.is_done()));
        let result = query(&*conn);
        conn.progress_handler(0, None::<fn() -> bool>);

        match result {
            Err(err) => match ctx.check() {
                Err(reason) => Err(StoreError::Context(reason)),
                Ok(()) => Err(err),
            },
            ok => ok,
        }
    }
}

fn select_sql() -> String {
    format!("SELECT id, name, ingredients FROM {RECIPES_COLLECTION}")
}

fn parse_recipe_row(row: &Row<'_>) -> StoreResult<Recipe> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid id value `{id_text}` in recipes.id"))
    })?;

    let ingredients_text: String = row.get("ingredients")?;
    let ingredients: Vec<String> = serde_json::from_str(&ingredients_text).map_err(|err| {
        StoreError::InvalidData(format!(
            "recipes.ingredients for `{id_text}` is not a string array: {err}"
        ))
    })?;

    let recipe = Recipe {
        id,
        name: row.get("name")?,
        ingredients,
    };
    recipe.validate().map_err(|err| {
        StoreError::InvalidData(format!("recipes document `{id_text}`: {err}"))
    })?;
    Ok(recipe)
}
