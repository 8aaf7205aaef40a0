use recipe_voice_core::{
    ContextError, Database, InvocationContext, RecipeStore, StoreConfig, StoreError,
};
use rusqlite::Connection;
use std::time::{Duration, Instant};

fn ingredients(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn seeded() -> Database {
    let database = Database::in_memory().unwrap();
    database
        .insert_recipe("A", &ingredients(&["egg", "flour", "sugar"]))
        .unwrap();
    database.insert_recipe("B", &ingredients(&["egg"])).unwrap();
    database
        .insert_recipe("C", &ingredients(&["flour", "butter", "egg"]))
        .unwrap();
    database
}

#[test]
fn find_by_name_is_exact_match() {
    let database = seeded();
    let ctx = InvocationContext::background();

    let found = database.find_recipe_by_name(&ctx, "A").unwrap().unwrap();
    assert_eq!(found.ingredients, ingredients(&["egg", "flour", "sugar"]));

    assert!(database.find_recipe_by_name(&ctx, "a").unwrap().is_none());
    assert!(database.find_recipe_by_name(&ctx, "A ").unwrap().is_none());
}

#[test]
fn find_by_name_returns_first_inserted_duplicate() {
    let database = Database::in_memory().unwrap();
    let first = database.insert_recipe("pie", &ingredients(&["apple"])).unwrap();
    database.insert_recipe("pie", &ingredients(&["cherry"])).unwrap();

    let found = database
        .find_recipe_by_name(&InvocationContext::background(), "pie")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first);
}

#[test]
fn containment_search_is_order_independent_superset_match() {
    let database = seeded();
    let hits = database
        .find_recipes_with_ingredients(&InvocationContext::background(), &["flour", "egg"])
        .unwrap();
    let names: Vec<&str> = hits.iter().map(|recipe| recipe.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
}

#[test]
fn repeated_or_empty_values_follow_containment() {
    let database = seeded();
    let ctx = InvocationContext::background();

    let same_twice = database
        .find_recipes_with_ingredients(&ctx, &["egg", "egg"])
        .unwrap();
    assert_eq!(same_twice.len(), 3);

    let with_blank = database
        .find_recipes_with_ingredients(&ctx, &["egg", ""])
        .unwrap();
    assert!(with_blank.is_empty());

    assert!(database
        .find_recipes_with_ingredients(&ctx, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn insert_rejects_blank_name() {
    let database = Database::in_memory().unwrap();
    let err = database.insert_recipe("  ", &ingredients(&["egg"])).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn cancelled_context_abandons_queries() {
    let database = seeded();
    let ctx = InvocationContext::background();
    ctx.cancel();

    let err = database.find_recipe_by_name(&ctx, "A").unwrap_err();
    assert!(matches!(err, StoreError::Context(ContextError::Cancelled)));

    let err = database
        .find_recipes_with_ingredients(&ctx, &["egg", "flour"])
        .unwrap_err();
    assert!(matches!(err, StoreError::Context(ContextError::Cancelled)));
}

#[test]
fn expired_deadline_abandons_queries() {
    let database = seeded();
    let ctx = InvocationContext::with_deadline(Instant::now());

    let err = database.find_recipe_by_name(&ctx, "A").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Context(ContextError::DeadlineExceeded)
    ));
}

#[test]
fn connection_stays_usable_after_an_abandoned_query() {
    let database = seeded();
    let cancelled = InvocationContext::background();
    cancelled.cancel();
    assert!(database.find_recipe_by_name(&cancelled, "A").is_err());

    let live = InvocationContext::with_timeout(Duration::from_secs(5));
    assert!(database.find_recipe_by_name(&live, "A").unwrap().is_some());
}

#[test]
fn malformed_persisted_document_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.db");
    let config = StoreConfig::new(path.to_str().unwrap());
    drop(Database::connect(&config).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO recipes (id, name, ingredients) VALUES ('not-a-uuid', 'broken', '[]');",
        [],
    )
    .unwrap();
    drop(conn);

    let database = Database::connect(&config).unwrap();
    let err = database
        .find_recipe_by_name(&InvocationContext::background(), "broken")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn deadline_interrupts_a_running_search() {
    let database = Database::in_memory().unwrap();
    let pantry: Vec<String> = (0..200).map(|index| format!("item-{index}")).collect();
    for index in 0..4000 {
        database
            .insert_recipe(&format!("recipe-{index}"), &pantry)
            .unwrap();
    }

    let ctx = InvocationContext::with_timeout(Duration::from_millis(2));
    let started_at = Instant::now();
    let err = database
        .find_recipes_with_ingredients(&ctx, &["absent-one", "absent-two"])
        .unwrap_err();
    assert!(
        matches!(err, StoreError::Context(ContextError::DeadlineExceeded)),
        "unexpected error: {err}"
    );
    assert!(started_at.elapsed() < Duration::from_secs(5));

    let full_scan = database
        .find_recipes_with_ingredients(
            &InvocationContext::background(),
            &["item-0", "item-199"],
        )
        .unwrap();
    assert_eq!(full_scan.len(), 4000);
}

#[test]
fn persisted_document_with_blank_name_is_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.db");
    let config = StoreConfig::new(path.to_str().unwrap());
    drop(Database::connect(&config).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO recipes (id, name, ingredients)
         VALUES ('6f1c2a4e-0d5b-4a43-9a55-2b7c1f0e8d11', '', '[\"egg\"]');",
        [],
    )
    .unwrap();
    drop(conn);

    let database = Database::connect(&config).unwrap();
    let err = database
        .find_recipes_with_ingredients(&InvocationContext::background(), &["egg", "egg"])
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)), "unexpected error: {err}");
}
