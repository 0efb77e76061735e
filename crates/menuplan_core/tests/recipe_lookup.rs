use menuplan_core::db::open_db_in_memory;
use menuplan_core::{
    Customer, CustomerEmail, EntityKind, LookupService, MemoryStore, Menu, Product, Recipe,
    RecipeId, RecipesRepository, RecordStore, RepoError, RepoResult, SqliteStore, Step,
};

const KNOWN_RECIPE_ID: &str = "55f13bd332668a28390041a7";

fn seeded_recipe() -> Recipe {
    let mut recipe = Recipe::with_id(KNOWN_RECIPE_ID, "Chicken Tikka Masala");
    recipe.add_step(Step::new("Marinate the chicken"));
    recipe.add_step(Step::new("Simmer the sauce"));
    recipe
}

/// Store whose connection is always gone.
struct UnreachableStore;

impl RecordStore<Recipe> for UnreachableStore {
    fn find_by_id(&self, _id: &RecipeId) -> RepoResult<Option<Recipe>> {
        Err(RepoError::Backend("connection refused".to_string()))
    }

    fn insert(&self, _record: &Recipe) -> RepoResult<()> {
        Err(RepoError::Backend("connection refused".to_string()))
    }
}

#[test]
fn find_in_empty_store_fails_with_recipe_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let repository = RecipesRepository::new(&store);

    let err = repository.find(&RecipeId::from("9999")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityKind::Recipe)));
    assert_eq!(err.to_string(), "Recipe not found");
}

#[test]
fn find_returns_seeded_recipe_with_requested_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    store.insert(&seeded_recipe()).unwrap();

    let repository = RecipesRepository::new(&store);
    let recipe = repository.find(&RecipeId::from(KNOWN_RECIPE_ID)).unwrap();

    assert_eq!(recipe.id.as_str(), KNOWN_RECIPE_ID);
    assert_eq!(recipe, seeded_recipe());
}

#[test]
fn repeated_finds_return_equal_records() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    store.insert(&seeded_recipe()).unwrap();
    let repository = RecipesRepository::new(&store);

    let id = RecipeId::from(KNOWN_RECIPE_ID);
    let first = repository.find(&id).unwrap();
    let second = repository.find(&id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unresolvable_ids_are_not_found() {
    let store = MemoryStore::<Recipe>::new();
    store.insert(&seeded_recipe()).unwrap();
    let repository = RecipesRepository::new(&store);

    for id in ["", "   ", "55F13BD332668A28390041A7", "not an object id"] {
        let err = repository.find(&RecipeId::from(id)).unwrap_err();
        assert_eq!(err.to_string(), "Recipe not found", "id `{id}`");
    }
}

#[test]
fn store_errors_pass_through_unchanged() {
    let repository = RecipesRepository::new(UnreachableStore);

    let err = repository.find(&RecipeId::from(KNOWN_RECIPE_ID)).unwrap_err();
    match err {
        RepoError::Backend(message) => assert_eq!(message, "connection refused"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn other_record_kinds_report_their_own_kind() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let products: LookupService<Product, _> = LookupService::new(&store);
    let menus: LookupService<Menu, _> = LookupService::new(&store);
    let customers: LookupService<Customer, _> = LookupService::new(&store);

    assert_eq!(products.find(&1).unwrap_err().to_string(), "Product not found");
    assert_eq!(menus.find(&1).unwrap_err().to_string(), "Menu not found");
    assert_eq!(
        customers
            .find(&CustomerEmail::from("nobody@example.com"))
            .unwrap_err()
            .to_string(),
        "Customer not found"
    );
}

#[test]
fn sqlite_and_memory_stores_agree() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteStore::try_new(&conn).unwrap();
    let memory = MemoryStore::<Recipe>::new();
    sqlite.insert(&seeded_recipe()).unwrap();
    memory.insert(&seeded_recipe()).unwrap();

    let id = RecipeId::from(KNOWN_RECIPE_ID);
    let from_sqlite = RecipesRepository::new(&sqlite).find(&id).unwrap();
    let from_memory = RecipesRepository::new(&memory).find(&id).unwrap();
    assert_eq!(from_sqlite, from_memory);
}
