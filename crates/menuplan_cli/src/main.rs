//! Command-line lookup of catalog records.
//!
//! Exit codes: `0` record printed as JSON, `1` record not found, `2` any
//! other failure (configuration, database, store).

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use menuplan_core::config::{ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
use menuplan_core::{
    CatalogConfig, ConfigError, Customer, CustomerEmail, LogLevel, LookupService, Menu, Product, Recipe,
    RecipeId, Record, RecordStore, RepoError, SqliteStore,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "menuplan", version, about = "Look up menu catalog records by id")]
struct Cli {
    /// SQLite database file; overrides MENUPLAN_DB_PATH.
    #[arg(long)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error; overrides MENUPLAN_LOG_LEVEL.
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Absolute log directory; overrides MENUPLAN_LOG_DIR.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one record as JSON.
    Find { kind: KindArg, id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Recipe,
    Menu,
    Product,
    Customer,
}

enum Failure {
    NotFound(String),
    Other(String),
}

impl From<RepoError> for Failure {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound(value.to_string()),
            other => Self::Other(other.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli, |key| std::env::var(key).ok()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(Failure::NotFound(message)) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
        Err(Failure::Other(message)) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Result<String, Failure> {
    let config = load_config(&cli, env).map_err(|err| Failure::Other(err.to_string()))?;

    config.init_logging().map_err(Failure::Other)?;
    let conn = config
        .open_database()
        .map_err(|err| Failure::Other(err.to_string()))?;
    let store = SqliteStore::try_new(&conn)?;

    let Command::Find { kind, id } = cli.command;
    info!("event=cli_find module=cli status=start kind={kind:?}");
    match kind {
        KindArg::Recipe => find_json::<Recipe>(&store, &RecipeId::from(id)),
        KindArg::Customer => find_json::<Customer>(&store, &CustomerEmail::new(id)),
        KindArg::Menu => find_numeric::<Menu>(&store, &id),
        KindArg::Product => find_numeric::<Product>(&store, &id),
    }
}

/// Flags shadow their environment key before any value is parsed, so a bad
/// env value never wins over an explicit flag.
fn load_config(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
) -> Result<CatalogConfig, ConfigError> {
    let overrides = [
        (ENV_DB_PATH, cli.db.as_ref().map(|path| path.display().to_string())),
        (ENV_LOG_LEVEL, cli.log_level.map(|level| level.to_string())),
        (ENV_LOG_DIR, cli.log_dir.as_ref().map(|dir| dir.display().to_string())),
    ];
    CatalogConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| value.clone())
            .or_else(|| env(key))
    })
}

fn find_json<'conn, R>(store: &SqliteStore<'conn>, id: &R::Id) -> Result<String, Failure>
where
    R: Record + Serialize,
    SqliteStore<'conn>: RecordStore<R>,
{
    let record = LookupService::<R, _>::new(store).find(id)?;
    serde_json::to_string_pretty(&record).map_err(|err| Failure::Other(err.to_string()))
}

/// Integer-keyed kinds: ids that do not parse cannot resolve to a record.
fn find_numeric<'conn, R>(store: &SqliteStore<'conn>, id: &str) -> Result<String, Failure>
where
    R: Record<Id = i64> + Serialize,
    SqliteStore<'conn>: RecordStore<R>,
{
    match id.trim().parse::<i64>() {
        Ok(id) => find_json::<R>(store, &id),
        Err(_) => Err(RepoError::NotFound(R::KIND).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_config, run, Cli, Failure};
    use clap::Parser;
    use menuplan_core::db::open_db;
    use menuplan_core::{LogLevel, Product, Recipe, RecordStore, SqliteStore, Step};
    use std::collections::HashMap;
    use std::path::Path;

    const KNOWN_RECIPE_ID: &str = "55f13bd332668a28390041a7";

    fn seed(path: &Path) {
        let conn = open_db(path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        store
            .insert(&Product::new(1, "classic-box", "Classic Box"))
            .unwrap();
        let mut recipe = Recipe::with_id(KNOWN_RECIPE_ID, "Chicken Tikka Masala");
        recipe.add_step(Step::new("Marinate the chicken"));
        store.insert(&recipe).unwrap();
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn run_with(args: &[&str], env: &[(&str, &str)]) -> Result<String, Failure> {
        run(Cli::parse_from(args.iter().copied()), env_from(env))
    }

    #[test]
    fn found_recipe_prints_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("menuplan.db");
        seed(&db);
        let db = db.to_str().unwrap();

        let Ok(json) = run_with(&["menuplan", "--db", db, "find", "recipe", KNOWN_RECIPE_ID], &[])
        else {
            panic!("recipe lookup failed");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], KNOWN_RECIPE_ID);
        assert_eq!(value["name"], "Chicken Tikka Masala");
        assert!(json.contains('\n'));
    }

    #[test]
    fn missing_recipe_reports_not_found_message() {
        match run_with(&["menuplan", "find", "recipe", "9999"], &[]) {
            Err(Failure::NotFound(message)) => assert_eq!(message, "Recipe not found"),
            _ => panic!("expected not found"),
        }
    }

    #[test]
    fn non_numeric_id_for_integer_kinds_is_not_found() {
        match run_with(&["menuplan", "find", "menu", "abc"], &[]) {
            Err(Failure::NotFound(message)) => assert_eq!(message, "Menu not found"),
            _ => panic!("expected not found"),
        }
        match run_with(&["menuplan", "find", "product", "classic-box"], &[]) {
            Err(Failure::NotFound(message)) => assert_eq!(message, "Product not found"),
            _ => panic!("expected not found"),
        }
    }

    #[test]
    fn numeric_product_id_resolves_from_env_db_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("menuplan.db");
        seed(&db);

        let Ok(json) = run_with(
            &["menuplan", "find", "product", " 1 "],
            &[("MENUPLAN_DB_PATH", db.to_str().unwrap())],
        ) else {
            panic!("product lookup failed");
        };
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, Product::new(1, "classic-box", "Classic Box"));
    }

    #[test]
    fn invalid_env_value_is_another_failure() {
        match run_with(
            &["menuplan", "find", "recipe", "9999"],
            &[("MENUPLAN_LOG_LEVEL", "bogus")],
        ) {
            Err(Failure::Other(message)) => assert!(message.contains("bogus")),
            _ => panic!("expected configuration failure"),
        }
    }

    #[test]
    fn flags_shadow_env_before_parsing() {
        let cli = Cli::parse_from(["menuplan", "--log-level", "info", "find", "recipe", "9999"]);
        let config = load_config(&cli, env_from(&[("MENUPLAN_LOG_LEVEL", "bogus")])).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);

        match run_with(
            &["menuplan", "--log-level", "info", "find", "recipe", "9999"],
            &[("MENUPLAN_LOG_LEVEL", "bogus")],
        ) {
            Err(Failure::NotFound(message)) => assert_eq!(message, "Recipe not found"),
            _ => panic!("flag did not override env"),
        }
    }

    #[test]
    fn unreadable_db_path_is_another_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("absent").join("menuplan.db");

        match run_with(
            &["menuplan", "--db", missing_parent.to_str().unwrap(), "find", "recipe", "x"],
            &[],
        ) {
            Err(Failure::Other(_)) => {}
            _ => panic!("expected database failure"),
        }
    }
}
