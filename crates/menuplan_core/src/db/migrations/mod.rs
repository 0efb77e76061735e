//! Catalog schema migrations.
//!
//! # Invariants
//! - `version` values are strictly increasing, starting at 1.
//! - All pending migrations of one run commit together or not at all.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const CATALOG_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "catalog",
        sql: include_str!("0001_catalog.sql"),
    },
    Migration {
        version: 2,
        name: "catalog_indexes",
        sql: include_str!("0002_catalog_indexes.sql"),
    },
];

/// Returns the latest catalog schema version known by this binary.
pub fn latest_version() -> u32 {
    target_version(CATALOG_MIGRATIONS)
}

/// Brings the connection up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_migrations(conn, CATALOG_MIGRATIONS)
}

fn target_version(migrations: &[Migration]) -> u32 {
    migrations.last().map_or(0, |migration| migration.version)
}

pub(crate) fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let to_version = target_version(migrations);

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let script = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        if let Err(source) = tx.execute_batch(&script) {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            return Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            });
        }
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{latest_version, run_migrations, Migration, CATALOG_MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    fn user_version(conn: &Connection) -> u32 {
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn catalog_versions_are_strictly_increasing_from_one() {
        let versions: Vec<u32> = CATALOG_MIGRATIONS.iter().map(|m| m.version).collect();
        let expected: Vec<u32> = (1..=latest_version()).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn broken_migration_reports_its_version_and_rolls_back() {
        let migrations = [
            Migration {
                version: 1,
                name: "products",
                sql: "CREATE TABLE products (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                name: "broken_menus",
                sql: "CREATE TABLE menus (id INTEGER PRIMARY KEY,;",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();

        let err = run_migrations(&mut conn, &migrations).unwrap_err();
        assert_eq!(err.failed_migration(), Some(2));
        assert!(matches!(
            &err,
            DbError::Migration {
                name: "broken_menus",
                ..
            }
        ));
        assert!(err.to_string().starts_with("catalog migration 2 (broken_menus) failed"));

        let products: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'products';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(products, 0);
        assert_eq!(user_version(&conn), 0);
    }

    #[test]
    fn only_pending_migrations_run() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE products (id INTEGER PRIMARY KEY); PRAGMA user_version = 1;")
            .unwrap();
        let migrations = [
            Migration {
                version: 1,
                name: "products",
                sql: "CREATE TABLE products (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                name: "product_handles",
                sql: "ALTER TABLE products ADD COLUMN handle TEXT;",
            },
        ];

        run_migrations(&mut conn, &migrations).unwrap();
        assert_eq!(user_version(&conn), 2);
    }
}
