//! SQLite-backed catalog store.
//!
//! # Responsibility
//! - Persist products, recipes, menus and customers in the migrated schema.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Record::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Aggregate inserts (record plus child rows) run in one transaction.
//! - Child collections are read back in `position ASC` order.

use crate::db::migrations::latest_version;
use crate::model::customer::{Customer, CustomerEmail};
use crate::model::menu::{Menu, MenuId};
use crate::model::product::{Product, ProductId};
use crate::model::recipe::{Recipe, RecipeId, Step};
use crate::model::Record;
use crate::repo::record_store::{RecordStore, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("products", &["id", "handle", "name"]),
    ("recipes", &["id", "name", "product_id"]),
    ("recipe_steps", &["recipe_id", "position", "instructions"]),
    ("menus", &["id", "created_at", "week", "product_id"]),
    ("menu_recipes", &["menu_id", "recipe_id", "position"]),
    ("customers", &["email", "name"]),
    ("customer_products", &["customer_email", "product_id", "position"]),
];

/// Catalog store over a borrowed, migrated connection.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for partial schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn write_transaction(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl RecordStore<Product> for SqliteStore<'_> {
    fn find_by_id(&self, id: &ProductId) -> RepoResult<Option<Product>> {
        let product = self
            .conn
            .query_row(
                "SELECT id, handle, name FROM products WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Product {
                        id: row.get("id")?,
                        handle: row.get("handle")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;

        checked(product)
    }

    fn insert(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;

        let tx = self.write_transaction()?;
        ensure_absent(&tx, "SELECT 1 FROM products WHERE id = ?1", product)?;
        tx.execute(
            "INSERT INTO products (id, handle, name) VALUES (?1, ?2, ?3);",
            params![product.id, product.handle.as_str(), product.name.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl RecordStore<Recipe> for SqliteStore<'_> {
    fn find_by_id(&self, id: &RecipeId) -> RepoResult<Option<Recipe>> {
        let header = self
            .conn
            .query_row(
                "SELECT name, product_id FROM recipes WHERE id = ?1;",
                [id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>("name")?,
                        row.get::<_, Option<ProductId>>("product_id")?,
                    ))
                },
            )
            .optional()?;

        let Some((name, product)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT instructions
             FROM recipe_steps
             WHERE recipe_id = ?1
             ORDER BY position ASC;",
        )?;
        let steps = stmt
            .query_map([id.as_str()], |row| Ok(Step::new(row.get::<_, String>(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        checked(Some(Recipe {
            id: id.clone(),
            name,
            product,
            steps,
        }))
    }

    fn insert(&self, recipe: &Recipe) -> RepoResult<()> {
        recipe.validate()?;

        let tx = self.write_transaction()?;
        ensure_absent(&tx, "SELECT 1 FROM recipes WHERE id = ?1", recipe)?;
        tx.execute(
            "INSERT INTO recipes (id, name, product_id) VALUES (?1, ?2, ?3);",
            params![recipe.id.as_str(), recipe.name.as_str(), recipe.product],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO recipe_steps (recipe_id, position, instructions)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, step) in recipe.steps.iter().enumerate() {
                stmt.execute(params![
                    recipe.id.as_str(),
                    position_value(position)?,
                    step.instructions.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl RecordStore<Menu> for SqliteStore<'_> {
    fn find_by_id(&self, id: &MenuId) -> RepoResult<Option<Menu>> {
        let header = self
            .conn
            .query_row(
                "SELECT created_at, week, product_id FROM menus WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, i64>("created_at")?,
                        row.get::<_, String>("week")?,
                        row.get::<_, Option<ProductId>>("product_id")?,
                    ))
                },
            )
            .optional()?;

        let Some((created_at, week, product)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT recipe_id
             FROM menu_recipes
             WHERE menu_id = ?1
             ORDER BY position ASC;",
        )?;
        let recipes = stmt
            .query_map([id], |row| Ok(RecipeId::new(row.get::<_, String>(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        checked(Some(Menu {
            id: *id,
            created_at,
            week,
            product,
            recipes,
        }))
    }

    fn insert(&self, menu: &Menu) -> RepoResult<()> {
        menu.validate()?;

        let tx = self.write_transaction()?;
        ensure_absent(&tx, "SELECT 1 FROM menus WHERE id = ?1", menu)?;
        tx.execute(
            "INSERT INTO menus (id, created_at, week, product_id) VALUES (?1, ?2, ?3, ?4);",
            params![menu.id, menu.created_at, menu.week.as_str(), menu.product],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO menu_recipes (menu_id, recipe_id, position) VALUES (?1, ?2, ?3);",
            )?;
            for (position, recipe_id) in menu.recipes.iter().enumerate() {
                stmt.execute(params![
                    menu.id,
                    recipe_id.as_str(),
                    position_value(position)?
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl RecordStore<Customer> for SqliteStore<'_> {
    fn find_by_id(&self, email: &CustomerEmail) -> RepoResult<Option<Customer>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM customers WHERE email = ?1;",
                [email.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT product_id
             FROM customer_products
             WHERE customer_email = ?1
             ORDER BY position ASC;",
        )?;
        let subscribed_products = stmt
            .query_map([email.as_str()], |row| row.get::<_, ProductId>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        checked(Some(Customer {
            email: email.clone(),
            name,
            subscribed_products,
        }))
    }

    fn insert(&self, customer: &Customer) -> RepoResult<()> {
        customer.validate()?;

        let tx = self.write_transaction()?;
        ensure_absent(&tx, "SELECT 1 FROM customers WHERE email = ?1", customer)?;
        tx.execute(
            "INSERT INTO customers (email, name) VALUES (?1, ?2);",
            params![customer.email.as_str(), customer.name.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO customer_products (customer_email, product_id, position)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, product_id) in customer.subscribed_products.iter().enumerate() {
                stmt.execute(params![
                    customer.email.as_str(),
                    product_id,
                    position_value(position)?
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Binds the record id as the only parameter of `exists_sql`.
trait IdParam {
    fn bind(&self) -> rusqlite::types::Value;
}

impl IdParam for ProductId {
    fn bind(&self) -> rusqlite::types::Value {
        rusqlite::types::Value::Integer(*self)
    }
}

impl IdParam for RecipeId {
    fn bind(&self) -> rusqlite::types::Value {
        rusqlite::types::Value::Text(self.as_str().to_string())
    }
}

impl IdParam for CustomerEmail {
    fn bind(&self) -> rusqlite::types::Value {
        rusqlite::types::Value::Text(self.as_str().to_string())
    }
}

fn ensure_absent<R>(tx: &Transaction<'_>, exists_sql: &str, record: &R) -> RepoResult<()>
where
    R: Record,
    R::Id: IdParam,
{
    let existing = tx
        .query_row(exists_sql, [record.record_id().bind()], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    if existing.is_some() {
        return Err(RepoError::AlreadyExists(R::KIND));
    }
    Ok(())
}

/// Validates a record loaded from storage before handing it out.
fn checked<R: Record>(record: Option<R>) -> RepoResult<Option<R>> {
    if let Some(record) = &record {
        record.validate().map_err(|err| {
            RepoError::InvalidData(format!("{} row failed validation: {err}", R::KIND))
        })?;
    }
    Ok(record)
}

fn position_value(position: usize) -> RepoResult<i64> {
    i64::try_from(position)
        .map_err(|_| RepoError::InvalidData(format!("collection position {position} out of range")))
}

fn ensure_store_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for column in columns.iter().copied() {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::position_value;
    use crate::repo::record_store::RepoError;

    #[test]
    fn position_value_rejects_positions_beyond_i64() {
        assert_eq!(position_value(3).unwrap(), 3);
        if usize::BITS >= i64::BITS {
            let err = position_value(usize::MAX).unwrap_err();
            assert!(matches!(err, RepoError::InvalidData(message) if message.contains("out of range")));
        }
    }
}
