//! SQLite implementation using rusqlite (synchronous).
//!
//! This implementation is used by the CLI tool.

use crate::repository::*;
use crate::shared::{self, schema, ACTIVE_CREATURE_KEY, CREATURES_KEY, ITEM_SELECT_COLUMNS, SORT_CONFIG_KEY};
use crate::types::*;
use dofus::items::{Item, LotPrices};
use dofus::ledger::{CreatureId, CreatureProgress};
use dofus::sort::SortConfig;
use dofus::tracker::{LedgerSnapshot, LedgerStore, StoreError};
use dofus::xp_table::{XpLevel, XpTable};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/dofus.db";

/// SQLite-backed items database
pub struct SqliteDb {
    conn: Connection,
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        icon_url: row.get(2)?,
        category: row.get(3)?,
        xp_per_unit: row.get(4)?,
        prices: LotPrices {
            one: row.get(5)?,
            ten: row.get(6)?,
            hundred: row.get(7)?,
            thousand: row.get(8)?,
        },
    })
}

/// Build parameter vector from filter for rusqlite queries
fn build_filter_params(filter: &ItemFilter) -> Vec<Box<dyn rusqlite::ToSql>> {
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if let Some(user) = &filter.user_id {
        params.push(Box::new(user.clone()));
    }
    if let Some(category) = &filter.category {
        params.push(Box::new(category.clone()));
    }
    if let Some(name) = &filter.name_contains {
        params.push(Box::new(format!("%{}%", name)));
    }
    params
}

fn sql_id(id: u64) -> RepoResult<i64> {
    i64::try_from(id).map_err(|_| RepoError::Database(format!("Id out of range: {}", id)))
}

fn put_value(conn: &Connection, namespace: &str, key: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO kv (namespace, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(namespace, key) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP",
        params![namespace, key, value],
    )
    .map_err(|e| RepoError::Database(e.to_string()))?;
    Ok(())
}

fn store_error(e: RepoError) -> StoreError {
    StoreError(e.to_string())
}

impl SqliteDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open(path.as_ref())?)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Get a value of a user namespace
    pub fn get_value(&self, namespace: &str, key: &str) -> RepoResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RepoError::Database(e.to_string()))
    }

    /// Set a value of a user namespace
    pub fn set_value(&self, namespace: &str, key: &str, value: &str) -> RepoResult<()> {
        put_value(&self.conn, namespace, key, value)
    }

    /// Get a JSON document of a user namespace
    pub fn get_json<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.get_value(namespace, key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| ParseError::InvalidDocument {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Set a JSON document of a user namespace
    pub fn set_json<T: Serialize>(&self, namespace: &str, key: &str, value: &T) -> RepoResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| ParseError::InvalidDocument {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_value(namespace, key, &raw)
    }

    /// Saved item table sort, unsorted if none was saved
    pub fn sort_config(&self, namespace: &str) -> RepoResult<SortConfig> {
        Ok(self
            .get_json(namespace, SORT_CONFIG_KEY)?
            .unwrap_or_default())
    }

    pub fn set_sort_config(&self, namespace: &str, config: &SortConfig) -> RepoResult<()> {
        self.set_json(namespace, SORT_CONFIG_KEY, config)
    }

    /// Check if a migration has been applied
    fn is_migration_applied(&self, version: &str) -> RepoResult<bool> {
        let result: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(result.is_some())
    }

    /// Mark a migration as applied
    fn mark_migration_applied(&self, version: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                params![version],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    /// Run pending migrations
    fn run_migrations(&self) -> RepoResult<()> {
        // Migration 0001: Base schema (items, user_items, xp_levels, kv)
        if !self.is_migration_applied("0001_base_schema")? {
            for table in [
                schema::ITEMS_TABLE,
                schema::USER_ITEMS_TABLE,
                schema::XP_LEVELS_TABLE,
                schema::KV_TABLE,
            ] {
                self.conn
                    .execute_batch(table)
                    .map_err(|e| RepoError::Database(e.to_string()))?;
            }
            self.mark_migration_applied("0001_base_schema")?;
            tracing::info!("SQLite: Applied migration 0001_base_schema");
        }

        self.conn
            .execute_batch(schema::INDEXES)
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    fn count(&self, sql: &str) -> RepoResult<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

impl ItemsRepository for SqliteDb {
    fn init(&self) -> RepoResult<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version TEXT PRIMARY KEY NOT NULL,
                    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;

        self.run_migrations()
    }

    fn add_item(&self, id: u64) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO items (id, xp) VALUES (?1, 0) ON CONFLICT(id) DO NOTHING",
                params![sql_id(id)?],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    fn upsert_item(&self, item: &Item) -> RepoResult<()> {
        self.conn
            .execute(
                r#"INSERT INTO items (id, name, icon_url, category, xp,
                    price_1, price_10, price_100, price_1000)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    icon_url = excluded.icon_url,
                    category = excluded.category,
                    xp = excluded.xp,
                    price_1 = excluded.price_1,
                    price_10 = excluded.price_10,
                    price_100 = excluded.price_100,
                    price_1000 = excluded.price_1000"#,
                params![
                    sql_id(item.id)?,
                    item.name,
                    item.icon_url,
                    item.category,
                    item.xp_per_unit,
                    item.prices.one,
                    item.prices.ten,
                    item.prices.hundred,
                    item.prices.thousand
                ],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_item(&self, id: u64) -> RepoResult<Option<Item>> {
        let sql = format!("SELECT {} FROM items WHERE items.id = ?1", ITEM_SELECT_COLUMNS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let item = stmt
            .query_row(params![sql_id(id)?], row_to_item)
            .optional()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(item)
    }

    fn update_item(&self, id: u64, update: &ItemUpdate) -> RepoResult<()> {
        let rows = self
            .conn
            .execute(
                r#"UPDATE items SET
                name = COALESCE(?2, name),
                icon_url = COALESCE(?3, icon_url),
                category = COALESCE(?4, category)
            WHERE id = ?1"#,
                params![sql_id(id)?, update.name, update.icon_url, update.category],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        if rows == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn set_field(&self, id: u64, field: ItemField, value: Option<f64>) -> RepoResult<()> {
        let sql = format!("UPDATE items SET {} = ?2 WHERE id = ?1", field.column());
        let rows = match field {
            ItemField::Xp => self.conn.execute(&sql, params![sql_id(id)?, value]),
            ItemField::Price(_) => {
                let price = value.map(|v| v.round() as i64);
                self.conn.execute(&sql, params![sql_id(id)?, price])
            }
        }
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if rows == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn list_items(&self, filter: &ItemFilter) -> RepoResult<Vec<Item>> {
        let (sql, _) = shared::build_list_query(filter);
        let params_vec = build_filter_params(filter);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let items = stmt
            .query_map(params_refs.as_slice(), row_to_item)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(items)
    }

    fn delete_item(&self, id: u64) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![sql_id(id)?])
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    fn stats(&self) -> RepoResult<DbStats> {
        Ok(DbStats {
            item_count: self.count("SELECT COUNT(*) FROM items")?,
            tracked_count: self.count("SELECT COUNT(*) FROM user_items")?,
            user_count: self.count("SELECT COUNT(DISTINCT user_id) FROM user_items")?,
            xp_level_count: self.count("SELECT COUNT(*) FROM xp_levels")?,
        })
    }
}

impl MembershipRepository for SqliteDb {
    fn add_user_item(&self, user_id: &str, item_id: u64) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute(
                "INSERT INTO user_items (user_id, item_id) VALUES (?1, ?2)
                 ON CONFLICT(user_id, item_id) DO NOTHING",
                params![user_id, sql_id(item_id)?],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    fn remove_user_item(&self, user_id: &str, item_id: u64) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM user_items WHERE user_id = ?1 AND item_id = ?2",
                params![user_id, sql_id(item_id)?],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    fn user_item_ids(&self, user_id: &str) -> RepoResult<Vec<u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT item_id FROM user_items WHERE user_id = ?1 ORDER BY rowid")
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get::<_, i64>(0))
            .map_err(|e| RepoError::Database(e.to_string()))?
            .map(|id| id.map(|id| id as u64))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(ids)
    }

    fn clear_user_items(&self, user_id: &str) -> RepoResult<usize> {
        self.conn
            .execute("DELETE FROM user_items WHERE user_id = ?1", params![user_id])
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

impl XpTableRepository for SqliteDb {
    fn xp_table(&self) -> RepoResult<XpTable> {
        let mut stmt = self
            .conn
            .prepare("SELECT level, xp_total FROM xp_levels ORDER BY level")
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let levels = stmt
            .query_map([], |row| {
                Ok(XpLevel {
                    level: row.get(0)?,
                    xp_total: row.get::<_, i64>(1)?.max(0) as u64,
                })
            })
            .map_err(|e| RepoError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(XpTable::new(levels))
    }

    fn set_xp_level(&self, level: XpLevel) -> RepoResult<()> {
        let xp_total = sql_id(level.xp_total)?;
        self.conn
            .execute(
                "INSERT INTO xp_levels (level, xp_total) VALUES (?1, ?2)
                 ON CONFLICT(level) DO UPDATE SET xp_total = excluded.xp_total",
                params![level.level, xp_total],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    fn delete_xp_level(&self, level: u32) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM xp_levels WHERE level = ?1", params![level])
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    fn replace_xp_table(&self, table: &XpTable) -> RepoResult<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        tx.execute("DELETE FROM xp_levels", [])
            .map_err(|e| RepoError::Database(e.to_string()))?;
        for level in table.levels() {
            tx.execute(
                "INSERT INTO xp_levels (level, xp_total) VALUES (?1, ?2)",
                params![level.level, sql_id(level.xp_total)?],
            )
            .map_err(|e| RepoError::Database(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(table.levels().len())
    }
}

impl LedgerStore for SqliteDb {
    fn load_ledger(&self, namespace: &str) -> Result<LedgerSnapshot, StoreError> {
        let creatures: Option<Vec<CreatureProgress>> = self
            .get_json(namespace, CREATURES_KEY)
            .map_err(store_error)?;
        let active: Option<Option<CreatureId>> = self
            .get_json(namespace, ACTIVE_CREATURE_KEY)
            .map_err(store_error)?;

        Ok(LedgerSnapshot {
            creatures: creatures.unwrap_or_default(),
            active: active.flatten(),
        })
    }

    fn save_ledger(&mut self, namespace: &str, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        let creatures =
            serde_json::to_string(&snapshot.creatures).map_err(|e| StoreError(e.to_string()))?;
        let active =
            serde_json::to_string(&snapshot.active).map_err(|e| StoreError(e.to_string()))?;

        let tx = self
            .conn
            .transaction()
            .map_err(|e| StoreError(e.to_string()))?;
        put_value(&tx, namespace, CREATURES_KEY, &creatures).map_err(store_error)?;
        put_value(&tx, namespace, ACTIVE_CREATURE_KEY, &active).map_err(store_error)?;
        tx.commit().map_err(|e| StoreError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dofus::items::{ItemRef, LotSize};
    use dofus::ledger::{CreatureRef, NewCreature};
    use dofus::sort::{SortDirection, SortKey};
    use dofus::tracker::Tracker;
    use dofus::Offer;

    fn setup_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn wheat() -> Item {
        let mut item = Item::new(289);
        item.name = Some("Blé".to_string());
        item.category = Some("resources".to_string());
        item.xp_per_unit = Some(1.5);
        item.prices.set(LotSize::Ten, Some(30));
        item
    }

    #[test]
    fn test_init_creates_tables() {
        let db = setup_db();
        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_init_is_idempotent() {
        let db = setup_db();
        db.init().unwrap();
        let applied: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_add_and_get_item() {
        let db = setup_db();
        db.add_item(289).unwrap();
        db.add_item(289).unwrap();

        let item = db.get_item(289).unwrap().unwrap();
        assert_eq!(item.id, 289);
        assert_eq!(item.xp_per_unit, Some(0.0));
        assert_eq!(item.name, None);
        assert!(db.get_item(1).unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let db = setup_db();
        db.upsert_item(&wheat()).unwrap();
        let mut changed = wheat();
        changed.prices.set(LotSize::Ten, None);
        changed.prices.set(LotSize::One, Some(4));
        db.upsert_item(&changed).unwrap();

        let item = db.get_item(289).unwrap().unwrap();
        assert_eq!(item, changed);
    }

    #[test]
    fn test_update_item_keeps_missing_fields() {
        let db = setup_db();
        db.upsert_item(&wheat()).unwrap();
        let update = ItemUpdate {
            icon_url: Some("https://example.org/289.png".to_string()),
            ..Default::default()
        };
        db.update_item(289, &update).unwrap();

        let item = db.get_item(289).unwrap().unwrap();
        assert_eq!(item.name.as_deref(), Some("Blé"));
        assert_eq!(item.icon_url.as_deref(), Some("https://example.org/289.png"));

        assert!(matches!(
            db.update_item(1, &update),
            Err(RepoError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_field() {
        let db = setup_db();
        db.add_item(289).unwrap();
        db.set_field(289, ItemField::Xp, Some(2.5)).unwrap();
        db.set_field(289, ItemField::Price(LotSize::Hundred), Some(1234.4))
            .unwrap();

        let item = db.get_item(289).unwrap().unwrap();
        assert_eq!(item.xp_per_unit, Some(2.5));
        assert_eq!(item.prices.hundred, Some(1234));

        db.set_field(289, ItemField::Price(LotSize::Hundred), None)
            .unwrap();
        assert_eq!(db.get_item(289).unwrap().unwrap().prices.hundred, None);

        assert!(db.set_field(7, ItemField::Xp, Some(1.0)).is_err());
    }

    #[test]
    fn test_membership_and_listing_order() {
        let db = setup_db();
        for id in [30, 10, 20] {
            db.add_item(id).unwrap();
        }
        assert!(db.add_user_item("alice", 20).unwrap());
        assert!(db.add_user_item("alice", 30).unwrap());
        assert!(!db.add_user_item("alice", 20).unwrap());
        db.add_user_item("bob", 10).unwrap();

        assert_eq!(db.user_item_ids("alice").unwrap(), vec![20, 30]);

        let filter = ItemFilter {
            user_id: Some("alice".to_string()),
            ..Default::default()
        };
        let ids: Vec<u64> = db.list_items(&filter).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![20, 30]);

        assert!(db.remove_user_item("alice", 20).unwrap());
        assert_eq!(db.clear_user_items("alice").unwrap(), 1);
        assert!(db.user_item_ids("alice").unwrap().is_empty());
        assert_eq!(db.user_item_ids("bob").unwrap(), vec![10]);
    }

    #[test]
    fn test_list_items_name_filter() {
        let db = setup_db();
        db.upsert_item(&wheat()).unwrap();
        let mut barley = Item::new(400);
        barley.name = Some("Orge".to_string());
        db.upsert_item(&barley).unwrap();

        let filter = ItemFilter {
            name_contains: Some("rg".to_string()),
            ..Default::default()
        };
        let items = db.list_items(&filter).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 400);
    }

    #[test]
    fn test_delete_cascades_membership() {
        let db = setup_db();
        db.add_item(289).unwrap();
        db.add_user_item("alice", 289).unwrap();

        assert!(db.delete_item(289).unwrap());
        assert!(!db.delete_item(289).unwrap());
        assert!(db.user_item_ids("alice").unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let db = setup_db();
        db.add_item(1).unwrap();
        db.add_item(2).unwrap();
        db.add_user_item("alice", 1).unwrap();
        db.add_user_item("bob", 1).unwrap();
        db.set_xp_level(XpLevel { level: 1, xp_total: 0 }).unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.item_count, 2);
        assert_eq!(stats.tracked_count, 2);
        assert_eq!(stats.user_count, 2);
        assert_eq!(stats.xp_level_count, 1);
    }

    #[test]
    fn test_xp_table() {
        let db = setup_db();
        assert_eq!(db.xp_table().unwrap().ceiling(), None);

        db.set_xp_level(XpLevel { level: 2, xp_total: 100 }).unwrap();
        db.set_xp_level(XpLevel { level: 1, xp_total: 0 }).unwrap();
        db.set_xp_level(XpLevel { level: 2, xp_total: 150 }).unwrap();
        assert_eq!(db.xp_table().unwrap().ceiling(), Some(150));

        let replaced = XpTable::new(vec![
            XpLevel { level: 1, xp_total: 0 },
            XpLevel { level: 100, xp_total: 9000 },
        ]);
        assert_eq!(db.replace_xp_table(&replaced).unwrap(), 2);
        assert_eq!(db.xp_table().unwrap(), replaced);

        assert!(db.delete_xp_level(100).unwrap());
        assert_eq!(db.xp_table().unwrap().ceiling(), Some(0));
    }

    #[test]
    fn test_sort_config_is_per_namespace() {
        let db = setup_db();
        let config = SortConfig {
            key: Some(SortKey::Ratio(LotSize::Ten)),
            direction: SortDirection::Desc,
        };
        db.set_sort_config("alice", &config).unwrap();

        assert_eq!(db.sort_config("alice").unwrap(), config);
        assert_eq!(db.sort_config("bob").unwrap(), SortConfig::default());
    }

    #[test]
    fn test_corrupt_document_is_parse_error() {
        let db = setup_db();
        db.set_value("alice", SORT_CONFIG_KEY, "{not json").unwrap();
        assert!(matches!(
            db.sort_config("alice"),
            Err(RepoError::Parse(ParseError::InvalidDocument { .. }))
        ));
    }

    #[test]
    fn test_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dofus.db");

        let db = SqliteDb::open(&path).unwrap();
        db.init().unwrap();
        let mut tracker = Tracker::open(db, "alice").unwrap();
        let id = tracker
            .add_creature(
                NewCreature {
                    creature: Some(CreatureRef {
                        id: 8155,
                        name: "Chacha".to_string(),
                        image_url: None,
                    }),
                    starting_xp: 0,
                    purchase_price: 100,
                },
                Some(1000),
            )
            .unwrap();
        let wheat = ItemRef {
            id: 289,
            name: "Blé".to_string(),
            icon_url: None,
        };
        tracker
            .apply_offer(wheat, &Offer::one_lot(Some(300.0), Some(150.0), 10))
            .unwrap();
        let saved = tracker.snapshot().clone();
        drop(tracker);

        let db = SqliteDb::open(&path).unwrap();
        db.init().unwrap();
        let reopened = Tracker::open(db, "alice").unwrap();
        assert_eq!(*reopened.snapshot(), saved);
        assert_eq!(reopened.active().map(|c| c.id), Some(id));
        assert_eq!(reopened.get(id).unwrap().total_cost, 310);

        let db = SqliteDb::open(&path).unwrap();
        let other = Tracker::open(db, "bob").unwrap();
        assert!(other.creatures().is_empty());
    }
}
