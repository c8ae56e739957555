//! SQL constants and query building.

use crate::types::ItemFilter;

/// Column list for item SELECTs; order matches the row mapping in `sqlite`
pub const ITEM_SELECT_COLUMNS: &str =
    "items.id, items.name, items.icon_url, items.category, items.xp,
     items.price_1, items.price_10, items.price_100, items.price_1000";

/// Settings key of the item table sort
pub const SORT_CONFIG_KEY: &str = "items_sort";

/// Settings key of the tracked creature list
pub const CREATURES_KEY: &str = "creatures";

/// Settings key of the selected creature
pub const ACTIVE_CREATURE_KEY: &str = "active_creature";

/// SQLite schema definitions
pub mod schema {
    pub const ITEMS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT,
            icon_url TEXT,
            category TEXT,
            xp REAL,
            price_1 INTEGER,
            price_10 INTEGER,
            price_100 INTEGER,
            price_1000 INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    pub const USER_ITEMS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS user_items (
            user_id TEXT NOT NULL,
            item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            added_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, item_id)
        )
    "#;

    pub const XP_LEVELS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS xp_levels (
            level INTEGER PRIMARY KEY NOT NULL,
            xp_total INTEGER NOT NULL
        )
    "#;

    pub const KV_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS kv (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (namespace, key)
        )
    "#;

    pub const INDEXES: &str = r#"
        CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);
        CREATE INDEX IF NOT EXISTS idx_user_items_item ON user_items(item_id);
    "#;
}

/// Build the item listing query for `filter`.
///
/// Returns the SQL and its number of `?` parameters, bound in the order
/// user, category, name.
pub fn build_list_query(filter: &ItemFilter) -> (String, usize) {
    let mut sql = format!("SELECT {} FROM items", ITEM_SELECT_COLUMNS);
    let mut param_count = 0;

    if filter.user_id.is_some() {
        sql.push_str(" JOIN user_items ON user_items.item_id = items.id");
    }
    sql.push_str(" WHERE 1=1");

    if filter.user_id.is_some() {
        sql.push_str(" AND user_items.user_id = ?");
        param_count += 1;
    }
    if filter.category.is_some() {
        sql.push_str(" AND items.category = ?");
        param_count += 1;
    }
    if filter.name_contains.is_some() {
        sql.push_str(" AND items.name LIKE ?");
        param_count += 1;
    }

    if filter.user_id.is_some() {
        sql.push_str(" ORDER BY user_items.rowid");
    } else {
        sql.push_str(" ORDER BY items.created_at, items.id");
    }

    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = filter.offset {
        if filter.limit.is_none() {
            sql.push_str(" LIMIT -1");
        }
        sql.push_str(&format!(" OFFSET {}", offset));
    }

    (sql, param_count)
}
