use crate::api::MenuType;
use crate::database::{Database, Menu, MenuItem, NewMenu, NewMenuItem, OrderItem};
use crate::errors::{Error, Result};
use crate::validation::{validate_id, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Contains the SQL queries used to interact with the database
pub mod sql_queries {
    pub const CREATE_TABLES: &str = "
        CREATE TABLE IF NOT EXISTS menus (
            id TEXT PRIMARY KEY,
            start_time INTEGER NOT NULL,
            end_time INTEGER NOT NULL,
            menu_type TEXT NOT NULL,
            menu_items TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS menu_items (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            image_url TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS order_items (
            id TEXT PRIMARY KEY,
            menu_item_id TEXT NOT NULL,
            quantity INTEGER NOT NULL
        );";

    pub const SELECT_ACTIVE_MENU: &str = "SELECT id, start_time, end_time, menu_type, menu_items FROM menus WHERE start_time <= ?1 AND end_time >= ?1 LIMIT 1";
    pub const COUNT_MENUS: &str = "SELECT COUNT(*) FROM menus";
    pub const INSERT_MENU: &str = "INSERT INTO menus (id, start_time, end_time, menu_type, menu_items) VALUES (?1, ?2, ?3, ?4, ?5)";

    pub const SELECT_MENU_ITEM: &str =
        "SELECT id, name, description, price, image_url FROM menu_items WHERE id = ?1";
    pub const INSERT_MENU_ITEM: &str = "INSERT INTO menu_items (id, name, description, price, image_url) VALUES (?1, ?2, ?3, ?4, ?5)";

    pub const SELECT_ORDER_ITEM: &str =
        "SELECT id, menu_item_id, quantity FROM order_items WHERE menu_item_id = ?1 LIMIT 1";
    pub const SELECT_ORDER_ITEMS: &str =
        "SELECT id, menu_item_id, quantity FROM order_items ORDER BY rowid";
    pub const INSERT_ORDER_ITEM: &str =
        "INSERT INTO order_items (id, menu_item_id, quantity) VALUES (?1, ?2, ?3)";
    pub const UPDATE_ORDER_ITEM: &str = "UPDATE order_items SET quantity = ?2 WHERE rowid = (SELECT rowid FROM order_items WHERE menu_item_id = ?1 LIMIT 1) RETURNING id, menu_item_id, quantity";
    pub const DELETE_ORDER_ITEM: &str = "DELETE FROM order_items WHERE rowid = (SELECT rowid FROM order_items WHERE menu_item_id = ?1 LIMIT 1)";
    pub const DELETE_ORDER_ITEMS: &str = "DELETE FROM order_items";
}

/// Record store backed by SQLite.
///
/// A connection is cheap to open and is meant to live for a single request.
pub struct SQLiteConnection {
    conn: Connection,
}

impl SQLiteConnection {
    /// Open (and create if needed) the database stored at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // other requests may be writing through their own connection
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(sql_queries::CREATE_TABLES)?;
        Ok(SQLiteConnection { conn })
    }
}

/// Read back an identifier written by this store.
///
/// Failing here means the file was edited by hand, it is reported as a conversion error.
fn stored_id(row: &Row, index: usize) -> rusqlite::Result<RecordId> {
    let raw: String = row.get(index)?;
    validate_id(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

fn menu_from_row(row: &Row) -> rusqlite::Result<(RecordId, u16, u16, String, String)> {
    Ok((
        stored_id(row, 0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn menu_item_from_row(row: &Row) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: stored_id(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        image_url: row.get(4)?,
    })
}

fn order_item_from_row(row: &Row) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        id: stored_id(row, 0)?,
        menu_item_id: stored_id(row, 1)?,
        quantity: row.get(2)?,
    })
}

impl Database for SQLiteConnection {
    fn find_active_menu(&self, minute_key: u16) -> Result<Option<Menu>> {
        let row = self
            .conn
            .prepare_cached(sql_queries::SELECT_ACTIVE_MENU)?
            .query_row(params![minute_key], menu_from_row)
            .optional()?;

        let Some((id, start_time, end_time, menu_type, menu_items)) = row else {
            return Ok(None);
        };
        let menu_type = MenuType::parse(&menu_type)
            .ok_or_else(|| Error::Internal(format!("unknown menu type '{}'", menu_type)))?;

        Ok(Some(Menu {
            id,
            start_time,
            end_time,
            menu_type,
            menu_items: serde_json::from_str(&menu_items)?,
        }))
    }

    fn count_menus(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(sql_queries::COUNT_MENUS, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn find_menu_item(&self, id: &RecordId) -> Result<Option<MenuItem>> {
        self.conn
            .prepare_cached(sql_queries::SELECT_MENU_ITEM)?
            .query_row(params![id.as_str()], menu_item_from_row)
            .optional()
            .map_err(Error::from)
    }

    fn find_order_item(&self, menu_item_id: &RecordId) -> Result<Option<OrderItem>> {
        self.conn
            .prepare_cached(sql_queries::SELECT_ORDER_ITEM)?
            .query_row(params![menu_item_id.as_str()], order_item_from_row)
            .optional()
            .map_err(Error::from)
    }

    fn find_order_items(&self) -> Result<Vec<OrderItem>> {
        self.conn
            .prepare_cached(sql_queries::SELECT_ORDER_ITEMS)?
            .query_map([], order_item_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(Error::from)
    }

    fn create_order_item(&mut self, menu_item_id: &RecordId, quantity: i64) -> Result<OrderItem> {
        let item = OrderItem {
            id: RecordId::generate(),
            menu_item_id: menu_item_id.clone(),
            quantity,
        };
        self.conn.prepare_cached(sql_queries::INSERT_ORDER_ITEM)?.execute(params![
            item.id.as_str(),
            item.menu_item_id.as_str(),
            item.quantity
        ])?;
        Ok(item)
    }

    fn update_order_item(
        &mut self,
        menu_item_id: &RecordId,
        quantity: i64,
    ) -> Result<Option<OrderItem>> {
        self.conn
            .prepare_cached(sql_queries::UPDATE_ORDER_ITEM)?
            .query_row(params![menu_item_id.as_str(), quantity], order_item_from_row)
            .optional()
            .map_err(Error::from)
    }

    fn delete_order_item(&mut self, menu_item_id: &RecordId) -> Result<bool> {
        let deleted = self
            .conn
            .prepare_cached(sql_queries::DELETE_ORDER_ITEM)?
            .execute(params![menu_item_id.as_str()])?;
        Ok(deleted > 0)
    }

    fn delete_order_items(&mut self) -> Result<usize> {
        Ok(self.conn.execute(sql_queries::DELETE_ORDER_ITEMS, [])?)
    }

    fn insert_menu_item(&mut self, item: NewMenuItem) -> Result<MenuItem> {
        let item = MenuItem {
            id: RecordId::generate(),
            name: item.name,
            description: item.description,
            price: item.price,
            image_url: item.image_url,
        };
        self.conn.prepare_cached(sql_queries::INSERT_MENU_ITEM)?.execute(params![
            item.id.as_str(),
            item.name,
            item.description,
            item.price,
            item.image_url
        ])?;
        Ok(item)
    }

    fn insert_menu(&mut self, menu: NewMenu) -> Result<Menu> {
        let menu = Menu {
            id: RecordId::generate(),
            start_time: menu.start_time,
            end_time: menu.end_time,
            menu_type: menu.menu_type,
            menu_items: menu.menu_items,
        };
        self.conn.prepare_cached(sql_queries::INSERT_MENU)?.execute(params![
            menu.id.as_str(),
            menu.start_time,
            menu.end_time,
            menu.menu_type.as_str(),
            serde_json::to_string(&menu.menu_items)?
        ])?;
        Ok(menu)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn burger() -> NewMenuItem {
        NewMenuItem {
            name: "Burger".to_string(),
            description: "Beef and cheddar".to_string(),
            price: 9.5,
            image_url: "burger.png".to_string(),
        }
    }

    #[test]
    fn test_menus() {
        let mut db = SQLiteConnection::open_in_memory().unwrap();
        assert_eq!(db.count_menus().unwrap(), 0);
        assert!(db.find_active_menu(600).unwrap().is_none());

        let burger = db.insert_menu_item(burger()).unwrap();
        let menu = db
            .insert_menu(NewMenu {
                start_time: 660,
                end_time: 899,
                menu_type: MenuType::Lunch,
                menu_items: vec![burger.id.to_string(), "66e0cb8332a8fb1c7597e252".to_string()],
            })
            .unwrap();

        assert_eq!(db.count_menus().unwrap(), 1);
        assert_eq!(db.find_active_menu(660).unwrap(), Some(menu.clone()));
        assert_eq!(db.find_active_menu(899).unwrap(), Some(menu));
        assert!(db.find_active_menu(659).unwrap().is_none());
        assert!(db.find_active_menu(900).unwrap().is_none());

        assert_eq!(db.find_menu_item(&burger.id).unwrap(), Some(burger));
        assert!(db.find_menu_item(&RecordId::generate()).unwrap().is_none());
    }

    #[test]
    fn test_order_items() {
        let mut db = SQLiteConnection::open_in_memory().unwrap();
        let first = RecordId::generate();
        let second = RecordId::generate();

        assert!(db.find_order_item(&first).unwrap().is_none());
        assert!(db.update_order_item(&first, 3).unwrap().is_none());

        let created = db.create_order_item(&first, 2).unwrap();
        db.create_order_item(&second, 0).unwrap();
        assert_eq!(db.find_order_item(&first).unwrap(), Some(created.clone()));

        let updated = db.update_order_item(&first, 7).unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.quantity, 7);
        let big = db.update_order_item(&first, 5_000_000_000).unwrap().unwrap();
        assert_eq!(big.quantity, 5_000_000_000);
        db.update_order_item(&first, 7).unwrap();

        let lines = db.find_order_items().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].menu_item_id, first);
        assert_eq!(lines[1].menu_item_id, second);
        assert_eq!(lines[1].quantity, 0);

        assert!(db.delete_order_item(&first).unwrap());
        assert!(!db.delete_order_item(&first).unwrap());
        assert_eq!(db.delete_order_items().unwrap(), 1);
        assert!(db.find_order_items().unwrap().is_empty());
        assert_eq!(db.delete_order_items().unwrap(), 0);
    }

    #[test]
    fn test_data_survives_reopening() {
        let path = std::env::temp_dir().join(format!("menu-order-{}.db", RecordId::generate()));
        let item = {
            let mut db = SQLiteConnection::open(&path).unwrap();
            let item = db.insert_menu_item(burger()).unwrap();
            db.create_order_item(&item.id, 4).unwrap();
            item
        };

        let db = SQLiteConnection::open(&path).unwrap();
        assert_eq!(db.find_menu_item(&item.id).unwrap(), Some(item.clone()));
        assert_eq!(db.find_order_item(&item.id).unwrap().unwrap().quantity, 4);

        drop(db);
        let _ = std::fs::remove_file(&path);
    }
}
