use crate::api::MenuType;
use crate::errors::Result;
use crate::validation::RecordId;

pub mod seed;
pub mod sqlite;

/// A menu as stored, served between two minutes of the day (both inclusive)
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub id: RecordId,
    /// Minutes since midnight
    pub start_time: u16,
    /// Minutes since midnight
    pub end_time: u16,
    pub menu_type: MenuType,
    /// Identifiers of the items on the menu. They are not checked against the item collection and
    /// may point to items that do not exist anymore.
    pub menu_items: Vec<String>,
}

/// Fields of a menu about to be inserted
#[derive(Debug, Clone)]
pub struct NewMenu {
    pub start_time: u16,
    pub end_time: u16,
    pub menu_type: MenuType,
    pub menu_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// Fields of a menu item about to be inserted
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// A line of the order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: RecordId,
    pub menu_item_id: RecordId,
    pub quantity: i64,
}

/// Trait hiding the record store
///
/// The mock is enough for unit tests, SQLite backs the real server. Every method is a single
/// independent store access: nothing here groups several of them atomically.
pub trait Database {
    /// Find a menu whose serving window contains the given minute of the day
    ///
    /// Windows are assumed not to overlap, if they do any of the matching menus may be returned.
    fn find_active_menu(&self, minute_key: u16) -> Result<Option<Menu>>;

    /// Number of menus in the store
    fn count_menus(&self) -> Result<usize>;

    fn find_menu_item(&self, id: &RecordId) -> Result<Option<MenuItem>>;

    /// Find the order line for the given menu item, if any
    fn find_order_item(&self, menu_item_id: &RecordId) -> Result<Option<OrderItem>>;

    /// Every order line, in insertion order
    fn find_order_items(&self) -> Result<Vec<OrderItem>>;

    /// Insert a new order line
    fn create_order_item(&mut self, menu_item_id: &RecordId, quantity: i64) -> Result<OrderItem>;

    /// Replace the quantity of the order line for the given menu item
    ///
    /// Return the updated line, or None if there was no line for this menu item
    fn update_order_item(
        &mut self,
        menu_item_id: &RecordId,
        quantity: i64,
    ) -> Result<Option<OrderItem>>;

    /// Delete the order line for the given menu item. Return whether a line was deleted
    fn delete_order_item(&mut self, menu_item_id: &RecordId) -> Result<bool>;

    /// Delete every order line, returning how many were removed
    fn delete_order_items(&mut self) -> Result<usize>;

    fn insert_menu_item(&mut self, item: NewMenuItem) -> Result<MenuItem>;

    fn insert_menu(&mut self, menu: NewMenu) -> Result<Menu>;
}

pub mod mock {

    use super::*;
    use std::cell::Cell;

    /// In-memory store for tests
    ///
    /// Counts every call made through the `Database` trait, which lets tests check that
    /// validation failures never reach the store.
    #[derive(Default)]
    pub struct MockDB {
        pub menus: Vec<Menu>,
        pub menu_items: Vec<MenuItem>,
        pub order_items: Vec<OrderItem>,
        calls: Cell<usize>,
        /// When set, updates pretend the line vanished and return nothing
        pub lose_updates: bool,
    }

    impl MockDB {
        pub fn new() -> MockDB {
            MockDB::default()
        }

        /// Number of store accesses performed so far
        pub fn calls(&self) -> usize {
            self.calls.get()
        }

        fn tick(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl Database for MockDB {
        fn find_active_menu(&self, minute_key: u16) -> Result<Option<Menu>> {
            self.tick();
            Ok(self
                .menus
                .iter()
                .find(|m| m.start_time <= minute_key && minute_key <= m.end_time)
                .cloned())
        }

        fn count_menus(&self) -> Result<usize> {
            self.tick();
            Ok(self.menus.len())
        }

        fn find_menu_item(&self, id: &RecordId) -> Result<Option<MenuItem>> {
            self.tick();
            Ok(self.menu_items.iter().find(|i| &i.id == id).cloned())
        }

        fn find_order_item(&self, menu_item_id: &RecordId) -> Result<Option<OrderItem>> {
            self.tick();
            Ok(self
                .order_items
                .iter()
                .find(|i| &i.menu_item_id == menu_item_id)
                .cloned())
        }

        fn find_order_items(&self) -> Result<Vec<OrderItem>> {
            self.tick();
            Ok(self.order_items.clone())
        }

        fn create_order_item(
            &mut self,
            menu_item_id: &RecordId,
            quantity: i64,
        ) -> Result<OrderItem> {
            self.tick();
            let item = OrderItem {
                id: RecordId::generate(),
                menu_item_id: menu_item_id.clone(),
                quantity,
            };
            self.order_items.push(item.clone());
            Ok(item)
        }

        fn update_order_item(
            &mut self,
            menu_item_id: &RecordId,
            quantity: i64,
        ) -> Result<Option<OrderItem>> {
            self.tick();
            if self.lose_updates {
                return Ok(None);
            }
            Ok(self
                .order_items
                .iter_mut()
                .find(|i| &i.menu_item_id == menu_item_id)
                .map(|i| {
                    i.quantity = quantity;
                    i.clone()
                }))
        }

        fn delete_order_item(&mut self, menu_item_id: &RecordId) -> Result<bool> {
            self.tick();
            match self
                .order_items
                .iter()
                .position(|i| &i.menu_item_id == menu_item_id)
            {
                Some(index) => {
                    self.order_items.remove(index);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn delete_order_items(&mut self) -> Result<usize> {
            self.tick();
            Ok(self.order_items.drain(..).count())
        }

        fn insert_menu_item(&mut self, item: NewMenuItem) -> Result<MenuItem> {
            self.tick();
            let item = MenuItem {
                id: RecordId::generate(),
                name: item.name,
                description: item.description,
                price: item.price,
                image_url: item.image_url,
            };
            self.menu_items.push(item.clone());
            Ok(item)
        }

        fn insert_menu(&mut self, menu: NewMenu) -> Result<Menu> {
            self.tick();
            let menu = Menu {
                id: RecordId::generate(),
                start_time: menu.start_time,
                end_time: menu.end_time,
                menu_type: menu.menu_type,
                menu_items: menu.menu_items,
            };
            self.menus.push(menu.clone());
            Ok(menu)
        }
    }

}
