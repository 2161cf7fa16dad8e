//! Menu lookups: which menu is served right now, and what a menu item looks like.

use crate::api::{MenuItemView, MenuView};
use crate::database::Database;
use crate::errors::{Error, Result};
use crate::validation::validate_id;
use chrono::{Local, NaiveTime, Timelike};
use tracing::{debug, warn};

/// Minutes elapsed since midnight, the key menus are indexed by
pub fn minute_key(time: NaiveTime) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

/// The menu served at the current local time
pub fn active_menu(db: &dyn Database) -> Result<MenuView> {
    active_menu_at(db, Local::now().time())
}

/// The menu served at the given time of day.
///
/// Items listed on the menu that do not exist anymore, or whose stored id is malformed, are left
/// out of the result.
pub fn active_menu_at(db: &dyn Database, time: NaiveTime) -> Result<MenuView> {
    let key = minute_key(time);
    let menu = db
        .find_active_menu(key)?
        .ok_or_else(|| Error::NotFound("Menu is not available for current time".to_string()))?;

    let mut menu_items = Vec::with_capacity(menu.menu_items.len());
    for id in &menu.menu_items {
        match menu_item(db, id) {
            Ok(item) => menu_items.push(item),
            Err(Error::NotFound(_)) => {
                debug!(menu_item_id = %id, menu_id = %menu.id, "Skipping missing menu item");
            }
            Err(Error::BadRequest(_)) => {
                warn!(menu_item_id = %id, menu_id = %menu.id, "Skipping malformed menu item id");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(MenuView {
        menu_type: menu.menu_type,
        menu_items,
    })
}

/// Look up a single menu item.
///
/// Every price used for an order goes through here.
pub fn menu_item(db: &dyn Database, id: &str) -> Result<MenuItemView> {
    let id = validate_id(id)?;
    let item = db
        .find_menu_item(&id)?
        .ok_or_else(|| Error::NotFound("menu item not found".to_string()))?;

    Ok(MenuItemView {
        menu_item_id: item.id.to_string(),
        name: item.name,
        description: item.description,
        price: item.price,
        image_url: item.image_url,
    })
}
