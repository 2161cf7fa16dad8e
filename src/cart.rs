//! The order shared by every client: one line per menu item, priced from the menu.
//!
//! Writes are a chain of independent store calls. Two requests touching the same menu item at the
//! same time may interleave, and the last write wins.

use crate::api::{OrderItemView, OrderView};
use crate::database::Database;
use crate::errors::{Error, Result};
use crate::menu::menu_item;
use crate::validation::{validate_id, validate_quantity};
use tracing::{debug, info};

/// Put a menu item in the order with the given quantity.
///
/// Creates the line if the item isn't ordered yet, otherwise replaces its quantity.
pub fn add_to_order(db: &mut dyn Database, menu_item_id: &str, quantity: i64) -> Result<OrderItemView> {
    let id = validate_id(menu_item_id)?;
    let quantity = validate_quantity(quantity)?;

    let item = menu_item(&*db, id.as_str())?;

    let line = match db.find_order_item(&id)? {
        Some(_) => db.update_order_item(&id, quantity)?,
        None => Some(db.create_order_item(&id, quantity)?),
    };
    let line =
        line.ok_or_else(|| Error::Internal("something is wrong when add order to db".to_string()))?;

    debug!(menu_item_id = %id, quantity = line.quantity, "Order line saved");
    Ok(OrderItemView::new(item, line.quantity))
}

/// Change the quantity of an existing order line, then return the whole order.
///
/// A menu item that isn't in the order is left out of it.
pub fn update_order(db: &mut dyn Database, menu_item_id: &str, quantity: i64) -> Result<OrderView> {
    let id = validate_id(menu_item_id)?;
    let quantity = validate_quantity(quantity)?;

    if db.update_order_item(&id, quantity)?.is_none() {
        debug!(menu_item_id = %id, "No order line to update");
    }

    order(&*db)
}

/// Remove a menu item from the order, then return the whole order.
///
/// Removing an item that isn't ordered is not an error.
pub fn remove_order_item(db: &mut dyn Database, menu_item_id: &str) -> Result<OrderView> {
    let id = validate_id(menu_item_id)?;

    if !db.delete_order_item(&id)? {
        debug!(menu_item_id = %id, "No order line to remove");
    }

    order(&*db)
}

/// The current order, every line joined with its menu item.
///
/// Unlike menus, an order line whose menu item can't be found fails the whole request.
pub fn order(db: &dyn Database) -> Result<OrderView> {
    let lines = db
        .find_order_items()?
        .into_iter()
        .map(|line| {
            let item = menu_item(db, line.menu_item_id.as_str())?;
            Ok(OrderItemView::new(item, line.quantity))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OrderView::new(lines))
}

/// Check out: empty the order
pub fn confirm_order(db: &mut dyn Database) -> Result<()> {
    let removed = db.delete_order_items()?;
    info!(lines = removed, "Order confirmed");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::mock::MockDB;
    use crate::database::{MenuItem, NewMenuItem};

    fn insert(db: &mut MockDB, name: &str, price: f64) -> MenuItem {
        db.insert_menu_item(NewMenuItem {
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            image_url: format!("{}.png", name),
        })
        .unwrap()
    }

    #[test]
    fn test_add_creates_a_priced_line() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);

        let line = add_to_order(&mut db, burger.id.as_str(), 2).unwrap();
        assert_eq!(line.menu_item_id, burger.id.to_string());
        assert_eq!(line.menu_item_name, "burger");
        assert_eq!(line.menu_item_description, "burger description");
        assert_eq!(line.menu_item_price, 5.5);
        assert_eq!(line.menu_item_image_url, "burger.png");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.item_total, 11.0);
        assert_eq!(db.order_items.len(), 1);
    }

    #[test]
    fn test_add_twice_replaces_quantity() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);

        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();
        let line = add_to_order(&mut db, burger.id.as_str(), 5).unwrap();

        assert_eq!(line.quantity, 5);
        assert_eq!(db.order_items.len(), 1);
        assert_eq!(db.order_items[0].quantity, 5);
    }

    #[test]
    fn test_large_quantities_are_accepted() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 2.0);

        let line = add_to_order(&mut db, burger.id.as_str(), 5_000_000_000).unwrap();
        assert_eq!(line.quantity, 5_000_000_000);
        assert_eq!(line.item_total, 10_000_000_000.0);
        assert_eq!(db.order_items[0].quantity, 5_000_000_000);
    }

    #[test]
    fn test_zero_quantity_lines_are_kept() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);

        let line = add_to_order(&mut db, burger.id.as_str(), 0).unwrap();
        assert_eq!(line.item_total, 0.0);

        let order = order(&db).unwrap();
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.total_order_price, 0.0);
    }

    #[test]
    fn test_add_validates_before_any_store_call() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        let calls = db.calls();

        for (id, quantity, expected) in [
            ("not-an-id", 2, "id is invalid"),
            (burger.id.as_str(), -1, "quantity is invalid"),
            ("not-an-id", -1, "id is invalid"),
        ] {
            match add_to_order(&mut db, id, quantity) {
                Err(Error::BadRequest(msg)) => assert_eq!(msg, expected),
                other => panic!("expected bad request, got {:?}", other),
            }
        }
        assert_eq!(db.calls(), calls);
        assert!(db.order_items.is_empty());
    }

    #[test]
    fn test_add_unknown_menu_item() {
        let mut db = MockDB::new();
        match add_to_order(&mut db, "66e0cb8332a8fb1c7597e252", 1) {
            Err(Error::NotFound(msg)) => assert_eq!(msg, "menu item not found"),
            other => panic!("expected not found, got {:?}", other),
        }
        assert!(db.order_items.is_empty());
    }

    #[test]
    fn test_add_lost_write_is_internal() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        add_to_order(&mut db, burger.id.as_str(), 1).unwrap();

        db.lose_updates = true;
        match add_to_order(&mut db, burger.id.as_str(), 3) {
            Err(err @ Error::Internal(_)) => {
                assert_eq!(err.status_code(), 500);
                assert_eq!(err.to_string(), "something is wrong when add order to db");
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[test]
    fn test_order_pricing() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        let salad = insert(&mut db, "salad", 10.0);
        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();
        add_to_order(&mut db, salad.id.as_str(), 1).unwrap();

        let order = order(&db).unwrap();
        assert_eq!(order.total_order_price, 21.0);
        assert_eq!(order.order_items.len(), 2);
        assert_eq!(order.order_items[0].menu_item_name, "burger");
        assert_eq!(order.order_items[0].item_total, 11.0);
        assert_eq!(order.order_items[1].menu_item_name, "salad");
        assert_eq!(order.order_items[1].item_total, 10.0);
    }

    #[test]
    fn test_empty_order() {
        let db = MockDB::new();
        let order = order(&db).unwrap();
        assert_eq!(order.total_order_price, 0.0);
        assert!(order.order_items.is_empty());
    }

    #[test]
    fn test_order_with_deleted_menu_item_fails() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();
        db.menu_items.clear();

        assert!(matches!(order(&db), Err(Error::NotFound(_))));
        // the failure propagates unchanged through the operations returning the order
        assert!(matches!(
            remove_order_item(&mut db, "66e0cb8332a8fb1c7597e252"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            update_order(&mut db, burger.id.as_str(), 1),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_order() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        let salad = insert(&mut db, "salad", 10.0);
        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();

        let order = update_order(&mut db, burger.id.as_str(), 4).unwrap();
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.order_items[0].quantity, 4);
        assert_eq!(order.total_order_price, 22.0);

        // only existing lines are updated
        let order = update_order(&mut db, salad.id.as_str(), 4).unwrap();
        assert_eq!(order.order_items.len(), 1);

        assert!(matches!(
            update_order(&mut db, burger.id.as_str(), -4),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        let salad = insert(&mut db, "salad", 10.0);
        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();

        let before = order(&db).unwrap();
        let after = remove_order_item(&mut db, salad.id.as_str()).unwrap();
        assert_eq!(before, after);

        let after = remove_order_item(&mut db, burger.id.as_str()).unwrap();
        assert!(after.order_items.is_empty());
        let again = remove_order_item(&mut db, burger.id.as_str()).unwrap();
        assert!(again.order_items.is_empty());

        let calls = db.calls();
        assert!(matches!(
            remove_order_item(&mut db, "bad"),
            Err(Error::BadRequest(_))
        ));
        assert_eq!(db.calls(), calls);
    }

    #[test]
    fn test_confirm_clears_everything() {
        let mut db = MockDB::new();
        let burger = insert(&mut db, "burger", 5.5);
        let salad = insert(&mut db, "salad", 10.0);
        add_to_order(&mut db, burger.id.as_str(), 2).unwrap();
        add_to_order(&mut db, salad.id.as_str(), 3).unwrap();

        confirm_order(&mut db).unwrap();
        let order = order(&db).unwrap();
        assert_eq!(order.total_order_price, 0.0);
        assert!(order.order_items.is_empty());

        // confirming an empty order is fine
        confirm_order(&mut db).unwrap();
    }
}
