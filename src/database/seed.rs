use crate::api::MenuType;
use crate::database::{Database, NewMenu, NewMenuItem};
use crate::errors::Result;
use tracing::info;

struct SeedMenu {
    menu_type: MenuType,
    start_time: u16,
    end_time: u16,
    items: &'static [(&'static str, &'static str, f64, &'static str)],
}

const DEFAULT_MENUS: &[SeedMenu] = &[
    SeedMenu {
        menu_type: MenuType::Breakfast,
        start_time: 6 * 60,
        end_time: 11 * 60 - 1,
        items: &[
            ("Pancakes", "Three buttermilk pancakes with maple syrup", 6.5, "pancakes.png"),
            ("Big breakfast", "Eggs, bacon, sausage and toast", 9.0, "big-breakfast.png"),
            ("Coffee", "Freshly brewed filter coffee", 2.5, "coffee.png"),
        ],
    },
    SeedMenu {
        menu_type: MenuType::Lunch,
        start_time: 11 * 60,
        end_time: 17 * 60 - 1,
        items: &[
            ("Big mac", "Big mac", 5.5, "bigmac.png"),
            ("Caesar salad", "Romaine, parmesan and croutons", 7.0, "caesar.png"),
            ("Fries", "Salted french fries", 3.0, "fries.png"),
        ],
    },
    SeedMenu {
        menu_type: MenuType::Dinner,
        start_time: 17 * 60,
        end_time: 23 * 60 - 1,
        items: &[
            ("Steak", "Grilled sirloin with pepper sauce", 18.0, "steak.png"),
            ("Salmon", "Roasted salmon with vegetables", 15.5, "salmon.png"),
            ("Chocolate cake", "Dark chocolate fondant", 6.0, "cake.png"),
        ],
    },
];

/// Fill an empty store with a default set of menus.
///
/// Returns whether anything was inserted: a store that already has menus is left untouched.
pub fn seed_defaults(db: &mut dyn Database) -> Result<bool> {
    if db.count_menus()? > 0 {
        return Ok(false);
    }

    for menu in DEFAULT_MENUS {
        let mut menu_items = Vec::with_capacity(menu.items.len());
        for (name, description, price, image_url) in menu.items {
            let item = db.insert_menu_item(NewMenuItem {
                name: name.to_string(),
                description: description.to_string(),
                price: *price,
                image_url: image_url.to_string(),
            })?;
            menu_items.push(item.id.to_string());
        }

        db.insert_menu(NewMenu {
            start_time: menu.start_time,
            end_time: menu.end_time,
            menu_type: menu.menu_type,
            menu_items,
        })?;
        info!(menu = menu.menu_type.as_str(), "Seeded default menu");
    }

    Ok(true)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::mock::MockDB;

    #[test]
    fn test_seed_once() {
        let mut db = MockDB::new();
        assert!(seed_defaults(&mut db).unwrap());
        assert_eq!(db.menus.len(), 3);
        assert_eq!(db.menu_items.len(), 9);

        assert!(!seed_defaults(&mut db).unwrap());
        assert_eq!(db.menus.len(), 3);
    }

    #[test]
    fn test_seeded_windows_do_not_overlap() {
        for (i, a) in DEFAULT_MENUS.iter().enumerate() {
            assert!(a.start_time <= a.end_time && a.end_time <= 1439);
            for b in &DEFAULT_MENUS[i + 1..] {
                assert!(a.end_time < b.start_time || b.end_time < a.start_time);
            }
        }
    }
}
