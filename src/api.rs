// This file contains the basic types used to communicate through the API
use serde::{Deserialize, Serialize};

/// Kind of menu, determines when it is served
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Breakfast => "breakfast",
            MenuType::Lunch => "lunch",
            MenuType::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Option<MenuType> {
        match s {
            "breakfast" => Some(MenuType::Breakfast),
            "lunch" => Some(MenuType::Lunch),
            "dinner" => Some(MenuType::Dinner),
            _ => None,
        }
    }
}

/// A menu item, as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub menu_item_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// The menu currently served, with the items that could be resolved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub menu_items: Vec<MenuItemView>,
}

/// One line of the order, joined with its menu item and priced
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub menu_item_description: String,
    pub menu_item_price: f64,
    pub menu_item_image_url: String,
    pub quantity: i64,
    /// quantity * price
    pub item_total: f64,
}

impl OrderItemView {
    pub fn new(item: MenuItemView, quantity: i64) -> OrderItemView {
        OrderItemView {
            item_total: quantity as f64 * item.price,
            menu_item_id: item.menu_item_id,
            menu_item_name: item.name,
            menu_item_description: item.description,
            menu_item_price: item.price,
            menu_item_image_url: item.image_url,
            quantity,
        }
    }
}

/// The full order, as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    /// Sum of the totals of every line
    pub total_order_price: f64,
    pub order_items: Vec<OrderItemView>,
}

impl OrderView {
    pub fn new(order_items: Vec<OrderItemView>) -> OrderView {
        OrderView {
            total_order_price: order_items.iter().map(|line| line.item_total).sum(),
            order_items,
        }
    }
}

/// Body of a request adding an item to the order.
///
/// Fields are kept loose so that missing or mistyped values are reported with the same
/// validation errors as malformed ones.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    #[serde(default)]
    pub menu_item_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

/// Body of a request changing the quantity of an order line
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct QuantityUpdate {
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub message: String,
}

/// Body of every error response
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}
