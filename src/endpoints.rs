use crate::api::{Message, NewOrderItem, QuantityUpdate};
use crate::database::Database;
use crate::errors::Result;
use crate::http::{Request, Response};
use crate::routes::*;
use crate::validation::{quantity_from_json, validate_id};
use crate::{cart, menu};

pub fn create_http_router() -> Result<HttpRouter> {
    let mut router = HttpRouter::new()?;

    router.add_route("GET", endpoints::ACTIVE_MENU, get_active_menu);
    router.add_route("GET", endpoints::MENU_ITEM_BY_ID, get_menu_item);
    router.add_route("POST", endpoints::ORDERS, add_to_order);
    router.add_route("GET", endpoints::ORDERS, get_order);
    router.add_route("PATCH", endpoints::ORDER_ITEM_BY_ID, update_order);
    router.add_route("DELETE", endpoints::ORDER_ITEM_BY_ID, remove_order_item);
    router.add_route("POST", endpoints::CONFIRM_ORDER, confirm_order);

    Ok(router)
}

/// Path parameter, or an empty string which validation will reject
fn param<'a>(path_params: &'a HttpParams, name: &str) -> &'a str {
    path_params.get(name).map(String::as_str).unwrap_or("")
}

fn get_active_menu(_: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    Response::json(200, &menu::active_menu(db)?)
}

fn get_menu_item(_: Request, path_params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    Response::json(200, &menu::menu_item(db, param(&path_params, params::ID))?)
}

fn add_to_order(request: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let body: NewOrderItem = request.json()?;
    let menu_item_id = body.menu_item_id.as_deref().unwrap_or("");
    validate_id(menu_item_id)?;
    let quantity = quantity_from_json(body.quantity.as_ref())?;

    Response::json(201, &cart::add_to_order(db, menu_item_id, quantity)?)
}

fn get_order(_: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    Response::json(200, &cart::order(db)?)
}

fn update_order(request: Request, path_params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let menu_item_id = param(&path_params, params::MENU_ITEM_ID);
    validate_id(menu_item_id)?;
    let body: QuantityUpdate = request.json()?;
    let quantity = quantity_from_json(body.quantity.as_ref())?;

    Response::json(200, &cart::update_order(db, menu_item_id, quantity)?)
}

fn remove_order_item(_: Request, path_params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let menu_item_id = param(&path_params, params::MENU_ITEM_ID);
    Response::json(200, &cart::remove_order_item(db, menu_item_id)?)
}

fn confirm_order(_: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    cart::confirm_order(db)?;
    Response::json(
        200,
        &Message {
            message: "Order has been confirmed".to_string(),
        },
    )
}
