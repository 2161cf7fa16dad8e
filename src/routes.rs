use std::collections::HashMap;

use crate::database::Database;
use crate::{
    errors,
    http::{Request, Response},
};
use errors::{Error, Result};
use matchit::Router;

/// Utility macro generating a constant for the HTTP endpoint, and associate it with
/// an identifier. Matchit requires both
macro_rules! make_paths {
        ($($name:ident: $path:expr,)*) => {

        pub mod paths {
                    $(
                        pub const $name: &str = concat!("/api/menu", $path);
                    )*
        }
        pub mod endpoints {
            $(
                pub const $name: &str = stringify!($name);
            )*
        }

        }
    }

make_paths! {
    ACTIVE_MENU: "/active",
    MENU_ITEM_BY_ID: "/items/{id}",
    ORDERS: "/orders",
    ORDER_ITEM_BY_ID: "/orders/{menu_item_id}",
    CONFIRM_ORDER: "/orders/confirm",
}

/// Utility to add a list of paths to the router automatically
macro_rules! add_path{
    ($router:ident $(, $path:ident)*) => {
        $(
            $router.insert(paths::$path, endpoints::$path)?;
        )*
    }
}

/// Names of the parameters in the HTTP paths, used to extract them
/// from the parameters inside of request handling
pub mod params {
    /// Key of menu item ids in item lookups
    pub const ID: &str = "id";

    /// Key of menu item ids in order paths
    pub const MENU_ITEM_ID: &str = "menu_item_id";
}

/// Return the HTTP path of a menu item
pub fn menu_item_by_id(id: &str) -> String {
    paths::MENU_ITEM_BY_ID.replace("{id}", id)
}

/// Return the HTTP path of the order line for a menu item
pub fn order_item_by_id(menu_item_id: &str) -> String {
    paths::ORDER_ITEM_BY_ID.replace("{menu_item_id}", menu_item_id)
}

// spurious warning, I am using this in tests
#[allow(unused_macros)]
/// Utility to create easily hashmaps of parameters for testing
macro_rules! make_params {
    () => {
        std::collections::HashMap::new()
    };
    ($name:ident: $value:expr $(, $name2:ident: $value2:expr)* ) => {
        {
            let mut map = std::collections::HashMap::new();
            map.insert(params::$name.to_string(), $value.to_string());
            $(
                map.insert(params::$name2.to_string(), $value2.to_string());
            )*
            map
        }
        }
    }

#[allow(unused_imports)]
pub(crate) use make_params;

/// Create a new router with the paths defined in this module
///
/// Errors from this functions are programming errors, most likely steming from a
/// misuse of matchit
fn new_router() -> errors::Result<Router<&'static str>> {
    let mut router = Router::new();
    add_path!(
        router,
        ACTIVE_MENU,
        MENU_ITEM_BY_ID,
        ORDERS,
        ORDER_ITEM_BY_ID,
        CONFIRM_ORDER
    );
    Ok(router)
}

/// Type of the object containing the HTTP path parameters passed to handlers
pub type HttpParams = HashMap<String, String>;
/// Type of the function that handles HTTP requests
pub type HttpHandler = fn(Request, HttpParams, &mut dyn Database) -> Result<Response>;

/// The router is in charge of taking in raw HTTP requests and to dispatch them to
/// the appropriate handler function.
pub struct HttpRouter {
    routes: Router<&'static str>,
    handlers: HashMap<&'static str, HashMap<&'static str, HttpHandler>>,
}

impl HttpRouter {
    /// Creates a new empty router
    ///
    /// Although the matchit router is not empty, there are no methods associated
    /// to the routes yet, so no request can be processed
    /// Errors in this function are programming errors.
    pub fn new() -> Result<Self> {
        let routes = new_router()?;
        Ok(HttpRouter {
            routes,
            handlers: HashMap::new(),
        })
    }

    /// Add a new route to the router
    pub fn add_route(&mut self, method: &'static str, route: &'static str, handler: HttpHandler) {
        let method_to_handler = self.handlers.entry(route).or_default();
        method_to_handler.insert(method, handler);
    }

    /// Sends a request to the appropriate handler if it exists
    ///
    /// If there is a route matching the request, its handler will be called and the result of the
    /// function will be the result of the handler. If no route is defined for this request,
    /// return Error::NotFound
    ///
    /// Checking that all parameters are presents and that the body is correct is the
    /// responsibility of the handler
    pub fn route(&self, request: Request, db: &mut dyn Database) -> Result<Response> {
        let route = self
            .routes
            .at(request.route_path())
            .map_err(|_| Error::NotFound(format!("No route for {}", request.route_path())))?;
        let handler = self
            .handlers
            .get(route.value)
            .and_then(|method_to_handler| method_to_handler.get(request.method.as_str()))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No handler for {} {}",
                    request.method.as_str(),
                    route.value
                ))
            })?;

        let params: HashMap<String, String> = route
            .params
            .iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        handler(request, params, db)
    }
}
