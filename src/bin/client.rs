use common::api;
use common::cli::*;
use common::errors::Result;
use common::http::{code_to_string, HttpClient, Response};
use common::routes;
use serde::de::DeserializeOwned;

fn print_response<Body>(response: &Response)
where
    Body: DeserializeOwned + std::fmt::Debug,
{
    match response.status {
        Some(code) => println!("Response Status: {} - {}", code, code_to_string(code)),
        None => println!("No status in response"),
    }
    if response.body.is_empty() {
        return;
    }

    let is_error = response.status.map_or(true, |code| code >= 400);
    if is_error {
        match serde_json::from_str::<api::ErrorBody>(&response.body) {
            Ok(err) => println!("Error: {} - {}", err.error_code, err.message),
            Err(_) => println!("Error body: {}", response.body),
        }
        return;
    }

    match serde_json::from_str::<Body>(&response.body) {
        Ok(json) => println!("Response Body: {:#?}", json),
        Err(e) => println!("Error parsing response body: {}\n{:?}", e, response.body),
    }
}

fn run(options: CLIOptions) -> Result<()> {
    let mut client = HttpClient::new(&options.target)?;

    match options.action {
        Action::Menu => {
            let response = client.send("GET", routes::paths::ACTIVE_MENU, "")?;
            print_response::<api::MenuView>(&response);
        }
        Action::Item(id) => {
            let response = client.send("GET", &routes::menu_item_by_id(&id), "")?;
            print_response::<api::MenuItemView>(&response);
        }
        Action::Add(id, quantity) => {
            let body = serde_json::json!({ "menuItemId": id, "quantity": quantity });
            let response = client.send("POST", routes::paths::ORDERS, &body.to_string())?;
            print_response::<api::OrderItemView>(&response);
        }
        Action::Update(id, quantity) => {
            let body = serde_json::json!({ "quantity": quantity });
            let response = client.send(
                "PATCH",
                &routes::order_item_by_id(&id),
                &body.to_string(),
            )?;
            print_response::<api::OrderView>(&response);
        }
        Action::Remove(id) => {
            let response = client.send("DELETE", &routes::order_item_by_id(&id), "")?;
            print_response::<api::OrderView>(&response);
        }
        Action::Order => {
            let response = client.send("GET", routes::paths::ORDERS, "")?;
            print_response::<api::OrderView>(&response);
        }
        Action::Confirm => {
            let response = client.send("POST", routes::paths::CONFIRM_ORDER, "")?;
            print_response::<api::Message>(&response);
        }
    }

    Ok(())
}

fn main() {
    let options = match parse_cli_args(std::env::args()) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}\n{}", err, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("Request failed: {}", err);
        std::process::exit(1);
    }
}
