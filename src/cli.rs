use crate::config::DEFAULT_ADDRESS;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9\.\-]+:\d{1,5}$").expect("address pattern is valid")
});

/// Errors that can occur when parsing the command line arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CLIError {
    #[error("Invalid target format. Should be <host>:<port>")]
    InvalidUrlFormat,
    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("Invalid parameter '{0}'")]
    InvalidParameter(String),
}

/// What the client should ask the server
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show the menu served right now
    Menu,
    /// Show one menu item
    Item(String),
    /// Put a menu item in the order
    Add(String, i64),
    /// Change the quantity of an ordered item
    Update(String, i64),
    /// Take a menu item out of the order
    Remove(String),
    /// Show the order
    Order,
    /// Check out
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CLIOptions {
    pub target: String,
    pub action: Action,
}

/// Usage string printed when the arguments can't be understood
pub const USAGE: &str = "usage: client [<host>:<port>] <menu | item <id> | add <id> <quantity> | update <id> <quantity> | remove <id> | order | confirm>";

/// Validate the format of the TCP address provided by the user
///
/// Returns its input if the address is in the format <host>:<port>, otherwise InvalidUrlFormat
pub fn validate_address(url: &str) -> std::result::Result<&str, CLIError> {
    if ADDRESS.is_match(url) {
        Ok(url)
    } else {
        Err(CLIError::InvalidUrlFormat)
    }
}

fn required<I: Iterator<Item = String>>(
    args: &mut I,
    name: &'static str,
) -> std::result::Result<String, CLIError> {
    args.next().ok_or(CLIError::MissingParameter(name))
}

fn quantity<I: Iterator<Item = String>>(args: &mut I) -> std::result::Result<i64, CLIError> {
    let raw = required(args, "quantity")?;
    raw.parse::<i64>()
        .map_err(|_| CLIError::InvalidParameter(raw))
}

fn parse_action<I: Iterator<Item = String>>(
    name: &str,
    args: &mut I,
) -> std::result::Result<Action, CLIError> {
    match name.to_ascii_lowercase().as_str() {
        "menu" => Ok(Action::Menu),
        "item" => Ok(Action::Item(required(args, "menu item id")?)),
        "add" => Ok(Action::Add(required(args, "menu item id")?, quantity(args)?)),
        "update" => Ok(Action::Update(
            required(args, "menu item id")?,
            quantity(args)?,
        )),
        "remove" => Ok(Action::Remove(required(args, "menu item id")?)),
        "order" => Ok(Action::Order),
        "confirm" => Ok(Action::Confirm),
        other => Err(CLIError::InvalidParameter(other.to_string())),
    }
}

/// Parse the program arguments, program name included
pub fn parse_cli_args<I>(mut args: I) -> std::result::Result<CLIOptions, CLIError>
where
    I: Iterator<Item = String>,
{
    args.next(); // Skip the program name
    let first = required(&mut args, "target or action")?;

    let (target, action_name) = match validate_address(&first) {
        Ok(target) => (target.to_string(), required(&mut args, "action")?),
        Err(_) => (DEFAULT_ADDRESS.to_string(), first),
    };
    let action = parse_action(&action_name, &mut args)?;

    if let Some(extra) = args.next() {
        return Err(CLIError::InvalidParameter(extra));
    }

    Ok(CLIOptions { target, action })
}
