use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Default address for both the client and the server
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:9898";

/// Server settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// `MENU_ORDER_ADDRESS`: where the server listens
    pub address: String,
    /// `MENU_ORDER_DATABASE`: path of the SQLite file
    pub database_path: String,
    /// `MENU_ORDER_SEED`: whether an empty store gets the default menus
    pub seed: bool,
    /// `MENU_ORDER_WORKERS`: size of the request thread pool
    pub workers: usize,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup, falling back on defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_workers = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(4);

        Self {
            address: try_load(&lookup, "MENU_ORDER_ADDRESS", DEFAULT_ADDRESS.to_string()),
            database_path: try_load(&lookup, "MENU_ORDER_DATABASE", "menu-order.db".to_string()),
            seed: try_load(&lookup, "MENU_ORDER_SEED", true),
            workers: try_load(&lookup, "MENU_ORDER_WORKERS", default_workers),
        }
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
