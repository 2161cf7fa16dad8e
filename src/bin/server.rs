use std::sync::Arc;

use common::config::Config;
use common::database::{seed::seed_defaults, sqlite::SQLiteConnection};
use common::endpoints::create_http_router;
use common::errors::Result;
use common::http::{HttpServer, Response};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn run() -> Result<()> {
    let config = Config::load();

    let mut db = SQLiteConnection::open(&config.database_path)?;
    if config.seed && seed_defaults(&mut db)? {
        info!(path = %config.database_path, "Seeded empty database");
    }
    drop(db);

    let router = Arc::new(create_http_router()?);
    let database_path = Arc::new(config.database_path.clone());

    let server = HttpServer::new(&config.address)?;
    info!(address = %config.address, "Server listening");

    server.serve(config.workers, move |request| {
        // one connection per request, nothing is shared between requests but the file
        let result = SQLiteConnection::open(database_path.as_str())
            .and_then(|mut db| router.route(request, &mut db));
        result.unwrap_or_else(|err| Response::from_error(&err))
    });

    Ok(())
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = run() {
        error!(error = %err, "Server stopped");
        std::process::exit(1);
    }
}
