use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use bookstore_api::config::Config;
use bookstore_api::routes::{self, ENDPOINTS};
use bookstore_api::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Panics in a handler take down only that worker; actix starts a new one.
    std::panic::set_hook(Box::new(|panic| {
        error!("Unhandled panic: {panic}");
    }));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Failed to initialise state from {}: {e}", config.users_file.display());
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let address = config.address();
    info!("Bookstore API starting on http://{address}");
    info!("Users file: {}", config.users_file.display());
    for (_, route) in ENDPOINTS {
        info!("  {route}");
    }

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await
}
