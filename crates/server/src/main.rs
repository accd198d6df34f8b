use database::db::create_connection;
use log::{info, warn};
use migration::{Migrator, MigratorTrait};
use payments::PaymentBridge;

use crate::{config::Config, state::AppState, utils::shutdown::shutdown_signal};

mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
#[cfg(test)]
mod test_helpers;
mod utils;

#[tokio::main]
async fn main() {
    _ = dotenvy::dotenv();
    env_logger::init();
    let config = Config::from_env().expect("Invalid configuration");

    if config.payments.stripe.secret_key.is_empty() {
        warn!("STRIPE_SECRET_KEY is not set, card checkout will fail");
    }

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to the database");

    if config.auto_migrate {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        info!("Migrations applied");
    }

    let state = AppState::new(db, PaymentBridge::new(config.payments.clone()));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("Failed to bind address");
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
