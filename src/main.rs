use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[macro_use]
extern crate lazy_static;
#[macro_use]
mod macros;

mod api;
mod cli;
mod cookies;
mod db;
mod env;
mod error;
mod html;
mod password;
mod routes;
mod static_files;
mod traits;
mod util;

pub use error::{AppError, AppResult};
pub use static_files::render_html_template;
use traits::RequestBody;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Coin balance given to newly registered users.
    pub starter_coin: i64,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env::RUST_LOG.as_str()))
        .init();

    let args = cli::Args::parse();

    // set up connection pool
    let options = SqliteConnectOptions::from_str(&env::DATABASE_URL)
        .wrap_err("invalid DATABASE_URL")?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .wrap_err("can't connect to database")?;

    let state = AppState {
        pool,
        starter_coin: *env::STARTER_COIN,
    };

    match args.command.unwrap_or_default() {
        cli::Command::Run => {
            state.migrate().await?;
            state.init(&env::ADMIN_USERNAME, &env::ADMIN_PASSWORD).await?;

            let app = routes::router()
                .layer(TraceLayer::new_for_http())
                .with_state(state);

            let listener = tokio::net::TcpListener::bind(env::BIND_ADDRESS.as_str())
                .await
                .wrap_err_with(|| format!("can't bind to {}", *env::BIND_ADDRESS))?;
            tracing::info!(address = env::BIND_ADDRESS.as_str(), "Listening.");
            axum::serve(listener, app).await?;
        }
        cli::Command::Migrate => {
            state.migrate().await?;
            tracing::info!("Database migrated.");
        }
        cli::Command::Init => {
            state.migrate().await?;
            state.init(&env::ADMIN_USERNAME, &env::ADMIN_PASSWORD).await?;
        }
    }

    Ok(())
}
