//! Folio server entry point.
//!
//! Reads configuration from the environment (and `.env` when present),
//! prepares the database schema and serves the API until interrupted.

use color_eyre::eyre::{Result, WrapErr};
use folio_api::config::ApiConfig;
use folio_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Server configuration is incomplete")?;

    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Could not connect to the content database")?;
    initialize_database(&db_pool)
        .await
        .wrap_err("Could not prepare the database schema")?;

    folio_api::start_server(config, db_pool)
        .await
        .wrap_err("Server stopped with an error")
}
