//! Loads `home.json`, `resume.json` and `contact.json` from a directory into
//! the content store.
//!
//! Usage: `seed-content [DIR]` (default `content/`)

use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use folio_db::{
    repositories::content::PgContentStore,
    schema::initialize_database,
    seed::{read_seed_documents, seed_content},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    tracing_subscriber::fmt().init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("content"));

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;
    let db_pool = folio_db::create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    let documents = read_seed_documents(&dir)
        .wrap_err_with(|| format!("Could not read seed documents from {}", dir.display()))?;
    let store = PgContentStore::new(db_pool);
    let written = seed_content(&store, documents).await?;

    info!("Seeded {} content documents from {}", written, dir.display());
    Ok(())
}
