pub mod db;

pub mod couriers;
pub mod orders;

use std::{env, fs, path::Path, str::FromStr};

use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::db::traits::DeliveryError;

pub use db::SqliteDatabase;

const SQLITE_DB_URL: &str = "sqlite://data/candy_store.db";

pub fn db_url() -> String {
    let result = env::var("CANDY_DATABASE_URL").unwrap_or_else(|_| {
        info!("CANDY_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Opens a connection pool, creating the database file (and its directory) if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, DeliveryError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    if let Some(path) = database_file(url) {
        ensure_parent_dir(path)?;
    }
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// The file behind a `sqlite:` URL, or `None` for in-memory databases.
fn database_file(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")).unwrap_or(url);
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(Path::new(path))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DeliveryError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            debug!("🗃️ Creating database directory {}", dir.display());
            fs::create_dir_all(dir)
                .map_err(|e| DeliveryError::DatabaseError(format!("Could not create {}: {e}", dir.display())))
        },
        _ => Ok(()),
    }
}
