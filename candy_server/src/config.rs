use std::{env, str::FromStr, time::Duration};

use candy_common::parse_boolean_flag;
use log::*;

const DEFAULT_CANDY_HOST: &str = "127.0.0.1";
const DEFAULT_CANDY_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/candy_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The size of the database connection pool.
    pub max_connections: u32,
    /// How long a state-changing request waits for the store's write gate before it gives up with a 503.
    pub lock_timeout: Duration,
    /// If true, the embedded migrations are run against the database before the server starts listening.
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CANDY_HOST.to_string(),
            port: DEFAULT_CANDY_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("CANDY_HOST").ok().unwrap_or_else(|| DEFAULT_CANDY_HOST.into());
        let port = parse_env("CANDY_PORT", DEFAULT_CANDY_PORT);
        let database_url = env::var("CANDY_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ CANDY_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = match parse_env("CANDY_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS) {
            0 => {
                warn!("🪛️ CANDY_DB_MAX_CONNECTIONS cannot be zero. Using {DEFAULT_MAX_CONNECTIONS} instead.");
                DEFAULT_MAX_CONNECTIONS
            },
            n => n,
        };
        let lock_timeout = Duration::from_millis(parse_env(
            "CANDY_LOCK_TIMEOUT_MS",
            DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
        ));
        let run_migrations = parse_boolean_flag(env::var("CANDY_RUN_MIGRATIONS").ok(), true);
        Self { host, port, database_url, max_connections, lock_timeout, run_migrations }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    env::var(name)
        .map(|s| {
            s.parse::<T>().unwrap_or_else(|e| {
                error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
                default
            })
        })
        .ok()
        .unwrap_or(default)
}
