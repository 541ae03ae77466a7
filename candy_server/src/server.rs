use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use candy_engine::{CourierApi, OrderFlowApi, SqliteDatabase};
use log::*;

use crate::{config::ServerConfig, errors::ServerError, routes::configure_routes};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?
        .with_lock_timeout(config.lock_timeout);
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ Skipping database migrations. Make sure the schema at {} is up to date.", config.database_url);
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let couriers_api = CourierApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("candy::access_log"))
            .app_data(web::Data::new(couriers_api))
            .app_data(web::Data::new(orders_api))
            .configure(configure_routes::<SqliteDatabase>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))
    .map_err(|e| {
        error!("🚀️ Could not bind to {}:{}. {e}", config.host, config.port);
        ServerError::from(e)
    })?
    .run();
    info!("🚀️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}
