use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use quiz_payment_engine::{helpers::SignatureVerifier, NotificationApi, PaymentStatusApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, PaymentNotificationRoute, PaymentStatusRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let verifier = SignatureVerifier::new(config.server_key.clone());
    let proxy = config.proxy_config();
    let srv = HttpServer::new(move || {
        let notification_api = NotificationApi::new(db.clone(), verifier.clone());
        let status_api = PaymentStatusApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("qpg::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(proxy))
            .app_data(web::Data::new(notification_api))
            .app_data(web::Data::new(status_api))
            .service(health)
            .service(PaymentNotificationRoute::<SqliteDatabase>::new())
            .service(PaymentStatusRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Bodies that are not valid JSON are rejected with a 400 and a JSON error body, like every other client error.
///
/// Some gateway integrations omit the content type, so it isn't checked.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().content_type_required(false).error_handler(|err, _req| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::CouldNotDeserializePayload(err.to_string()).into()
    })
}
