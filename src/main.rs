use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use negocio::config::{Config, LogFormat};
use negocio::middleware::{BearerAuth, RequestId};
use negocio::AppServices;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.app.log_level.clone().into());
    match config.app.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Starting Negocio back office");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!(
        latency_factor = config.mock.latency_factor,
        sunat_acceptance_rate = config.mock.sunat_acceptance_rate,
        "Simulated backend configured"
    );

    let services = AppServices::seeded(&config.mock).context("Failed to seed data stores")?;

    if config.is_production() && config.server.cors_allowed_origin.is_none() {
        tracing::warn!("CORS_ALLOWED_ORIGIN is not set, accepting requests from any origin");
    }

    let bind_address = config.server.bind_address();
    let cors_origin = config.server.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        let cors = match cors_origin.as_deref() {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(3600);

        let services = services.clone();
        App::new()
            .wrap(BearerAuth::new(services.auth.clone()))
            .wrap(cors)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server terminated with an error")
}
