use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use chirp_service::db::MIGRATOR;
use chirp_service::services::SERVICE_NAME;
use chirp_service::storage::LocalBlobStore;
use chirp_service::{handlers, AppState, Config};
use db_pool::{create_pool, DbConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default();
    if origins.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Chirp Service
///
/// HTTP API for registration, follows, tweets, likes, media upload and the
/// ranked feed, backed by PostgreSQL.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting chirp-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = match DbConfig::from_env(SERVICE_NAME, &config.database.url) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Database configuration invalid: {}", e);
            std::process::exit(1);
        }
    };
    db_cfg.log_config();

    let pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            std::process::exit(1);
        }
    };

    if config.database.run_migrations {
        if let Err(e) = MIGRATOR.run(&pool).await {
            tracing::error!("Database migrations failed: {}", e);
            std::process::exit(1);
        }
        tracing::info!("Database migrations applied");
    }

    let blob_store = Arc::new(LocalBlobStore::new(
        &config.media.storage_dir,
        config.media.public_prefix.clone(),
    ));
    tracing::info!(
        "Media stored under {} as {}<name>",
        config.media.storage_dir,
        config.media.public_prefix
    );

    let state = web::Data::new(AppState::new(
        pool.clone(),
        blob_store,
        config.auth.default_api_key.clone(),
        config.media.max_upload_bytes,
    ));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_origins = config.cors_origins();
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&cors_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(chirp_service::metrics::serve_metrics),
            )
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .disable_signals();

    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    let server = server.run();
    let server_handle = server.handle();

    let server_task = actix_rt::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Ok(())) => tracing::info!("HTTP server stopped"),
                Ok(Err(e)) => {
                    tracing::error!("HTTP server error: {}", e);
                    pool.close().await;
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("HTTP server task failed: {}", e);
                    pool.close().await;
                    return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
                }
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    pool.close().await;
    tracing::info!("Chirp-service shut down");
    Ok(())
}
