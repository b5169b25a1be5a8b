pub mod api;
pub mod config;
pub mod database;
pub mod docs;
pub mod error;
pub mod models;
pub mod store;

use axum::Router;
use config::Config;
use database::PgStore;
use std::sync::Arc;
use store::{MemoryStore, Store};
use tower_http::{
	cors::{Any, CorsLayer},
	services::ServeDir,
	trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
	pub config: Config,
	pub db: Arc<dyn Store>,
}

/// API routes and docs, with the static directory as fallback.
pub fn app(state: AppState) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods(Any)
		.allow_headers(Any);

	Router::new()
		.merge(api::route(state.clone()))
		.merge(docs::route(&state.config.url))
		.fallback_service(ServeDir::new(&state.config.public_dir))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
		)
		.init();

	let config = Config::from_env().expect("Invalid configuration");

	let db: Arc<dyn Store> = match &config.database_url {
		Some(database_url) => {
			let db = PgStore::connect(database_url, config.max_connections)
				.await
				.expect("Could not connect to database");
			tracing::info!("Connected to database");
			Arc::new(db)
		}
		None => {
			tracing::warn!("DATABASE_URL is not set, posts and comments are kept in memory");
			Arc::new(MemoryStore::new())
		}
	};

	let state = AppState {
		config: config.clone(),
		db: db.clone(),
	};
	let router = app(state);

	let listener = tokio::net::TcpListener::bind(config.socket_addr())
		.await
		.expect("Unable to bind port");
	tracing::info!("Running at port {}", config.port);

	if let Err(err) = axum::serve(listener, router)
		.with_graceful_shutdown(shutdown_signal())
		.await
	{
		tracing::error!(error = %err, "Server error");
	}

	db.close().await;
	tracing::info!("Server shutdown complete");
}

async fn shutdown_signal() {
	use tokio::signal;

	let ctrl_c = async {
		if let Err(err) = signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for Ctrl+C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
		_ = terminate => tracing::info!("Received SIGTERM, shutting down"),
	}
}
