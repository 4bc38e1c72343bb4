#![warn(clippy::pedantic)]

mod auth;
mod config;
mod error;
mod extract;
mod middleware;
mod model;
mod ratelimit;
mod route;
mod session;
mod store;
mod trace;

use std::net::SocketAddr;

use argon2::Argon2;
use tokio::signal;

pub use error::Error;

use crate::{config::Config, session::Sessions, store::Store};

pub type Database = sqlx::Pool<sqlx::Postgres>;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the repositories, a hash configuration (since it's expensive to create),
/// or the session signing key.
///
/// Handlers that only need one of them can extract it directly, e.g. `State<Store>`.
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
	pub store: Store,
	pub hasher: Argon2<'static>,
	pub sessions: Sessions,
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(config.otlp_endpoint.as_deref())
		.expect("failed to initialize tracing");

	let database = Database::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = AppState {
		store: store::sql::store(database),
		hasher: Argon2::default(),
		sessions: Sessions::new(config.session_key.as_bytes(), config.secure_cookies),
	};

	let app = route::app(state, &route::Options::from(&config));

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.expect("failed to bind to address");

	tracing::info!("listening on {}", config.bind_addr);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await
	.unwrap();

	tracing::info!("server stopped");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install SIGTERM handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}
