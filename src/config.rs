use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use axum::http::HeaderValue;

/// The shortest accepted `SESSION_KEY`, in bytes.
pub const MIN_SESSION_KEY_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("invalid {key}: {reason}")]
	Invalid { key: &'static str, reason: String },
	#[error("SESSION_KEY must be at least {MIN_SESSION_KEY_LENGTH} bytes")]
	SessionKeyTooShort,
}

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
	pub bind_addr: SocketAddr,
	pub database_url: String,
	pub session_key: String,
	/// The single origin allowed to make credentialed cross-origin requests.
	pub cors_origin: HeaderValue,
	pub secure_cookies: bool,
	/// Rate limit login attempts per peer address.
	pub rate_limit: bool,
	/// When set, spans are exported to this OTLP collector.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary variable source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let required = |key: &'static str| lookup(key).ok_or(Error::Missing(key));

		let session_key = required("SESSION_KEY")?;

		if session_key.len() < MIN_SESSION_KEY_LENGTH {
			return Err(Error::SessionKeyTooShort);
		}

		let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into());

		Ok(Self {
			bind_addr: parse(&lookup, "BIND_ADDR", "127.0.0.1:8080")?,
			database_url: required("DATABASE_URL")?,
			session_key,
			cors_origin: HeaderValue::from_str(&cors_origin).map_err(|e| Error::Invalid {
				key: "CORS_ORIGIN",
				reason: e.to_string(),
			})?,
			secure_cookies: parse(&lookup, "SECURE_COOKIES", "false")?,
			rate_limit: parse(&lookup, "RATE_LIMIT", "true")?,
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|s| !s.is_empty()),
		})
	}
}

fn parse<T>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &'static str,
	default: &str,
) -> Result<T, Error>
where
	T: FromStr,
	T::Err: Display,
{
	lookup(key)
		.as_deref()
		.unwrap_or(default)
		.parse()
		.map_err(|e: T::Err| Error::Invalid {
			key,
			reason: e.to_string(),
		})
}
