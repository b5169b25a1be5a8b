use std::net::SocketAddr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_URL: &str = "http://localhost:3000/";
const DEFAULT_MAX_CONNECTIONS: u32 = 32;
const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{name} must be a number, got {value:?}")]
	NotANumber { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	pub port: u16,
	/// Public base URL advertised in the OpenAPI document
	pub url: String,
	/// Runs on the in-memory store when unset
	pub database_url: Option<String>,
	pub max_connections: u32,
	pub public_dir: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			port: DEFAULT_PORT,
			url: String::from(DEFAULT_URL),
			database_url: None,
			max_connections: DEFAULT_MAX_CONNECTIONS,
			public_dir: String::from(DEFAULT_PUBLIC_DIR),
		}
	}
}

impl Config {
	/// Reads the process environment, after loading `.env` if one exists.
	pub fn from_env() -> Result<Self, ConfigError> {
		_ = dotenvy::dotenv();
		Self::from_vars(|name| std::env::var(name).ok())
	}

	pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let defaults = Self::default();
		Ok(Self {
			port: number(&var, "PORT")?.unwrap_or(defaults.port),
			url: var("URL").unwrap_or(defaults.url),
			database_url: var("DATABASE_URL").filter(|url| !url.is_empty()),
			max_connections: number(&var, "DATABASE_MAX_CONNECTIONS")?
				.unwrap_or(defaults.max_connections),
			public_dir: var("PUBLIC_DIR").unwrap_or(defaults.public_dir),
		})
	}

	pub fn socket_addr(&self) -> SocketAddr {
		SocketAddr::from(([0, 0, 0, 0], self.port))
	}
}

fn number<T: std::str::FromStr>(
	var: &impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<Option<T>, ConfigError> {
	let Some(value) = var(name) else {
		return Ok(None);
	};
	value
		.trim()
		.parse()
		.map(Some)
		.map_err(|_| ConfigError::NotANumber { name, value })
}
