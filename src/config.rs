//! Deployment configuration for the backend the screens talk to.
//!
//! The base address is resolved once (usually from the environment) and then shared read-only
//! by every [`ApiClient`](crate::http::ApiClient). Endpoint paths are relative so a base URL with
//! a path prefix (`https://host/api`) keeps that prefix for every request.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the backend base address.
pub const BASE_URL_ENV: &str = "TEAM_PORTAL_API_BASE_URL";
/// Optional environment variable overriding the team-registration path.
pub const REGISTER_PATH_ENV: &str = "TEAM_PORTAL_REGISTER_PATH";

/// Relative endpoint paths for each form screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Login endpoint.
	pub login: String,
	/// Member signup endpoint.
	pub signup: String,
	/// Team registration endpoint.
	pub register: String,
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			login: "users/login".into(),
			signup: "users/signup".into(),
			register: "auth/register".into(),
		}
	}
}

/// Resolved, read-only client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Normalized base address (always ends with `/`).
	pub base_url: Url,
	/// Endpoint paths relative to [`ClientConfig::base_url`].
	pub endpoints: Endpoints,
}
impl ClientConfig {
	/// Returns a builder seeded with the provided base address.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Resolves the configuration from [`BASE_URL_ENV`] and [`REGISTER_PATH_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let raw = env::var(BASE_URL_ENV)
			.map_err(|_| ConfigError::MissingEnv { name: BASE_URL_ENV })?;
		let mut builder = Self::builder(parse_base_url(&raw)?);

		if let Ok(path) = env::var(REGISTER_PATH_ENV) {
			builder = builder.register_path(path);
		}

		builder.build()
	}

	/// Joins a relative endpoint path onto the base address.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url.join(path.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidEndpoint { path: path.to_owned(), source }
		})
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	endpoints: Endpoints,
}
impl ClientConfigBuilder {
	/// Creates a new builder with default endpoint paths.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, endpoints: Endpoints::default() }
	}

	/// Overrides the login path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.login = path.into();

		self
	}

	/// Overrides the signup path.
	pub fn signup_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.signup = path.into();

		self
	}

	/// Overrides the team registration path (`auth/register` or `api/auth/register`).
	pub fn register_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.register = path.into();

		self
	}

	/// Validates the base address and endpoint paths.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let Self { mut base_url, endpoints } = self;

		match base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let config = ClientConfig { base_url, endpoints };

		for path in [&config.endpoints.login, &config.endpoints.signup, &config.endpoints.register]
		{
			config.endpoint(path)?;
		}

		Ok(config)
	}
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	let trimmed = raw.trim();

	Url::parse(trimmed)
		.map_err(|source| ConfigError::InvalidBaseUrl { value: trimmed.to_owned(), source })
}
