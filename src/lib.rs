//! Headless login, signup, and team-registration flows over a JSON backend.
//!
//! Screens keep typed form state, validate before sending, and share one bearer-token session.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

#[cfg(test)] use team_portal as _;

pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod obs;
pub mod screen;
pub mod screens;
pub mod session;
pub mod shell;
pub mod validate;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ClientConfig,
		http::ApiClient,
		session::{MemorySessionStorage, SessionStorage},
	};

	/// Builds a [`ClientConfig`] rooted at the provided mock server base URL.
	pub fn test_config(base_url: &str) -> ClientConfig {
		let base_url = Url::parse(base_url).expect("Failed to parse mock backend base URL.");

		ClientConfig::builder(base_url).build().expect("Mock backend config should be valid.")
	}

	/// Constructs an [`ApiClient`] backed by a fresh session-scoped storage, returning both so
	/// tests can inspect what the flows persisted.
	pub fn build_test_client(base_url: &str) -> (ApiClient, Arc<MemorySessionStorage>) {
		let storage_backend = Arc::new(MemorySessionStorage::default());
		let storage: Arc<dyn SessionStorage> = storage_backend.clone();
		let client = ApiClient::new(test_config(base_url), storage)
			.expect("Failed to build reqwest client for tests.");

		(client, storage_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
