//! Session records and the storage contract that keeps them between requests.
//!
//! A [`Session`] is written by the login screen, read by the HTTP client's bearer interceptor on
//! every outgoing request, and removed by logout. The token is opaque: nothing here inspects or
//! verifies it.

pub mod file;
pub mod memory;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStorage`] operations.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + 'a + Send>>;

/// Key/value storage backend holding session entries.
///
/// Writes are last-write-wins; there is no compare-and-swap because the only writers are the
/// login success path and logout.
pub trait SessionStorage
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: StorageKey) -> StorageFuture<'_, Option<String>>;

	/// Stores or replaces the value under `key`.
	fn set(&self, key: StorageKey, value: String) -> StorageFuture<'_, ()>;

	/// Removes the value under `key`, returning whether one existed.
	fn remove(&self, key: StorageKey) -> StorageFuture<'_, bool>;
}

/// Fixed keys under which session entries are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKey {
	/// Opaque bearer token.
	#[serde(rename = "authToken")]
	AuthToken,
	/// JSON-serialized [`UserProfile`].
	#[serde(rename = "userInfo")]
	UserInfo,
}
impl StorageKey {
	/// Returns the stable key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AuthToken => "authToken",
			Self::UserInfo => "userInfo",
		}
	}
}
impl Display for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStorage`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StorageError {
	/// Stored or incoming data could not be (de)serialized.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Redacted token wrapper keeping the bearer credential out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Profile returned by the backend at login.
///
/// Fields the client does not model are kept in [`UserProfile::extra`] so the stored JSON matches
/// what the backend sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Backend identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<JsonValue>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Login email.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Remaining backend-provided fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

/// Client-held authentication record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
	/// Bearer token issued by the backend.
	pub token: TokenSecret,
	/// Profile of the logged-in user.
	pub user: UserProfile,
}
impl Session {
	/// Creates a session from a token and profile.
	pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
		Self { token: TokenSecret::new(token), user }
	}

	/// Writes the serialized profile, then the token, under their fixed keys.
	///
	/// The token goes last so its presence implies a complete session. If either write fails,
	/// both entries are removed before the error is returned.
	pub async fn persist(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
		let user = serde_json::to_string(&self.user).map_err(|e| StorageError::Serialization {
			message: format!("Failed to serialize user profile: {e}"),
		})?;
		let mut written = storage.set(StorageKey::UserInfo, user).await;

		if written.is_ok() {
			written = storage.set(StorageKey::AuthToken, self.token.expose().to_owned()).await;
		}

		if let Err(e) = written {
			if let Err(_cleanup) = Self::clear(storage).await {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_cleanup, "failed to discard partially written session");
			}

			return Err(e);
		}

		Ok(())
	}

	/// Loads the stored session; `None` when no token is present.
	///
	/// A token without a profile yields an empty [`UserProfile`].
	pub async fn load(storage: &dyn SessionStorage) -> Result<Option<Self>, StorageError> {
		let Some(token) = storage.get(StorageKey::AuthToken).await? else {
			return Ok(None);
		};
		let user = match storage.get(StorageKey::UserInfo).await? {
			Some(raw) =>
				serde_json::from_str(&raw).map_err(|e| StorageError::Serialization {
					message: format!("Failed to parse stored user profile: {e}"),
				})?,
			None => UserProfile::default(),
		};

		Ok(Some(Self::new(token, user)))
	}

	/// Removes both session entries.
	pub async fn clear(storage: &dyn SessionStorage) -> Result<(), StorageError> {
		storage.remove(StorageKey::AuthToken).await?;
		storage.remove(StorageKey::UserInfo).await?;

		Ok(())
	}

	/// Reads only the token; used on the request path.
	pub async fn token(storage: &dyn SessionStorage) -> Result<Option<TokenSecret>, StorageError> {
		Ok(storage.get(StorageKey::AuthToken).await?.map(TokenSecret::new))
	}
}
