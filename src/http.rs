//! JSON client for the backend, with an interceptor chain in front of every request.
//!
//! [`ApiClient`] carries the fixed base address from [`ClientConfig`] and always installs a
//! [`BearerInterceptor`] over the injected [`SessionStorage`], so any stored token is attached as
//! `Authorization: Bearer <token>` without callers passing it around. The client is a pure
//! pass-through: no retries, no backoff, no timeouts.

// crates.io
use reqwest::{
	Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, TransportError},
	session::{Session, SessionStorage},
};

/// Boxed future returned by [`RequestInterceptor::intercept`].
pub type InterceptFuture<'a> = Pin<Box<dyn Future<Output = Result<Request>> + 'a + Send>>;

/// Step that may rewrite an outgoing request before it is sent.
///
/// Returning an error rejects the request; nothing reaches the network.
pub trait RequestInterceptor
where
	Self: Send + Sync,
{
	/// Consumes the request and returns the (possibly modified) request to send.
	fn intercept(&self, request: Request) -> InterceptFuture<'_>;
}

/// Attaches the stored session token as a bearer credential.
#[derive(Clone)]
pub struct BearerInterceptor {
	storage: Arc<dyn SessionStorage>,
}
impl BearerInterceptor {
	/// Creates an interceptor reading tokens from `storage`.
	pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
		Self { storage }
	}
}
impl RequestInterceptor for BearerInterceptor {
	fn intercept(&self, mut request: Request) -> InterceptFuture<'_> {
		Box::pin(async move {
			if let Some(token) = Session::token(self.storage.as_ref()).await? {
				let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
					.map_err(ConfigError::from)?;

				value.set_sensitive(true);
				request.headers_mut().insert(AUTHORIZATION, value);
			}

			Ok(request)
		})
	}
}
impl Debug for BearerInterceptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerInterceptor(..)")
	}
}

/// Successful backend response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
	/// HTTP status code (2xx).
	pub status: u16,
	/// Parsed body; `Null` when empty, a JSON string when the body was not JSON.
	pub body: JsonValue,
}
impl ApiResponse {
	/// Decodes the body into `T`, reporting the failing JSON path on mismatch.
	pub fn decode<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.body).map_err(|source| Error::Decode { source })
	}
}

/// Pre-configured request-issuing client shared by every screen.
#[derive(Clone)]
pub struct ApiClient {
	config: Arc<ClientConfig>,
	http: ReqwestClient,
	storage: Arc<dyn SessionStorage>,
	interceptors: Vec<Arc<dyn RequestInterceptor>>,
}
impl ApiClient {
	/// Builds a client with its own reqwest transport.
	pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self> {
		let mut headers = HeaderMap::new();

		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		let http = ReqwestClient::builder()
			.default_headers(headers)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(config, storage, http))
	}

	/// Wraps a caller-provided reqwest client.
	///
	/// The caller is responsible for any default headers; JSON requests still set
	/// `Content-Type` explicitly.
	pub fn with_client(
		config: ClientConfig,
		storage: Arc<dyn SessionStorage>,
		http: ReqwestClient,
	) -> Self {
		let bearer: Arc<dyn RequestInterceptor> =
			Arc::new(BearerInterceptor::new(storage.clone()));

		Self { config: Arc::new(config), http, storage, interceptors: vec![bearer] }
	}

	/// Appends an interceptor that runs after the bearer step.
	pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
		self.interceptors.push(interceptor);

		self
	}

	/// Read-only configuration this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Session storage shared with the bearer interceptor.
	pub fn storage(&self) -> &Arc<dyn SessionStorage> {
		&self.storage
	}

	/// Sends `body` as JSON with `POST` to `path` (relative to the base address).
	pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		let payload = serde_json::to_vec(body).map_err(ConfigError::from)?;
		let request = self.request(Method::POST, path, Some(payload))?;

		self.execute(request).await
	}

	/// Issues a `GET` to `path` (relative to the base address).
	pub async fn get_json(&self, path: &str) -> Result<ApiResponse> {
		let request = self.request(Method::GET, path, None)?;

		self.execute(request).await
	}

	fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Request> {
		let url = self.config.endpoint(path)?;
		let mut builder = self.http.request(method, url);

		if let Some(payload) = body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
		}

		builder.build().map_err(|e| TransportError::from(e).into())
	}

	/// Runs the interceptor chain, sends the request, and classifies the response.
	pub async fn execute(&self, mut request: Request) -> Result<ApiResponse> {
		for interceptor in &self.interceptors {
			request = interceptor.intercept(request).await?;
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

		let response = self.http.execute(request).await.map_err(TransportError::from)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?;
		let body = parse_body(&bytes);

		#[cfg(feature = "tracing")]
		tracing::debug!(status = status.as_u16(), "received response");

		if status.is_success() {
			Ok(ApiResponse { status: status.as_u16(), body: body.unwrap_or(JsonValue::Null) })
		} else {
			Err(Error::Rejected { status: status.as_u16(), body: body.filter(JsonValue::is_object) })
		}
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("interceptors", &self.interceptors.len())
			.finish()
	}
}

fn parse_body(bytes: &[u8]) -> Option<JsonValue> {
	if bytes.is_empty() {
		return None;
	}

	match serde_json::from_slice(bytes) {
		Ok(value) => Some(value),
		Err(_) => Some(JsonValue::String(String::from_utf8_lossy(bytes).into_owned())),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::session::{
		MemorySessionStorage, StorageError, StorageFuture, StorageKey, UserProfile,
	};

	struct BrokenStorage;
	impl SessionStorage for BrokenStorage {
		fn get(&self, _key: StorageKey) -> StorageFuture<'_, Option<String>> {
			Box::pin(async { Err(StorageError::Backend { message: "storage offline".into() }) })
		}

		fn set(&self, _key: StorageKey, _value: String) -> StorageFuture<'_, ()> {
			Box::pin(async { Ok(()) })
		}

		fn remove(&self, _key: StorageKey) -> StorageFuture<'_, bool> {
			Box::pin(async { Ok(false) })
		}
	}

	fn request() -> Request {
		let url = Url::parse("https://backend.example.com/users/me")
			.expect("Failed to parse interceptor fixture URL.");

		Request::new(Method::GET, url)
	}

	#[tokio::test]
	async fn bearer_interceptor_attaches_stored_token() {
		let storage = Arc::new(MemorySessionStorage::default());

		Session::new("abc123", UserProfile::default())
			.persist(storage.as_ref())
			.await
			.expect("Persisting the session should succeed.");

		let interceptor = BearerInterceptor::new(storage);
		let request =
			interceptor.intercept(request()).await.expect("Interception should succeed.");
		let header = request
			.headers()
			.get(AUTHORIZATION)
			.expect("Authorization header should be attached when a token is stored.");

		assert_eq!(header.to_str().expect("Header should be ASCII."), "Bearer abc123");
		assert!(header.is_sensitive());
	}

	#[tokio::test]
	async fn bearer_interceptor_passes_through_without_token() {
		let interceptor = BearerInterceptor::new(Arc::new(MemorySessionStorage::default()));
		let request =
			interceptor.intercept(request()).await.expect("Interception should succeed.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
	}

	#[tokio::test]
	async fn storage_failures_reject_the_request() {
		let interceptor = BearerInterceptor::new(Arc::new(BrokenStorage));
		let err = interceptor
			.intercept(request())
			.await
			.expect_err("A failing storage read must reject the request.");

		assert!(matches!(err, Error::Storage(StorageError::Backend { .. })));
	}

	#[test]
	fn body_parsing_tolerates_non_json() {
		assert_eq!(parse_body(b""), None);
		assert_eq!(parse_body(b"{\"ok\":true}"), Some(serde_json::json!({ "ok": true })));
		assert_eq!(parse_body(b"Bad Gateway"), Some(JsonValue::from("Bad Gateway")));
	}

	#[test]
	fn decode_reports_the_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Login {
			#[allow(dead_code)]
			token: String,
		}

		let response =
			ApiResponse { status: 200, body: serde_json::json!({ "token": 42 }) };
		let err = response.decode::<Login>().expect_err("Numeric token must not decode.");

		match err {
			Error::Decode { source } => assert_eq!(source.path().to_string(), "token"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
