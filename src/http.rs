//! HTTP transport shared by native callers.
//!
//! [`HttpTransport`] wraps one [`ReqwestClient`] and the optional bearer credential for the
//! configured API origin. The client never follows redirects on its own: the
//! [`NativeCaller`](crate::caller::NativeCaller) handles every hop so the credential guard is
//! evaluated per target. Requests are only signed when the caller asks for it.

// std
use std::time::Duration;
// crates.io
use reqwest::{
	RequestBuilder,
	header::{ACCEPT, AUTHORIZATION, HeaderValue},
	redirect::Policy,
};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Media type GitHub expects for REST calls.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
/// Header pinning the REST API version.
pub const API_VERSION_HEADER: &str = "x-github-api-version";
/// REST API version sent with every request.
pub const API_VERSION: &str = "2022-11-28";
/// User agent sent with every request; GitHub rejects anonymous agents.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around [`ReqwestClient`] holding the credential for the configured origin.
#[derive(Clone)]
pub struct HttpTransport {
	client: ReqwestClient,
	authorization: Option<HeaderValue>,
}
impl HttpTransport {
	/// Builds a transport with redirects disabled, signing with `token` when provided.
	///
	/// An empty token is treated as no token.
	pub fn new(token: Option<&TokenSecret>) -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().redirect(Policy::none()).user_agent(USER_AGENT).build()?;

		Self::with_client(client, token)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Configure any custom client with [`Policy::none`]; a client that follows redirects by
	/// itself bypasses the per-hop credential guard.
	pub fn with_client(
		client: ReqwestClient,
		token: Option<&TokenSecret>,
	) -> Result<Self, ConfigError> {
		let authorization = match token.filter(|token| !token.is_empty()) {
			Some(token) => {
				let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
					.map_err(|_| ConfigError::InvalidToken)?;

				value.set_sensitive(true);

				Some(value)
			},
			None => None,
		};

		Ok(Self { client, authorization })
	}

	/// Returns `true` when a credential is available for signed requests.
	pub fn is_authenticated(&self) -> bool {
		self.authorization.is_some()
	}

	/// Starts a request carrying the GitHub headers, plus the credential when `signed`.
	pub fn request(
		&self,
		method: Method,
		url: Url,
		signed: bool,
		timeout: Option<Duration>,
	) -> RequestBuilder {
		let mut builder = self
			.client
			.request(method, url)
			.header(ACCEPT, GITHUB_MEDIA_TYPE)
			.header(API_VERSION_HEADER, API_VERSION);

		if signed && let Some(value) = &self.authorization {
			builder = builder.header(AUTHORIZATION, value.clone());
		}
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		builder
	}
}
impl AsRef<ReqwestClient> for HttpTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Debug for HttpTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpTransport").field("authenticated", &self.is_authenticated()).finish()
	}
}
