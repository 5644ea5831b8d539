//! Client façade composing [`Options`] with a [`Caller`].

// self
use crate::{
	_prelude::*,
	auth::{self, OAUTH_SCOPES_HEADER},
	caller::{Caller, NativeCaller, Response},
	context::Context,
	options::Options,
};

/// GitHub REST client.
///
/// Construction validates the options and installs the native caller unless a custom one was
/// supplied. After that the client is stateless: every call is independent, and clones share the
/// same caller.
#[derive(Clone)]
pub struct Client {
	options: Options,
	caller: Arc<dyn Caller>,
}
impl Client {
	/// Creates a client from the default options.
	pub fn new() -> Result<Self> {
		Self::with_options(Options::new())
	}

	/// Creates a client from a full option set.
	///
	/// Fails when the options do not validate (for example a required token cannot be read) or
	/// the native transport cannot be built.
	pub fn with_options(mut options: Options) -> Result<Self> {
		options.validate()?;

		let caller = match &options.caller {
			Some(caller) => caller.clone(),
			None => {
				let caller: Arc<dyn Caller> = Arc::new(NativeCaller::new(&options)?);

				options.caller = Some(caller.clone());

				caller
			},
		};

		Ok(Self { options, caller })
	}

	/// Options the client was built with, including any token resolved during validation.
	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Issues one request through the configured caller and returns its result unchanged.
	pub async fn call(
		&self,
		ctx: &Context,
		method: Method,
		path: &str,
		body: Option<Bytes>,
	) -> Result<Response> {
		self.caller.request_with_context(ctx, method, path, body).await
	}

	/// Scopes granted to the token, as reported by the API root's `X-OAuth-Scopes` header.
	///
	/// Returns an empty list when the header is absent, e.g. for anonymous calls or fine-grained
	/// tokens.
	pub async fn token_scopes(&self) -> Result<Vec<String>> {
		let response = self.call(&Context::background(), Method::GET, "/", None).await?;
		let scopes = auth::parse_scopes(response.header(OAUTH_SCOPES_HEADER));

		drop(response);

		Ok(scopes)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("options", &self.options).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::{HeaderName, HeaderValue};
	// self
	use super::*;
	use crate::{auth::TokenReaderError, caller::CallFuture, error::ConfigError};

	struct ScopedCaller(Option<&'static str>);
	impl Caller for ScopedCaller {
		fn request_with_context<'a>(
			&'a self,
			_ctx: &'a Context,
			method: Method,
			path: &'a str,
			_body: Option<Bytes>,
		) -> CallFuture<'a> {
			Box::pin(async move {
				assert_eq!(method, Method::GET);
				assert_eq!(path, "/");

				let mut response = Response::new(StatusCode::OK);

				if let Some(scopes) = self.0 {
					response = response.with_header(
						HeaderName::from_static(OAUTH_SCOPES_HEADER),
						HeaderValue::from_static(scopes),
					);
				}

				Ok(response)
			})
		}
	}

	#[tokio::test]
	async fn token_scopes_reads_header() {
		let client = Client::with_options(
			Options::new().with_caller(ScopedCaller(Some("repo, read:org"))),
		)
		.expect("Client with custom caller should build.");
		let scopes = client.token_scopes().await.expect("Scopes should be readable.");

		assert_eq!(scopes, ["repo", "read:org"]);
	}

	#[tokio::test]
	async fn token_scopes_defaults_to_empty() {
		let client = Client::with_options(Options::new().with_caller(ScopedCaller(None)))
			.expect("Client with custom caller should build.");
		let scopes = client.token_scopes().await.expect("Missing header is not an error.");

		assert!(scopes.is_empty());
	}

	#[test]
	fn construction_requires_token_when_asked() {
		let options = Options { token_reader: None, ..Options::new() }.with_ensure_token(true);
		let err = Client::with_options(options).expect_err("Missing token should fail.");

		assert!(matches!(err, Error::Config(ConfigError::Validation { .. })));
	}

	#[test]
	fn construction_memoizes_token_and_installs_native_caller() {
		let client = Client::with_options(
			Options::new()
				.with_ensure_token(true)
				.with_token_reader(|| Ok::<_, TokenReaderError>("from-reader".to_owned())),
		)
		.expect("Reader token should satisfy validation.");

		assert!(client.options().has_token());
		assert!(client.options().caller.is_some());
	}
}
