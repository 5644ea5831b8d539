//! Client configuration, defaults, and token resolution.

// self
use crate::{
	_prelude::*,
	auth::{EnvTokenReader, TokenReader, TokenSecret},
	caller::Caller,
	error::ConfigError,
};

/// API host used when none is configured.
pub const DEFAULT_API_HOSTNAME: &str = "api.github.com";
/// Redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Configuration consumed by [`Client`](crate::client::Client).
///
/// Every field has an independent default (see [`Options::new`]); the `with_*` helpers set one
/// field each. `host` accepts either a bare authority (`api.github.com`,
/// `ghe.example.com/api/v3`) or a base URL with an explicit scheme (`http://127.0.0.1:8080`).
#[derive(Clone)]
pub struct Options {
	/// API host or base URL; empty means [`DEFAULT_API_HOSTNAME`].
	pub host: String,
	/// Token used to sign requests to the configured host.
	pub token: Option<TokenSecret>,
	/// Require a token before a client can be constructed.
	pub ensure_token: bool,
	/// Source consulted when a token is required but not set.
	pub token_reader: Option<Arc<dyn TokenReader>>,
	/// Transport override; the native HTTP caller is used when unset.
	pub caller: Option<Arc<dyn Caller>>,
	/// Maximum number of `302 Found` hops the native caller follows.
	pub max_redirects: usize,
}
impl Options {
	/// Returns a fresh default configuration.
	///
	/// Host is [`DEFAULT_API_HOSTNAME`], the token reader reads `GITHUB_TOKEN`, and no token is
	/// required, so the resulting client may issue anonymous calls.
	pub fn new() -> Self {
		Self {
			host: DEFAULT_API_HOSTNAME.to_owned(),
			token: None,
			ensure_token: false,
			token_reader: Some(Arc::new(EnvTokenReader::github())),
			caller: None,
			max_redirects: DEFAULT_MAX_REDIRECTS,
		}
	}

	/// Overrides the API host.
	pub fn with_host(mut self, host: impl Into<String>) -> Self {
		self.host = host.into();

		self
	}

	/// Sets the token explicitly, skipping the reader.
	pub fn with_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Requires a non-empty token at construction time.
	pub fn with_ensure_token(mut self, ensure: bool) -> Self {
		self.ensure_token = ensure;

		self
	}

	/// Replaces the token reader.
	pub fn with_token_reader(mut self, reader: impl 'static + TokenReader) -> Self {
		self.token_reader = Some(Arc::new(reader));

		self
	}

	/// Installs a custom caller, bypassing the native HTTP transport.
	pub fn with_caller(self, caller: impl 'static + Caller) -> Self {
		self.with_shared_caller(Arc::new(caller))
	}

	/// Installs a caller that is already shared with other owners.
	pub fn with_shared_caller(mut self, caller: Arc<dyn Caller>) -> Self {
		self.caller = Some(caller);

		self
	}

	/// Caps redirect hops.
	pub fn with_max_redirects(mut self, limit: usize) -> Self {
		self.max_redirects = limit;

		self
	}

	/// Returns `true` when a non-empty token is set.
	pub fn has_token(&self) -> bool {
		self.token.as_ref().is_some_and(|token| !token.is_empty())
	}

	/// Makes sure a token is available, reading it through the token reader when unset.
	///
	/// The resolved token is memoized in [`Options::token`], so repeated calls never invoke the
	/// reader twice.
	pub fn ensure_token(&mut self) -> Result<(), ConfigError> {
		if self.has_token() {
			return Ok(());
		}

		let reader = self.token_reader.as_ref().ok_or(ConfigError::MissingToken)?;
		let token = reader.read_token()?;

		if token.is_empty() {
			return Err(ConfigError::EmptyToken);
		}

		self.token = Some(TokenSecret::new(token));

		Ok(())
	}

	/// Checks the options, collecting every failure instead of stopping at the first.
	pub fn validate(&mut self) -> Result<(), ConfigError> {
		let mut errors = Vec::new();

		if self.ensure_token
			&& let Err(e) = self.ensure_token()
		{
			errors.push(e);
		}
		if let Err(e) = self.api_base_url() {
			errors.push(e);
		}

		if errors.is_empty() { Ok(()) } else { Err(ConfigError::Validation { errors }) }
	}

	/// Resolves [`Options::host`] into the base URL relative paths are joined onto.
	///
	/// The returned URL always ends with `/`.
	pub fn api_base_url(&self) -> Result<Url, ConfigError> {
		let host = match self.host.trim() {
			"" => DEFAULT_API_HOSTNAME,
			host => host,
		};
		let raw = if host.starts_with("https://") || host.starts_with("http://") {
			host.to_owned()
		} else {
			format!("https://{host}")
		};
		let mut url = Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidHost { host: host.to_owned(), source })?;

		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		url.set_query(None);
		url.set_fragment(None);

		Ok(url)
	}
}
impl Default for Options {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for Options {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Options")
			.field("host", &self.host)
			.field("token", &self.token)
			.field("ensure_token", &self.ensure_token)
			.field("token_reader_set", &self.token_reader.is_some())
			.field("caller_set", &self.caller.is_some())
			.field("max_redirects", &self.max_redirects)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::auth::TokenReaderError;

	fn counting_reader(token: &'static str) -> (Arc<AtomicUsize>, impl 'static + TokenReader) {
		let calls = Arc::new(AtomicUsize::new(0));
		let seen = calls.clone();
		let reader = move || {
			seen.fetch_add(1, Ordering::SeqCst);

			Ok::<_, TokenReaderError>(token.to_owned())
		};

		(calls, reader)
	}

	#[test]
	fn defaults_are_fresh_and_anonymous() {
		let opts = Options::new();

		assert_eq!(opts.host, DEFAULT_API_HOSTNAME);
		assert!(opts.token.is_none());
		assert!(!opts.ensure_token);
		assert!(opts.token_reader.is_some());
		assert!(opts.caller.is_none());
		assert_eq!(opts.max_redirects, DEFAULT_MAX_REDIRECTS);
	}

	#[test]
	fn ensure_token_is_idempotent_with_preset_token() {
		let (calls, reader) = counting_reader("from-reader");
		let mut opts = Options::new().with_token("preset").with_token_reader(reader);

		opts.ensure_token().expect("Preset token should satisfy the first check.");
		opts.ensure_token().expect("Preset token should satisfy the second check.");

		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(opts.token.as_ref().map(TokenSecret::expose), Some("preset"));
	}

	#[test]
	fn ensure_token_memoizes_reader_result() {
		let (calls, reader) = counting_reader("from-reader");
		let mut opts = Options::new().with_token_reader(reader);

		opts.ensure_token().expect("Reader token should be accepted.");
		opts.ensure_token().expect("Memoized token should be accepted.");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(opts.token.as_ref().map(TokenSecret::expose), Some("from-reader"));
	}

	#[test]
	fn ensure_token_requires_reader() {
		let mut opts = Options { token_reader: None, ..Options::new() };
		let err = opts.ensure_token().expect_err("Missing reader should fail.");

		assert!(matches!(err, ConfigError::MissingToken));
	}

	#[test]
	fn ensure_token_surfaces_reader_failure() {
		let mut opts = Options::new()
			.with_token_reader(|| Err::<String, _>(TokenReaderError::MissingVarName));
		let err = opts.ensure_token().expect_err("Failing reader should fail.");

		assert!(matches!(err, ConfigError::TokenRead(TokenReaderError::MissingVarName)));
	}

	#[test]
	fn ensure_token_rejects_empty_token() {
		let (_, reader) = counting_reader("");
		let mut opts = Options::new().with_token("").with_token_reader(reader);
		let err = opts.ensure_token().expect_err("Empty token should fail.");

		assert!(matches!(err, ConfigError::EmptyToken));
		assert!(!opts.has_token());
	}

	#[test]
	fn validate_skips_token_unless_required() {
		let mut opts = Options { token_reader: None, ..Options::new() };

		opts.validate().expect("Anonymous options should validate.");
	}

	#[test]
	fn validate_collects_every_failure() {
		let mut opts = Options { token_reader: None, ..Options::new() }
			.with_ensure_token(true)
			.with_host("https://");
		let err = opts.validate().expect_err("Both checks should fail.");

		match err {
			ConfigError::Validation { errors } => {
				assert_eq!(errors.len(), 2);
				assert!(matches!(errors[0], ConfigError::MissingToken));
				assert!(matches!(errors[1], ConfigError::InvalidHost { .. }));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn base_url_handles_hosts_and_urls() {
		let base = |host: &str| {
			Options::new()
				.with_host(host)
				.api_base_url()
				.expect("Host should resolve to a base URL.")
				.to_string()
		};

		assert_eq!(base(""), "https://api.github.com/");
		assert_eq!(base("api.github.com"), "https://api.github.com/");
		assert_eq!(base("ghe.example.com/api/v3"), "https://ghe.example.com/api/v3/");
		assert_eq!(base("http://127.0.0.1:8080"), "http://127.0.0.1:8080/");
	}

	#[test]
	fn debug_redacts_token() {
		let rendered = format!("{:?}", Options::new().with_token("ghp_secret"));

		assert!(!rendered.contains("ghp_secret"));
		assert!(rendered.contains("<redacted>"));
	}
}
