//! Crate-level error types shared by options, callers, and the client façade.

// self
use crate::{_prelude::*, auth::TokenReaderError, caller::Response};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Variants mirror the failure classes callers usually branch on: local configuration,
/// transport, HTTP protocol, and request construction. Nothing is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Server answered with an unusable response.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Request could not be constructed.
	#[error(transparent)]
	Request(#[from] RequestError),
	/// Failure reported by a custom [`Caller`](crate::caller::Caller) implementation.
	///
	/// The error is shared rather than copied so callers can check identity with
	/// [`Arc::ptr_eq`].
	#[error(transparent)]
	Caller(Arc<dyn StdError + Send + Sync>),

	/// The context was cancelled before the request completed.
	#[error("Request was cancelled.")]
	Cancelled,
	/// The context deadline elapsed before the request completed.
	#[error("Request deadline exceeded.")]
	DeadlineExceeded,
}
impl Error {
	/// Wraps an arbitrary error raised by a custom caller.
	pub fn caller(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Caller(Arc::new(src))
	}

	/// Returns the response that accompanied a protocol failure, if any.
	pub fn response(&self) -> Option<&Response> {
		match self {
			Self::Protocol(e) => e.response(),
			_ => None,
		}
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::DeadlineExceeded
		} else if e.is_builder() {
			RequestError::build(e).into()
		} else {
			TransportError::network(e).into()
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No token was set and no reader is available to obtain one.
	#[error("No token set and no token reader configured.")]
	MissingToken,
	/// The configured token reader failed.
	#[error("Failed to read token.")]
	TokenRead(#[from] TokenReaderError),
	/// The token reader succeeded but produced nothing.
	#[error("Unable to get a token from the token reader.")]
	EmptyToken,
	/// The token cannot be carried in an HTTP header.
	#[error("Token contains characters that are not valid in an HTTP header.")]
	InvalidToken,
	/// The API host cannot be turned into a base URL.
	#[error("API host `{host}` is invalid.")]
	InvalidHost {
		/// Host string as configured.
		host: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Server answered `302 Found` without telling us where to go.
	#[error("Got a 302 redirect but no location URL.")]
	MissingRedirectLocation,
	/// One or more option checks failed.
	#[error("Invalid options: {}", join_messages(.errors))]
	Validation {
		/// Every failure collected during validation, in check order.
		errors: Vec<ConfigError>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Failures derived from what the server sent back.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Status outside 200..=399 with a decodable GitHub error body.
	#[error("HTTP error {status} sending request: {message}")]
	Api {
		/// HTTP status code.
		status: u16,
		/// `message` field of the error body.
		message: String,
		/// `documentation_url` field of the error body, when present.
		documentation_url: Option<String>,
		/// Response with its body buffered.
		response: Box<Response>,
	},
	/// Status outside 200..=399 without a decodable error body.
	#[error("HTTP error {status} sending request.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response with whatever body could be buffered.
		response: Box<Response>,
	},
	/// Redirect chain exceeded the configured hop limit.
	#[error("Stopped after {limit} redirects.")]
	TooManyRedirects {
		/// Configured hop limit.
		limit: usize,
	},
	/// Response body could not be decoded as the requested JSON type.
	#[error("Response body is not valid JSON for the requested type.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ProtocolError {
	/// HTTP status code for status-derived failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Borrows the response that accompanied the failure.
	pub fn response(&self) -> Option<&Response> {
		match self {
			Self::Api { response, .. } | Self::Status { response, .. } => Some(response),
			_ => None,
		}
	}

	/// Takes ownership of the response that accompanied the failure.
	pub fn into_response(self) -> Option<Response> {
		match self {
			Self::Api { response, .. } | Self::Status { response, .. } => Some(*response),
			_ => None,
		}
	}
}

/// Request construction failures.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Target URL cannot be parsed or joined onto the base URL.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL or path.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect `Location` header is not valid UTF-8.
	#[error("Redirect location `{location}` is not valid UTF-8.")]
	InvalidLocation {
		/// Header value with invalid sequences replaced.
		location: String,
		/// Underlying decoding failure.
		#[source]
		source: std::str::Utf8Error,
	},
	/// HTTP client rejected the request while building it.
	#[error("Request could not be built.")]
	Build {
		/// Transport-specific builder failure.
		#[source]
		source: BoxError,
	},
}
impl RequestError {
	/// Wraps a transport-specific builder failure.
	pub fn build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Build { source: Box::new(src) }
	}
}

fn join_messages(errors: &[ConfigError]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
