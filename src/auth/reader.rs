//! Token reader contracts plus the environment-variable reader used by default.

// std
use std::env::{self, VarError};
// self
use crate::_prelude::*;

/// Environment variable consulted by [`EnvTokenReader::github`].
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised while reading a token.
#[derive(Debug, ThisError)]
pub enum TokenReaderError {
	/// Reader was configured without a variable name.
	#[error("Environment variable name to read token not set.")]
	MissingVarName,
	/// Variable exists but does not hold valid unicode.
	#[error("Environment variable `{var_name}` does not contain valid unicode.")]
	NotUnicode {
		/// Variable that was read.
		var_name: String,
	},
	/// Custom reader backend failure.
	#[error("Token reader backend failed.")]
	Backend {
		/// Reader-specific failure.
		#[source]
		source: BoxError,
	},
}
impl TokenReaderError {
	/// Wraps a reader-specific failure.
	pub fn backend(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Backend { source: Box::new(src) }
	}
}

/// Mechanism that obtains an API token from somewhere outside the process configuration.
///
/// Readers return the raw string; an empty string means "nothing found" and is rejected by
/// [`Options::ensure_token`](crate::options::Options::ensure_token), not by the reader.
pub trait TokenReader
where
	Self: Send + Sync,
{
	/// Reads the token.
	fn read_token(&self) -> Result<String, TokenReaderError>;
}
impl<F> TokenReader for F
where
	F: Send + Sync + Fn() -> Result<String, TokenReaderError>,
{
	fn read_token(&self) -> Result<String, TokenReaderError> {
		self()
	}
}

/// Reads the token from an environment variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvTokenReader {
	/// Name of the variable holding the token.
	pub var_name: String,
}
impl EnvTokenReader {
	/// Creates a reader bound to `var_name`.
	pub fn new(var_name: impl Into<String>) -> Self {
		Self { var_name: var_name.into() }
	}

	/// Reader bound to [`GITHUB_TOKEN_VAR`].
	pub fn github() -> Self {
		Self::new(GITHUB_TOKEN_VAR)
	}
}
impl Default for EnvTokenReader {
	fn default() -> Self {
		Self::github()
	}
}
impl TokenReader for EnvTokenReader {
	fn read_token(&self) -> Result<String, TokenReaderError> {
		if self.var_name.is_empty() {
			return Err(TokenReaderError::MissingVarName);
		}

		match env::var(&self.var_name) {
			Ok(value) => Ok(value),
			Err(VarError::NotPresent) => Ok(String::new()),
			Err(VarError::NotUnicode(_)) =>
				Err(TokenReaderError::NotUnicode { var_name: self.var_name.clone() }),
		}
	}
}
