//! File-backed [`Caller`] used as a test double.

// std
use std::path::PathBuf;
// crates.io
use tokio::fs::File;
// self
use crate::{
	_prelude::*,
	caller::{CallFuture, Caller, Response},
	context::Context,
	error::TransportError,
};

/// Answers every request with the contents of [`source_path`](Self::source_path) as a synthetic
/// `200 OK`, or with [`error`](Self::error) when one is set. Method, path and body are ignored.
#[derive(Clone, Debug, Default)]
pub struct FileCaller {
	/// File streamed back as the response body.
	pub source_path: PathBuf,
	/// Synthetic failure returned instead of a response.
	pub error: Option<Arc<dyn StdError + Send + Sync>>,
}
impl FileCaller {
	/// Serves `source_path` for every request.
	pub fn new(source_path: impl Into<PathBuf>) -> Self {
		Self { source_path: source_path.into(), error: None }
	}

	/// Fails every request with `error`.
	pub fn failing(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
		Self::default().with_error(Arc::from(error.into()))
	}

	/// Sets the synthetic failure, keeping the source path.
	pub fn with_error(mut self, error: Arc<dyn StdError + Send + Sync>) -> Self {
		self.error = Some(error);

		self
	}
}
impl Caller for FileCaller {
	fn request_with_context<'a>(
		&'a self,
		ctx: &'a Context,
		_method: Method,
		_path: &'a str,
		_body: Option<Bytes>,
	) -> CallFuture<'a> {
		Box::pin(async move {
			if let Some(error) = &self.error {
				return Err(Error::Caller(error.clone()));
			}

			let file = ctx
				.run(async {
					File::open(&self.source_path)
						.await
						.map_err(|e| Error::from(TransportError::Io(e)))
				})
				.await?;

			Ok(Response::from_file(StatusCode::OK, file))
		})
	}
}
