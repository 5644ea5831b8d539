//! Transport contract plus the response type every caller produces.

pub mod file;
pub mod native;

pub use file::FileCaller;
pub use native::NativeCaller;

// std
use std::mem;
// crates.io
use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::{fs::File, io::AsyncReadExt};
// self
use crate::{
	_prelude::*,
	context::Context,
	error::{ProtocolError, TransportError},
};

const FILE_CHUNK_SIZE: usize = 8 * 1024;

/// Boxed future returned by [`Caller::request_with_context`].
pub type CallFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + 'a + Send>>;

/// Capability that sends one HTTP request and yields one response.
///
/// `path` is either an absolute `http(s)://` URL or a path relative to the configured API host.
/// Implementations must not retry; cancellation and deadlines come from `ctx`. Bodies are passed
/// as [`Bytes`] so they can be replayed if a transport has to repeat the request.
pub trait Caller
where
	Self: Send + Sync,
{
	/// Issues the request.
	fn request_with_context<'a>(
		&'a self,
		ctx: &'a Context,
		method: Method,
		path: &'a str,
		body: Option<Bytes>,
	) -> CallFuture<'a>;
}

/// Response returned by a [`Caller`].
///
/// The body is a stream; read it with [`chunk`](Self::chunk) or collect it with
/// [`bytes`](Self::bytes), [`text`](Self::text) or [`json`](Self::json). Dropping the response
/// releases the underlying connection or file.
pub struct Response {
	status: StatusCode,
	headers: HeaderMap,
	url: Option<Url>,
	body: Body,
}
impl Response {
	/// Creates an empty-bodied response, mainly for custom callers and test doubles.
	pub fn new(status: StatusCode) -> Self {
		Self { status, headers: HeaderMap::new(), url: None, body: Body::Empty }
	}

	/// Adds a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.append(name, value);

		self
	}

	/// Replaces the body with in-memory bytes.
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Body::Buffered(body.into());

		self
	}

	pub(crate) fn from_native(response: reqwest::Response) -> Self {
		Self {
			status: response.status(),
			headers: response.headers().clone(),
			url: Some(response.url().clone()),
			body: Body::Native(response),
		}
	}

	pub(crate) fn from_file(status: StatusCode, file: File) -> Self {
		Self { status, headers: HeaderMap::new(), url: None, body: Body::File(file) }
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Mutable response headers.
	pub fn headers_mut(&mut self) -> &mut HeaderMap {
		&mut self.headers
	}

	/// First value of `name`, if present and valid visible ASCII.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Final URL the response came from, for transports that know it.
	pub fn url(&self) -> Option<&Url> {
		self.url.as_ref()
	}

	/// Reads the next body chunk; `None` once the body is exhausted.
	pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
		if matches!(self.body, Body::Buffered(_)) {
			return match mem::replace(&mut self.body, Body::Empty) {
				Body::Buffered(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
				_ => Ok(None),
			};
		}

		match &mut self.body {
			Body::Empty | Body::Buffered(_) => Ok(None),
			Body::Native(response) => Ok(response.chunk().await?),
			Body::File(file) => {
				let mut buf = vec![0; FILE_CHUNK_SIZE];
				let read = file.read(&mut buf).await.map_err(TransportError::Io)?;

				if read == 0 {
					return Ok(None);
				}

				buf.truncate(read);

				Ok(Some(Bytes::from(buf)))
			},
		}
	}

	/// Collects the remaining body.
	pub async fn bytes(mut self) -> Result<Bytes> {
		mem::replace(&mut self.body, Body::Empty).collect().await
	}

	/// Collects the remaining body as text, replacing invalid UTF-8 sequences.
	pub async fn text(self) -> Result<String> {
		let bytes = self.bytes().await?;

		Ok(String::from_utf8_lossy(&bytes).into_owned())
	}

	/// Collects the remaining body and decodes it as JSON.
	pub async fn json<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let bytes = self.bytes().await?;
		let mut de = serde_json::Deserializer::from_slice(&bytes);

		Ok(serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProtocolError::Decode { source })?)
	}

	/// Reads the whole body into memory, keeping a copy so it can still be read afterwards.
	pub(crate) async fn buffer(&mut self) -> Result<Bytes> {
		let bytes = mem::replace(&mut self.body, Body::Empty).collect().await?;

		self.body = Body::Buffered(bytes.clone());

		Ok(bytes)
	}
}
impl Debug for Response {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Response")
			.field("status", &self.status)
			.field("headers", &self.headers)
			.field("url", &self.url)
			.field("body", &self.body.kind())
			.finish()
	}
}

enum Body {
	Empty,
	Buffered(Bytes),
	Native(reqwest::Response),
	File(File),
}
impl Body {
	fn kind(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Buffered(_) => "buffered",
			Self::Native(_) => "stream",
			Self::File(_) => "file",
		}
	}

	async fn collect(self) -> Result<Bytes> {
		match self {
			Self::Empty => Ok(Bytes::new()),
			Self::Buffered(bytes) => Ok(bytes),
			Self::Native(response) => Ok(response.bytes().await?),
			Self::File(mut file) => {
				let mut buf = Vec::new();

				file.read_to_end(&mut buf).await.map_err(TransportError::Io)?;

				Ok(Bytes::from(buf))
			},
		}
	}
}
