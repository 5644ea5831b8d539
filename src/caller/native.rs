//! Production caller backed by reqwest.

// std
use std::str;
// crates.io
use reqwest::header::LOCATION;
// self
use crate::{
	_prelude::*,
	caller::{CallFuture, Caller, Response},
	context::Context,
	error::{ConfigError, ProtocolError, RequestError},
	http::HttpTransport,
	obs::{self, CallOutcome, CallSpan, CallTarget},
	options::Options,
};

/// Error payload GitHub sends with non-success statuses.
///
/// Only `message` and `documentation_url` are read. The payload's own `status` field is
/// ignored in favor of the HTTP status line, so bodies carrying it as a string or a number both
/// decode.
#[derive(Debug, Deserialize)]
struct ErrorBody {
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	documentation_url: Option<String>,
}

/// Calls the GitHub REST API over HTTP.
///
/// Requests to the configured origin are signed with the configured token; requests to any
/// other origin (typically a redirect target such as an asset download host) are sent
/// anonymously. `302 Found` responses are followed here, with the same method and body, up to
/// the configured hop limit.
#[derive(Clone, Debug)]
pub struct NativeCaller {
	transport: HttpTransport,
	base_url: Url,
	max_redirects: usize,
}
impl NativeCaller {
	/// Builds a caller for the host, token and redirect limit in `options`.
	pub fn new(options: &Options) -> Result<Self, ConfigError> {
		let transport = HttpTransport::new(options.token.as_ref())?;

		Self::with_transport(options, transport)
	}

	/// Builds a caller around an existing transport; the token in `options` is ignored.
	pub fn with_transport(
		options: &Options,
		transport: HttpTransport,
	) -> Result<Self, ConfigError> {
		let base_url = options.api_base_url()?;

		Ok(Self { transport, base_url, max_redirects: options.max_redirects })
	}

	/// Base URL relative paths are joined onto.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Host name of the configured API origin.
	pub fn hostname(&self) -> &str {
		self.base_url.host_str().unwrap_or_default()
	}

	/// Resolves `path` into a target URL and tells whether it belongs to the configured origin.
	pub fn resolve(&self, path: &str) -> Result<(Url, CallTarget), RequestError> {
		let url = if path.starts_with("https://") || path.starts_with("http://") {
			Url::parse(path)
		} else {
			self.base_url.join(path.trim_start_matches('/'))
		}
		.map_err(|source| RequestError::InvalidUrl { url: path.to_owned(), source })?;
		let target = self.target_of(&url);

		Ok((url, target))
	}

	fn target_of(&self, url: &Url) -> CallTarget {
		if url.origin() == self.base_url.origin() { CallTarget::Origin } else { CallTarget::Foreign }
	}

	async fn dispatch(
		&self,
		ctx: &Context,
		method: Method,
		path: &str,
		body: Option<Bytes>,
	) -> Result<Response> {
		let (mut url, mut target) = self.resolve(path)?;
		let mut hops = 0;

		loop {
			obs::record_call_outcome(target, CallOutcome::Attempt);

			let response = self
				.send(ctx, &method, &url, target, body.clone())
				.await
				.map_err(|e| failed(target, e))?;
			let status = response.status();

			if !(200..=399).contains(&status.as_u16()) {
				obs::trace_status_error(status, target);

				return Err(failed(target, classify(ctx, response).await));
			}
			if status != StatusCode::FOUND {
				obs::record_call_outcome(target, CallOutcome::Success);

				return Ok(response);
			}

			let location = match redirect_location(&response) {
				Ok(Some(location)) => location,
				Ok(None) =>
					return Err(failed(target, ConfigError::MissingRedirectLocation.into())),
				Err(e) => return Err(failed(target, e.into())),
			};

			if hops >= self.max_redirects {
				return Err(failed(
					target,
					ProtocolError::TooManyRedirects { limit: self.max_redirects }.into(),
				));
			}

			let next = url
				.join(&location)
				.map_err(|source| RequestError::InvalidUrl { url: location, source })
				.map_err(|e| failed(target, e.into()))?;

			obs::record_call_outcome(target, CallOutcome::Redirect);

			hops += 1;
			target = self.target_of(&next);
			url = next;

			obs::trace_redirect(&url, target, hops);
		}
	}

	async fn send(
		&self,
		ctx: &Context,
		method: &Method,
		url: &Url,
		target: CallTarget,
		body: Option<Bytes>,
	) -> Result<Response> {
		ctx.check()?;

		let signed = target == CallTarget::Origin;
		let mut request =
			self.transport.request(method.clone(), url.clone(), signed, ctx.remaining());

		if let Some(body) = body {
			request = request.body(body);
		}

		let response = ctx.run(async { request.send().await.map_err(Error::from) }).await?;

		Ok(Response::from_native(response))
	}
}
impl Caller for NativeCaller {
	fn request_with_context<'a>(
		&'a self,
		ctx: &'a Context,
		method: Method,
		path: &'a str,
		body: Option<Bytes>,
	) -> CallFuture<'a> {
		let span = CallSpan::new(&method, path);

		Box::pin(span.instrument(self.dispatch(ctx, method, path, body)))
	}
}

/// Turns a response outside 200..=399 into a protocol error, decoding GitHub's error payload
/// when the body is one. Only context failures take precedence.
async fn classify(ctx: &Context, mut response: Response) -> Error {
	let status = response.status().as_u16();
	let decoded = match ctx.run(response.buffer()).await {
		Ok(body) => serde_json::from_slice::<ErrorBody>(&body).ok(),
		Err(e @ (Error::Cancelled | Error::DeadlineExceeded)) => return e,
		Err(_) => None,
	};
	let response = Box::new(response);

	match decoded {
		Some(body) => ProtocolError::Api {
			status,
			message: body.message.unwrap_or_default(),
			documentation_url: body.documentation_url,
			response,
		},
		None => ProtocolError::Status { status, response },
	}
	.into()
}

/// Reads the `Location` header as UTF-8; `None` when absent or empty.
fn redirect_location(response: &Response) -> Result<Option<String>, RequestError> {
	let Some(value) = response.headers().get(LOCATION) else { return Ok(None) };

	if value.is_empty() {
		return Ok(None);
	}

	str::from_utf8(value.as_bytes()).map(|location| Some(location.to_owned())).map_err(|source| {
		RequestError::InvalidLocation {
			location: String::from_utf8_lossy(value.as_bytes()).into_owned(),
			source,
		}
	})
}

fn failed(target: CallTarget, e: Error) -> Error {
	obs::record_call_outcome(target, CallOutcome::Failure);

	e
}
