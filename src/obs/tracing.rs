// self
use crate::{_prelude::*, obs::CallTarget};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span wrapping one logical call, redirects included.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the request method and the path as given by the caller.
	pub fn new(method: &Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("github_caller.call", method = %method, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event for a redirect hop. The URL never carries credentials.
pub fn trace_redirect(location: &Url, target: CallTarget, hop: usize) {
	#[cfg(feature = "tracing")]
	{
		if target == CallTarget::Foreign {
			tracing::debug!(
				%location,
				hop,
				"following redirect to foreign origin without credentials"
			);
		} else {
			tracing::debug!(%location, hop, "following redirect");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (location, target, hop);
	}
}

/// Emits a `debug` event when the server reports an error status.
pub fn trace_status_error(status: StatusCode, target: CallTarget) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			status = status.as_u16(),
			target = target.as_str(),
			"server returned error status"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, target);
	}
}
