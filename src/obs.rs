//! Labels and hooks the native caller reports through.
//!
//! Both backends are off by default and every hook compiles to nothing without them:
//!
//! - `tracing`: one `github_caller.call` span per logical call (fields `method`, `path`) and a
//!   `debug` event per redirect hop or error status.
//! - `metrics`: the `github_caller_call_total` counter, labeled by `target` (which side of the
//!   credential guard the hop hit) and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Which side of the credential guard a request landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallTarget {
	/// The configured API origin; requests may carry credentials.
	Origin,
	/// Any other origin; requests are always anonymous.
	Foreign,
}
impl CallTarget {
	/// Label used for the `target` metric dimension.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallTarget::Origin => "origin",
			CallTarget::Foreign => "foreign",
		}
	}
}
impl Display for CallTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What happened on one hop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// A request is about to be sent.
	Attempt,
	/// The server answered `302 Found` and the caller will follow it.
	Redirect,
	/// Final response handed back to the caller.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Lowercase name, e.g. `"redirect"`.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Redirect => "redirect",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
