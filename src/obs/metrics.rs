// self
use crate::obs::{CallOutcome, CallTarget};

/// Bumps `github_caller_call_total{target, outcome}` on the installed recorder.
///
/// Without the `metrics` feature this does nothing.
pub fn record_call_outcome(target: CallTarget, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"github_caller_call_total",
			"target" => target.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (target, outcome);
	}
}
