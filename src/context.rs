//! Per-call cancellation and deadline context.

// std
use std::time::{Duration, Instant};
// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::_prelude::*;

/// Cancellation and deadline carried by every call.
///
/// [`Context::background`] never cancels. Deadlines and cancellation tokens compose, and the
/// first one to fire aborts the in-flight request.
#[derive(Clone, Debug, Default)]
pub struct Context {
	deadline: Option<Instant>,
	cancel: Option<CancellationToken>,
}
impl Context {
	/// Context that never cancels and has no deadline.
	pub fn background() -> Self {
		Self::default()
	}

	/// Sets a deadline `timeout` from now, keeping an earlier existing deadline.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		let deadline = Instant::now().checked_add(timeout);

		match deadline {
			Some(deadline) => self.with_deadline(deadline),
			None => self,
		}
	}

	/// Sets an absolute deadline, keeping an earlier existing deadline.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));

		self
	}

	/// Attaches a fresh cancellation token and returns it alongside the context.
	///
	/// When the context already carries a token the new one is its child, so cancelling either
	/// the returned token or the existing one aborts calls using this context.
	pub fn with_cancellation(mut self) -> (Self, CancellationToken) {
		let token = match &self.cancel {
			Some(parent) => parent.child_token(),
			None => CancellationToken::new(),
		};

		self.cancel = Some(token.clone());

		(self, token)
	}

	/// Ties the context to an existing token, e.g. a shutdown signal shared across tasks.
	pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
		self.cancel = Some(token);

		self
	}

	/// Deadline, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Time left before the deadline; `None` when no deadline is set.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
	}

	/// Returns `true` once the attached token has been cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
	}

	/// Fails fast when the context is already done.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			return Err(Error::Cancelled);
		}
		if self.remaining().is_some_and(|left| left.is_zero()) {
			return Err(Error::DeadlineExceeded);
		}

		Ok(())
	}

	/// Drives `fut` to completion unless the context is cancelled or its deadline passes first.
	pub async fn run<F, T>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		self.check()?;

		tokio::select! {
			biased;
			_ = self.cancelled() => Err(Error::Cancelled),
			_ = self.expired() => Err(Error::DeadlineExceeded),
			out = fut => out,
		}
	}

	async fn cancelled(&self) {
		match &self.cancel {
			Some(token) => token.cancelled().await,
			None => std::future::pending().await,
		}
	}

	async fn expired(&self) {
		match self.deadline {
			Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
			None => std::future::pending().await,
		}
	}
}
