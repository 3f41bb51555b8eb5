//! Classified rejections and the error payload endpoints return for them.

// self
use crate::{_prelude::*, obs::DecisionOutcome};

/// Why a call was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
	/// Header absent, not prefixed with `Bearer `, or carrying an empty key.
	MissingCredential,
	/// Key lacks the `dcl_sk_` prefix or is not provisioned.
	InvalidCredential,
	/// Key exhausted the current window.
	RateLimited,
}
impl RejectionKind {
	/// HTTP status the endpoint must answer with.
	pub const fn status(self) -> u16 {
		match self {
			RejectionKind::MissingCredential | RejectionKind::InvalidCredential => 401,
			RejectionKind::RateLimited => 429,
		}
	}

	/// User-facing message placed in the error body.
	pub const fn message(self) -> &'static str {
		match self {
			RejectionKind::MissingCredential =>
				"Missing API key. Include Authorization: Bearer YOUR_API_KEY",
			RejectionKind::InvalidCredential => "Invalid API key",
			RejectionKind::RateLimited =>
				"Rate limit exceeded. Please upgrade your plan or try again later.",
		}
	}

	/// Observability label for this rejection.
	pub const fn outcome(self) -> DecisionOutcome {
		match self {
			RejectionKind::MissingCredential => DecisionOutcome::MissingCredential,
			RejectionKind::InvalidCredential => DecisionOutcome::InvalidCredential,
			RejectionKind::RateLimited => DecisionOutcome::RateLimited,
		}
	}
}

/// Advises callers when a rate-limited key can be used again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant the current window closes.
	pub earliest_retry_at: OffsetDateTime,
	/// Time left until `earliest_retry_at`, measured from the decision instant.
	pub recommended_backoff: Duration,
}
impl RetryDirective {
	/// Creates a directive for a window closing at `earliest_retry_at`, observed at `now`.
	pub fn new(earliest_retry_at: OffsetDateTime, now: OffsetDateTime) -> Self {
		let remaining = earliest_retry_at - now;
		let recommended_backoff = if remaining.is_negative() { Duration::ZERO } else { remaining };

		Self { earliest_retry_at, recommended_backoff }
	}

	/// Backoff rounded up to whole seconds, as used in a `Retry-After` header.
	pub fn retry_after_secs(&self) -> u64 {
		let secs = self.recommended_backoff.whole_seconds();
		let secs = if self.recommended_backoff.subsec_nanoseconds() > 0 { secs + 1 } else { secs };

		u64::try_from(secs).unwrap_or(0)
	}
}

/// A classified, terminal rejection for the current request.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{}", .kind.message())]
pub struct Rejection {
	/// Rejection classification.
	pub kind: RejectionKind,
	/// Retry hint, present only for [`RejectionKind::RateLimited`].
	pub retry: Option<RetryDirective>,
}
impl Rejection {
	/// Creates a rejection without a retry hint.
	pub fn new(kind: RejectionKind) -> Self {
		Self { kind, retry: None }
	}

	/// Creates a rate-limit rejection carrying a retry hint.
	pub fn rate_limited(retry: RetryDirective) -> Self {
		Self { kind: RejectionKind::RateLimited, retry: Some(retry) }
	}

	/// HTTP status the endpoint must answer with.
	pub fn status(&self) -> u16 {
		self.kind.status()
	}

	/// User-facing message.
	pub fn message(&self) -> &'static str {
		self.kind.message()
	}

	/// JSON error payload, serialized as `{"error": "<message>"}`.
	pub fn body(&self) -> ErrorBody {
		ErrorBody { error: self.message() }
	}
}

/// Error payload returned by every endpoint on rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
	/// User-facing message.
	pub error: &'static str,
}
