//! Optional observability helpers for gate decisions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each decision inside an `api_key_gate.decision` span with a `stage`
//!   field and to emit `debug!` events for rejections and window resets. Events carry the key
//!   fingerprint, never the key.
//! - Enable `metrics` to increment `api_key_gate_decision_total` (labeled by `outcome`) for every
//!   decision and `api_key_gate_usage_recorded_total` (labeled by `tier`) for every recorded call.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Decision labels recorded for each authorization attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
	/// The call was admitted.
	Admitted,
	/// No usable `Authorization: Bearer` header.
	MissingCredential,
	/// Unknown or malformed key.
	InvalidCredential,
	/// The key exhausted its window.
	RateLimited,
}
impl DecisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DecisionOutcome::Admitted => "admitted",
			DecisionOutcome::MissingCredential => "missing_credential",
			DecisionOutcome::InvalidCredential => "invalid_credential",
			DecisionOutcome::RateLimited => "rate_limited",
		}
	}
}
impl Display for DecisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
