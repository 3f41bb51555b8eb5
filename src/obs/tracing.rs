// self
use crate::{_prelude::*, obs::DecisionOutcome};

/// A span builder used around gate decisions.
#[derive(Clone, Debug)]
pub struct GateSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GateSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("api_key_gate.decision", stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Enters the span for the rest of the decision.
	pub fn entered(self) -> GateSpanGuard {
		#[cfg(feature = "tracing")]
		{
			GateSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			GateSpanGuard {}
		}
	}
}

/// RAII guard returned by [`GateSpan::entered`].
pub struct GateSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for GateSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("GateSpanGuard(..)")
	}
}

/// Emits a debug event for a rejected call. `key_fingerprint` is absent when no key was presented.
pub fn trace_rejection(outcome: DecisionOutcome, key_fingerprint: Option<&str>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(outcome = outcome.as_str(), key_fingerprint, "api key gate rejected call");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, key_fingerprint);
	}
}

/// Emits a debug event when an elapsed window is closed and usage restarts at zero.
pub fn trace_window_reset(key_fingerprint: &str, window_start: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(key_fingerprint, %window_start, "api key usage window reset");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key_fingerprint, window_start);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn gate_span_noop_without_subscriber() {
		let guard = GateSpan::new("test").entered();

		trace_rejection(DecisionOutcome::MissingCredential, None);
		trace_window_reset("fingerprint", OffsetDateTime::UNIX_EPOCH);

		assert_eq!(format!("{guard:?}"), "GateSpanGuard(..)");
	}
}
