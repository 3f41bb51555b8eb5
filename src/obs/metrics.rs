// self
use crate::{auth::Tier, obs::DecisionOutcome};

/// Records a gate decision via the global metrics recorder (when enabled).
pub fn record_decision(outcome: DecisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("api_key_gate_decision_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records one admitted-and-counted call via the global metrics recorder (when enabled).
pub fn record_usage_recorded(tier: Tier) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("api_key_gate_usage_recorded_total", "tier" => tier.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = tier;
	}
}
