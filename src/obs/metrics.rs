//! Login outcome counters.

// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow attempt and once per terminal outcome.
pub const FLOW_COUNTER: &str = "facebook_login_flow_total";

/// Increments [`FLOW_COUNTER`] labeled with `flow` and `outcome` on the global recorder.
///
/// Without the `metrics` feature this does nothing.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn counting_without_a_recorder_is_harmless() {
		for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
			record_flow_outcome(FlowKind::Callback, outcome);
		}

		assert_eq!(FLOW_COUNTER, "facebook_login_flow_total");
	}
}
