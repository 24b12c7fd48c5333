// self
use crate::{auth::OutputMode, obs::ObtainOutcome};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_obtain_outcome(mode: OutputMode, outcome: ObtainOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"graph_app_token_obtain_total",
			"mode" => mode.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (mode, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_obtain_outcome_noop_without_recorder() {
		record_obtain_outcome(OutputMode::Bearer, ObtainOutcome::Failure);
	}
}
