// self
use crate::obs::{ScreenKind, SubmitLabel};

/// Records a submission outcome via the global metrics recorder (when enabled).
pub fn record_submit_outcome(screen: ScreenKind, outcome: SubmitLabel) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"team_portal_submit_total",
			"screen" => screen.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (screen, outcome);
	}
}
