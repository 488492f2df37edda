//! Optional observability helpers for form submissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `team_portal.submit` with the `screen` and
//!   `stage` fields, plus the `outcome` once a sent submission settles.
//! - Enable `metrics` to increment the `team_portal_submit_total` counter for every submission
//!   attempt and its result, labeled by `screen` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Form screens observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenKind {
	/// Login screen.
	Login,
	/// Member signup screen.
	Signup,
	/// Team registration screen.
	Register,
}
impl ScreenKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ScreenKind::Login => "login",
			ScreenKind::Signup => "signup",
			ScreenKind::Register => "register",
		}
	}
}
impl Display for ScreenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitLabel {
	/// Submit was triggered.
	Attempt,
	/// Validation refused the submission.
	Invalid,
	/// Backend accepted the submission.
	Success,
	/// Backend rejected it or could not be reached.
	Failure,
	/// A submission was already in flight or the screen was detached.
	Ignored,
}
impl SubmitLabel {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubmitLabel::Attempt => "attempt",
			SubmitLabel::Invalid => "invalid",
			SubmitLabel::Success => "success",
			SubmitLabel::Failure => "failure",
			SubmitLabel::Ignored => "ignored",
		}
	}
}
impl Display for SubmitLabel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
