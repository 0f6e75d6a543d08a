//! Optional observability helpers for login flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `facebook_login.flow` with the `flow`
//!   (handler) and `stage` (call site) fields, plus an `outcome` field filled in when the handler
//!   picks a continuation.
//! - Enable `metrics` to increment the `facebook_login_flow_total` counter for every attempt and
//!   outcome, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login flow kinds observed by the handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Redirect to the Facebook login dialog.
	Login,
	/// Authorization code callback and token exchange.
	Callback,
	/// Graph `me` lookup and continuation dispatch.
	Profile,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Callback => "callback",
			FlowKind::Profile => "profile",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a handler.
	Attempt,
	/// The success continuation ran.
	Success,
	/// The failure continuation ran.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::Callback.to_string(), "callback");
		assert_eq!(FlowKind::Profile.as_str(), "profile");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}
}
