// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome, metrics},
};

/// Future returned by [`FlowSpan::instrument`]; the bare future when tracing is disabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; the bare future when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// One handler invocation: a `facebook_login.flow` span plus its outcome counter.
///
/// Creating the span counts an attempt. [`FlowSpan::record`] stores the terminal outcome in the
/// span's `outcome` field and counts it.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	kind: FlowKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens the span for `kind` at `stage` and counts the attempt.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		metrics::record_flow_outcome(kind, FlowOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"facebook_login.flow",
				flow = kind.as_str(),
				stage,
				outcome = tracing::field::Empty
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Returns the flow this span observes.
	pub fn kind(&self) -> FlowKind {
		self.kind
	}

	/// Records the terminal `outcome` on the span and the counter.
	pub fn record(&self, outcome: FlowOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		metrics::record_flow_outcome(self.kind, outcome);
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
