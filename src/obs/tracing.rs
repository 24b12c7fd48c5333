// self
use crate::{
	_prelude::*,
	auth::{CacheKey, OutputMode},
	obs::MissReason,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span wrapping a single token request.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the requested output mode.
	pub fn new(mode: OutputMode) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("graph_app_token.obtain", mode = mode.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = mode;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
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

/// Emits a debug event for a request served from the cache.
pub fn trace_cache_hit(key: &CacheKey, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(cache_key = %key, %expires_at, "serving cached token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, expires_at);
	}
}

/// Emits a debug event for a request that has to reach the token endpoint.
pub fn trace_cache_miss(key: &CacheKey, reason: MissReason) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(cache_key = %key, reason = reason.as_str(), "no usable cached token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, reason);
	}
}

/// Emits a debug event once a fresh token has been stored.
pub fn trace_token_stored(key: &CacheKey, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(cache_key = %key, %expires_at, "cached fresh token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, expires_at);
	}
}

/// Emits a warning for a request that failed; nothing was cached.
pub fn trace_fetch_failed(key: &CacheKey, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			cache_key = %key,
			status = error.http_status(),
			error = %error,
			"token request failed"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, error);
	}
}
