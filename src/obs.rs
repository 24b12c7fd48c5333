//! Optional observability helpers for token requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every request inside a `graph_app_token.obtain` span (with the
//!   `mode` field) and to emit debug events for cache lookups, stores, and failures. Events
//!   carry the cache key fingerprint, never the client secret or the token.
//! - Enable `metrics` to increment the `graph_app_token_obtain_total` counter for every
//!   attempt/cache hit/fetch/failure, labeled by `mode` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObtainOutcome {
	/// Entry to [`Broker::obtain_token`](crate::flows::Broker::obtain_token).
	Attempt,
	/// Served from the cache without contacting the token endpoint.
	CacheHit,
	/// Fetched from the token endpoint and stored.
	Fetched,
	/// Failure propagated back to the caller.
	Failure,
}
impl ObtainOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ObtainOutcome::Attempt => "attempt",
			ObtainOutcome::CacheHit => "cache_hit",
			ObtainOutcome::Fetched => "fetched",
			ObtainOutcome::Failure => "failure",
		}
	}
}
impl Display for ObtainOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why a request had to go to the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissReason {
	/// Nothing stored under the key.
	Absent,
	/// The stored entry reached its expiry.
	Expired,
	/// The caller asked to bypass the cache.
	Forced,
}
impl MissReason {
	/// Returns a stable label suitable for event fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			MissReason::Absent => "absent",
			MissReason::Expired => "expired",
			MissReason::Forced => "forced",
		}
	}
}
impl Display for MissReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
