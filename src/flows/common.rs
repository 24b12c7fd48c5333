//! Shared request state and single-flight guards.

// self
use crate::{
	_prelude::*,
	auth::{CacheKey, ClientCredentials, OutputMode},
	flows::Broker,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
};

/// Parameters of one token request.
#[derive(Clone, Debug)]
pub struct TokenRequest {
	/// Credential tuple to authenticate with.
	pub credentials: ClientCredentials,
	/// Output shape to return (and cache).
	pub mode: OutputMode,
	/// Forces cache bypass when true.
	pub force: bool,
}
impl TokenRequest {
	/// Creates a request for the bare access token.
	pub fn new(credentials: ClientCredentials) -> Self {
		Self { credentials, mode: OutputMode::default(), force: false }
	}

	/// Selects the output shape.
	pub fn with_mode(mut self, mode: OutputMode) -> Self {
		self.mode = mode;

		self
	}

	/// Forces the broker to bypass cache checks; the fresh token still replaces the entry.
	pub fn force_refresh(mut self) -> Self {
		self.force = true;

		self
	}

	/// Overrides the force flag.
	pub fn with_force(mut self, force: bool) -> Self {
		self.force = force;

		self
	}

	/// Key the resulting entry is stored under.
	pub fn cache_key(&self) -> CacheKey {
		CacheKey::derive_for(&self.credentials, self.mode)
	}
}

/// Returns (and creates on demand) the single-flight guard for a cache key.
pub(crate) fn flow_guard<C, M>(broker: &Broker<C, M>, key: &CacheKey) -> Arc<AsyncMutex<()>>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let mut guards = broker.flow_guards.lock();

	guards.entry(*key).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
}
