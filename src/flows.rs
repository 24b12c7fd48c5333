//! Token broker: cache lookups, single-flight fetches, and the client-credentials flow.

pub mod common;

mod client_credentials;
mod metrics;

pub use common::*;
pub use metrics::ObtainMetrics;

// self
use crate::{
	_prelude::*,
	auth::CacheKey,
	clock::{Clock, SystemClock},
	config::BrokerConfig,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper, store::MemoryStore};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Serves application-only access tokens from an injected store, fetching from the token
/// endpoint only when no usable entry exists.
///
/// The broker owns the HTTP client, transport error mapper, store, clock, and configuration
/// so each request only carries its credential tuple and output mode. Clones share the
/// store, the single-flight guards, and the counters.
#[derive(Clone)]
pub struct Broker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every token endpoint call.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Store holding cached entries.
	pub store: Arc<dyn TokenStore>,
	/// Time source for expiry decisions.
	pub clock: Arc<dyn Clock>,
	/// Authority, timeout, and expiry policy.
	pub config: BrokerConfig,
	/// Request counters.
	pub metrics: Arc<ObtainMetrics>,
	flow_guards: Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>,
}
impl<C, M> Broker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		config: BrokerConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			store,
			clock: Arc::new(SystemClock),
			config,
			metrics: Default::default(),
			flow_guards: Default::default(),
		}
	}

	/// Replaces the time source.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a broker backed by a reqwest transport that honors
	/// [`BrokerConfig::request_timeout`].
	pub fn new(store: Arc<dyn TokenStore>, config: BrokerConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.request_timeout)?;

		Ok(Self::with_http_client(store, config, http_client, ReqwestTransportErrorMapper))
	}

	/// Creates a broker with an empty [`MemoryStore`] and the default configuration.
	pub fn in_memory() -> Result<Self> {
		Self::new(Arc::new(MemoryStore::default()), BrokerConfig::default())
	}
}
impl<C, M> Debug for Broker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("config", &self.config)
			.field("metrics", &self.metrics)
			.finish()
	}
}
