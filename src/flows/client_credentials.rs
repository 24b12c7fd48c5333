//! Client-credentials orchestration with caching + single-flight guards.
//!
//! [`Broker::obtain_token`] serves the cached value for a credential tuple and output mode
//! until it expires, and only calls the token endpoint when the entry is missing, expired,
//! or the caller forced a refresh. A per-[`CacheKey`] guard makes concurrent callers wait
//! for the in-flight fetch and then read its result from the store instead of stampeding
//! the endpoint. Failures are never cached.

// self
use crate::{
	_prelude::*,
	auth::{CacheEntry, CacheKey, ClientCredentials, IssuedToken, OutputMode},
	flows::{
		Broker,
		common::{self, TokenRequest},
	},
	http::TokenHttpClient,
	oauth::{TokenEndpoint, TransportErrorMapper},
	obs::{self, FlowSpan, MissReason, ObtainOutcome},
};

impl<C, M> Broker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns an application-only token for the given credentials, shaped per `mode`.
	///
	/// `mode` must be one of `bearer`, `token`, or `raw`; anything else fails with
	/// [`Error::InvalidArgument`] before the store or the network is touched.
	pub async fn obtain(
		&self,
		tenant_id: &str,
		client_id: &str,
		client_secret: &str,
		scope: &str,
		mode: &str,
	) -> Result<IssuedToken> {
		let mode = match mode.parse::<OutputMode>() {
			Ok(mode) => mode,
			Err(e) => {
				// Rejected labels are counted under the default mode.
				self.metrics.record_attempt();
				self.metrics.record_failure();
				obs::record_obtain_outcome(OutputMode::default(), ObtainOutcome::Attempt);
				obs::record_obtain_outcome(OutputMode::default(), ObtainOutcome::Failure);

				return Err(e);
			},
		};
		let credentials =
			ClientCredentials::new(tenant_id, client_id, client_secret).with_scope(scope);

		self.obtain_token(TokenRequest::new(credentials).with_mode(mode)).await
	}

	/// Typed form of [`Broker::obtain`].
	pub async fn obtain_token(&self, request: TokenRequest) -> Result<IssuedToken> {
		let mode = request.mode;
		let span = FlowSpan::new(mode);

		self.metrics.record_attempt();
		obs::record_obtain_outcome(mode, ObtainOutcome::Attempt);

		let result = span.instrument(self.serve(request)).await;

		match &result {
			Ok((_, ObtainOutcome::CacheHit)) => {
				self.metrics.record_cache_hit();
				obs::record_obtain_outcome(mode, ObtainOutcome::CacheHit);
			},
			Ok(_) => {
				self.metrics.record_fetch();
				obs::record_obtain_outcome(mode, ObtainOutcome::Fetched);
			},
			Err(_) => {
				self.metrics.record_failure();
				obs::record_obtain_outcome(mode, ObtainOutcome::Failure);
			},
		}

		result.map(|(value, _)| value)
	}

	async fn serve(&self, request: TokenRequest) -> Result<(IssuedToken, ObtainOutcome)> {
		let key = request.cache_key();
		let guard = common::flow_guard(self, &key);
		let _singleflight = guard.lock().await;

		if request.force {
			obs::trace_cache_miss(&key, MissReason::Forced);
		} else {
			match self.store.fetch(&key).await? {
				Some(entry) if !entry.is_expired_at(self.clock.now()) => {
					obs::trace_cache_hit(&key, entry.expires_at);

					return Ok((entry.value, ObtainOutcome::CacheHit));
				},
				Some(_) => obs::trace_cache_miss(&key, MissReason::Expired),
				None => obs::trace_cache_miss(&key, MissReason::Absent),
			}
		}

		let value = self.fetch_and_store(&key, &request).await.inspect_err(|e| {
			obs::trace_fetch_failed(&key, e);
		})?;

		Ok((value, ObtainOutcome::Fetched))
	}

	async fn fetch_and_store(&self, key: &CacheKey, request: &TokenRequest) -> Result<IssuedToken> {
		let endpoint = TokenEndpoint::new(
			&self.config,
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
		);
		let response = endpoint.exchange_client_credentials(&request.credentials).await?;
		let issued_at = self.clock.now();
		let value = IssuedToken::shape(request.mode, &response.access_token, response.body);
		let entry = CacheEntry::with_lifetime(
			value.clone(),
			issued_at,
			response.expires_in,
			self.config.expiry_margin,
		);
		let expires_at = entry.expires_at;

		self.store.save(*key, entry).await?;
		obs::trace_token_stored(key, expires_at);

		Ok(value)
	}
}

#[cfg(all(test, feature = "metrics", feature = "reqwest"))]
mod tests {
	// crates.io
	use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
	// self
	use super::*;
	use crate::flows::ReqwestBroker;

	/// Captures the labels of every registered counter.
	#[derive(Default)]
	struct LabelRecorder(Mutex<Vec<Vec<(String, String)>>>);
	impl LabelRecorder {
		fn outcomes(&self) -> Vec<(String, String)> {
			let label = |labels: &[(String, String)], name: &str| {
				labels.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
			};

			self.0
				.lock()
				.iter()
				.filter_map(|labels| Some((label(labels, "mode")?, label(labels, "outcome")?)))
				.collect()
		}
	}
	impl Recorder for LabelRecorder {
		fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

		fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

		fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

		fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
			self.0.lock().push(
				key.labels()
					.map(|label| (label.key().to_owned(), label.value().to_owned()))
					.collect(),
			);

			Counter::noop()
		}

		fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
			Gauge::noop()
		}

		fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
			Histogram::noop()
		}
	}

	#[test]
	fn rejected_modes_reach_the_obtain_counter() {
		let recorder = LabelRecorder::default();
		let broker = ReqwestBroker::in_memory().expect("Default broker should build.");
		let runtime = tokio::runtime::Builder::new_current_thread()
			.build()
			.expect("Current-thread runtime should build.");
		let err = metrics::with_local_recorder(&recorder, || {
			runtime.block_on(broker.obtain("tenant", "client", "secret", "scope", "jwt"))
		})
		.expect_err("Unknown modes must be rejected.");

		assert!(matches!(err, Error::InvalidArgument { .. }), "Unexpected error: {err:?}.");
		assert_eq!(
			recorder.outcomes(),
			[("token".to_owned(), "attempt".to_owned()), ("token".to_owned(), "failure".to_owned())]
		);
		assert_eq!(broker.metrics.attempts(), 1);
		assert_eq!(broker.metrics.failures(), 1);
	}
}
