// crates.io
use oauth2::http::{StatusCode, header::CONTENT_TYPE};
// self
use graph_app_token::{
	_preludet::*,
	auth::{ClientCredentials, OutputMode},
	config::BrokerConfig,
	error::{ConfigError, TransportError},
	flows::{Broker, TokenRequest},
	http::TokenHttpClient,
	oauth::{
		TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	store::{MemoryStore, TokenStore},
};

#[derive(Debug)]
enum FakeTransportError {
	DeadlineExceeded,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DeadlineExceeded => write!(f, "Transport deadline exceeded."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Scripted transport: replies with a canned body, or fails with a deadline error.
#[derive(Clone, Default)]
struct FakeHttpClient {
	reply: Option<(u16, &'static str)>,
	uris: Arc<Mutex<Vec<String>>>,
}
impl FakeHttpClient {
	fn replying(status: u16, body: &'static str) -> Self {
		Self { reply: Some((status, body)), ..Default::default() }
	}

	fn stalled() -> Self {
		Self::default()
	}

	fn recorded_uris(&self) -> Vec<String> {
		self.uris.lock().clone()
	}
}
impl TokenHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		FakeHttpHandle(self.clone())
	}
}

struct FakeHttpHandle(FakeHttpClient);
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		self.0.uris.lock().push(request.uri().to_string());

		let reply = self.0.reply;

		Box::pin(async move {
			let Some((status, body)) = reply else {
				return Err(HttpClientError::Reqwest(Box::new(
					FakeTransportError::DeadlineExceeded,
				)));
			};
			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() =
				StatusCode::from_u16(status).expect("Fake status code should be valid.");
			response.headers_mut().insert(
				CONTENT_TYPE,
				"application/json".parse().expect("Content type header should parse."),
			);

			Ok(response)
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	seen: Arc<Mutex<Vec<String>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<String> {
		self.seen.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(&self, err: HttpClientError<FakeTransportError>) -> Error {
		self.seen.lock().push(err.to_string());

		match err {
			HttpClientError::Reqwest(inner) => match *inner {
				FakeTransportError::DeadlineExceeded => Error::Timeout,
			},
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			other => TransportError::Other { message: other.to_string() }.into(),
		}
	}
}

fn build_broker(
	http_client: FakeHttpClient,
	mapper: RecordingTransportErrorMapper,
) -> (Broker<FakeHttpClient, RecordingTransportErrorMapper>, MemoryStore) {
	let store_backend = MemoryStore::default();
	let store: Arc<dyn TokenStore> = Arc::new(store_backend.clone());

	(Broker::with_http_client(store, BrokerConfig::default(), http_client, mapper), store_backend)
}

fn request() -> TokenRequest {
	TokenRequest::new(ClientCredentials::new("fake-tenant", "fake-client", "fake-secret"))
}

#[tokio::test]
async fn custom_transport_serves_and_caches_tokens() {
	let http_client =
		FakeHttpClient::replying(200, r#"{"access_token":"fake-token","expires_in":3600}"#);
	let (broker, store) =
		build_broker(http_client.clone(), RecordingTransportErrorMapper::default());
	let request = request().with_mode(OutputMode::Bearer);

	for _ in 0..3 {
		let value =
			broker.obtain_token(request.clone()).await.expect("Fake transport should succeed.");

		assert_eq!(value.expose(), Some("Bearer fake-token"));
	}

	assert_eq!(
		http_client.recorded_uris(),
		["https://login.microsoftonline.com/fake-tenant/oauth2/v2.0/token"],
		"Only the first request should reach the transport."
	);
	assert!(store.contains(&request.cache_key()));
}

#[tokio::test]
async fn mapper_reports_transport_deadlines_as_timeouts() {
	let http_client = FakeHttpClient::stalled();
	let mapper = RecordingTransportErrorMapper::default();
	let (broker, store) = build_broker(http_client, mapper.clone());
	let err = broker
		.obtain_token(request())
		.await
		.expect_err("Stalled transports should surface an error.");

	assert!(matches!(err, Error::Timeout), "Unexpected error variant: {err:?}.");
	assert_eq!(mapper.recorded().len(), 1, "Mapper must see exactly one transport failure.");
	assert!(store.is_empty());
	assert_eq!(broker.metrics.failures(), 1);
}
