//! Client-credentials exchange against the identity platform token endpoint.

pub use oauth2;

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request, StatusCode,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use serde_json::{Map, Value};
use url::form_urlencoded::Serializer;
// self
#[cfg(feature = "reqwest")] use crate::error::TransportError;
use crate::{
	_prelude::*,
	auth::{ClientCredentials, RawTokenResponse},
	config::BrokerConfig,
	error::ConfigError,
	http::TokenHttpClient,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const GRANT_TYPE: &str = "client_credentials";

/// Maps HTTP transport failures into crate [`Error`] values.
///
/// Mappers are responsible for recognizing the transport's timeout and reporting it as
/// [`Error::Timeout`].
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			other => TransportError::Other { message: other.to_string() }.into(),
		}
	}
}

/// Successful token endpoint answer.
#[derive(Clone, Debug)]
pub(crate) struct TokenResponse {
	pub(crate) access_token: String,
	pub(crate) expires_in: Duration,
	pub(crate) body: RawTokenResponse,
}

/// Token endpoint facade bound to one transport + mapper pair.
pub(crate) struct TokenEndpoint<'a, C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: &'a BrokerConfig,
	http_client: &'a C,
	error_mapper: &'a M,
}
impl<'a, C, M> TokenEndpoint<'a, C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(config: &'a BrokerConfig, http_client: &'a C, error_mapper: &'a M) -> Self {
		Self { config, http_client, error_mapper }
	}

	/// Performs one client-credentials grant; no retries.
	pub(crate) async fn exchange_client_credentials(
		&self,
		credentials: &ClientCredentials,
	) -> Result<TokenResponse> {
		let request = build_token_request(self.config, credentials)?;
		let handle = self.http_client.handle();
		let response = oauth2::AsyncHttpClient::call(&handle, request)
			.await
			.map_err(|err| self.error_mapper.map_transport_error(err))?;

		read_token_response(self.config, response)
	}
}

/// Builds `POST {authority}/{tenant}/oauth2/v2.0/token` with the form-encoded grant.
pub(crate) fn build_token_request(
	config: &BrokerConfig,
	credentials: &ClientCredentials,
) -> Result<HttpRequest> {
	let url = config.token_endpoint(&credentials.tenant_id).map_err(ConfigError::from)?;
	let form = Serializer::new(String::new())
		.append_pair("client_id", &credentials.client_id)
		.append_pair("client_secret", credentials.client_secret.expose())
		.append_pair("scope", &credentials.scope)
		.append_pair("grant_type", GRANT_TYPE)
		.finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, "application/json")
		.body(form.into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Classifies a token endpoint response.
///
/// The body must be a JSON object whatever the status. Only `200 OK` counts as success; any
/// other status surfaces the decoded body unmodified. Success responses must carry a
/// non-empty `access_token`.
pub(crate) fn read_token_response(
	config: &BrokerConfig,
	response: HttpResponse,
) -> Result<TokenResponse> {
	let status = response.status();
	let fields: Map<String, Value> = serde_json::from_slice(response.body())
		.map_err(|source| Error::MalformedResponse { status: Some(status.as_u16()), source })?;

	if status != StatusCode::OK {
		return Err(Error::UpstreamRejected {
			status: status.as_u16(),
			body: Value::Object(fields),
		});
	}

	let body = RawTokenResponse::new(fields);
	let access_token =
		body.access_token().ok_or(Error::MissingToken { status: status.as_u16() })?.to_owned();
	let expires_in = body.expires_in().map(Duration::seconds).unwrap_or(config.default_expires_in);

	Ok(TokenResponse { access_token, expires_in, body })
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_timeout() {
		return Error::Timeout;
	}
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::from(err).into()
}
