//! Crate-level error types shared by the broker, the token endpoint exchange, and stores.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, config::BrokerConfigError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// None of these are retried internally, and a failed call never leaves a cache entry behind.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Caller supplied an argument the broker does not understand (e.g. an unknown mode).
	#[error("Invalid argument: {reason}.")]
	InvalidArgument {
		/// Description of the rejected argument.
		reason: String,
	},
	/// Token endpoint returned a body that is not a JSON object.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// HTTP status code of the response.
		status: Option<u16>,
		/// JSON parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the request with HTTP {status}: {body}.")]
	UpstreamRejected {
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Decoded error body, passed through unmodified.
		body: Value,
	},
	/// Token endpoint answered with success but without a usable `access_token`.
	#[error("Token endpoint response does not contain an access token.")]
	MissingToken {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Token endpoint did not answer within the configured request timeout.
	#[error("Token endpoint request timed out.")]
	Timeout,
}
impl Error {
	/// OAuth `error` code carried by an [`Error::UpstreamRejected`] body.
	pub fn oauth_error(&self) -> Option<&str> {
		self.upstream_field("error")
	}

	/// OAuth `error_description` carried by an [`Error::UpstreamRejected`] body.
	pub fn oauth_error_description(&self) -> Option<&str> {
		self.upstream_field("error_description")
	}

	/// HTTP status code attached to the error, when one was received.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::UpstreamRejected { status, .. } | Self::MissingToken { status } => Some(*status),
			Self::MalformedResponse { status, .. } => *status,
			_ => None,
		}
	}

	fn upstream_field(&self, field: &str) -> Option<&str> {
		match self {
			Self::UpstreamRejected { body, .. } => body.get(field).and_then(Value::as_str),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Broker configuration failed validation.
	#[error(transparent)]
	InvalidConfig(#[from] BrokerConfigError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport failed with a free-form message.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Message reported by the transport.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
