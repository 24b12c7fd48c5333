//! Values returned to callers, shaped by [`OutputMode`].

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{OutputMode, Secret},
};

/// Full JSON object returned by the token endpoint.
///
/// The object contains the access token, so `Debug` only lists the field names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTokenResponse(Map<String, Value>);
impl RawTokenResponse {
	/// Wraps a decoded response object.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(fields)
	}

	/// Looks up a top-level field.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Returns the `access_token` field when it is a non-empty string.
	pub fn access_token(&self) -> Option<&str> {
		self.get("access_token").and_then(Value::as_str).filter(|token| !token.is_empty())
	}

	/// Returns the `expires_in` field in seconds.
	///
	/// Integers and numeric strings are accepted since some identity platform endpoints
	/// quote the value. Fractional numbers are truncated to whole seconds.
	pub fn expires_in(&self) -> Option<i64> {
		match self.get("expires_in")? {
			Value::Number(number) =>
				number.as_i64().or_else(|| number.as_f64().map(|seconds| seconds.trunc() as i64)),
			Value::String(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// Borrows the decoded object.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the wrapper and returns the decoded object.
	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}
}
impl Debug for RawTokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("RawTokenResponse").field(&self.0.keys().collect::<Vec<_>>()).finish()
	}
}

/// Token value handed back by [`Broker::obtain`](crate::flows::Broker::obtain).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum IssuedToken {
	/// `Bearer <access_token>`.
	Bearer(Secret),
	/// Bare access token.
	Token(Secret),
	/// Full token endpoint response.
	Raw(RawTokenResponse),
}
impl IssuedToken {
	/// Shapes a successful token response according to `mode`.
	pub fn shape(mode: OutputMode, access_token: &str, response: RawTokenResponse) -> Self {
		match mode {
			OutputMode::Bearer => Self::Bearer(Secret::new(format!("Bearer {access_token}"))),
			OutputMode::Token => Self::Token(Secret::new(access_token)),
			OutputMode::Raw => Self::Raw(response),
		}
	}

	/// Mode this value was shaped for.
	pub fn mode(&self) -> OutputMode {
		match self {
			Self::Bearer(_) => OutputMode::Bearer,
			Self::Token(_) => OutputMode::Token,
			Self::Raw(_) => OutputMode::Raw,
		}
	}

	/// String form for the `bearer` and `token` modes.
	pub fn expose(&self) -> Option<&str> {
		match self {
			Self::Bearer(secret) | Self::Token(secret) => Some(secret.expose()),
			Self::Raw(_) => None,
		}
	}

	/// Full response for the `raw` mode.
	pub fn as_raw(&self) -> Option<&RawTokenResponse> {
		match self {
			Self::Raw(response) => Some(response),
			_ => None,
		}
	}
}
