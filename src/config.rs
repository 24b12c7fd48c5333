//! Broker configuration: token authority, request timeout, and expiry policy.

// self
use crate::_prelude::*;

/// Errors raised while validating a [`BrokerConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BrokerConfigError {
	/// The authority URL could not be parsed.
	#[error("Authority URL is invalid: {source}.")]
	InvalidAuthority {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The authority must be an HTTP(S) URL with a path.
	#[error("Authority must be an http(s) base URL: {url}.")]
	UnsupportedAuthority {
		/// Authority URL that failed validation.
		url: String,
	},
	/// Request timeout must be strictly positive.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// Expiry margin cannot be negative.
	#[error("Expiry margin cannot be negative.")]
	NegativeExpiryMargin,
	/// Fallback token lifetime must be strictly positive.
	#[error("Default token lifetime must be positive.")]
	NonPositiveDefaultExpiresIn,
}

/// Immutable settings consumed by [`Broker`](crate::flows::Broker).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerConfig {
	/// Identity platform authority the tenant path is appended to.
	pub authority: Url,
	/// Upper bound for a single token endpoint call.
	pub request_timeout: Duration,
	/// Safety margin subtracted from every token lifetime before caching.
	pub expiry_margin: Duration,
	/// Lifetime assumed when the endpoint omits `expires_in`.
	pub default_expires_in: Duration,
}
impl BrokerConfig {
	/// Public Microsoft identity platform authority.
	pub const DEFAULT_AUTHORITY: &'static str = "https://login.microsoftonline.com";
	/// Default bound for a single token endpoint call.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(10);
	/// Default safety margin.
	pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::seconds(60);
	/// Default lifetime when `expires_in` is missing.
	pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(3599);

	/// Returns a builder seeded with the defaults.
	pub fn builder() -> BrokerConfigBuilder {
		BrokerConfigBuilder::default()
	}

	/// Renders `{authority}/{tenant_id}/oauth2/v2.0/token`.
	///
	/// The tenant is appended as a single percent-encoded path segment.
	pub fn token_endpoint(&self, tenant_id: &str) -> Result<Url, BrokerConfigError> {
		let mut url = self.authority.clone();

		url.path_segments_mut()
			.map_err(|_| BrokerConfigError::UnsupportedAuthority {
				url: self.authority.to_string(),
			})?
			.pop_if_empty()
			.extend([tenant_id, "oauth2", "v2.0", "token"]);

		Ok(url)
	}

	fn validate(&self) -> Result<(), BrokerConfigError> {
		if !matches!(self.authority.scheme(), "https" | "http") || self.authority.cannot_be_a_base()
		{
			return Err(BrokerConfigError::UnsupportedAuthority {
				url: self.authority.to_string(),
			});
		}
		if !self.request_timeout.is_positive() {
			return Err(BrokerConfigError::NonPositiveTimeout);
		}
		if self.expiry_margin.is_negative() {
			return Err(BrokerConfigError::NegativeExpiryMargin);
		}
		if !self.default_expires_in.is_positive() {
			return Err(BrokerConfigError::NonPositiveDefaultExpiresIn);
		}

		Ok(())
	}
}
impl Default for BrokerConfig {
	fn default() -> Self {
		Self {
			authority: default_authority(),
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			expiry_margin: Self::DEFAULT_EXPIRY_MARGIN,
			default_expires_in: Self::DEFAULT_EXPIRES_IN,
		}
	}
}

/// Builder for [`BrokerConfig`] values.
#[derive(Debug)]
pub struct BrokerConfigBuilder {
	authority: Option<String>,
	request_timeout: Duration,
	expiry_margin: Duration,
	default_expires_in: Duration,
}
impl BrokerConfigBuilder {
	/// Points the broker at a different authority (sovereign clouds, test servers).
	pub fn authority(mut self, url: impl Into<String>) -> Self {
		self.authority = Some(url.into());

		self
	}

	/// Overrides the request timeout (defaults to 10 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the expiry safety margin (defaults to 60 seconds).
	pub fn expiry_margin(mut self, margin: Duration) -> Self {
		self.expiry_margin = margin;

		self
	}

	/// Overrides the lifetime assumed when `expires_in` is missing (defaults to 3599 seconds).
	pub fn default_expires_in(mut self, lifetime: Duration) -> Self {
		self.default_expires_in = lifetime;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<BrokerConfig, BrokerConfigError> {
		let authority = match self.authority {
			Some(raw) => Url::parse(&raw)
				.map_err(|source| BrokerConfigError::InvalidAuthority { source })?,
			None => default_authority(),
		};
		let config = BrokerConfig {
			authority,
			request_timeout: self.request_timeout,
			expiry_margin: self.expiry_margin,
			default_expires_in: self.default_expires_in,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for BrokerConfigBuilder {
	fn default() -> Self {
		Self {
			authority: None,
			request_timeout: BrokerConfig::DEFAULT_REQUEST_TIMEOUT,
			expiry_margin: BrokerConfig::DEFAULT_EXPIRY_MARGIN,
			default_expires_in: BrokerConfig::DEFAULT_EXPIRES_IN,
		}
	}
}

fn default_authority() -> Url {
	Url::parse(BrokerConfig::DEFAULT_AUTHORITY).expect("Default authority is a valid URL.")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_identity_platform() {
		let config = BrokerConfig::builder().build().expect("Default config should validate.");

		assert_eq!(config, BrokerConfig::default());
		assert_eq!(config.request_timeout, Duration::seconds(10));
		assert_eq!(config.expiry_margin, Duration::seconds(60));
		assert_eq!(config.default_expires_in, Duration::seconds(3599));
		assert_eq!(
			config.token_endpoint("contoso").expect("Endpoint should render.").as_str(),
			"https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
		);
	}

	#[test]
	fn token_endpoint_keeps_authority_prefix_and_encodes_tenant() {
		let config = BrokerConfig::builder()
			.authority("http://127.0.0.1:8080/identity/")
			.build()
			.expect("Local authority should validate.");

		assert_eq!(
			config.token_endpoint("tenant").expect("Endpoint should render.").as_str(),
			"http://127.0.0.1:8080/identity/tenant/oauth2/v2.0/token"
		);
		assert_eq!(
			config.token_endpoint("a/b?c").expect("Endpoint should render.").as_str(),
			"http://127.0.0.1:8080/identity/a%2Fb%3Fc/oauth2/v2.0/token"
		);
	}

	#[test]
	fn builder_rejects_invalid_settings() {
		assert!(matches!(
			BrokerConfig::builder().authority("not a url").build(),
			Err(BrokerConfigError::InvalidAuthority { .. })
		));
		assert!(matches!(
			BrokerConfig::builder().authority("mailto:ops@example.com").build(),
			Err(BrokerConfigError::UnsupportedAuthority { .. })
		));
		assert_eq!(
			BrokerConfig::builder().request_timeout(Duration::ZERO).build(),
			Err(BrokerConfigError::NonPositiveTimeout)
		);
		assert_eq!(
			BrokerConfig::builder().expiry_margin(Duration::seconds(-1)).build(),
			Err(BrokerConfigError::NegativeExpiryMargin)
		);
		assert_eq!(
			BrokerConfig::builder().default_expires_in(Duration::ZERO).build(),
			Err(BrokerConfigError::NonPositiveDefaultExpiresIn)
		);
	}

	#[test]
	fn zero_margin_is_allowed() {
		let config = BrokerConfig::builder()
			.expiry_margin(Duration::ZERO)
			.build()
			.expect("Zero margin should validate.");

		assert!(config.expiry_margin.is_zero());
	}
}
