//! Credential tuple supplied by callers of the client-credentials flow.

// self
use crate::{_prelude::*, auth::Secret};

/// Scope requested when callers do not pick one explicitly.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tenant, client, secret, and scope identifying one application-only token.
///
/// Every field is an opaque string; empty values are accepted and simply produce their own
/// cache key. The secret is wrapped in [`Secret`] so the tuple can be logged with `{:?}`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClientCredentials {
	/// Directory (tenant) the application is registered in.
	pub tenant_id: String,
	/// Application (client) identifier.
	pub client_id: String,
	/// Application secret.
	pub client_secret: Secret,
	/// Scope requested from the token endpoint.
	pub scope: String,
}
impl ClientCredentials {
	/// Creates a tuple that requests [`DEFAULT_SCOPE`].
	pub fn new(
		tenant_id: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			tenant_id: tenant_id.into(),
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			scope: DEFAULT_SCOPE.into(),
		}
	}

	/// Overrides the requested scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("tenant_id", &self.tenant_id)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scope", &self.scope)
			.finish()
	}
}
