//! Fixed-size cache identities derived from credential tuples.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, OutputMode},
};

/// Field separator fed to the digest; ASCII unit separator never shows up in tenant ids,
/// client ids, secrets, or scope URIs.
const FIELD_SEPARATOR: u8 = 0x1f;

/// Opaque SHA-256 identity of a credential tuple.
///
/// The key is one-way: it can be logged and compared cheaply while the secret it was
/// derived from stays out of the map. [`Display`] renders the digest as unpadded base64.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey([u8; 32]);
impl CacheKey {
	/// Digests `tenant_id`, `client_id`, `client_secret`, and `scope`.
	pub fn derive(credentials: &ClientCredentials) -> Self {
		Self::digest(&Self::fields(credentials))
	}

	/// Digests the credential tuple together with the requested output mode.
	///
	/// The broker stores entries under this key so a `raw` entry can never satisfy a
	/// `token` request for the same tuple.
	pub fn derive_for(credentials: &ClientCredentials, mode: OutputMode) -> Self {
		let [tenant, client, secret, scope] = Self::fields(credentials);

		Self::digest(&[tenant, client, secret, scope, mode.as_str()])
	}

	/// Raw digest bytes.
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}

	fn fields(credentials: &ClientCredentials) -> [&str; 4] {
		[
			&credentials.tenant_id,
			&credentials.client_id,
			credentials.client_secret.expose(),
			&credentials.scope,
		]
	}

	fn digest(fields: &[&str]) -> Self {
		let mut hasher = Sha256::new();

		for (idx, field) in fields.iter().enumerate() {
			if idx > 0 {
				hasher.update([FIELD_SEPARATOR]);
			}

			hasher.update(field.as_bytes());
		}

		Self(hasher.finalize().into())
	}
}
impl Debug for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CacheKey({self})")
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&STANDARD_NO_PAD.encode(self.0))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn credentials(tenant: &str, client: &str, secret: &str, scope: &str) -> ClientCredentials {
		ClientCredentials::new(tenant, client, secret).with_scope(scope)
	}

	#[test]
	fn derivation_is_deterministic() {
		let a = credentials("tenant", "client", "secret", "scope");
		let b = credentials("tenant", "client", "secret", "scope");

		assert_eq!(CacheKey::derive(&a), CacheKey::derive(&b));
		assert_eq!(
			CacheKey::derive_for(&a, OutputMode::Raw),
			CacheKey::derive_for(&b, OutputMode::Raw)
		);
	}

	#[test]
	fn every_field_contributes_to_the_key() {
		let base = CacheKey::derive(&credentials("tenant", "client", "secret", "scope"));
		let variants = [
			credentials("tenant-2", "client", "secret", "scope"),
			credentials("tenant", "client-2", "secret", "scope"),
			credentials("tenant", "client", "secret-2", "scope"),
			credentials("tenant", "client", "secret", "scope-2"),
		];

		for variant in &variants {
			assert_ne!(CacheKey::derive(variant), base, "{variant:?} must not collide.");
		}
	}

	#[test]
	fn shifting_content_across_fields_changes_the_key() {
		let a = credentials("a:b", "c", "secret", "scope");
		let b = credentials("a", "b:c", "secret", "scope");
		let c = credentials("", "", "", "");
		let d = credentials("", "", "", "\u{1f}");

		assert_ne!(CacheKey::derive(&a), CacheKey::derive(&b));
		assert_ne!(CacheKey::derive(&c), CacheKey::derive(&d));
	}

	#[test]
	fn modes_partition_the_key_space() {
		let tuple = credentials("tenant", "client", "secret", "scope");
		let keys = OutputMode::ALL.map(|mode| CacheKey::derive_for(&tuple, mode));

		assert_ne!(keys[0], keys[1]);
		assert_ne!(keys[1], keys[2]);
		assert_ne!(keys[0], keys[2]);
		assert!(!keys.contains(&CacheKey::derive(&tuple)));
	}

	#[test]
	fn display_is_unpadded_base64_of_the_digest() {
		let key = CacheKey::derive(&credentials("tenant", "client", "secret", "scope"));
		let rendered = key.to_string();

		assert_eq!(rendered.len(), 43);
		assert!(!rendered.contains("secret"));
		assert_eq!(format!("{key:?}"), format!("CacheKey({rendered})"));
	}
}
