//! Cache entries and their lazy expiry policy.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::IssuedToken};

/// Lifecycle status of a cache entry at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus {
	/// The entry may be served.
	Active,
	/// The entry reached its (margin-adjusted) expiry and must be refetched.
	Expired,
}

/// Cached token value plus the instant it stops being served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
	/// Value shaped for the mode the entry was fetched with.
	pub value: IssuedToken,
	/// Instant the token endpoint responded.
	pub issued_at: OffsetDateTime,
	/// Instant after which the entry is treated as absent.
	pub expires_at: OffsetDateTime,
}
impl CacheEntry {
	/// Creates an entry with an absolute expiry.
	pub fn new(value: IssuedToken, issued_at: OffsetDateTime, expires_at: OffsetDateTime) -> Self {
		Self { value, issued_at, expires_at }
	}

	/// Creates an entry that expires `margin` before the token's advertised lifetime ends.
	///
	/// Lifetimes at or below the margin (including zero and negative values) produce an
	/// entry that is already expired at `issued_at`. Lifetimes past the representable range
	/// clamp to the latest representable instant.
	pub fn with_lifetime(
		value: IssuedToken,
		issued_at: OffsetDateTime,
		lifetime: Duration,
		margin: Duration,
	) -> Self {
		let remaining = lifetime.saturating_sub(margin);
		let expires_at = issued_at.checked_add(remaining).unwrap_or(if remaining.is_negative() {
			OffsetDateTime::UNIX_EPOCH
		} else {
			PrimitiveDateTime::MAX.assume_utc()
		});

		Self::new(value, issued_at, expires_at)
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> EntryStatus {
		if instant >= self.expires_at { EntryStatus::Expired } else { EntryStatus::Active }
	}

	/// Returns `true` if the entry must not be served at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), EntryStatus::Expired)
	}

	/// Time left before the entry expires, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::Secret;

	fn token() -> IssuedToken {
		IssuedToken::Token(Secret::new("access"))
	}

	#[test]
	fn lifetime_is_shortened_by_the_margin() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let entry =
			CacheEntry::with_lifetime(token(), issued, Duration::seconds(120), Duration::minutes(1));

		assert_eq!(entry.expires_at, macros::datetime!(2025-01-01 00:01 UTC));
		assert_eq!(entry.status_at(macros::datetime!(2025-01-01 00:00:59 UTC)), EntryStatus::Active);
		assert_eq!(entry.status_at(macros::datetime!(2025-01-01 00:01 UTC)), EntryStatus::Expired);
		assert_eq!(
			entry.remaining_at(macros::datetime!(2025-01-01 00:00:30 UTC)),
			Duration::seconds(30)
		);
	}

	#[test]
	fn lifetimes_within_the_margin_are_expired_immediately() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		for lifetime in [60, 30, 0, -10] {
			let entry = CacheEntry::with_lifetime(
				token(),
				issued,
				Duration::seconds(lifetime),
				Duration::seconds(60),
			);

			assert!(entry.is_expired_at(issued), "expires_in = {lifetime} must not be served.");
			assert_eq!(entry.remaining_at(issued), Duration::ZERO);
		}
	}

	#[test]
	fn oversized_lifetimes_clamp_to_the_far_future() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let entry = CacheEntry::with_lifetime(
			token(),
			issued,
			Duration::seconds(1_000_000_000_000),
			Duration::seconds(60),
		);

		assert_eq!(entry.expires_at, PrimitiveDateTime::MAX.assume_utc());
		assert_eq!(entry.status_at(issued), EntryStatus::Active);
	}
}
