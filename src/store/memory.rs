//! Thread-safe in-memory [`TokenStore`] scoped to the owning process.

// self
use crate::{
	_prelude::*,
	auth::{CacheEntry, CacheKey},
	store::{StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, CacheEntry>>>;

/// Process-local store; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of entries held, including expired ones.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if nothing has ever been stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns `true` if an entry (expired or not) exists for `key`.
	pub fn contains(&self, key: &CacheKey) -> bool {
		self.0.read().contains_key(key)
	}

	fn save_now(map: StoreMap, key: CacheKey, entry: CacheEntry) {
		map.write().insert(key, entry);
	}

	fn fetch_now(map: StoreMap, key: CacheKey) -> Option<CacheEntry> {
		map.read().get(&key).cloned()
	}
}
impl TokenStore for MemoryStore {
	fn save(&self, key: CacheKey, entry: CacheEntry) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::save_now(map, key, entry);

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<CacheEntry>> {
		let map = self.0.clone();
		let key = *key;

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}
}
