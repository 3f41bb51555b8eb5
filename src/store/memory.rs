//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, CredentialRecord},
	store::{CredentialStore, StoreError},
};

type StoreMap = Arc<RwLock<HashMap<ApiKey, CredentialRecord>>>;

/// Thread-safe storage backend that keeps records in-process; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Builds a store pre-populated with `records`.
	pub fn with_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
		let map = records.into_iter().map(|record| (record.api_key.clone(), record)).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no records are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Removes the record for `api_key` out of band, returning it when present.
	pub fn revoke(&self, api_key: &str) -> Option<CredentialRecord> {
		self.0.write().remove(api_key)
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self, api_key: &str) -> Result<Option<CredentialRecord>, StoreError> {
		Ok(self.0.read().get(api_key).cloned())
	}

	fn put(&self, record: CredentialRecord) -> Result<(), StoreError> {
		self.0.write().insert(record.api_key.clone(), record);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{OwnerId, Tier};

	fn record(key: &str) -> CredentialRecord {
		CredentialRecord::builder(key, OwnerId::new("user_test_123").expect("Owner is valid."))
			.tier(Tier::Pro)
			.build()
			.expect("Record fixture should build.")
	}

	#[test]
	fn clones_share_state() {
		let store = MemoryStore::default();
		let view = store.clone();

		store.put(record("dcl_sk_a")).expect("Put should succeed.");

		assert_eq!(view.len(), 1);
		assert!(view.get("dcl_sk_a").expect("Get should succeed.").is_some());
	}

	#[test]
	fn lookup_is_exact() {
		let store = MemoryStore::with_records([record("dcl_sk_a")]);

		assert!(store.get("dcl_sk_A").expect("Get should succeed.").is_none());
		assert!(store.get("dcl_sk_a ").expect("Get should succeed.").is_none());
		assert!(store.get("dcl_sk_").expect("Get should succeed.").is_none());
	}

	#[test]
	fn revoke_removes_only_the_named_key() {
		let store = MemoryStore::with_records([record("dcl_sk_a"), record("dcl_sk_b")]);

		assert!(store.revoke("dcl_sk_a").is_some());
		assert!(store.revoke("dcl_sk_a").is_none());
		assert_eq!(store.len(), 1);
		assert!(store.get("dcl_sk_b").expect("Get should succeed.").is_some());
	}
}
