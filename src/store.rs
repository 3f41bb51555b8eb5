//! Storage contract and built-in store implementation for credential records.
//!
//! Stores are plain key-value maps: the gate owns the check-then-increment sequence and
//! serializes it per key, so backends only need exact-match `get` and whole-record `put`.

pub mod memory;
pub mod seed;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CredentialRecord};

/// Storage backend contract implemented by credential stores.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the record keyed by the exact `api_key` string, if present.
	fn get(&self, api_key: &str) -> Result<Option<CredentialRecord>, StoreError>;

	/// Persists or replaces the record keyed by `record.api_key`.
	fn put(&self, record: CredentialRecord) -> Result<(), StoreError>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
