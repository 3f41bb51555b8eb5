//! Provisioning seeds: JSON documents that describe which keys exist before the gate starts.
//!
//! A seed looks like:
//!
//! ```json
//! { "keys": [{ "api_key": "dcl_sk_test_123456789", "owner": "user_test_123", "tier": "pro" }] }
//! ```
//!
//! `limit` is optional and defaults to the tier limit. Every loaded record starts a fresh window.

// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, OwnerId, Tier},
	error::ConfigError,
	store::CredentialStore,
};

/// One provisioned key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedEntry {
	/// Key string callers will present.
	pub api_key: String,
	/// Account holding the key.
	pub owner: OwnerId,
	/// Plan tier.
	#[serde(default)]
	pub tier: Tier,
	/// Optional override of the tier limit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub limit: Option<u64>,
}

/// Provisioning document listing keys to load into a [`CredentialStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
	/// Keys to provision.
	pub keys: Vec<SeedEntry>,
}
impl Seed {
	/// Parses a seed document, reporting the JSON path of the first bad field.
	pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(payload);

		Ok(serde_path_to_error::deserialize(&mut deserializer)?)
	}

	/// Builds records whose windows start at `now`.
	pub fn into_records(self, now: OffsetDateTime) -> Result<Vec<CredentialRecord>, ConfigError> {
		self.keys
			.into_iter()
			.map(|entry| -> Result<CredentialRecord, ConfigError> {
				let mut builder = CredentialRecord::builder(entry.api_key, entry.owner)
					.tier(entry.tier)
					.window_start(now);

				if let Some(limit) = entry.limit {
					builder = builder.limit(limit);
				}

				Ok(builder.build()?)
			})
			.collect()
	}

	/// Validates every entry, then writes all records into `store`.
	///
	/// Returns the number of records written.
	pub fn load_into(self, store: &dyn CredentialStore, now: OffsetDateTime) -> Result<usize> {
		let records = self.into_records(now)?;
		let count = records.len();

		for record in records {
			store.put(record)?;
		}

		Ok(count)
	}
}

const DEMO_SEED: &str = r#"{
	"keys": [
		{ "api_key": "dcl_sk_test_123456789", "owner": "user_test_123", "tier": "pro" },
		{ "api_key": "dcl_sk_demo_987654321", "owner": "user_demo_456", "tier": "free" }
	]
}"#;

/// Built-in demo keys: one pro key for testing and one free key for the public demo.
pub fn demo() -> Result<Seed, ConfigError> {
	Seed::from_json(DEMO_SEED)
}
