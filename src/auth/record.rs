//! Credential records, lazy window accounting, and their builder.

// crates.io
use time::Date;
// self
use crate::{
	_prelude::*,
	auth::{ApiKey, OwnerId, Tier},
};

/// Default counting window applied when nothing else is configured.
pub const DEFAULT_WINDOW: Duration = Duration::HOUR;

/// Quota state of a record inside its current window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaState {
	/// `used < limit`; the next call may be admitted.
	Open,
	/// `used >= limit`; calls are rejected until the window elapses.
	Saturated,
}

/// Errors produced by [`CredentialRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RecordBuilderError {
	/// The key does not carry the credential prefix and could never be looked up.
	#[error("API key must start with `dcl_sk_`.")]
	MissingPrefix,
	/// Seeded usage is above the record's limit.
	#[error("Usage {used} exceeds the limit {limit}.")]
	UsageExceedsLimit {
		/// Seeded usage count.
		used: u64,
		/// Configured limit.
		limit: u64,
	},
}

/// Server-side state tracking one API key's tier, limit, and usage window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Exact key string the record is looked up by.
	pub api_key: ApiKey,
	/// Account holding the key.
	pub owner: OwnerId,
	/// Plan tier the key was provisioned under.
	pub tier: Tier,
	/// Maximum admitted calls per window.
	pub limit: u64,
	/// Calls admitted since `window_start`.
	pub used: u64,
	/// Start of the current counting window.
	#[serde(with = "time::serde::rfc3339")]
	pub window_start: OffsetDateTime,
}
impl CredentialRecord {
	/// Returns a builder for a record keyed by `api_key`.
	pub fn builder(api_key: impl Into<String>, owner: OwnerId) -> CredentialRecordBuilder {
		CredentialRecordBuilder::new(ApiKey::new(api_key), owner)
	}

	/// Returns `true` once `window` has fully elapsed since `window_start`.
	pub fn window_elapsed_at(&self, now: OffsetDateTime, window: Duration) -> bool {
		now - self.window_start >= window
	}

	/// Closes an elapsed window, zeroing usage and restarting the window at `now`.
	///
	/// Returns `true` when a reset happened.
	pub fn reset_window_if_elapsed(&mut self, now: OffsetDateTime, window: Duration) -> bool {
		if !self.window_elapsed_at(now, window) {
			return false;
		}

		self.used = 0;
		self.window_start = now;

		true
	}

	/// Applies the lazy window reset, then reports whether another call fits in the window.
	///
	/// Never changes `used` except through the reset.
	pub fn is_within_limit_at(&mut self, now: OffsetDateTime, window: Duration) -> bool {
		self.reset_window_if_elapsed(now, window);

		self.used < self.limit
	}

	/// Convenience helper that checks the limit against the current UTC instant.
	pub fn is_within_limit(&mut self, window: Duration) -> bool {
		self.is_within_limit_at(OffsetDateTime::now_utc(), window)
	}

	/// Counts one admitted call.
	///
	/// Only meaningful after [`is_within_limit_at`](Self::is_within_limit_at) returned `true`
	/// for the same request.
	pub fn record_usage(&mut self) {
		self.used = self.used.saturating_add(1);
	}

	/// Quota state inside the current window, without applying any reset.
	pub fn quota_state(&self) -> QuotaState {
		if self.used < self.limit { QuotaState::Open } else { QuotaState::Saturated }
	}

	/// Calls left in the current window.
	pub fn remaining(&self) -> u64 {
		self.limit.saturating_sub(self.used)
	}

	/// Instant at which the current window closes, saturating at the latest representable instant.
	pub fn resets_at(&self, window: Duration) -> OffsetDateTime {
		self.window_start
			.checked_add(window)
			.unwrap_or_else(|| Date::MAX.midnight().assume_utc())
	}
}

/// Builder for [`CredentialRecord`].
#[derive(Clone, Debug)]
pub struct CredentialRecordBuilder {
	api_key: ApiKey,
	owner: OwnerId,
	tier: Tier,
	limit: Option<u64>,
	used: u64,
	window_start: Option<OffsetDateTime>,
}
impl CredentialRecordBuilder {
	fn new(api_key: ApiKey, owner: OwnerId) -> Self {
		Self { api_key, owner, tier: Tier::default(), limit: None, used: 0, window_start: None }
	}

	/// Sets the tier; the limit follows the tier unless overridden.
	pub fn tier(mut self, tier: Tier) -> Self {
		self.tier = tier;

		self
	}

	/// Overrides the tier's default limit.
	pub fn limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Seeds the usage counter.
	pub fn used(mut self, used: u64) -> Self {
		self.used = used;

		self
	}

	/// Sets the window start instant.
	pub fn window_start(mut self, instant: OffsetDateTime) -> Self {
		self.window_start = Some(instant);

		self
	}

	/// Consumes the builder and produces a [`CredentialRecord`].
	pub fn build(self) -> Result<CredentialRecord, RecordBuilderError> {
		if !self.api_key.has_valid_prefix() {
			return Err(RecordBuilderError::MissingPrefix);
		}

		let limit = self.limit.unwrap_or_else(|| self.tier.default_limit());

		if self.used > limit {
			return Err(RecordBuilderError::UsageExceedsLimit { used: self.used, limit });
		}

		Ok(CredentialRecord {
			api_key: self.api_key,
			owner: self.owner,
			tier: self.tier,
			limit,
			used: self.used,
			window_start: self.window_start.unwrap_or_else(OffsetDateTime::now_utc),
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn owner() -> OwnerId {
		OwnerId::new("user_demo_456").expect("Owner fixture should be valid.")
	}

	fn record(limit: u64, used: u64, window_start: OffsetDateTime) -> CredentialRecord {
		CredentialRecord::builder("dcl_sk_demo_987654321", owner())
			.limit(limit)
			.used(used)
			.window_start(window_start)
			.build()
			.expect("Record fixture should build.")
	}

	#[test]
	fn builder_defaults_limit_from_tier() {
		let record = CredentialRecord::builder("dcl_sk_test_123456789", owner())
			.tier(Tier::Pro)
			.build()
			.expect("Pro record should build.");

		assert_eq!(record.limit, 1_000);
		assert_eq!(record.used, 0);
		assert_eq!(record.quota_state(), QuotaState::Open);
	}

	#[test]
	fn builder_rejects_unprefixed_keys_and_overused_seeds() {
		assert_eq!(
			CredentialRecord::builder("bad_key_123", owner()).build(),
			Err(RecordBuilderError::MissingPrefix)
		);
		assert_eq!(
			CredentialRecord::builder("dcl_sk_x", owner()).limit(2).used(3).build(),
			Err(RecordBuilderError::UsageExceedsLimit { used: 3, limit: 2 })
		);
	}

	#[test]
	fn limit_blocks_at_equality() {
		let start = macros::datetime!(2025-06-01 10:00 UTC);
		let now = macros::datetime!(2025-06-01 10:30 UTC);
		let mut record = record(2, 0, start);

		assert!(record.is_within_limit_at(now, DEFAULT_WINDOW));
		record.record_usage();
		assert!(record.is_within_limit_at(now, DEFAULT_WINDOW));
		record.record_usage();
		assert!(!record.is_within_limit_at(now, DEFAULT_WINDOW));
		assert_eq!(record.quota_state(), QuotaState::Saturated);
		assert_eq!(record.remaining(), 0);
	}

	#[test]
	fn checks_without_recording_never_change_usage() {
		let start = macros::datetime!(2025-06-01 10:00 UTC);
		let now = macros::datetime!(2025-06-01 10:05 UTC);
		let mut record = record(5, 3, start);

		for _ in 0..10 {
			assert!(record.is_within_limit_at(now, DEFAULT_WINDOW));
		}

		assert_eq!(record.used, 3);
		assert_eq!(record.window_start, start);
	}

	#[test]
	fn elapsed_window_resets_on_next_check() {
		let start = macros::datetime!(2025-06-01 10:00 UTC);
		let exactly_one_hour = macros::datetime!(2025-06-01 11:00 UTC);
		let mut record = record(2, 2, start);

		assert!(!record.is_within_limit_at(
			macros::datetime!(2025-06-01 10:59:59 UTC),
			DEFAULT_WINDOW
		));
		assert!(record.is_within_limit_at(exactly_one_hour, DEFAULT_WINDOW));
		assert_eq!(record.used, 0);
		assert_eq!(record.window_start, exactly_one_hour);

		record.record_usage();

		assert_eq!(record.used, 1);
		assert_eq!(record.resets_at(DEFAULT_WINDOW), macros::datetime!(2025-06-01 12:00 UTC));
	}

	#[test]
	fn zero_limit_never_admits() {
		let start = macros::datetime!(2025-06-01 10:00 UTC);
		let mut record = record(0, 0, start);

		assert!(!record.is_within_limit_at(start, DEFAULT_WINDOW));
		assert!(!record.is_within_limit_at(start + Duration::hours(2), DEFAULT_WINDOW));
	}

	#[test]
	fn record_serializes_window_start_as_rfc3339() {
		let record = record(100, 0, macros::datetime!(2025-06-01 10:00 UTC));
		let payload = serde_json::to_value(&record).expect("Record should serialize to JSON.");

		assert_eq!(payload["window_start"], "2025-06-01T10:00:00Z");
		assert_eq!(payload["api_key"], "dcl_sk_demo_987654321");
		assert_eq!(payload["tier"], "free");
	}

	#[test]
	fn resets_at_saturates_instead_of_overflowing() {
		let start = macros::datetime!(2025-06-01 10:00 UTC);
		let record = record(1, 1, start);

		assert_eq!(record.resets_at(DEFAULT_WINDOW), macros::datetime!(2025-06-01 11:00 UTC));
		assert_eq!(
			record.resets_at(Duration::seconds(1_000_000_000_000)),
			Date::MAX.midnight().assume_utc()
		);
	}
}
