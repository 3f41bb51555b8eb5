// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::gate::RejectionKind;

/// Thread-safe counters for gate decisions, always available regardless of features.
#[derive(Debug, Default)]
pub struct GateMetrics {
	attempts: AtomicU64,
	admitted: AtomicU64,
	missing_credential: AtomicU64,
	invalid_credential: AtomicU64,
	rate_limited: AtomicU64,
	usage_recorded: AtomicU64,
}
impl GateMetrics {
	/// Returns the total number of authorization attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of admitted calls (recorded or not).
	pub fn admitted(&self) -> u64 {
		self.admitted.load(Ordering::Relaxed)
	}

	/// Returns the number of rejections of the given kind.
	pub fn rejected(&self, kind: RejectionKind) -> u64 {
		self.rejection_counter(kind).load(Ordering::Relaxed)
	}

	/// Returns the number of admissions whose usage was recorded.
	pub fn usage_recorded(&self) -> u64 {
		self.usage_recorded.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_admitted(&self) {
		self.admitted.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self, kind: RejectionKind) {
		self.rejection_counter(kind).fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_usage(&self) {
		self.usage_recorded.fetch_add(1, Ordering::Relaxed);
	}

	fn rejection_counter(&self, kind: RejectionKind) -> &AtomicU64 {
		match kind {
			RejectionKind::MissingCredential => &self.missing_credential,
			RejectionKind::InvalidCredential => &self.invalid_credential,
			RejectionKind::RateLimited => &self.rate_limited,
		}
	}
}
