//! The API-key gate: bearer extraction, key lookup, lazy hourly windows, and per-key admission.
//!
//! [`AuthGate::authorize`] evaluates a raw `Authorization` header strictly in this order:
//!
//! 1. no `Bearer ` credential → [`RejectionKind::MissingCredential`] (401)
//! 2. key without the `dcl_sk_` prefix, or not provisioned → [`RejectionKind::InvalidCredential`]
//!    (401)
//! 3. window exhausted → [`RejectionKind::RateLimited`] (429)
//! 4. otherwise [`Decision::Admitted`]
//!
//! An [`Admission`] reserves one slot of the key's window. [`Admission::record_usage`] commits the
//! reservation as usage and dropping the admission releases it, so concurrent calls for one key can
//! never be admitted past its limit. The per-key lock only covers the read, check, and write
//! inside the gate; admissions may be held freely, including across `.await` points.

mod config;
mod metrics;
mod rejection;
mod slot;

pub use config::*;
pub use metrics::*;
pub use rejection::*;

// self
use crate::{
	_prelude::*,
	auth::{self, ApiKey, CredentialRecord, OwnerId, Tier},
	error::ConfigError,
	obs::{self, DecisionOutcome, GateSpan},
	store::CredentialStore,
};
use slot::{KeySlot, KeySlots, Reservation};

/// Literal scheme prefix the `Authorization` header must start with.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Returns the credential carried by a raw `Authorization` header value.
///
/// The header must start with exactly `Bearer `; the remainder is returned verbatim, without
/// trimming or case folding. An empty remainder counts as no credential.
pub fn extract_credential(header: Option<&str>) -> Option<&str> {
	header?.strip_prefix(BEARER_PREFIX).filter(|credential| !credential.is_empty())
}

/// Outcome of a gate decision.
#[derive(Debug)]
pub enum Decision<A = Admission> {
	/// The call may proceed.
	Admitted(A),
	/// The call must be answered with the rejection's status and body.
	Rejected(Rejection),
}
impl<A> Decision<A> {
	/// Returns `true` for [`Decision::Admitted`].
	pub fn is_admitted(&self) -> bool {
		matches!(self, Decision::Admitted(_))
	}

	/// Returns the rejection, if any.
	pub fn rejection(&self) -> Option<&Rejection> {
		match self {
			Decision::Admitted(_) => None,
			Decision::Rejected(rejection) => Some(rejection),
		}
	}

	/// Converts the decision into a `Result`, so handlers can use `?` on rejections.
	pub fn into_result(self) -> Result<A, Rejection> {
		match self {
			Decision::Admitted(admission) => Ok(admission),
			Decision::Rejected(rejection) => Err(rejection),
		}
	}
}

/// An admitted call whose usage has not been recorded yet.
///
/// Holds a reserved slot of the key's window; dropping it without
/// [`record_usage`](Self::record_usage) releases the slot and leaves the usage count untouched.
pub struct Admission {
	record: CredentialRecord,
	admitted_at: OffsetDateTime,
	window: Duration,
	store: Arc<dyn CredentialStore>,
	metrics: Arc<GateMetrics>,
	reservation: Reservation,
}
impl Admission {
	/// Record snapshot taken at admission, after any window reset.
	pub fn record(&self) -> &CredentialRecord {
		&self.record
	}

	/// Counts this call against the key's window and persists the record.
	///
	/// The increment applies to the stored record as it is now, so usage committed by other
	/// admissions in the meantime is kept. Returns the updated record.
	pub fn record_usage(self) -> Result<CredentialRecord> {
		let Self { record, admitted_at, window, store, metrics, reservation } = self;
		let recorded = reservation.commit(|| -> Result<CredentialRecord> {
			// Revoked while in flight; count the call without reviving the record.
			let Some(mut current) = store.get(record.api_key.expose())? else {
				let mut record = record;

				record.record_usage();

				return Ok(record);
			};

			current.reset_window_if_elapsed(admitted_at, window);
			current.record_usage();
			store.put(current.clone())?;

			Ok(current)
		})?;

		metrics.record_usage();
		obs::record_usage_recorded(recorded.tier);

		Ok(recorded)
	}
}
impl Debug for Admission {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Admission").field("record", &self.record).finish_non_exhaustive()
	}
}

/// Gate shared by every content endpoint; cheap to clone, clones share state.
#[derive(Clone)]
pub struct AuthGate {
	store: Arc<dyn CredentialStore>,
	config: GateConfig,
	/// Decision counters.
	pub metrics: Arc<GateMetrics>,
	slots: KeySlots,
}
impl AuthGate {
	/// Creates a gate over `store` with the default one-hour window.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self {
			store,
			config: GateConfig::default(),
			metrics: Arc::new(GateMetrics::default()),
			slots: Default::default(),
		}
	}

	/// Creates a gate over `store` with explicit configuration.
	pub fn with_config(
		store: Arc<dyn CredentialStore>,
		config: GateConfig,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self { config, ..Self::new(store) })
	}

	/// Active configuration.
	pub fn config(&self) -> &GateConfig {
		&self.config
	}

	/// Backing credential store.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Looks up the record for `credential`.
	///
	/// Keys without the `dcl_sk_` prefix return `None` without touching the store.
	pub fn lookup(&self, credential: &str) -> Result<Option<CredentialRecord>> {
		if !auth::has_valid_prefix(credential) {
			return Ok(None);
		}

		Ok(self.store.get(credential)?)
	}

	/// Authorizes a call against the current UTC instant.
	pub fn authorize(&self, header: Option<&str>) -> Result<Decision> {
		self.authorize_at(header, OffsetDateTime::now_utc())
	}

	/// Authorizes a call observed at `now`.
	///
	/// Rejections are returned as [`Decision::Rejected`]; `Err` only carries store failures.
	pub fn authorize_at(&self, header: Option<&str>, now: OffsetDateTime) -> Result<Decision> {
		let _span = GateSpan::new("authorize").entered();

		self.metrics.record_attempt();

		let Some(credential) = extract_credential(header) else {
			return Ok(self.reject(Rejection::new(RejectionKind::MissingCredential), None));
		};

		if self.lookup(credential)?.is_none() {
			return Ok(self.reject(
				Rejection::new(RejectionKind::InvalidCredential),
				Some(auth::fingerprint(credential)),
			));
		}

		let slot = self.slots.checkout(credential);
		let reserved = self.reserve(credential, &mut slot.lock(), now);

		match reserved {
			Ok(Ok(record)) => {
				self.metrics.record_admitted();
				obs::record_decision(DecisionOutcome::Admitted);

				Ok(Decision::Admitted(Admission {
					reservation: Reservation::new(self.slots.clone(), record.api_key.clone(), slot),
					record,
					admitted_at: now,
					window: self.config.window(),
					store: self.store.clone(),
					metrics: self.metrics.clone(),
				}))
			},
			Ok(Err(rejection)) => {
				self.slots.checkin(credential, &slot);

				Ok(self.reject(rejection, Some(auth::fingerprint(credential))))
			},
			Err(e) => {
				self.slots.checkin(credential, &slot);

				Err(e)
			},
		}
	}

	/// Authorizes a call and, when admitted, records its usage in the same step.
	pub fn admit(&self, header: Option<&str>) -> Result<Decision<CredentialRecord>> {
		self.admit_at(header, OffsetDateTime::now_utc())
	}

	/// [`admit`](Self::admit) observed at `now`.
	pub fn admit_at(
		&self,
		header: Option<&str>,
		now: OffsetDateTime,
	) -> Result<Decision<CredentialRecord>> {
		match self.authorize_at(header, now)? {
			Decision::Admitted(admission) => Ok(Decision::Admitted(admission.record_usage()?)),
			Decision::Rejected(rejection) => Ok(Decision::Rejected(rejection)),
		}
	}

	/// Issues a new key for `owner` at `tier`, stores a fresh record, and returns the key.
	pub fn provision(&self, owner: OwnerId, tier: Tier) -> Result<ApiKey> {
		self.provision_at(owner, tier, OffsetDateTime::now_utc())
	}

	/// [`provision`](Self::provision) with the first window starting at `now`.
	pub fn provision_at(&self, owner: OwnerId, tier: Tier, now: OffsetDateTime) -> Result<ApiKey> {
		let mut key = ApiKey::generate();

		while self.store.get(key.expose())?.is_some() {
			key = ApiKey::generate();
		}

		let record = CredentialRecord::builder(key.expose(), owner)
			.tier(tier)
			.window_start(now)
			.build()
			.map_err(ConfigError::from)?;

		self.store.put(record)?;

		Ok(key)
	}

	// Runs under the key's slot lock: re-read, lazy reset, then reserve one slot of the window.
	fn reserve(
		&self,
		credential: &str,
		slot: &mut KeySlot,
		now: OffsetDateTime,
	) -> Result<Result<CredentialRecord, Rejection>> {
		// The unguarded lookup may be stale.
		let Some(mut record) = self.store.get(credential)? else {
			return Ok(Err(Rejection::new(RejectionKind::InvalidCredential)));
		};
		let window = self.config.window();

		if record.reset_window_if_elapsed(now, window) {
			self.store.put(record.clone())?;
			obs::trace_window_reset(&record.api_key.fingerprint(), now);
		}
		if !record.is_within_limit_at(now, window) || record.remaining() <= slot.in_flight {
			let retry = RetryDirective::new(record.resets_at(window), now);

			return Ok(Err(Rejection::rate_limited(retry)));
		}

		slot.in_flight += 1;

		Ok(Ok(record))
	}

	fn reject<A>(&self, rejection: Rejection, key_fingerprint: Option<String>) -> Decision<A> {
		let outcome = rejection.kind.outcome();

		self.metrics.record_rejected(rejection.kind);
		obs::record_decision(outcome);
		obs::trace_rejection(outcome, key_fingerprint.as_deref());

		Decision::Rejected(rejection)
	}
}
impl Debug for AuthGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthGate")
			.field("config", &self.config)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
