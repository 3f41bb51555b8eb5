//! Redacted API-key wrapper, key issuance, and log-safe fingerprints.

// std
use std::borrow::Borrow;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Literal prefix every valid API key starts with.
pub const CREDENTIAL_PREFIX: &str = "dcl_sk_";

const GENERATED_SUFFIX_LEN: usize = 26;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// API key presented by callers; kept out of `Debug`/`Display` output.
///
/// Equality, hashing, and [`Borrow<str>`] all operate on the exact key string so stores can
/// look records up with the raw header remainder and no normalization.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps a key string verbatim.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Issues a fresh key: the credential prefix followed by random lowercase base36 characters.
	pub fn generate() -> Self {
		let mut rng = rand::rng();
		let suffix = (0..GENERATED_SUFFIX_LEN)
			.map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
			.collect::<String>();

		Self(format!("{CREDENTIAL_PREFIX}{suffix}"))
	}

	/// Returns `true` when the key carries the literal credential prefix.
	pub fn has_valid_prefix(&self) -> bool {
		has_valid_prefix(&self.0)
	}

	/// Returns the inner key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Stable, log-safe fingerprint of the key.
	pub fn fingerprint(&self) -> String {
		fingerprint(&self.0)
	}
}
impl AsRef<str> for ApiKey {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Borrow<str> for ApiKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Prefix check applied to raw credentials before any store access.
pub fn has_valid_prefix(credential: &str) -> bool {
	credential.starts_with(CREDENTIAL_PREFIX)
}

/// Base64 (no padding) SHA-256 digest of a raw credential, safe for spans and metrics.
pub fn fingerprint(credential: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(credential.as_bytes());

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}
