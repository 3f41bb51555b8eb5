//! Gate-level error types shared across the store, provisioning, and configuration layers.
//!
//! Rejections (missing key, invalid key, rate limited) are ordinary decisions and never show up
//! here; see [`crate::gate::Rejection`].

// self
use crate::_prelude::*;

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical gate error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or provisioning problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and provisioning failures raised before a key ever reaches the gate.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Seed document could not be parsed.
	#[error("Provisioning seed is malformed.")]
	InvalidSeed {
		/// Structured parsing failure, including the JSON path of the bad field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Credential record builder validation failed.
	#[error("Unable to build credential record.")]
	RecordBuild(#[from] crate::auth::RecordBuilderError),
	/// Counting window must be strictly positive.
	#[error("The counting window must be positive, got {window}.")]
	NonPositiveWindow {
		/// Rejected window length.
		window: Duration,
	},
	/// Counting window exceeds the supported maximum.
	#[error("The counting window of {window_secs}s exceeds the {max_secs}s maximum.")]
	WindowTooLong {
		/// Rejected window length in seconds.
		window_secs: u64,
		/// Longest accepted window in seconds.
		max_secs: u64,
	},
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(source: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::InvalidSeed { source }
	}
}
