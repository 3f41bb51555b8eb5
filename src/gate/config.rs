//! Gate configuration.

// self
use crate::{_prelude::*, auth::DEFAULT_WINDOW, error::ConfigError};

/// Longest accepted counting window, one 366-day year in seconds.
pub const MAX_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// Tunables for an [`AuthGate`](crate::gate::AuthGate).
///
/// Deserializes from `{"window_secs": 3600}`; missing fields fall back to defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
	/// Length of the counting window in seconds.
	pub window_secs: u64,
}
impl GateConfig {
	/// Overrides the counting window.
	pub fn with_window(mut self, window: Duration) -> Result<Self, ConfigError> {
		if !window.is_positive() {
			return Err(ConfigError::NonPositiveWindow { window });
		}

		self.window_secs = u64::try_from(window.whole_seconds()).unwrap_or(u64::MAX);

		self.validate()?;

		Ok(self)
	}

	/// Counting window as a [`Duration`].
	pub fn window(&self) -> Duration {
		Duration::seconds(i64::try_from(self.window_secs).unwrap_or(i64::MAX))
	}

	/// Rejects windows shorter than one second or longer than [`MAX_WINDOW_SECS`].
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.window_secs == 0 {
			return Err(ConfigError::NonPositiveWindow { window: self.window() });
		}
		if self.window_secs > MAX_WINDOW_SECS {
			return Err(ConfigError::WindowTooLong {
				window_secs: self.window_secs,
				max_secs: MAX_WINDOW_SECS,
			});
		}

		Ok(())
	}
}
impl Default for GateConfig {
	fn default() -> Self {
		Self { window_secs: u64::try_from(DEFAULT_WINDOW.whole_seconds()).unwrap_or(3_600) }
	}
}
