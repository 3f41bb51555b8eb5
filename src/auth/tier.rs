//! Plan tiers and their provisioning-time hourly limits.

// self
use crate::_prelude::*;

/// Error returned when a tier label is unknown.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown tier `{label}`; expected free, pro, or enterprise.")]
pub struct UnknownTier {
	/// The rejected label.
	pub label: String,
}

/// Subscription tier attached to a credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
	/// 100 calls per hour.
	#[default]
	Free,
	/// 1,000 calls per hour.
	Pro,
	/// 10,000 calls per hour.
	Enterprise,
}
impl Tier {
	/// All tiers in ascending order of quota.
	pub const ALL: [Tier; 3] = [Tier::Free, Tier::Pro, Tier::Enterprise];

	/// Hourly call limit assigned when a key of this tier is provisioned.
	pub const fn default_limit(self) -> u64 {
		match self {
			Tier::Free => 100,
			Tier::Pro => 1_000,
			Tier::Enterprise => 10_000,
		}
	}

	/// Stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Tier::Free => "free",
			Tier::Pro => "pro",
			Tier::Enterprise => "enterprise",
		}
	}

	/// Public rate-limit description advertised by the API index.
	pub const fn describe(self) -> &'static str {
		match self {
			Tier::Free => "100 requests/hour",
			Tier::Pro => "1,000 requests/hour",
			Tier::Enterprise => "10,000 requests/hour",
		}
	}
}
impl Display for Tier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Tier {
	type Err = UnknownTier;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Tier::ALL
			.into_iter()
			.find(|tier| tier.as_str() == s)
			.ok_or_else(|| UnknownTier { label: s.to_owned() })
	}
}
