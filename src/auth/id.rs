//! Strongly typed owner identifiers attached to every credential record.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Owner identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Owner identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Owner identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Opaque identifier of the account holding an API key (e.g. `user_demo_456`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);
impl OwnerId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for OwnerId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for OwnerId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for OwnerId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<OwnerId> for String {
	fn from(value: OwnerId) -> Self {
		value.0
	}
}
impl TryFrom<String> for OwnerId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for OwnerId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Owner({})", self.0)
	}
}
impl Display for OwnerId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for OwnerId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn owner_ids_reject_whitespace_and_empty() {
		assert!(OwnerId::new(" user_test_123").is_err(), "Leading whitespace must be rejected.");
		assert!(OwnerId::new("user test").is_err());
		assert_eq!(OwnerId::new(""), Err(IdentifierError::Empty));

		let owner = OwnerId::new("user_demo_456").expect("Owner fixture should be valid.");

		assert_eq!(owner.as_ref(), "user_demo_456");
		assert_eq!(format!("{owner:?}"), "Owner(user_demo_456)");
	}

	#[test]
	fn serde_enforces_validation() {
		let owner: OwnerId =
			serde_json::from_str("\"user_test_123\"").expect("Owner should deserialize.");

		assert_eq!(owner.to_string(), "user_test_123");
		assert!(serde_json::from_str::<OwnerId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		OwnerId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert_eq!(
			OwnerId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN })
		);
	}
}
