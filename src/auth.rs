//! Auth-domain identifiers, API keys, tiers, and credential records.

pub mod id;
pub mod key;
pub mod record;
pub mod tier;

pub use id::*;
pub use key::*;
pub use record::*;
pub use tier::*;
