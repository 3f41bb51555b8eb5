//! API-key gate for content endpoints: bearer extraction, tiered hourly quotas, and per-key atomic
//! admission behind an injectable credential store.
//!
//! Every content handler follows the same contract: hand the raw `Authorization` header to
//! [`AuthGate::authorize`](gate::AuthGate::authorize), render its response only when the
//! decision is [`Decision::Admitted`](gate::Decision::Admitted), and record usage on the
//! returned [`Admission`](gate::Admission).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod gate;
pub mod obs;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {color_eyre as _, tokio as _};
