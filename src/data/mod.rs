//! Derived display data.
//!
//! Pure helpers that turn wire types into what the tables and chart
//! show. Nothing here is stored: statuses and formatted cells are
//! recomputed from view state on every frame, so they can never lag
//! behind the data they were derived from.
//!
//! ## Submodules
//!
//! - [`status`]: probe status derivation ([`ProbeStatus`])
//! - [`format`]: cell formatting for milliseconds, percentages, timestamps

pub mod format;
pub mod status;

pub use format::{format_availability, format_ms, format_timestamp};
pub use status::{probe_status, ProbeStatus};
