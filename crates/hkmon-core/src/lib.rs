//! hkmon-core: sampling, delta and rendering engine for the hkmon panel
//! monitor.
//!
//! Provides:
//! - `collector`: `/proc` and `/sys` readers producing a [`storage::Snapshot`]
//! - `storage`: reading types, snapshot and the state file between runs
//! - `rates`: delta computation between two snapshots
//! - `models`: derived results (`DeltaResult` and friends)
//! - `render`: panel summary/detail text and markup
//! - `fmt`: size, bandwidth and alignment formatting helpers
//! - `util`: clock and user identity helpers

pub mod categories;
pub mod collector;
pub mod fmt;
pub mod models;
pub mod rates;
pub mod render;
pub mod storage;
pub mod util;

pub use categories::Categories;
