//! Collectors for Linux `/proc` filesystem.
//!
//! This module provides parsers and a collector for the system-wide counter
//! and gauge files under `/proc`.

pub mod parser;
pub mod system;

pub use system::SystemCollector;
