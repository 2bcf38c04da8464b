//! Kernel counter collection for Linux.
//!
//! Reads `/proc` and `/sys` into the reading types of
//! [`crate::storage::model`], with support for mocking for testing on macOS.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Collector                           │
//! │  ┌─────────────────────┐   ┌─────────────────────────────┐  │
//! │  │  ThermalCollector   │   │     SystemCollector         │  │
//! │  │  - /sys/class/hwmon │   │  - /proc/stat, cpuinfo      │  │
//! │  │                     │   │  - /proc/meminfo            │  │
//! │  └──────────┬──────────┘   │  - /proc/diskstats, net/dev │  │
//! │             │              └──────────────┬──────────────┘  │
//! │             └──────────────┬──────────────┘                 │
//! │                            │                                │
//! │                     ┌──────▼──────┐                         │
//! │                     │  FileSystem │ (trait)                 │
//! │                     └──────┬──────┘                         │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!                       ┌──────┴──────┐
//!                       │             │
//!                ┌──────▼──────┐ ┌────▼────────┐
//!                │   RealFs    │ │   MockFs    │
//!                │ (Linux)     │ │ (Testing)   │
//!                └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use hkmon_core::Categories;
//! use hkmon_core::collector::{Collector, MockFs};
//!
//! let collector = Collector::new(MockFs::typical_system(), "/proc", "/sys");
//! let snapshot = collector.collect(&Categories::all(), 0).unwrap();
//! assert!(snapshot.cpu.is_some());
//! ```

#[allow(clippy::module_inception)]
mod collector;
mod error;
pub mod hwmon;
pub mod mock;
pub mod procfs;
mod traits;

pub use collector::Collector;
pub use error::CollectError;
pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
