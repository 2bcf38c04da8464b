//! Data models for sampled metrics.
//!
//! - [`system`]: per-category readings (CPU, memory, disk, network, thermal)
//! - [`snapshot`]: one sample of all enabled categories

mod snapshot;
mod system;

pub use snapshot::{STATE_FORMAT_VERSION, Snapshot};
pub use system::{CoreId, CpuCore, DiskDevice, MemoryInfo, NetInterface, Thermometer};
