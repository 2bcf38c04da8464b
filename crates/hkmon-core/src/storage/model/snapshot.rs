//! Snapshot: one sample of every enabled category.
//!
//! Each category is independently optional. Only the counter categories
//! (`cpu`, `disk`, `network`) are written to the state file; `memory` and
//! `thermal` are gauges and never survive an invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::system::{CoreId, CpuCore, DiskDevice, MemoryInfo, NetInterface, Thermometer};

/// Version tag written into every state file. A file with a different tag is
/// treated as if it did not exist.
pub const STATE_FORMAT_VERSION: &str = concat!("hkmon-state/", env!("CARGO_PKG_VERSION"));

/// One sample of all enabled categories.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    pub format_version: String,
    /// `CLOCK_MONOTONIC` at sampling time.
    pub timestamp_nanos: u64,
    pub cpu: Option<BTreeMap<CoreId, CpuCore>>,
    pub disk: Option<BTreeMap<String, DiskDevice>>,
    pub network: Option<BTreeMap<String, NetInterface>>,
    #[serde(skip)]
    pub memory: Option<MemoryInfo>,
    /// Keyed by sensor label, e.g. `Core 0`, `Package id 0`.
    #[serde(skip)]
    pub thermal: Option<BTreeMap<String, Thermometer>>,
}

impl Snapshot {
    /// Creates an empty snapshot stamped with the current format version.
    pub fn new(timestamp_nanos: u64) -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION.to_string(),
            timestamp_nanos,
            cpu: None,
            disk: None,
            network: None,
            memory: None,
            thermal: None,
        }
    }

    /// Returns a copy with the gauge categories dropped, i.e. what a state
    /// file round-trip preserves.
    pub fn counters_only(&self) -> Self {
        Self {
            memory: None,
            thermal: None,
            ..self.clone()
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cpu) = &self.cpu {
            parts.push(format!("cpu={}", cpu.len()));
        }
        if let Some(disk) = &self.disk {
            parts.push(format!("disk={}", disk.len()));
        }
        if let Some(net) = &self.network {
            parts.push(format!("net={}", net.len()));
        }
        if self.memory.is_some() {
            parts.push("mem".to_string());
        }
        if let Some(thermal) = &self.thermal {
            parts.push(format!("temp={}", thermal.len()));
        }
        if parts.is_empty() {
            "empty".to_string()
        } else {
            parts.join(" ")
        }
    }
}
