//! Main collector that combines the procfs and hwmon collectors.
//!
//! The `Collector` struct provides a unified interface for sampling every
//! enabled category into a `Snapshot`.

use std::time::Instant;

use tracing::debug;

use crate::categories::Categories;
use crate::collector::CollectError;
use crate::collector::hwmon::ThermalCollector;
use crate::collector::procfs::SystemCollector;
use crate::collector::traits::FileSystem;
use crate::storage::model::Snapshot;

/// Samples the enabled categories from `/proc` and `/sys`.
pub struct Collector<F: FileSystem + Clone> {
    system_collector: SystemCollector<F>,
    thermal_collector: ThermalCollector<F>,
}

impl<F: FileSystem + Clone> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `sys_path` - Base path to sysfs (usually "/sys")
    pub fn new(fs: F, proc_path: impl Into<String>, sys_path: impl Into<String>) -> Self {
        Self {
            system_collector: SystemCollector::new(fs.clone(), proc_path),
            thermal_collector: ThermalCollector::new(fs, sys_path),
        }
    }

    /// Reads every enabled category into a new snapshot.
    ///
    /// Fails if a `/proc` file of an enabled category cannot be read. Missing
    /// temperature sensors are not an error; the thermal category is then
    /// present but empty.
    pub fn collect(
        &self,
        categories: &Categories,
        timestamp_nanos: u64,
    ) -> Result<Snapshot, CollectError> {
        let start = Instant::now();
        let mut snapshot = Snapshot::new(timestamp_nanos);

        if categories.cpu {
            snapshot.cpu = Some(self.system_collector.collect_cpu()?);
        }
        if categories.memory {
            snapshot.memory = Some(self.system_collector.collect_memory()?);
        }
        if categories.disk {
            snapshot.disk = Some(self.system_collector.collect_disks()?);
        }
        if categories.network {
            snapshot.network = Some(self.system_collector.collect_network()?);
        }
        if categories.thermal {
            snapshot.thermal = Some(self.thermal_collector.collect());
        }

        debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            contents = %snapshot.describe(),
            "snapshot collected"
        );
        Ok(snapshot)
    }
}
