//! CPU temperature sensors from `/sys/class/hwmon`.
//!
//! Every reading here is optional: a machine without a supported chip, or
//! with unreadable sensor files, simply reports no thermometers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::traits::FileSystem;
use crate::storage::model::Thermometer;

/// hwmon driver names that expose per-core CPU temperatures.
const CPU_SENSOR_CHIPS: &[&str] = &["coretemp", "k10temp"];

/// Sensor indices probed are `1..MAX_SENSOR_INDEX`.
const MAX_SENSOR_INDEX: u32 = 64;

/// Reads CPU temperature sensors.
pub struct ThermalCollector<F: FileSystem> {
    fs: F,
    sys_path: String,
}

impl<F: FileSystem> ThermalCollector<F> {
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sys_path` - Base path to sysfs (usually "/sys")
    pub fn new(fs: F, sys_path: impl Into<String>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
        }
    }

    /// Returns the directory holding the first CPU temperature chip's files.
    ///
    /// Chips are probed in `hwmonN` order. Kernels before 3.15 keep the
    /// attributes under `hwmonN/device/`.
    pub fn find_cpu_chip(&self) -> Option<PathBuf> {
        let class = PathBuf::from(format!("{}/class/hwmon", self.sys_path));
        let entries = match self.fs.read_dir(&class) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %class.display(), error = %e, "no hwmon class");
                return None;
            }
        };

        let mut chips: Vec<(u32, PathBuf)> = entries
            .into_iter()
            .filter_map(|path| {
                let index = path
                    .file_name()?
                    .to_str()?
                    .strip_prefix("hwmon")?
                    .parse()
                    .ok()?;
                Some((index, path))
            })
            .collect();
        chips.sort();

        for (_, dir) in chips {
            let base = if self.fs.exists(&dir.join("name")) {
                dir
            } else {
                dir.join("device")
            };
            let Ok(name) = self.fs.read_to_string(&base.join("name")) else {
                continue;
            };
            if CPU_SENSOR_CHIPS.contains(&name.trim()) {
                debug!(chip = name.trim(), path = %base.display(), "found cpu sensor chip");
                return Some(base);
            }
        }
        None
    }

    /// Reads all labelled sensors of the CPU chip, keyed by label.
    ///
    /// Some CPUs start numbering at `temp2`, so leading gaps are skipped; the
    /// first gap after a sensor has been read ends the scan.
    pub fn collect(&self) -> BTreeMap<String, Thermometer> {
        let mut sensors = BTreeMap::new();
        let Some(base) = self.find_cpu_chip() else {
            return sensors;
        };

        for n in 1..MAX_SENSOR_INDEX {
            let Some(label) = self.read_line(&base.join(format!("temp{}_label", n))) else {
                if sensors.is_empty() {
                    continue;
                }
                break;
            };
            if label.is_empty() {
                break;
            }
            let Some(millicelsius) = self
                .read_line(&base.join(format!("temp{}_input", n)))
                .and_then(|v| v.parse::<i32>().ok())
            else {
                break;
            };
            sensors.insert(label, Thermometer { millicelsius });
        }

        sensors
    }

    fn read_line(&self, path: &Path) -> Option<String> {
        let content = self.fs.read_to_string(path).ok()?;
        Some(content.lines().next().unwrap_or("").trim_end().to_string())
    }
}
