//! System collector for the counter and gauge files under `/proc/`.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::collector::CollectError;
use crate::collector::procfs::parser::{
    parse_cpuinfo_mhz, parse_diskstats, parse_meminfo, parse_net_dev, parse_partitions,
    parse_stat_cpus,
};
use crate::collector::traits::FileSystem;
use crate::storage::model::{CoreId, CpuCore, DiskDevice, MemoryInfo, NetInterface};

const SECTOR_SIZE: u64 = 512;
const PARTITION_BLOCK_SIZE: u64 = 1024;

/// Collects system-wide metrics from `/proc/`.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn read(&self, name: &str) -> Result<(String, String), CollectError> {
        let path = format!("{}/{}", self.proc_path, name);
        let content = self
            .fs
            .read_to_string(Path::new(&path))
            .map_err(|e| CollectError::io(&path, e))?;
        Ok((path, content))
    }

    /// Collects CPU time accounting from `/proc/stat` and clocks from
    /// `/proc/cpuinfo`.
    ///
    /// Guest time is subtracted from `user`/`nice` here, so the stored
    /// fields are disjoint. The aggregate entry's frequency is the sum of
    /// all core frequencies.
    pub fn collect_cpu(&self) -> Result<BTreeMap<CoreId, CpuCore>, CollectError> {
        let (path, content) = self.read("stat")?;
        let stats = parse_stat_cpus(&content).map_err(|e| CollectError::parse(&path, e))?;

        let mut cores: BTreeMap<CoreId, CpuCore> = stats
            .into_iter()
            .map(|s| {
                let id = s.cpu_id.map_or(CoreId::Aggregate, CoreId::Core);
                let core = CpuCore {
                    user: s.user - s.guest,
                    nice: s.nice - s.guest_nice,
                    system: s.system,
                    idle: s.idle,
                    iowait: s.iowait,
                    irq: s.irq,
                    softirq: s.softirq,
                    steal: s.steal,
                    guest: s.guest,
                    guest_nice: s.guest_nice,
                    freq_hz: 0,
                };
                (id, core)
            })
            .collect();

        let (_, cpuinfo) = self.read("cpuinfo")?;
        let mut sum_hz = 0u64;
        for (processor, mhz) in parse_cpuinfo_mhz(&cpuinfo) {
            if let Some(core) = cores.get_mut(&CoreId::Core(processor)) {
                core.freq_hz = (mhz * 1e6) as u64;
                sum_hz += core.freq_hz;
            }
        }
        if let Some(all) = cores.get_mut(&CoreId::Aggregate) {
            all.freq_hz = sum_hz;
        }

        debug!(cores = cores.len(), sum_hz, "collected cpu");
        Ok(cores)
    }

    /// Collects memory gauges from `/proc/meminfo`.
    pub fn collect_memory(&self) -> Result<MemoryInfo, CollectError> {
        let (path, content) = self.read("meminfo")?;
        let info = parse_meminfo(&content).map_err(|e| CollectError::parse(&path, e))?;

        let kib = |v: u64| v.saturating_mul(1024);
        let available = info
            .mem_available
            .unwrap_or(info.mem_free + info.buffers + info.cached);

        Ok(MemoryInfo {
            total: kib(info.mem_total),
            available: kib(available),
            free: kib(info.mem_free),
            shared: kib(info.shmem),
            buffers: kib(info.buffers),
            cached: kib(info.cached),
            swap_total: kib(info.swap_total),
            swap_free: kib(info.swap_free),
        })
    }

    /// Collects whole-disk I/O counters from `/proc/diskstats`, sized from
    /// `/proc/partitions`.
    ///
    /// A name that starts with the previously kept device name is taken to
    /// be one of its partitions and skipped, as are device-mapper nodes, so
    /// each byte is counted once.
    pub fn collect_disks(&self) -> Result<BTreeMap<String, DiskDevice>, CollectError> {
        let (path, content) = self.read("diskstats")?;
        let stats = parse_diskstats(&content).map_err(|e| CollectError::parse(&path, e))?;

        let mut devices = BTreeMap::new();
        let mut last_kept: Option<String> = None;
        for disk in stats {
            if disk.device.is_empty() || disk.device.starts_with("dm") {
                continue;
            }
            if last_kept
                .as_deref()
                .is_some_and(|parent| disk.device.starts_with(parent))
            {
                continue;
            }
            last_kept = Some(disk.device.clone());
            devices.insert(
                disk.device,
                DiskDevice {
                    bytes_read: disk.read_sectors.saturating_mul(SECTOR_SIZE),
                    bytes_written: disk.write_sectors.saturating_mul(SECTOR_SIZE),
                    io_ms: disk.io_time,
                    size_bytes: 0,
                },
            );
        }

        let (_, partitions) = self.read("partitions")?;
        for (name, blocks) in parse_partitions(&partitions) {
            if let Some(device) = devices.get_mut(&name) {
                device.size_bytes = blocks.saturating_mul(PARTITION_BLOCK_SIZE);
            }
        }

        Ok(devices)
    }

    /// Collects network interface byte counters from `/proc/net/dev`.
    pub fn collect_network(&self) -> Result<BTreeMap<String, NetInterface>, CollectError> {
        let (path, content) = self.read("net/dev")?;
        let devices = parse_net_dev(&content).map_err(|e| CollectError::parse(&path, e))?;

        Ok(devices
            .into_iter()
            .map(|dev| {
                (
                    dev.interface,
                    NetInterface {
                        bytes_recv: dev.rx_bytes,
                        bytes_sent: dev.tx_bytes,
                    },
                )
            })
            .collect())
    }
}
