//! Per-category readings sampled from the kernel.
//!
//! Counters (CPU, disk, network) are carried across invocations in the state
//! file and diffed; gauges (memory, thermal) are only ever read fresh.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a CPU entry in `/proc/stat`.
///
/// `Aggregate` is the `cpu` line summing every core; it sorts before all
/// numbered cores.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoreId {
    Aggregate,
    Core(u16),
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreId::Aggregate => write!(f, "cpu"),
            CoreId::Core(n) => write!(f, "cpu{}", n),
        }
    }
}

/// CPU time accounting for one core (or the aggregate).
///
/// Source: `/proc/stat` columns 1..10, `/proc/cpuinfo` `cpu MHz`
///
/// Values are in jiffies. `user` and `nice` already have `guest` and
/// `guest_nice` subtracted, so every field is a disjoint accounting class.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CpuCore {
    /// Time in user mode, excluding guest time.
    pub user: i64,
    /// Time in niced user mode, excluding niced guest time.
    pub nice: i64,
    pub system: i64,
    pub idle: i64,
    pub iowait: i64,
    pub irq: i64,
    pub softirq: i64,
    /// Time stolen by the hypervisor.
    pub steal: i64,
    /// Time running a virtual CPU for a guest OS.
    pub guest: i64,
    /// Time running a niced guest.
    pub guest_nice: i64,
    /// Current clock in Hz. For the aggregate entry, the sum over all cores.
    pub freq_hz: u64,
}

impl CpuCore {
    /// Time spent doing work.
    pub fn used(&self) -> i64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.guest + self.guest_nice
    }

    /// All accounted time.
    pub fn total(&self) -> i64 {
        self.used() + self.idle + self.iowait + self.steal
    }

    /// Field-wise difference against an earlier sample of the same core.
    ///
    /// The kernel accounts guest time into `user`/`nice` and the two values
    /// are read non-atomically, so after subtracting guest time the derived
    /// counter can appear to step back by exactly one tick. When that happens
    /// the tick is given back to both the host field and its guest field.
    /// The resulting frequency is the mean of both samples.
    pub fn delta(&self, prev: &CpuCore) -> CpuCore {
        let user_fix = i64::from(self.user == prev.user - 1);
        let nice_fix = i64::from(self.nice == prev.nice - 1);

        CpuCore {
            user: self.user - prev.user + user_fix,
            nice: self.nice - prev.nice + nice_fix,
            system: self.system - prev.system,
            idle: self.idle - prev.idle,
            iowait: self.iowait - prev.iowait,
            irq: self.irq - prev.irq,
            softirq: self.softirq - prev.softirq,
            steal: self.steal - prev.steal,
            guest: self.guest - prev.guest + user_fix,
            guest_nice: self.guest_nice - prev.guest_nice + nice_fix,
            freq_hz: self.freq_hz.midpoint(prev.freq_hz),
        }
    }

    /// True when any accounting class went backwards (reboot, hotplug).
    pub fn has_regression(&self) -> bool {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .iter()
        .any(|v| *v < 0)
    }
}

/// System memory gauges, in bytes.
///
/// Source: `/proc/meminfo` (reported in kB, converted here)
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct MemoryInfo {
    /// Source: `MemTotal`
    pub total: u64,
    /// Source: `MemAvailable`, or `MemFree + Buffers + Cached` on old kernels
    pub available: u64,
    /// Source: `MemFree`
    pub free: u64,
    /// Source: `Shmem`
    pub shared: u64,
    /// Source: `Buffers`
    pub buffers: u64,
    /// Source: `Cached`
    pub cached: u64,
    /// Source: `SwapTotal`
    pub swap_total: u64,
    /// Source: `SwapFree`
    pub swap_free: u64,
}

/// Block device counters.
///
/// Source: `/proc/diskstats`, `/proc/partitions`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct DiskDevice {
    /// Sectors read × 512.
    pub bytes_read: u64,
    /// Sectors written × 512.
    pub bytes_written: u64,
    /// Milliseconds spent doing I/O (`io_ticks`).
    pub io_ms: u64,
    /// Device capacity from `/proc/partitions` (1 KiB blocks × 1024). Not diffed.
    pub size_bytes: u64,
}

/// Network interface byte counters.
///
/// Source: `/proc/net/dev` receive column 0, transmit column 8
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct NetInterface {
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

/// A single temperature sensor reading in milli-degrees Celsius.
///
/// Source: `/sys/class/hwmon/hwmonN/tempK_input`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Thermometer {
    pub millicelsius: i32,
}
