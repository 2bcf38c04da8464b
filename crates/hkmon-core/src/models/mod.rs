//! Results of comparing the current snapshot against the previous one.
//!
//! Every category is optional (present iff it was sampled this run) and every
//! derived value carries its own [`Derived`] state, so one missing counter
//! never hides the rest of the report.

use std::collections::BTreeMap;

use crate::storage::model::{CpuCore, MemoryInfo};

/// A value derived from a pair of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Derived<T> {
    /// The previous snapshot has no data for this entity (first run, new
    /// device, category just enabled).
    #[default]
    NoHistory,
    /// Previous data exists but no value can be derived: non-positive elapsed
    /// time, zero denominator or a counter that went backwards.
    Unknown,
    Known(T),
}

impl<T> Derived<T> {
    pub fn known(self) -> Option<T> {
        match self {
            Derived::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Derived::Known(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Derived<U> {
        match self {
            Derived::NoHistory => Derived::NoHistory,
            Derived::Unknown => Derived::Unknown,
            Derived::Known(v) => Derived::Known(f(v)),
        }
    }
}

/// Everything derived from one (current, previous) snapshot pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeltaResult {
    /// Seconds between the two samples.
    pub elapsed_secs: Derived<f64>,
    pub cpu: Option<CpuReport>,
    pub memory: Option<MemoryInfo>,
    pub disk: Option<DiskReport>,
    pub network: Option<NetworkReport>,
    pub thermal: Option<ThermalReport>,
}

// ---------------------------------------------------------------------------
// CPU
// ---------------------------------------------------------------------------

/// CPU time accounting classes, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuField {
    User,
    Nice,
    System,
    Idle,
    Iowait,
    Irq,
    Softirq,
    Steal,
    Guest,
    GuestNice,
}

impl CpuField {
    pub const ALL: [CpuField; 10] = [
        CpuField::User,
        CpuField::Nice,
        CpuField::System,
        CpuField::Idle,
        CpuField::Iowait,
        CpuField::Irq,
        CpuField::Softirq,
        CpuField::Steal,
        CpuField::Guest,
        CpuField::GuestNice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CpuField::User => "user",
            CpuField::Nice => "nice",
            CpuField::System => "system",
            CpuField::Idle => "idle",
            CpuField::Iowait => "iowait",
            CpuField::Irq => "irq",
            CpuField::Softirq => "softirq",
            CpuField::Steal => "steal",
            CpuField::Guest => "guest",
            CpuField::GuestNice => "guest nice",
        }
    }

    /// Classes that many kernels or machines never account (no
    /// virtualization, no interrupt accounting). These are hidden while
    /// their since-boot counter is zero.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            CpuField::Irq
                | CpuField::Softirq
                | CpuField::Steal
                | CpuField::Guest
                | CpuField::GuestNice
        )
    }

    pub fn value(self, core: &CpuCore) -> i64 {
        match self {
            CpuField::User => core.user,
            CpuField::Nice => core.nice,
            CpuField::System => core.system,
            CpuField::Idle => core.idle,
            CpuField::Iowait => core.iowait,
            CpuField::Irq => core.irq,
            CpuField::Softirq => core.softirq,
            CpuField::Steal => core.steal,
            CpuField::Guest => core.guest,
            CpuField::GuestNice => core.guest_nice,
        }
    }
}

/// Share of one accounting class.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuFieldShare {
    pub field: CpuField,
    /// Percentage of the interval's total time.
    pub percent: f64,
    /// Percentage of total time since boot.
    pub since_boot_percent: f64,
    /// Absolute since-boot counter.
    pub since_boot: i64,
}

/// Aggregate CPU usage over the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuUsage {
    pub used_percent: f64,
    /// One entry per [`CpuField::ALL`], same order.
    pub fields: Vec<CpuFieldShare>,
}

/// Usage of one numbered core over the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreUsage {
    pub id: u16,
    pub used_percent: f64,
    /// Mean clock of both samples.
    pub ghz: f64,
    /// `ghz` scaled by the used fraction.
    pub weighted_ghz: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuReport {
    pub aggregate: Derived<CpuUsage>,
    /// Cores with a usable interval, highest weighted GHz first.
    pub ranked_cores: Vec<CoreUsage>,
    /// Sum of `weighted_ghz` over `ranked_cores`.
    pub weighted_ghz: f64,
    /// Numbered cores in the current sample.
    pub core_count: usize,
}

// ---------------------------------------------------------------------------
// Disk & network
// ---------------------------------------------------------------------------

/// Change of one byte counter over the interval.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CounterRate {
    /// Current absolute value.
    pub total: u64,
    pub delta: Derived<u64>,
    pub per_second: Derived<f64>,
}

impl CounterRate {
    /// True when the counter moved during the interval.
    pub fn is_busy(&self) -> bool {
        matches!(self.delta, Derived::Known(d) if d > 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskRates {
    pub name: String,
    pub size_bytes: u64,
    pub read: CounterRate,
    pub written: CounterRate,
    /// Share of the interval the device had I/O in flight, capped at 100.
    pub busy_percent: Derived<f64>,
}

impl DiskRates {
    pub fn has_history(&self) -> bool {
        !matches!(self.read.delta, Derived::NoHistory)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskReport {
    /// Whether the previous snapshot carried disk data at all.
    pub has_history: bool,
    /// Sorted by device name.
    pub devices: Vec<DiskRates>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetRates {
    pub name: String,
    pub sent: CounterRate,
    pub received: CounterRate,
}

impl NetRates {
    /// Combined current totals, used to pick the busiest interface.
    pub fn traffic(&self) -> u64 {
        self.sent.total.saturating_add(self.received.total)
    }

    pub fn has_history(&self) -> bool {
        !matches!(self.sent.delta, Derived::NoHistory)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkReport {
    /// Whether the previous snapshot carried network data at all.
    pub has_history: bool,
    /// Sorted by interface name.
    pub interfaces: Vec<NetRates>,
}

// ---------------------------------------------------------------------------
// Thermal
// ---------------------------------------------------------------------------

/// Statistics over the sensors sharing a label prefix (`Core 0`, `Core 1`
/// → `Core`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorGroup {
    pub min_millicelsius: i32,
    pub max_millicelsius: i32,
    /// Integer running average, truncated at each step.
    pub avg_millicelsius: i32,
    pub count: u32,
    /// Label of the first sensor in the group, shown when it is alone.
    pub first_label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThermalReport {
    pub groups: BTreeMap<String, SensorGroup>,
    /// Highest reading across every sensor.
    pub max_millicelsius: Option<i32>,
}
