//! Panel text rendering.
//!
//! A [`Report`] has two blocks: a compact summary shown in the panel itself
//! and a detailed text shown as its tooltip. Both are wrapped in the
//! `<txt>`/`<tool>` markup understood by the panel's generic monitor plugin.
//!
//! Detail sections appear in a fixed order: network, CPU, memory, disks,
//! temperature. Values that cannot be derived are shown as [`UNKNOWN`].

use crate::categories::Categories;
use crate::fmt::{data_size, disk_bandwidth, net_bandwidth, net_bandwidth_aligned, pad, padded};
use crate::models::{
    CounterRate, CpuReport, DeltaResult, Derived, DiskReport, NetRates, NetworkReport,
    ThermalReport,
};
use crate::storage::model::MemoryInfo;

/// Summary shown when no category produced any summary text, so the panel
/// always has something to click on.
pub const PLACEHOLDER: &str = "Hacker's\nMonitor";

/// Marker for a value that could not be derived.
pub const UNKNOWN: &str = "?";

/// Detail lines listing per-core usage stop after this many cores.
pub const TOP_CORES: usize = 8;

const LOOPBACK: &str = "lo";
const MIB: u64 = 1024 * 1024;

const SENT_IDLE: &str = "\u{25B3}";
const SENT_BUSY: &str = "\u{25B2}";
const RECV_IDLE: &str = "\u{25BD}";
const RECV_BUSY: &str = "\u{25BC}";

/// Rendered panel text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Compact text, never empty.
    pub summary: String,
    pub detail: String,
}

impl Report {
    /// Wraps both blocks in panel markup.
    pub fn to_markup(&self) -> String {
        format!("<txt>{}</txt><tool>{}</tool>", self.summary, self.detail)
    }
}

/// Markup for an invocation that failed before anything could be rendered.
///
/// The panel shows `ERROR` followed by the OS error number when there is
/// one; the full message goes to the tooltip.
pub fn error_markup(message: &str, os_error: Option<i32>) -> String {
    let head = match os_error {
        Some(errno) => format!("ERROR {}", errno),
        None => "ERROR".to_string(),
    };
    format!("<txt>{}</txt><tool>{}</tool>", head, message.trim_end_matches('\n'))
}

/// Renders every enabled category of `result`.
pub fn render(result: &DeltaResult, categories: &Categories) -> Report {
    let mut summary = String::new();
    let mut detail = String::new();

    if categories.network
        && let Some(network) = &result.network
    {
        render_network(
            network,
            categories.interface.as_deref(),
            &mut summary,
            &mut detail,
        );
    }

    if categories.cpu
        && let Some(cpu) = &result.cpu
    {
        render_cpu(cpu, &mut summary, &mut detail);
    }

    if categories.memory
        && let Some(memory) = &result.memory
    {
        if categories.cpu && !categories.thermal {
            summary.push_str(&format!(" {}M\n", memory.available / MIB));
        }
        render_memory(memory, &mut detail);
    }

    if categories.disk
        && let Some(disk) = &result.disk
    {
        render_disks(disk, &mut detail);
    }

    if categories.thermal
        && let Some(thermal) = &result.thermal
    {
        render_thermal(thermal, &mut summary, &mut detail);
    }

    let summary = summary.trim_end_matches('\n');
    Report {
        summary: if summary.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            summary.to_string()
        },
        detail: detail.trim_end_matches('\n').to_string(),
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Picks the interface to report in the summary.
///
/// An explicit name is returned as is, even if no such interface exists.
/// Otherwise the interface with the highest sent+received total wins,
/// loopback excluded; on a tie the later one in name order wins.
pub fn select_interface<'a>(interfaces: &'a [NetRates], explicit: Option<&'a str>) -> Option<&'a str> {
    if explicit.is_some() {
        return explicit;
    }
    let mut best: Option<&NetRates> = None;
    for iface in interfaces.iter().filter(|i| i.name != LOOPBACK) {
        if best.is_none_or(|b| iface.traffic() >= b.traffic()) {
            best = Some(iface);
        }
    }
    best.map(|i| i.name.as_str())
}

fn bits_per_second(rate: &CounterRate) -> Derived<i64> {
    rate.per_second.map(|bytes| (bytes * 8.0) as i64)
}

fn render_network(
    network: &NetworkReport,
    explicit: Option<&str>,
    summary: &mut String,
    detail: &mut String,
) {
    if let Some(name) = explicit
        && !network.interfaces.iter().any(|i| i.name == name)
    {
        summary.push_str(&format!("{} is down\n", name));
    }
    if !network.has_history {
        return;
    }

    let selected = select_interface(&network.interfaces, explicit);
    for iface in &network.interfaces {
        let is_selected = selected == Some(iface.name.as_str());
        if !iface.has_history() || (iface.traffic() == 0 && !is_selected) {
            continue;
        }

        detail.push_str(&format!(" {}: ", iface.name));
        if is_selected {
            detail.push('\u{2713}');
        }
        detail.push('\n');

        for (rate, idle, busy) in [
            (&iface.sent, SENT_IDLE, SENT_BUSY),
            (&iface.received, RECV_IDLE, RECV_BUSY),
        ] {
            let icon = if rate.is_busy() { busy } else { idle };
            let bps = bits_per_second(rate);

            detail.push_str(&format!("    {}  {}", icon, data_size(rate.total)));
            match bps {
                Derived::Known(bps) if bps > 0 => {
                    detail.push_str(&format!(" - {}", net_bandwidth(bps)));
                }
                Derived::Known(_) => {}
                _ => detail.push_str(&format!(" - {}", UNKNOWN)),
            }
            detail.push_str(" \n");

            if is_selected {
                let text = match bps {
                    Derived::Known(bps) => net_bandwidth_aligned(bps, 6),
                    _ => format!("{:>6}", UNKNOWN),
                };
                summary.push_str(&format!("{} {} \n", text, icon));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CPU
// ---------------------------------------------------------------------------

fn render_cpu(cpu: &CpuReport, summary: &mut String, detail: &mut String) {
    let usage = match &cpu.aggregate {
        Derived::NoHistory => return,
        Derived::Unknown => {
            summary.push_str(&format!("{:>6}%", UNKNOWN));
            detail.push_str(&format!(" CPU \u{2699} {}%\n", UNKNOWN));
            return;
        }
        Derived::Known(usage) => usage,
    };

    summary.push_str(&format!("{:>6.1}%", usage.used_percent));

    detail.push_str(&format!(" CPU \u{2699} {:.2}% \u{2248} ", usage.used_percent));
    if cpu.weighted_ghz < 1.0 {
        detail.push_str(&format!("{} MHz:\n", (cpu.weighted_ghz * 1000.0) as u64));
    } else {
        detail.push_str(&format!("{:.1} GHz:\n", cpu.weighted_ghz));
    }

    for share in &usage.fields {
        if share.field.is_optional() && share.since_boot == 0 {
            continue;
        }
        detail.push_str(&format!(
            "   {}% {}  ({:.2}%) \n",
            padded(100, share.percent, 2),
            share.field.label(),
            share.since_boot_percent
        ));
    }

    let id_width = if cpu.core_count > 10 { 10 } else { 1 };
    for core in cpu.ranked_cores.iter().take(TOP_CORES) {
        detail.push_str(&format!(
            "   {}% cpu {}{}  @{} GHz \n",
            padded(100, core.used_percent, 2),
            pad(id_width, f64::from(core.id)),
            core.id,
            padded(10, core.ghz, 3)
        ));
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

fn render_memory(memory: &MemoryInfo, detail: &mut String) {
    let mib_line = |bytes: u64, what: &str| {
        let mib = bytes / MIB;
        format!("{}{} MiB {} \n", pad(1_000_000, mib as f64), mib, what)
    };

    detail.push_str(&format!(" Memory {} MiB:\n", memory.total / MIB));
    detail.push_str(&mib_line(memory.available, "available"));
    detail.push_str(&mib_line(memory.cached + memory.buffers, "cache/buff"));
    if memory.shared > 0 {
        detail.push_str(&mib_line(memory.shared, "shared"));
    }
    if memory.swap_total > 0 {
        let swap_of = format!("swap of {}", memory.swap_total / MIB);
        detail.push_str(&mib_line(
            memory.swap_total.saturating_sub(memory.swap_free),
            &swap_of,
        ));
    }
}

// ---------------------------------------------------------------------------
// Disks
// ---------------------------------------------------------------------------

fn render_disks(disk: &DiskReport, detail: &mut String) {
    if !disk.has_history {
        return;
    }

    for device in &disk.devices {
        if !device.has_history() || (device.read.total == 0 && device.written.total == 0) {
            continue;
        }

        detail.push_str(&format!(" {} \u{26C1} {}", device.name, data_size(device.size_bytes)));
        if let Derived::Known(busy) = device.busy_percent
            && busy > 0.0
        {
            detail.push_str(&format!(" ({:.0}% busy)", busy));
        }
        detail.push_str(":\n");

        for (rate, idle, busy) in [
            (&device.written, SENT_IDLE, SENT_BUSY),
            (&device.read, RECV_IDLE, RECV_BUSY),
        ] {
            let icon = if rate.is_busy() { busy } else { idle };
            detail.push_str(&format!("    {}  {}", icon, data_size(rate.total)));
            match (rate.delta, rate.per_second) {
                (Derived::Known(0), _) => {}
                (Derived::Known(_), Derived::Known(bytes)) => {
                    detail.push_str(&format!(" - {}", disk_bandwidth(bytes)));
                }
                _ => detail.push_str(&format!(" - {}", UNKNOWN)),
            }
            detail.push_str(" \n");
        }
    }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

fn render_thermal(thermal: &ThermalReport, summary: &mut String, detail: &mut String) {
    if let Some(max) = thermal.max_millicelsius
        && max >= 0
    {
        summary.push_str(&format!("{:>4}\u{BA}C\n", max / 1000));
    }

    if thermal.groups.is_empty() {
        return;
    }
    detail.push_str(" Temperature: \n");
    for (category, group) in thermal.groups.iter().rev() {
        if group.count == 1 {
            detail.push_str(&format!(
                "    {}: {}\u{BA}C \n",
                group.first_label,
                group.max_millicelsius / 1000
            ));
        } else {
            detail.push_str(&format!(
                "    \u{2206}{}\u{BA}C  \u{2207}{}\u{BA}C  \u{222B}{}\u{BA}C  ({} {}) \n",
                group.max_millicelsius / 1000,
                group.min_millicelsius / 1000,
                group.avg_millicelsius / 1000,
                group.count,
                category
            ));
        }
    }
}
