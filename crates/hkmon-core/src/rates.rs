//! Delta computation between the current snapshot and the one persisted by
//! the previous invocation.
//!
//! Pure functions only: the same pair of snapshots always yields the same
//! [`DeltaResult`]. Categories are handled independently; an entity that
//! appears in only one of the two snapshots never affects the others.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    CoreUsage, CounterRate, CpuField, CpuFieldShare, CpuReport, CpuUsage, DeltaResult, Derived,
    DiskRates, DiskReport, NetRates, NetworkReport, SensorGroup, ThermalReport,
};
use crate::storage::model::{CoreId, CpuCore, DiskDevice, NetInterface, Snapshot, Thermometer};

const NANOS_PER_SEC: f64 = 1e9;
const HZ_PER_GHZ: f64 = 1e9;

// ---------------------------------------------------------------------------
// Delta helpers
// ---------------------------------------------------------------------------

/// Compute u64 delta, returning `None` on counter regression (reboot, wrap).
pub fn du64(curr: u64, prev: u64) -> Option<u64> {
    (curr >= prev).then_some(curr - prev)
}

/// `part` as a percentage of `whole`; zero when `whole` is not positive.
fn percent(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Seconds between two samples.
///
/// `NoHistory` without a previous snapshot; `Unknown` when the monotonic
/// clock did not advance (same tick, or a reboot reset it).
pub fn elapsed_secs(current: &Snapshot, previous: Option<&Snapshot>) -> Derived<f64> {
    let Some(prev) = previous else {
        return Derived::NoHistory;
    };
    if current.timestamp_nanos <= prev.timestamp_nanos {
        return Derived::Unknown;
    }
    Derived::Known((current.timestamp_nanos - prev.timestamp_nanos) as f64 / NANOS_PER_SEC)
}

/// Delta and per-second rate of one byte counter.
fn counter_rate(total: u64, prev: Option<u64>, elapsed: Derived<f64>) -> CounterRate {
    let Some(prev) = prev else {
        return CounterRate {
            total,
            ..Default::default()
        };
    };
    let Some(delta) = du64(total, prev) else {
        return CounterRate {
            total,
            delta: Derived::Unknown,
            per_second: Derived::Unknown,
        };
    };
    let per_second = match elapsed {
        Derived::Known(secs) => Derived::Known(delta as f64 / secs),
        _ => Derived::Unknown,
    };
    CounterRate {
        total,
        delta: Derived::Known(delta),
        per_second,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Derives every enabled category of `current` against `previous`.
///
/// A category is present in the result iff it is present in `current`.
/// Without a previous snapshot every derived value is
/// [`Derived::NoHistory`]; gauges (memory, thermal) never need one.
pub fn compute_deltas(current: &Snapshot, previous: Option<&Snapshot>) -> DeltaResult {
    let elapsed = elapsed_secs(current, previous);
    if matches!(elapsed, Derived::Unknown) {
        debug!(
            current = current.timestamp_nanos,
            previous = previous.map(|p| p.timestamp_nanos),
            "clock did not advance since previous sample"
        );
    }

    DeltaResult {
        elapsed_secs: elapsed,
        cpu: current
            .cpu
            .as_ref()
            .map(|cpu| cpu_report(cpu, previous.and_then(|p| p.cpu.as_ref()))),
        memory: current.memory.clone(),
        disk: current
            .disk
            .as_ref()
            .map(|disk| disk_report(disk, previous.and_then(|p| p.disk.as_ref()), elapsed)),
        network: current
            .network
            .as_ref()
            .map(|net| network_report(net, previous.and_then(|p| p.network.as_ref()), elapsed)),
        thermal: current.thermal.as_ref().map(thermal_report),
    }
}

// ---------------------------------------------------------------------------
// CPU
// ---------------------------------------------------------------------------

fn cpu_report(
    current: &BTreeMap<CoreId, CpuCore>,
    previous: Option<&BTreeMap<CoreId, CpuCore>>,
) -> CpuReport {
    let aggregate = match (
        current.get(&CoreId::Aggregate),
        previous.and_then(|p| p.get(&CoreId::Aggregate)),
    ) {
        (_, None) => Derived::NoHistory,
        (None, Some(_)) => Derived::Unknown,
        (Some(curr), Some(prev)) => cpu_usage(curr, prev),
    };

    let mut ranked_cores: Vec<CoreUsage> = current
        .iter()
        .filter_map(|(id, curr)| {
            let CoreId::Core(n) = *id else {
                return None;
            };
            let prev = previous?.get(id)?;
            core_usage(n, curr, prev)
        })
        .collect();
    ranked_cores.sort_by(|a, b| {
        b.weighted_ghz
            .total_cmp(&a.weighted_ghz)
            .then(b.id.cmp(&a.id))
    });

    CpuReport {
        aggregate,
        weighted_ghz: ranked_cores.iter().map(|c| c.weighted_ghz).sum(),
        ranked_cores,
        core_count: current
            .keys()
            .filter(|id| matches!(id, CoreId::Core(_)))
            .count(),
    }
}

fn cpu_usage(curr: &CpuCore, prev: &CpuCore) -> Derived<CpuUsage> {
    let delta = curr.delta(prev);
    let total = delta.total();
    if delta.has_regression() {
        debug!("aggregate cpu counters went backwards");
        return Derived::Unknown;
    }
    if total <= 0 {
        return Derived::Unknown;
    }

    let since_boot_total = curr.total();
    let fields = CpuField::ALL
        .iter()
        .map(|&field| CpuFieldShare {
            field,
            percent: percent(field.value(&delta), total),
            since_boot_percent: percent(field.value(curr), since_boot_total),
            since_boot: field.value(curr),
        })
        .collect();

    Derived::Known(CpuUsage {
        used_percent: percent(delta.used(), total),
        fields,
    })
}

/// Usage of one core; `None` when the interval is unusable for it.
fn core_usage(id: u16, curr: &CpuCore, prev: &CpuCore) -> Option<CoreUsage> {
    let delta = curr.delta(prev);
    let total = delta.total();
    if delta.has_regression() || total <= 0 {
        return None;
    }
    let used = delta.used() as f64 / total as f64;
    let ghz = delta.freq_hz as f64 / HZ_PER_GHZ;
    Some(CoreUsage {
        id,
        used_percent: used * 100.0,
        ghz,
        weighted_ghz: ghz * used,
    })
}

// ---------------------------------------------------------------------------
// Disk
// ---------------------------------------------------------------------------

fn disk_report(
    current: &BTreeMap<String, DiskDevice>,
    previous: Option<&BTreeMap<String, DiskDevice>>,
    elapsed: Derived<f64>,
) -> DiskReport {
    let devices = current
        .iter()
        .map(|(name, curr)| {
            let prev = previous.and_then(|p| p.get(name));
            let io_ms = prev.map(|p| du64(curr.io_ms, p.io_ms));
            let busy_percent = match (io_ms, elapsed) {
                (None, _) => Derived::NoHistory,
                (Some(Some(ms)), Derived::Known(secs)) => {
                    Derived::Known((ms as f64 / (secs * 1000.0) * 100.0).min(100.0))
                }
                _ => Derived::Unknown,
            };
            DiskRates {
                name: name.clone(),
                size_bytes: curr.size_bytes,
                read: counter_rate(curr.bytes_read, prev.map(|p| p.bytes_read), elapsed),
                written: counter_rate(curr.bytes_written, prev.map(|p| p.bytes_written), elapsed),
                busy_percent,
            }
        })
        .collect();

    DiskReport {
        has_history: previous.is_some(),
        devices,
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

fn network_report(
    current: &BTreeMap<String, NetInterface>,
    previous: Option<&BTreeMap<String, NetInterface>>,
    elapsed: Derived<f64>,
) -> NetworkReport {
    let interfaces = current
        .iter()
        .map(|(name, curr)| {
            let prev = previous.and_then(|p| p.get(name));
            NetRates {
                name: name.clone(),
                sent: counter_rate(curr.bytes_sent, prev.map(|p| p.bytes_sent), elapsed),
                received: counter_rate(curr.bytes_recv, prev.map(|p| p.bytes_recv), elapsed),
            }
        })
        .collect();

    NetworkReport {
        has_history: previous.is_some(),
        interfaces,
    }
}

// ---------------------------------------------------------------------------
// Thermal
// ---------------------------------------------------------------------------

/// Groups sensors by the first word of their label.
fn thermal_report(sensors: &BTreeMap<String, Thermometer>) -> ThermalReport {
    let mut report = ThermalReport::default();

    for (label, sensor) in sensors {
        let value = sensor.millicelsius;
        let category = label.split_once(' ').map_or(label.as_str(), |(head, _)| head);

        report.max_millicelsius = Some(report.max_millicelsius.map_or(value, |m| m.max(value)));

        report
            .groups
            .entry(category.to_string())
            .and_modify(|g| {
                let sum = i64::from(g.avg_millicelsius) * i64::from(g.count) + i64::from(value);
                g.avg_millicelsius = (sum / (i64::from(g.count) + 1)) as i32;
                g.count += 1;
                g.min_millicelsius = g.min_millicelsius.min(value);
                g.max_millicelsius = g.max_millicelsius.max(value);
            })
            .or_insert_with(|| SensorGroup {
                min_millicelsius: value,
                max_millicelsius: value,
                avg_millicelsius: value,
                count: 1,
                first_label: label.clone(),
            });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::model::MemoryInfo;

    // -- helpers --

    const SEC: u64 = 1_000_000_000;

    fn cpu(user: i64, system: i64, idle: i64, freq_hz: u64) -> CpuCore {
        CpuCore {
            user,
            system,
            idle,
            freq_hz,
            ..Default::default()
        }
    }

    fn cpu_snapshot(ts: u64, cores: Vec<(CoreId, CpuCore)>) -> Snapshot {
        let mut s = Snapshot::new(ts);
        s.cpu = Some(cores.into_iter().collect());
        s
    }

    fn disk(read: u64, written: u64, io_ms: u64) -> DiskDevice {
        DiskDevice {
            bytes_read: read,
            bytes_written: written,
            io_ms,
            size_bytes: 500_000_000_000,
        }
    }

    fn net_snapshot(ts: u64, ifaces: &[(&str, u64, u64)]) -> Snapshot {
        let mut s = Snapshot::new(ts);
        s.network = Some(
            ifaces
                .iter()
                .map(|&(name, recv, sent)| {
                    (
                        name.to_string(),
                        NetInterface {
                            bytes_recv: recv,
                            bytes_sent: sent,
                        },
                    )
                })
                .collect(),
        );
        s
    }

    fn thermal_snapshot(sensors: &[(&str, i32)]) -> Snapshot {
        let mut s = Snapshot::new(0);
        s.thermal = Some(
            sensors
                .iter()
                .map(|&(label, millicelsius)| (label.to_string(), Thermometer { millicelsius }))
                .collect(),
        );
        s
    }

    // -- elapsed --

    #[test]
    fn test_elapsed_secs() {
        let prev = Snapshot::new(10 * SEC);
        assert_eq!(elapsed_secs(&prev, None), Derived::NoHistory);
        assert_eq!(elapsed_secs(&Snapshot::new(12 * SEC), Some(&prev)), Derived::Known(2.0));
        assert_eq!(elapsed_secs(&Snapshot::new(10 * SEC), Some(&prev)), Derived::Unknown);
        assert_eq!(elapsed_secs(&Snapshot::new(SEC), Some(&prev)), Derived::Unknown);
    }

    // -- cpu --

    #[test]
    fn test_cpu_first_run_has_no_history() {
        let curr = cpu_snapshot(
            SEC,
            vec![
                (CoreId::Aggregate, cpu(100, 50, 1000, 4_000_000_000)),
                (CoreId::Core(0), cpu(100, 50, 1000, 2_000_000_000)),
            ],
        );
        let result = compute_deltas(&curr, None);

        let report = result.cpu.unwrap();
        assert_eq!(report.aggregate, Derived::NoHistory);
        assert!(report.ranked_cores.is_empty());
        assert_eq!(report.weighted_ghz, 0.0);
        assert_eq!(report.core_count, 1);
    }

    #[test]
    fn test_cpu_percentages_sum_to_100() {
        let prev = cpu_snapshot(
            SEC,
            vec![(
                CoreId::Aggregate,
                CpuCore {
                    user: 1000,
                    nice: 10,
                    system: 300,
                    idle: 9000,
                    iowait: 40,
                    irq: 7,
                    softirq: 3,
                    steal: 11,
                    guest: 5,
                    guest_nice: 1,
                    freq_hz: 0,
                },
            )],
        );
        let curr = cpu_snapshot(
            2 * SEC,
            vec![(
                CoreId::Aggregate,
                CpuCore {
                    user: 1033,
                    nice: 17,
                    system: 319,
                    idle: 9180,
                    iowait: 53,
                    irq: 9,
                    softirq: 8,
                    steal: 12,
                    guest: 8,
                    guest_nice: 2,
                    freq_hz: 0,
                },
            )],
        );

        let usage = compute_deltas(&curr, Some(&prev))
            .cpu
            .unwrap()
            .aggregate
            .known()
            .unwrap();

        let sum: f64 = usage.fields.iter().map(|f| f.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum = {}", sum);
        assert!(usage.fields.iter().all(|f| f.percent >= 0.0));
        assert_eq!(usage.fields.len(), 10);
        assert_eq!(usage.fields[0].field, CpuField::User);
        assert_eq!(usage.fields[0].since_boot, 1033);
        // 33+7+19+2+5+3+1 used of 264 ticks
        assert!((usage.used_percent - 70.0 / 264.0 * 100.0).abs() < 1e-9);
        let since_boot: f64 = usage.fields.iter().map(|f| f.since_boot_percent).sum();
        assert!((since_boot - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_guest_rounding_is_not_regression() {
        let mut p = cpu(100, 50, 1000, 0);
        p.guest = 20;
        let mut c = cpu(99, 60, 1100, 0);
        c.guest = 21;

        let prev = cpu_snapshot(SEC, vec![(CoreId::Aggregate, p)]);
        let curr = cpu_snapshot(2 * SEC, vec![(CoreId::Aggregate, c)]);

        let usage = compute_deltas(&curr, Some(&prev))
            .cpu
            .unwrap()
            .aggregate
            .known()
            .unwrap();
        let user = &usage.fields[0];
        assert_eq!(user.field, CpuField::User);
        assert_eq!(user.percent, 0.0);
    }

    #[test]
    fn test_cpu_regression_is_unknown() {
        let prev = cpu_snapshot(SEC, vec![(CoreId::Aggregate, cpu(5000, 500, 90000, 0))]);
        let curr = cpu_snapshot(2 * SEC, vec![(CoreId::Aggregate, cpu(10, 5, 100, 0))]);

        let report = compute_deltas(&curr, Some(&prev)).cpu.unwrap();
        assert_eq!(report.aggregate, Derived::Unknown);
    }

    #[test]
    fn test_cpu_zero_interval_is_unknown() {
        let s = cpu_snapshot(SEC, vec![(CoreId::Aggregate, cpu(100, 50, 1000, 0))]);
        let report = compute_deltas(&s, Some(&s)).cpu.unwrap();
        assert_eq!(report.aggregate, Derived::Unknown);
    }

    #[test]
    fn test_core_ranking() {
        let ghz = 1_000_000_000;
        let prev = cpu_snapshot(
            SEC,
            vec![
                (CoreId::Aggregate, cpu(0, 0, 0, 0)),
                (CoreId::Core(0), cpu(0, 0, 0, 2 * ghz)),
                (CoreId::Core(1), cpu(0, 0, 0, 2 * ghz)),
                (CoreId::Core(2), cpu(0, 0, 0, 3 * ghz)),
                (CoreId::Core(3), cpu(0, 0, 0, 2 * ghz)),
                (CoreId::Core(4), cpu(0, 0, 0, 2 * ghz)),
            ],
        );
        let curr = cpu_snapshot(
            2 * SEC,
            vec![
                (CoreId::Aggregate, cpu(200, 0, 200, 0)),
                // 50% of 2 GHz
                (CoreId::Core(0), cpu(50, 0, 50, 2 * ghz)),
                // same weight as core 0, higher id ranks first
                (CoreId::Core(1), cpu(25, 25, 50, 2 * ghz)),
                // 100% of 3 GHz
                (CoreId::Core(2), cpu(100, 0, 0, 3 * ghz)),
                // idle
                (CoreId::Core(3), cpu(0, 0, 100, 2 * ghz)),
                // no ticks at all
                (CoreId::Core(4), cpu(0, 0, 0, 2 * ghz)),
                // hot-plugged, no history
                (CoreId::Core(5), cpu(10, 0, 10, 2 * ghz)),
            ],
        );

        let report = compute_deltas(&curr, Some(&prev)).cpu.unwrap();
        let order: Vec<u16> = report.ranked_cores.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![2, 1, 0, 3]);

        let top = &report.ranked_cores[0];
        assert!((top.ghz - 3.0).abs() < 1e-9);
        assert!((top.used_percent - 100.0).abs() < 1e-9);
        assert!((report.weighted_ghz - 5.0).abs() < 1e-9);
        assert_eq!(report.core_count, 6);
    }

    #[test]
    fn test_core_frequency_is_averaged() {
        let prev = cpu_snapshot(
            SEC,
            vec![(CoreId::Core(0), cpu(0, 0, 0, 1_000_000_000))],
        );
        let curr = cpu_snapshot(
            2 * SEC,
            vec![(CoreId::Core(0), cpu(100, 0, 0, 3_000_000_000))],
        );

        let report = compute_deltas(&curr, Some(&prev)).cpu.unwrap();
        assert!((report.ranked_cores[0].ghz - 2.0).abs() < 1e-9);
        // no aggregate line in either sample
        assert_eq!(report.aggregate, Derived::NoHistory);
    }

    // -- disk --

    #[test]
    fn test_disk_rates() {
        let mut prev = Snapshot::new(10 * SEC);
        prev.disk = Some(BTreeMap::from([("sda".to_string(), disk(1000, 4000, 100))]));
        let mut curr = Snapshot::new(12 * SEC);
        curr.disk = Some(BTreeMap::from([
            ("sda".to_string(), disk(3000, 4000, 600)),
            ("sdb".to_string(), disk(10, 10, 10)),
        ]));

        let report = compute_deltas(&curr, Some(&prev)).disk.unwrap();
        assert!(report.has_history);
        assert_eq!(report.devices.len(), 2);

        let sda = &report.devices[0];
        assert_eq!(sda.name, "sda");
        assert_eq!(sda.read.total, 3000);
        assert_eq!(sda.read.delta, Derived::Known(2000));
        assert_eq!(sda.read.per_second, Derived::Known(1000.0));
        assert!(sda.read.is_busy());
        assert_eq!(sda.written.delta, Derived::Known(0));
        assert!(!sda.written.is_busy());
        // 500 ms of 2000 ms
        assert_eq!(sda.busy_percent, Derived::Known(25.0));

        let sdb = &report.devices[1];
        assert!(!sdb.has_history());
        assert_eq!(sdb.read.per_second, Derived::NoHistory);
        assert_eq!(sdb.busy_percent, Derived::NoHistory);
    }

    #[test]
    fn test_disk_busy_is_capped() {
        let mut prev = Snapshot::new(SEC);
        prev.disk = Some(BTreeMap::from([("sda".to_string(), disk(0, 0, 0))]));
        let mut curr = Snapshot::new(2 * SEC);
        curr.disk = Some(BTreeMap::from([("sda".to_string(), disk(0, 0, 1012))]));

        let report = compute_deltas(&curr, Some(&prev)).disk.unwrap();
        assert_eq!(report.devices[0].busy_percent, Derived::Known(100.0));
    }

    // -- network --

    #[test]
    fn test_network_rates_and_membership() {
        let prev = net_snapshot(SEC, &[("eth0", 1000, 500), ("tun0", 10, 10)]);
        let curr = net_snapshot(5 * SEC, &[("eth0", 9000, 500), ("wlan0", 70, 30)]);

        let report = compute_deltas(&curr, Some(&prev)).network.unwrap();
        let names: Vec<&str> = report.interfaces.iter().map(|i| i.name.as_str()).collect();
        // removed interfaces are simply absent
        assert_eq!(names, vec!["eth0", "wlan0"]);

        let eth0 = &report.interfaces[0];
        assert_eq!(eth0.received.per_second, Derived::Known(2000.0));
        assert_eq!(eth0.sent.delta, Derived::Known(0));
        assert_eq!(eth0.traffic(), 9500);
        assert!(eth0.has_history());

        let wlan0 = &report.interfaces[1];
        assert!(!wlan0.has_history());
        assert_eq!(wlan0.traffic(), 100);
    }

    #[test]
    fn test_network_counter_regression_is_unknown() {
        let prev = net_snapshot(SEC, &[("eth0", 1_000_000, 1_000_000)]);
        let curr = net_snapshot(2 * SEC, &[("eth0", 10, 2_000_000)]);

        let eth0 = &compute_deltas(&curr, Some(&prev)).network.unwrap().interfaces[0];
        assert_eq!(eth0.received.delta, Derived::Unknown);
        assert_eq!(eth0.received.per_second, Derived::Unknown);
        assert_eq!(eth0.sent.per_second, Derived::Known(1_000_000.0));
    }

    #[test]
    fn test_non_positive_elapsed_makes_rates_unknown() {
        let prev = net_snapshot(5 * SEC, &[("eth0", 100, 100)]);
        let curr = net_snapshot(5 * SEC, &[("eth0", 200, 100)]);

        let result = compute_deltas(&curr, Some(&prev));
        assert_eq!(result.elapsed_secs, Derived::Unknown);
        let eth0 = &result.network.unwrap().interfaces[0];
        assert_eq!(eth0.received.delta, Derived::Known(100));
        assert_eq!(eth0.received.per_second, Derived::Unknown);
    }

    #[test]
    fn test_absent_previous_leaves_every_rate_unknown() {
        let mut curr = net_snapshot(SEC, &[("eth0", 100, 100), ("lo", 5, 5)]);
        curr.disk = Some(BTreeMap::from([("sda".to_string(), disk(1, 2, 3))]));

        let result = compute_deltas(&curr, None);
        assert_eq!(result.elapsed_secs, Derived::NoHistory);

        let net = result.network.unwrap();
        assert!(!net.has_history);
        assert!(net.interfaces.iter().all(|i| {
            !i.sent.per_second.is_known() && !i.received.per_second.is_known()
        }));

        let disk = result.disk.unwrap();
        assert!(!disk.has_history);
        assert!(!disk.devices[0].read.per_second.is_known());
        assert!(!disk.devices[0].busy_percent.is_known());
    }

    #[test]
    fn test_category_missing_from_previous_has_no_history() {
        let prev = cpu_snapshot(SEC, vec![(CoreId::Aggregate, cpu(0, 0, 0, 0))]);
        let curr = net_snapshot(2 * SEC, &[("eth0", 100, 100)]);

        let result = compute_deltas(&curr, Some(&prev));
        assert!(result.cpu.is_none());
        let net = result.network.unwrap();
        assert!(!net.has_history);
        assert_eq!(net.interfaces[0].sent.per_second, Derived::NoHistory);
    }

    // -- gauges --

    #[test]
    fn test_memory_passthrough() {
        let mut curr = Snapshot::new(SEC);
        curr.memory = Some(MemoryInfo {
            total: 8 << 30,
            available: 4 << 30,
            ..Default::default()
        });
        let result = compute_deltas(&curr, None);
        assert_eq!(result.memory, curr.memory);
        assert!(result.cpu.is_none());
        assert!(result.thermal.is_none());
    }

    #[test]
    fn test_thermal_grouping() {
        let curr = thermal_snapshot(&[
            ("Package id 0", 55000),
            ("Core 0", 50000),
            ("Core 1", 53000),
            ("Core 2", 48000),
            ("Core 3", 51000),
        ]);

        let report = compute_deltas(&curr, None).thermal.unwrap();
        assert_eq!(report.max_millicelsius, Some(55000));
        assert_eq!(report.groups.len(), 2);

        let core = &report.groups["Core"];
        assert_eq!(core.count, 4);
        assert_eq!(core.min_millicelsius, 48000);
        assert_eq!(core.max_millicelsius, 53000);
        // running integer average: 50000, 51500, 50333, 50499
        assert_eq!(core.avg_millicelsius, 50499);
        assert_eq!(core.first_label, "Core 0");

        let package = &report.groups["Package"];
        assert_eq!(package.count, 1);
        assert_eq!(package.first_label, "Package id 0");
    }

    #[test]
    fn test_thermal_single_word_labels() {
        let curr = thermal_snapshot(&[("Tctl", 62125), ("Tccd1", 58000)]);
        let report = compute_deltas(&curr, None).thermal.unwrap();
        assert_eq!(report.groups.keys().collect::<Vec<_>>(), vec!["Tccd1", "Tctl"]);
        assert_eq!(report.max_millicelsius, Some(62125));
    }

    #[test]
    fn test_thermal_no_sensors() {
        let report = compute_deltas(&thermal_snapshot(&[]), None).thermal.unwrap();
        assert!(report.groups.is_empty());
        assert_eq!(report.max_millicelsius, None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let mut prev = net_snapshot(SEC, &[("eth0", 100, 200)]);
        prev.cpu = Some(BTreeMap::from([(CoreId::Aggregate, cpu(10, 10, 10, 0))]));
        let mut curr = net_snapshot(3 * SEC, &[("eth0", 400, 900)]);
        curr.cpu = Some(BTreeMap::from([(CoreId::Aggregate, cpu(20, 30, 40, 0))]));

        assert_eq!(
            compute_deltas(&curr, Some(&prev)),
            compute_deltas(&curr, Some(&prev))
        );
    }
}
