//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

use std::collections::{BTreeMap, HashMap};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ CPU Parsers ============

/// One `cpu`/`cpuN` line from `/proc/stat`, as the kernel reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStat {
    /// `None` for the aggregate `cpu` line.
    pub cpu_id: Option<u16>,
    pub user: i64,
    pub nice: i64,
    pub system: i64,
    pub idle: i64,
    pub iowait: i64,
    pub irq: i64,
    pub softirq: i64,
    pub steal: i64,
    pub guest: i64,
    pub guest_nice: i64,
}

/// Parses the CPU lines of `/proc/stat`.
///
/// Missing trailing columns (old kernels have no steal/guest) read as zero.
pub fn parse_stat_cpus(content: &str) -> Result<Vec<CpuStat>, ParseError> {
    let mut cpus = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(key) = parts.first() else {
            continue;
        };
        let Some(suffix) = key.strip_prefix("cpu") else {
            continue;
        };

        let cpu_id = if suffix.is_empty() {
            None
        } else {
            Some(
                suffix
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid cpu id: {}", key)))?,
            )
        };

        let get_val =
            |idx: usize| -> i64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        cpus.push(CpuStat {
            cpu_id,
            user: get_val(1),
            nice: get_val(2),
            system: get_val(3),
            idle: get_val(4),
            iowait: get_val(5),
            irq: get_val(6),
            softirq: get_val(7),
            steal: get_val(8),
            guest: get_val(9),
            guest_nice: get_val(10),
        });
    }

    if !cpus.iter().any(|c| c.cpu_id.is_none()) {
        return Err(ParseError::new("no aggregate cpu line in stat"));
    }
    Ok(cpus)
}

/// Parses per-processor clock from `/proc/cpuinfo`.
///
/// Returns processor number → MHz. Architectures that do not report
/// `cpu MHz` yield an empty map.
pub fn parse_cpuinfo_mhz(content: &str) -> BTreeMap<u16, f64> {
    let mut result = BTreeMap::new();
    let mut processor: Option<u16> = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "processor" => processor = value.trim().parse().ok(),
            "cpu MHz" => {
                if let Some(id) = processor.take()
                    && let Ok(mhz) = value.trim().parse::<f64>()
                {
                    result.insert(id, mhz);
                }
            }
            _ => {}
        }
    }

    result
}

// ============ Memory Parser ============

/// Parsed data from `/proc/meminfo`. All values in kB.
#[derive(Debug, Clone, Default)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    /// Absent before Linux 3.14.
    pub mem_available: Option<u64>,
    pub buffers: u64,
    pub cached: u64,
    pub shmem: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Parses `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut info = MemInfo::default();
    let mut has_total = false;

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(value) = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
        else {
            continue;
        };

        match key {
            "MemTotal" => {
                info.mem_total = value;
                has_total = true;
            }
            "MemFree" => info.mem_free = value,
            "MemAvailable" => info.mem_available = Some(value),
            "Buffers" => info.buffers = value,
            "Cached" => info.cached = value,
            "Shmem" => info.shmem = value,
            "SwapTotal" => info.swap_total = value,
            "SwapFree" => info.swap_free = value,
            _ => {}
        }
    }

    if !has_total {
        return Err(ParseError::new("MemTotal missing in meminfo"));
    }
    Ok(info)
}

// ============ Disk Stats Parsers ============

/// Parsed data from `/proc/diskstats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskStats {
    /// Device name (sda, nvme0n1, etc.)
    pub device: String,
    /// Number of sectors read
    pub read_sectors: u64,
    /// Number of sectors written
    pub write_sectors: u64,
    /// Time spent doing I/Os (ms)
    pub io_time: u64,
}

/// Parses `/proc/diskstats` content.
///
/// Format: major minor name reads r_merged r_sectors r_time writes w_merged w_sectors w_time io_pending io_time w_io_time [discards ...]
pub fn parse_diskstats(content: &str) -> Result<Vec<DiskStats>, ParseError> {
    let mut disks = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue; // Skip malformed lines
        }

        let get_val =
            |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        disks.push(DiskStats {
            device: parts[2].to_string(),
            read_sectors: get_val(5),
            write_sectors: get_val(9),
            io_time: get_val(12),
        });
    }

    Ok(disks)
}

/// Parses `/proc/partitions` into device name → size in 1 KiB blocks.
///
/// Format:
/// ```text
/// major minor  #blocks  name
///
///    8        0  488386584 sda
/// ```
pub fn parse_partitions(content: &str) -> HashMap<String, u64> {
    let mut sizes = HashMap::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }
        let Ok(blocks) = parts[2].parse::<u64>() else {
            continue; // header
        };
        sizes.insert(parts[3].to_string(), blocks);
    }

    sizes
}

// ============ Network Device Stats Parser ============

/// Parsed data from `/proc/net/dev`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetDevStats {
    /// Interface name (eth0, lo, etc.)
    pub interface: String,
    /// Bytes received
    pub rx_bytes: u64,
    /// Bytes transmitted
    pub tx_bytes: u64,
}

/// Parses `/proc/net/dev` content.
///
/// Format:
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
pub fn parse_net_dev(content: &str) -> Result<Vec<NetDevStats>, ParseError> {
    let mut devices = Vec::new();

    for line in content.lines() {
        // Skip header lines
        if line.contains('|') || line.trim().is_empty() {
            continue;
        }

        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };

        let values: Vec<&str> = counters.split_whitespace().collect();
        if values.len() < 16 {
            continue;
        }

        let get_val =
            |idx: usize| -> u64 { values.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        devices.push(NetDevStats {
            interface: name.trim().to_string(),
            rx_bytes: get_val(0),
            tx_bytes: get_val(8),
        });
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_cpus() {
        let content = "\
cpu  48211 312 9120 611004 2240 0 801 7 300 20
cpu0 24105 156 4560 305502 1120 0 400 0 0 0
cpu1 24106 156 4560 305502 1120 0 401 7 300 20
intr 3311092 9 0 0 0 0 0 0 0 0 0 0 0 156 0 0 0
ctxt 7021544
btime 1712231882
processes 48813
";
        let cpus = parse_stat_cpus(content).unwrap();

        assert_eq!(cpus.len(), 3); // cpu + cpu0 + cpu1
        assert_eq!(cpus[0].cpu_id, None); // aggregate
        assert_eq!(cpus[0].user, 48211);
        assert_eq!(cpus[0].idle, 611004);
        assert_eq!(cpus[1].cpu_id, Some(0));
        assert_eq!(cpus[2].cpu_id, Some(1));
        assert_eq!(cpus[2].steal, 7);
        assert_eq!(cpus[2].guest, 300);
        assert_eq!(cpus[2].guest_nice, 20);
    }

    #[test]
    fn test_parse_stat_cpus_old_kernel_columns() {
        let cpus = parse_stat_cpus("cpu 10 20 30 40\n").unwrap();
        assert_eq!(cpus[0].idle, 40);
        assert_eq!(cpus[0].iowait, 0);
        assert_eq!(cpus[0].guest_nice, 0);
    }

    #[test]
    fn test_parse_stat_cpus_requires_aggregate() {
        assert!(parse_stat_cpus("cpu0 1 2 3 4\nctxt 5\n").is_err());
        assert!(parse_stat_cpus("").is_err());
        assert!(parse_stat_cpus("cpu 1 2 3 4\ncpuX 1 2 3 4\n").is_err());
    }

    #[test]
    fn test_parse_cpuinfo_mhz() {
        let content = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
cpu MHz\t\t: 1992.002
cache size\t: 8192 KB

processor\t: 1
vendor_id\t: GenuineIntel
cpu MHz\t\t: 800.000

";
        let mhz = parse_cpuinfo_mhz(content);
        assert_eq!(mhz.len(), 2);
        assert!((mhz[&0] - 1992.002).abs() < 1e-9);
        assert!((mhz[&1] - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cpuinfo_without_mhz() {
        let content = "\
processor\t: 0
BogoMIPS\t: 108.00
Features\t: fp asimd evtstrm

processor\t: 1
BogoMIPS\t: 108.00
";
        assert!(parse_cpuinfo_mhz(content).is_empty());
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:        7962312 kB
MemFree:          411860 kB
MemAvailable:    3518224 kB
Buffers:          204112 kB
Cached:          3120488 kB
SwapCached:         1032 kB
Active:          4409736 kB
SwapTotal:       2097148 kB
SwapFree:        2060284 kB
Shmem:            388120 kB
";
        let info = parse_meminfo(content).unwrap();

        assert_eq!(info.mem_total, 7962312);
        assert_eq!(info.mem_free, 411860);
        assert_eq!(info.mem_available, Some(3518224));
        assert_eq!(info.buffers, 204112);
        assert_eq!(info.cached, 3120488);
        assert_eq!(info.shmem, 388120);
        assert_eq!(info.swap_total, 2097148);
        assert_eq!(info.swap_free, 2060284);
    }

    #[test]
    fn test_parse_meminfo_old_kernel() {
        let info = parse_meminfo("MemTotal: 1000 kB\nMemFree: 100 kB\n").unwrap();
        assert_eq!(info.mem_available, None);
        assert!(parse_meminfo("MemFree: 100 kB\n").is_err());
    }

    #[test]
    fn test_parse_diskstats() {
        let content = "\
   8       0 sda 40112 812 2210434 18001 9920 4410 811920 30044 0 21876 48511 0 0 0 0
   8       1 sda1 402 0 10224 88 2 0 8 1 0 96 89 0 0 0 0
 259       0 nvme0n1 221087 5120 9913272 41020 184410 99812 7712840 220981 3 118722 262001 0 0 0 0
   7       0 loop0 1 2 3
";
        let disks = parse_diskstats(content).unwrap();

        assert_eq!(disks.len(), 3);

        assert_eq!(disks[0].device, "sda");
        assert_eq!(disks[0].read_sectors, 2210434);
        assert_eq!(disks[0].write_sectors, 811920);
        assert_eq!(disks[0].io_time, 21876);

        assert_eq!(disks[2].device, "nvme0n1");
        assert_eq!(disks[2].read_sectors, 9913272);
        assert_eq!(disks[2].io_time, 118722);
    }

    #[test]
    fn test_parse_partitions() {
        let content = "\
major minor  #blocks  name

   8        0  488386584 sda
   8        1     524288 sda1
 259        0 1000204632 nvme0n1
";
        let sizes = parse_partitions(content);
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes["sda"], 488386584);
        assert_eq!(sizes["nvme0n1"], 1000204632);
    }

    #[test]
    fn test_parse_net_dev() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  880412     6120    0    0    0     0          0         0   880412     6120    0    0    0     0       0          0
 wlan0: 512044871  402119    0   12    0     0          0      1881 40021877   190442    0    0    0     0       0          0
";
        let devices = parse_net_dev(content).unwrap();

        assert_eq!(devices.len(), 2);

        assert_eq!(devices[0].interface, "lo");
        assert_eq!(devices[0].rx_bytes, 880412);
        assert_eq!(devices[0].tx_bytes, 880412);

        assert_eq!(devices[1].interface, "wlan0");
        assert_eq!(devices[1].rx_bytes, 512044871);
        assert_eq!(devices[1].tx_bytes, 40021877);
    }

    #[test]
    fn test_parse_net_dev_no_space_after_colon() {
        let content = "  eth1:123456789 100 0 0 0 0 0 0 42 7 0 0 0 0 0 0\n";
        let devices = parse_net_dev(content).unwrap();
        assert_eq!(devices[0].interface, "eth1");
        assert_eq!(devices[0].rx_bytes, 123456789);
        assert_eq!(devices[0].tx_bytes, 42);
    }
}
