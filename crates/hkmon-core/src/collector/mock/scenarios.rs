//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` and `/sys` states
//! for testing various system conditions.

use super::filesystem::MockFs;

const NET_DEV_HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

impl MockFs {
    /// Creates a typical 4-core laptop.
    ///
    /// Includes: SATA disk with two partitions, NVMe disk with one partition,
    /// a device-mapper volume, loopback + wired + wireless interfaces, an
    /// ACPI thermal zone and an Intel `coretemp` chip.
    pub fn typical_system() -> Self {
        let mut fs = Self::laptop_without_sensors();

        fs.add_file("/sys/class/hwmon/hwmon0/name", "acpitz\n");
        fs.add_file("/sys/class/hwmon/hwmon0/temp1_input", "27800\n");
        fs.add_hwmon_chip(
            1,
            "coretemp",
            &[
                ("Package id 0", 55000),
                ("Core 0", 50000),
                ("Core 1", 53000),
                ("Core 2", 48000),
                ("Core 3", 51000),
            ],
            false,
        );

        fs
    }

    fn laptop_without_sensors() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/stat",
            "\
cpu  41200 880 12040 322000 3100 0 608 0 0 0
cpu0 10300 220 3010 80500 775 0 152 0 0 0
cpu1 10300 220 3010 80500 775 0 152 0 0 0
cpu2 10300 220 3010 80500 775 0 152 0 0 0
cpu3 10300 220 3010 80500 775 0 152 0 0 0
intr 8812004 9 0 0 0 0 0 0 0 0 0 0 0 156 0 0 0
ctxt 19022311
btime 1712004410
processes 61204
procs_running 3
procs_blocked 0
",
        );

        let mut cpuinfo = String::new();
        for (i, mhz) in ["2000.000", "2400.500", "800.000", "3000.000"].iter().enumerate() {
            cpuinfo.push_str(&format!(
                "processor\t: {i}\n\
                 vendor_id\t: GenuineIntel\n\
                 model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz\n\
                 cpu MHz\t\t: {mhz}\n\
                 cache size\t: 8192 KB\n\n"
            ));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        3072000 kB
Dirty:              1024 kB
Shmem:            204800 kB
",
        );

        fs.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 31877 2210 1843322 40211 12040 8831 720016 51120 0 61230 91544 0 0 0 0
   8       1 sda1 388 0 9120 97 4 0 16 2 0 120 99 0 0 0 0
   8       2 sda2 31420 2210 1832090 40080 12036 8831 720000 51118 0 61100 91400 0 0 0 0
 259       0 nvme0n1 188204 4410 8821770 33012 95120 51277 4410096 120884 2 71020 154020 0 0 0 0
 259       1 nvme0n1p1 188011 4410 8811400 32990 95120 51277 4410096 120884 0 70990 153990 0 0 0 0
 253       0 dm-0 192100 0 8809900 36004 146397 0 4410096 171220 0 70910 207224 0 0 0 0
",
        );
        fs.add_file(
            "/proc/partitions",
            "\
major minor  #blocks  name

   8        0  976762584 sda
   8        1     262144 sda1
   8        2  976499416 sda2
 259        0  500107608 nvme0n1
 259        1  500106240 nvme0n1p1
 253        0  500104192 dm-0
",
        );

        fs.add_file(
            "/proc/net/dev",
            format!(
                "{NET_DEV_HEADER}\
    lo: 4410822   30122    0    0    0     0          0         0  4410822   30122    0    0    0     0       0          0
  eth0: 2219043712 1802211    0    3    0     0          0      4120 310455081  902114    0    0    0     0       0          0
 wlan0: 72011940   61034    0    0    0     0          0         0 18804410   22081    0    0    0     0       0          0
"
            ),
        );

        fs
    }

    /// Creates an old-kernel, single-core ARM-like system.
    ///
    /// `/proc/stat` lacks the steal/guest columns, `/proc/cpuinfo` has no
    /// `cpu MHz`, `/proc/meminfo` has no `MemAvailable`, and there is no
    /// hwmon class at all.
    pub fn minimal_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/stat",
            "\
cpu  500 0 300 9000 100 0 10
cpu0 500 0 300 9000 100 0 10
ctxt 1000
",
        );
        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
BogoMIPS\t: 108.00
Features\t: fp asimd evtstrm crc32

Hardware\t: BCM2835
",
        );
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:         949448 kB
MemFree:          402912 kB
Buffers:           31740 kB
Cached:           301112 kB
SwapTotal:             0 kB
SwapFree:              0 kB
",
        );
        fs.add_file(
            "/proc/diskstats",
            " 179       0 mmcblk0 3000 10 120000 900 800 20 64000 1200 0 1500 2100\n",
        );
        fs.add_file(
            "/proc/partitions",
            "major minor  #blocks  name\n\n 179        0   31166976 mmcblk0\n",
        );
        fs.add_file(
            "/proc/net/dev",
            format!(
                "{NET_DEV_HEADER}\
    lo:    1000      10    0    0    0     0          0         0     1000      10    0    0    0     0       0          0
"
            ),
        );

        fs
    }

    /// Creates a virtual machine with steal and guest time accounted.
    ///
    /// Uses the legacy `device/name` hwmon layout.
    pub fn virtual_machine() -> Self {
        let mut fs = Self::laptop_without_sensors();

        fs.add_file(
            "/proc/stat",
            "\
cpu  6000 300 2000 40000 500 100 50 900 1200 80
cpu0 3000 150 1000 20000 250 50 25 450 600 40
cpu1 3000 150 1000 20000 250 50 25 450 600 40
",
        );
        fs.add_file(
            "/proc/cpuinfo",
            "processor\t: 0\ncpu MHz\t\t: 2593.906\n\nprocessor\t: 1\ncpu MHz\t\t: 2593.906\n\n",
        );
        fs.add_hwmon_chip(0, "coretemp", &[("Core 0", 61000), ("Core 1", 59000)], true);

        fs
    }
}
