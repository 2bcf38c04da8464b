//! Shared formatting helpers for the panel output.
//!
//! All units are decimal (1 MB = 1 000 000 bytes) and every scale threshold
//! also picks the number of decimals, so values keep a stable width while
//! they grow.

const MB: f64 = 1e6;
const GB: f64 = 1e9;
const TB: f64 = 1e12;

const MB_U: u64 = 1_000_000;
const GB_U: u64 = 1_000_000_000;
const TB_U: u64 = 1_000_000_000_000;

// ---------------------------------------------------------------------------
// Sizes & bandwidth
// ---------------------------------------------------------------------------

/// Format byte count as a data size.
///
/// `"0 MB"`, `"5.00 MB"`, `"50.0 MB"`, `"500 MB"`, `"5.00 GB"`, `"50.0 GB"`,
/// `"500 GB"`. From 1 TB up, disk-like round sizes drop their trailing zero
/// decimals: `"1 TB"`, `"1.5 TB"`, `"2.56 TB"`; anything from 100 TB has no
/// decimals.
pub fn data_size(bytes: u64) -> String {
    let f = bytes as f64;
    if bytes < 5_000 {
        "0 MB".to_string()
    } else if bytes < 10 * MB_U {
        format!("{:.2} MB", f / MB)
    } else if bytes < 100 * MB_U {
        format!("{:.1} MB", f / MB)
    } else if bytes < GB_U {
        format!("{} MB", bytes / MB_U)
    } else if bytes < 10 * GB_U {
        format!("{:.2} GB", f / GB)
    } else if bytes < 100 * GB_U {
        format!("{:.1} GB", f / GB)
    } else if bytes < TB_U {
        format!("{} GB", bytes / GB_U)
    } else {
        let hundredths = bytes / (TB_U / 100);
        let decimals = if hundredths > 9999 || hundredths % 100 == 0 {
            0
        } else if hundredths % 10 == 0 {
            1
        } else {
            2
        };
        format!("{:.*} TB", decimals, f / TB)
    }
}

/// Format network bandwidth: `"999 Kbps"` below one megabit, `"1.000 Mbps"`
/// from there on.
pub fn net_bandwidth(bits_per_second: i64) -> String {
    net_bandwidth_aligned(bits_per_second, 0)
}

/// Like [`net_bandwidth`], with the number right-aligned to `width`.
pub fn net_bandwidth_aligned(bits_per_second: i64, width: usize) -> String {
    if bits_per_second < MB_U as i64 {
        format!("{:>width$} Kbps", bits_per_second / 1_000, width = width)
    } else {
        format!("{:>width$.3} Mbps", bits_per_second as f64 / MB, width = width)
    }
}

/// Format disk bandwidth: `"0.5 MB/s"`, `"250 MB/s"`, `"1.200 GB/s"`.
pub fn disk_bandwidth(bytes_per_second: f64) -> String {
    if bytes_per_second < MB {
        format!("{:.1} MB/s", bytes_per_second / MB)
    } else if bytes_per_second < GB {
        format!("{} MB/s", (bytes_per_second / MB) as i64)
    } else {
        format!("{:.3} GB/s", bytes_per_second / GB)
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Leading padding that right-aligns `value` against `max` (a power of ten).
///
/// Emits two spaces per digit `value` is narrower than `max`, two spaces
/// being the width of one digit in the panel font. Values below 1 are
/// padded as if they had a single digit. NaN gets no padding.
pub fn pad(max: u64, value: f64) -> String {
    let mut out = String::new();
    if value.is_nan() {
        return out;
    }
    let mut div = max as f64;
    loop {
        if value >= div && value >= 1.0 {
            break;
        }
        if value < 1.0 && div <= 1.0 {
            break;
        }
        out.push_str("  ");
        div /= 10.0;
    }
    out
}

/// `value` with `decimals` digits, preceded by [`pad`] against `max`.
pub fn padded(max: u64, value: f64, decimals: usize) -> String {
    format!("{}{:.*}", pad(max, value), decimals, value)
}
