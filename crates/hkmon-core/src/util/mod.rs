//! Process-level helpers: clock and user identity.

/// Current `CLOCK_MONOTONIC` reading in nanoseconds.
///
/// Unlike `std::time::Instant` the value is comparable across processes,
/// which is what carrying a timestamp between invocations needs. Returns
/// `None` if the clock cannot be read.
#[cfg(unix)]
pub fn monotonic_nanos() -> Option<u64> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `clock_gettime(CLOCK_MONOTONIC, ...)` only writes to the
    // provided timespec, which is a valid, exclusively borrowed local.
    if unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) } != 0 {
        return None;
    }
    Some(
        (ts.tv_sec as u64)
            .saturating_mul(1_000_000_000)
            .saturating_add(ts.tv_nsec as u64),
    )
}

#[cfg(not(unix))]
pub fn monotonic_nanos() -> Option<u64> {
    None
}

/// Real user id of the calling process.
#[cfg(unix)]
pub fn current_uid() -> u32 {
    // SAFETY: getuid has no preconditions and cannot fail.
    unsafe { libc::getuid() }
}

#[cfg(not(unix))]
pub fn current_uid() -> u32 {
    0
}
