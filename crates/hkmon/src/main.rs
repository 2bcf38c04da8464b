//! hkmon - Hacker's panel monitor.
//!
//! Meant to be run periodically by the XFCE generic monitor plugin. Each run
//! samples the requested categories, compares them against the counters the
//! previous run saved, saves the new counters and prints one
//! `<txt>…</txt><tool>…</tool>` report on stdout.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;

use hkmon_core::Categories;
use hkmon_core::collector::{CollectError, Collector, FileSystem, RealFs};
use hkmon_core::rates::compute_deltas;
use hkmon_core::render::{Report, error_markup, render};
use hkmon_core::storage::{FileStateStore, StateError, StateStore};
use hkmon_core::util::{current_uid, monotonic_nanos};

/// Exit status for any failure after argument parsing.
const EXIT_FATAL: u8 = 2;

/// Panel monitor for CPU, memory, disk, network and temperature.
#[derive(Parser)]
#[command(name = "hkmon", about = "Panel monitor for the XFCE generic monitor plugin", version)]
struct Args {
    /// What to report: CPU, RAM, IO, NET, TEMP. Any other word enables NET
    /// and names the interface to show.
    #[arg(required = true, value_name = "CATEGORY")]
    categories: Vec<String>,

    /// Directory for the state file kept between runs.
    /// Defaults to $XDG_RUNTIME_DIR, falling back to the temp directory.
    #[arg(long, env = "HKMON_STATE_DIR", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Path to /sys filesystem (for testing/mocking).
    #[arg(long, default_value = "/sys")]
    sys_path: String,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Failure of one invocation.
#[derive(Debug)]
enum RunError {
    Clock,
    Collect(CollectError),
    State(StateError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Clock => write!(f, "cannot read the monotonic clock"),
            RunError::Collect(e) => write!(f, "{}", e),
            RunError::State(e) => write!(f, "{}", e),
        }
    }
}

impl RunError {
    /// OS error number shown in the panel, when the failure came from the OS.
    fn os_error(&self) -> Option<i32> {
        match self {
            RunError::Collect(e) => e.os_error(),
            RunError::Clock | RunError::State(_) => None,
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Clock => None,
            RunError::Collect(e) => Some(e),
            RunError::State(e) => Some(e),
        }
    }
}

impl From<CollectError> for RunError {
    fn from(e: CollectError) -> Self {
        RunError::Collect(e)
    }
}

impl From<StateError> for RunError {
    fn from(e: StateError) -> Self {
        RunError::State(e)
    }
}

/// Log level for the given flags. `-q` wins over `-v`.
fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initializes the tracing subscriber on stderr; stdout belongs to the panel.
/// `RUST_LOG` directives are honored on top of the level chosen by flags.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::from_default_env().add_directive(log_level(verbose, quiet).into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// One sample-compare-save cycle.
///
/// The new snapshot is saved before the report is rendered so the next run
/// has a baseline even if this one shows nothing yet. The previous snapshot
/// comes from the same location the new one is written to.
fn run<F, S>(
    collector: &Collector<F>,
    store: &mut S,
    categories: &Categories,
    now_nanos: u64,
) -> Result<Report, RunError>
where
    F: FileSystem + Clone,
    S: StateStore,
{
    let current = collector.collect(categories, now_nanos)?;
    let previous = store.replace(&current)?;
    match &previous {
        Some(prev) => debug!(
            age_ms = now_nanos.saturating_sub(prev.timestamp_nanos) / 1_000_000,
            contents = %prev.describe(),
            "previous snapshot loaded"
        ),
        None => debug!("no previous snapshot"),
    }

    let result = compute_deltas(&current, previous.as_ref());
    Ok(render(&result, categories))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let categories = Categories::from_words(&args.categories);
    debug!(?categories, "hkmon {} starting", env!("CARGO_PKG_VERSION"));

    let collector = Collector::new(RealFs::new(), &args.proc_path, &args.sys_path);
    let mut store = match &args.state_dir {
        Some(dir) => FileStateStore::in_dir(dir),
        None => FileStateStore::for_user(current_uid()),
    };

    let outcome = monotonic_nanos()
        .ok_or(RunError::Clock)
        .and_then(|now| run(&collector, &mut store, &categories, now));

    match outcome {
        Ok(report) => {
            print!("{}", report.to_markup());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            print!("{}", error_markup(&e.to_string(), e.os_error()));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkmon_core::collector::MockFs;
    use hkmon_core::render::PLACEHOLDER;
    use hkmon_core::storage::{MemoryStateStore, Snapshot};

    const SEC: u64 = 1_000_000_000;

    /// Store whose every write fails.
    struct ReadOnlyStore;

    impl StateStore for ReadOnlyStore {
        fn load(&self) -> Option<Snapshot> {
            None
        }

        fn save(&mut self, _snapshot: &Snapshot) -> Result<(), StateError> {
            Err(StateError::Unwritable(Vec::new()))
        }
    }

    #[test]
    fn args_accept_categories_and_flags() {
        let args = Args::try_parse_from([
            "hkmon",
            "CPU",
            "eth0",
            "-vv",
            "--state-dir",
            "/tmp/x",
        ])
        .unwrap();
        assert_eq!(args.categories, vec!["CPU", "eth0"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.state_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.proc_path, "/proc");
        assert_eq!(args.sys_path, "/sys");
    }

    #[test]
    fn args_require_a_category() {
        assert!(Args::try_parse_from(["hkmon"]).is_err());
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(log_level(0, false), Level::WARN);
        assert_eq!(log_level(1, false), Level::INFO);
        assert_eq!(log_level(2, false), Level::DEBUG);
        assert_eq!(log_level(5, false), Level::TRACE);
        assert_eq!(log_level(3, true), Level::ERROR);
    }

    #[test]
    fn run_saves_baseline_then_reports() {
        let collector = Collector::new(MockFs::typical_system(), "/proc", "/sys");
        let mut store = MemoryStateStore::new();
        let categories = Categories::from_words(&["NET", "CPU"]);

        let first = run(&collector, &mut store, &categories, SEC).unwrap();
        assert_eq!(first.summary, PLACEHOLDER);
        assert_eq!(store.load().unwrap().timestamp_nanos, SEC);

        let second = run(&collector, &mut store, &categories, 2 * SEC).unwrap();
        // counters did not move: eth0 is idle, cpu usage is undefined
        assert_eq!(
            second.summary,
            "     0 Kbps \u{25B3} \n     0 Kbps \u{25BD} \n     ?%"
        );
        assert!(second.detail.starts_with(" eth0: \u{2713}\n"));
        assert_eq!(store.load().unwrap().timestamp_nanos, 2 * SEC);
    }

    #[test]
    fn run_fails_on_missing_proc_file() {
        let collector = Collector::new(MockFs::new(), "/proc", "/sys");
        let mut store = MemoryStateStore::new();
        let categories = Categories::from_words(&["CPU"]);

        let err = run(&collector, &mut store, &categories, SEC).unwrap_err();
        assert!(matches!(err, RunError::Collect(_)));
        assert!(err.to_string().contains("/proc/stat"));
        assert_eq!(err.os_error(), None);
        assert!(store.load().is_none());
    }

    #[test]
    fn run_fails_when_state_is_unwritable() {
        let collector = Collector::new(MockFs::typical_system(), "/proc", "/sys");
        let categories = Categories::from_words(&["RAM"]);

        let err = run(&collector, &mut ReadOnlyStore, &categories, SEC).unwrap_err();
        assert!(matches!(err, RunError::State(_)));
        assert_eq!(err.os_error(), None);
        assert!(error_markup(&err.to_string(), err.os_error()).starts_with("<txt>ERROR</txt><tool>"));
    }

    #[test]
    fn run_reports_errno_of_unreadable_proc() {
        let dir = tempfile::tempdir().unwrap();
        let proc_path = dir.path().join("proc");
        let collector = Collector::new(RealFs::new(), proc_path.to_string_lossy(), "/sys");
        let mut store = MemoryStateStore::new();

        let err = run(&collector, &mut store, &Categories::from_words(&["RAM"]), SEC).unwrap_err();
        assert_eq!(err.os_error(), Some(libc::ENOENT));

        let markup = error_markup(&err.to_string(), err.os_error());
        assert!(markup.starts_with(&format!("<txt>ERROR {}</txt><tool>cannot read ", libc::ENOENT)));
        assert!(markup.contains("meminfo"));
    }
}
