//! Persisted state carrying the previous invocation's counters.
//!
//! File layout:
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HEADER (12 bytes)                            │
//! │   magic: [u8; 4]      = b"HKM1"              │
//! │   payload_len: u32    (little endian)        │
//! │   payload_crc: u32    (crc32 of payload)     │
//! ├──────────────────────────────────────────────┤
//! │ PAYLOAD                                      │
//! │   postcard(StateFile {                       │
//! │     format_version, timestamp_nanos,         │
//! │     sections: [(tag, postcard(category))]    │
//! │   })                                         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Anything that does not decode cleanly (missing file, torn write from a
//! concurrent invocation, foreign version) loads as "no previous state".
//! Sections are decoded one by one, so an unknown or damaged section only
//! loses that category.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::{STATE_FORMAT_VERSION, Snapshot};

const MAGIC: [u8; 4] = *b"HKM1";
const HEADER_SIZE: usize = 12;
const MAX_PAYLOAD_SIZE: usize = 4 * 1024 * 1024;

/// File name inside a per-user runtime directory.
pub const STATE_FILE_NAME: &str = "hkmon.dat";

const TAG_CPU: &str = "cpu";
const TAG_DISK: &str = "disk";
const TAG_NETWORK: &str = "network";

#[derive(Serialize, Deserialize)]
struct StateFile {
    format_version: String,
    timestamp_nanos: u64,
    sections: Vec<Section>,
}

#[derive(Serialize, Deserialize)]
struct Section {
    tag: String,
    payload: Vec<u8>,
}

/// Error saving state.
#[derive(Debug)]
pub enum StateError {
    /// The snapshot could not be serialized.
    Encode(String),
    /// Every candidate location rejected the write.
    Unwritable(Vec<(PathBuf, io::Error)>),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::Encode(msg) => write!(f, "cannot encode state: {}", msg),
            StateError::Unwritable(attempts) => {
                write!(f, "cannot write state file")?;
                for (path, err) in attempts {
                    write!(f, "\n{}: {}", path.display(), err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Storage for the snapshot handed from one invocation to the next.
pub trait StateStore {
    /// Returns the previously saved snapshot, or `None` if there is no usable one.
    fn load(&self) -> Option<Snapshot>;

    /// Replaces the stored snapshot.
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StateError>;

    /// Saves `snapshot` and returns the snapshot it replaced.
    fn replace(&mut self, snapshot: &Snapshot) -> Result<Option<Snapshot>, StateError> {
        let previous = self.load();
        self.save(snapshot)?;
        Ok(previous)
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

fn section<T: Serialize>(tag: &str, value: &T) -> Result<Section, StateError> {
    let payload = postcard::to_allocvec(value).map_err(|e| StateError::Encode(e.to_string()))?;
    Ok(Section {
        tag: tag.to_string(),
        payload,
    })
}

/// Serializes the counter categories of `snapshot` into a framed state file.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, StateError> {
    let mut sections = Vec::new();
    if let Some(cpu) = &snapshot.cpu {
        sections.push(section(TAG_CPU, cpu)?);
    }
    if let Some(disk) = &snapshot.disk {
        sections.push(section(TAG_DISK, disk)?);
    }
    if let Some(network) = &snapshot.network {
        sections.push(section(TAG_NETWORK, network)?);
    }

    let file = StateFile {
        format_version: snapshot.format_version.clone(),
        timestamp_nanos: snapshot.timestamp_nanos,
        sections,
    };
    let payload = postcard::to_allocvec(&file).map_err(|e| StateError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decodes a framed state file. Returns `None` for anything not written by
/// this exact format version.
pub fn decode(data: &[u8]) -> Option<Snapshot> {
    if data.len() < HEADER_SIZE || data[0..4] != MAGIC {
        debug!("state: bad header");
        return None;
    }
    let len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    let crc = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
    if len > MAX_PAYLOAD_SIZE || data.len() != HEADER_SIZE + len {
        debug!(len, actual = data.len(), "state: length mismatch");
        return None;
    }

    let payload = &data[HEADER_SIZE..];
    if crc32fast::hash(payload) != crc {
        debug!("state: checksum mismatch");
        return None;
    }

    let file: StateFile = match postcard::from_bytes(payload) {
        Ok(f) => f,
        Err(e) => {
            debug!(error = %e, "state: undecodable payload");
            return None;
        }
    };
    if file.format_version != STATE_FORMAT_VERSION {
        info!(
            found = %file.format_version,
            expected = STATE_FORMAT_VERSION,
            "state: version mismatch, ignoring"
        );
        return None;
    }

    let mut snapshot = Snapshot::new(file.timestamp_nanos);
    for Section { tag, payload } in file.sections {
        match tag.as_str() {
            TAG_CPU => snapshot.cpu = decode_section(&tag, &payload),
            TAG_DISK => snapshot.disk = decode_section(&tag, &payload),
            TAG_NETWORK => snapshot.network = decode_section(&tag, &payload),
            _ => debug!(tag = %tag, "state: skipping unknown section"),
        }
    }
    Some(snapshot)
}

fn decode_section<T: for<'de> Deserialize<'de>>(tag: &str, payload: &[u8]) -> Option<T> {
    match postcard::from_bytes(payload) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(tag, error = %e, "state: dropping undecodable section");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Candidate state file locations for a user, in order of preference.
///
/// The per-user runtime directory comes first (`$XDG_RUNTIME_DIR`, else
/// `/run/user/<uid>`), then a uid-suffixed file in the shared temp directory.
pub fn candidate_paths(runtime_dir: Option<&Path>, uid: u32, temp_dir: &Path) -> Vec<PathBuf> {
    let runtime = match runtime_dir {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(format!("/run/user/{}", uid)),
    };
    vec![
        runtime.join(STATE_FILE_NAME),
        temp_dir.join(format!("hkmon.{}.dat", uid)),
    ]
}

/// State store backed by a file in the first usable candidate location.
///
/// A later candidate is only consulted when the ones before it are missing
/// or unusable. Timestamps are never compared across locations: they come
/// from the monotonic clock and restart at every boot.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    candidates: Vec<PathBuf>,
}

impl FileStateStore {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Store using the default per-user locations.
    pub fn for_user(uid: u32) -> Self {
        let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(candidate_paths(
            runtime_dir.as_deref(),
            uid,
            &std::env::temp_dir(),
        ))
    }

    /// Store using a single explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(vec![dir.as_ref().join(STATE_FILE_NAME)])
    }
}

fn read_state(path: &Path) -> Option<Snapshot> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "state: not readable");
            return None;
        }
    };
    let snapshot = decode(&data);
    if snapshot.is_none() {
        info!(path = %path.display(), "state: ignoring unusable file");
    }
    snapshot
}

impl StateStore for FileStateStore {
    /// First valid snapshot in candidate order.
    fn load(&self) -> Option<Snapshot> {
        self.candidates.iter().find_map(|path| read_state(path))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StateError> {
        let data = encode(snapshot)?;
        let mut attempts = Vec::new();
        for path in &self.candidates {
            match write_atomic(path, &data) {
                Ok(()) => {
                    debug!(path = %path.display(), bytes = data.len(), "state saved");
                    return Ok(());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "state: write failed");
                    attempts.push((path.clone(), e));
                }
            }
        }
        Err(StateError::Unwritable(attempts))
    }

    /// Reads and rewrites one location at a time, returning what was read
    /// from the location that accepted the write. State written on a
    /// previous boot to a location that is no longer used never wins.
    fn replace(&mut self, snapshot: &Snapshot) -> Result<Option<Snapshot>, StateError> {
        let data = encode(snapshot)?;
        let mut attempts = Vec::new();
        for path in &self.candidates {
            let previous = read_state(path);
            match write_atomic(path, &data) {
                Ok(()) => {
                    debug!(path = %path.display(), bytes = data.len(), "state replaced");
                    return Ok(previous);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "state: write failed");
                    attempts.push((path.clone(), e));
                }
            }
        }
        Err(StateError::Unwritable(attempts))
    }
}

/// Writes `data` to a fresh, randomly named sibling of `path` and renames it
/// over `path`. The sibling is removed if anything fails.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".hkmon.")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file().set_permissions(fs::Permissions::from_mode(0o640))?;
    }
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// State store keeping the encoded file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    data: Option<Vec<u8>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Option<Snapshot> {
        self.data.as_deref().and_then(decode)
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StateError> {
        self.data = Some(encode(snapshot)?);
        Ok(())
    }
}
