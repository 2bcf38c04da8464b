pub mod model;
pub mod state;

pub use model::Snapshot;
pub use state::{FileStateStore, MemoryStateStore, StateError, StateStore};
