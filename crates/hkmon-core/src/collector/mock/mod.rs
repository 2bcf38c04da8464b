//! In-memory stand-ins for `/proc` and `/sys`.
//!
//! `MockFs` plus ready-made machine scenarios, so collectors can be
//! exercised without a Linux kernel underneath.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
