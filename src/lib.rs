//! httpsnap - Record-replay snapshot cache for deterministic HTTP tests
//!
//! The first time a logical request is seen it is forwarded to a real
//! server and the exchange is persisted; later runs with an identical
//! logical request replay the stored exchange instead of contacting the
//! network. Request identity is a canonical fingerprint: order-independent,
//! case-normalized, with volatile/sensitive fields masked out.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod mask;
pub mod policy;
pub mod storage;

pub use canonical::{DefaultKeyBuilder, KeyBuilder, KeyParts, Namespace, RequestDescriptor};
pub use config::{Config, UpdatePolicy};
pub use engine::{ResponseDescriptor, SnapshotCache};
pub use error::{Result, SnapError};
pub use events::{NoEvents, SnapshotEvents};
pub use mask::MaskSpecifier;
pub use storage::{SnapshotRecord, SnapshotStore};
