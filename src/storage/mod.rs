//! Snapshot persistence: record schema and filesystem store

mod record;
mod store;

pub use record::{RecordedRequest, RecordedResponse, SnapshotRecord};
pub use store::SnapshotStore;

pub(crate) use record::sort_pairs;
