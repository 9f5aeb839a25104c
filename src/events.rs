//! Observability events for replay and fetch paths

use crate::canonical::RequestDescriptor;
use crate::storage::SnapshotRecord;

/// Observer for record/replay decisions
///
/// All methods default to no-ops; collaborators implement the ones they
/// care about and install the sink through the configuration.
pub trait SnapshotEvents: Send + Sync {
    /// A real network call was performed for this request
    fn on_fetch_from_server(&self, _req: &RequestDescriptor, _record: &SnapshotRecord) {}

    /// A stored snapshot was replayed for this request
    fn on_fetch_from_snapshot(&self, _req: &RequestDescriptor, _record: &SnapshotRecord) {}

    /// A freshly fetched exchange was persisted to the store
    fn on_snapshot_updated(&self, _req: &RequestDescriptor, _record: &SnapshotRecord) {}
}

/// Default sink that observes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl SnapshotEvents for NoEvents {}
