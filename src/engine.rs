//! Record/replay pipeline
//!
//! For each captured request: canonicalize, look up the store, let the
//! decision policy pick a path, then replay the snapshot or perform the
//! real call (and persist when the policy says so).

use std::future::Future;

use tracing::{debug, warn};

use crate::canonical::{resolve_key, snapshot_path, Namespace, RequestDescriptor};
use crate::config::{Config, UpdatePolicy};
use crate::policy::{decide, filter_framing_headers, Decision};
use crate::storage::{sort_pairs, RecordedRequest, RecordedResponse, SnapshotRecord, SnapshotStore};
use crate::Result;

/// Response handed back to the interceptor collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    /// HTTP status code
    pub status: u16,
    /// Status reason phrase
    pub status_text: String,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Decoded response body
    pub body: Vec<u8>,
}

/// Record/replay cache for outbound HTTP interactions
///
/// Duplicate concurrent requests for the same key are not serialized: both
/// may observe a missing record and perform a real fetch, with the second
/// write winning. The target use case is sequential test execution.
pub struct SnapshotCache {
    config: Config,
    store: SnapshotStore,
}

impl SnapshotCache {
    /// Create a cache from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: SnapshotStore::new(),
        })
    }

    /// Handle one captured request
    ///
    /// `fetch` is the collaborator-supplied real network call; it is invoked
    /// only when the decision policy chooses a fetch branch. Suspension
    /// happens only at that call and at file I/O.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be canonicalized, the real call
    /// fails, or persistence was decided and the write fails. A malformed
    /// stored record is not an error: it is treated as a cache miss.
    pub async fn handle<F, Fut>(
        &self,
        namespace: &Namespace,
        req: &RequestDescriptor,
        fetch: F,
    ) -> Result<ResponseDescriptor>
    where
        F: FnOnce(RequestDescriptor) -> Fut,
        Fut: Future<Output = Result<ResponseDescriptor>>,
    {
        let parts = self
            .config
            .key_builder
            .build_key(req, &self.config.mask, namespace)?;
        let key = resolve_key(&parts);
        let path = snapshot_path(&self.config.base_path, namespace, req, &key)?;

        let record_exists = self.store.exists(&path);
        let decision = decide(
            self.config.ignore_snapshots,
            record_exists,
            self.config.update_snapshots,
        );

        debug!(
            "{} {} -> key {} ({:?})",
            req.method,
            req.url,
            key.chars().take(12).collect::<String>(),
            decision
        );

        let store = match decision {
            Decision::Replay => match self.store.read(&path) {
                Ok(record) => {
                    debug!("Replaying snapshot: {}", path.display());
                    self.config.events.on_fetch_from_snapshot(req, &record);
                    return Ok(replay_response(&record));
                }
                Err(e) => {
                    // Unparsable record is a cache miss; refetch as if it
                    // never existed
                    warn!("Discarding malformed snapshot: {e}");
                    !matches!(self.config.update_snapshots, UpdatePolicy::None)
                }
            },
            Decision::Fetch { store } => store,
        };

        let response = fetch(req.clone()).await?;
        let record = self.build_record(req, &response);
        self.config.events.on_fetch_from_server(req, &record);

        if store {
            self.store.write(&path, &record)?;
            self.config.events.on_snapshot_updated(req, &record);
        }

        Ok(ResponseDescriptor {
            headers: filter_framing_headers(&response.headers),
            ..response
        })
    }

    fn build_record(&self, req: &RequestDescriptor, response: &ResponseDescriptor) -> SnapshotRecord {
        let mut headers = response.headers.clone();
        sort_pairs(&mut headers);

        SnapshotRecord {
            request: RecordedRequest::from_descriptor(req, &self.config.mask),
            response: RecordedResponse {
                status: response.status,
                status_text: response.status_text.clone(),
                headers,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            },
        }
    }
}

/// Materialize a stored record as a response, framing headers dropped
fn replay_response(record: &SnapshotRecord) -> ResponseDescriptor {
    ResponseDescriptor {
        status: record.response.status,
        status_text: record.response.status_text.clone(),
        headers: filter_framing_headers(&record.response.headers),
        body: record.response.body.clone().into_bytes(),
    }
}
