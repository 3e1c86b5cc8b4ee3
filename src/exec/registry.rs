//! Transport registry.
//!
//! Maps a connection's native transport identifier to its waitable handle.
//! Handles are created lazily on first use and live until explicitly
//! evicted - the registry does not notice when a connection closes, so a
//! pool layer that recycles descriptors must call [`TransportRegistry::evict`]
//! on teardown. Stale entries after an unevicted close are a known
//! limitation, left to the caller by design.

use crate::driver::TransportId;
use crate::error::ExecResult;
use crate::exec::transport::TransportHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct TransportRegistry {
    handles: RwLock<HashMap<TransportId, Arc<TransportHandle>>>,
}

impl TransportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the handle for a transport, creating and storing it on
    /// first use. Repeated calls for the same identifier return the same
    /// handle instance.
    pub async fn handle_for(&self, id: TransportId) -> ExecResult<Arc<TransportHandle>> {
        {
            let handles = self.handles.read().await;
            if let Some(handle) = handles.get(&id) {
                return Ok(Arc::clone(handle));
            }
        }

        let mut handles = self.handles.write().await;
        // Re-check under the write lock: the first writer wins and a
        // concurrent insert for the same identifier is never overwritten.
        if let Some(handle) = handles.get(&id) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(TransportHandle::new(id)?);
        handles.insert(id, Arc::clone(&handle));
        debug!(transport = %id, "registered transport handle");
        Ok(handle)
    }

    /// Remove the handle for a transport. Returns whether an entry was
    /// present. Callers tearing down a connection are responsible for
    /// invoking this.
    pub async fn evict(&self, id: TransportId) -> bool {
        let removed = self.handles.write().await.remove(&id).is_some();
        if removed {
            debug!(transport = %id, "evicted transport handle");
        }
        removed
    }

    /// Drop every registered handle.
    pub async fn clear(&self) {
        self.handles.write().await.clear();
        debug!("cleared transport registry");
    }

    /// Number of registered handles.
    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    /// Whether the registry holds no handles.
    pub async fn is_empty(&self) -> bool {
        self.handles.read().await.is_empty()
    }
}
