use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

/// MIME type every preview handle is tagged with. The viewer renders PDFs and
/// uses the declared type rather than the response content type.
pub const PDF_MIME: &str = "application/pdf";

pub type HandleId = u64;

const URI_PREFIX: &str = "blob:dossier/";

/// A revocable reference to downloaded bytes held by a [`BinaryStore`]. The
/// URI dereferences through the owning store until the handle is revoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHandle {
    pub id: HandleId,
    pub uri: String,
    pub mime: String,
}

/// Registry of live binary handles. Cheap to clone; all clones share one
/// underlying map.
#[derive(Debug, Clone, Default)]
pub struct BinaryStore {
    inner: Arc<Mutex<HashMap<HandleId, Bytes>>>,
    next_id: Arc<AtomicU64>,
}

impl BinaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a handle whose URI stays dereferenceable
    /// until the handle is revoked.
    pub fn acquire(&self, bytes: Bytes, mime: &str) -> BinaryHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner
            .lock()
            .expect("binary store lock")
            .insert(id, bytes);
        BinaryHandle {
            id,
            uri: format!("{URI_PREFIX}{id:08x}"),
            mime: mime.to_string(),
        }
    }

    /// Resolves a handle URI to its bytes, or `None` once revoked.
    pub fn resolve(&self, uri: &str) -> Option<Bytes> {
        let id = uri.strip_prefix(URI_PREFIX)?;
        let id = HandleId::from_str_radix(id, 16).ok()?;
        self.inner
            .lock()
            .expect("binary store lock")
            .get(&id)
            .cloned()
    }

    /// Releases a handle. Returns whether it was still live.
    pub fn revoke(&self, id: HandleId) -> bool {
        self.inner
            .lock()
            .expect("binary store lock")
            .remove(&id)
            .is_some()
    }

    /// Number of live handles. The viewer keeps at most one per mounted view.
    pub fn live(&self) -> usize {
        self.inner.lock().expect("binary store lock").len()
    }
}
