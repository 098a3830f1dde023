use std::fmt;

use serde_json::Value;

use crate::view_model::{
    MetadataPanel, PreviewPanel, TaskPanelView, UploadView, ViewStatus, ViewerViewModel,
};

pub type DocumentId = String;

/// Generation counter for the mounted view. Every fetch effect carries the
/// epoch it was issued under; completions from an earlier epoch are stale and
/// their results are discarded on arrival.
pub type ViewEpoch = u64;

/// Identity token of a binary handle held by the platform's binary store.
/// Revocation always names the captured token, never "whatever the current
/// view holds".
pub type HandleId = u64;

pub type UploadId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    NotFound,
    Unauthorized,
    Transport(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "not found"),
            LoadError::Unauthorized => write!(f, "unauthorized"),
            LoadError::Transport(message) => write!(f, "transport error: {message}"),
        }
    }
}

/// Document metadata as loaded from the workspace backend. Immutable once
/// loaded; the client never mutates documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub document_id: DocumentId,
    pub document_name: String,
    pub project_id: String,
    pub folder_name: String,
    pub storage_kind: Option<String>,
    pub created_ts: String,
}

/// A locally renderable reference to downloaded document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRef {
    pub handle: HandleId,
    pub uri: String,
    pub mime: String,
}

/// One task from the user's task list, as returned by the backend. The
/// status string is passed through verbatim; the output is opaque JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub task_id: String,
    pub document_ids: Vec<DocumentId>,
    pub status: String,
    pub output: Value,
    pub modified_ts: String,
}

/// Selects the task shown for a document: the first task, in the order the
/// backend returned the list, whose document-id set contains `document_id`.
///
/// The backend offers no per-document lookup and does not rule out several
/// tasks referencing one document; this stable-order first match is the
/// documented tie-break, and matches are never aggregated.
pub fn correlate_first_match<'a>(
    tasks: &'a [TaskSnapshot],
    document_id: &str,
) -> Option<&'a TaskSnapshot> {
    tasks
        .iter()
        .find(|task| task.document_ids.iter().any(|id| id == document_id))
}

/// What happens after a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskCreationPolicy {
    /// Create a processing task for the new document right away.
    #[default]
    AutoCreate,
    /// Leave the document without a task until one is created elsewhere.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSlot {
    Pending,
    Ready(DocumentMeta),
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSlot {
    Pending,
    Ready(BinaryRef),
    Failed(LoadError),
    /// The download settled after the document itself failed to load; the
    /// bytes were released without ever being rendered.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskSlot {
    Pending,
    Resolved(TaskSnapshot),
    /// No task references this document. A valid terminal state, not an error.
    Absent,
    Unavailable(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadSlot {
    Idle,
    Uploading {
        upload_id: UploadId,
        file_name: String,
    },
    CreatingTask {
        upload_id: UploadId,
        document_id: DocumentId,
    },
    Done {
        document_id: DocumentId,
        task_id: Option<String>,
    },
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
struct DocumentView {
    document_id: DocumentId,
    metadata: MetadataSlot,
    preview: PreviewSlot,
    task: TaskSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    epoch: ViewEpoch,
    view: Option<DocumentView>,
    upload: UploadSlot,
    next_upload_id: UploadId,
    policy: TaskCreationPolicy,
    dirty: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(TaskCreationPolicy::default())
    }
}

impl ViewerState {
    pub fn new(policy: TaskCreationPolicy) -> Self {
        Self {
            epoch: 0,
            view: None,
            upload: UploadSlot::Idle,
            next_upload_id: 0,
            policy,
            dirty: false,
        }
    }

    pub fn epoch(&self) -> ViewEpoch {
        self.epoch
    }

    pub fn policy(&self) -> TaskCreationPolicy {
        self.policy
    }

    pub fn current_document(&self) -> Option<&str> {
        self.view.as_ref().map(|view| view.document_id.as_str())
    }

    pub fn upload(&self) -> &UploadSlot {
        &self.upload
    }

    /// Returns whether a completion tagged with `epoch` belongs to the view
    /// that is mounted right now.
    pub(crate) fn is_current(&self, epoch: ViewEpoch) -> bool {
        self.epoch == epoch && self.view.is_some()
    }

    /// Mounts a fresh view for `document_id`, superseding any previous one.
    /// Returns the handle of the superseded preview so the caller can revoke
    /// it before the new fetch starts.
    pub(crate) fn begin_view(&mut self, document_id: DocumentId) -> Option<HandleId> {
        let superseded = self.take_live_handle();
        self.epoch += 1;
        self.view = Some(DocumentView {
            document_id,
            metadata: MetadataSlot::Pending,
            preview: PreviewSlot::Pending,
            task: TaskSlot::Pending,
        });
        self.dirty = true;
        superseded
    }

    /// Unmounts the view. Returns the live handle, if any, for revocation.
    pub(crate) fn close_view(&mut self) -> Option<HandleId> {
        let superseded = self.take_live_handle();
        self.epoch += 1;
        if self.view.take().is_some() {
            self.dirty = true;
        }
        superseded
    }

    fn take_live_handle(&mut self) -> Option<HandleId> {
        let view = self.view.as_mut()?;
        if matches!(view.preview, PreviewSlot::Ready(_)) {
            if let PreviewSlot::Ready(binary) =
                std::mem::replace(&mut view.preview, PreviewSlot::Pending)
            {
                return Some(binary.handle);
            }
        }
        None
    }

    /// Settles the identity loader. On failure any already-delivered preview
    /// is discarded; the returned handle must be revoked by the caller.
    pub(crate) fn apply_metadata(
        &mut self,
        result: Result<DocumentMeta, LoadError>,
    ) -> Option<HandleId> {
        let view = self.view.as_mut()?;
        self.dirty = true;
        match result {
            Ok(meta) => {
                view.metadata = MetadataSlot::Ready(meta);
                None
            }
            Err(err) => {
                view.metadata = MetadataSlot::Failed(err);
                if matches!(view.preview, PreviewSlot::Ready(_)) {
                    if let PreviewSlot::Ready(binary) =
                        std::mem::replace(&mut view.preview, PreviewSlot::Discarded)
                    {
                        return Some(binary.handle);
                    }
                }
                None
            }
        }
    }

    /// Settles the binary fetcher for the current view. When the document
    /// itself already failed to load, a successful download is discarded and
    /// its handle returned for revocation.
    pub(crate) fn apply_binary(
        &mut self,
        result: Result<BinaryRef, LoadError>,
    ) -> Option<HandleId> {
        let view = self.view.as_mut()?;
        self.dirty = true;
        if matches!(view.metadata, MetadataSlot::Failed(_)) {
            view.preview = PreviewSlot::Discarded;
            return match result {
                Ok(binary) => Some(binary.handle),
                Err(_) => None,
            };
        }
        view.preview = match result {
            Ok(binary) => PreviewSlot::Ready(binary),
            Err(err) => PreviewSlot::Failed(err),
        };
        None
    }

    /// Settles the task correlator with a snapshot of the user's task list.
    pub(crate) fn apply_tasks(&mut self, result: Result<Vec<TaskSnapshot>, LoadError>) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        view.task = match result {
            Ok(tasks) => match correlate_first_match(&tasks, &view.document_id) {
                Some(task) => TaskSlot::Resolved(task.clone()),
                None => TaskSlot::Absent,
            },
            Err(err) => TaskSlot::Unavailable(err),
        };
        self.dirty = true;
    }

    pub(crate) fn current_upload(&self) -> Option<UploadId> {
        match &self.upload {
            UploadSlot::Uploading { upload_id, .. }
            | UploadSlot::CreatingTask { upload_id, .. } => Some(*upload_id),
            _ => None,
        }
    }

    pub(crate) fn begin_upload(&mut self, file_name: &str) -> UploadId {
        self.next_upload_id += 1;
        self.upload = UploadSlot::Uploading {
            upload_id: self.next_upload_id,
            file_name: file_name.to_string(),
        };
        self.dirty = true;
        self.next_upload_id
    }

    /// Settles the upload. Returns the new document id when the configured
    /// policy asks for a follow-up task creation.
    pub(crate) fn apply_upload_finished(
        &mut self,
        upload_id: UploadId,
        result: Result<DocumentId, LoadError>,
    ) -> Option<DocumentId> {
        self.dirty = true;
        match result {
            Ok(document_id) => match self.policy {
                TaskCreationPolicy::AutoCreate => {
                    self.upload = UploadSlot::CreatingTask {
                        upload_id,
                        document_id: document_id.clone(),
                    };
                    Some(document_id)
                }
                TaskCreationPolicy::Manual => {
                    self.upload = UploadSlot::Done {
                        document_id,
                        task_id: None,
                    };
                    None
                }
            },
            Err(err) => {
                self.upload = UploadSlot::Failed(err);
                None
            }
        }
    }

    pub(crate) fn apply_task_created(
        &mut self,
        upload_id: UploadId,
        result: Result<String, LoadError>,
    ) {
        let UploadSlot::CreatingTask {
            upload_id: current,
            document_id,
        } = &self.upload
        else {
            return;
        };
        if *current != upload_id {
            return;
        }
        let document_id = document_id.clone();
        self.upload = match result {
            Ok(task_id) => UploadSlot::Done {
                document_id,
                task_id: Some(task_id),
            },
            Err(err) => UploadSlot::Failed(err),
        };
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it. The platform renders only when
    /// this reports true.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub fn view(&self) -> ViewerViewModel {
        let status = match &self.view {
            None => ViewStatus::Idle,
            Some(view) => {
                if matches!(view.metadata, MetadataSlot::Failed(_))
                    || matches!(view.preview, PreviewSlot::Failed(_))
                {
                    ViewStatus::Failed
                } else if matches!(view.metadata, MetadataSlot::Ready(_))
                    && matches!(view.preview, PreviewSlot::Ready(_))
                {
                    ViewStatus::Ready
                } else {
                    ViewStatus::Loading
                }
            }
        };

        let document_id = self
            .view
            .as_ref()
            .map(|view| view.document_id.clone());

        let (metadata, metadata_error) = match self.view.as_ref().map(|view| &view.metadata) {
            Some(MetadataSlot::Ready(meta)) => (
                Some(MetadataPanel {
                    document_name: meta.document_name.clone(),
                    project_id: meta.project_id.clone(),
                    folder_name: meta.folder_name.clone(),
                    storage_kind: meta.storage_kind.clone(),
                    uploaded_ts: meta.created_ts.clone(),
                }),
                None,
            ),
            Some(MetadataSlot::Failed(err)) => (None, Some(err.clone())),
            _ => (None, None),
        };

        let (preview, preview_error) = match self.view.as_ref().map(|view| &view.preview) {
            Some(PreviewSlot::Ready(binary)) => (
                Some(PreviewPanel {
                    uri: binary.uri.clone(),
                    mime: binary.mime.clone(),
                }),
                None,
            ),
            Some(PreviewSlot::Failed(err)) => (None, Some(err.clone())),
            _ => (None, None),
        };

        let task = match self.view.as_ref().map(|view| &view.task) {
            Some(TaskSlot::Pending) | None => TaskPanelView::Pending,
            Some(TaskSlot::Resolved(task)) => TaskPanelView::Resolved {
                task_id: task.task_id.clone(),
                status: task.status.clone(),
                output_pretty: pretty_output(&task.output),
                modified_ts: task.modified_ts.clone(),
            },
            Some(TaskSlot::Absent) => TaskPanelView::Absent,
            Some(TaskSlot::Unavailable(err)) => TaskPanelView::Unavailable(err.clone()),
        };

        let upload = match &self.upload {
            UploadSlot::Idle => UploadView::Idle,
            UploadSlot::Uploading { file_name, .. } => UploadView::Uploading {
                file_name: file_name.clone(),
            },
            UploadSlot::CreatingTask { document_id, .. } => UploadView::CreatingTask {
                document_id: document_id.clone(),
            },
            UploadSlot::Done {
                document_id,
                task_id,
            } => UploadView::Done {
                document_id: document_id.clone(),
                task_id: task_id.clone(),
            },
            UploadSlot::Failed(err) => UploadView::Failed(err.clone()),
        };

        ViewerViewModel {
            status,
            document_id,
            metadata,
            metadata_error,
            preview,
            preview_error,
            task,
            upload,
            dirty: self.dirty,
        }
    }
}

fn pretty_output(output: &Value) -> Option<String> {
    match output {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        value => serde_json::to_string_pretty(value).ok(),
    }
}
