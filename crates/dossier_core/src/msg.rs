use crate::state::{BinaryRef, DocumentId, DocumentMeta, LoadError, TaskSnapshot, UploadId, ViewEpoch};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User navigated to a document; mounts a fresh detail view.
    DocumentSelected { document_id: DocumentId },
    /// The detail view was dismissed.
    ViewClosed,
    /// Identity loader settled for the view mounted at `epoch`.
    MetadataLoaded {
        epoch: ViewEpoch,
        result: Result<DocumentMeta, LoadError>,
    },
    /// Binary fetcher settled for the view mounted at `epoch`.
    BinaryLoaded {
        epoch: ViewEpoch,
        result: Result<BinaryRef, LoadError>,
    },
    /// Task-list snapshot arrived for the view mounted at `epoch`.
    TasksLoaded {
        epoch: ViewEpoch,
        result: Result<Vec<TaskSnapshot>, LoadError>,
    },
    /// User submitted a document for upload into a project folder.
    UploadRequested {
        project_id: String,
        folder_name: String,
        file_name: String,
        source_path: String,
    },
    /// Upload settled with the new document id or an error.
    UploadFinished {
        upload_id: UploadId,
        result: Result<DocumentId, LoadError>,
    },
    /// Follow-up task creation settled.
    TaskCreateFinished {
        upload_id: UploadId,
        result: Result<String, LoadError>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
