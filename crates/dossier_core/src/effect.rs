use crate::state::{DocumentId, HandleId, UploadId, ViewEpoch};

/// Side effects requested by `update`. Effects are plain data; the platform
/// layer executes them and feeds the outcomes back as messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchMetadata {
        epoch: ViewEpoch,
        document_id: DocumentId,
    },
    FetchBinary {
        epoch: ViewEpoch,
        document_id: DocumentId,
    },
    FetchTasks {
        epoch: ViewEpoch,
    },
    /// Release a binary handle no mounted view references anymore.
    RevokeBinary {
        handle: HandleId,
    },
    UploadDocument {
        upload_id: UploadId,
        project_id: String,
        folder_name: String,
        document_type: String,
        source_path: String,
    },
    CreateTask {
        upload_id: UploadId,
        document_ids: Vec<DocumentId>,
    },
}
