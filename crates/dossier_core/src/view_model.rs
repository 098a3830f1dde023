use crate::state::{DocumentId, LoadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    /// Metadata and binary are still in flight.
    Loading,
    /// Metadata and binary both resolved; the task panel may still be pending.
    Ready,
    /// Metadata or binary fetch failed. Panels that did succeed still render.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPanel {
    pub document_name: String,
    pub project_id: String,
    pub folder_name: String,
    pub storage_kind: Option<String>,
    pub uploaded_ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPanel {
    pub uri: String,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPanelView {
    Pending,
    Resolved {
        task_id: String,
        status: String,
        output_pretty: Option<String>,
        modified_ts: String,
    },
    Absent,
    Unavailable(LoadError),
}

impl TaskPanelView {
    /// Status label for listings: the task's verbatim backend status, or
    /// "Not Started" when no task references the document yet.
    pub fn status_label(&self) -> &str {
        match self {
            TaskPanelView::Pending => "Pending",
            TaskPanelView::Resolved { status, .. } => status,
            TaskPanelView::Absent => "Not Started",
            TaskPanelView::Unavailable(_) => "Unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadView {
    Idle,
    Uploading { file_name: String },
    CreatingTask { document_id: String },
    Done {
        document_id: String,
        task_id: Option<String>,
    },
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerViewModel {
    pub status: ViewStatus,
    pub document_id: Option<DocumentId>,
    pub metadata: Option<MetadataPanel>,
    pub metadata_error: Option<LoadError>,
    pub preview: Option<PreviewPanel>,
    pub preview_error: Option<LoadError>,
    pub task: TaskPanelView,
    pub upload: UploadView,
    pub dirty: bool,
}

impl ViewerViewModel {
    /// True once every in-flight operation has settled: the mounted view's
    /// three panels and any running upload.
    pub fn settled(&self) -> bool {
        let view_settled = match self.status {
            ViewStatus::Idle => true,
            ViewStatus::Loading => false,
            ViewStatus::Ready | ViewStatus::Failed => {
                !matches!(self.task, TaskPanelView::Pending)
            }
        };
        let upload_settled = !matches!(
            self.upload,
            UploadView::Uploading { .. } | UploadView::CreatingTask { .. }
        );
        view_settled && upload_settled
    }
}
