//! Dossier core: pure document-view state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    correlate_first_match, BinaryRef, DocumentId, DocumentMeta, HandleId, LoadError, MetadataSlot,
    PreviewSlot, TaskCreationPolicy, TaskSlot, TaskSnapshot, UploadId, UploadSlot, ViewEpoch,
    ViewerState,
};
pub use update::update;
pub use view_model::{
    MetadataPanel, PreviewPanel, TaskPanelView, UploadView, ViewStatus, ViewerViewModel,
};
