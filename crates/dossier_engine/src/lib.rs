//! Dossier engine: workspace API client, binary store, and effect execution.
mod blob;
mod client;
mod engine;
mod session;
mod types;

pub use blob::{BinaryHandle, BinaryStore, HandleId, PDF_MIME};
pub use client::{ApiClient, ClientSettings, WorkspaceApi};
pub use engine::{EngineEvent, EngineHandle, UploadId, ViewEpoch};
pub use session::Session;
pub use types::{
    ApiError, DocumentRecord, Envelope, StorageDescriptor, TaskRecord, UploadRequest,
};
