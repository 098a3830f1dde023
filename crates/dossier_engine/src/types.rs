use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Every backend response wraps its payload in a `result` envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

/// Document metadata as served by `GET /api/v1/document/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub document_id: String,
    pub document_name: String,
    pub project_id: String,
    #[serde(default)]
    pub folder_name: String,
    #[serde(default)]
    pub storage_path: StorageDescriptor,
    #[serde(default)]
    pub created_ts: String,
    #[serde(default)]
    pub modified_ts: String,
}

/// Where the backend stored the binary. The fields beyond `storage_type`
/// depend on the storage backend and are display-only here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StorageDescriptor {
    #[serde(default)]
    pub storage_type: Option<String>,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub absolute_path: Option<String>,
}

/// One task from `GET /api/v1/task`. The status vocabulary belongs to the
/// backend and is passed through verbatim; the output is opaque JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub created_ts: String,
    #[serde(default)]
    pub modified_ts: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedDocument {
    pub document_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedTask {
    pub task_id: String,
}

/// Payload for the multipart document upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub project_id: String,
    pub folder_name: String,
    pub document_type: String,
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("http status {0}")]
    Status(u16),
    #[error("timeout")]
    Timeout,
    #[error("download too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}
