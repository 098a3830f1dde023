use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use bytes::Bytes;
use dossier_logging::{client_debug, client_warn};
use tokio_util::sync::CancellationToken;

use crate::blob::{BinaryHandle, BinaryStore, HandleId, PDF_MIME};
use crate::client::WorkspaceApi;
use crate::{ApiError, DocumentRecord, TaskRecord, UploadRequest};

/// Generation counter of the mounted view; matches the core's epoch.
pub type ViewEpoch = u64;

pub type UploadId = u64;

enum EngineCommand {
    FetchMetadata {
        epoch: ViewEpoch,
        document_id: String,
    },
    FetchBinary {
        epoch: ViewEpoch,
        document_id: String,
    },
    FetchTasks {
        epoch: ViewEpoch,
    },
    Revoke {
        handle: HandleId,
    },
    Upload {
        upload_id: UploadId,
        project_id: String,
        folder_name: String,
        document_type: String,
        source_path: String,
    },
    CreateTask {
        upload_id: UploadId,
        document_ids: Vec<String>,
    },
}

#[derive(Debug)]
pub enum EngineEvent {
    MetadataFetched {
        epoch: ViewEpoch,
        result: Result<DocumentRecord, ApiError>,
    },
    BinaryFetched {
        epoch: ViewEpoch,
        result: Result<BinaryHandle, ApiError>,
    },
    TasksFetched {
        epoch: ViewEpoch,
        result: Result<Vec<TaskRecord>, ApiError>,
    },
    UploadFinished {
        upload_id: UploadId,
        result: Result<String, ApiError>,
    },
    TaskCreated {
        upload_id: UploadId,
        result: Result<String, ApiError>,
    },
}

/// Handle to the engine worker: commands in, events out. Fetches issued for
/// the same epoch run concurrently on the worker's runtime; advancing to a
/// newer epoch cancels whatever is still in flight for older ones.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn WorkspaceApi>, store: BinaryStore) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut gate = EpochGate::new();
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let store = store.clone();
                let event_tx = event_tx.clone();
                let token = gate.token_for(&command);
                runtime.spawn(async move {
                    handle_command(api.as_ref(), &store, command, token, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_metadata(&self, epoch: ViewEpoch, document_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchMetadata {
            epoch,
            document_id: document_id.into(),
        });
    }

    pub fn fetch_binary(&self, epoch: ViewEpoch, document_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchBinary {
            epoch,
            document_id: document_id.into(),
        });
    }

    pub fn fetch_tasks(&self, epoch: ViewEpoch) {
        let _ = self.cmd_tx.send(EngineCommand::FetchTasks { epoch });
    }

    pub fn revoke(&self, handle: HandleId) {
        let _ = self.cmd_tx.send(EngineCommand::Revoke { handle });
    }

    pub fn upload(
        &self,
        upload_id: UploadId,
        project_id: impl Into<String>,
        folder_name: impl Into<String>,
        document_type: impl Into<String>,
        source_path: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            upload_id,
            project_id: project_id.into(),
            folder_name: folder_name.into(),
            document_type: document_type.into(),
            source_path: source_path.into(),
        });
    }

    pub fn create_task(&self, upload_id: UploadId, document_ids: Vec<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::CreateTask {
                upload_id,
                document_ids,
            });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Tracks the newest epoch seen and the cancellation token guarding it.
struct EpochGate {
    current: ViewEpoch,
    token: CancellationToken,
}

impl EpochGate {
    fn new() -> Self {
        Self {
            current: 0,
            token: CancellationToken::new(),
        }
    }

    fn token_for(&mut self, command: &EngineCommand) -> CancellationToken {
        let epoch = match command {
            EngineCommand::FetchMetadata { epoch, .. }
            | EngineCommand::FetchBinary { epoch, .. }
            | EngineCommand::FetchTasks { epoch } => Some(*epoch),
            _ => None,
        };
        match epoch {
            Some(epoch) if epoch > self.current => {
                self.token.cancel();
                self.current = epoch;
                self.token = CancellationToken::new();
                self.token.clone()
            }
            Some(_) => self.token.clone(),
            // Uploads and revocations are never superseded.
            None => CancellationToken::new(),
        }
    }
}

async fn handle_command(
    api: &dyn WorkspaceApi,
    store: &BinaryStore,
    command: EngineCommand,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchMetadata { epoch, document_id } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = api.document_metadata(&document_id) => result,
            };
            let _ = event_tx.send(EngineEvent::MetadataFetched { epoch, result });
        }
        EngineCommand::FetchBinary { epoch, document_id } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = api.download_document(&document_id) => result,
            };
            let result = result.map(|bytes| store.acquire(bytes, PDF_MIME));
            let _ = event_tx.send(EngineEvent::BinaryFetched { epoch, result });
        }
        EngineCommand::FetchTasks { epoch } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = api.list_tasks() => result,
            };
            let _ = event_tx.send(EngineEvent::TasksFetched { epoch, result });
        }
        EngineCommand::Revoke { handle } => {
            if store.revoke(handle) {
                client_debug!("revoked binary handle {}", handle);
            } else {
                client_warn!("revoke of handle {} that was not live", handle);
            }
        }
        EngineCommand::Upload {
            upload_id,
            project_id,
            folder_name,
            document_type,
            source_path,
        } => {
            let result = match tokio::fs::read(&source_path).await {
                Ok(bytes) => {
                    api.upload_document(UploadRequest {
                        project_id,
                        folder_name,
                        document_type,
                        file_name: file_name_of(&source_path),
                        bytes: Bytes::from(bytes),
                    })
                    .await
                }
                Err(err) => Err(ApiError::Io(format!("{source_path}: {err}"))),
            };
            let _ = event_tx.send(EngineEvent::UploadFinished { upload_id, result });
        }
        EngineCommand::CreateTask {
            upload_id,
            document_ids,
        } => {
            let result = api.create_task(&document_ids).await;
            let _ = event_tx.send(EngineEvent::TaskCreated { upload_id, result });
        }
    }
}

fn file_name_of(source_path: &str) -> String {
    Path::new(source_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.to_string())
}
