use dossier_core::{BinaryRef, DocumentMeta, Effect, LoadError, Msg, TaskSnapshot};
use dossier_engine::{
    ApiError, BinaryHandle, DocumentRecord, EngineEvent, EngineHandle, TaskRecord,
};
use dossier_logging::{client_info, client_warn};

/// Bridges the pure core to the engine: executes effects as engine commands
/// and turns engine events back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchMetadata { epoch, document_id } => {
                    client_info!("fetch metadata epoch={} document={}", epoch, document_id);
                    self.engine.fetch_metadata(epoch, document_id);
                }
                Effect::FetchBinary { epoch, document_id } => {
                    client_info!("fetch binary epoch={} document={}", epoch, document_id);
                    self.engine.fetch_binary(epoch, document_id);
                }
                Effect::FetchTasks { epoch } => {
                    self.engine.fetch_tasks(epoch);
                }
                Effect::RevokeBinary { handle } => {
                    self.engine.revoke(handle);
                }
                Effect::UploadDocument {
                    upload_id,
                    project_id,
                    folder_name,
                    document_type,
                    source_path,
                } => {
                    client_info!("upload id={} source={}", upload_id, source_path);
                    self.engine
                        .upload(upload_id, project_id, folder_name, document_type, source_path);
                }
                Effect::CreateTask {
                    upload_id,
                    document_ids,
                } => {
                    self.engine.create_task(upload_id, document_ids);
                }
            }
        }
    }

    /// Drains pending engine events into core messages.
    pub fn poll(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::MetadataFetched { epoch, result } => Msg::MetadataLoaded {
            epoch,
            result: result.map(map_document).map_err(map_error),
        },
        EngineEvent::BinaryFetched { epoch, result } => Msg::BinaryLoaded {
            epoch,
            result: result.map(map_handle).map_err(map_error),
        },
        EngineEvent::TasksFetched { epoch, result } => Msg::TasksLoaded {
            epoch,
            result: result
                .map(|tasks| tasks.into_iter().map(map_task).collect())
                .map_err(map_error),
        },
        EngineEvent::UploadFinished { upload_id, result } => Msg::UploadFinished {
            upload_id,
            result: result.map_err(map_error),
        },
        EngineEvent::TaskCreated { upload_id, result } => Msg::TaskCreateFinished {
            upload_id,
            result: result.map_err(map_error),
        },
    }
}

fn map_document(record: DocumentRecord) -> DocumentMeta {
    DocumentMeta {
        document_id: record.document_id,
        document_name: record.document_name,
        project_id: record.project_id,
        folder_name: record.folder_name,
        storage_kind: record.storage_path.storage_type,
        created_ts: record.created_ts,
    }
}

fn map_handle(handle: BinaryHandle) -> BinaryRef {
    BinaryRef {
        handle: handle.id,
        uri: handle.uri,
        mime: handle.mime,
    }
}

fn map_task(record: TaskRecord) -> TaskSnapshot {
    TaskSnapshot {
        task_id: record.task_id,
        document_ids: record.document_ids,
        status: record.status,
        output: record.output,
        modified_ts: record.modified_ts,
    }
}

fn map_error(err: ApiError) -> LoadError {
    match err {
        ApiError::NotFound => LoadError::NotFound,
        ApiError::Unauthorized => LoadError::Unauthorized,
        other => {
            client_warn!("api failure: {}", other);
            LoadError::Transport(other.to_string())
        }
    }
}
