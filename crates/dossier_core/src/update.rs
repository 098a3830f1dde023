use crate::{Effect, Msg, ViewerState};

/// The only document type the upload form submits.
const UPLOAD_DOCUMENT_TYPE: &str = "pdf";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ViewerState, msg: Msg) -> (ViewerState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSelected { document_id } => {
            let superseded = state.begin_view(document_id.clone());
            let epoch = state.epoch();
            let mut effects = Vec::with_capacity(4);
            if let Some(handle) = superseded {
                effects.push(Effect::RevokeBinary { handle });
            }
            // Metadata and binary are issued together; the task lookup rides
            // along and never gates the primary view.
            effects.push(Effect::FetchMetadata {
                epoch,
                document_id: document_id.clone(),
            });
            effects.push(Effect::FetchBinary { epoch, document_id });
            effects.push(Effect::FetchTasks { epoch });
            effects
        }
        Msg::ViewClosed => match state.close_view() {
            Some(handle) => vec![Effect::RevokeBinary { handle }],
            None => Vec::new(),
        },
        Msg::MetadataLoaded { epoch, result } => {
            if !state.is_current(epoch) {
                Vec::new()
            } else {
                match state.apply_metadata(result) {
                    Some(handle) => vec![Effect::RevokeBinary { handle }],
                    None => Vec::new(),
                }
            }
        }
        Msg::BinaryLoaded { epoch, result } => {
            if !state.is_current(epoch) {
                // A superseded fetch settled; its handle must die unseen.
                match result {
                    Ok(binary) => vec![Effect::RevokeBinary {
                        handle: binary.handle,
                    }],
                    Err(_) => Vec::new(),
                }
            } else {
                match state.apply_binary(result) {
                    Some(handle) => vec![Effect::RevokeBinary { handle }],
                    None => Vec::new(),
                }
            }
        }
        Msg::TasksLoaded { epoch, result } => {
            if state.is_current(epoch) {
                state.apply_tasks(result);
            }
            Vec::new()
        }
        Msg::UploadRequested {
            project_id,
            folder_name,
            file_name,
            source_path,
        } => {
            if state.current_upload().is_some() {
                // An upload is already running; the form stays disabled.
                Vec::new()
            } else {
                let upload_id = state.begin_upload(&file_name);
                vec![Effect::UploadDocument {
                    upload_id,
                    project_id,
                    folder_name,
                    document_type: UPLOAD_DOCUMENT_TYPE.to_string(),
                    source_path,
                }]
            }
        }
        Msg::UploadFinished { upload_id, result } => {
            if state.current_upload() != Some(upload_id) {
                Vec::new()
            } else {
                match state.apply_upload_finished(upload_id, result) {
                    Some(document_id) => vec![Effect::CreateTask {
                        upload_id,
                        document_ids: vec![document_id],
                    }],
                    None => Vec::new(),
                }
            }
        }
        Msg::TaskCreateFinished { upload_id, result } => {
            state.apply_task_created(upload_id, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
