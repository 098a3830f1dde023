use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use dossier_core::{update, Msg, UploadView, ViewerState, ViewerViewModel};
use dossier_engine::{ApiClient, BinaryStore, ClientSettings, EngineHandle, Session};

use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

fn build_runner(config: &ClientConfig) -> Result<EffectRunner> {
    let mut session = Session::new(&config.base_url)?;
    if let Some(token) = &config.bearer {
        session = session.with_bearer(token);
    }
    let settings = ClientSettings {
        max_download_bytes: config.max_download_bytes,
        ..ClientSettings::default()
    };
    let client = ApiClient::new(session, settings)?;
    let store = BinaryStore::new();
    let engine = EngineHandle::new(Arc::new(client), store);
    Ok(EffectRunner::new(engine))
}

/// Mounts the detail view for `document_id`, waits for all three panels to
/// settle, renders them once, and unmounts.
pub fn run_view(config: &ClientConfig, document_id: &str) -> Result<String> {
    let runner = build_runner(config)?;
    let state = ViewerState::new(config.task_policy());

    let (state, effects) = update(
        state,
        Msg::DocumentSelected {
            document_id: document_id.to_string(),
        },
    );
    runner.run(effects);

    let (state, view) = drive_until_settled(state, &runner)?;
    let output = render::render_view(&view);

    // Unmount; the live preview handle is revoked on the way out.
    let (_state, effects) = update(state, Msg::ViewClosed);
    runner.run(effects);

    Ok(output)
}

pub fn run_upload(
    config: &ClientConfig,
    project_id: &str,
    folder_name: &str,
    file: &Path,
) -> Result<String> {
    let runner = build_runner(config)?;
    let state = ViewerState::new(config.task_policy());

    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("not a file: {}", file.display()))?;

    let (state, effects) = update(
        state,
        Msg::UploadRequested {
            project_id: project_id.to_string(),
            folder_name: folder_name.to_string(),
            file_name,
            source_path: file.to_string_lossy().into_owned(),
        },
    );
    runner.run(effects);

    let (_state, view) = drive_until_settled(state, &runner)?;
    if let UploadView::Failed(err) = &view.upload {
        return Err(anyhow!("upload failed: {err}"));
    }
    Ok(render::render_upload(&view))
}

fn drive_until_settled(
    mut state: ViewerState,
    runner: &EffectRunner,
) -> Result<(ViewerState, ViewerViewModel)> {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    loop {
        for msg in runner.poll() {
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
        }
        let view = state.view();
        if view.settled() {
            return Ok((state, view));
        }
        if Instant::now() >= deadline {
            return Err(anyhow!("timed out waiting for the backend"));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
