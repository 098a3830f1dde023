use std::sync::Once;

use dossier_core::{
    update, Effect, LoadError, Msg, TaskCreationPolicy, UploadView, ViewerState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dossier_logging::initialize_for_tests);
}

fn request_upload(state: ViewerState) -> (ViewerState, Vec<Effect>) {
    update(
        state,
        Msg::UploadRequested {
            project_id: "p1".to_string(),
            folder_name: "Finance".to_string(),
            file_name: "Invoice_Feb.pdf".to_string(),
            source_path: "/tmp/Invoice_Feb.pdf".to_string(),
        },
    )
}

#[test]
fn upload_emits_multipart_effect_with_fixed_document_type() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);

    let (state, effects) = request_upload(state);

    assert_eq!(
        effects,
        vec![Effect::UploadDocument {
            upload_id: 1,
            project_id: "p1".to_string(),
            folder_name: "Finance".to_string(),
            document_type: "pdf".to_string(),
            source_path: "/tmp/Invoice_Feb.pdf".to_string(),
        }]
    );
    assert_eq!(
        state.view().upload,
        UploadView::Uploading {
            file_name: "Invoice_Feb.pdf".to_string(),
        }
    );
}

#[test]
fn successful_upload_auto_creates_a_task() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = request_upload(state);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Ok("doc-9".to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::CreateTask {
            upload_id: 1,
            document_ids: vec!["doc-9".to_string()],
        }]
    );
    assert_eq!(
        state.view().upload,
        UploadView::CreatingTask {
            document_id: "doc-9".to_string(),
        }
    );

    let (state, effects) = update(
        state,
        Msg::TaskCreateFinished {
            upload_id: 1,
            result: Ok("t-1".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().upload,
        UploadView::Done {
            document_id: "doc-9".to_string(),
            task_id: Some("t-1".to_string()),
        }
    );
    assert!(state.view().settled());
}

#[test]
fn manual_policy_leaves_the_document_without_a_task() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::Manual);
    let (state, _) = request_upload(state);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Ok("doc-9".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().upload,
        UploadView::Done {
            document_id: "doc-9".to_string(),
            task_id: None,
        }
    );
}

#[test]
fn upload_failure_surfaces_without_task_creation() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = request_upload(state);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Err(LoadError::Transport("status 500".to_string())),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().upload,
        UploadView::Failed(LoadError::Transport("status 500".to_string()))
    );
}

#[test]
fn task_creation_failure_marks_the_upload_failed() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = request_upload(state);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Ok("doc-9".to_string()),
        },
    );

    let (state, _) = update(
        state,
        Msg::TaskCreateFinished {
            upload_id: 1,
            result: Err(LoadError::Unauthorized),
        },
    );

    assert_eq!(
        state.view().upload,
        UploadView::Failed(LoadError::Unauthorized)
    );
}

#[test]
fn second_submit_is_ignored_while_an_upload_runs() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = request_upload(state);

    let before = state.view();
    let (state, effects) = request_upload(state);

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn settled_upload_ignores_stray_completions() {
    init_logging();
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = request_upload(state);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Err(LoadError::Transport("timeout".to_string())),
        },
    );

    let before = state.view();
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: Ok("doc-9".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}
