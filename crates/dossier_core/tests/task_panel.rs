use std::sync::Once;

use dossier_core::{
    correlate_first_match, update, BinaryRef, DocumentMeta, LoadError, Msg, TaskCreationPolicy,
    TaskPanelView, TaskSnapshot, ViewStatus, ViewerState,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dossier_logging::initialize_for_tests);
}

fn task(task_id: &str, document_ids: &[&str], status: &str) -> TaskSnapshot {
    TaskSnapshot {
        task_id: task_id.to_string(),
        document_ids: document_ids.iter().map(ToString::to_string).collect(),
        status: status.to_string(),
        output: json!({}),
        modified_ts: "2024-01-06T00:00:00Z".to_string(),
    }
}

fn ready_view(document_id: &str) -> ViewerState {
    let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
    let (state, _) = update(
        state,
        Msg::DocumentSelected {
            document_id: document_id.to_string(),
        },
    );
    let epoch = state.epoch();
    let (state, _) = update(
        state,
        Msg::MetadataLoaded {
            epoch,
            result: Ok(DocumentMeta {
                document_id: document_id.to_string(),
                document_name: "Invoice_Jan.pdf".to_string(),
                project_id: "p1".to_string(),
                folder_name: "Finance".to_string(),
                storage_kind: Some("blob".to_string()),
                created_ts: "2024-01-05T00:00:00Z".to_string(),
            }),
        },
    );
    let (state, _) = update(
        state,
        Msg::BinaryLoaded {
            epoch,
            result: Ok(BinaryRef {
                handle: 1,
                uri: "blob:dossier/00000001".to_string(),
                mime: "application/pdf".to_string(),
            }),
        },
    );
    state
}

#[test]
fn empty_task_list_resolves_to_absent_not_error() {
    init_logging();
    let state = ready_view("doc-1");
    let epoch = state.epoch();

    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Ok(Vec::new()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, ViewStatus::Ready);
    assert_eq!(view.task, TaskPanelView::Absent);
    assert_eq!(view.task.status_label(), "Not Started");
    assert!(view.settled());
}

#[test]
fn unrelated_tasks_resolve_to_absent() {
    init_logging();
    let state = ready_view("doc-1");
    let epoch = state.epoch();

    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Ok(vec![task("t9", &["doc-8", "doc-9"], "Processed")]),
        },
    );

    assert_eq!(state.view().task, TaskPanelView::Absent);
}

#[test]
fn matching_task_resolves_with_verbatim_status_and_pretty_output() {
    init_logging();
    let state = ready_view("doc-2");
    let epoch = state.epoch();

    let mut matching = task("t1", &["doc-2"], "Processed");
    matching.output = json!({ "field": "value" });

    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Ok(vec![matching]),
        },
    );

    let view = state.view();
    match view.task {
        TaskPanelView::Resolved {
            task_id,
            status,
            output_pretty,
            ..
        } => {
            assert_eq!(task_id, "t1");
            assert_eq!(status, "Processed");
            let pretty = output_pretty.expect("output rendered");
            assert!(pretty.contains("\"field\": \"value\""));
        }
        other => panic!("expected resolved task panel, got {other:?}"),
    }
}

#[test]
fn empty_task_output_is_not_rendered() {
    init_logging();
    let state = ready_view("doc-2");
    let epoch = state.epoch();

    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Ok(vec![task("t1", &["doc-2"], "Pending")]),
        },
    );

    match state.view().task {
        TaskPanelView::Resolved { output_pretty, .. } => assert_eq!(output_pretty, None),
        other => panic!("expected resolved task panel, got {other:?}"),
    }
}

#[test]
fn first_match_wins_when_several_tasks_reference_the_document() {
    init_logging();
    let tasks = vec![
        task("t1", &["doc-5", "doc-6"], "Pending"),
        task("t2", &["doc-5"], "Processed"),
    ];

    let selected = correlate_first_match(&tasks, "doc-5").expect("match");
    assert_eq!(selected.task_id, "t1");

    // The same order holds through the state machine.
    let state = ready_view("doc-5");
    let epoch = state.epoch();
    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Ok(tasks),
        },
    );
    match state.view().task {
        TaskPanelView::Resolved { task_id, .. } => assert_eq!(task_id, "t1"),
        other => panic!("expected resolved task panel, got {other:?}"),
    }
}

#[test]
fn task_list_failure_marks_panel_unavailable_without_touching_the_view() {
    init_logging();
    let state = ready_view("doc-1");
    let epoch = state.epoch();

    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            epoch,
            result: Err(LoadError::Unauthorized),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, ViewStatus::Ready);
    assert!(view.preview.is_some());
    assert_eq!(view.task, TaskPanelView::Unavailable(LoadError::Unauthorized));
}

#[test]
fn task_panel_stays_pending_until_the_list_arrives() {
    init_logging();
    let state = ready_view("doc-1");

    let view = state.view();
    assert_eq!(view.status, ViewStatus::Ready);
    assert_eq!(view.task, TaskPanelView::Pending);
    assert_eq!(view.task.status_label(), "Pending");
    assert!(!view.settled());
}
