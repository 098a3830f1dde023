use chrono::{DateTime, Utc};
use dossier_core::{TaskPanelView, UploadView, ViewStatus, ViewerViewModel};

/// Renders the settled detail view as plain text panels: document header,
/// metadata, preview, processing output.
pub fn render_view(view: &ViewerViewModel) -> String {
    let mut out = String::new();

    match view.status {
        ViewStatus::Idle => {
            out.push_str("No document selected.\n");
            return out;
        }
        ViewStatus::Loading => {
            out.push_str("Loading document…\n");
        }
        ViewStatus::Ready | ViewStatus::Failed => {}
    }

    if let Some(err) = &view.metadata_error {
        out.push_str(&format!("Unable to load document: {err}\n"));
    }

    if let Some(meta) = &view.metadata {
        out.push_str(&format!("{}\n", meta.document_name));
        out.push_str(&format!("Uploaded {}\n", format_timestamp(&meta.uploaded_ts)));
        out.push('\n');
        out.push_str("Document Metadata\n");
        out.push_str(&format!("  Project ID: {}\n", meta.project_id));
        out.push_str(&format!("  Folder: {}\n", meta.folder_name));
        if let Some(storage) = &meta.storage_kind {
            out.push_str(&format!("  Storage: {storage}\n"));
        }
    }

    if view.metadata_error.is_none() {
        out.push('\n');
        out.push_str("Preview\n");
        if let Some(preview) = &view.preview {
            out.push_str(&format!("  {} at {}\n", preview.mime, preview.uri));
        } else if let Some(err) = &view.preview_error {
            out.push_str(&format!("  Preview unavailable: {err}\n"));
        }
    }

    out.push('\n');
    out.push_str("Processing Output\n");
    match &view.task {
        TaskPanelView::Pending => {
            out.push_str("  Task status pending.\n");
        }
        TaskPanelView::Absent => {
            out.push_str("  No task created for this document.\n");
        }
        TaskPanelView::Resolved {
            task_id,
            status,
            output_pretty,
            ..
        } => {
            out.push_str(&format!("  Task {task_id}: {status}\n"));
            match output_pretty {
                Some(pretty) => {
                    for line in pretty.lines() {
                        out.push_str(&format!("  {line}\n"));
                    }
                }
                None => out.push_str("  No output produced yet.\n"),
            }
        }
        TaskPanelView::Unavailable(err) => {
            out.push_str(&format!("  Task lookup failed: {err}\n"));
        }
    }

    out
}

pub fn render_upload(view: &ViewerViewModel) -> String {
    match &view.upload {
        UploadView::Done {
            document_id,
            task_id: Some(task_id),
        } => format!("Document uploaded and task created (document {document_id}, task {task_id})"),
        UploadView::Done {
            document_id,
            task_id: None,
        } => format!("Document uploaded (document {document_id})"),
        UploadView::Failed(err) => format!("Upload failed: {err}"),
        _ => "Upload still in progress.".to_string(),
    }
}

fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::{
        update, BinaryRef, DocumentMeta, LoadError, Msg, TaskCreationPolicy, TaskSnapshot,
        ViewerState,
    };
    use serde_json::json;

    fn mounted(document_id: &str) -> ViewerState {
        let state = ViewerState::new(TaskCreationPolicy::AutoCreate);
        let (state, _) = update(
            state,
            Msg::DocumentSelected {
                document_id: document_id.to_string(),
            },
        );
        state
    }

    fn with_metadata(state: ViewerState, document_id: &str) -> ViewerState {
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
        state
    }

    fn with_binary(state: ViewerState) -> ViewerState {
        let epoch = state.epoch();
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
    fn renders_all_panels_for_a_document_without_a_task() {
        let state = with_binary(with_metadata(mounted("doc-1"), "doc-1"));
        let epoch = state.epoch();
        let (state, _) = update(
            state,
            Msg::TasksLoaded {
                epoch,
                result: Ok(Vec::new()),
            },
        );

        let output = render_view(&state.view());
        assert!(output.contains("Invoice_Jan.pdf"));
        assert!(output.contains("Uploaded 2024-01-05 00:00 UTC"));
        assert!(output.contains("Project ID: p1"));
        assert!(output.contains("Folder: Finance"));
        assert!(output.contains("Storage: blob"));
        assert!(output.contains("application/pdf at blob:dossier/00000001"));
        assert!(output.contains("No task created for this document."));
    }

    #[test]
    fn renders_the_resolved_task_with_pretty_output() {
        let state = with_binary(with_metadata(mounted("doc-2"), "doc-2"));
        let epoch = state.epoch();
        let (state, _) = update(
            state,
            Msg::TasksLoaded {
                epoch,
                result: Ok(vec![TaskSnapshot {
                    task_id: "t1".to_string(),
                    document_ids: vec!["doc-2".to_string()],
                    status: "Processed".to_string(),
                    output: json!({ "field": "value" }),
                    modified_ts: "2024-01-06T00:00:00Z".to_string(),
                }]),
            },
        );

        let output = render_view(&state.view());
        assert!(output.contains("Task t1: Processed"));
        assert!(output.contains("\"field\": \"value\""));
    }

    #[test]
    fn failed_metadata_renders_the_error_headline_and_no_preview() {
        let state = mounted("doc-1");
        let epoch = state.epoch();
        let (state, _) = update(
            state,
            Msg::MetadataLoaded {
                epoch,
                result: Err(LoadError::NotFound),
            },
        );
        let (state, _) = update(
            state,
            Msg::TasksLoaded {
                epoch,
                result: Ok(Vec::new()),
            },
        );

        let output = render_view(&state.view());
        assert!(output.contains("Unable to load document: not found"));
        assert!(!output.contains("Preview"));
        assert!(output.contains("No task created for this document."));
    }

    #[test]
    fn download_failure_still_renders_metadata_and_task_panels() {
        let state = with_metadata(mounted("doc-1"), "doc-1");
        let epoch = state.epoch();
        let (state, _) = update(
            state,
            Msg::BinaryLoaded {
                epoch,
                result: Err(LoadError::Transport("status 500".to_string())),
            },
        );
        let (state, _) = update(
            state,
            Msg::TasksLoaded {
                epoch,
                result: Ok(Vec::new()),
            },
        );

        let output = render_view(&state.view());
        assert!(output.contains("Invoice_Jan.pdf"));
        assert!(output.contains("Preview unavailable: transport error: status 500"));
        assert!(output.contains("No task created for this document."));
    }

    #[test]
    fn upload_outcomes_render_their_summaries() {
        let view = |task_id: Option<&str>| {
            let state = ViewerState::new(match task_id {
                Some(_) => TaskCreationPolicy::AutoCreate,
                None => TaskCreationPolicy::Manual,
            });
            let (state, _) = update(
                state,
                Msg::UploadRequested {
                    project_id: "p1".to_string(),
                    folder_name: "Finance".to_string(),
                    file_name: "Invoice_Feb.pdf".to_string(),
                    source_path: "/tmp/Invoice_Feb.pdf".to_string(),
                },
            );
            let (state, _) = update(
                state,
                Msg::UploadFinished {
                    upload_id: 1,
                    result: Ok("doc-9".to_string()),
                },
            );
            let state = match task_id {
                Some(task_id) => {
                    let (state, _) = update(
                        state,
                        Msg::TaskCreateFinished {
                            upload_id: 1,
                            result: Ok(task_id.to_string()),
                        },
                    );
                    state
                }
                None => state,
            };
            state.view()
        };

        assert_eq!(
            render_upload(&view(Some("t-1"))),
            "Document uploaded and task created (document doc-9, task t-1)"
        );
        assert_eq!(
            render_upload(&view(None)),
            "Document uploaded (document doc-9)"
        );
    }
}
