use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart;

use crate::blob::PDF_MIME;
use crate::types::{CreatedDocument, CreatedTask};
use crate::{ApiError, DocumentRecord, Envelope, Session, TaskRecord, UploadRequest};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

/// The five workspace operations this client consumes.
#[async_trait::async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn document_metadata(&self, document_id: &str) -> Result<DocumentRecord, ApiError>;
    async fn download_document(&self, document_id: &str) -> Result<Bytes, ApiError>;
    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, ApiError>;
    async fn create_task(&self, document_ids: &[String]) -> Result<String, ApiError>;
    async fn upload_document(&self, request: UploadRequest) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
    settings: ClientSettings,
}

impl ApiClient {
    pub fn new(session: Session, settings: ClientSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            http,
            session,
            settings,
        })
    }

    fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.session.endpoint(path)?;
        Ok(self.authorize(self.http.get(url)))
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.session.endpoint(path)?;
        Ok(self.authorize(self.http.post(url)))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.bearer() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }
}

#[async_trait::async_trait]
impl WorkspaceApi for ApiClient {
    async fn document_metadata(&self, document_id: &str) -> Result<DocumentRecord, ApiError> {
        let response = self
            .get(&format!("/api/v1/document/{document_id}"))?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn download_document(&self, document_id: &str) -> Result<Bytes, ApiError> {
        let response = self
            .get(&format!("/api/v1/document/{document_id}/download"))?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response.status())?;

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(bytes))
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, ApiError> {
        let response = self
            .get("/api/v1/task")?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn create_task(&self, document_ids: &[String]) -> Result<String, ApiError> {
        let body = serde_json::json!({ "documentIds": document_ids });
        let response = self
            .post("/api/v1/task")?
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: CreatedTask = decode(response).await?;
        Ok(created.task_id)
    }

    async fn upload_document(&self, request: UploadRequest) -> Result<String, ApiError> {
        let part = multipart::Part::bytes(request.bytes.to_vec())
            .file_name(request.file_name)
            .mime_str(PDF_MIME)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let form = multipart::Form::new()
            .text("projectId", request.project_id)
            .text("folderName", request.folder_name)
            .text("documentType", request.document_type)
            .part("document", part);
        let response = self
            .post("/api/v1/document")?
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: CreatedDocument = decode(response).await?;
        Ok(created.document_id)
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        404 => Err(ApiError::NotFound),
        401 | 403 => Err(ApiError::Unauthorized),
        code => Err(ApiError::Status(code)),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}

async fn decode<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    check_status(response.status())?;
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(envelope.result)
}
