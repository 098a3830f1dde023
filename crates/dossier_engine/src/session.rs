use url::Url;

use crate::ApiError;

/// Explicit session handed to the API client at construction: base URL plus
/// an optional bearer credential. The client attaches the credential to every
/// request; nothing else in the workspace ever constructs or inspects it.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    bearer: Option<String>,
}

impl Session {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            bearer: None,
        })
    }

    /// Attaches a bearer credential; the login transition.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Drops the credential; subsequent requests go out unauthenticated.
    pub fn clear_bearer(&mut self) {
        self.bearer = None;
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }
}
