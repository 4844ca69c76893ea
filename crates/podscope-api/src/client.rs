//! HTTP client for the podscope backend

use std::fmt;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use podscope_types::{
    ContextsResponse, DescribeResponse, LogsResponse, PodDescription, PodRef, PodSummary,
    PodsResponse, backend_error,
};

use crate::ApiError;

/// HTTP Basic credentials sent with every request
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Backend client; cheap to clone, clones share the connection pool
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    credentials: Option<Credentials>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` without a request timeout
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, credentials, None)
    }

    /// Create a client, optionally bounding every request by `timeout`
    pub fn with_timeout(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// List the names of all contexts known to the backend
    pub async fn contexts(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "contexts"])?;
        let response: ContextsResponse = self.get_json(url).await?;
        Ok(response.contexts)
    }

    /// List pods for one context, or for every context with `all`
    pub async fn pods(&self, context: &str) -> Result<Vec<PodSummary>, ApiError> {
        let url = self.endpoint(&["api", "pods", context])?;
        let response: PodsResponse = self.get_json(url).await?;
        tracing::debug!(context, count = response.pods.len(), "Loaded pods");
        Ok(response.pods)
    }

    /// Fetch the current logs of a pod
    pub async fn logs(&self, pod: &PodRef) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "logs", &pod.context, &pod.namespace, &pod.pod])?;
        let response: LogsResponse = self.get_json(url).await?;

        if let Some(error) = backend_error(response.error) {
            return Err(ApiError::Backend(error));
        }
        Ok(response.logs.unwrap_or_default())
    }

    /// Fetch the events and manifest of a pod
    pub async fn describe(&self, pod: &PodRef) -> Result<PodDescription, ApiError> {
        let url = self.endpoint(&["api", "describe", &pod.context, &pod.namespace, &pod.pod])?;
        let response: DescribeResponse = self.get_json(url).await?;

        if let Some(error) = backend_error(response.error) {
            return Err(ApiError::Backend(error));
        }
        response.pod_details.ok_or(ApiError::Incomplete("pod_details"))
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");

        let mut request = self.http.get(url.clone());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "Backend rejected credentials");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Unexpected backend status");
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
