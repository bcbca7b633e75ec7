//! HTTP client for the API under test.
//!
//! Every call is attempted exactly once. Non-2xx responses come back as
//! [`ClientError::Status`] so that cases can match on the expected code.

use reqwest::{header, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ClientError;

/// A 2xx response with its raw body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Status code as a plain number.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// True when the body carries no content (or only JSON `null`).
    pub fn is_empty(&self) -> bool {
        let body = self.body.trim();
        body.is_empty() || body == "null"
    }
}

/// Client bound to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// `GET path`
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// `POST path` without a body.
    pub async fn post(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send::<()>(Method::POST, path, None).await
    }

    /// `POST path` with a form-encoded body.
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send(Method::POST, path, Some(form)).await
    }

    /// `PUT path` without a body.
    pub async fn put(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send::<()>(Method::PUT, path, None).await
    }

    /// `PUT path` with a form-encoded body.
    pub async fn put_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send(Method::PUT, path, Some(form)).await
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    /// Resolves `path` against the base URL. Absolute paths replace the base path.
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        form: Option<&T>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} {} -> {}", method, path, status.as_u16());

        if !status.is_success() {
            return Err(ClientError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse { status, body })
    }
}
