/// HTTP-backed client directory
///
/// Implements the [`Directory`] trait over the fieldlog API so front ends
/// run the same resolution code the server tests against in memory.
///
/// # Endpoint mapping
///
/// - `search` -> `GET /v1/clients/search?q=<pattern>&limit=<n>`
/// - `insert` -> `POST /v1/clients` (409 becomes `Conflict`)
/// - `find_exact` -> `GET /v1/clients/lookup?name=<name>` (404 becomes `None`)
///
/// # Example
///
/// ```no_run
/// use fieldlog_client::HttpDirectory;
/// use fieldlog_shared::directory::Directory;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let directory = HttpDirectory::new("http://localhost:8080", "access-token")?;
/// let results = directory.search("acme", 5).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use fieldlog_shared::directory::{ClientRecord, Directory, DirectoryError};

/// Request timeout for directory calls
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct CreateClientRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    error: String,
    message: String,
}

/// Client directory talking to a fieldlog API server
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpDirectory {
    /// Creates a directory for the given API base URL and access token
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DirectoryError::Transient(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extracts the server's error message, falling back to the status code
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("Request failed with status {}", status),
        }
    }
}

fn transport_error(err: reqwest::Error) -> DirectoryError {
    tracing::warn!(error = %err, "directory request failed");
    DirectoryError::Transient(format!("Request failed: {}", err))
}

#[async_trait]
impl Directory for HttpDirectory {
    async fn search(
        &self,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ClientRecord>, DirectoryError> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(self.url("/v1/clients/search"))
            .bearer_auth(&self.access_token)
            .query(&[("q", pattern), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<ClientRecord>>()
                .await
                .map_err(transport_error),
            status if status.is_client_error() => Err(DirectoryError::Validation(
                Self::error_message(response).await,
            )),
            _ => Err(DirectoryError::Transient(
                Self::error_message(response).await,
            )),
        }
    }

    async fn insert(&self, name: &str) -> Result<ClientRecord, DirectoryError> {
        let response = self
            .http
            .post(self.url("/v1/clients"))
            .bearer_auth(&self.access_token)
            .json(&CreateClientRequest { name })
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                response.json::<ClientRecord>().await.map_err(transport_error)
            }
            StatusCode::CONFLICT => Err(DirectoryError::Conflict),
            status if status.is_client_error() => Err(DirectoryError::Validation(
                Self::error_message(response).await,
            )),
            _ => Err(DirectoryError::Transient(
                Self::error_message(response).await,
            )),
        }
    }

    async fn find_exact(&self, name: &str) -> Result<Option<ClientRecord>, DirectoryError> {
        let response = self
            .http
            .get(self.url("/v1/clients/lookup"))
            .bearer_auth(&self.access_token)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response
                .json::<ClientRecord>()
                .await
                .map(Some)
                .map_err(transport_error),
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_client_error() => Err(DirectoryError::Validation(
                Self::error_message(response).await,
            )),
            _ => Err(DirectoryError::Transient(
                Self::error_message(response).await,
            )),
        }
    }
}
