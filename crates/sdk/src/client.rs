//! Waitlist Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    Activity, CleanupResponse, Entry, EntryStatus, ErrorBody, HealthResponse, QueuePosition,
    RemoveRequest, RemoveResponse, SubmitRequest, UpdateStatusRequest,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Waitlist Engine Client
///
/// # Example
///
/// ```no_run
/// use waitlist_sdk::WaitlistClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WaitlistClient::connect("http://127.0.0.1:8787")?;
/// for entry in client.list().await? {
///     println!("{} ({})", entry.name, entry.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WaitlistClient {
    client: Client,
    base_url: String,
}

impl WaitlistClient {
    /// Create a client for the daemon at `url` (e.g. `http://127.0.0.1:8787`)
    pub fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SdkError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let (message, detail) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => (body.message, body.error),
                Err(_) => (String::from_utf8_lossy(&bytes).into_owned(), None),
            };
            return Err(SdkError::Http {
                status: status.as_u16(),
                message,
                detail,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Join the waitlist
    pub async fn submit(&self, request: &SubmitRequest) -> Result<Entry> {
        self.send_json(Method::POST, "/api/user", request).await
    }

    /// Leave the waitlist (or mark served)
    pub async fn remove(&self, id: &str) -> Result<RemoveResponse> {
        self.send_json(Method::DELETE, "/api/user", &RemoveRequest { id }).await
    }

    /// Change an entry's status
    pub async fn set_status(&self, id: &str, status: EntryStatus) -> Result<Entry> {
        self.send_json(Method::PUT, "/api/user", &UpdateStatusRequest { id, status }).await
    }

    /// Current entries, unordered (the server sweeps expired ones first)
    pub async fn list(&self) -> Result<Vec<Entry>> {
        self.send(self.request(Method::GET, "/api/users")).await
    }

    /// Trigger an expiry sweep
    pub async fn cleanup(&self) -> Result<CleanupResponse> {
        self.send(self.request(Method::GET, "/api/cleanup")).await
    }

    /// Server-ordered queue with estimated waits
    pub async fn queue(&self) -> Result<Vec<QueuePosition>> {
        self.send(self.request(Method::GET, "/api/queue")).await
    }

    /// The deployment's activity catalog
    pub async fn activities(&self) -> Result<Vec<Activity>> {
        self.send(self.request(Method::GET, "/api/activities")).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }
}
