use crate::PreviewError;
use reqwest::{header::HeaderMap, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

pub const DEFAULT_USER_AGENT: &str = "link_preview_card/0.1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over a shared reqwest client used for provider lookups and
/// thumbnail downloads.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        debug!("Fetcher initialized with default configuration");
        Self::new_with_config(FetcherConfig::default()).unwrap_or_else(|e| {
            error!(error = %e, "Failed to create HTTP client");
            panic!("Failed to initialize HTTP client: {}", e);
        })
    }

    /// Creates a Fetcher with custom configuration
    pub fn new_with_config(config: FetcherConfig) -> Result<Self, PreviewError> {
        let mut client_builder = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .pool_max_idle_per_host(10);

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        if config.no_proxy {
            client_builder = client_builder.no_proxy();
        }

        let client = client_builder.build().map_err(|e| {
            PreviewError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client })
    }

    /// Issues a GET with `query` appended to `endpoint` and decodes the JSON
    /// body. Non-success statuses are errors, the body is not read.
    #[instrument(level = "debug", skip(self, query), err)]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &str,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PreviewError> {
        debug!(service = %service, "Starting provider request");

        let response = self
            .client
            .get(endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, service = %service, "Failed to send request");
                PreviewError::from_reqwest(service, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(service = %service, status = %status, "Provider responded with an error status");
            return Err(PreviewError::ProviderStatus {
                service: service.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, service = %service, "Failed to read response body");
            PreviewError::from_reqwest(service, e)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, service = %service, "Failed to parse provider response");
            PreviewError::ExtractError(format!("{service}: {e}"))
        })
    }

    /// Downloads raw bytes, used for card thumbnails.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PreviewError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to fetch image");
            PreviewError::FetchError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::FetchError(format!(
                "{url} returned status: {status}"
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to read image body");
            PreviewError::FetchError(e.to_string())
        })?;

        debug!(url = %url, content_length = bytes.len(), "Successfully fetched image");
        Ok(bytes.to_vec())
    }
}

/// HTTP client settings shared by every request the crate makes.
///
/// # Examples
/// ```ignore
/// let fetcher = Fetcher::new_with_config(FetcherConfig {
///     user_agent: "my-custom-agent/1.0".to_string(),
///     timeout: Duration::from_secs(20),
///     headers: None,
///     no_proxy: false,
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub headers: Option<HeaderMap>,
    /// Ignore proxies configured through the environment.
    pub no_proxy: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: None,
            no_proxy: false,
        }
    }
}
