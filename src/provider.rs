use crate::{Fetcher, FetcherConfig, PreviewError, PreviewResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_PRIMARY_ENDPOINT: &str =
    "https://v1.nocodeapi.com/20010349/link_preview/SBpgGHsbTkmhONvx";
pub const DEFAULT_FALLBACK_ENDPOINT: &str = "https://api.linkpreview.net/";

/// Anything that can turn a page url into preview metadata.
#[async_trait]
pub trait PreviewProvider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    async fn fetch_preview(&self, url: &str) -> Result<PreviewResult, PreviewError>;
}

/// Query-string shape understood by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// `?url=<value>&apikey=<key>`, the key being optional.
    UrlParam,
    /// `?key=<key>&q=<value>`
    KeyAndQ,
}

/// JSON body returned by both providers. Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl From<ProviderResponse> for PreviewResult {
    fn from(resp: ProviderResponse) -> Self {
        PreviewResult::new(
            resp.title.unwrap_or_default(),
            resp.description.unwrap_or_default(),
            resp.image.unwrap_or_default(),
            resp.url.unwrap_or_default(),
            resp.publisher,
        )
    }
}

/// A metadata provider reached over plain HTTP GET.
#[derive(Clone)]
pub struct HttpPreviewProvider {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    style: QueryStyle,
    fetcher: Fetcher,
}

impl HttpPreviewProvider {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        style: QueryStyle,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            style,
            fetcher,
        }
    }

    /// Query pairs sent for `url`, in request order.
    pub fn query_pairs<'a>(&'a self, url: &'a str) -> Vec<(&'a str, &'a str)> {
        match self.style {
            QueryStyle::UrlParam => {
                let mut pairs = vec![("url", url)];
                if let Some(key) = &self.api_key {
                    pairs.push(("apikey", key.as_str()));
                }
                pairs
            }
            QueryStyle::KeyAndQ => {
                vec![("key", self.api_key.as_deref().unwrap_or("")), ("q", url)]
            }
        }
    }
}

#[async_trait]
impl PreviewProvider for HttpPreviewProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(level = "debug", skip(self), fields(provider = %self.name), err)]
    async fn fetch_preview(&self, url: &str) -> Result<PreviewResult, PreviewError> {
        let query = self.query_pairs(url);
        let response: ProviderResponse = self
            .fetcher
            .get_json(&self.name, &self.endpoint, &query)
            .await?;

        debug!(provider = %self.name, "Provider returned preview metadata");
        Ok(response.into())
    }
}

/// Endpoints and keys of the two providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub primary_endpoint: String,
    pub primary_api_key: Option<String>,
    pub fallback_endpoint: String,
    pub fallback_api_key: Option<String>,
    pub fetcher: FetcherConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            primary_endpoint: DEFAULT_PRIMARY_ENDPOINT.to_string(),
            primary_api_key: None,
            fallback_endpoint: DEFAULT_FALLBACK_ENDPOINT.to_string(),
            fallback_api_key: None,
            fetcher: FetcherConfig::default(),
        }
    }
}

impl ProviderConfig {
    pub const PRIMARY_ENDPOINT_VAR: &'static str = "LINK_CARD_PRIMARY_ENDPOINT";
    pub const PRIMARY_API_KEY_VAR: &'static str = "LINK_CARD_PRIMARY_API_KEY";
    pub const FALLBACK_ENDPOINT_VAR: &'static str = "LINK_CARD_FALLBACK_ENDPOINT";
    pub const FALLBACK_API_KEY_VAR: &'static str = "LINK_CARD_FALLBACK_API_KEY";

    /// Defaults overridden by whichever `LINK_CARD_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty(Self::PRIMARY_ENDPOINT_VAR) {
            config.primary_endpoint = endpoint;
        }
        if let Some(key) = non_empty(Self::PRIMARY_API_KEY_VAR) {
            debug!("Found primary provider key in environment");
            config.primary_api_key = Some(key);
        }
        if let Some(endpoint) = non_empty(Self::FALLBACK_ENDPOINT_VAR) {
            config.fallback_endpoint = endpoint;
        }
        if let Some(key) = non_empty(Self::FALLBACK_API_KEY_VAR) {
            debug!("Found fallback provider key in environment");
            config.fallback_api_key = Some(key);
        }
        config
    }

    pub fn validate(&self) -> Result<(), PreviewError> {
        for endpoint in [&self.primary_endpoint, &self.fallback_endpoint] {
            let parsed = Url::parse(endpoint).map_err(|e| {
                PreviewError::InvalidConfiguration(format!("Invalid endpoint {endpoint}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(PreviewError::InvalidConfiguration(format!(
                    "Endpoint must use http or https: {endpoint}"
                )));
            }
        }

        if self
            .fallback_api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty())
        {
            return Err(PreviewError::InvalidConfiguration(
                "Fallback provider API key cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds the primary and fallback providers sharing one HTTP client.
    pub fn build(&self) -> Result<(HttpPreviewProvider, HttpPreviewProvider), PreviewError> {
        self.validate()?;
        let fetcher = Fetcher::new_with_config(self.fetcher.clone())?;

        let primary = HttpPreviewProvider::new(
            "primary",
            self.primary_endpoint.clone(),
            self.primary_api_key.clone(),
            QueryStyle::UrlParam,
            fetcher.clone(),
        );
        let fallback = HttpPreviewProvider::new(
            "fallback",
            self.fallback_endpoint.clone(),
            self.fallback_api_key.clone(),
            QueryStyle::KeyAndQ,
            fetcher,
        );
        Ok((primary, fallback))
    }
}
