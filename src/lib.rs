mod controller;
mod customization;
mod error;
#[cfg(feature = "export")]
mod export;
mod fetcher;
mod layout;
#[cfg(feature = "logging")]
mod logging;
mod provider;
mod render;
mod svg;
mod utils;
mod validation;
mod workflow;

pub use controller::PreviewController;
pub use customization::{CardType, Customization, CustomizationField};
pub use error::PreviewError;
#[cfg(feature = "export")]
pub use export::{CardExporter, EXPORT_FILE_NAME, MAX_CANVAS_SIDE};
pub use fetcher::{Fetcher, FetcherConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use layout::{CardLayout, Rect, TextBlock, TextRole};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_preview_card, setup_logging, LogConfig};
pub use provider::{
    HttpPreviewProvider, PreviewProvider, ProviderConfig, ProviderResponse, QueryStyle,
    DEFAULT_FALLBACK_ENDPOINT, DEFAULT_PRIMARY_ENDPOINT,
};
pub use render::{render_card, render_page, CARD_STYLESHEET};
pub use svg::render_svg;
pub use validation::{validate_input, UrlCheck, EMPTY_INPUT_MESSAGE, INVALID_INPUT_MESSAGE};
pub use workflow::{transition, Effect, Event, Phase, WorkflowState};

/// Publisher shown when a provider does not report one.
pub const NO_PUBLISHER: &str = "No publisher found";

/// Link preview metadata as stored by the workflow and consumed by the
/// card renderers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreviewResult {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub publisher: String,
}

impl PreviewResult {
    /// Builds a result, defaulting a missing or blank publisher.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        url: impl Into<String>,
        publisher: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: image.into(),
            url: url.into(),
            publisher: publisher
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| NO_PUBLISHER.to_string()),
        }
    }

    /// Placeholder displayed once every provider has failed.
    pub fn no_response() -> Self {
        Self::new(
            "No response",
            "Could not generate a preview for this url",
            "",
            "",
            None,
        )
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    /// Applies the publisher default to a result built elsewhere.
    pub fn normalized(mut self) -> Self {
        if self.publisher.trim().is_empty() {
            self.publisher = NO_PUBLISHER.to_string();
        }
        self
    }
}
