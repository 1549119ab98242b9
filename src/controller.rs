use crate::render::render_card;
use crate::validation::validate_input;
use crate::workflow::{transition, Effect, Event, WorkflowState};
use crate::{
    CardType, CustomizationField, PreviewError, PreviewProvider, PreviewResult, ProviderConfig,
};
use maud::Markup;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Owns the single [`WorkflowState`] and runs the effects its transitions
/// request against a primary and a fallback provider.
///
/// All mutation goes through `&mut self`, so a second lookup cannot start
/// while one is still being awaited.
#[derive(Clone)]
pub struct PreviewController {
    state: WorkflowState,
    primary: Arc<dyn PreviewProvider>,
    fallback: Arc<dyn PreviewProvider>,
}

impl std::fmt::Debug for PreviewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewController")
            .field("state", &self.state)
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl PreviewController {
    pub fn new(primary: Arc<dyn PreviewProvider>, fallback: Arc<dyn PreviewProvider>) -> Self {
        Self {
            state: WorkflowState::new(),
            primary,
            fallback,
        }
    }

    /// Builds the two HTTP providers described by `config`.
    pub fn new_with_config(config: &ProviderConfig) -> Result<Self, PreviewError> {
        debug!("Initializing PreviewController with custom configuration");
        let (primary, fallback) = config.build()?;
        Ok(Self::new(Arc::new(primary), Arc::new(fallback)))
    }

    /// Providers configured from `LINK_CARD_*` environment variables.
    pub fn from_env() -> Result<Self, PreviewError> {
        Self::new_with_config(&ProviderConfig::from_env())
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn result(&self) -> Option<&PreviewResult> {
        self.state.result()
    }

    /// Applies a synchronous event. Events that would need network access
    /// only record their effect; use [`PreviewController::submit`] to run a
    /// lookup.
    pub fn dispatch(&mut self, event: Event) -> Effect {
        transition(&mut self.state, event)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.dispatch(Event::InputChanged(text.into()));
    }

    pub fn select_card_type(&mut self, card_type: CardType) {
        self.dispatch(Event::SelectCardType(card_type));
    }

    /// Returns `false` when `field` is not a customization key.
    pub fn edit_customization(&mut self, field: &str, value: u32) -> bool {
        let known = CustomizationField::from_key(field).is_some();
        self.dispatch(Event::EditCustomization {
            field: field.to_string(),
            value,
        });
        known
    }

    pub fn toggle_customization_panel(&mut self) {
        self.dispatch(Event::ToggleCustomizationPanel);
    }

    pub fn clear(&mut self) {
        self.dispatch(Event::Clear);
    }

    /// Submits the current input and drives validation, the primary lookup
    /// and, if needed, the fallback lookup to completion.
    #[instrument(level = "debug", skip(self), fields(input = %self.state.url_input))]
    pub async fn submit(&mut self) -> &WorkflowState {
        let mut effect = self.dispatch(Event::Submit);
        loop {
            effect = match effect {
                Effect::None => break,
                Effect::Validate(input) => {
                    self.dispatch(Event::Validated(validate_input(&input)))
                }
                Effect::FetchPrimary(url) => {
                    let outcome = self.primary.fetch_preview(&url).await;
                    self.dispatch(Event::PrimaryResolved(outcome))
                }
                Effect::FetchFallback(url) => {
                    let outcome = self.fallback.fetch_preview(&url).await;
                    self.dispatch(Event::FallbackResolved(outcome))
                }
            };
        }
        &self.state
    }

    /// Convenience for `set_input` followed by `submit`.
    pub async fn lookup(&mut self, text: impl Into<String>) -> &WorkflowState {
        self.set_input(text);
        self.submit().await
    }

    /// HTML of the card currently displayed, if any.
    pub fn render(&self) -> Option<Markup> {
        self.state
            .result()
            .map(|result| render_card(result, &self.state.customization, self.state.card_type))
    }

    /// Rasterizes the displayed card. Fails when nothing is displayed.
    #[cfg(feature = "export")]
    pub async fn export_png(
        &self,
        exporter: &crate::CardExporter,
    ) -> Result<Vec<u8>, PreviewError> {
        let result = self.state.result().ok_or_else(|| {
            PreviewError::ExportError("No card is displayed".to_string())
        })?;
        exporter
            .export_png(result, &self.state.customization, self.state.card_type)
            .await
    }

    /// Writes the displayed card to `dir/link-preview.png`.
    #[cfg(feature = "export")]
    pub async fn export_to_dir(
        &self,
        exporter: &crate::CardExporter,
        dir: &std::path::Path,
    ) -> Result<std::path::PathBuf, PreviewError> {
        let result = self.state.result().ok_or_else(|| {
            PreviewError::ExportError("No card is displayed".to_string())
        })?;
        exporter
            .export_to_dir(dir, result, &self.state.customization, self.state.card_type)
            .await
    }
}
