//! The lookup state machine.
//!
//! Every user action and every provider completion is an [`Event`];
//! [`transition`] applies it to a [`WorkflowState`] and reports the side
//! effect the caller has to run next. Nothing here touches the network, so
//! the whole machine can be driven synchronously in tests.

use crate::{CardType, Customization, PreviewError, PreviewResult, UrlCheck};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input. Holds the message of the last rejected input.
    Idle { error: Option<String> },
    Validating,
    Loading { url: String },
    FallbackLoading { url: String },
    Success(PreviewResult),
    /// Both providers failed; holds the placeholder result.
    Failure(PreviewResult),
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle { error: None }
    }
}

#[derive(Debug)]
pub enum Event {
    InputChanged(String),
    Submit,
    Validated(UrlCheck),
    PrimaryResolved(Result<PreviewResult, PreviewError>),
    FallbackResolved(Result<PreviewResult, PreviewError>),
    SelectCardType(CardType),
    EditCustomization { field: String, value: u32 },
    ToggleCustomizationPanel,
    Clear,
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Validate(String),
    FetchPrimary(String),
    FetchFallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowState {
    pub url_input: String,
    pub phase: Phase,
    pub show_customization_panel: bool,
    pub card_type: CardType,
    pub customization: Customization,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            Phase::Validating | Phase::Loading { .. } | Phase::FallbackLoading { .. }
        )
    }

    /// Inline message for the url input, only ever set while idle.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&PreviewResult> {
        match &self.phase {
            Phase::Success(result) | Phase::Failure(result) => Some(result),
            _ => None,
        }
    }

    /// Whether a new submission would be accepted.
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    /// The action button shows "Clear" once a card is displayed and the
    /// input is empty again.
    pub fn can_clear(&self) -> bool {
        self.result().is_some() && self.url_input.is_empty()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Applies `event` to `state` and returns the effect to perform.
pub fn transition(state: &mut WorkflowState, event: Event) -> Effect {
    match event {
        Event::InputChanged(text) => {
            if let Phase::Idle { error } = &mut state.phase {
                *error = None;
            }
            state.url_input = text;
            Effect::None
        }
        Event::Submit => {
            if !state.can_submit() {
                debug!("Ignoring submit while a lookup is in flight");
                return Effect::None;
            }
            state.phase = Phase::Validating;
            Effect::Validate(state.url_input.clone())
        }
        Event::Validated(check) => {
            if state.phase != Phase::Validating {
                return Effect::None;
            }
            match check.into_result(&state.url_input) {
                Err(e) => {
                    e.log();
                    state.phase = Phase::Idle {
                        error: Some(e.user_message()),
                    };
                    Effect::None
                }
                Ok(()) => {
                    let url = state.url_input.clone();
                    state.phase = Phase::Loading { url: url.clone() };
                    Effect::FetchPrimary(url)
                }
            }
        }
        Event::PrimaryResolved(outcome) => {
            let url = match &state.phase {
                Phase::Loading { url } => url.clone(),
                _ => {
                    debug!("Dropping stale primary provider response");
                    return Effect::None;
                }
            };
            match outcome {
                Ok(result) => {
                    settle(state, Phase::Success(result.normalized()));
                    Effect::None
                }
                Err(e) => {
                    warn!(error = %e, url = %url, "Primary provider failed, trying fallback");
                    state.phase = Phase::FallbackLoading { url: url.clone() };
                    Effect::FetchFallback(url)
                }
            }
        }
        Event::FallbackResolved(outcome) => {
            if !matches!(state.phase, Phase::FallbackLoading { .. }) {
                debug!("Dropping stale fallback provider response");
                return Effect::None;
            }
            match outcome {
                Ok(result) => settle(state, Phase::Success(result.normalized())),
                Err(e) => {
                    e.log();
                    settle(state, Phase::Failure(PreviewResult::no_response()));
                }
            }
            Effect::None
        }
        Event::SelectCardType(card_type) => {
            state.customization.apply_card_type(card_type);
            state.card_type = card_type;
            Effect::None
        }
        Event::EditCustomization { field, value } => {
            if !state.customization.set_field(&field, value) {
                debug!(field = %field, "Ignoring unknown customization field");
            }
            Effect::None
        }
        Event::ToggleCustomizationPanel => {
            if state.result().is_some() {
                state.show_customization_panel = !state.show_customization_panel;
            }
            Effect::None
        }
        Event::Clear => {
            if state.result().is_some() {
                state.reset();
            }
            Effect::None
        }
    }
}

fn settle(state: &mut WorkflowState, phase: Phase) {
    state.phase = phase;
    state.url_input.clear();
}
