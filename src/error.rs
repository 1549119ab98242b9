use crate::validation::{EMPTY_INPUT_MESSAGE, INVALID_INPUT_MESSAGE};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    InputEmpty,

    #[error("{}", INVALID_INPUT_MESSAGE)]
    InputMalformed(String),

    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("Request timeout: {0}")]
    TimeoutError(String),

    #[error("Provider {service} returned status {status}")]
    ProviderStatus { service: String, status: u16 },

    #[error("Failed to extract metadata: {0}")]
    ExtractError(String),

    #[error("External service error: {service} - {message}")]
    ExternalServiceError { service: String, message: String },

    #[error("Failed to export card: {0}")]
    ExportError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    /// Message suitable for showing next to the url input.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub(crate) fn from_reqwest(service: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PreviewError::TimeoutError(format!("{service}: {e}"))
        } else if e.is_decode() {
            PreviewError::ExtractError(format!("{service}: {e}"))
        } else if let Some(status) = e.status() {
            PreviewError::ProviderStatus {
                service: service.to_string(),
                status: status.as_u16(),
            }
        } else {
            PreviewError::ExternalServiceError {
                service: service.to_string(),
                message: e.to_string(),
            }
        }
    }

    pub fn log(&self) {
        match self {
            PreviewError::InputEmpty => {
                warn!("Submitted an empty url");
            }
            PreviewError::InputMalformed(input) => {
                warn!(input = %input, "Submitted input is not a url");
            }
            PreviewError::FetchError(e) => {
                error!(error = %e, "Content fetch failed");
            }
            PreviewError::TimeoutError(e) => {
                warn!(error = %e, "Request timed out");
            }
            PreviewError::ProviderStatus { service, status } => {
                warn!(
                    service = %service,
                    status = *status,
                    "Provider returned a non-success status"
                );
            }
            PreviewError::ExtractError(e) => {
                error!(error = %e, "Metadata extraction failed");
            }
            PreviewError::ExternalServiceError { service, message } => {
                error!(
                    service = %service,
                    error = %message,
                    "External service error occurred"
                );
            }
            PreviewError::ExportError(e) => {
                error!(error = %e, "Card export failed");
            }
            PreviewError::InvalidConfiguration(e) => {
                error!(error = %e, "Invalid configuration");
            }
            PreviewError::Io(e) => {
                error!(error = %e, "IO operation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_carry_user_messages() {
        assert_eq!(
            PreviewError::InputEmpty.user_message(),
            "Please enter an url to continue"
        );
        assert_eq!(
            PreviewError::InputMalformed("nope".into()).user_message(),
            "Please Enter a valid url!"
        );
    }

    #[test]
    fn provider_errors_name_the_service() {
        let err = PreviewError::ProviderStatus {
            service: "primary".into(),
            status: 500,
        };
        assert_eq!(err.to_string(), "Provider primary returned status 500");
        assert_eq!(
            PreviewError::ExportError("No card is displayed".into()).to_string(),
            "Failed to export card: No card is displayed"
        );
    }
}
