//! Checks performed on the url input before any provider is contacted.

use crate::PreviewError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter an url to continue";
pub const INVALID_INPUT_MESSAGE: &str = "Please Enter a valid url!";

// optional scheme, domain name or ipv4, optional port, path, query and fragment
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(https?://)?",
        r"((([a-z\d]([a-z\d-]*[a-z\d])*)\.)+[a-z]{2,}|((\d{1,3}\.){3}\d{1,3}))",
        r"(:\d+)?(/[-a-z\d%_.~+@]*)*",
        r"(\?[;&a-z\d%_.~+=-]*)?",
        r"(#[-a-z\d_]*)?$",
    ))
    .expect("url pattern is a valid regex")
});

/// Outcome of checking the text typed into the url input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlCheck {
    Empty,
    InvalidFormat,
    Valid,
}

impl UrlCheck {
    /// Rejected input becomes the error whose message is shown next to it.
    pub fn into_result(self, input: &str) -> Result<(), PreviewError> {
        match self {
            UrlCheck::Empty => Err(PreviewError::InputEmpty),
            UrlCheck::InvalidFormat => Err(PreviewError::InputMalformed(input.to_string())),
            UrlCheck::Valid => Ok(()),
        }
    }
}

pub fn validate_input(input: &str) -> UrlCheck {
    if input.is_empty() {
        UrlCheck::Empty
    } else if !URL_PATTERN.is_match(input) {
        UrlCheck::InvalidFormat
    } else {
        UrlCheck::Valid
    }
}
