//! Activation errors

use ajaxify_css::SelectorError;

/// Error raised while activating a container.
///
/// Event handling itself never fails; this is the only error surface.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("Container '{0}' is already active")]
    DuplicateContainer(String),

    #[error("No element with id '{0}' in the document")]
    MissingRoot(String),

    #[error("Invalid selector '{selector}': {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
