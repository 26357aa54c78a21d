use thiserror::Error;

/// How an orchestrator should react to a failed step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// Substitute an empty result and keep going
    Degradable,
    /// Surface to the caller
    Fatal,
    /// Reject before touching any collaborator
    InvalidInput,
}

#[derive(Error, Debug)]
pub enum PhotoSearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Labeling or metadata lookup failed during ingestion
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Search backend error: {0}")]
    Search(String),

    #[error("Intent resolution error: {0}")]
    IntentResolution(String),

    #[error("Index write failed: {0}")]
    IndexWrite(String),

    #[error("Error generating pre-signed URL: {0}")]
    LinkGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PhotoSearchError {
    pub fn tier(&self) -> ErrorTier {
        match self {
            PhotoSearchError::InvalidInput(_) => ErrorTier::InvalidInput,
            PhotoSearchError::Collaborator(_) | PhotoSearchError::Search(_) => {
                ErrorTier::Degradable
            }
            _ => ErrorTier::Fatal,
        }
    }

    pub fn is_degradable(&self) -> bool {
        self.tier() == ErrorTier::Degradable
    }
}

pub type Result<T> = std::result::Result<T, PhotoSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_tiers() {
        assert_eq!(
            PhotoSearchError::InvalidInput("missing key".into()).tier(),
            ErrorTier::InvalidInput
        );
        assert!(PhotoSearchError::Collaborator("rekognition down".into()).is_degradable());
        assert!(PhotoSearchError::Search("timeout".into()).is_degradable());
        assert_eq!(
            PhotoSearchError::IndexWrite("noop".into()).tier(),
            ErrorTier::Fatal
        );
        assert_eq!(
            PhotoSearchError::LinkGeneration("denied".into()).tier(),
            ErrorTier::Fatal
        );
    }

    #[test]
    fn test_link_error_message() {
        let err = PhotoSearchError::LinkGeneration("access denied".into());
        assert_eq!(err.to_string(), "Error generating pre-signed URL: access denied");
    }
}
