use thiserror::Error;

use crate::documents::DocumentError;
use crate::llm_client::structured::RequestError;
use crate::schema::validation::SchemaValidationError;

#[derive(Debug, Error)]
pub enum JdError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Request(#[from] RequestError),

    /// The boolean repair attempt failed too. `initial` is the failure that triggered it.
    #[error("boolean repair attempt failed: {source}")]
    EnhancementFailed {
        initial: SchemaValidationError,
        #[source]
        source: RequestError,
    },

    #[error("failed to encode job posting: {0}")]
    Encode(#[from] serde_json::Error),
}

impl JdError {
    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            JdError::Document(DocumentError::UnsupportedFormat { .. })
        )
    }
}
