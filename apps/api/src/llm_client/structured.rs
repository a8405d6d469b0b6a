//! Structured requests: one model call and one schema validation per request, no retries.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::llm_client::prompts::ensure_json_instruction;
use crate::llm_client::{strip_json_fences, ChatModel, LlmError};
use crate::schema::validation::SchemaValidationError;
use crate::schema::ResponseSchema;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("model request failed: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

impl RequestError {
    /// The validation error, if this failure is a boolean field holding a non-boolean.
    pub fn boolean_coercion(&self) -> Option<&SchemaValidationError> {
        match self {
            RequestError::Schema(err) if err.is_boolean_coercion() => Some(err),
            _ => None,
        }
    }
}

/// Sends a system/user prompt pair to a `ChatModel` and validates the reply into `T`.
#[derive(Clone)]
pub struct StructuredRequester {
    model: Arc<dyn ChatModel>,
}

impl StructuredRequester {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn request<T: ResponseSchema>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, RequestError> {
        let system = ensure_json_instruction(system);

        let reply = self.model.complete_json(&system, user).await.map_err(|e| {
            error!("Model request for {} failed: {e}", T::NAME);
            RequestError::Model(e)
        })?;

        parse_reply::<T>(&reply).map_err(|e| {
            error!("Model reply failed schema validation: {e}");
            RequestError::Schema(e)
        })
    }
}

/// Parses raw reply text and validates it against `T`.
pub fn parse_reply<T: ResponseSchema>(reply: &str) -> Result<T, SchemaValidationError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))
        .map_err(|e| SchemaValidationError::invalid_json(T::NAME, &e))?;
    let record = T::from_value(&value)?;
    debug!("Model reply validated as {}", T::NAME);
    Ok(record)
}
