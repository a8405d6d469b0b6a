//! Extraction: raw job description text to an `ExtractionResult`.

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use crate::jd::error::JdError;
use crate::jd::prompts::{extraction_example, EXTRACTION_SYSTEM_TEMPLATE, EXTRACTION_USER_TEMPLATE};
use crate::llm_client::structured::StructuredRequester;
use crate::schema::ExtractionResult;

#[derive(Clone)]
pub struct JdExtractor {
    requester: StructuredRequester,
}

impl JdExtractor {
    pub fn new(requester: StructuredRequester) -> Self {
        Self { requester }
    }

    /// Extracts a posting from `text` and stores `text` verbatim as its `original_text`.
    pub async fn extract_text(&self, text: &str) -> Result<ExtractionResult, JdError> {
        let (system, user) = build_extraction_prompts(text, Local::now().date_naive())?;

        let mut result: ExtractionResult = self
            .requester
            .request(&system, &user)
            .await
            .map_err(|e| {
                error!("Error extracting job description: {e}");
                JdError::Request(e)
            })?;

        result.extracted_jd.original_text = Some(text.to_string());
        info!(
            "Extracted job description '{}'",
            result.extracted_jd.basic_info.job_title
        );
        Ok(result)
    }
}

/// Builds the (system, user) prompt pair for one extraction.
pub fn build_extraction_prompts(
    text: &str,
    today: NaiveDate,
) -> Result<(String, String), serde_json::Error> {
    let example_json = serde_json::to_string_pretty(&extraction_example())?;
    let system = EXTRACTION_SYSTEM_TEMPLATE
        .replace("{today}", &today.format("%Y-%m-%d").to_string())
        .replace("{example_json}", &example_json);
    let user = EXTRACTION_USER_TEMPLATE.replace("{jd_text}", text);
    Ok((system, user))
}
