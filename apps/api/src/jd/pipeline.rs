use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::documents::DocumentTextExtractor;
use crate::jd::enhancement::JdEnhancer;
use crate::jd::error::JdError;
use crate::jd::extraction::JdExtractor;
use crate::schema::{EnhancementResult, ExtractionResult};

/// Owns the document reader and both orchestrators. Built once at startup and shared.
pub struct JdPipeline {
    documents: DocumentTextExtractor,
    extractor: JdExtractor,
    enhancer: JdEnhancer,
}

impl JdPipeline {
    pub fn new(
        documents: DocumentTextExtractor,
        extractor: JdExtractor,
        enhancer: JdEnhancer,
    ) -> Self {
        Self {
            documents,
            extractor,
            enhancer,
        }
    }

    /// Upload → text → `ExtractionResult`.
    pub async fn extract_upload(
        &self,
        filename: &str,
        data: Bytes,
    ) -> Result<ExtractionResult, JdError> {
        let text = self.documents.extract_text(filename, data).await?;
        info!("Parsed {} characters from '{filename}'", text.chars().count());
        self.extractor.extract_text(&text).await
    }

    pub async fn enhance(&self, extracted_jd: &Value) -> Result<EnhancementResult, JdError> {
        self.enhancer.enhance(extracted_jd).await
    }

    /// Upload → text → extraction → enhancement. Nothing partial is returned on failure.
    pub async fn extract_and_enhance(
        &self,
        filename: &str,
        data: Bytes,
    ) -> Result<EnhancementResult, JdError> {
        info!("Extracting job description data");
        let extracted = self.extract_upload(filename, data).await?;
        info!("Enhancing extracted job description data");
        self.enhancer.enhance_posting(&extracted.extracted_jd).await
    }
}
