// Job description extraction and enhancement.
// Documents become raw text, raw text becomes an ExtractionResult, and an extracted
// posting becomes an EnhancementResult. All model calls go through StructuredRequester.

pub mod enhancement;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
