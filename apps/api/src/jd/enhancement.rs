//! Enhancement: an extracted posting to an enriched `EnhancementResult`.
//!
//! Runs at most two attempts. A primary attempt that fails only because a compensation
//! boolean came back as something other than a literal boolean gets one repair attempt
//! with boolean-only instructions; every other failure propagates immediately.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::jd::error::JdError;
use crate::jd::prompts::{
    enhancement_example, BOOLEAN_REPAIR_SYSTEM, BOOLEAN_REPAIR_USER_TEMPLATE,
    ENHANCEMENT_SYSTEM_TEMPLATE, ENHANCEMENT_USER_TEMPLATE,
};
use crate::llm_client::structured::{RequestError, StructuredRequester};
use crate::schema::validation::SchemaValidationError;
use crate::schema::{EnhancementResult, JobPosting};

#[derive(Debug, Clone, PartialEq)]
pub enum EnhancementAttempt {
    Primary,
    /// Second and last attempt. `initial` is the primary attempt's validation failure.
    BooleanRepair { initial: SchemaValidationError },
}

impl EnhancementAttempt {
    /// What follows a failed attempt: the repair attempt, or the error to return.
    pub fn after_failure(self, err: RequestError) -> Result<EnhancementAttempt, JdError> {
        match self {
            EnhancementAttempt::Primary => {
                let initial = err.boolean_coercion().cloned();
                match initial {
                    Some(initial) => Ok(EnhancementAttempt::BooleanRepair { initial }),
                    None => Err(JdError::Request(err)),
                }
            }
            EnhancementAttempt::BooleanRepair { initial } => Err(JdError::EnhancementFailed {
                initial,
                source: err,
            }),
        }
    }

    /// The (system, user) prompt pair for this attempt.
    pub fn prompts(&self, jd_json: &str) -> Result<(String, String), serde_json::Error> {
        match self {
            EnhancementAttempt::Primary => {
                let example_json = serde_json::to_string_pretty(&enhancement_example())?;
                Ok((
                    ENHANCEMENT_SYSTEM_TEMPLATE.replace("{example_json}", &example_json),
                    ENHANCEMENT_USER_TEMPLATE.replace("{jd_json}", jd_json),
                ))
            }
            EnhancementAttempt::BooleanRepair { .. } => Ok((
                BOOLEAN_REPAIR_SYSTEM.to_string(),
                BOOLEAN_REPAIR_USER_TEMPLATE.replace("{jd_json}", jd_json),
            )),
        }
    }
}

#[derive(Clone)]
pub struct JdEnhancer {
    requester: StructuredRequester,
}

impl JdEnhancer {
    pub fn new(requester: StructuredRequester) -> Self {
        Self { requester }
    }

    /// Enhances an extracted posting given as a JSON object.
    ///
    /// The result's `original_text` is the input's `original_text`, or unset if it had none.
    pub async fn enhance(&self, extracted_jd: &Value) -> Result<EnhancementResult, JdError> {
        let jd_json = serde_json::to_string_pretty(extracted_jd)?;
        let original_text = extracted_jd
            .get("original_text")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut attempt = EnhancementAttempt::Primary;
        loop {
            let (system, user) = attempt.prompts(&jd_json)?;
            match self
                .requester
                .request::<EnhancementResult>(&system, &user)
                .await
            {
                Ok(mut result) => {
                    result.enhanced_jd.original_text = original_text;
                    info!(
                        "Enhanced job description '{}'",
                        result.enhanced_jd.basic_info.job_title
                    );
                    return Ok(result);
                }
                Err(e) => match attempt.after_failure(e) {
                    Ok(next) => {
                        warn!("Boolean field validation failed, retrying with boolean-only instructions");
                        attempt = next;
                    }
                    Err(e) => {
                        error!("Error enhancing job description: {e}");
                        return Err(e);
                    }
                },
            }
        }
    }

    pub async fn enhance_posting(&self, posting: &JobPosting) -> Result<EnhancementResult, JdError> {
        let value = serde_json::to_value(posting)?;
        self.enhance(&value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::llm_client::LlmError;
    use crate::schema::validation::ViolationKind;
    use crate::test_support::{full_posting_json, minimal_posting_json, ScriptedModel};

    fn enhancer(model: Arc<ScriptedModel>) -> JdEnhancer {
        JdEnhancer::new(StructuredRequester::new(model))
    }

    fn enhanced(posting: Value) -> Value {
        json!({ "enhanced_jd": posting })
    }

    fn with_text_relocation(title: &str) -> Value {
        let mut posting = minimal_posting_json(title, "Summary");
        posting["compensation"] = json!({ "relocation_assistance": "Yes, for the right candidate" });
        enhanced(posting)
    }

    fn boolean_failure() -> RequestError {
        let mut posting = minimal_posting_json("X", "Y");
        posting["compensation"] = json!({ "visa_sponsorship": null });
        crate::llm_client::structured::parse_reply::<EnhancementResult>(
            &enhanced(posting).to_string(),
        )
        .unwrap_err()
        .into()
    }

    #[test]
    fn test_primary_with_boolean_failure_moves_to_repair() {
        let next = EnhancementAttempt::Primary
            .after_failure(boolean_failure())
            .unwrap();
        let EnhancementAttempt::BooleanRepair { initial } = next else {
            panic!("expected repair attempt");
        };
        assert_eq!(
            initial.violations[0].kind,
            ViolationKind::BooleanCoercion { found: "null" }
        );
    }

    #[test]
    fn test_primary_with_transport_failure_stops() {
        let err = EnhancementAttempt::Primary
            .after_failure(RequestError::Model(LlmError::EmptyContent))
            .unwrap_err();
        assert!(matches!(err, JdError::Request(RequestError::Model(_))));
    }

    #[test]
    fn test_repair_failure_is_terminal() {
        let RequestError::Schema(initial) = boolean_failure() else {
            panic!("expected schema error");
        };
        let err = EnhancementAttempt::BooleanRepair {
            initial: initial.clone(),
        }
        .after_failure(boolean_failure())
        .unwrap_err();
        assert!(matches!(err, JdError::EnhancementFailed { initial: ref i, .. } if *i == initial));
    }

    #[test]
    fn test_repair_prompts_only_restate_booleans() {
        let jd_json = "{\n  \"basic_info\": {}\n}";
        let (system, user) = EnhancementAttempt::Primary.prompts(jd_json).unwrap();
        assert!(system.contains("\"visa_sponsorship\": false"));
        assert!(user.contains(jd_json));

        let repair = EnhancementAttempt::BooleanRepair {
            initial: SchemaValidationError {
                schema: "EnhancementResult",
                violations: Vec::new(),
            },
        };
        let (system, user) = repair.prompts(jd_json).unwrap();
        assert_eq!(system, BOOLEAN_REPAIR_SYSTEM);
        assert!(user.contains(jd_json));
        assert!(user.contains("visa_sponsorship is true or false"));
    }

    #[tokio::test]
    async fn test_original_text_is_carried_byte_for_byte() {
        let original = "  Línea 1\r\n\tSenior Backend Engineer — Acme Corp.\n";
        let mut input = minimal_posting_json("Senior Backend Engineer", "Backend work.");
        input["original_text"] = json!(original);

        let mut reply = full_posting_json("Senior Backend Engineer");
        reply["original_text"] = json!("model rewrote this");
        let model = ScriptedModel::replying(vec![enhanced(reply)]);

        let result = enhancer(model.clone()).enhance(&input).await.unwrap();

        assert_eq!(result.enhanced_jd.original_text.as_deref(), Some(original));
        assert_eq!(result.message, "Job description enhanced successfully");
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user.contains("\"job_title\": \"Senior Backend Engineer\""));
    }

    #[tokio::test]
    async fn test_missing_original_text_stays_unset() {
        let mut reply = minimal_posting_json("Chef", "Cooks.");
        reply["original_text"] = json!("invented");
        let model = ScriptedModel::replying(vec![enhanced(reply)]);

        let input = minimal_posting_json("Chef", "Cooks.");
        let result = enhancer(model).enhance(&input).await.unwrap();

        assert_eq!(result.enhanced_jd.original_text, None);
    }

    #[tokio::test]
    async fn test_boolean_repair_returns_second_result() {
        let model = ScriptedModel::replying(vec![
            with_text_relocation("First"),
            enhanced(full_posting_json("Second")),
        ]);

        let result = enhancer(model.clone())
            .enhance(&minimal_posting_json("Data Engineer", "Pipelines."))
            .await
            .unwrap();

        assert_eq!(result.enhanced_jd.basic_info.job_title, "Second");
        assert!(result.enhanced_jd.compensation.relocation_assistance);
        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].system, BOOLEAN_REPAIR_SYSTEM);
    }

    #[tokio::test]
    async fn test_boolean_repair_exhaustion_fails() {
        let model = ScriptedModel::replying(vec![
            with_text_relocation("First"),
            with_text_relocation("Second"),
        ]);

        let err = enhancer(model.clone())
            .enhance(&minimal_posting_json("Data Engineer", "Pipelines."))
            .await
            .unwrap_err();

        let JdError::EnhancementFailed { initial, source } = err else {
            panic!("expected EnhancementFailed");
        };
        assert_eq!(
            initial.violations[0].path,
            "enhanced_jd.compensation.relocation_assistance"
        );
        assert!(source.boolean_coercion().is_some());
        assert_eq!(model.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_during_repair_fails() {
        let model = ScriptedModel::new(vec![
            Ok(with_text_relocation("First").to_string()),
            Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        ]);

        let err = enhancer(model)
            .enhance(&minimal_posting_json("Data Engineer", "Pipelines."))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JdError::EnhancementFailed {
                source: RequestError::Model(LlmError::Api { status: 500, .. }),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_other_schema_failures_are_not_retried() {
        let model = ScriptedModel::replying(vec![enhanced(json!({
            "basic_info": {},
            "role_description": {"job_summary": "Summary"}
        }))]);

        let err = enhancer(model.clone())
            .enhance(&minimal_posting_json("Data Engineer", "Pipelines."))
            .await
            .unwrap_err();

        assert!(matches!(err, JdError::Request(RequestError::Schema(_))));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let model = ScriptedModel::new(vec![Err(LlmError::EmptyContent)]);

        let err = enhancer(model.clone())
            .enhance(&minimal_posting_json("Data Engineer", "Pipelines."))
            .await
            .unwrap_err();

        assert!(matches!(err, JdError::Request(RequestError::Model(_))));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_enhance_posting_serializes_the_record() {
        let mut posting: JobPosting = crate::llm_client::structured::parse_reply(
            &full_posting_json("Data Engineer").to_string(),
        )
        .unwrap();
        posting.original_text = Some("Data Engineer, Berlin".to_string());
        let model = ScriptedModel::replying(vec![enhanced(full_posting_json("Data Engineer"))]);

        let result = enhancer(model.clone()).enhance_posting(&posting).await.unwrap();

        assert_eq!(
            result.enhanced_jd.original_text.as_deref(),
            Some("Data Engineer, Berlin")
        );
        assert!(model.calls()[0].user.contains("\"job_code\": \"DE-042\""));
    }
}
