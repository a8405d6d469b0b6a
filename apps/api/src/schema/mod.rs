//! Job posting schema: the canonical nested record every document is coerced into.
//!
//! Typed records are only ever built through `validation::FieldReader`, which reads
//! a model reply field by field and collects every violation before giving up.

pub mod validation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::validation::{FieldReader, SchemaValidationError};

pub const EXTRACTION_MESSAGE: &str = "Job description extracted successfully";
pub const ENHANCEMENT_MESSAGE: &str = "Job description enhanced successfully";

/// A record type that a model reply can be validated into.
pub trait ResponseSchema: Sized + Send {
    /// Schema name used in validation errors and logs.
    const NAME: &'static str;

    fn from_value(value: &Value) -> Result<Self, SchemaValidationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub job_title: String,
    pub job_code: Option<String>,
    pub job_level: Option<String>,
    pub department: Option<String>,
    pub job_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingMetadata {
    pub contract_duration: Option<String>,
    pub time_commitment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDescription {
    pub job_summary: String,
    #[serde(default)]
    pub daily_tasks: Vec<String>,
    #[serde(default)]
    pub performance_indicators: Vec<String>,
    pub decision_making_authority: Option<String>,
    #[serde(default)]
    pub stakeholder_interactions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub required_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub mandatory_certifications: Vec<String>,
    pub legal_eligibility: Option<String>,
    pub background_checks: Option<String>,
    pub clearance_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub domain_expertise: Vec<String>,
    pub methodologies: Vec<String>,
    pub languages: Vec<String>,
    /// Priority bucket (e.g. "must_have") → skill names.
    pub skills_priority: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compensation {
    pub base_salary: Option<String>,
    pub bonus_structure: Option<String>,
    pub equity: Option<String>,
    pub benefits: Vec<String>,
    /// Always a literal boolean on the wire.
    pub relocation_assistance: bool,
    /// Always a literal boolean on the wire.
    pub visa_sponsorship: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEnvironment {
    pub work_model: Option<String>,
    pub locations: Vec<String>,
    pub travel_requirements: Option<String>,
    pub shift_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerPath {
    pub growth_opportunities: Option<String>,
    pub training_programs: Vec<String>,
    pub mentorship: Option<String>,
    pub succession_planning: Option<String>,
    pub culture_page_link: Option<String>,
    pub careers_page_link: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// JobPosting and transport wrappers
// ────────────────────────────────────────────────────────────────────────────

/// One job listing. Built fresh by every extraction; enhancement derives a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub posting_metadata: PostingMetadata,
    pub role_description: RoleDescription,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub compensation: Compensation,
    #[serde(default)]
    pub work_environment: WorkEnvironment,
    #[serde(default)]
    pub career_path: CareerPath,
    /// Source document text. Always carried mechanically, never taken from the model.
    #[serde(default)]
    pub original_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub extracted_jd: JobPosting,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub enhanced_jd: JobPosting,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Field-by-field readers
// ────────────────────────────────────────────────────────────────────────────

impl JobPosting {
    fn read(r: &mut FieldReader<'_>) -> Self {
        let basic_info = {
            let mut r = r.record("basic_info", true);
            BasicInfo {
                job_title: r.required_text("job_title"),
                job_code: r.optional_text("job_code"),
                job_level: r.optional_text("job_level"),
                department: r.optional_text("department"),
                job_category: r.optional_text("job_category"),
            }
        };

        let posting_metadata = {
            let mut r = r.record("posting_metadata", false);
            PostingMetadata {
                contract_duration: r.optional_text("contract_duration"),
                time_commitment: r.optional_text("time_commitment"),
            }
        };

        let role_description = {
            let mut r = r.record("role_description", true);
            RoleDescription {
                job_summary: r.required_text("job_summary"),
                daily_tasks: r.text_list("daily_tasks"),
                performance_indicators: r.text_list("performance_indicators"),
                decision_making_authority: r.optional_text("decision_making_authority"),
                stakeholder_interactions: r.text_list("stakeholder_interactions"),
            }
        };

        let requirements = {
            let mut r = r.record("requirements", false);
            Requirements {
                required_qualifications: r.text_list("required_qualifications"),
                preferred_qualifications: r.text_list("preferred_qualifications"),
                mandatory_certifications: r.text_list("mandatory_certifications"),
                legal_eligibility: r.optional_text("legal_eligibility"),
                background_checks: r.optional_text("background_checks"),
                clearance_level: r.optional_text("clearance_level"),
            }
        };

        let skills = {
            let mut r = r.record("skills", false);
            Skills {
                hard_skills: r.text_list("hard_skills"),
                soft_skills: r.text_list("soft_skills"),
                domain_expertise: r.text_list("domain_expertise"),
                methodologies: r.text_list("methodologies"),
                languages: r.text_list("languages"),
                skills_priority: r.text_list_map("skills_priority"),
            }
        };

        let compensation = {
            let mut r = r.record("compensation", false);
            Compensation {
                base_salary: r.optional_text("base_salary"),
                bonus_structure: r.optional_text("bonus_structure"),
                equity: r.optional_text("equity"),
                benefits: r.text_list("benefits"),
                relocation_assistance: r.flag("relocation_assistance"),
                visa_sponsorship: r.flag("visa_sponsorship"),
            }
        };

        let work_environment = {
            let mut r = r.record("work_environment", false);
            WorkEnvironment {
                work_model: r.optional_text("work_model"),
                locations: r.text_list("locations"),
                travel_requirements: r.optional_text("travel_requirements"),
                shift_type: r.optional_text("shift_type"),
            }
        };

        let career_path = {
            let mut r = r.record("career_path", false);
            CareerPath {
                growth_opportunities: r.optional_text("growth_opportunities"),
                training_programs: r.text_list("training_programs"),
                mentorship: r.optional_text("mentorship"),
                succession_planning: r.optional_text("succession_planning"),
                culture_page_link: r.optional_text("culture_page_link"),
                careers_page_link: r.optional_text("careers_page_link"),
            }
        };

        JobPosting {
            basic_info,
            posting_metadata,
            role_description,
            requirements,
            skills,
            compensation,
            work_environment,
            career_path,
            original_text: r.optional_text("original_text"),
        }
    }
}

impl ResponseSchema for JobPosting {
    const NAME: &'static str = "JobPosting";

    fn from_value(value: &Value) -> Result<Self, SchemaValidationError> {
        FieldReader::validate(Self::NAME, value, JobPosting::read)
    }
}

impl ResponseSchema for ExtractionResult {
    const NAME: &'static str = "ExtractionResult";

    fn from_value(value: &Value) -> Result<Self, SchemaValidationError> {
        FieldReader::validate(Self::NAME, value, |r| {
            let extracted_jd = JobPosting::read(&mut r.record("extracted_jd", true));
            let message = r
                .optional_text("message")
                .unwrap_or_else(|| EXTRACTION_MESSAGE.to_string());
            ExtractionResult {
                extracted_jd,
                message,
            }
        })
    }
}

impl ResponseSchema for EnhancementResult {
    const NAME: &'static str = "EnhancementResult";

    fn from_value(value: &Value) -> Result<Self, SchemaValidationError> {
        FieldReader::validate(Self::NAME, value, |r| {
            let enhanced_jd = JobPosting::read(&mut r.record("enhanced_jd", true));
            let message = r
                .optional_text("message")
                .unwrap_or_else(|| ENHANCEMENT_MESSAGE.to_string());
            EnhancementResult {
                enhanced_jd,
                message,
            }
        })
    }
}
