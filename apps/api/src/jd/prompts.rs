// Prompt templates for extraction and enhancement.
// Placeholders are `{name}` tokens substituted with `str::replace` before sending.

use serde_json::{json, Value};

/// Extraction system prompt. Replace `{today}` and `{example_json}`.
pub const EXTRACTION_SYSTEM_TEMPLATE: &str = r#"You are a specialist in reading job descriptions and turning them into structured records.
Today's date is {today}.

Extract the information in the job description and fit it to the schema below.
The reply MUST be a single JSON object whose top-level key is "extracted_jd".

Partial example of the required structure:

{example_json}

Every field of every section must hold a value. Do not answer with null or an empty array.
Where the text does not say something outright, infer a plausible value from the job title,
the industry and comparable roles. Salary fields get realistic ranges for the role.
Boolean fields get whichever of true or false is most likely.

1. basic_info
   - job_title: the job title as written
   - job_code: the requisition id, or a plausible one
   - job_level: internal grade, or one inferred from the title and scope
   - department: department, division or business unit
   - job_category: the job function
2. posting_metadata
   - contract_duration: permanent, fixed term and so on
   - time_commitment: full-time, part-time and so on
3. role_description
   - job_summary: a comprehensive summary of at least 100 words
   - daily_tasks: at least 10 concrete day-to-day tasks
   - performance_indicators: at least 5 KPIs
   - decision_making_authority: a substantive description of the authority held
   - stakeholder_interactions: at least 5 stakeholder interactions
4. requirements
   - required_qualifications: at least 5 entries
   - preferred_qualifications: at least 3 entries
   - mandatory_certifications: relevant certifications
   - legal_eligibility: work eligibility requirements
   - background_checks: checks usual for this kind of role
   - clearance_level: the clearance appropriate to the role
5. skills
   - hard_skills: at least 8 entries
   - soft_skills: at least 5 entries
   - domain_expertise: at least 3 areas
   - methodologies: at least 3 entries
   - languages: relevant spoken or programming languages
   - skills_priority: an object mapping "must_have" and "nice_to_have" to lists of skills
6. compensation
   - base_salary, bonus_structure, equity: realistic descriptions for the role
   - benefits: at least 5 entries
   - relocation_assistance: true or false
   - visa_sponsorship: true or false
7. work_environment
   - work_model: remote, hybrid or on-site
   - locations: at least 1 location
   - travel_requirements, shift_type
8. career_path
   - growth_opportunities: likely progression paths
   - training_programs: at least 3 entries
   - mentorship, succession_planning
   - culture_page_link, careers_page_link: realistic URLs

Remember: no empty fields, and "extracted_jd" is the top-level key."#;

/// Extraction user prompt. Replace `{jd_text}`.
pub const EXTRACTION_USER_TEMPLATE: &str = r#"Extract a structured record from this job description:

{jd_text}

Return it under the "extracted_jd" top-level key. Fill in every field with substantive
content, inferring from the job context wherever the text is silent."#;

/// Enhancement system prompt. Replace `{example_json}`.
pub const ENHANCEMENT_SYSTEM_TEMPLATE: &str = r#"You are a specialist in writing detailed, compelling job postings.

You receive a job posting that has already been extracted into a structured record. Rewrite it
as a thorough, professional posting that would attract strong candidates. The reply MUST be a
single JSON object whose top-level key is "enhanced_jd", with the same sections as the input.

relocation_assistance and visa_sponsorship MUST be the JSON literals true or false. Never use
text, quoted strings or null for these two fields.

Partial example of the required structure:

{example_json}

Minimum content per field:

1. role_description
   - job_summary: 300 to 500 words on the role, why it matters and its impact
   - daily_tasks: at least 15 detailed tasks starting with an action verb
   - performance_indicators: at least 8 measurable KPIs
   - decision_making_authority: at least 100 words
   - stakeholder_interactions: at least 10, with frequency and purpose
2. requirements
   - required_qualifications: at least 10, with years of experience
   - preferred_qualifications: at least 8
   - mandatory_certifications: at least 3
   - legal_eligibility: at least 100 words
   - background_checks: at least 75 words
   - clearance_level: at least 75 words
3. skills
   - hard_skills: at least 15, with proficiency levels
   - soft_skills: at least 10
   - domain_expertise: at least 5 areas
   - methodologies: at least 5
   - languages: every relevant language with proficiency
   - skills_priority: "must_have" and "nice_to_have", each with at least 10 skills
4. compensation
   - base_salary, bonus_structure, equity: detailed descriptions
   - benefits: at least 15
   - relocation_assistance: true or false only
   - visa_sponsorship: true or false only
5. work_environment
   - work_model: at least 100 words
   - locations, travel_requirements, shift_type: detailed
6. career_path
   - growth_opportunities: at least 200 words
   - training_programs: at least 8
   - mentorship: at least 150 words
   - succession_planning: at least 150 words
   - culture_page_link, careers_page_link: realistic URLs

Do not contradict facts stated in the input. "enhanced_jd" is the top-level key."#;

/// Enhancement user prompt. Replace `{jd_json}`.
pub const ENHANCEMENT_USER_TEMPLATE: &str = r#"Write a comprehensive, professional enhancement of this job posting:

{jd_json}

Return it under the "enhanced_jd" top-level key and fill every field in full.

Reminder: relocation_assistance and visa_sponsorship are the literals true or false, never text."#;

/// Reduced system prompt for the single repair attempt after a boolean field came back as text.
pub const BOOLEAN_REPAIR_SYSTEM: &str = r#"You are a specialist in writing detailed job postings.

Turn the extracted job posting you receive into a detailed professional posting, returned as a
JSON object with "enhanced_jd" as the top-level key.

relocation_assistance and visa_sponsorship MUST be the JSON literals true or false.
Do not describe them in text. Do not quote them. Do not leave them null."#;

/// Repair user prompt. Replace `{jd_json}`.
pub const BOOLEAN_REPAIR_USER_TEMPLATE: &str = r#"Enhance the following job posting, keeping its structure:

{jd_json}

Before replying, check that:
- relocation_assistance is true or false
- visa_sponsorship is true or false
- neither is a text description"#;

/// Partial extraction reply shown to the model as a shape reference.
pub fn extraction_example() -> Value {
    json!({
        "extracted_jd": {
            "basic_info": {
                "job_title": "Example Title",
                "job_code": "ABC123",
                "job_level": "L5",
                "department": "Engineering",
                "job_category": "Software Development"
            },
            "posting_metadata": {
                "contract_duration": "Permanent",
                "time_commitment": "Full-time"
            },
            "role_description": {
                "job_summary": "Example summary",
                "daily_tasks": ["Task 1", "Task 2"],
                "performance_indicators": ["KPI 1", "KPI 2"],
                "decision_making_authority": "Medium",
                "stakeholder_interactions": ["Stakeholder 1", "Stakeholder 2"]
            }
        },
        "message": crate::schema::EXTRACTION_MESSAGE
    })
}

/// Partial enhancement reply; includes the compensation booleans as literals.
pub fn enhancement_example() -> Value {
    json!({
        "enhanced_jd": {
            "basic_info": {
                "job_title": "Senior Software Engineer",
                "job_code": "ABC123",
                "job_level": "L5",
                "department": "Engineering",
                "job_category": "Software Development"
            },
            "posting_metadata": {
                "contract_duration": "Permanent",
                "time_commitment": "Full-time"
            },
            "compensation": {
                "base_salary": "$120,000 - $150,000",
                "bonus_structure": "Annual bonus up to 15%",
                "equity": "Stock options available",
                "benefits": ["Health insurance", "401(k) match", "Paid time off"],
                "relocation_assistance": true,
                "visa_sponsorship": false
            }
        },
        "message": crate::schema::ENHANCEMENT_MESSAGE
    })
}
