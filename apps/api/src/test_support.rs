//! Shared fixtures for unit tests: a scripted chat model and in-memory documents.

use std::collections::VecDeque;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::documents::ocr::TesseractOcr;
use crate::documents::DocumentTextExtractor;
use crate::jd::enhancement::JdEnhancer;
use crate::jd::extraction::JdExtractor;
use crate::jd::pipeline::JdPipeline;
use crate::llm_client::structured::StructuredRequester;
use crate::llm_client::{ChatModel, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// Replays canned replies in order and records every prompt pair it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(replies: Vec<Value>) -> Arc<Self> {
        Self::new(replies.into_iter().map(|v| Ok(v.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// A pipeline whose model is `model` and whose OCR binary does not exist.
pub fn scripted_pipeline(model: Arc<ScriptedModel>) -> JdPipeline {
    let requester = StructuredRequester::new(model);
    JdPipeline::new(
        DocumentTextExtractor::new(TesseractOcr::new(
            "/nonexistent/bin/tesseract".to_string(),
            "eng".to_string(),
        )),
        JdExtractor::new(requester.clone()),
        JdEnhancer::new(requester),
    )
}

/// The smallest posting that passes validation.
pub fn minimal_posting_json(title: &str, summary: &str) -> Value {
    json!({
        "basic_info": {"job_title": title},
        "role_description": {"job_summary": summary}
    })
}

/// A posting with every sub-record populated.
pub fn full_posting_json(title: &str) -> Value {
    json!({
        "basic_info": {
            "job_title": title,
            "job_code": "DE-042",
            "job_level": "L4",
            "department": "Data Platform",
            "job_category": "Engineering"
        },
        "posting_metadata": {
            "contract_duration": "Permanent",
            "time_commitment": "Full-time"
        },
        "role_description": {
            "job_summary": "Builds and runs the batch and streaming pipelines.",
            "daily_tasks": ["Review pipeline health", "Ship schema migrations"],
            "performance_indicators": ["Pipeline freshness under 15 minutes"],
            "decision_making_authority": "Owns pipeline design decisions.",
            "stakeholder_interactions": ["Analytics team"]
        },
        "requirements": {
            "required_qualifications": ["3+ years building data pipelines"],
            "preferred_qualifications": ["Experience with Kafka"],
            "mandatory_certifications": [],
            "legal_eligibility": "Must be authorised to work in the EU.",
            "background_checks": "Standard reference checks.",
            "clearance_level": null
        },
        "skills": {
            "hard_skills": ["SQL", "Python"],
            "soft_skills": ["Communication"],
            "domain_expertise": ["E-commerce"],
            "methodologies": ["Scrum"],
            "languages": ["English"],
            "skills_priority": {"must_have": ["SQL"], "nice_to_have": ["Kafka"]}
        },
        "compensation": {
            "base_salary": "€70,000 - €85,000",
            "bonus_structure": null,
            "equity": null,
            "benefits": ["30 days holiday"],
            "relocation_assistance": true,
            "visa_sponsorship": false
        },
        "work_environment": {
            "work_model": "Hybrid",
            "locations": ["Berlin"],
            "travel_requirements": "Rare",
            "shift_type": "Day"
        },
        "career_path": {
            "growth_opportunities": "Path to staff engineer.",
            "training_programs": ["Conference budget"],
            "mentorship": "Paired with a senior engineer.",
            "succession_planning": null,
            "culture_page_link": "https://example.com/culture",
            "careers_page_link": "https://example.com/careers"
        }
    })
}

pub const DOCX_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:p><w:r><w:t>Senior Backend Engineer</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Acme Corp is </w:t></w:r><w:r><w:t>hiring.</w:t></w:r></w:p>
    <w:p>
      <w:r><w:t xml:space="preserve">Apply </w:t></w:r>
      <w:hyperlink r:id="rId7"><w:r><w:t>here</w:t></w:r></w:hyperlink>
    </w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>R&amp;D</w:t></w:r><w:r><w:tab/><w:t>Remote</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p></w:p>
  </w:body>
</w:document>"#;

pub const DOCX_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://acme.example/jobs/42" TargetMode="External"/>
</Relationships>"#;

pub const DOCX_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>Acme Careers</w:t></w:r></w:p></w:hdr>"#;

pub const DOCX_FOOTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>Equal opportunity employer</w:t></w:r></w:p></w:ftr>"#;

/// Text the DOCX fixture is expected to produce.
pub const DOCX_EXPECTED_TEXT: &str = "Senior Backend Engineer\n\
Acme Corp is hiring.\n\
Apply here\n\
R&D Remote\n\
https://acme.example/jobs/42\n\
Acme Careers\n\
Equal opportunity employer";

/// Builds a zip archive from `(path, contents)` entries.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A minimal DOCX package with body, hyperlink, header and footer parts.
pub fn docx_fixture() -> Vec<u8> {
    zip_archive(&[
        ("word/document.xml", DOCX_BODY),
        ("word/_rels/document.xml.rels", DOCX_RELS),
        ("word/header1.xml", DOCX_HEADER),
        ("word/footer1.xml", DOCX_FOOTER),
    ])
}

pub const PDF_LINK: &str = "https://acme.example/apply";

/// A one-page PDF 1.4 file: a Helvetica text line and a URI link annotation.
pub fn pdf_fixture() -> Vec<u8> {
    let content = "BT /F1 12 Tf 72 720 Td (Senior Backend Engineer) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R /Annots [6 0 R] >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [72 710 300 732] /A << /S /URI /URI ({PDF_LINK}) >> >>"
        ),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let size = objects.len() + 1;
    let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

/// Formatted log output captured while a `capture_logs` guard is alive.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's events into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
