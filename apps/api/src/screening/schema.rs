//! The screening result contract.
//!
//! `MatchResult` is the statically defined, versioned shape of a validated
//! model answer; `response_schema()` is the same contract expressed as the
//! Gemini `responseSchema` value sent with every request. The validator in
//! `validator.rs` is what converts an untrusted decoded object into a
//! `MatchResult` — the remote response's shape is never trusted implicitly.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Validated screening output. Immutable once produced; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0–100 fit estimate.
    pub match_score_percent: f64,
    pub fit_summary: String,
    pub critical_missing_skills: Vec<String>,
    pub technical_skills_matched: Vec<String>,
    pub soft_skills_matched: Vec<String>,
    pub extracted_data: ExtractedData,
    pub skill_breakdown: SkillBreakdown,
}

/// Candidate facts the model extracts from the resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedData {
    pub name: String,
    pub email: String,
    pub total_years_experience: f64,
}

/// Match counts per skill category. Validated to equal the lengths of the
/// corresponding matched lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillBreakdown {
    pub technical_match_count: u64,
    pub soft_skill_match_count: u64,
}

/// The fixed output schema sent as `generationConfig.responseSchema`.
/// Must stay in lockstep with `MatchResult` above.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "match_score_percent": {
                "type": "NUMBER",
                "description": "A score from 0 to 100 indicating the percentage fit of the resume to the job description."
            },
            "fit_summary": {
                "type": "STRING",
                "description": "A five to six-sentence summary of the candidate's core strengths and weaknesses relative to the job."
            },
            "critical_missing_skills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of all MUST-HAVE skills or certifications from the JD that are not present on the resume."
            },
            "technical_skills_matched": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of all specific technical skills (e.g., Python, AWS, React) successfully found and matched on the resume."
            },
            "soft_skills_matched": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of all specific soft skills (e.g., leadership, communication, problem-solving) successfully found and matched on the resume."
            },
            "extracted_data": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "email": { "type": "STRING" },
                    "total_years_experience": {
                        "type": "NUMBER",
                        "description": "Total relevant years of experience extracted from the resume."
                    }
                },
                "required": ["name", "email", "total_years_experience"]
            },
            "skill_breakdown": {
                "type": "OBJECT",
                "properties": {
                    "technical_match_count": { "type": "NUMBER" },
                    "soft_skill_match_count": { "type": "NUMBER" }
                },
                "required": ["technical_match_count", "soft_skill_match_count"]
            }
        },
        "required": [
            "match_score_percent",
            "fit_summary",
            "critical_missing_skills",
            "technical_skills_matched",
            "soft_skills_matched",
            "extracted_data",
            "skill_breakdown"
        ]
    })
}
