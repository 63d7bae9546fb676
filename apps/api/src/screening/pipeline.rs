//! The screening pipeline: resolver → prompt builder → LLM orchestrator →
//! result validator, in strict data-dependency order. No step runs until
//! everything it depends on has completed.

use crate::errors::AppError;
use crate::llm_client::{GeminiClient, LlmError};
use crate::screening::prompts::build_screening_prompt;
use crate::screening::resolver::{resolve, ScreeningRequest};
use crate::screening::schema::{response_schema, MatchResult};
use crate::screening::validator::validate;

/// Runs one screening end to end. Owns every intermediate value; nothing
/// outlives the call.
pub async fn run_screening(
    request: ScreeningRequest,
    prompt_template: &str,
    llm: &GeminiClient,
) -> Result<MatchResult, AppError> {
    let (resume_text, jd_text) = resolve(request).await?;

    let prompt = build_screening_prompt(prompt_template, &resume_text, &jd_text);

    let schema = response_schema();
    let decoded = llm
        .invoke(&prompt, &schema)
        .await
        .map_err(|e| match e {
            LlmError::Exhausted {
                attempts,
                last_error,
            } => AppError::LlmExhausted {
                attempts,
                last_error,
            },
            other => AppError::LlmFatal(other.to_string()),
        })?;

    validate(&decoded)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::llm_client::test_support::{RecordingSleep, ScriptedTransport};
    use crate::llm_client::{success_envelope, TransportReply};
    use crate::screening::prompts::SCREENING_PROMPT_TEMPLATE;
    use crate::screening::resolver::DocumentSource;

    use super::*;

    fn stub_client(replies: Vec<TransportReply>) -> (GeminiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(replies));
        let client =
            GeminiClient::with_parts(transport.clone(), Arc::new(RecordingSleep::default()));
        (client, transport)
    }

    fn text_request(resume: &str, jd: &str) -> ScreeningRequest {
        ScreeningRequest {
            resume: Some(DocumentSource::Text(resume.to_string())),
            job_description: Some(DocumentSource::Text(jd.to_string())),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_passes_model_answer_through_verbatim() {
        let answer = json!({
            "match_score_percent": 82,
            "fit_summary": "The candidate's Python, AWS, and leadership background lines up well with the role.",
            "critical_missing_skills": [],
            "technical_skills_matched": ["Python", "AWS"],
            "soft_skills_matched": ["leadership"],
            "extracted_data": {
                "name": "Jordan Smith",
                "email": "jordan@example.com",
                "total_years_experience": 5
            },
            "skill_breakdown": {
                "technical_match_count": 2,
                "soft_skill_match_count": 1
            }
        });
        let (client, transport) = stub_client(vec![TransportReply {
            status: 200,
            body: success_envelope(&answer),
        }]);

        let result = run_screening(
            text_request(
                "5 years of Python and AWS experience, led a team of 4",
                "Seeking a Python developer with AWS and leadership experience",
            ),
            SCREENING_PROMPT_TEMPLATE,
            &client,
        )
        .await
        .unwrap();

        assert_eq!(transport.call_count(), 1);
        assert_eq!(result.match_score_percent, 82.0);
        assert_eq!(result.technical_skills_matched, vec!["Python", "AWS"]);
        assert_eq!(result.soft_skills_matched, vec!["leadership"]);
        assert!(result.critical_missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_missing_resume_never_reaches_the_llm() {
        let (client, transport) = stub_client(vec![TransportReply {
            status: 200,
            body: "unreachable".to_string(),
        }]);

        let err = run_screening(
            ScreeningRequest {
                resume: None,
                job_description: Some(DocumentSource::Text("a JD".to_string())),
            },
            SCREENING_PROMPT_TEMPLATE,
            &client,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MissingInput(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_with_attempt_count() {
        let (client, transport) = stub_client(vec![TransportReply {
            status: 503,
            body: "overloaded".to_string(),
        }]);

        let err = run_screening(
            text_request("a resume", "a JD"),
            SCREENING_PROMPT_TEMPLATE,
            &client,
        )
        .await
        .unwrap_err();

        assert_eq!(transport.call_count(), 5);
        match err {
            AppError::LlmExhausted { attempts, .. } => assert_eq!(attempts, 5),
            other => panic!("expected LlmExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schema_violation_returns_no_partial_result() {
        // Valid envelope, but the answer is missing extracted_data entirely.
        let answer = json!({
            "match_score_percent": 82,
            "fit_summary": "A plausible-looking summary.",
            "critical_missing_skills": [],
            "technical_skills_matched": ["Python"],
            "soft_skills_matched": [],
            "skill_breakdown": {
                "technical_match_count": 1,
                "soft_skill_match_count": 0
            }
        });
        let (client, _) = stub_client(vec![TransportReply {
            status: 200,
            body: success_envelope(&answer),
        }]);

        let err = run_screening(
            text_request("a resume", "a JD"),
            SCREENING_PROMPT_TEMPLATE,
            &client,
        )
        .await
        .unwrap_err();

        match err {
            AppError::SchemaViolation { field } => assert_eq!(field, "extracted_data"),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }
}
