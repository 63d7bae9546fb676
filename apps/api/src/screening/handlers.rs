use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use crate::errors::AppError;
use crate::screening::pipeline::run_screening;
use crate::screening::resolver::{DocumentSource, ScreeningRequest};
use crate::screening::schema::MatchResult;
use crate::state::AppState;

/// POST /api/screen
///
/// Multipart submission with up to four fields: `resume` (file) or
/// `resumeText`, and `jobDescription` (file) or `jobDescriptionText`.
/// Session validation happens upstream in the auth layer; this handler
/// assumes the caller is already authorized.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let request = parse_screening_request(multipart).await?;

    // Bound concurrent calls against the metered LLM API across requests.
    let _permit = state
        .llm_permits
        .acquire()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("semaphore closed: {e}")))?;

    let deadline = std::time::Duration::from_secs(state.config.screening_timeout_secs);
    let result = tokio::time::timeout(
        deadline,
        run_screening(request, &state.config.prompt_template, &state.llm),
    )
    .await
    .map_err(|_| AppError::Timeout)??;

    info!(
        "Screening complete: score={} technical_matches={}",
        result.match_score_percent, result.skill_breakdown.technical_match_count
    );
    Ok(Json(result))
}

/// Collects the multipart fields into a `ScreeningRequest`.
/// When a role carries both a file and non-blank text, the text wins.
async fn parse_screening_request(mut multipart: Multipart) -> Result<ScreeningRequest, AppError> {
    let mut resume_file: Option<DocumentSource> = None;
    let mut resume_text: Option<String> = None;
    let mut jd_file: Option<DocumentSource> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "jobDescription" => {
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                let source = DocumentSource::File {
                    bytes,
                    media_type,
                    file_name,
                };
                if name == "resume" {
                    resume_file = Some(source);
                } else {
                    jd_file = Some(source);
                }
            }
            "resumeText" | "jobDescriptionText" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?;
                if name == "resumeText" {
                    resume_text = Some(text);
                } else {
                    jd_text = Some(text);
                }
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    Ok(ScreeningRequest {
        resume: pick_source(resume_text, resume_file),
        job_description: pick_source(jd_text, jd_file),
    })
}

fn pick_source(text: Option<String>, file: Option<DocumentSource>) -> Option<DocumentSource> {
    match text {
        Some(t) if !t.trim().is_empty() => Some(DocumentSource::Text(t)),
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_text_wins_over_file() {
        let file = DocumentSource::File {
            bytes: bytes::Bytes::from_static(b"file body"),
            media_type: "text/plain".to_string(),
            file_name: "resume.txt".to_string(),
        };
        let picked = pick_source(Some("typed resume".to_string()), Some(file)).unwrap();
        assert!(matches!(picked, DocumentSource::Text(t) if t == "typed resume"));
    }

    #[test]
    fn test_blank_text_falls_back_to_file() {
        let file = DocumentSource::File {
            bytes: bytes::Bytes::from_static(b"file body"),
            media_type: "text/plain".to_string(),
            file_name: "resume.txt".to_string(),
        };
        let picked = pick_source(Some("   ".to_string()), Some(file)).unwrap();
        assert!(matches!(picked, DocumentSource::File { .. }));
    }

    #[test]
    fn test_neither_form_yields_none() {
        assert!(pick_source(None, None).is_none());
    }
}
