//! Input Resolver — turns the two screening inputs into two plain-text
//! strings, fanning the extraction work out concurrently.

use bytes::Bytes;

use crate::errors::AppError;
use crate::screening::extract;

/// The two input roles of a screening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Resume,
    JobDescription,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Resume => write!(f, "resume"),
            Role::JobDescription => write!(f, "jobDescription"),
        }
    }
}

/// One form of input for a role: an uploaded document or raw text.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    File {
        bytes: Bytes,
        media_type: String,
        file_name: String,
    },
    Text(String),
}

/// A full screening request: one optional source per role.
/// A role with no source at all is invalid and fails before any work starts.
#[derive(Debug, Clone, Default)]
pub struct ScreeningRequest {
    pub resume: Option<DocumentSource>,
    pub job_description: Option<DocumentSource>,
}

/// Resolves both roles to trimmed plain text.
///
/// Both inputs are checked for presence up front — an invalid-on-its-face
/// request never schedules extraction work. The two resolutions then run
/// concurrently and are joined fail-fast: the first error wins and the
/// sibling future is dropped.
pub async fn resolve(request: ScreeningRequest) -> Result<(String, String), AppError> {
    let resume = request
        .resume
        .ok_or(AppError::MissingInput(Role::Resume))?;
    let job_description = request
        .job_description
        .ok_or(AppError::MissingInput(Role::JobDescription))?;

    tokio::try_join!(
        resolve_one(Role::Resume, resume),
        resolve_one(Role::JobDescription, job_description),
    )
}

async fn resolve_one(role: Role, source: DocumentSource) -> Result<String, AppError> {
    match source {
        DocumentSource::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(AppError::MissingInput(role));
            }
            Ok(trimmed.to_string())
        }
        DocumentSource::File {
            bytes,
            media_type,
            file_name,
        } => {
            tracing::debug!("Extracting {role} from '{file_name}' ({media_type})");
            // Document parsing is CPU-bound; keep it off the async workers.
            tokio::task::spawn_blocking(move || {
                extract::extract(&bytes, &media_type, &file_name)
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))?
        }
    }
}
