//! Screening prompt template and builder.
//!
//! The template is read-only configuration: `Config::from_env` resolves it
//! once at startup (this constant, or a file override) and hands it to
//! `build_screening_prompt` by reference per request.

/// Default screening prompt. The extracted texts are appended in clearly
/// delimited sections so the model cannot confuse the two documents.
pub const SCREENING_PROMPT_TEMPLATE: &str = "\
You are an expert technical recruiter performing a resume screening.

Compare the RESUME TEXT against the JOB DESCRIPTION below and produce a \
structured fit assessment as JSON matching the response schema exactly:
- match_score_percent: a 0-100 score for how well the resume fits the job.
- fit_summary: a five to six-sentence summary of the candidate's core \
strengths and weaknesses relative to the job.
- critical_missing_skills: every MUST-HAVE skill or certification from the \
job description that is not present on the resume.
- technical_skills_matched: every specific technical skill (e.g. Python, \
AWS, React) found on both the resume and the job description.
- soft_skills_matched: every specific soft skill (e.g. leadership, \
communication) found on both the resume and the job description.
- extracted_data: the candidate's name, email, and total relevant years of \
experience taken from the resume.
- skill_breakdown: technical_match_count and soft_skill_match_count MUST \
equal the lengths of the corresponding matched lists.

Base every claim strictly on the two documents. Do not invent skills, \
names, or dates that are not present in the text.";

/// Renders the final prompt: template followed by the two extracted texts
/// in delimited sections. Deterministic, pure string assembly.
pub fn build_screening_prompt(template: &str, resume_text: &str, jd_text: &str) -> String {
    format!(
        "{template}\n\
         JOB DESCRIPTION:\n---\n{jd_text}\n---\n\n\
         RESUME TEXT:\n---\n{resume_text}\n---"
    )
}
