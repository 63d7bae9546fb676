//! Result Validator — checks an untrusted decoded object against the
//! screening result contract before conversion into `MatchResult`.
//!
//! All-or-nothing: the first missing or mistyped field fails the whole
//! answer with `SchemaViolation{field}`. Never retried — a malformed answer
//! will not fix itself on resubmission without a prompt change.

use serde_json::Value;

use crate::errors::AppError;
use crate::screening::schema::MatchResult;

fn violation(field: &str) -> AppError {
    AppError::SchemaViolation {
        field: field.to_string(),
    }
}

fn require_number(value: &Value, field: &str) -> Result<f64, AppError> {
    value
        .get(field_leaf(field))
        .and_then(Value::as_f64)
        .ok_or_else(|| violation(field))
}

fn require_string<'a>(value: &'a Value, field: &str) -> Result<&'a str, AppError> {
    value
        .get(field_leaf(field))
        .and_then(Value::as_str)
        .ok_or_else(|| violation(field))
}

fn require_string_array(value: &Value, field: &str) -> Result<usize, AppError> {
    let items = value
        .get(field_leaf(field))
        .and_then(Value::as_array)
        .ok_or_else(|| violation(field))?;
    if !items.iter().all(Value::is_string) {
        return Err(violation(field));
    }
    Ok(items.len())
}

fn require_count(value: &Value, field: &str) -> Result<u64, AppError> {
    value
        .get(field_leaf(field))
        .and_then(Value::as_u64)
        .ok_or_else(|| violation(field))
}

/// Dotted paths name nested fields in violations; lookups use the leaf.
fn field_leaf(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

/// Validates the decoded model answer field by field and converts it.
///
/// Beyond presence and type checks, the skill-breakdown counts are
/// cross-checked against the lengths of the matched-skill lists: the model
/// is not guaranteed to keep the two consistent, and an unchecked count is
/// an unvalidated assertion.
pub fn validate(decoded: &Value) -> Result<MatchResult, AppError> {
    if !decoded.is_object() {
        return Err(violation("$"));
    }

    let score = require_number(decoded, "match_score_percent")?;
    if !(0.0..=100.0).contains(&score) {
        return Err(violation("match_score_percent"));
    }

    let summary = require_string(decoded, "fit_summary")?;
    if summary.trim().is_empty() {
        return Err(violation("fit_summary"));
    }

    require_string_array(decoded, "critical_missing_skills")?;
    let technical_len = require_string_array(decoded, "technical_skills_matched")?;
    let soft_len = require_string_array(decoded, "soft_skills_matched")?;

    let extracted = decoded
        .get("extracted_data")
        .filter(|v| v.is_object())
        .ok_or_else(|| violation("extracted_data"))?;
    require_string(extracted, "extracted_data.name")?;
    require_string(extracted, "extracted_data.email")?;
    require_number(extracted, "extracted_data.total_years_experience")?;

    let breakdown = decoded
        .get("skill_breakdown")
        .filter(|v| v.is_object())
        .ok_or_else(|| violation("skill_breakdown"))?;
    let technical_count = require_count(breakdown, "skill_breakdown.technical_match_count")?;
    let soft_count = require_count(breakdown, "skill_breakdown.soft_skill_match_count")?;

    if technical_count != technical_len as u64 {
        return Err(violation("skill_breakdown.technical_match_count"));
    }
    if soft_count != soft_len as u64 {
        return Err(violation("skill_breakdown.soft_skill_match_count"));
    }

    serde_json::from_value(decoded.clone()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "validated object failed conversion to MatchResult: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_answer() -> Value {
        json!({
            "match_score_percent": 82,
            "fit_summary": "Strong Python and AWS background with leadership experience.",
            "critical_missing_skills": ["Kubernetes"],
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
        })
    }

    fn expect_violation(decoded: &Value, expected_field: &str) {
        match validate(decoded).unwrap_err() {
            AppError::SchemaViolation { field } => assert_eq!(field, expected_field),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_answer_converts_unchanged() {
        let result = validate(&valid_answer()).unwrap();
        assert_eq!(result.match_score_percent, 82.0);
        assert_eq!(result.technical_skills_matched, vec!["Python", "AWS"]);
        assert_eq!(result.soft_skills_matched, vec!["leadership"]);
        assert_eq!(result.extracted_data.email, "jordan@example.com");
        assert_eq!(result.skill_breakdown.technical_match_count, 2);
    }

    #[test]
    fn test_missing_extracted_data_is_reported_by_field() {
        let mut decoded = valid_answer();
        decoded.as_object_mut().unwrap().remove("extracted_data");
        expect_violation(&decoded, "extracted_data");
    }

    #[test]
    fn test_missing_nested_field_uses_dotted_path() {
        let mut decoded = valid_answer();
        decoded["extracted_data"]
            .as_object_mut()
            .unwrap()
            .remove("email");
        expect_violation(&decoded, "extracted_data.email");
    }

    #[test]
    fn test_score_out_of_range_is_violation() {
        let mut decoded = valid_answer();
        decoded["match_score_percent"] = json!(104);
        expect_violation(&decoded, "match_score_percent");
    }

    #[test]
    fn test_mistyped_skill_list_is_violation() {
        let mut decoded = valid_answer();
        decoded["technical_skills_matched"] = json!(["Python", 42]);
        expect_violation(&decoded, "technical_skills_matched");
    }

    #[test]
    fn test_empty_summary_is_violation() {
        let mut decoded = valid_answer();
        decoded["fit_summary"] = json!("   ");
        expect_violation(&decoded, "fit_summary");
    }

    #[test]
    fn test_count_mismatch_is_violation() {
        let mut decoded = valid_answer();
        decoded["skill_breakdown"]["technical_match_count"] = json!(3);
        expect_violation(&decoded, "skill_breakdown.technical_match_count");
    }

    #[test]
    fn test_non_object_answer_is_violation() {
        expect_violation(&json!([1, 2, 3]), "$");
    }
}
