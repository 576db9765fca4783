//! Survey draft parsing
//!
//! The evaluator prompt demands bare JSON, but models still wrap it in
//! markdown fences often enough that we strip them before parsing. Parsing
//! is all-or-nothing: a malformed draft is rejected whole, carrying the raw
//! text so the caller can fall back to showing it as plain markdown.

use crate::models::SurveySchema;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("데이터 형식이 올바르지 않습니다")]
pub struct MalformedSurvey {
    /// The raw response, for plain-text fallback display
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a survey draft response into a schema, assigning `q1`-style ids to
/// questions the model left without one
pub fn parse_survey(response: &str) -> Result<SurveySchema, MalformedSurvey> {
    let cleaned = response.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let mut schema: SurveySchema =
        serde_json::from_str(cleaned).map_err(|source| MalformedSurvey {
            raw: response.to_string(),
            source,
        })?;
    schema.assign_missing_ids();
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    const VALID: &str = r#"{
        "title": "교육 만족도 조사",
        "description": "솔직한 의견을 들려주세요.",
        "questions": [
            {"id": "q1", "title": "전반적으로 만족하셨나요?", "type": "LINEAR_SCALE", "required": true},
            {"title": "가장 좋았던 활동은?", "type": "MULTIPLE_CHOICE", "options": ["실습", "토론"], "required": false}
        ]
    }"#;

    #[test]
    fn test_parses_bare_json() {
        let schema = parse_survey(VALID).unwrap();
        assert_eq!(schema.title, "교육 만족도 조사");
        assert_eq!(schema.questions.len(), 2);
        assert_eq!(schema.questions[0].question_type, QuestionType::LinearScale);
    }

    #[test]
    fn test_strips_markdown_fences() {
        let fenced = format!("```json\n{VALID}\n```");
        let schema = parse_survey(&fenced).unwrap();
        assert_eq!(schema.questions.len(), 2);
    }

    #[test]
    fn test_missing_ids_assigned_by_position() {
        let schema = parse_survey(VALID).unwrap();
        assert_eq!(schema.questions[0].id, "q1");
        assert_eq!(schema.questions[1].id, "q2");
    }

    #[test]
    fn test_malformed_draft_rejected_whole_with_raw_text() {
        let response = "설문지를 만들어 드리겠습니다:\n{\"title\": ...broken";
        let err = parse_survey(response).unwrap_err();
        assert_eq!(err.raw, response);
        assert_eq!(err.to_string(), "데이터 형식이 올바르지 않습니다");
    }

    #[test]
    fn test_unknown_question_type_is_malformed() {
        let response = r#"{"title":"t","description":"d","questions":[{"title":"q","type":"RATING","required":true}]}"#;
        assert!(parse_survey(response).is_err());
    }
}
