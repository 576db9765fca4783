//! Survey schema and answers (Google-Forms-style draft produced by the model)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Question type, using the wire names the model is instructed to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Checkbox,
    Dropdown,
    LinearScale,
}

impl QuestionType {
    /// Choice-like types require a non-empty options list
    pub fn needs_options(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkbox | QuestionType::Dropdown
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::ShortAnswer => "단답형 (Short Answer)",
            QuestionType::Paragraph => "서술형 (Paragraph)",
            QuestionType::MultipleChoice => "객관식 (Multiple Choice)",
            QuestionType::Checkbox => "체크박스 (Checkboxes)",
            QuestionType::Dropdown => "드롭다운 (Dropdown)",
            QuestionType::LinearScale => "척도형 (Linear Scale)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Present for choice-like types; a missing field parses as empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl SurveyQuestion {
    /// Type to render and collect the question as. A choice question that
    /// arrived with no options cannot offer anything to pick, so it degrades
    /// to free text instead of failing.
    pub fn effective_type(&self) -> QuestionType {
        if self.question_type.needs_options() && self.options.is_empty() {
            QuestionType::ShortAnswer
        } else {
            self.question_type
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySchema {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<SurveyQuestion>,
}

impl SurveySchema {
    /// Fill blank question ids deterministically (`q1`, `q2`, …) so answers
    /// can key off them
    pub fn assign_missing_ids(&mut self) {
        for (idx, question) in self.questions.iter_mut().enumerate() {
            if question.id.trim().is_empty() {
                question.id = format!("q{}", idx + 1);
            }
        }
    }
}

/// One recorded answer; shape depends on the question type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scale(u8),
    Text(String),
    Selections(Vec<String>),
}

impl AnswerValue {
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Scale(n) => n.to_string(),
            AnswerValue::Selections(items) => items.join(", "),
        }
    }
}

/// Answers keyed by question id. Persisted separately from the program
/// state and independently clearable.
pub type SurveyAnswers = BTreeMap<String, AnswerValue>;
