//! Typed artifacts produced by the response parsers and consumed by the
//! export engine

use super::survey::{SurveyAnswers, SurveySchema};

/// One slide parsed from a slide-outline response
#[derive(Debug, Clone, PartialEq)]
pub struct SlideBlock {
    pub title: String,
    pub content: Vec<SlideContent>,
}

/// Body content within a slide, classified line by line
#[derive(Debug, Clone, PartialEq)]
pub enum SlideContent {
    Bullet(String),
    Text(String),
    /// Contiguous pipe-table lines grouped into rows of cells
    Table(Vec<Vec<String>>),
}

/// A markdown report, optionally split at an answer-key heading.
/// The answer section is presented collapsed by default.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub main: String,
    pub answer_key: Option<AnswerSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSection {
    /// Heading text with `#` markers stripped, e.g. "정답 및 해설"
    pub heading: String,
    pub body: String,
}

/// Sum over everything the export engine knows how to serialize.
/// Handling at the export boundary is exhaustive.
#[derive(Debug, Clone)]
pub enum Artifact {
    MarkdownReport(ReportDocument),
    SlideDeck(Vec<SlideBlock>),
    Survey {
        schema: SurveySchema,
        /// One answer map per respondent
        answers: Vec<SurveyAnswers>,
    },
}
