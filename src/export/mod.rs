//! Export Engine
//!
//! Turns typed artifacts into downloadable office documents:
//! - `.doc` via the Office HTML format (reports, survey forms)
//! - `.xlsx` via a minimal hand-written OOXML workbook
//! - `.pptx` via a minimal hand-written OOXML presentation
//! - `.zip` bundles for batch-exported material sets

pub mod archive;
pub mod pptx;
pub mod word;
pub mod xlsx;

pub use archive::{bundle_file_stem, bundle_folder, write_bundle, BundleEntry};

use crate::models::{Artifact, MaterialKind, SurveyAnswers, SurveySchema};
use crate::parser;
use anyhow::Result;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Doc,
    Xlsx,
    Pptx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Doc => "doc",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pptx => "pptx",
        }
    }

    /// Preferred format for a material kind in batch export
    pub fn for_kind(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::SlideOutline => ExportFormat::Pptx,
            _ => ExportFormat::Doc,
        }
    }
}

/// File title with everything but letters, digits, Hangul, and spaces
/// removed. Empty results fall back to "문서".
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || c.is_whitespace() || ('가'..='힣').contains(c)
        })
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "문서".to_string()
    } else {
        cleaned
    }
}

/// `{prefix}_{sanitized title}.{ext}`
pub fn export_file_name(prefix: &str, title: &str, format: ExportFormat) -> String {
    format!("{}_{}.{}", prefix, sanitize_title(title), format.extension())
}

/// Render an artifact in the requested format.
///
/// Markdown reports render to any format: slides are re-parsed out of the
/// markdown for pptx, and tables linearized for xlsx. Slide decks only
/// render to pptx. Surveys render to a printable doc form, or to an xlsx
/// answer sheet when answers are wanted as data.
pub fn render(artifact: &Artifact, format: ExportFormat, title: &str) -> Result<Vec<u8>> {
    match (artifact, format) {
        (Artifact::MarkdownReport(report), ExportFormat::Doc) => {
            Ok(word::render_doc(title, report))
        }
        (Artifact::MarkdownReport(report), ExportFormat::Xlsx) => {
            let mut markdown = report.main.clone();
            if let Some(key) = &report.answer_key {
                markdown.push_str(&format!("\n## {}\n{}", key.heading, key.body));
            }
            xlsx::render_xlsx(title, &markdown)
        }
        (Artifact::MarkdownReport(report), ExportFormat::Pptx) => {
            let blocks = parser::parse_slides(&report.main)?;
            pptx::render_pptx(title, &blocks)
        }
        (Artifact::SlideDeck(blocks), ExportFormat::Pptx) => pptx::render_pptx(title, blocks),
        (Artifact::SlideDeck(_), other) => {
            anyhow::bail!("슬라이드는 {} 형식으로 내보낼 수 없습니다", other.extension())
        }
        (Artifact::Survey { schema, answers }, ExportFormat::Doc) => {
            Ok(word::render_survey_doc(schema, answers.first()))
        }
        (Artifact::Survey { schema, answers }, ExportFormat::Xlsx) => {
            xlsx::render_rows(&survey_rows(schema, answers))
        }
        (Artifact::Survey { .. }, ExportFormat::Pptx) => {
            anyhow::bail!("설문지는 pptx 형식으로 내보낼 수 없습니다")
        }
    }
}

/// Answer sheet rows: a header of question titles, then one row per
/// respondent with answers looked up by question id
pub fn survey_rows(schema: &SurveySchema, respondents: &[SurveyAnswers]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(respondents.len() + 1);
    rows.push(
        schema
            .questions
            .iter()
            .map(|q| q.title.clone())
            .collect::<Vec<_>>(),
    );
    for answers in respondents {
        rows.push(
            schema
                .questions
                .iter()
                .map(|q| {
                    answers
                        .get(&q.id)
                        .map(|a| a.display())
                        .unwrap_or_default()
                })
                .collect(),
        );
    }
    rows
}
