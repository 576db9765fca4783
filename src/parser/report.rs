//! Markdown report parsing: answer-key separation

use crate::models::{AnswerSection, ReportDocument};
use anyhow::{Context, Result};
use regex::Regex;

const DEFAULT_ANSWER_HEADING: &str = "정답 및 해설";

/// Split a report at the first answer-key heading (`## 정답 및 해설`,
/// `## Answer Key`, and variants). Reports without one keep everything in
/// `main`.
pub fn parse_report(markdown: &str) -> Result<ReportDocument> {
    let header = Regex::new(r"(?mi)^##\s*(정답|해설|Answers|Answer Key).*")
        .context("Failed to compile answer heading regex")?;

    let Some(m) = header.find(markdown) else {
        return Ok(ReportDocument {
            main: markdown.to_string(),
            answer_key: None,
        });
    };

    let main = markdown[..m.start()].to_string();
    let answer_content = &markdown[m.start()..];

    let (heading, body) = match answer_content.find('\n') {
        Some(end) => {
            let heading = answer_content[..end].replace('#', "").trim().to_string();
            (heading, answer_content[end..].trim().to_string())
        }
        None => (DEFAULT_ANSWER_HEADING.to_string(), String::new()),
    };

    Ok(ReportDocument {
        main,
        answer_key: Some(AnswerSection { heading, body }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_splits_at_answer_heading() {
        let markdown = "Q1. 질문?\n① 보기\n\n## 정답 및 해설\nQ1: ① 이유는...";
        let doc = parse_report(markdown).unwrap();
        assert_eq!(doc.main, "Q1. 질문?\n① 보기\n\n");
        let key = doc.answer_key.unwrap();
        assert_eq!(key.heading, "정답 및 해설");
        assert_eq!(key.body, "Q1: ① 이유는...");
    }

    #[test]
    fn test_english_heading_matches_case_insensitively() {
        let markdown = "body\n## ANSWER KEY\nanswers here";
        let doc = parse_report(markdown).unwrap();
        assert_eq!(doc.answer_key.unwrap().heading, "ANSWER KEY");
    }

    #[test]
    fn test_report_without_answer_key() {
        let markdown = "# 강의 대본\n안녕하세요, 오늘은...";
        let doc = parse_report(markdown).unwrap();
        assert_eq!(doc.main, markdown);
        assert!(doc.answer_key.is_none());
    }

    #[test]
    fn test_heading_at_end_of_text() {
        let doc = parse_report("본문\n## 정답").unwrap();
        let key = doc.answer_key.unwrap();
        assert_eq!(key.heading, "정답 및 해설");
        assert!(key.body.is_empty());
    }
}
