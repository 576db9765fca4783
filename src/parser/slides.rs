//! Slide-outline parsing
//!
//! Splits a markdown outline into slides at `# Slide N:` headers (Korean
//! `# 슬라이드` and bare `Slide N` headers included) and classifies each
//! body line as bullet, plain text, or table row.

use crate::models::{SlideBlock, SlideContent};
use anyhow::{Context, Result};
use regex::Regex;

/// Blocks shorter than this are treated as noise from the split
const MIN_BLOCK_LEN: usize = 5;

/// Split markdown into slide blocks. Content before the first header is
/// kept as its own block when it is long enough to matter; responses that
/// contain no headers at all become a single slide.
pub fn parse_slides(markdown: &str) -> Result<Vec<SlideBlock>> {
    let header = Regex::new(r"(?mi)^(#\s*Slide|#\s*슬라이드|Slide\s+\d+)")
        .context("Failed to compile slide header regex")?;

    let mut starts: Vec<usize> = header.find_iter(markdown).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(markdown.len());

    let mut slides = Vec::new();
    for window in starts.windows(2) {
        let block = markdown[window[0]..window[1]].trim();
        if block.len() < MIN_BLOCK_LEN {
            continue;
        }
        slides.push(parse_block(block));
    }
    Ok(slides)
}

fn parse_block(block: &str) -> SlideBlock {
    let mut lines = block.lines();
    let first = lines.next().unwrap_or_default();
    let title = clean_title(first);

    let mut content = Vec::new();
    let mut table_rows: Vec<Vec<String>> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('|') && line.ends_with('|') {
            if line.contains("---") {
                continue;
            }
            table_rows.push(split_table_row(line));
            continue;
        }

        if !table_rows.is_empty() {
            content.push(SlideContent::Table(std::mem::take(&mut table_rows)));
        }

        let is_bullet = line.starts_with('-')
            || line.starts_with('*')
            || line
                .split_once('.')
                .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
        let text = strip_line_markers(line);
        if is_bullet {
            content.push(SlideContent::Bullet(text));
        } else {
            content.push(SlideContent::Text(text));
        }
    }
    if !table_rows.is_empty() {
        content.push(SlideContent::Table(table_rows));
    }

    SlideBlock { title, content }
}

/// Title from the header line: `#` markers and the `Slide N:` prefix
/// stripped, with "내용" as the fallback for empty results
fn clean_title(line: &str) -> String {
    let no_hashes = line.trim().trim_start_matches('#').trim_start();
    let prefix =
        Regex::new(r"(?i)^(Slide\s*\d+:|슬라이드\s*\d+:)").expect("valid slide prefix regex");
    let title = prefix.replace(no_hashes, "").trim().to_string();
    if title.is_empty() {
        "내용".to_string()
    } else {
        title
    }
}

/// Cells of one `| a | b |` row, bold markers removed
fn split_table_row(line: &str) -> Vec<String> {
    let inner: Vec<&str> = line.split('|').collect();
    inner[1..inner.len().saturating_sub(1)]
        .iter()
        .map(|c| c.trim().replace("**", ""))
        .collect()
}

fn strip_line_markers(line: &str) -> String {
    let mut text = line;
    if let Some(rest) = text.strip_prefix("- ").or_else(|| text.strip_prefix("* ")) {
        text = rest;
    } else if let Some((n, rest)) = text.split_once(". ") {
        if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) {
            text = rest;
        }
    }
    text.replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_headers_produce_three_slides() {
        let markdown = "\
# Slide 1: 도입\n- 인사\n- 목표 소개\n\n# Slide 2: 전개\n핵심 개념 설명\n\n# 슬라이드 3: 정리\n- 복습";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].title, "도입");
        assert_eq!(slides[1].title, "전개");
        assert_eq!(slides[2].title, "정리");
        assert_eq!(
            slides[0].content,
            vec![
                SlideContent::Bullet("인사".to_string()),
                SlideContent::Bullet("목표 소개".to_string()),
            ]
        );
        assert_eq!(
            slides[1].content,
            vec![SlideContent::Text("핵심 개념 설명".to_string())]
        );
    }

    #[test]
    fn test_table_rows_grouped_and_separator_dropped() {
        let markdown = "\
# Slide 1: 일정\n| 주차 | 주제 |\n|---|---|\n| 1주 | **도입** |\n| 2주 | 실습 |\n- 마무리";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(
            slides[0].content,
            vec![
                SlideContent::Table(vec![
                    vec!["주차".to_string(), "주제".to_string()],
                    vec!["1주".to_string(), "도입".to_string()],
                    vec!["2주".to_string(), "실습".to_string()],
                ]),
                SlideContent::Bullet("마무리".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_noise_blocks_discarded() {
        let markdown = "#\n\n# Slide 1: 내용 소개\n- 항목";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "내용 소개");
    }

    #[test]
    fn test_empty_title_falls_back() {
        let markdown = "# Slide 1:\n- 항목 하나입니다";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(slides[0].title, "내용");
    }

    #[test]
    fn test_headerless_outline_is_single_slide() {
        let markdown = "그냥 긴 본문입니다\n- 항목";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "그냥 긴 본문입니다");
    }

    #[test]
    fn test_numbered_lines_are_bullets() {
        let markdown = "# Slide 1: 순서\n1. 첫 단계\n2. 둘째 단계";
        let slides = parse_slides(markdown).unwrap();
        assert_eq!(
            slides[0].content,
            vec![
                SlideContent::Bullet("첫 단계".to_string()),
                SlideContent::Bullet("둘째 단계".to_string()),
            ]
        );
    }
}
