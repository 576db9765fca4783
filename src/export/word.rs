//! Word export via the Office HTML format
//!
//! Word opens an HTML document saved as `.doc` natively, which keeps
//! tables and Korean typography intact without an OOXML writer. The file
//! starts with a UTF-8 BOM so Word picks the right encoding.

use crate::models::{AnswerValue, QuestionType, ReportDocument, SurveyAnswers, SurveySchema};
use pulldown_cmark::{html, Options, Parser};

const BOM: &str = "\u{feff}";

const DOC_STYLE: &str = r#"
          body { font-family: 'Malgun Gothic', sans-serif; font-size: 11pt; line-height: 1.6; }
          table { border-collapse: collapse; width: 100%; margin: 20px 0; }
          td, th { border: 1px solid #000; padding: 8px; text-align: left; vertical-align: top; }
          th { background-color: #f0f0f0; font-weight: bold; }
          h1 { font-size: 18pt; font-weight: bold; color: #000; margin-bottom: 15px; }
          h2 { font-size: 14pt; font-weight: bold; color: #333; margin-top: 20px; background: #f9f9f9; padding: 5px; }
          ul, ol { margin-left: 20px; }
"#;

/// Render markdown to HTML with tables enabled
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn office_html_shell(title: &str, body: &str) -> String {
    format!(
        "{BOM}<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>\n\
         <head>\n<meta charset='utf-8'>\n<title>{title}</title>\n<style>{DOC_STYLE}</style>\n</head>\n\
         <body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// A report as `.doc` bytes. The answer key, when present, follows the
/// main body under its own heading.
pub fn render_doc(title: &str, report: &ReportDocument) -> Vec<u8> {
    let mut body = markdown_to_html(&report.main);
    if let Some(key) = &report.answer_key {
        body.push_str(&format!("<h2>💡 {}</h2>\n", escape_html(&key.heading)));
        body.push_str(&markdown_to_html(&key.body));
    }
    office_html_shell(title, &body).into_bytes()
}

/// A survey as a printable `.doc` form: every question numbered, with
/// checkboxes for choice types, a scale row for linear scales, and ruled
/// blank lines for free text. With `answers`, selected options are checked
/// and recorded text filled in.
pub fn render_survey_doc(schema: &SurveySchema, answers: Option<&SurveyAnswers>) -> Vec<u8> {
    let mut body = String::new();
    body.push_str(&format!("<p>{}</p>\n", escape_html(&schema.description)));

    for (idx, question) in schema.questions.iter().enumerate() {
        let required = if question.required { " *" } else { "" };
        body.push_str(&format!(
            "<h2>{}. {}{}</h2>\n",
            idx + 1,
            escape_html(&question.title),
            required
        ));

        let answer = answers.and_then(|a| a.get(&question.id));
        let question_type = question.effective_type();
        match question_type {
            QuestionType::MultipleChoice | QuestionType::Checkbox | QuestionType::Dropdown => {
                let selected: Vec<String> = match answer {
                    Some(AnswerValue::Selections(items)) => items.clone(),
                    Some(other) => vec![other.display()],
                    None => Vec::new(),
                };
                body.push_str("<ul>\n");
                for option in &question.options {
                    let mark = if selected.iter().any(|s| s == option) {
                        "☑"
                    } else {
                        "☐"
                    };
                    body.push_str(&format!("<li>{mark} {}</li>\n", escape_html(option)));
                }
                body.push_str("</ul>\n");
            }
            QuestionType::LinearScale => match answer {
                Some(value) => {
                    body.push_str(&format!(
                        "<p>선택: <b>{}</b> / 5</p>\n",
                        escape_html(&value.display())
                    ));
                }
                None => {
                    body.push_str(
                        "<p>① &nbsp; ② &nbsp; ③ &nbsp; ④ &nbsp; ⑤ &nbsp; (해당 번호에 표시해 주세요)</p>\n",
                    );
                }
            },
            QuestionType::ShortAnswer | QuestionType::Paragraph => match answer {
                Some(value) => {
                    body.push_str(&format!("<p>{}</p>\n", escape_html(&value.display())));
                }
                None => {
                    let lines = if question_type == QuestionType::Paragraph {
                        3
                    } else {
                        1
                    };
                    for _ in 0..lines {
                        body.push_str(
                            "<p>______________________________________________________________</p>\n",
                        );
                    }
                }
            },
        }
    }

    office_html_shell(&schema.title, &body).into_bytes()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerSection, SurveyQuestion};

    #[test]
    fn test_doc_starts_with_bom_and_office_namespace() {
        let report = ReportDocument {
            main: "# 수업 지도안\n내용".to_string(),
            answer_key: None,
        };
        let bytes = render_doc("AI 리터러시", &report);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        assert!(text.contains("urn:schemas-microsoft-com:office:word"));
        assert!(text.contains("<h1>AI 리터러시</h1>"));
    }

    #[test]
    fn test_table_markdown_becomes_html_table() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_answer_key_follows_main_body() {
        let report = ReportDocument {
            main: "Q1. 질문?".to_string(),
            answer_key: Some(AnswerSection {
                heading: "정답 및 해설".to_string(),
                body: "Q1: ①".to_string(),
            }),
        };
        let text = String::from_utf8(render_doc("퀴즈", &report)).unwrap();
        let main_pos = text.find("Q1. 질문?").unwrap();
        let key_pos = text.find("💡 정답 및 해설").unwrap();
        assert!(main_pos < key_pos);
    }

    #[test]
    fn test_survey_form_renders_each_question_type() {
        let schema = SurveySchema {
            title: "만족도 조사".to_string(),
            description: "의견을 주세요".to_string(),
            questions: vec![
                SurveyQuestion {
                    id: "q1".to_string(),
                    title: "만족도는?".to_string(),
                    question_type: QuestionType::LinearScale,
                    options: vec![],
                    required: true,
                },
                SurveyQuestion {
                    id: "q2".to_string(),
                    title: "좋았던 활동은?".to_string(),
                    question_type: QuestionType::Checkbox,
                    options: vec!["실습".to_string(), "토론".to_string()],
                    required: false,
                },
            ],
        };
        let text = String::from_utf8(render_survey_doc(&schema, None)).unwrap();
        assert!(text.contains("1. 만족도는? *"));
        assert!(text.contains("①"));
        assert!(text.contains("☐ 실습"));
        assert!(text.contains("☐ 토론"));

        let mut answers = SurveyAnswers::new();
        answers.insert("q1".into(), AnswerValue::Scale(4));
        answers.insert(
            "q2".into(),
            AnswerValue::Selections(vec!["실습".into()]),
        );
        let filled = String::from_utf8(render_survey_doc(&schema, Some(&answers))).unwrap();
        assert!(filled.contains("선택: <b>4</b> / 5"));
        assert!(filled.contains("☑ 실습"));
        assert!(filled.contains("☐ 토론"));
    }

    #[test]
    fn test_choice_question_without_options_renders_as_free_text() {
        let schema = SurveySchema {
            title: "조사".to_string(),
            description: String::new(),
            questions: vec![SurveyQuestion {
                id: "q1".to_string(),
                title: "수업은 어땠나요?".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: vec![],
                required: true,
            }],
        };
        let text = String::from_utf8(render_survey_doc(&schema, None)).unwrap();
        assert!(!text.contains("<ul>"));
        assert!(text.contains("답변: ____"));
    }
}
