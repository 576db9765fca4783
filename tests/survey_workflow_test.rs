//! Survey lifecycle: draft creation from a scripted client, answer
//! collection, and export of the form and the answer sheet.

use edumaster::client::MockClient;
use edumaster::export::{self, ExportFormat};
use edumaster::models::{AnswerValue, Artifact, ProgramState, SurveyAnswers};
use edumaster::stages;
use edumaster::state::SurveyStore;
use tempfile::TempDir;

const SURVEY_JSON: &str = r#"```json
{
  "title": "AI 교육 만족도 조사",
  "description": "수업에 대한 의견을 들려주세요",
  "questions": [
    {"title": "전반적인 만족도", "type": "LINEAR_SCALE", "required": true},
    {"title": "가장 좋았던 활동", "type": "CHECKBOX", "options": ["실습", "토론", "발표"], "required": false},
    {"title": "개선할 점", "type": "PARAGRAPH", "required": false}
  ]
}
```"#;

fn planned_state() -> ProgramState {
    let mut state = ProgramState::default();
    state.topic = "AI 교육".to_string();
    state.target_audience = "중학생".to_string();
    state
}

#[tokio::test]
async fn survey_draft_then_answers_then_exports() {
    let dir = TempDir::new().unwrap();
    let store = SurveyStore::new(dir.path());

    let client = MockClient::new();
    client.push_text(SURVEY_JSON);

    let schema = stages::create_survey(&client, &planned_state()).await.unwrap();
    assert_eq!(schema.title, "AI 교육 만족도 조사");
    assert_eq!(schema.questions.len(), 3);
    // Missing ids are assigned positionally
    assert_eq!(schema.questions[0].id, "q1");
    assert_eq!(schema.questions[2].id, "q3");

    store.save_schema(&schema).unwrap();

    let mut first = SurveyAnswers::new();
    first.insert("q1".to_string(), AnswerValue::Scale(5));
    first.insert(
        "q2".to_string(),
        AnswerValue::Selections(vec!["실습".to_string(), "토론".to_string()]),
    );
    let mut second = SurveyAnswers::new();
    second.insert("q1".to_string(), AnswerValue::Scale(3));
    second.insert(
        "q3".to_string(),
        AnswerValue::Text("시간이 부족했어요".to_string()),
    );
    assert_eq!(store.append_answers(vec![first]).unwrap(), 1);
    assert_eq!(store.append_answers(vec![second]).unwrap(), 2);

    // Blank printable form
    let reloaded = store.load_schema().unwrap().unwrap();
    let form = export::render(
        &Artifact::Survey {
            schema: reloaded.clone(),
            answers: Vec::new(),
        },
        ExportFormat::Doc,
        &reloaded.title,
    )
    .unwrap();
    let html = String::from_utf8_lossy(&form).to_string();
    assert!(html.contains("1. 전반적인 만족도 *"));
    assert!(html.contains("☐ 실습"));

    // Answer sheet carries every respondent
    let respondents = store.load_answers().unwrap();
    let sheet = export::render(
        &Artifact::Survey {
            schema: reloaded.clone(),
            answers: respondents,
        },
        ExportFormat::Xlsx,
        &reloaded.title,
    )
    .unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(sheet)).unwrap();
    let mut sheet_xml = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
        &mut sheet_xml,
    )
    .unwrap();
    assert!(sheet_xml.contains("전반적인 만족도"));
    assert!(sheet_xml.contains("실습, 토론"));
    assert!(sheet_xml.contains("시간이 부족했어요"));
}

#[tokio::test]
async fn regenerated_draft_discards_stale_answers() {
    let dir = TempDir::new().unwrap();
    let store = SurveyStore::new(dir.path());

    let client = MockClient::new();
    client.push_text(SURVEY_JSON);
    let schema = stages::create_survey(&client, &planned_state()).await.unwrap();
    store.save_schema(&schema).unwrap();

    let mut answers = SurveyAnswers::new();
    answers.insert("q1".to_string(), AnswerValue::Scale(4));
    store.append_answers(vec![answers]).unwrap();

    client.push_text(SURVEY_JSON);
    let fresh = stages::create_survey(&client, &planned_state()).await.unwrap();
    store.save_schema(&fresh).unwrap();

    assert!(store.load_answers().unwrap().is_empty());
}
