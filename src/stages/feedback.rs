//! Stage 4: survey drafting and feedback analysis

use super::prompts;
use super::StageSession;
use crate::client::GenerationClient;
use crate::models::{ProgramState, SurveySchema};
use crate::parser;
use anyhow::Result;

/// Create a survey draft with a single atomic call. The response must be a
/// complete valid schema; a malformed one is rejected whole and the raw
/// text travels with the error for plain-text fallback display.
pub async fn create_survey(
    client: &dyn GenerationClient,
    state: &ProgramState,
) -> Result<SurveySchema> {
    let user_input = prompts::survey_input(state);
    let response = client
        .generate(prompts::EVALUATOR_SYSTEM_PROMPT, &user_input)
        .await?;
    let schema = parser::parse_survey(&response)?;
    Ok(schema)
}

/// Stream an analysis report over the given feedback data
pub async fn analyze_feedback(
    client: &dyn GenerationClient,
    state: &ProgramState,
    session: &mut StageSession,
    data: &str,
    mut on_fragment: impl FnMut(&str),
) -> Result<String> {
    let user_input = prompts::analyze_input(state, data);
    let ticket = session.begin();

    let mut rx = match client
        .generate_stream(prompts::EVALUATOR_SYSTEM_PROMPT, &user_input)
        .await
    {
        Ok(rx) => rx,
        Err(e) => {
            session.fail(ticket, e.user_message());
            return Err(e.into());
        }
    };

    while let Some(item) = rx.recv().await {
        match item {
            Ok(fragment) => {
                if session.append(ticket, &fragment) {
                    on_fragment(&fragment);
                }
            }
            Err(e) => {
                session.fail(ticket, e.user_message());
                return Err(e.into());
            }
        }
    }
    session.finish(ticket);

    Ok(session.state().output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClient;
    use crate::parser::MalformedSurvey;

    fn state() -> ProgramState {
        let mut state = ProgramState::default();
        state.topic = "AI 리터러시".to_string();
        state.target_audience = "초등학생".to_string();
        state
    }

    #[tokio::test]
    async fn test_survey_created_from_fenced_json() {
        let mock = MockClient::new();
        mock.push_text(
            "```json\n{\"title\":\"만족도 조사\",\"description\":\"의견을 주세요\",\"questions\":[{\"title\":\"만족하셨나요?\",\"type\":\"LINEAR_SCALE\",\"required\":true}]}\n```",
        );

        let schema = create_survey(&mock, &state()).await.unwrap();
        assert_eq!(schema.title, "만족도 조사");
        assert_eq!(schema.questions[0].id, "q1");

        let call = &mock.calls()[0];
        assert!(!call.streaming);
        assert!(call.user_input.starts_with("[Action: Create Survey Draft]"));
    }

    #[tokio::test]
    async fn test_malformed_survey_error_carries_raw_text() {
        let mock = MockClient::new();
        mock.push_text("네, 설문지를 만들어 드릴게요! {broken");

        let err = create_survey(&mock, &state()).await.unwrap_err();
        let malformed = err.downcast_ref::<MalformedSurvey>().unwrap();
        assert_eq!(malformed.raw, "네, 설문지를 만들어 드릴게요! {broken");
    }

    #[tokio::test]
    async fn test_analysis_streams_report() {
        let mock = MockClient::new();
        mock.push_fragments(vec!["## 분석 ".to_string(), "결과".to_string()]);

        let mut session = StageSession::new();
        let report = analyze_feedback(&mock, &state(), &mut session, "q1: 5\nq2: 좋았어요", |_| {})
            .await
            .unwrap();

        assert_eq!(report, "## 분석 결과");
        let call = &mock.calls()[0];
        assert!(call.user_input.contains("[Data: q1: 5\nq2: 좋았어요]"));
    }
}
