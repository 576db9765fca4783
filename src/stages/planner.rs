//! Stage 1: curriculum planning

use super::prompts;
use super::StageSession;
use crate::client::GenerationClient;
use crate::models::Schedule;
use crate::state::ProgramStore;
use anyhow::Result;

/// Inputs for a planning run. Everything except the topic and goal may be
/// left blank; blanks are sent as "미정".
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub topic: String,
    pub target_audience: String,
    pub student_count: String,
    pub learning_goal: String,
    pub training_type: String,
    pub duration: String,
    pub schedule: Option<Schedule>,
}

/// Stream a curriculum for the request, persisting the inputs before the
/// call and the finished curriculum after it. Replaces any cached materials
/// only indirectly: the material cache is left alone so regenerating a plan
/// does not throw away work from stage 2.
pub async fn generate_plan(
    client: &dyn GenerationClient,
    store: &mut ProgramStore,
    session: &mut StageSession,
    request: PlanRequest,
    mut on_fragment: impl FnMut(&str),
) -> Result<String> {
    store.update(|state| {
        state.topic = request.topic.clone();
        state.target_audience = request.target_audience.clone();
        state.student_count = request.student_count.clone();
        state.learning_goal = request.learning_goal.clone();
        state.training_type = request.training_type.clone();
        state.duration = request.duration.clone();
        state.schedule = request.schedule.clone();
    });

    let user_input = prompts::plan_input(store.state());
    let ticket = session.begin();

    let mut rx = match client
        .generate_stream(prompts::PLANNER_SYSTEM_PROMPT, &user_input)
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

    let curriculum = session.state().output.clone();
    store.update(|state| state.curriculum = Some(curriculum.clone()));
    Ok(curriculum)
}
