//! Stage 2: teaching material generation

use super::prompts;
use super::StageSession;
use crate::client::GenerationClient;
use crate::models::MaterialKind;
use crate::state::ProgramStore;
use anyhow::Result;
use std::time::Duration;

/// Progress report for one step of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub kind: MaterialKind,
    /// True when the step was served from the cache without a model call
    pub cached: bool,
}

/// Stream one material, caching the finished text under its kind. Each kind
/// has its own cache slot; regenerating a quiz never disturbs the cached
/// lesson plan.
pub async fn generate_material(
    client: &dyn GenerationClient,
    store: &mut ProgramStore,
    session: &mut StageSession,
    kind: MaterialKind,
    question_count: Option<u32>,
    mut on_fragment: impl FnMut(&str),
) -> Result<String> {
    let user_input = prompts::material_input(store.state(), kind, question_count);
    let ticket = session.begin();

    let mut rx = match client
        .generate_stream(prompts::MATERIALS_SYSTEM_PROMPT, &user_input)
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

    let content = session.state().output.clone();
    store.update(|state| {
        state.material_cache.insert(kind, content.clone());
    });
    Ok(content)
}

/// Generate every material kind that is not already cached, in canonical
/// order, and return all six in that order.
///
/// Cached kinds are reused without a model call. Fresh generations use the
/// default question counts and are written to the cache as they complete,
/// so a mid-batch failure keeps everything finished so far. A fixed delay
/// separates consecutive model calls.
pub async fn generate_missing(
    client: &dyn GenerationClient,
    store: &mut ProgramStore,
    batch_delay: Duration,
    mut on_progress: impl FnMut(BatchProgress),
) -> Result<Vec<(MaterialKind, String)>> {
    let total = MaterialKind::ALL.len();
    let mut results = Vec::with_capacity(total);
    let mut calls_made = 0u32;

    for (i, &kind) in MaterialKind::ALL.iter().enumerate() {
        let cached = store.state().material_cache.get(&kind).cloned();
        on_progress(BatchProgress {
            current: i + 1,
            total,
            kind,
            cached: cached.is_some(),
        });

        let content = match cached {
            Some(content) => content,
            None => {
                if calls_made > 0 {
                    tokio::time::sleep(batch_delay).await;
                }
                let user_input = prompts::material_input(store.state(), kind, None);
                let content = client
                    .generate(prompts::MATERIALS_SYSTEM_PROMPT, &user_input)
                    .await?;
                calls_made += 1;
                store.update(|state| {
                    state.material_cache.insert(kind, content.clone());
                });
                content
            }
        };
        results.push((kind, content));
    }

    Ok(results)
}
