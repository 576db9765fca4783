//! Stage 3: notices and promotional copy

use super::prompts;
use super::StageSession;
use crate::client::GenerationClient;
use crate::models::ProgramState;
use anyhow::Result;

/// Stream promo copy for the given benefit and channel. The result is not
/// cached; promo text is cheap to regenerate and channel-specific.
pub async fn generate_promo(
    client: &dyn GenerationClient,
    state: &ProgramState,
    session: &mut StageSession,
    benefit: &str,
    channel: &str,
    mut on_fragment: impl FnMut(&str),
) -> Result<String> {
    let user_input = prompts::promo_input(state, benefit, channel);
    let ticket = session.begin();

    let mut rx = match client
        .generate_stream(prompts::PROMO_SYSTEM_PROMPT, &user_input)
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
