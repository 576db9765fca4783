pub mod analyze;
pub mod export;
pub mod material;
pub mod plan;
pub mod promo;
pub mod reset;
pub mod status;
pub mod survey;

use crate::client::GeminiClient;
use crate::config::AppConfig;
use crate::state::{default_state_dir, ProgramStore, SurveyStore};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the state directory: explicit flag wins, otherwise the platform
/// data dir.
pub fn resolve_state_dir(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir.to_path_buf()),
        None => default_state_dir(),
    }
}

pub fn open_program_store(state_dir: Option<&Path>) -> Result<ProgramStore> {
    let dir = resolve_state_dir(state_dir)?;
    ProgramStore::load(dir)
}

pub fn open_survey_store(state_dir: Option<&Path>) -> Result<SurveyStore> {
    let dir = resolve_state_dir(state_dir)?;
    Ok(SurveyStore::new(dir))
}

/// Build a live API client from config and the `GEMINI_API_KEY` environment
pub fn build_client(config: &AppConfig) -> Result<GeminiClient> {
    let api_key = config.api_key()?;
    Ok(GeminiClient::new(config, api_key))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
