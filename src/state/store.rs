//! Persistence for program state and survey data
//!
//! Everything is whole-object JSON under the state directory:
//! `program.json`, `survey.json`, `survey_answers.json`, plus
//! `survey_fill_draft.json` for an interrupted fill session.

use crate::models::{ProgramState, SurveyAnswers, SurveySchema};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

const PROGRAM_FILE: &str = "program.json";
const SURVEY_FILE: &str = "survey.json";
const ANSWERS_FILE: &str = "survey_answers.json";
const FILL_DRAFT_FILE: &str = "survey_fill_draft.json";

/// Default state directory under the platform data dir
pub fn default_state_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base.join("edumaster"))
}

/// Read a JSON state file. Missing and corrupt files both yield `None`;
/// a corrupt file is warned about and treated as absent so a bad write can
/// never lock the user out of every command.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            eprintln!("Warning: ignoring corrupt {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Store for the single program being worked on.
///
/// Writes happen only through [`ProgramStore::update`], which stamps
/// `last_modified` and marks the store dirty. Nothing touches disk until
/// `save` or `save_if_dirty`.
pub struct ProgramStore {
    state_dir: PathBuf,
    state: ProgramState,
    dirty: bool,
}

impl ProgramStore {
    /// Load program state, starting fresh when the file is missing or
    /// unreadable as JSON
    pub fn load(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        let path = state_dir.join(PROGRAM_FILE);
        let state = read_json(&path)?.unwrap_or_default();

        Ok(Self {
            state_dir,
            state,
            dirty: false,
        })
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Apply a mutation, stamp `last_modified`, mark dirty
    pub fn update(&mut self, f: impl FnOnce(&mut ProgramState)) {
        f(&mut self.state);
        self.state.last_modified = Utc::now();
        self.dirty = true;
    }

    /// Drop all program state, including the curriculum and material cache
    pub fn reset(&mut self) {
        self.state = ProgramState::default();
        self.dirty = true;
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {}", self.state_dir.display())
        })?;

        let path = self.state_dir.join(PROGRAM_FILE);
        let content =
            serde_json::to_string_pretty(&self.state).context("Failed to serialize program state")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        self.dirty = false;
        Ok(())
    }

    pub fn save_if_dirty(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }
}

/// Store for the survey draft and its collected answers
pub struct SurveyStore {
    state_dir: PathBuf,
}

impl SurveyStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// Current survey draft, if one was generated
    pub fn load_schema(&self) -> Result<Option<SurveySchema>> {
        read_json(&self.state_dir.join(SURVEY_FILE))
    }

    /// Replace the survey draft. Collected answers are cleared at the same
    /// time so they can never refer to questions from an older draft.
    pub fn save_schema(&self, schema: &SurveySchema) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {}", self.state_dir.display())
        })?;

        let path = self.state_dir.join(SURVEY_FILE);
        let content = serde_json::to_string_pretty(schema).context("Failed to serialize survey")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        self.clear_answers()?;
        self.clear_fill_draft()?;
        Ok(())
    }

    pub fn has_schema(&self) -> bool {
        self.state_dir.join(SURVEY_FILE).exists()
    }

    /// All collected responses, one answer map per respondent
    pub fn load_answers(&self) -> Result<Vec<SurveyAnswers>> {
        Ok(read_json(&self.state_dir.join(ANSWERS_FILE))?.unwrap_or_default())
    }

    pub fn save_answers(&self, answers: &[SurveyAnswers]) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {}", self.state_dir.display())
        })?;

        let path = self.state_dir.join(ANSWERS_FILE);
        let content =
            serde_json::to_string_pretty(answers).context("Failed to serialize answers")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn append_answers(&self, new_answers: Vec<SurveyAnswers>) -> Result<usize> {
        let mut all = self.load_answers()?;
        all.extend(new_answers);
        self.save_answers(&all)?;
        Ok(all.len())
    }

    /// Partially filled response from an interrupted fill session
    pub fn load_fill_draft(&self) -> Result<Option<SurveyAnswers>> {
        read_json(&self.state_dir.join(FILL_DRAFT_FILE))
    }

    /// Persist in-progress answers so an interrupted fill session resumes
    pub fn save_fill_draft(&self, draft: &SurveyAnswers) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {}", self.state_dir.display())
        })?;

        let path = self.state_dir.join(FILL_DRAFT_FILE);
        let content =
            serde_json::to_string_pretty(draft).context("Failed to serialize fill draft")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn clear_fill_draft(&self) -> Result<()> {
        let path = self.state_dir.join(FILL_DRAFT_FILE);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    fn clear_answers(&self) -> Result<()> {
        let path = self.state_dir.join(ANSWERS_FILE);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Drop the survey draft and all collected answers
    pub fn reset(&self) -> Result<()> {
        let path = self.state_dir.join(SURVEY_FILE);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        self.clear_fill_draft()?;
        self.clear_answers()
    }
}
