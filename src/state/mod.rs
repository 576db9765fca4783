//! State Persistence Module
//!
//! Handles JSON persistence under the state directory, including:
//! - The single program being authored (topic, schedule, curriculum, cache)
//! - The survey draft and its collected answers

mod store;

pub use store::{default_state_dir, ProgramStore, SurveyStore};
