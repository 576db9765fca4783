// Edumaster - 교육 콘텐츠 마스터
// Curriculum planning, teaching materials, promo copy, and feedback
// analysis for educators, backed by the Gemini API.

pub mod cli;
pub mod client;
pub mod config;
pub mod export;
pub mod models;
pub mod parser;
pub mod stages;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{Artifact, MaterialKind, ProgramState, Schedule, SurveySchema};
pub use state::{ProgramStore, SurveyStore};
