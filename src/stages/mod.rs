//! The four authoring stages
//!
//! Each stage builds a bracketed-tag payload, calls the generation client,
//! and turns the response into an artifact:
//! - `planner`: curriculum planning (streamed markdown)
//! - `materials`: teaching material generation, single and batch
//! - `promo`: notices and promotional copy (streamed markdown)
//! - `feedback`: survey draft creation and feedback analysis

pub mod feedback;
pub mod materials;
pub mod planner;
pub mod prompts;
pub mod promo;

pub use feedback::{analyze_feedback, create_survey};
pub use materials::{generate_material, generate_missing, BatchProgress};
pub use planner::{generate_plan, PlanRequest};
pub use promo::generate_promo;

/// Observable state of one in-flight generation
#[derive(Debug, Clone, Default)]
pub struct ApiState {
    pub output: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Handle identifying one generation run. Fragments carrying a ticket from
/// a superseded run are ignored instead of corrupting newer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// Accumulates streamed output for one stage.
///
/// `begin` invalidates every outstanding ticket, so a slow stream from an
/// abandoned run can never interleave with the run that replaced it.
#[derive(Debug, Default)]
pub struct StageSession {
    state: ApiState,
    current: u64,
}

impl StageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run: clears output and error, marks loading, and returns
    /// the ticket the new run must present with every fragment
    pub fn begin(&mut self) -> GenerationTicket {
        self.current += 1;
        self.state = ApiState {
            output: String::new(),
            is_loading: true,
            error: None,
        };
        GenerationTicket(self.current)
    }

    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        ticket.0 == self.current
    }

    /// Append a fragment. Returns false (and changes nothing) when the
    /// ticket is stale.
    pub fn append(&mut self, ticket: GenerationTicket, fragment: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state.output.push_str(fragment);
        true
    }

    /// Mark the run complete. Stale tickets are ignored.
    pub fn finish(&mut self, ticket: GenerationTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state.is_loading = false;
        true
    }

    /// Record a failure, discarding any partial output. Stale tickets are
    /// ignored.
    pub fn fail(&mut self, ticket: GenerationTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = ApiState {
            output: String::new(),
            is_loading: false,
            error: Some(message.into()),
        };
        true
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }
}
