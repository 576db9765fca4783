pub mod artifact;
pub mod program;
pub mod survey;

pub use artifact::{AnswerSection, Artifact, ReportDocument, SlideBlock, SlideContent};
pub use program::{MaterialKind, ProgramState, Schedule};
pub use survey::{AnswerValue, QuestionType, SurveyAnswers, SurveyQuestion, SurveySchema};
