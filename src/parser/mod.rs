pub mod report;
pub mod slides;
pub mod survey;
pub mod upload;

pub use report::parse_report;
pub use slides::parse_slides;
pub use survey::{parse_survey, MalformedSurvey};
pub use upload::{flatten_csv, flatten_data_file};
