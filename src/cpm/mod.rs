pub mod analyzer;

pub use analyzer::{analyze, total_duration, CpmOutcome, SLACK_EPSILON};
