pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{
    analyze_frame, analyze_source, analyze_with_tracker, run_analysis, run_analysis_reported,
    AnalysisOutput,
};
pub use types::{AnalysisStage, NoOpReporter, ProgressReporter};
