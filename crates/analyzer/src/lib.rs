pub mod analyzer;
pub mod config;

pub use analyzer::{Probe, WorkspaceAnalyzer};
pub use config::AnalyzerConfig;
