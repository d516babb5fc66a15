use serde::{Deserialize, Serialize};

/// Which files the analyzer looks for and what it proposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub manifest_file: String,
    pub install_command: String,
    pub readme_file: String,
    pub readme_template: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            manifest_file: "package.json".to_string(),
            install_command: "npm install".to_string(),
            readme_file: "README.md".to_string(),
            readme_template: "# New Project\n".to_string(),
        }
    }
}
