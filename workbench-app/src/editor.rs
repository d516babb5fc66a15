use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use workbench_predictor::SharedModel;
use workbench_tools::{ToolError, Workspace};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No file open")]
    NoFile,
    #[error(transparent)]
    Workspace(#[from] ToolError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Trailing characters fed to the model on each change.
    pub feed_window_chars: usize,
    /// Lines above the cursor used as prediction context.
    pub context_lines: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            feed_window_chars: 500,
            context_lines: 10,
        }
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position just past the last character of `text`.
    pub fn end_of(text: &str) -> Self {
        let last = text.rsplit('\n').next().unwrap_or("");
        Self {
            line: text.split('\n').count(),
            column: last.chars().count() + 1,
        }
    }
}

fn trailing_window(text: &str, chars: usize) -> &str {
    match text.char_indices().rev().nth(chars.saturating_sub(1)) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

/// Text from `context_lines` lines above the cursor up to the cursor.
fn text_before_cursor(text: &str, cursor: Cursor, context_lines: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let line = cursor.line.clamp(1, lines.len());
    let first = line.saturating_sub(context_lines).max(1);

    let mut prefix: Vec<String> = lines[first - 1..line - 1]
        .iter()
        .map(|l| l.to_string())
        .collect();
    let current: String = lines[line - 1]
        .chars()
        .take(cursor.column.saturating_sub(1))
        .collect();
    prefix.push(current);
    prefix.join("\n")
}

/// One open file plus the suggestions computed for its last edit.
///
/// The model is passed in, so several sessions can share one.
pub struct EditorSession {
    workspace: Arc<dyn Workspace>,
    model: SharedModel,
    config: EditorConfig,
    file: Option<PathBuf>,
    content: String,
    suggestions: Vec<String>,
}

impl EditorSession {
    pub fn new(workspace: Arc<dyn Workspace>, model: SharedModel, config: EditorConfig) -> Self {
        Self {
            workspace,
            model,
            config,
            file: None,
            content: String::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Loads `path` and seeds the model with it. On a read error the buffer
    /// holds an error line and the model is left alone.
    pub async fn open(&mut self, path: &Path) -> Result<(), EditorError> {
        self.file = Some(path.to_path_buf());
        self.suggestions.clear();

        match self.workspace.read_file(path).await {
            Ok(content) => {
                self.model.feed(&content);
                self.content = content;
                tracing::debug!("Opened {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.content = format!("// Error: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn close(&mut self) {
        self.file = None;
        self.content.clear();
        self.suggestions.clear();
    }

    /// Handles a content-changed notification from the editing surface.
    pub fn content_changed(&mut self, text: &str, cursor: Cursor) -> &[String] {
        self.content = text.to_string();
        self.model
            .feed(trailing_window(text, self.config.feed_window_chars));

        let prefix = text_before_cursor(text, cursor, self.config.context_lines);
        self.suggestions = self.model.predict(&prefix);
        &self.suggestions
    }

    /// Writes the buffer back and trains on it.
    pub async fn save(&mut self) -> Result<(), EditorError> {
        let Some(path) = self.file.clone() else {
            return Err(EditorError::NoFile);
        };
        let result = self.workspace.write_file(&path, &self.content).await;
        self.model.feed(&self.content);
        result?;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }
}
