pub mod config;
pub mod editor;
pub mod panel;

pub use config::Config;
pub use editor::{Cursor, EditorConfig, EditorError, EditorSession};
pub use panel::AgentPanel;
