pub mod file_tools;
pub mod local;
pub mod process_tools;
pub mod traits;

pub use local::LocalWorkspace;
pub use traits::{CommandOutput, ToolError, Workspace};
