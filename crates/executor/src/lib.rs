pub mod log;
pub mod report;
pub mod task_executor;

pub use log::{ExecutionLog, LogEntry};
pub use report::{RunSummary, TaskReport};
pub use task_executor::{confirmation_message, TaskExecutor};
