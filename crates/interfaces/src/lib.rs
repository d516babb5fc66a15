pub mod scripted;
pub mod terminal;
pub mod traits;

pub use scripted::{AutoApprove, ScriptedConfirmation};
pub use terminal::TerminalInterface;
pub use traits::Confirmation;
