use crate::traits::Confirmation;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

type Input = Box<dyn AsyncBufRead + Unpin + Send>;

/// Asks on stdout and reads a y/n answer per line of input.
///
/// One reader is kept for the interface's lifetime, so piped answers are
/// consumed a line at a time across prompts.
pub struct TerminalInterface {
    input: Mutex<Input>,
}

impl TerminalInterface {
    pub fn new() -> Self {
        Self::with_input(BufReader::new(tokio::io::stdin()))
    }

    pub fn with_input(input: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
        }
    }

    pub async fn receive_input(&self) -> Option<String> {
        let mut reader = self.input.lock().await;
        let mut line = String::new();

        match reader.read_line(&mut line).await {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }

    pub async fn send_output(&self, message: &str) {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(message.as_bytes()).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }
}

impl Default for TerminalInterface {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_affirmative(response: &str) -> bool {
    response.trim().to_lowercase().starts_with('y')
}

#[async_trait]
impl Confirmation for TerminalInterface {
    async fn confirm(&self, message: &str) -> bool {
        self.send_output(&format!("⚠️  {}", message)).await;
        self.send_output("Approve? (y/n): ").await;

        match self.receive_input().await {
            Some(response) => is_affirmative(&response),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("  YES "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("sure"));
    }

    #[tokio::test]
    async fn test_piped_answers_span_prompts() {
        let terminal = TerminalInterface::with_input(&b"y\ny\n"[..]);

        assert!(terminal.confirm("Write file?\na.txt").await);
        assert!(terminal.confirm("Write file?\nb.txt").await);
        // EOF declines.
        assert!(!terminal.confirm("Write file?\nc.txt").await);
    }

    #[tokio::test]
    async fn test_each_prompt_reads_its_own_line() {
        let terminal = TerminalInterface::with_input(&b"yes\nn\nY\n"[..]);

        assert!(terminal.confirm("first").await);
        assert!(!terminal.confirm("second").await);
        assert!(terminal.confirm("third").await);
    }
}
