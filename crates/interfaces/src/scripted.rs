use crate::traits::Confirmation;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Approves everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Confirmation for AutoApprove {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!("Auto-approved: {}", message.replace('\n', " "));
        true
    }
}

/// Replays a fixed list of answers and records every prompt it was shown.
///
/// Once the script runs out, `fallback` is returned.
#[derive(Debug, Default)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(answer: bool) -> Self {
        Self {
            fallback: answer,
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, answer: bool) -> Self {
        self.fallback = answer;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().push(message.to_string());
        self.answers.lock().pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_then_fallback() {
        let confirm = ScriptedConfirmation::new([true, false]).with_fallback(true);

        assert!(confirm.confirm("one").await);
        assert!(!confirm.confirm("two").await);
        assert!(confirm.confirm("three").await);
        assert_eq!(confirm.prompts(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_default_fallback_declines() {
        let confirm = ScriptedConfirmation::new(Vec::<bool>::new());
        assert!(!confirm.confirm("anything").await);
        assert_eq!(confirm.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_auto_approve() {
        assert!(AutoApprove.confirm("go").await);
    }
}
