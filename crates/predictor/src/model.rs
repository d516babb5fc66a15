use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PredictorError {
    #[error("n-gram order must be at least 1, got {0}")]
    InvalidOrder(usize),
    #[error("top_k must be at least 1")]
    InvalidTopK,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// `n`: contexts hold up to `n - 1` preceding tokens.
    pub order: usize,
    pub top_k: usize,
    /// Cap on distinct contexts. Once reached, unseen contexts are dropped
    /// while known ones keep counting. `None` means unbounded.
    pub max_contexts: Option<usize>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            order: 3,
            top_k: 5,
            max_contexts: None,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<(), PredictorError> {
        if self.order == 0 {
            return Err(PredictorError::InvalidOrder(self.order));
        }
        if self.top_k == 0 {
            return Err(PredictorError::InvalidTopK);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub token: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    count: u64,
    first_seen: u64,
}

/// Online n-gram frequency model.
///
/// Counts only grow; nothing is ever forgotten.
#[derive(Debug, Clone)]
pub struct NGramModel {
    config: PredictorConfig,
    table: HashMap<Vec<String>, HashMap<String, Candidate>>,
    observations: u64,
}

impl NGramModel {
    pub fn new(order: usize) -> Result<Self, PredictorError> {
        Self::with_config(PredictorConfig {
            order,
            ..PredictorConfig::default()
        })
    }

    pub fn with_config(config: PredictorConfig) -> Result<Self, PredictorError> {
        config.validate()?;
        Ok(Self {
            config,
            table: HashMap::new(),
            observations: 0,
        })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    pub fn context_count(&self) -> usize {
        self.table.len()
    }

    pub fn observation_count(&self) -> u64 {
        self.observations
    }

    /// Counts every (context, next token) pair in `text`. Tokens near the
    /// start of `text` get the shorter context that precedes them.
    pub fn feed(&mut self, text: &str) {
        let tokens = tokenize(text);
        let width = self.config.order - 1;

        for (i, token) in tokens.iter().enumerate() {
            let start = i.saturating_sub(width);
            self.observe(&tokens[start..i], token);
        }

        tracing::trace!(
            "Fed {} tokens, {} contexts known",
            tokens.len(),
            self.table.len()
        );
    }

    fn observe(&mut self, context: &[String], token: &str) {
        if !self.table.contains_key(context) {
            if let Some(max) = self.config.max_contexts {
                if self.table.len() >= max {
                    return;
                }
            }
        }

        self.observations += 1;
        let seq = self.observations;
        let candidates = self.table.entry(context.to_vec()).or_default();
        candidates
            .entry(token.to_string())
            .or_insert(Candidate {
                count: 0,
                first_seen: seq,
            })
            .count += 1;
    }

    /// Ranked continuations for the trailing context of `prefix`.
    pub fn predict(&self, prefix: &str) -> Vec<String> {
        self.predict_scored(prefix)
            .into_iter()
            .map(|p| p.token)
            .collect()
    }

    /// Like [`predict`](Self::predict), with the observed counts. Higher
    /// counts rank first; ties go to the token seen first.
    pub fn predict_scored(&self, prefix: &str) -> Vec<Prediction> {
        let tokens = tokenize(prefix);
        let start = tokens.len().saturating_sub(self.config.order - 1);

        let Some(candidates) = self.table.get(&tokens[start..]) else {
            return Vec::new();
        };

        let mut ranked: Vec<(&String, &Candidate)> = candidates.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        ranked
            .into_iter()
            .take(self.config.top_k)
            .map(|(token, candidate)| Prediction {
                token: token.clone(),
                count: candidate.count,
            })
            .collect()
    }
}
