use crate::model::{NGramModel, Prediction};
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle for a model used from more than one place.
///
/// Writers take the lock exclusively, one at a time; readers share it or
/// work on a [`snapshot`](Self::snapshot).
#[derive(Debug, Clone)]
pub struct SharedModel {
    inner: Arc<RwLock<NGramModel>>,
}

impl SharedModel {
    pub fn new(model: NGramModel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    pub fn feed(&self, text: &str) {
        self.inner.write().feed(text);
    }

    pub fn predict(&self, prefix: &str) -> Vec<String> {
        self.inner.read().predict(prefix)
    }

    pub fn predict_scored(&self, prefix: &str) -> Vec<Prediction> {
        self.inner.read().predict_scored(prefix)
    }

    pub fn snapshot(&self) -> NGramModel {
        self.inner.read().clone()
    }

    pub fn context_count(&self) -> usize {
        self.inner.read().context_count()
    }
}
