use async_trait::async_trait;

/// The gate every mutating task passes through before it runs.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}
