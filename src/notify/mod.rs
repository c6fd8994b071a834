pub mod telegram;

use async_trait::async_trait;

use crate::error::PollError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), PollError>;
}
