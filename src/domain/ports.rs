use crate::domain::model::Message;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Delivers one rendered message. Implementations must not retry on their own.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, message: &Message) -> Result<()>;

    /// Short label for logs, e.g. "http" or "outbox".
    fn name(&self) -> &'static str;
}
