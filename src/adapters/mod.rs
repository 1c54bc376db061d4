// Adapters layer: concrete storage and notification backends behind the domain ports.

pub mod http_mailer;
pub mod outbox;
pub mod storage;

use crate::config::{TransportConfig, TransportKind};
use crate::domain::model::Message;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use std::time::Duration;

pub use http_mailer::HttpMailer;
pub use outbox::OutboxNotifier;
pub use storage::LocalStorage;

const DEFAULT_SENDER: &str = "secret-santa";

/// The notifier selected by `[transport]`.
pub enum Transport {
    Http(HttpMailer),
    Outbox(OutboxNotifier<LocalStorage>),
}

impl Transport {
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        match config.kind {
            TransportKind::Http => {
                let endpoint = validate_required_field("transport.endpoint", &config.endpoint)?;
                let from = validate_required_field("transport.from", &config.from)?;
                let mailer = match config.timeout_seconds {
                    Some(secs) => HttpMailer::with_timeout(endpoint, from, Duration::from_secs(secs))?,
                    None => HttpMailer::new(endpoint, from)?,
                };
                Ok(Transport::Http(
                    mailer.with_credentials(config.username.clone(), config.password.clone()),
                ))
            }
            TransportKind::Outbox => {
                let dir = validate_required_field("transport.output_dir", &config.output_dir)?;
                let from = config.from.as_deref().unwrap_or(DEFAULT_SENDER);
                Ok(Transport::Outbox(OutboxNotifier::new(
                    LocalStorage::new(dir),
                    from,
                )))
            }
        }
    }
}

#[async_trait]
impl Notifier for Transport {
    async fn deliver(&self, message: &Message) -> Result<()> {
        match self {
            Transport::Http(mailer) => mailer.deliver(message).await,
            Transport::Outbox(outbox) => outbox.deliver(message).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Transport::Http(mailer) => mailer.name(),
            Transport::Outbox(outbox) => outbox.name(),
        }
    }
}
