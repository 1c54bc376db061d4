use crate::domain::model::Message;
use crate::domain::ports::{Notifier, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Writes each message as a plain-text mail file, one per giver.
///
/// Useful for printing envelopes by hand or handing files to another mailer.
pub struct OutboxNotifier<S: Storage> {
    storage: S,
    from: String,
}

impl<S: Storage> OutboxNotifier<S> {
    pub fn new(storage: S, from: impl Into<String>) -> Self {
        Self {
            storage,
            from: from.into(),
        }
    }

    /// `alice@example.com` -> `alice_at_example.com.eml`
    ///
    /// Characters other than ASCII alphanumerics, `.`, `-` and `+` are written
    /// as `_XX` (uppercase hex of each UTF-8 byte), so distinct addresses never
    /// share a file. `_` itself is escaped, which keeps `_at_` unambiguous.
    pub fn file_name(email: &str) -> String {
        let mut safe = String::with_capacity(email.len() + 8);
        for c in email.chars() {
            match c {
                '@' => safe.push_str("_at_"),
                c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+') => safe.push(c),
                c => {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).bytes() {
                        safe.push_str(&format!("_{:02X}", byte));
                    }
                }
            }
        }
        format!("{}.eml", safe)
    }

    fn format(&self, message: &Message) -> String {
        format!(
            "From: {}\r\nTo: {} <{}>\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.from,
            message.to_name,
            message.to,
            message.subject,
            chrono::Utc::now().to_rfc2822(),
            message.body.replace("\r\n", "\n").replace('\n', "\r\n"),
        )
    }
}

#[async_trait]
impl<S: Storage> Notifier for OutboxNotifier<S> {
    async fn deliver(&self, message: &Message) -> Result<()> {
        let file_name = Self::file_name(&message.to);
        let content = self.format(message);
        self.storage.write_file(&file_name, content.as_bytes()).await?;
        tracing::debug!("Wrote {} ({} bytes)", file_name, content.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_is_filesystem_safe() {
        assert_eq!(
            OutboxNotifier::<LocalStorage>::file_name("alice@example.com"),
            "alice_at_example.com.eml"
        );
        assert_eq!(
            OutboxNotifier::<LocalStorage>::file_name("../x/y@z.io"),
            ".._2Fx_2Fy_at_z.io.eml"
        );
    }

    #[test]
    fn test_distinct_addresses_get_distinct_files() {
        let name = OutboxNotifier::<LocalStorage>::file_name;
        assert_eq!(name("a!b@x.io"), "a_21b_at_x.io.eml");
        assert_eq!(name("a#b@x.io"), "a_23b_at_x.io.eml");
        assert_ne!(name("x_at_y@z.io"), name("x@y_at_z.io"));
        assert_ne!(name("a_b@x.io"), name("a!b@x.io"));
        assert_eq!(name("jos\u{e9}@x.io"), "jos_C3_A9_at_x.io.eml");
    }

    #[tokio::test]
    async fn test_similar_addresses_do_not_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = OutboxNotifier::new(LocalStorage::new(temp_dir.path()), "santa@example.com");

        for to in ["a!b@x.io", "a#b@x.io"] {
            let message = Message {
                to: to.to_string(),
                to_name: to.to_string(),
                subject: "Your assignment".to_string(),
                body: format!("for {}", to),
            };
            notifier.deliver(&message).await.unwrap();
        }

        let files = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[tokio::test]
    async fn test_deliver_writes_mail_file() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = OutboxNotifier::new(LocalStorage::new(temp_dir.path()), "santa@example.com");

        let message = Message {
            to: "bob@example.com".to_string(),
            to_name: "Bob".to_string(),
            subject: "Your assignment".to_string(),
            body: "Line one\nLine two".to_string(),
        };
        notifier.deliver(&message).await.unwrap();

        let written =
            std::fs::read_to_string(temp_dir.path().join("bob_at_example.com.eml")).unwrap();
        assert!(written.starts_with("From: santa@example.com\r\nTo: Bob <bob@example.com>\r\n"));
        assert!(written.contains("Subject: Your assignment\r\n"));
        assert!(written.contains("Date: "));
        assert!(written.ends_with("\r\n\r\nLine one\r\nLine two\r\n"));
    }
}
