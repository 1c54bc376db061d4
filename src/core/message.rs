use crate::domain::model::{Message, Participant};
use crate::utils::error::{Result, SantaError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const PLACEHOLDERS: [&str; 3] = ["giver_name", "recipient_name", "recipient_email"];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

impl MessageTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// 檢查模板只使用已知的佔位符
    pub fn validate_placeholders(&self) -> Result<()> {
        for (field, text) in [("message.subject", &self.subject), ("message.body", &self.body)] {
            if let Some(unknown) = PLACEHOLDER_RE
                .captures_iter(text)
                .map(|caps| caps[1].to_string())
                .find(|name| !PLACEHOLDERS.contains(&name.as_str()))
            {
                return Err(SantaError::TemplateError {
                    message: format!("unknown placeholder {{{}}} in {}", unknown, field),
                });
            }
        }
        Ok(())
    }

    /// Renders the notification `giver` receives about `recipient`.
    pub fn render(&self, giver: &Participant, recipient: &Participant) -> Message {
        let fill = |text: &str| {
            PLACEHOLDER_RE
                .replace_all(text, |caps: &Captures| match &caps[1] {
                    "giver_name" => giver.name.clone(),
                    "recipient_name" => recipient.name.clone(),
                    "recipient_email" => recipient.email.clone(),
                    _ => caps[0].to_string(),
                })
                .into_owned()
        };

        Message {
            to: giver.email.clone(),
            to_name: giver.name.clone(),
            subject: fill(&self.subject),
            body: fill(&self.body),
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(
            "Your Secret Santa assignment",
            "Hi {giver_name},\n\nYou are the Secret Santa for {recipient_name} ({recipient_email}).\n\nKeep it secret!",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_all_placeholders() {
        let template = MessageTemplate::new(
            "Gift for {recipient_name}",
            "{giver_name}, buy something for {recipient_name} <{recipient_email}>",
        );
        let giver = Participant::new("Alice", "alice@example.com");
        let recipient = Participant::new("Bob", "bob@example.com");

        let message = template.render(&giver, &recipient);

        assert_eq!(message.to, "alice@example.com");
        assert_eq!(message.to_name, "Alice");
        assert_eq!(message.subject, "Gift for Bob");
        assert_eq!(message.body, "Alice, buy something for Bob <bob@example.com>");
    }

    #[test]
    fn test_default_template_is_valid() {
        assert!(MessageTemplate::default().validate_placeholders().is_ok());
    }

    #[test]
    fn test_unknown_placeholder_is_rejected() {
        let template = MessageTemplate::new("Hi {giver_name}", "Budget: {budget}");
        let err = template.validate_placeholders().unwrap_err();
        assert!(matches!(err, SantaError::TemplateError { .. }));
        assert!(err.to_string().contains("{budget} in message.body"));
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let template = MessageTemplate::new("Hello", "Plain body {not closed");
        let p = Participant::new("A", "a@example.com");
        let message = template.render(&p, &p);
        assert_eq!(message.body, "Plain body {not closed");
    }
}
