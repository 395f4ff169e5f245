//! Composer state and message assembly for the trip chat.
//!
//! Sending is a small pipeline driven by the app: resolve the sender name
//! (possibly through a prompt), read an attached image into a data URL, then
//! build the [`Message`]. [`OutgoingMessage`] carries the draft between steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capabilities::PickedFile;
use crate::links::{extract_urls, is_valid_url};
use crate::model::{Attachment, Message, MessageId, TripId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PendingAttachment {
    Image(PickedFile),
    Url { url: String, title: String },
}

impl PendingAttachment {
    /// Builds a link attachment; a blank title falls back to the URL.
    #[must_use]
    pub fn link(url: impl Into<String>, title: Option<String>) -> Self {
        let url = url.into();
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| url.clone());
        Self::Url { url, title }
    }

    #[must_use]
    pub fn preview(&self) -> String {
        match self {
            Self::Image(file) => file.name.clone(),
            Self::Url { title, .. } => title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatComposer {
    pub text: String,
    pub attachment: Option<PendingAttachment>,
    pub menu_open: bool,
    /// A URL accepted by the link prompt that is still waiting for its title.
    pub pending_link: Option<String>,
}

impl ChatComposer {
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.text.trim().is_empty() || self.attachment.is_some()
    }

    pub fn attach(&mut self, attachment: PendingAttachment) {
        self.attachment = Some(attachment);
        self.menu_open = false;
        self.pending_link = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCheck {
    Cancelled,
    Invalid,
    Valid,
}

#[must_use]
pub fn check_link(entered: Option<&str>) -> LinkCheck {
    match entered.map(str::trim) {
        None | Some("") => LinkCheck::Cancelled,
        Some(url) if is_valid_url(url) => LinkCheck::Valid,
        Some(_) => LinkCheck::Invalid,
    }
}

/// Picks the sender name without prompting when possible. `None` means the
/// user has to be asked.
#[must_use]
pub fn known_sender(user_name: Option<&str>, shared_view: bool, default_name: &str) -> Option<String> {
    match user_name {
        Some(name) => Some(name.to_string()),
        None if shared_view => None,
        None => Some(default_name.to_string()),
    }
}

/// A send in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub trip_id: TripId,
    pub text: String,
    pub sender: Option<String>,
    pub attachment: Option<PendingAttachment>,
}

impl OutgoingMessage {
    #[must_use]
    pub fn from_composer(trip_id: TripId, composer: &ChatComposer) -> Self {
        Self {
            trip_id,
            text: composer.text.clone(),
            sender: None,
            attachment: composer.attachment.clone(),
        }
    }

    /// The image whose bytes still have to be read, if any.
    #[must_use]
    pub fn image(&self) -> Option<&PickedFile> {
        match &self.attachment {
            Some(PendingAttachment::Image(file)) => Some(file),
            _ => None,
        }
    }

    #[must_use]
    pub fn finish(
        self,
        id: MessageId,
        timestamp: DateTime<Utc>,
        sender: String,
        image_data: Option<String>,
    ) -> Message {
        let attachment = match self.attachment {
            Some(PendingAttachment::Image(file)) => image_data.map(|data| Attachment::Image {
                data,
                name: file.name,
                size: file.size,
            }),
            Some(PendingAttachment::Url { url, title }) => Some(Attachment::Url { url, title }),
            None => None,
        };
        Message {
            id,
            urls: extract_urls(&self.text),
            text: self.text,
            sender,
            timestamp,
            read: false,
            attachment,
        }
    }
}

// --- Notification text ---

#[must_use]
pub fn chat_banner(sender: &str) -> String {
    format!("{sender} sent a message")
}

#[must_use]
pub fn trip_banner(trip_name: &str, sender: &str) -> String {
    format!("{trip_name}: new message from {sender}")
}

#[must_use]
pub fn notification_title(trip_name: &str, sender: &str) -> String {
    format!("{trip_name} - {sender}")
}

#[must_use]
pub fn notification_body(message: &Message, preview_chars: usize) -> String {
    match &message.attachment {
        Some(attachment) => attachment.notification_label().to_string(),
        None => truncate(&message.text, preview_chars),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

#[must_use]
pub fn notification_tag(trip_id: TripId) -> String {
    format!("chat-{trip_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> PickedFile {
        PickedFile {
            handle: "h1".into(),
            name: "beach.jpg".into(),
            size: 4096,
            mime: "image/jpeg".into(),
        }
    }

    #[test]
    fn blank_text_without_attachment_cannot_be_sent() {
        let mut composer = ChatComposer::default();
        assert!(!composer.can_send());
        composer.text = "   ".into();
        assert!(!composer.can_send());
        composer.attach(PendingAttachment::link("https://a.example", None));
        assert!(composer.can_send());
    }

    #[test]
    fn link_title_defaults_to_url() {
        assert_eq!(
            PendingAttachment::link("https://a.example", Some(" ".into())),
            PendingAttachment::Url {
                url: "https://a.example".into(),
                title: "https://a.example".into()
            }
        );
    }

    #[test]
    fn link_checks() {
        assert_eq!(check_link(None), LinkCheck::Cancelled);
        assert_eq!(check_link(Some("")), LinkCheck::Cancelled);
        assert_eq!(check_link(Some("not a url")), LinkCheck::Invalid);
        assert_eq!(check_link(Some("https://a.example")), LinkCheck::Valid);
    }

    #[test]
    fn sender_falls_back_or_asks() {
        assert_eq!(known_sender(Some("Aki"), true, "You").as_deref(), Some("Aki"));
        assert_eq!(known_sender(None, false, "You").as_deref(), Some("You"));
        assert_eq!(known_sender(None, true, "You"), None);
    }

    #[test]
    fn finished_message_lists_urls_and_image() {
        let composer = ChatComposer {
            text: "see https://a.example/x".into(),
            attachment: Some(PendingAttachment::Image(photo())),
            ..ChatComposer::default()
        };
        let outgoing = OutgoingMessage::from_composer(TripId(1), &composer);
        assert_eq!(outgoing.image().map(|f| f.handle.as_str()), Some("h1"));

        let message = outgoing.finish(
            MessageId(9),
            Utc::now(),
            "Aki".into(),
            Some("data:image/jpeg;base64,AA==".into()),
        );
        assert_eq!(message.urls, vec!["https://a.example/x".to_string()]);
        assert!(matches!(
            message.attachment,
            Some(Attachment::Image { size: 4096, .. })
        ));
        assert!(!message.read);
    }

    #[test]
    fn notification_body_truncates_long_text() {
        let outgoing = OutgoingMessage {
            trip_id: TripId(1),
            text: "a".repeat(31),
            sender: None,
            attachment: None,
        };
        let message = outgoing.finish(MessageId(1), Utc::now(), "Aki".into(), None);
        assert_eq!(notification_body(&message, 30), format!("{}...", "a".repeat(30)));

        let short = OutgoingMessage {
            trip_id: TripId(1),
            text: "a".repeat(30),
            sender: None,
            attachment: Some(PendingAttachment::link("https://a.example", None)),
        }
        .finish(MessageId(2), Utc::now(), "Aki".into(), None);
        assert_eq!(notification_body(&short, 30), "🔗 Sent a link");
    }

    #[test]
    fn notification_strings() {
        assert_eq!(chat_banner("Aki"), "Aki sent a message");
        assert_eq!(trip_banner("Kyoto", "Aki"), "Kyoto: new message from Aki");
        assert_eq!(notification_title("Kyoto", "Aki"), "Kyoto - Aki");
        assert_eq!(notification_tag(TripId(7)), "chat-7");
    }
}
