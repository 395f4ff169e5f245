use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser-style notification permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
    Unsupported,
}

impl NotificationPermission {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    #[must_use]
    pub const fn needs_request(self) -> bool {
        matches!(self, Self::Default)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Notifications sharing a tag replace each other.
    pub tag: String,
    pub auto_close_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum NotificationOperation {
    CheckPermission,
    RequestPermission,
    Show(PlatformNotification),
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notifications not available on this platform")]
    NotAvailable,

    #[error("permission request failed: {message}")]
    RequestFailed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum NotificationOutput {
    Permission(NotificationPermission),
}

pub type NotificationResult = Result<NotificationOutput, NotificationError>;

impl Operation for NotificationOperation {
    type Output = NotificationResult;
}

/// Collapses a shell answer into a permission state. Failures read as
/// unsupported so the UI stops offering the button.
#[must_use]
pub fn permission_from(result: NotificationResult) -> NotificationPermission {
    match result {
        Ok(NotificationOutput::Permission(state)) => state,
        Err(NotificationError::NotAvailable) => NotificationPermission::Unsupported,
        Err(NotificationError::RequestFailed { .. }) => NotificationPermission::Default,
    }
}

#[derive(crux_core::macros::Capability)]
pub struct Notification<Ev> {
    context: CapabilityContext<NotificationOperation, Ev>,
}

impl<Ev> Notification<Ev> {
    pub fn new(context: CapabilityContext<NotificationOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Notification<Ev>
where
    Ev: Send + 'static,
{
    pub fn check_permission<F>(&self, make_event: F)
    where
        F: FnOnce(NotificationPermission) -> Ev + Send + 'static,
    {
        self.permission(NotificationOperation::CheckPermission, make_event);
    }

    pub fn request_permission<F>(&self, make_event: F)
    where
        F: FnOnce(NotificationPermission) -> Ev + Send + 'static,
    {
        self.permission(NotificationOperation::RequestPermission, make_event);
    }

    /// Fire-and-forget.
    pub fn show(&self, notification: PlatformNotification) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(NotificationOperation::Show(notification))
                .await;
        });
    }

    fn permission<F>(&self, operation: NotificationOperation, make_event: F)
    where
        F: FnOnce(NotificationPermission) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(permission_from(result)));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_checks() {
        assert!(NotificationPermission::Granted.is_granted());
        assert!(!NotificationPermission::Denied.is_granted());
        assert!(NotificationPermission::Default.needs_request());
        assert!(!NotificationPermission::Unsupported.needs_request());
        assert_eq!(NotificationPermission::default(), NotificationPermission::Default);
    }

    #[test]
    fn failures_collapse_to_a_state() {
        assert_eq!(
            permission_from(Ok(NotificationOutput::Permission(NotificationPermission::Denied))),
            NotificationPermission::Denied
        );
        assert_eq!(
            permission_from(Err(NotificationError::NotAvailable)),
            NotificationPermission::Unsupported
        );
        assert_eq!(
            permission_from(Err(NotificationError::RequestFailed {
                message: "dismissed".into()
            })),
            NotificationPermission::Default
        );
    }

    #[test]
    fn show_payload_is_camel_case() {
        let op = NotificationOperation::Show(PlatformNotification {
            title: "Kyoto - Aki".into(),
            body: "hi".into(),
            icon: "/favicon.ico".into(),
            tag: "chat-1".into(),
            auto_close_ms: 5000,
        });
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "Show");
        assert_eq!(json["data"]["autoCloseMs"], 5000);
    }
}
