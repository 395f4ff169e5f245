use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Blocking browser-style dialogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum DialogOperation {
    Alert { message: String },
    Prompt { message: String, default: String },
}

/// The text entered into a prompt; `None` when it was cancelled. Alerts
/// never resolve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogResponse(pub Option<String>);

impl Operation for DialogOperation {
    type Output = DialogResponse;
}

#[derive(crux_core::macros::Capability)]
pub struct Dialog<Ev> {
    context: CapabilityContext<DialogOperation, Ev>,
}

impl<Ev> Dialog<Ev> {
    pub fn new(context: CapabilityContext<DialogOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Dialog<Ev>
where
    Ev: Send + 'static,
{
    pub fn alert(&self, message: impl Into<String>) {
        let ctx = self.context.clone();
        let message = message.into();
        self.context.spawn(async move {
            ctx.notify_shell(DialogOperation::Alert { message }).await;
        });
    }

    pub fn prompt<F>(&self, message: impl Into<String>, default: impl Into<String>, make_event: F)
    where
        F: FnOnce(Option<String>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let operation = DialogOperation::Prompt {
            message: message.into(),
            default: default.into(),
        };
        self.context.spawn(async move {
            let DialogResponse(entered) = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(entered));
        });
    }
}
