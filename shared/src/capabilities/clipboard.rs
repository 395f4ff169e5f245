use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum ClipboardOperation {
    WriteText(String),
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,

    #[error("clipboard unavailable: {message}")]
    Unavailable { message: String },
}

pub type ClipboardResult = Result<(), ClipboardError>;

impl Operation for ClipboardOperation {
    type Output = ClipboardResult;
}

#[derive(crux_core::macros::Capability)]
pub struct Clipboard<Ev> {
    context: CapabilityContext<ClipboardOperation, Ev>,
}

impl<Ev> Clipboard<Ev> {
    pub fn new(context: CapabilityContext<ClipboardOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Clipboard<Ev>
where
    Ev: Send + 'static,
{
    pub fn write_text<F>(&self, text: impl Into<String>, make_event: F)
    where
        F: FnOnce(ClipboardResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let text = text.into();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(ClipboardOperation::WriteText(text))
                .await;
            ctx.update_app(make_event(result));
        });
    }
}
