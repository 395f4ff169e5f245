use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum BrowserOperation {
    /// Opens `url` in a new tab or the platform's handler app.
    Open { url: String },
}

impl Operation for BrowserOperation {
    type Output = ();
}

#[derive(crux_core::macros::Capability)]
pub struct Browser<Ev> {
    context: CapabilityContext<BrowserOperation, Ev>,
}

impl<Ev> Browser<Ev> {
    pub fn new(context: CapabilityContext<BrowserOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Browser<Ev>
where
    Ev: Send + 'static,
{
    pub fn open(&self, url: impl Into<String>) {
        let ctx = self.context.clone();
        let url = url.into();
        self.context.spawn(async move {
            ctx.notify_shell(BrowserOperation::Open { url }).await;
        });
    }
}
