use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file chosen in the shell's picker. The bytes stay in the shell; the
/// core refers to them by `handle`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickedFile {
    pub handle: String,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl PickedFile {
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum FilesOperation {
    PickImage,
    ReadDataUrl { handle: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilesError {
    #[error("{name} is not an image ({mime})")]
    NotAnImage { name: String, mime: String },

    #[error("could not read {handle}: {reason}")]
    ReadFailed { handle: String, reason: String },

    #[error("unexpected response from the file picker")]
    UnexpectedOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum FilesOutput {
    /// `None` when the picker was cancelled.
    Picked(Option<PickedFile>),
    DataUrl(String),
}

pub type FilesResult = Result<FilesOutput, FilesError>;

impl Operation for FilesOperation {
    type Output = FilesResult;
}

#[derive(crux_core::macros::Capability)]
pub struct Files<Ev> {
    context: CapabilityContext<FilesOperation, Ev>,
}

impl<Ev> Files<Ev> {
    pub fn new(context: CapabilityContext<FilesOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Files<Ev>
where
    Ev: Send + 'static,
{
    /// Opens an image picker. Non-image picks are turned into
    /// [`FilesError::NotAnImage`] here so the app never sees them.
    pub fn pick_image<F>(&self, make_event: F)
    where
        F: FnOnce(Result<Option<PickedFile>, FilesError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(FilesOperation::PickImage).await;
            ctx.update_app(make_event(picked_image(result)));
        });
    }

    pub fn read_data_url<F>(&self, handle: impl Into<String>, make_event: F)
    where
        F: FnOnce(Result<String, FilesError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let handle = handle.into();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(FilesOperation::ReadDataUrl { handle })
                .await
                .and_then(|output| match output {
                    FilesOutput::DataUrl(url) => Ok(url),
                    FilesOutput::Picked(_) => Err(FilesError::UnexpectedOutput),
                });
            ctx.update_app(make_event(result));
        });
    }
}

fn picked_image(result: FilesResult) -> Result<Option<PickedFile>, FilesError> {
    match result? {
        FilesOutput::Picked(Some(file)) if !file.is_image() => Err(FilesError::NotAnImage {
            name: file.name,
            mime: file.mime,
        }),
        FilesOutput::Picked(file) => Ok(file),
        FilesOutput::DataUrl(_) => Err(FilesError::UnexpectedOutput),
    }
}
