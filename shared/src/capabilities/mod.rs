mod browser;
mod clipboard;
mod dialog;
mod files;
mod notification;
mod storage;
mod timer;

pub use self::browser::{Browser, BrowserOperation};
pub use self::clipboard::{Clipboard, ClipboardError, ClipboardOperation, ClipboardResult};
pub use self::dialog::{Dialog, DialogOperation, DialogResponse};
pub use self::files::{Files, FilesError, FilesOperation, FilesOutput, FilesResult, PickedFile};
pub use self::notification::{
    Notification, NotificationError, NotificationOperation, NotificationOutput,
    NotificationPermission, NotificationResult, PlatformNotification,
};
pub use self::storage::{Storage, StorageError, StorageOperation, StorageOutput, StorageResult};
pub use self::timer::{Timer, TimerOperation};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

/// Field names mirror the capability type names; the derived `Effect`
/// variants take the same names.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub storage: Storage<Event>,
    pub notification: Notification<Event>,
    pub clipboard: Clipboard<Event>,
    pub files: Files<Event>,
    pub dialog: Dialog<Event>,
    pub browser: Browser<Event>,
    pub timer: Timer<Event>,
}

impl Capabilities {
    pub fn render(&self) -> &Render<Event> {
        &self.render
    }

    pub fn storage(&self) -> &Storage<Event> {
        &self.storage
    }

    pub fn notification(&self) -> &Notification<Event> {
        &self.notification
    }

    pub fn clipboard(&self) -> &Clipboard<Event> {
        &self.clipboard
    }

    pub fn files(&self) -> &Files<Event> {
        &self.files
    }

    pub fn dialog(&self) -> &Dialog<Event> {
        &self.dialog
    }

    pub fn browser(&self) -> &Browser<Event> {
        &self.browser
    }

    pub fn timer(&self) -> &Timer<Event> {
        &self.timer
    }
}
