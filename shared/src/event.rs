use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::capabilities::{
    ClipboardResult, FilesError, NotificationPermission, PickedFile, StorageResult,
};
use crate::config::PlannerConfig;
use crate::forms::{ScheduleFormEvent, TripFormEvent};
use crate::model::{BannerId, ScheduleId, TripId};

/// What the shell knows when it boots the core.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StartupContext {
    /// Full page URL, used for the share parameter and share links.
    pub page_url: Option<String>,
    #[serde(default)]
    pub config: Option<PlannerConfig>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyKind {
    ShareLink,
    MapUrl,
}

impl CopyKind {
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::ShareLink => "Share link copied to the clipboard",
            Self::MapUrl => "Google Maps URL copied",
        }
    }
}

// --- Event enum: capability responses are internal and boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Started(Box<StartupContext>),
    DismissError,

    // Navigation
    TripSelected { trip_id: TripId },
    BackToList,
    OpenChat,
    CloseChat,
    ScheduleToggled { schedule_id: ScheduleId },

    // Trip form
    NewTripRequested,
    EditTripRequested { trip_id: TripId },
    TripForm(TripFormEvent),
    TripFormSubmitted,
    TripFormCancelled,

    // Schedule form
    NewScheduleRequested,
    EditScheduleRequested { schedule_id: ScheduleId },
    ScheduleForm(ScheduleFormEvent),
    SearchLocationRequested,
    ScheduleFormSubmitted,
    ScheduleFormCancelled,

    // Deletion
    DeleteTripRequested { trip_id: TripId },
    DeleteScheduleRequested { schedule_id: ScheduleId },
    DeleteConfirmed,
    DeleteCancelled,

    // Chat
    ChatTextChanged(String),
    AttachmentMenuToggled,
    AttachImageRequested,
    AttachLinkRequested,
    AttachmentRemoved,
    SendMessage,
    OpenLink { url: String },

    // Notifications
    NotificationPermissionRequested,
    BannerClicked { banner_id: BannerId },

    // Sharing & maps
    ShareRequested,
    ShareClosed,
    OpenMapRequested { schedule_id: ScheduleId },
    DirectionsRequested { schedule_id: ScheduleId },
    CopyMapUrlRequested { schedule_id: ScheduleId },
    DayRouteRequested { date: NaiveDate },

    // Capability responses
    #[serde(skip)]
    TripsLoaded {
        result: Box<StorageResult>,
        share: Option<TripId>,
    },
    #[serde(skip)]
    TripsPersisted(Box<StorageResult>),
    #[serde(skip)]
    PermissionUpdated(NotificationPermission),
    #[serde(skip)]
    BannerExpired { banner_id: BannerId },
    #[serde(skip)]
    ImagePicked(Box<Result<Option<PickedFile>, FilesError>>),
    #[serde(skip)]
    ImageDataRead(Box<Result<String, FilesError>>),
    #[serde(skip)]
    LinkUrlEntered(Option<String>),
    #[serde(skip)]
    LinkTitleEntered(Option<String>),
    #[serde(skip)]
    SenderNameEntered(Option<String>),
    #[serde(skip)]
    Copied {
        kind: CopyKind,
        result: ClipboardResult,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started(_) => "started",
            Self::DismissError => "dismiss_error",
            Self::TripSelected { .. } => "trip_selected",
            Self::BackToList => "back_to_list",
            Self::OpenChat => "open_chat",
            Self::CloseChat => "close_chat",
            Self::ScheduleToggled { .. } => "schedule_toggled",
            Self::NewTripRequested => "new_trip_requested",
            Self::EditTripRequested { .. } => "edit_trip_requested",
            Self::TripForm(_) => "trip_form",
            Self::TripFormSubmitted => "trip_form_submitted",
            Self::TripFormCancelled => "trip_form_cancelled",
            Self::NewScheduleRequested => "new_schedule_requested",
            Self::EditScheduleRequested { .. } => "edit_schedule_requested",
            Self::ScheduleForm(_) => "schedule_form",
            Self::SearchLocationRequested => "search_location_requested",
            Self::ScheduleFormSubmitted => "schedule_form_submitted",
            Self::ScheduleFormCancelled => "schedule_form_cancelled",
            Self::DeleteTripRequested { .. } => "delete_trip_requested",
            Self::DeleteScheduleRequested { .. } => "delete_schedule_requested",
            Self::DeleteConfirmed => "delete_confirmed",
            Self::DeleteCancelled => "delete_cancelled",
            Self::ChatTextChanged(_) => "chat_text_changed",
            Self::AttachmentMenuToggled => "attachment_menu_toggled",
            Self::AttachImageRequested => "attach_image_requested",
            Self::AttachLinkRequested => "attach_link_requested",
            Self::AttachmentRemoved => "attachment_removed",
            Self::SendMessage => "send_message",
            Self::OpenLink { .. } => "open_link",
            Self::NotificationPermissionRequested => "notification_permission_requested",
            Self::BannerClicked { .. } => "banner_clicked",
            Self::ShareRequested => "share_requested",
            Self::ShareClosed => "share_closed",
            Self::OpenMapRequested { .. } => "open_map_requested",
            Self::DirectionsRequested { .. } => "directions_requested",
            Self::CopyMapUrlRequested { .. } => "copy_map_url_requested",
            Self::DayRouteRequested { .. } => "day_route_requested",
            Self::TripsLoaded { .. } => "trips_loaded",
            Self::TripsPersisted(_) => "trips_persisted",
            Self::PermissionUpdated(_) => "permission_updated",
            Self::BannerExpired { .. } => "banner_expired",
            Self::ImagePicked(_) => "image_picked",
            Self::ImageDataRead(_) => "image_data_read",
            Self::LinkUrlEntered(_) => "link_url_entered",
            Self::LinkTitleEntered(_) => "link_title_entered",
            Self::SenderNameEntered(_) => "sender_name_entered",
            Self::Copied { .. } => "copied",
        }
    }

    /// Events that read or rewrite the stored trip list. They wait for the
    /// startup load so an early write can't overwrite the stored list.
    #[must_use]
    pub const fn needs_loaded_trips(&self) -> bool {
        self.edits_itinerary()
            || matches!(
                self,
                Self::TripForm(_)
                    | Self::ScheduleForm(_)
                    | Self::SendMessage
                    | Self::OpenChat
            )
    }

    /// Events that would change trips or schedules. These are refused in
    /// the shared, read-only view.
    #[must_use]
    pub const fn edits_itinerary(&self) -> bool {
        matches!(
            self,
            Self::BackToList
                | Self::TripSelected { .. }
                | Self::NewTripRequested
                | Self::EditTripRequested { .. }
                | Self::TripFormSubmitted
                | Self::NewScheduleRequested
                | Self::EditScheduleRequested { .. }
                | Self::ScheduleFormSubmitted
                | Self::DeleteTripRequested { .. }
                | Self::DeleteScheduleRequested { .. }
                | Self::DeleteConfirmed
                | Self::ShareRequested
        )
    }
}
