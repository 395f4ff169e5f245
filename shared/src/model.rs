use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::capabilities::NotificationPermission;
use crate::chat::{ChatComposer, OutgoingMessage};
use crate::config::PlannerConfig;
use crate::error::AppError;
use crate::forms::{ScheduleDraft, TripDraft};
use crate::notifications::Banners;
use crate::store::TripStore;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(
            Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

typed_id!(TripId);
typed_id!(ScheduleId);
typed_id!(MessageId);
typed_id!(BannerId);

// --- Persisted entities ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub chat: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    #[must_use]
    pub fn schedule(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Schedules on `date`, ordered by start time; untimed entries sort as midnight.
    #[must_use]
    pub fn schedules_on(&self, date: NaiveDate) -> Vec<&Schedule> {
        let mut day: Vec<&Schedule> = self.schedules.iter().filter(|s| s.date == date).collect();
        day.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        day
    }

    #[must_use]
    pub fn color_of(&self, participant: &str) -> Option<ParticipantColor> {
        ParticipantColor::for_participant(participant, &self.participants)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    #[must_use]
    pub fn sort_key(&self) -> &str {
        if self.time.is_empty() {
            "00:00"
        } else {
            &self.time
        }
    }

    /// Attendance measured against the trip's *current* roster. Names that
    /// were dropped from the roster after the schedule was saved are ignored.
    #[must_use]
    pub fn participation(&self, roster: &[String]) -> Participation {
        let attending: Vec<String> = roster
            .iter()
            .filter(|p| self.participants.contains(p))
            .cloned()
            .collect();
        let summary = if attending.len() == roster.len() {
            ParticipationSummary::Everyone
        } else if attending.is_empty() {
            ParticipationSummary::Nobody
        } else {
            ParticipationSummary::Some
        };
        Participation {
            attending,
            roster_size: roster.len(),
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub attending: Vec<String>,
    pub roster_size: usize,
    pub summary: ParticipationSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationSummary {
    Everyone,
    Some,
    Nobody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub text: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Image { data: String, name: String, size: u64 },
    Url { url: String, title: String },
}

impl Attachment {
    #[must_use]
    pub const fn notification_label(&self) -> &'static str {
        match self {
            Self::Image { .. } => "📷 Sent a photo",
            Self::Url { .. } => "🔗 Sent a link",
        }
    }
}

// --- Inputs produced by the forms ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub date: NaiveDate,
    pub time: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub memo: String,
    pub participants: Vec<String>,
}

// --- Participant colours ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantColor {
    Blue,
    Green,
    Purple,
    Pink,
    Yellow,
    Indigo,
    Red,
    Orange,
    /// Used for roster members who are not attending.
    Gray,
}

impl ParticipantColor {
    pub const PALETTE: [Self; 8] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Pink,
        Self::Yellow,
        Self::Indigo,
        Self::Red,
        Self::Orange,
    ];

    #[must_use]
    pub fn for_participant(participant: &str, roster: &[String]) -> Option<Self> {
        roster
            .iter()
            .position(|p| p == participant)
            .map(|index| Self::PALETTE[index % Self::PALETTE.len()])
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Yellow => "yellow",
            Self::Indigo => "indigo",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Gray => "gray",
        }
    }
}

// --- Navigation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    TripList,
    Schedule,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteTarget {
    Trip(TripId),
    Schedule(ScheduleId),
}

impl DeleteTarget {
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::Trip(_) => {
                "Delete this trip? All of its schedules and chat messages will be deleted too."
            }
            Self::Schedule(_) => "Delete this schedule?",
        }
    }
}

// --- Application state ---

#[derive(Debug, Default)]
pub struct Model {
    pub config: PlannerConfig,
    pub store: TripStore,
    pub loaded: bool,

    pub screen: Screen,
    pub selected_trip: Option<TripId>,
    /// Set when the page was opened through a share link; the app is read-only.
    pub shared_trip: Option<TripId>,
    /// Page URL without its query string, used to build share links.
    pub base_url: Option<String>,

    pub user_name: Option<String>,
    pub banners: Banners,
    pub permission: NotificationPermission,
    pub unread: HashMap<TripId, u32>,

    pub trip_form: Option<TripDraft>,
    pub schedule_form: Option<ScheduleDraft>,
    pub pending_delete: Option<DeleteTarget>,
    pub expanded_schedule: Option<ScheduleId>,

    pub composer: ChatComposer,
    pub outgoing: Option<OutgoingMessage>,

    pub share_url: Option<String>,
    pub active_error: Option<AppError>,
}

impl Model {
    #[must_use]
    pub fn is_shared_view(&self) -> bool {
        self.shared_trip.is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Trip> {
        self.selected_trip.and_then(|id| self.store.trip(id))
    }

    #[must_use]
    pub fn unread_for(&self, trip_id: TripId) -> u32 {
        self.unread.get(&trip_id).copied().unwrap_or(0)
    }

    pub fn reset_unread(&mut self, trip_id: TripId) {
        self.unread.insert(trip_id, 0);
    }

    pub fn bump_unread(&mut self, trip_id: TripId) {
        *self.unread.entry(trip_id).or_insert(0) += 1;
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    /// Leaves the trip-specific screens if `trip_id` is the one on display.
    pub fn forget_trip(&mut self, trip_id: TripId) {
        self.unread.remove(&trip_id);
        if self.selected_trip == Some(trip_id) {
            self.selected_trip = None;
            self.screen = Screen::TripList;
            self.expanded_schedule = None;
        }
    }
}
