use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_TRIP_DAYS;
use crate::links::{map_url, Location};
use crate::model::{Schedule, ScheduleId, ScheduleInput, Trip, TripId, TripInput};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} is not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },
    #[error("trips can be at most {max} days long")]
    TooLong { max: usize },
}

fn required(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required { field })
    } else {
        Ok(())
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    required(field, value)?;
    value.trim().parse().map_err(|_| FormError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

// --- Trip form ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripFormEvent {
    NameChanged(String),
    StartDateChanged(String),
    EndDateChanged(String),
    ParticipantAdded,
    ParticipantChanged { index: usize, value: String },
    ParticipantRemoved { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDraft {
    /// `None` while creating a new trip.
    pub editing: Option<TripId>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub participants: Vec<String>,
}

impl TripDraft {
    #[must_use]
    pub fn blank() -> Self {
        Self {
            editing: None,
            name: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            participants: vec![String::new()],
        }
    }

    #[must_use]
    pub fn from_trip(trip: &Trip) -> Self {
        let participants = if trip.participants.is_empty() {
            vec![String::new()]
        } else {
            trip.participants.clone()
        };
        Self {
            editing: Some(trip.id),
            name: trip.name.clone(),
            start_date: trip.start_date.to_string(),
            end_date: trip.end_date.to_string(),
            participants,
        }
    }

    pub fn apply(&mut self, event: TripFormEvent) {
        match event {
            TripFormEvent::NameChanged(name) => self.name = name,
            TripFormEvent::StartDateChanged(date) => self.start_date = date,
            TripFormEvent::EndDateChanged(date) => self.end_date = date,
            TripFormEvent::ParticipantAdded => self.participants.push(String::new()),
            TripFormEvent::ParticipantChanged { index, value } => {
                if let Some(slot) = self.participants.get_mut(index) {
                    *slot = value;
                }
            }
            TripFormEvent::ParticipantRemoved { index } => {
                // The last row stays so there is always somewhere to type.
                if self.participants.len() > 1 && index < self.participants.len() {
                    self.participants.remove(index);
                }
            }
        }
    }

    #[must_use]
    pub fn can_remove_participants(&self) -> bool {
        self.participants.len() > 1
    }

    /// Produces the trip data, dropping blank participant rows.
    pub fn submit(&self) -> Result<TripInput, FormError> {
        required("name", &self.name)?;
        let start_date = parse_date("start date", &self.start_date)?;
        let end_date = parse_date("end date", &self.end_date)?;
        if (end_date - start_date).num_days() >= MAX_TRIP_DAYS as i64 {
            return Err(FormError::TooLong { max: MAX_TRIP_DAYS });
        }
        Ok(TripInput {
            name: self.name.clone(),
            start_date,
            end_date,
            participants: self
                .participants
                .iter()
                .filter(|p| !p.trim().is_empty())
                .cloned()
                .collect(),
        })
    }
}

// --- Schedule form ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleFormEvent {
    DatePicked(NaiveDate),
    TimeChanged(String),
    TitleChanged(String),
    LocationChanged(String),
    UrlChanged(String),
    MemoChanged(String),
    ParticipantToggled(String),
    /// Fills the link field with a map search for the location name.
    MapUrlGenerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub trip_id: TripId,
    pub editing: Option<ScheduleId>,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub memo: String,
    pub participants: Vec<String>,
}

impl ScheduleDraft {
    /// A new entry starts with the whole roster attending.
    #[must_use]
    pub fn blank(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id,
            editing: None,
            date: None,
            time: String::new(),
            title: String::new(),
            location: String::new(),
            url: String::new(),
            memo: String::new(),
            participants: trip.participants.clone(),
        }
    }

    #[must_use]
    pub fn from_schedule(trip_id: TripId, schedule: &Schedule) -> Self {
        Self {
            trip_id,
            editing: Some(schedule.id),
            date: Some(schedule.date),
            time: schedule.time.clone(),
            title: schedule.title.clone(),
            location: schedule.location.clone(),
            url: schedule.url.clone(),
            memo: schedule.memo.clone(),
            participants: schedule.participants.clone(),
        }
    }

    pub fn apply(&mut self, event: ScheduleFormEvent) {
        match event {
            ScheduleFormEvent::DatePicked(date) => self.date = Some(date),
            ScheduleFormEvent::TimeChanged(time) => self.time = time,
            ScheduleFormEvent::TitleChanged(title) => self.title = title,
            ScheduleFormEvent::LocationChanged(location) => self.location = location,
            ScheduleFormEvent::UrlChanged(url) => self.url = url,
            ScheduleFormEvent::MemoChanged(memo) => self.memo = memo,
            ScheduleFormEvent::ParticipantToggled(name) => {
                if let Some(index) = self.participants.iter().position(|p| *p == name) {
                    self.participants.remove(index);
                } else {
                    self.participants.push(name);
                }
            }
            ScheduleFormEvent::MapUrlGenerated => {
                if self.can_generate_map_url() {
                    if let Some(url) = map_url(&Location::named(self.location.clone())) {
                        self.url = url;
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn can_generate_map_url(&self) -> bool {
        !self.location.is_empty() && self.url.is_empty()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.date.is_some() && !self.title.trim().is_empty()
    }

    pub fn submit(&self) -> Result<ScheduleInput, FormError> {
        let date = self.date.ok_or(FormError::Required { field: "date" })?;
        required("title", &self.title)?;
        Ok(ScheduleInput {
            date,
            time: self.time.clone(),
            title: self.title.clone(),
            location: self.location.clone(),
            url: self.url.clone(),
            memo: self.memo.clone(),
            participants: self.participants.clone(),
        })
    }
}

// --- Trip calendar ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDay {
    pub date: NaiveDate,
    /// 1-based position in the trip.
    pub number: usize,
    /// `M/D`
    pub short_label: String,
    pub weekday: String,
}

/// Every day from start to end inclusive, at most [`MAX_TRIP_DAYS`] of them;
/// empty when the range is inverted.
#[must_use]
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> Vec<TripDay> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .take(MAX_TRIP_DAYS)
        .enumerate()
        .map(|(i, date)| TripDay {
            date,
            number: i + 1,
            short_label: format!("{}/{}", date.month(), date.day()),
            weekday: weekday_label(date.weekday()).to_string(),
        })
        .collect()
}

const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trip() -> Trip {
        Trip {
            id: TripId(1),
            name: "Hokkaido".into(),
            start_date: "2024-02-28".parse().unwrap(),
            end_date: "2024-03-01".parse().unwrap(),
            participants: vec!["Aki".into(), "Ben".into()],
            schedules: vec![],
            chat: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn trip_submit_drops_blank_participants() {
        let mut draft = TripDraft::blank();
        draft.apply(TripFormEvent::NameChanged("Sapporo".into()));
        draft.apply(TripFormEvent::StartDateChanged("2024-02-01".into()));
        draft.apply(TripFormEvent::EndDateChanged("2024-02-03".into()));
        draft.apply(TripFormEvent::ParticipantChanged {
            index: 0,
            value: "Aki".into(),
        });
        draft.apply(TripFormEvent::ParticipantAdded);
        draft.apply(TripFormEvent::ParticipantAdded);
        draft.apply(TripFormEvent::ParticipantChanged {
            index: 2,
            value: "  ".into(),
        });

        let input = draft.submit().unwrap();
        assert_eq!(input.participants, vec!["Aki".to_string()]);
        assert_eq!(input.start_date.to_string(), "2024-02-01");
    }

    #[test]
    fn trip_submit_requires_name_and_dates() {
        let mut draft = TripDraft::blank();
        assert_eq!(draft.submit(), Err(FormError::Required { field: "name" }));
        draft.apply(TripFormEvent::NameChanged("x".into()));
        draft.apply(TripFormEvent::StartDateChanged("2024-13-40".into()));
        assert!(matches!(draft.submit(), Err(FormError::InvalidDate { .. })));
    }

    #[test]
    fn trips_longer_than_a_year_are_refused() {
        let mut draft = TripDraft::blank();
        draft.apply(TripFormEvent::NameChanged("Forever".into()));
        draft.apply(TripFormEvent::StartDateChanged("0001-01-01".into()));
        draft.apply(TripFormEvent::EndDateChanged("9999-12-31".into()));
        assert_eq!(draft.submit(), Err(FormError::TooLong { max: MAX_TRIP_DAYS }));

        draft.apply(TripFormEvent::EndDateChanged("0001-12-31".into()));
        assert!(draft.submit().is_ok());
    }

    #[test]
    fn stored_long_ranges_are_cut_off() {
        let days = trip_days(
            "0001-01-01".parse().unwrap(),
            "9999-12-31".parse().unwrap(),
        );
        assert_eq!(days.len(), MAX_TRIP_DAYS);
        assert_eq!(days.last().unwrap().number, MAX_TRIP_DAYS);
    }

    #[test]
    fn last_participant_row_cannot_be_removed() {
        let mut draft = TripDraft::blank();
        draft.apply(TripFormEvent::ParticipantRemoved { index: 0 });
        assert_eq!(draft.participants.len(), 1);
        assert!(!draft.can_remove_participants());
    }

    #[test]
    fn edit_draft_is_seeded_from_trip() {
        let draft = TripDraft::from_trip(&trip());
        assert_eq!(draft.editing, Some(TripId(1)));
        assert_eq!(draft.start_date, "2024-02-28");
        assert_eq!(draft.participants.len(), 2);
    }

    #[test]
    fn new_schedule_preselects_whole_roster() {
        let mut draft = ScheduleDraft::blank(&trip());
        assert_eq!(draft.participants, vec!["Aki".to_string(), "Ben".to_string()]);
        draft.apply(ScheduleFormEvent::ParticipantToggled("Aki".into()));
        assert_eq!(draft.participants, vec!["Ben".to_string()]);
        draft.apply(ScheduleFormEvent::ParticipantToggled("Aki".into()));
        assert_eq!(draft.participants, vec!["Ben".to_string(), "Aki".to_string()]);
    }

    #[test]
    fn schedule_submit_needs_date_and_title() {
        let mut draft = ScheduleDraft::blank(&trip());
        draft.apply(ScheduleFormEvent::TitleChanged("Zoo".into()));
        assert!(!draft.can_submit());
        assert_eq!(draft.submit(), Err(FormError::Required { field: "date" }));
        draft.apply(ScheduleFormEvent::DatePicked("2024-02-29".parse().unwrap()));
        assert!(draft.can_submit());
        assert_eq!(draft.submit().unwrap().title, "Zoo");
    }

    #[test]
    fn map_url_generated_only_when_link_empty() {
        let mut draft = ScheduleDraft::blank(&trip());
        draft.apply(ScheduleFormEvent::MapUrlGenerated);
        assert!(draft.url.is_empty());

        draft.apply(ScheduleFormEvent::LocationChanged("Asahiyama Zoo".into()));
        draft.apply(ScheduleFormEvent::MapUrlGenerated);
        assert_eq!(
            draft.url,
            "https://www.google.com/maps/search/?api=1&query=Asahiyama%20Zoo"
        );

        draft.apply(ScheduleFormEvent::LocationChanged("Elsewhere".into()));
        draft.apply(ScheduleFormEvent::MapUrlGenerated);
        assert!(draft.url.ends_with("Asahiyama%20Zoo"));
    }

    #[test]
    fn trip_days_cross_leap_day() {
        let t = trip();
        let days = trip_days(t.start_date, t.end_date);
        let labels: Vec<&str> = days.iter().map(|d| d.short_label.as_str()).collect();
        assert_eq!(labels, vec!["2/28", "2/29", "3/1"]);
        assert_eq!(days[1].number, 2);
        assert_eq!(days[1].weekday, "Thu");
    }

    #[test]
    fn inverted_range_has_no_days() {
        let t = trip();
        assert!(trip_days(t.end_date, t.start_date).is_empty());
    }
}
