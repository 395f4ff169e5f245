use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Message, MessageId, Schedule, ScheduleId, ScheduleInput, Trip, TripId, TripInput,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("schedule {schedule} not found in trip {trip}")]
    ScheduleNotFound { trip: TripId, schedule: ScheduleId },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("stored trips could not be decoded: {0}")]
    Corrupted(String),
}

/// The whole trip list. Schedules and chat live inside each [`Trip`], so
/// removing a trip removes everything it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripStore {
    trips: Vec<Trip>,
    #[serde(skip)]
    last_id: i64,
}

impl TripStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_trips(trips: Vec<Trip>) -> Self {
        let mut store = Self { trips, last_id: 0 };
        store.last_id = store.max_known_id();
        store
    }

    /// Decodes the persisted JSON array. An absent value is an empty list.
    pub fn from_json(raw: Option<&[u8]>) -> Result<Self, StoreError> {
        match raw {
            None => Ok(Self::new()),
            Some(bytes) => serde_json::from_slice::<Vec<Trip>>(bytes)
                .map(Self::from_trips)
                .map_err(|e| StoreError::Corrupted(e.to_string())),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(&self.trips).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    #[must_use]
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    #[must_use]
    pub fn trip(&self, id: TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    fn trip_mut(&mut self, id: TripId) -> Result<&mut Trip, StoreError> {
        self.trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TripNotFound(id))
    }

    /// Millisecond clock ids, bumped past the last issued id so two entities
    /// created within the same millisecond stay distinct.
    pub fn next_id(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    pub fn create_trip(&mut self, input: TripInput, now_ms: i64) -> TripId {
        let id = TripId(self.next_id(now_ms));
        self.trips.push(Trip {
            id,
            name: input.name,
            start_date: input.start_date,
            end_date: input.end_date,
            participants: input.participants,
            schedules: Vec::new(),
            chat: Vec::new(),
            created_at: timestamp(now_ms),
        });
        id
    }

    /// Replaces the editable fields; nested schedules and chat are kept.
    pub fn update_trip(&mut self, id: TripId, input: TripInput) -> Result<(), StoreError> {
        let trip = self.trip_mut(id)?;
        trip.name = input.name;
        trip.start_date = input.start_date;
        trip.end_date = input.end_date;
        trip.participants = input.participants;
        Ok(())
    }

    pub fn delete_trip(&mut self, id: TripId) -> Option<Trip> {
        let index = self.trips.iter().position(|t| t.id == id)?;
        Some(self.trips.remove(index))
    }

    pub fn add_schedule(
        &mut self,
        trip_id: TripId,
        input: ScheduleInput,
        now_ms: i64,
    ) -> Result<ScheduleId, StoreError> {
        // Fail before consuming an id.
        self.trip_mut(trip_id)?;
        let id = ScheduleId(self.next_id(now_ms));
        let trip = self.trip_mut(trip_id)?;
        trip.schedules.push(Schedule {
            id,
            date: input.date,
            time: input.time,
            title: input.title,
            location: input.location,
            url: input.url,
            memo: input.memo,
            participants: input.participants,
            created_at: timestamp(now_ms),
        });
        Ok(id)
    }

    pub fn update_schedule(
        &mut self,
        trip_id: TripId,
        schedule_id: ScheduleId,
        input: ScheduleInput,
    ) -> Result<(), StoreError> {
        let trip = self.trip_mut(trip_id)?;
        let schedule = trip
            .schedules
            .iter_mut()
            .find(|s| s.id == schedule_id)
            .ok_or(StoreError::ScheduleNotFound {
                trip: trip_id,
                schedule: schedule_id,
            })?;
        schedule.date = input.date;
        schedule.time = input.time;
        schedule.title = input.title;
        schedule.location = input.location;
        schedule.url = input.url;
        schedule.memo = input.memo;
        schedule.participants = input.participants;
        Ok(())
    }

    pub fn delete_schedule(
        &mut self,
        trip_id: TripId,
        schedule_id: ScheduleId,
    ) -> Result<Schedule, StoreError> {
        let trip = self.trip_mut(trip_id)?;
        let index = trip
            .schedules
            .iter()
            .position(|s| s.id == schedule_id)
            .ok_or(StoreError::ScheduleNotFound {
                trip: trip_id,
                schedule: schedule_id,
            })?;
        Ok(trip.schedules.remove(index))
    }

    pub fn append_message(&mut self, trip_id: TripId, message: Message) -> Result<(), StoreError> {
        self.trip_mut(trip_id)?.chat.push(message);
        Ok(())
    }

    /// Reserves an id for a message about to be built.
    pub fn next_message_id(&mut self, now_ms: i64) -> MessageId {
        MessageId(self.next_id(now_ms))
    }

    fn max_known_id(&self) -> i64 {
        self.trips
            .iter()
            .flat_map(|t| {
                std::iter::once(t.id.0)
                    .chain(t.schedules.iter().map(|s| s.id.0))
                    .chain(t.chat.iter().map(|m| m.id.0))
            })
            .max()
            .unwrap_or(0)
    }
}

#[must_use]
pub fn timestamp(now_ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(now_ms)
        .single()
        .unwrap_or_default()
}
