//! Read-only projection of the model for the shells.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ChatComposer;
use crate::forms::{trip_days, ScheduleDraft, TripDay, TripDraft};
use crate::links::{day_route_url, extract_location, is_map_url, Location};
use crate::model::{
    Attachment, BannerId, MessageId, Model, ParticipantColor, ParticipationSummary, Schedule,
    ScheduleId, Screen, Trip, TripId,
};

/// Participants previewed on a trip card before the "+N" overflow.
pub const CARD_PREVIEW_PARTICIPANTS: usize = 4;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
    pub screen: Screen,
    pub loading: bool,
    pub shared_view: bool,
    pub trips: Vec<TripCard>,
    pub schedule: Option<ScheduleScreen>,
    pub chat: Option<ChatScreen>,
    pub trip_form: Option<TripFormView>,
    pub schedule_form: Option<ScheduleFormView>,
    pub delete_prompt: Option<String>,
    pub banners: Vec<BannerView>,
    pub show_permission_button: bool,
    pub share_url: Option<String>,
    pub error: Option<ErrorView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ParticipantChip {
    pub name: String,
    pub color: ParticipantColor,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TripCard {
    pub id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participant_count: usize,
    pub schedule_count: usize,
    pub message_count: usize,
    pub preview: Vec<ParticipantChip>,
    pub more_participants: usize,
    pub unread: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScheduleScreen {
    pub trip_id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub unread: u32,
    pub can_edit: bool,
    pub days: Vec<DayView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DayView {
    pub day: TripDay,
    pub schedules: Vec<ScheduleCard>,
    /// More than one entry of the day links to a map.
    pub route_available: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScheduleCard {
    pub id: ScheduleId,
    pub time: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub memo: String,
    pub map_link: bool,
    pub map_location: Option<Location>,
    pub attending: usize,
    pub roster_size: usize,
    /// Whole roster; absent participants are gray.
    pub chips: Vec<ParticipantChip>,
    pub summary: ParticipationSummary,
    pub expanded: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatScreen {
    pub trip_id: TripId,
    pub trip_name: String,
    pub messages: Vec<MessageView>,
    pub composer: ComposerView,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageView {
    pub id: MessageId,
    pub sender: String,
    pub sender_color: Option<ParticipantColor>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub attachment: Option<Attachment>,
    pub urls: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ComposerView {
    pub text: String,
    pub attachment_preview: Option<String>,
    pub menu_open: bool,
    pub can_send: bool,
    pub sending: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TripFormView {
    pub editing: bool,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub participants: Vec<String>,
    pub can_remove_participants: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScheduleFormView {
    pub editing: bool,
    pub days: Vec<TripDay>,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub memo: String,
    pub participants: Vec<ParticipantToggle>,
    pub can_generate_map_url: bool,
    pub can_search_location: bool,
    pub can_submit: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ParticipantToggle {
    pub name: String,
    pub color: ParticipantColor,
    pub selected: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BannerView {
    pub id: BannerId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorView {
    pub code: String,
    pub message: String,
}

/// Where a schedule points on a map: the link's own location, else the
/// typed location name.
#[must_use]
pub fn schedule_location(schedule: &Schedule) -> Option<Location> {
    extract_location(&schedule.url).or_else(|| {
        (!schedule.location.is_empty()).then(|| Location::named(schedule.location.clone()))
    })
}

/// Stops of a day's route, in schedule order. Only entries with a map link
/// count.
#[must_use]
pub fn route_stops(trip: &Trip, date: NaiveDate) -> Vec<Location> {
    trip.schedules_on(date)
        .into_iter()
        .filter(|s| is_map_url(&s.url))
        .map(|s| extract_location(&s.url).unwrap_or_else(|| Location::named(s.location.clone())))
        .collect()
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let selected = model.selected();
    let can_edit = !model.is_shared_view();

    ViewModel {
        screen: model.screen,
        loading: !model.loaded,
        shared_view: model.is_shared_view(),
        trips: if model.is_shared_view() {
            Vec::new()
        } else {
            model
                .store
                .trips()
                .iter()
                .map(|t| trip_card(t, model.unread_for(t.id)))
                .collect()
        },
        schedule: match (model.screen, selected) {
            (Screen::Schedule, Some(trip)) => Some(schedule_screen(model, trip, can_edit)),
            _ => None,
        },
        chat: match (model.screen, selected) {
            (Screen::Chat, Some(trip)) => Some(chat_screen(model, trip)),
            _ => None,
        },
        trip_form: model
            .trip_form
            .as_ref()
            .filter(|_| can_edit)
            .map(trip_form_view),
        schedule_form: model
            .schedule_form
            .as_ref()
            .filter(|_| can_edit)
            .and_then(|draft| {
                model
                    .store
                    .trip(draft.trip_id)
                    .map(|trip| schedule_form_view(draft, trip))
            }),
        delete_prompt: model
            .pending_delete
            .filter(|_| can_edit)
            .map(|target| target.confirmation().to_string()),
        banners: model
            .banners
            .visible(model.config.max_visible_banners)
            .map(|b| BannerView {
                id: b.id,
                message: b.message.clone(),
                timestamp: b.timestamp,
            })
            .collect(),
        show_permission_button: model.permission.needs_request(),
        share_url: model.share_url.clone(),
        error: model.active_error.as_ref().map(|e| ErrorView {
            code: e.code().to_string(),
            message: e.user_facing_message(),
        }),
    }
}

fn chips(trip: &Trip, names: &[String]) -> Vec<ParticipantChip> {
    names
        .iter()
        .map(|name| ParticipantChip {
            name: name.clone(),
            color: trip.color_of(name).unwrap_or(ParticipantColor::Gray),
        })
        .collect()
}

fn trip_card(trip: &Trip, unread: u32) -> TripCard {
    let shown = trip.participants.len().min(CARD_PREVIEW_PARTICIPANTS);
    TripCard {
        id: trip.id,
        name: trip.name.clone(),
        start_date: trip.start_date,
        end_date: trip.end_date,
        participant_count: trip.participants.len(),
        schedule_count: trip.schedules.len(),
        message_count: trip.chat.len(),
        preview: chips(trip, &trip.participants[..shown]),
        more_participants: trip.participants.len() - shown,
        unread,
    }
}

fn schedule_screen(model: &Model, trip: &Trip, can_edit: bool) -> ScheduleScreen {
    let days = trip_days(trip.start_date, trip.end_date)
        .into_iter()
        .map(|day| {
            let schedules: Vec<ScheduleCard> = trip
                .schedules_on(day.date)
                .into_iter()
                .map(|s| schedule_card(trip, s, model.expanded_schedule == Some(s.id)))
                .collect();
            let route_available = day_route_url(&route_stops(trip, day.date)).is_some();
            DayView {
                day,
                schedules,
                route_available,
            }
        })
        .collect();

    ScheduleScreen {
        trip_id: trip.id,
        name: trip.name.clone(),
        start_date: trip.start_date,
        end_date: trip.end_date,
        unread: model.unread_for(trip.id),
        can_edit,
        days,
    }
}

fn schedule_card(trip: &Trip, schedule: &Schedule, expanded: bool) -> ScheduleCard {
    let participation = schedule.participation(&trip.participants);
    let chips = trip
        .participants
        .iter()
        .map(|name| ParticipantChip {
            name: name.clone(),
            color: if participation.attending.contains(name) {
                trip.color_of(name).unwrap_or(ParticipantColor::Gray)
            } else {
                ParticipantColor::Gray
            },
        })
        .collect();

    ScheduleCard {
        id: schedule.id,
        time: schedule.time.clone(),
        title: schedule.title.clone(),
        location: schedule.location.clone(),
        url: schedule.url.clone(),
        memo: schedule.memo.clone(),
        map_link: is_map_url(&schedule.url),
        map_location: schedule_location(schedule),
        attending: participation.attending.len(),
        roster_size: participation.roster_size,
        chips,
        summary: participation.summary,
        expanded,
    }
}

fn chat_screen(model: &Model, trip: &Trip) -> ChatScreen {
    ChatScreen {
        trip_id: trip.id,
        trip_name: trip.name.clone(),
        messages: trip
            .chat
            .iter()
            .map(|m| MessageView {
                id: m.id,
                sender: m.sender.clone(),
                sender_color: trip.color_of(&m.sender),
                text: m.text.clone(),
                timestamp: m.timestamp,
                attachment: m.attachment.clone(),
                urls: m.urls.clone(),
            })
            .collect(),
        composer: composer_view(&model.composer, model.outgoing.is_some()),
    }
}

fn composer_view(composer: &ChatComposer, sending: bool) -> ComposerView {
    ComposerView {
        text: composer.text.clone(),
        attachment_preview: composer.attachment.as_ref().map(|a| a.preview()),
        menu_open: composer.menu_open,
        can_send: composer.can_send() && !sending,
        sending,
    }
}

fn trip_form_view(draft: &TripDraft) -> TripFormView {
    TripFormView {
        editing: draft.editing.is_some(),
        name: draft.name.clone(),
        start_date: draft.start_date.clone(),
        end_date: draft.end_date.clone(),
        participants: draft.participants.clone(),
        can_remove_participants: draft.can_remove_participants(),
    }
}

fn schedule_form_view(draft: &ScheduleDraft, trip: &Trip) -> ScheduleFormView {
    ScheduleFormView {
        editing: draft.editing.is_some(),
        days: trip_days(trip.start_date, trip.end_date),
        date: draft.date,
        time: draft.time.clone(),
        title: draft.title.clone(),
        location: draft.location.clone(),
        url: draft.url.clone(),
        memo: draft.memo.clone(),
        participants: trip
            .participants
            .iter()
            .map(|name| ParticipantToggle {
                name: name.clone(),
                color: trip.color_of(name).unwrap_or(ParticipantColor::Gray),
                selected: draft.participants.contains(name),
            })
            .collect(),
        can_generate_map_url: draft.can_generate_map_url(),
        can_search_location: !draft.location.is_empty(),
        can_submit: draft.can_submit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScheduleInput, TripInput};

    fn model_with_trip() -> (Model, TripId) {
        let mut model = Model {
            loaded: true,
            ..Model::default()
        };
        let trip_id = model.store.create_trip(
            TripInput {
                name: "Kyushu".into(),
                start_date: "2024-03-01".parse().unwrap(),
                end_date: "2024-03-02".parse().unwrap(),
                participants: ["Aki", "Ben", "Chie", "Dai", "Emi"]
                    .iter()
                    .map(|p| (*p).to_string())
                    .collect(),
            },
            1,
        );
        (model, trip_id)
    }

    fn add(model: &mut Model, trip_id: TripId, time: &str, url: &str, who: &[&str]) -> ScheduleId {
        model
            .store
            .add_schedule(
                trip_id,
                ScheduleInput {
                    date: "2024-03-01".parse().unwrap(),
                    time: time.into(),
                    title: format!("at {time}"),
                    location: "Somewhere".into(),
                    url: url.into(),
                    memo: String::new(),
                    participants: who.iter().map(|p| (*p).to_string()).collect(),
                },
                2,
            )
            .unwrap()
    }

    #[test]
    fn trip_cards_preview_four_participants() {
        let (model, _) = model_with_trip();
        let vm = build(&model);
        assert_eq!(vm.trips.len(), 1);
        assert_eq!(vm.trips[0].preview.len(), 4);
        assert_eq!(vm.trips[0].more_participants, 1);
        assert_eq!(vm.trips[0].preview[1].color, ParticipantColor::Green);
    }

    #[test]
    fn schedule_chips_gray_out_absentees() {
        let (mut model, trip_id) = model_with_trip();
        add(&mut model, trip_id, "09:00", "", &["Ben", "Removed"]);
        model.selected_trip = Some(trip_id);
        model.screen = Screen::Schedule;

        let vm = build(&model);
        let screen = vm.schedule.unwrap();
        assert_eq!(screen.days.len(), 2);
        let card = &screen.days[0].schedules[0];
        assert_eq!(card.attending, 1);
        assert_eq!(card.roster_size, 5);
        assert_eq!(card.summary, ParticipationSummary::Some);
        assert_eq!(card.chips[0].color, ParticipantColor::Gray);
        assert_eq!(card.chips[1].color, ParticipantColor::Green);
    }

    #[test]
    fn route_needs_two_map_links_on_the_day() {
        let (mut model, trip_id) = model_with_trip();
        add(&mut model, trip_id, "09:00", "https://maps.google.com/?q=A", &[]);
        add(&mut model, trip_id, "10:00", "https://tabelog.com/x", &[]);
        model.selected_trip = Some(trip_id);
        model.screen = Screen::Schedule;
        assert!(!build(&model).schedule.unwrap().days[0].route_available);

        add(&mut model, trip_id, "11:00", "https://maps.google.com/@1.5,2.5,10z", &[]);
        let vm = build(&model);
        assert!(vm.schedule.unwrap().days[0].route_available);

        let trip = model.store.trip(trip_id).unwrap();
        assert_eq!(
            route_stops(trip, "2024-03-01".parse().unwrap()),
            vec![
                Location::named("A"),
                Location::Coordinates { lat: 1.5, lng: 2.5 }
            ]
        );
    }

    #[test]
    fn shared_view_hides_list_and_editing() {
        let (mut model, trip_id) = model_with_trip();
        model.shared_trip = Some(trip_id);
        model.selected_trip = Some(trip_id);
        model.screen = Screen::Schedule;
        model.trip_form = Some(TripDraft::blank());

        let vm = build(&model);
        assert!(vm.shared_view);
        assert!(vm.trips.is_empty());
        assert!(vm.trip_form.is_none());
        assert!(!vm.schedule.unwrap().can_edit);
    }

    #[test]
    fn schedule_location_prefers_link() {
        let (mut model, trip_id) = model_with_trip();
        let id = add(&mut model, trip_id, "", "https://maps.google.com/?q=Castle", &[]);
        let trip = model.store.trip(trip_id).unwrap();
        assert_eq!(
            schedule_location(trip.schedule(id).unwrap()),
            Some(Location::named("Castle"))
        );
    }
}
