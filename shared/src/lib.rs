#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod forms;
pub mod links;
pub mod model;
pub mod notifications;
pub mod store;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind};
pub use event::{Event, StartupContext};
pub use model::Model;
pub use view::ViewModel;

#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub mod app {
    use tracing::{debug, error, info, warn};

    use crate::capabilities::{Capabilities, PlatformNotification, StorageOutput, StorageResult};
    use crate::chat::{self, check_link, known_sender, LinkCheck, OutgoingMessage, PendingAttachment};
    use crate::error::{AppError, ErrorKind};
    use crate::event::{CopyKind, Event};
    use crate::forms::{ScheduleDraft, TripDraft};
    use crate::links::{day_route_url, directions_url, map_url, parse_page_url, share_url, Location};
    use crate::model::{DeleteTarget, Message, Model, ScheduleId, Screen, TripId};
    use crate::now_ms;
    use crate::store::{timestamp, TripStore};
    use crate::view::{self, route_stops, schedule_location, ViewModel};

    const URL_PROMPT: &str = "Enter a URL:";
    const TITLE_PROMPT: &str = "Enter a title (optional):";
    const NAME_PROMPT: &str = "Please enter your name:";
    const INVALID_URL: &str = "Please enter a valid URL";

    #[derive(Default)]
    pub struct App;

    impl App {
        fn persist(model: &mut Model, caps: &Capabilities) {
            match model.store.to_json() {
                Ok(bytes) => {
                    debug!(trips = model.store.len(), bytes = bytes.len(), "persisting trips");
                    caps.storage()
                        .write(model.config.storage_key.clone(), bytes, |result| {
                            Event::TripsPersisted(Box::new(result))
                        });
                }
                Err(e) => {
                    error!(error = %e, "failed to serialize trips");
                    model.set_error(e.into());
                }
            }
        }

        fn banner(model: &mut Model, caps: &Capabilities, message: String) {
            let banner_id = model.banners.push(message, chrono::Utc::now());
            caps.timer()
                .after(model.config.banner_ttl_ms, Event::BannerExpired { banner_id });
        }

        fn copy(caps: &Capabilities, text: String, kind: CopyKind) {
            caps.clipboard()
                .write_text(text, move |result| Event::Copied { kind, result });
        }

        fn schedule_target(model: &Model, schedule_id: ScheduleId) -> Option<Location> {
            model
                .selected()
                .and_then(|trip| trip.schedule(schedule_id))
                .and_then(schedule_location)
        }

        fn handle_loaded(model: &mut Model, result: StorageResult, share: Option<TripId>) {
            let loaded = result
                .map_err(AppError::from)
                .and_then(|output| {
                    TripStore::from_json(output.into_value().as_deref()).map_err(AppError::from)
                });
            match loaded {
                Ok(store) => {
                    info!(trips = store.len(), "trips loaded");
                    model.store = store;
                }
                Err(e) => {
                    error!(error = %e, "could not load stored trips, starting empty");
                    model.store = TripStore::new();
                    model.set_error(e);
                }
            }
            model.loaded = true;

            match share {
                Some(trip_id) if model.store.trip(trip_id).is_some() => {
                    info!(%trip_id, "opening shared trip");
                    model.shared_trip = Some(trip_id);
                    model.selected_trip = Some(trip_id);
                    model.screen = Screen::Schedule;
                }
                Some(trip_id) => debug!(%trip_id, "share id not found, showing normal view"),
                None => {}
            }
        }

        fn submit_trip(model: &mut Model, caps: &Capabilities) {
            let Some(draft) = model.trip_form.take() else {
                return;
            };
            let input = match draft.submit() {
                Ok(input) => input,
                Err(e) => {
                    warn!(error = %e, "trip form rejected");
                    model.set_error(e.into());
                    model.trip_form = Some(draft);
                    return;
                }
            };

            match draft.editing {
                Some(trip_id) => {
                    if let Err(e) = model.store.update_trip(trip_id, input) {
                        warn!(error = %e, "trip update failed");
                        model.set_error(e.into());
                        return;
                    }
                    info!(%trip_id, "trip updated");
                }
                None => {
                    let trip_id = model.store.create_trip(input, now_ms());
                    info!(%trip_id, "trip created");
                }
            }
            Self::persist(model, caps);
        }

        fn submit_schedule(model: &mut Model, caps: &Capabilities) {
            let Some(draft) = model.schedule_form.take() else {
                return;
            };
            let input = match draft.submit() {
                Ok(input) => input,
                Err(e) => {
                    warn!(error = %e, "schedule form rejected");
                    model.set_error(e.into());
                    model.schedule_form = Some(draft);
                    return;
                }
            };

            let result = match draft.editing {
                Some(schedule_id) => model
                    .store
                    .update_schedule(draft.trip_id, schedule_id, input)
                    .map(|()| schedule_id),
                None => model.store.add_schedule(draft.trip_id, input, now_ms()),
            };
            match result {
                Ok(schedule_id) => {
                    info!(trip_id = %draft.trip_id, %schedule_id, "schedule saved");
                    Self::persist(model, caps);
                }
                Err(e) => {
                    warn!(error = %e, "schedule save failed");
                    model.set_error(e.into());
                }
            }
        }

        fn confirm_delete(model: &mut Model, caps: &Capabilities) {
            match model.pending_delete.take() {
                Some(DeleteTarget::Trip(trip_id)) => {
                    if let Some(trip) = model.store.delete_trip(trip_id) {
                        info!(
                            %trip_id,
                            schedules = trip.schedules.len(),
                            messages = trip.chat.len(),
                            "trip deleted"
                        );
                        model.forget_trip(trip_id);
                        Self::persist(model, caps);
                    }
                }
                Some(DeleteTarget::Schedule(schedule_id)) => {
                    let Some(trip_id) = model.selected_trip else {
                        return;
                    };
                    match model.store.delete_schedule(trip_id, schedule_id) {
                        Ok(_) => {
                            info!(%trip_id, %schedule_id, "schedule deleted");
                            if model.expanded_schedule == Some(schedule_id) {
                                model.expanded_schedule = None;
                            }
                            Self::persist(model, caps);
                        }
                        Err(e) => {
                            warn!(error = %e, "schedule delete failed");
                            model.set_error(e.into());
                        }
                    }
                }
                None => {}
            }
        }

        fn start_send(model: &mut Model, caps: &Capabilities) {
            if model.outgoing.is_some() {
                debug!("send already in progress");
                return;
            }
            if !model.composer.can_send() {
                debug!("empty message not sent");
                return;
            }
            let Some(trip_id) = model.selected().map(|t| t.id) else {
                warn!("send without a selected trip");
                return;
            };

            let mut outgoing = OutgoingMessage::from_composer(trip_id, &model.composer);
            outgoing.sender = known_sender(
                model.user_name.as_deref(),
                model.is_shared_view(),
                &model.config.default_sender_name,
            );
            let needs_name = outgoing.sender.is_none();
            model.outgoing = Some(outgoing);

            if needs_name {
                caps.dialog().prompt(NAME_PROMPT, "", Event::SenderNameEntered);
            } else {
                Self::continue_send(model, caps);
            }
        }

        fn continue_send(model: &mut Model, caps: &Capabilities) {
            let Some(outgoing) = &model.outgoing else {
                return;
            };
            match outgoing.image() {
                Some(file) => {
                    debug!(name = %file.name, size = file.size, "reading image attachment");
                    caps.files().read_data_url(file.handle.clone(), |result| {
                        Event::ImageDataRead(Box::new(result))
                    });
                }
                None => Self::finish_send(model, caps, None),
            }
        }

        fn finish_send(model: &mut Model, caps: &Capabilities, image_data: Option<String>) {
            let Some(outgoing) = model.outgoing.take() else {
                return;
            };
            let Some(sender) = outgoing.sender.clone() else {
                error!("message finished without a sender");
                model.set_error(AppError::new(ErrorKind::Internal, "message has no sender"));
                return;
            };
            let trip_id = outgoing.trip_id;
            let now = now_ms();
            let id = model.store.next_message_id(now);
            let message = outgoing.finish(id, timestamp(now), sender, image_data);

            if let Err(e) = model.store.append_message(trip_id, message.clone()) {
                warn!(error = %e, "message dropped");
                model.set_error(e.into());
                return;
            }
            info!(%trip_id, message_id = %id, urls = message.urls.len(), "message sent");
            model.composer.clear();
            Self::persist(model, caps);
            Self::notify_sent(model, caps, trip_id, &message);
        }

        fn notify_sent(model: &mut Model, caps: &Capabilities, trip_id: TripId, message: &Message) {
            if model.screen == Screen::Chat {
                Self::banner(model, caps, chat::chat_banner(&message.sender));
                return;
            }

            let Some(trip_name) = model.store.trip(trip_id).map(|t| t.name.clone()) else {
                return;
            };
            model.bump_unread(trip_id);

            if model.permission.is_granted() {
                caps.notification().show(PlatformNotification {
                    title: chat::notification_title(&trip_name, &message.sender),
                    body: chat::notification_body(message, model.config.notification_preview_chars),
                    icon: model.config.notification_icon.clone(),
                    tag: chat::notification_tag(trip_id),
                    auto_close_ms: model.config.platform_notification_close_ms,
                });
            } else {
                debug!(permission = ?model.permission, "platform notification suppressed");
            }
            Self::banner(model, caps, chat::trip_banner(&trip_name, &message.sender));
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "update");

            if !model.loaded && event.needs_loaded_trips() {
                warn!(event = event.name(), "ignored until stored trips are loaded");
                return;
            }
            if model.is_shared_view() && event.edits_itinerary() {
                warn!(event = event.name(), "ignored in shared view");
                return;
            }

            match event {
                Event::Started(context) => {
                    let context = *context;
                    if let Some(config) = context.config {
                        model.config = config;
                    }
                    let share = context.page_url.as_deref().and_then(|page_url| {
                        let (base, share) = parse_page_url(page_url, &model.config.share_param);
                        model.base_url = base;
                        share.and_then(|raw| raw.parse::<TripId>().ok())
                    });

                    caps.notification().check_permission(Event::PermissionUpdated);
                    caps.storage()
                        .read(model.config.storage_key.clone(), move |result| {
                            Event::TripsLoaded {
                                result: Box::new(result),
                                share,
                            }
                        });
                }

                Event::TripsLoaded { result, share } => Self::handle_loaded(model, *result, share),

                Event::TripsPersisted(result) => match *result {
                    Ok(StorageOutput::Written | StorageOutput::Value(_)) => {
                        debug!("trips persisted");
                    }
                    Err(e) => {
                        error!(error = %e, "failed to persist trips");
                        model.set_error(e.into());
                    }
                },

                Event::DismissError => model.clear_error(),

                // --- Navigation ---
                Event::TripSelected { trip_id } => {
                    if model.store.trip(trip_id).is_some() {
                        model.selected_trip = Some(trip_id);
                        model.screen = Screen::Schedule;
                        model.expanded_schedule = None;
                    } else {
                        warn!(%trip_id, "selected trip does not exist");
                    }
                }

                Event::BackToList => {
                    model.screen = Screen::TripList;
                    model.selected_trip = None;
                    model.expanded_schedule = None;
                }

                Event::OpenChat => {
                    if let Some(trip_id) = model.selected_trip {
                        model.screen = Screen::Chat;
                        model.reset_unread(trip_id);
                    }
                }

                Event::CloseChat => {
                    if let Some(trip_id) = model.selected_trip {
                        model.screen = Screen::Schedule;
                        model.reset_unread(trip_id);
                    }
                }

                Event::ScheduleToggled { schedule_id } => {
                    model.expanded_schedule = if model.expanded_schedule == Some(schedule_id) {
                        None
                    } else {
                        Some(schedule_id)
                    };
                }

                // --- Trip form ---
                Event::NewTripRequested => model.trip_form = Some(TripDraft::blank()),

                Event::EditTripRequested { trip_id } => {
                    model.trip_form = model.store.trip(trip_id).map(TripDraft::from_trip);
                }

                Event::TripForm(change) => {
                    if let Some(draft) = model.trip_form.as_mut() {
                        draft.apply(change);
                    }
                }

                Event::TripFormSubmitted => Self::submit_trip(model, caps),

                Event::TripFormCancelled => model.trip_form = None,

                // --- Schedule form ---
                Event::NewScheduleRequested => {
                    model.schedule_form = model.selected().map(ScheduleDraft::blank);
                }

                Event::EditScheduleRequested { schedule_id } => {
                    model.schedule_form = model.selected().and_then(|trip| {
                        trip.schedule(schedule_id)
                            .map(|s| ScheduleDraft::from_schedule(trip.id, s))
                    });
                }

                Event::ScheduleForm(change) => {
                    if let Some(draft) = model.schedule_form.as_mut() {
                        draft.apply(change);
                    }
                }

                Event::SearchLocationRequested => {
                    let search = model
                        .schedule_form
                        .as_ref()
                        .and_then(|draft| map_url(&Location::named(draft.location.clone())));
                    if let Some(url) = search {
                        caps.browser().open(url);
                    }
                }

                Event::ScheduleFormSubmitted => Self::submit_schedule(model, caps),

                Event::ScheduleFormCancelled => model.schedule_form = None,

                // --- Deletion ---
                Event::DeleteTripRequested { trip_id } => {
                    model.pending_delete = Some(DeleteTarget::Trip(trip_id));
                }

                Event::DeleteScheduleRequested { schedule_id } => {
                    model.pending_delete = Some(DeleteTarget::Schedule(schedule_id));
                }

                Event::DeleteConfirmed => Self::confirm_delete(model, caps),

                Event::DeleteCancelled => model.pending_delete = None,

                // --- Chat ---
                Event::ChatTextChanged(text) => model.composer.text = text,

                Event::AttachmentMenuToggled => {
                    model.composer.menu_open = !model.composer.menu_open;
                }

                Event::AttachImageRequested => {
                    model.composer.menu_open = false;
                    caps.files()
                        .pick_image(|result| Event::ImagePicked(Box::new(result)));
                }

                Event::ImagePicked(result) => match *result {
                    Ok(Some(file)) => {
                        debug!(name = %file.name, size = file.size, "image attached");
                        model.composer.attach(PendingAttachment::Image(file));
                    }
                    Ok(None) => debug!("image pick cancelled"),
                    Err(e) => {
                        warn!(error = %e, "image rejected");
                        model.set_error(e.into());
                    }
                },

                Event::AttachLinkRequested => {
                    model.composer.menu_open = false;
                    caps.dialog().prompt(URL_PROMPT, "", Event::LinkUrlEntered);
                }

                Event::LinkUrlEntered(entered) => match check_link(entered.as_deref()) {
                    LinkCheck::Cancelled => {}
                    LinkCheck::Invalid => caps.dialog().alert(INVALID_URL),
                    LinkCheck::Valid => {
                        model.composer.pending_link = entered.map(|url| url.trim().to_string());
                        caps.dialog().prompt(TITLE_PROMPT, "", Event::LinkTitleEntered);
                    }
                },

                Event::LinkTitleEntered(title) => {
                    if let Some(url) = model.composer.pending_link.take() {
                        model.composer.attach(PendingAttachment::link(url, title));
                    }
                }

                Event::AttachmentRemoved => model.composer.attachment = None,

                Event::SendMessage => Self::start_send(model, caps),

                Event::SenderNameEntered(name) => {
                    match name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
                        Some(name) => {
                            model.user_name = Some(name.clone());
                            if let Some(outgoing) = model.outgoing.as_mut() {
                                outgoing.sender = Some(name);
                            }
                            Self::continue_send(model, caps);
                        }
                        None => {
                            info!("send cancelled at name prompt");
                            model.outgoing = None;
                        }
                    }
                }

                Event::ImageDataRead(result) => match *result {
                    Ok(data) => Self::finish_send(model, caps, Some(data)),
                    Err(e) => {
                        warn!(error = %e, "image could not be read");
                        model.outgoing = None;
                        model.set_error(e.into());
                    }
                },

                Event::OpenLink { url } => caps.browser().open(url),

                // --- Notifications ---
                Event::NotificationPermissionRequested => {
                    caps.notification().request_permission(Event::PermissionUpdated);
                }

                Event::PermissionUpdated(permission) => {
                    info!(?permission, "notification permission");
                    model.permission = permission;
                }

                Event::BannerClicked { banner_id } => {
                    model.banners.mark_read(banner_id);
                }

                Event::BannerExpired { banner_id } => {
                    model.banners.expire(banner_id);
                }

                // --- Sharing & maps ---
                Event::ShareRequested => {
                    let Some(trip_id) = model.selected_trip else {
                        return;
                    };
                    let Some(base) = model.base_url.as_deref() else {
                        warn!("no page URL to build a share link from");
                        return;
                    };
                    let url = share_url(base, &model.config.share_param, trip_id);
                    info!(%trip_id, "share link created");
                    model.share_url = Some(url.clone());
                    Self::copy(caps, url, CopyKind::ShareLink);
                }

                Event::ShareClosed => model.share_url = None,

                Event::Copied { kind, result } => match result {
                    Ok(()) => caps.dialog().alert(kind.confirmation()),
                    Err(e) => {
                        warn!(?kind, error = %e, "clipboard write failed");
                        model.set_error(e.into());
                    }
                },

                Event::OpenMapRequested { schedule_id } => {
                    let url = model
                        .selected()
                        .and_then(|trip| trip.schedule(schedule_id))
                        .map(|s| s.url.clone())
                        .filter(|url| !url.is_empty());
                    if let Some(url) = url {
                        caps.browser().open(url);
                    }
                }

                Event::DirectionsRequested { schedule_id } => {
                    if let Some(to) = Self::schedule_target(model, schedule_id) {
                        let from = Location::named(model.config.directions_origin_label.clone());
                        caps.browser().open(directions_url(&from, &to));
                    }
                }

                Event::CopyMapUrlRequested { schedule_id } => {
                    let url = Self::schedule_target(model, schedule_id)
                        .and_then(|location| map_url(&location));
                    if let Some(url) = url {
                        Self::copy(caps, url, CopyKind::MapUrl);
                    }
                }

                Event::DayRouteRequested { date } => {
                    let route = model
                        .selected()
                        .and_then(|trip| day_route_url(&route_stops(trip, date)));
                    match route {
                        Some(url) => caps.browser().open(url),
                        None => debug!(%date, "not enough map stops for a route"),
                    }
                }
            }

            caps.render().render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            view::build(model)
        }
    }
}
