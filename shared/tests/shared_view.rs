#[macro_use]
mod support;

use planner::capabilities::{ClipboardOperation, DialogOperation, DialogResponse};
use planner::model::{Screen, TripId, TripInput};
use planner::store::TripStore;
use planner::{Event, Model};
use support::{create_trip, run, start, writes, Tester};

const TRIP_ID: i64 = 1_700_000_000_000;

fn stored_trip() -> Vec<u8> {
    let mut store = TripStore::new();
    store.create_trip(
        TripInput {
            name: "Nara".into(),
            start_date: "2024-05-01".parse().unwrap(),
            end_date: "2024-05-02".parse().unwrap(),
            participants: vec!["Aki".into(), "Ben".into()],
        },
        TRIP_ID,
    );
    store.to_json().unwrap()
}

fn open_shared() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    let page_url = format!("https://plan.example/?share={TRIP_ID}");
    start(&app, &mut model, Some(page_url.as_str()), Some(stored_trip()));
    (app, model)
}

#[test]
fn share_parameter_opens_a_read_only_schedule() {
    let (app, mut model) = open_shared();

    assert_eq!(model.shared_trip, Some(TripId(TRIP_ID)));
    let view = app.view(&model);
    assert!(view.shared_view);
    assert_eq!(view.screen, Screen::Schedule);
    assert!(view.trips.is_empty());
    assert!(!view.schedule.unwrap().can_edit);

    for event in [
        Event::BackToList,
        Event::NewScheduleRequested,
        Event::DeleteTripRequested {
            trip_id: TripId(TRIP_ID),
        },
        Event::ShareRequested,
    ] {
        let update = app.update(event, &mut model);
        assert!(update.effects.is_empty());
    }
    assert_eq!(model.screen, Screen::Schedule);
    assert!(model.schedule_form.is_none());
    assert!(model.pending_delete.is_none());
}

#[test]
fn unknown_share_id_falls_back_to_the_list() {
    let app = Tester::default();
    let mut model = Model::default();
    start(
        &app,
        &mut model,
        Some("https://plan.example/?share=42"),
        Some(stored_trip()),
    );

    assert!(!model.is_shared_view());
    let view = app.view(&model);
    assert_eq!(view.screen, Screen::TripList);
    assert_eq!(view.trips.len(), 1);
}

#[test]
fn shared_chat_asks_for_a_name_once() {
    let (app, mut model) = open_shared();
    run(&app, &mut model, Event::OpenChat);
    run(&app, &mut model, Event::ChatTextChanged("Hello from a guest".into()));

    // Cancelling the name prompt drops the send.
    let effects = run(&app, &mut model, Event::SendMessage);
    let mut prompts = requests!(effects, Dialog);
    assert!(matches!(
        prompts[0].operation,
        DialogOperation::Prompt { .. }
    ));
    let update = app.resolve(&mut prompts[0], DialogResponse(None)).unwrap();
    for event in update.events {
        run(&app, &mut model, event);
    }
    assert!(model.store.trip(TripId(TRIP_ID)).unwrap().chat.is_empty());
    assert!(model.outgoing.is_none());
    assert_eq!(model.composer.text, "Hello from a guest");

    // A given name is used and remembered.
    let effects = run(&app, &mut model, Event::SendMessage);
    let mut prompts = requests!(effects, Dialog);
    let update = app
        .resolve(&mut prompts[0], DialogResponse(Some("  Chika ".into())))
        .unwrap();
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(run(&app, &mut model, event));
    }
    assert_eq!(writes(effects).len(), 1);
    let chat = &model.store.trip(TripId(TRIP_ID)).unwrap().chat;
    assert_eq!(chat[0].sender, "Chika");

    run(&app, &mut model, Event::ChatTextChanged("Second".into()));
    let effects = run(&app, &mut model, Event::SendMessage);
    assert!(requests!(effects, Dialog).is_empty());
    let chat = &model.store.trip(TripId(TRIP_ID)).unwrap().chat;
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[1].sender, "Chika");
}

#[test]
fn share_link_is_copied_and_shown() {
    let app = Tester::default();
    let mut model = Model::default();
    start(&app, &mut model, Some("https://plan.example/app/#top"), None);
    let trip_id = create_trip(&app, &mut model, "Sapporo", &["Aki"]);
    run(&app, &mut model, Event::TripSelected { trip_id });

    let effects = run(&app, &mut model, Event::ShareRequested);
    let expected = format!("https://plan.example/app/?share={trip_id}");
    let mut copies = requests!(effects, Clipboard);
    assert_eq!(
        copies[0].operation,
        ClipboardOperation::WriteText(expected.clone())
    );
    assert_eq!(app.view(&model).share_url, Some(expected));

    let update = app.resolve(&mut copies[0], Ok(())).unwrap();
    let mut alerts = Vec::new();
    for event in update.events {
        alerts.extend(requests!(run(&app, &mut model, event), Dialog));
    }
    assert_eq!(
        alerts[0].operation,
        DialogOperation::Alert {
            message: "Share link copied to the clipboard".into()
        }
    );

    run(&app, &mut model, Event::ShareClosed);
    assert!(app.view(&model).share_url.is_none());
}
