#![allow(dead_code)]

use crux_core::testing::AppTester;
use planner::capabilities::{StorageOperation, StorageOutput};
use planner::forms::TripFormEvent;
use planner::model::TripId;
use planner::store::TripStore;
use planner::{App, Effect, Event, Model, StartupContext};

pub type Tester = AppTester<App, Effect>;

/// Collects the requests of one effect variant.
macro_rules! requests {
    ($effects:expr, $variant:ident) => {
        $effects
            .into_iter()
            .filter_map(|effect| match effect {
                planner::Effect::$variant(request) => Some(request),
                _ => None,
            })
            .collect::<Vec<_>>()
    };
}

/// Runs an event and feeds every event it produces straight back in.
pub fn run(app: &Tester, model: &mut Model, event: Event) -> Vec<Effect> {
    let update = app.update(event, model);
    let mut effects = update.effects;
    for event in update.events {
        effects.extend(run(app, model, event));
    }
    effects
}

/// Boots the app, answering the storage read with `stored`.
pub fn start(app: &Tester, model: &mut Model, page_url: Option<&str>, stored: Option<Vec<u8>>) -> Vec<Effect> {
    let effects = run(
        app,
        model,
        Event::Started(Box::new(StartupContext {
            page_url: page_url.map(str::to_string),
            config: None,
        })),
    );

    let mut other = Vec::new();
    let mut read = None;
    for effect in effects {
        match effect {
            Effect::Storage(request) => read = Some(request),
            effect => other.push(effect),
        }
    }
    let mut read = read.expect("startup reads storage");
    assert!(matches!(read.operation, StorageOperation::Read { .. }));

    let update = app
        .resolve(&mut read, Ok(StorageOutput::Value(stored)))
        .expect("storage read resolves");
    for event in update.events {
        other.extend(run(app, model, event));
    }
    other
}

/// Trip lists written to storage by `effects`, oldest first.
pub fn writes(effects: Vec<Effect>) -> Vec<TripStore> {
    requests!(effects, Storage)
        .into_iter()
        .filter_map(|request| match &request.operation {
            StorageOperation::Write { value, .. } => {
                Some(TripStore::from_json(Some(value.as_slice())).expect("written JSON decodes"))
            }
            StorageOperation::Read { .. } => None,
        })
        .collect()
}

pub fn create_trip(app: &Tester, model: &mut Model, name: &str, participants: &[&str]) -> TripId {
    run(app, model, Event::NewTripRequested);
    let mut changes = vec![
        TripFormEvent::NameChanged(name.into()),
        TripFormEvent::StartDateChanged("2024-07-01".into()),
        TripFormEvent::EndDateChanged("2024-07-03".into()),
    ];
    for (index, participant) in participants.iter().enumerate() {
        if index > 0 {
            changes.push(TripFormEvent::ParticipantAdded);
        }
        changes.push(TripFormEvent::ParticipantChanged {
            index,
            value: (*participant).to_string(),
        });
    }
    for change in changes {
        run(app, model, Event::TripForm(change));
    }
    run(app, model, Event::TripFormSubmitted);
    model.store.trips().last().expect("trip created").id
}
