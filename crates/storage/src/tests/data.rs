use std::collections::BTreeSet;

use kraft_domain::{
    self as domain, ExerciseService, ExerciseTemplateService, SessionTemplateService,
};

use crate::InMemoryStore;

pub fn alice() -> domain::UserID {
    1.into()
}

pub fn bob() -> domain::UserID {
    2.into()
}

/// A service over a fresh store with Alice signed in, plus a second
/// handle on the same store for direct repository access.
pub fn service() -> (domain::Service<InMemoryStore>, InMemoryStore) {
    let store = InMemoryStore::new();
    store.sign_in(alice()).unwrap();
    (domain::Service::new(store.clone()), store)
}

pub fn name(value: &str) -> domain::Name {
    domain::Name::new(value).unwrap()
}

pub fn muscle_groups(values: &[&str]) -> BTreeSet<domain::MuscleGroup> {
    values
        .iter()
        .map(|value| domain::MuscleGroup::new(value).unwrap())
        .collect()
}

pub fn sets(value: u32) -> domain::Sets {
    domain::Sets::new(value).unwrap()
}

pub fn reps(value: u32) -> domain::Reps {
    domain::Reps::new(value).unwrap()
}

pub fn weight(value: f32) -> domain::Weight {
    domain::Weight::new(value).unwrap()
}

pub fn order(value: u32) -> domain::OrderIndex {
    domain::OrderIndex::new(value).unwrap()
}

pub async fn create_exercise(
    service: &domain::Service<InMemoryStore>,
    exercise_name: &str,
) -> domain::Exercise {
    service
        .create_exercise(
            name(exercise_name),
            "Strength".to_string(),
            muscle_groups(&["Chest"]),
            None,
        )
        .await
        .unwrap()
}

pub async fn create_session(
    service: &domain::Service<InMemoryStore>,
    session_name: &str,
    order_index: u32,
) -> domain::SessionTemplateOverview {
    service
        .create_session_template(name(session_name), order(order_index), None)
        .await
        .unwrap()
}

pub async fn add_exercise_template(
    service: &domain::Service<InMemoryStore>,
    session_id: domain::SessionTemplateID,
    exercise_id: domain::ExerciseID,
    order_index: u32,
) -> domain::ExerciseTemplateView {
    service
        .create_exercise_template(
            session_id,
            exercise_id,
            sets(3),
            reps(10),
            weight(60.0),
            order(order_index),
        )
        .await
        .unwrap()
}

/// A session template with `count` exercise templates, ready to be
/// started.
pub async fn create_startable_session(
    service: &domain::Service<InMemoryStore>,
    session_name: &str,
    count: u32,
) -> domain::SessionTemplateID {
    let session = create_session(service, session_name, 1).await;
    for i in 1..=count {
        let exercise = create_exercise(service, &format!("{session_name} exercise {i}")).await;
        add_exercise_template(service, session.id, exercise.id, i).await;
    }
    session.id
}
