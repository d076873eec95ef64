use kraft_domain::{
    CreateError, DeleteError, ExerciseTemplateService, PlanLinkService, PlanService, ReadError,
    SessionLogRepository, SessionTemplateService, TrainingLogService, UpdateError,
};
use pretty_assertions::assert_eq;

use super::data::{
    add_exercise_template, create_exercise, create_session, create_startable_session, name, order,
    reps, service, sets, weight,
};

#[tokio::test]
async fn test_create_session_template() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;

    assert_eq!(session.name, name("Push Day"));
    assert_eq!(session.plan_id, None);
    assert_eq!(session.plan_name, None);
    assert_eq!(session.order_index, order(1));
    assert_eq!(session.exercise_count, 0);
    assert_eq!(session.execution_count, 0);
}

#[tokio::test]
async fn test_create_session_template_with_taken_name_fails() {
    let (service, _) = service();

    create_session(&service, "Push Day", 1).await;

    assert!(matches!(
        service
            .create_session_template(name("Push Day"), order(2), None)
            .await,
        Err(CreateError::Conflict)
    ));
}

#[tokio::test]
async fn test_create_session_template_with_order_above_limit_fails() {
    let (service, _) = service();

    assert!(matches!(
        service
            .create_session_template(name("Push Day"), order(31), None)
            .await,
        Err(CreateError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_create_session_template_in_unknown_plan_fails() {
    let (service, _) = service();

    assert!(matches!(
        service
            .create_session_template(name("Push Day"), order(1), Some(9.into()))
            .await,
        Err(CreateError::NotFound)
    ));
}

#[tokio::test]
async fn test_create_session_template_with_taken_order_in_plan_fails() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    service
        .create_session_template(name("Push Day"), order(1), Some(plan.id))
        .await
        .unwrap();

    assert!(matches!(
        service
            .create_session_template(name("Pull Day"), order(1), Some(plan.id))
            .await,
        Err(CreateError::Conflict)
    ));

    // The same order in another plan is fine.
    let other = service
        .create_plan(name("Hypertrophy Block"), String::new())
        .await
        .unwrap();
    assert!(
        service
            .create_session_template(name("Pull Day"), order(1), Some(other.id))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_plan_session_limit() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    for i in 1..=30 {
        service
            .create_session_template(name(&format!("Session {i}")), order(i), Some(plan.id))
            .await
            .unwrap();
    }

    assert!(matches!(
        service
            .create_session_template(name("Session 31"), order(5), Some(plan.id))
            .await,
        Err(CreateError::InvalidInput(message)) if message.contains("at most 30")
    ));
}

#[tokio::test]
async fn test_update_session_template() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    let session = create_session(&service, "Push Day", 1).await;

    let updated = service
        .update_session_template(session.id, name("Heavy Push Day"), order(2), Some(plan.id))
        .await
        .unwrap();

    assert_eq!(updated.name, name("Heavy Push Day"));
    assert_eq!(updated.plan_id, Some(plan.id));
    assert_eq!(updated.plan_name, Some(name("Strength Block")));
    assert_eq!(updated.order_index, order(2));

    // Re-saving with unchanged name and order must not conflict with
    // the session itself.
    assert!(
        service
            .update_session_template(session.id, name("Heavy Push Day"), order(2), Some(plan.id))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_update_session_template_to_taken_order_fails() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    service
        .create_session_template(name("Push Day"), order(1), Some(plan.id))
        .await
        .unwrap();
    let pull = service
        .create_session_template(name("Pull Day"), order(2), Some(plan.id))
        .await
        .unwrap();

    assert!(matches!(
        service
            .update_session_template(pull.id, name("Pull Day"), order(1), Some(plan.id))
            .await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_create_exercise_template() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;
    let bench = create_exercise(&service, "Bench Press").await;

    let template = add_exercise_template(&service, session.id, bench.id, 1).await;

    assert_eq!(template.exercise_name, name("Bench Press"));
    assert_eq!(template.exercise_category, "Strength");
    assert_eq!(template.planned_sets, sets(3));
    assert_eq!(template.planned_reps, reps(10));
    assert_eq!(template.planned_weight, weight(60.0));

    let overview = service.get_session_template(session.id).await.unwrap();
    assert_eq!(overview.exercise_count, 1);
}

#[tokio::test]
async fn test_create_exercise_template_with_unknown_references_fails() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;
    let bench = create_exercise(&service, "Bench Press").await;

    assert!(matches!(
        service
            .create_exercise_template(9.into(), bench.id, sets(3), reps(10), weight(60.0), order(1))
            .await,
        Err(CreateError::NotFound)
    ));
    assert!(matches!(
        service
            .create_exercise_template(
                session.id,
                9.into(),
                sets(3),
                reps(10),
                weight(60.0),
                order(1)
            )
            .await,
        Err(CreateError::NotFound)
    ));
}

#[tokio::test]
async fn test_exercise_templates_stay_distinct_within_session() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;
    let bench = create_exercise(&service, "Bench Press").await;
    let press = create_exercise(&service, "Overhead Press").await;
    add_exercise_template(&service, session.id, bench.id, 1).await;

    // Taken order index.
    assert!(matches!(
        service
            .create_exercise_template(
                session.id,
                press.id,
                sets(3),
                reps(10),
                weight(40.0),
                order(1)
            )
            .await,
        Err(CreateError::Conflict)
    ));

    // Same exercise twice.
    assert!(matches!(
        service
            .create_exercise_template(
                session.id,
                bench.id,
                sets(5),
                reps(5),
                weight(80.0),
                order(2)
            )
            .await,
        Err(CreateError::Conflict)
    ));

    add_exercise_template(&service, session.id, press.id, 2).await;
    let templates = service.get_exercise_templates(session.id).await.unwrap();
    let orders = templates.iter().map(|t| t.order_index).collect::<Vec<_>>();
    assert_eq!(orders, vec![order(1), order(2)]);
    let mut exercise_ids = templates.iter().map(|t| t.exercise_id).collect::<Vec<_>>();
    exercise_ids.dedup();
    assert_eq!(exercise_ids.len(), 2);
}

#[tokio::test]
async fn test_update_exercise_template_skips_checks_for_unchanged_values() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;
    let bench = create_exercise(&service, "Bench Press").await;
    let template = add_exercise_template(&service, session.id, bench.id, 1).await;

    // Changing only the planned values must not trip the uniqueness
    // checks against the template's own row.
    let updated = service
        .update_exercise_template(template.id, bench.id, sets(5), reps(5), weight(80.0), order(1))
        .await
        .unwrap();
    assert_eq!(updated.planned_sets, sets(5));
    assert_eq!(updated.planned_reps, reps(5));
    assert_eq!(updated.planned_weight, weight(80.0));
}

#[tokio::test]
async fn test_update_exercise_template_conflicts() {
    let (service, _) = service();

    let session = create_session(&service, "Push Day", 1).await;
    let bench = create_exercise(&service, "Bench Press").await;
    let press = create_exercise(&service, "Overhead Press").await;
    add_exercise_template(&service, session.id, bench.id, 1).await;
    let template = add_exercise_template(&service, session.id, press.id, 2).await;

    assert!(matches!(
        service
            .update_exercise_template(
                template.id,
                press.id,
                sets(3),
                reps(10),
                weight(60.0),
                order(1)
            )
            .await,
        Err(UpdateError::Conflict)
    ));
    assert!(matches!(
        service
            .update_exercise_template(
                template.id,
                bench.id,
                sets(3),
                reps(10),
                weight(60.0),
                order(2)
            )
            .await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_delete_unknown_exercise_template_fails() {
    let (service, _) = service();

    assert!(matches!(
        service.delete_exercise_template(9.into()).await,
        Err(DeleteError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_session_template_cascades_into_templates_but_not_history() {
    let (service, store) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    let session_id = create_startable_session(&service, "Push Day", 2).await;
    service.add_link(plan.id, session_id, None).await.unwrap();
    service.start(session_id, None).await.unwrap();

    service.delete_session_template(session_id).await.unwrap();

    assert!(matches!(
        service.get_session_template(session_id).await,
        Err(ReadError::NotFound)
    ));
    assert_eq!(
        service.get_exercise_templates(session_id).await.unwrap(),
        vec![]
    );
    let detail = service.get_plan(plan.id).await.unwrap();
    assert_eq!(detail.sessions, vec![]);
    // Execution history survives template deletion.
    assert_eq!(
        store
            .count_session_logs_for_template(session_id)
            .await
            .unwrap(),
        1
    );
}
