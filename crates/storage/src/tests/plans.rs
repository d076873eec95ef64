use kraft_domain::{
    CreateError, PlanLinkRepository, PlanLinkService, PlanService, ReadError,
    SessionTemplateService, UpdateError,
};
use pretty_assertions::assert_eq;

use super::data::{add_exercise_template, create_exercise, create_session, name, order, service};

#[tokio::test]
async fn test_plan_overviews_count_linked_sessions() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), "Three days a week".to_string())
        .await
        .unwrap();
    service
        .create_plan(name("Hypertrophy Block"), String::new())
        .await
        .unwrap();
    let s1 = create_session(&service, "Day 1", 1).await;
    let s2 = create_session(&service, "Day 2", 2).await;
    service.add_link(plan.id, s1.id, None).await.unwrap();
    service.add_link(plan.id, s2.id, None).await.unwrap();

    let overviews = service.get_plans().await.unwrap();
    assert_eq!(
        overviews
            .iter()
            .map(|p| (p.name.clone(), p.session_count))
            .collect::<Vec<_>>(),
        vec![(name("Hypertrophy Block"), 0), (name("Strength Block"), 2)]
    );
}

#[tokio::test]
async fn test_plan_detail_lists_sessions_in_position_order() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    let s1 = create_session(&service, "Day 1", 1).await;
    let s2 = create_session(&service, "Day 2", 2).await;
    let bench = create_exercise(&service, "Bench Press").await;
    add_exercise_template(&service, s1.id, bench.id, 1).await;
    service.add_link(plan.id, s1.id, None).await.unwrap();
    service.add_link(plan.id, s2.id, Some(1)).await.unwrap();

    let detail = service.get_plan(plan.id).await.unwrap();
    assert!(detail.has_sessions);
    assert_eq!(detail.sessions_hint, None);
    assert_eq!(
        detail
            .sessions
            .iter()
            .map(|s| (s.name.clone(), s.position, s.exercise_count))
            .collect::<Vec<_>>(),
        vec![(name("Day 2"), 1, 0), (name("Day 1"), 2, 1)]
    );
}

#[tokio::test]
async fn test_plan_detail_hints_at_missing_sessions() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();

    let detail = service.get_plan(plan.id).await.unwrap();
    assert!(!detail.has_sessions);
    assert_eq!(detail.sessions, vec![]);
    assert!(detail.sessions_hint.is_some());
}

#[tokio::test]
async fn test_get_unknown_plan_fails() {
    let (service, _) = service();

    assert!(matches!(
        service.get_plan(9.into()).await,
        Err(ReadError::NotFound)
    ));
}

#[tokio::test]
async fn test_create_plan_with_taken_name_fails() {
    let (service, _) = service();

    service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();

    assert!(matches!(
        service
            .create_plan(name("Strength Block"), "Again".to_string())
            .await,
        Err(CreateError::Conflict)
    ));
}

#[tokio::test]
async fn test_update_plan() {
    let (service, _) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    service
        .create_plan(name("Hypertrophy Block"), String::new())
        .await
        .unwrap();

    // Keeping the plan's own name is not a conflict.
    let updated = service
        .update_plan(plan.id, name("Strength Block"), "Updated".to_string())
        .await
        .unwrap();
    assert_eq!(updated.description, "Updated");

    assert!(matches!(
        service
            .update_plan(plan.id, name("Hypertrophy Block"), String::new())
            .await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_delete_plan_detaches_sessions_and_removes_links() {
    let (service, store) = service();

    let plan = service
        .create_plan(name("Strength Block"), String::new())
        .await
        .unwrap();
    let session = service
        .create_session_template(name("Day 1"), order(1), Some(plan.id))
        .await
        .unwrap();
    service.add_link(plan.id, session.id, None).await.unwrap();

    assert_eq!(service.delete_plan(plan.id).await.unwrap(), plan.id);

    assert!(matches!(
        service.get_plan(plan.id).await,
        Err(ReadError::NotFound)
    ));
    let overview = service.get_session_template(session.id).await.unwrap();
    assert_eq!(overview.plan_id, None);
    assert_eq!(store.read_links_for_plan(plan.id).await.unwrap(), vec![]);
}
