//! Tests for the scheduler module.

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use tempfile::TempDir;

use super::*;
use crate::{
    models::StepMetadata,
    params::{ActivateStack, Id, NextFire, Snooze, StepDefinition, UpdateStep},
};

async fn create_test_scheduler() -> (TempDir, Scheduler) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let scheduler = SchedulerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_time_zone(TimeZone::UTC)
        .build()
        .await
        .expect("Failed to create scheduler");
    (temp_dir, scheduler)
}

fn start() -> Timestamp {
    "2024-05-01T06:00:00Z".parse().unwrap()
}

fn at(seconds: i64) -> Timestamp {
    start().checked_add(SignedDuration::from_secs(seconds)).unwrap()
}

fn definition(id: &str, kind: &str) -> StepDefinition {
    StepDefinition {
        id: id.to_string(),
        kind: kind.parse().unwrap(),
        allow_snooze: true,
        metadata: StepMetadata {
            title: id.to_uppercase(),
            ..StepMetadata::default()
        },
    }
}

fn morning() -> ActivateStack {
    ActivateStack {
        stack_id: "morning".to_string(),
        start: Some(start()),
        steps: vec![
            definition("wake", "timer:0"),
            definition("coffee", "relative:120"),
            definition("leave", "relative:60"),
        ],
    }
}

fn snooze(step_id: &str, minutes: u32) -> Snooze {
    Snooze {
        step_id: step_id.to_string(),
        minutes,
    }
}

fn stack() -> Id {
    Id {
        id: "morning".to_string(),
    }
}

#[tokio::test]
async fn test_activate_and_show_stack() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;

    let chain = scheduler
        .activate_stack(&morning())
        .await
        .expect("Failed to activate stack");
    assert_eq!(chain.first_target, start());

    let shown = scheduler.show_stack(&stack()).await.unwrap().unwrap();
    assert_eq!(shown, chain);
    assert_eq!(scheduler.list_stacks().await.unwrap(), vec!["morning"]);
}

#[tokio::test]
async fn test_snooze_persists_shifted_chain() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();

    let applied = scheduler
        .snooze_at(&snooze("wake", 3), start())
        .await
        .unwrap()
        .expect("wake is active");
    assert_eq!(applied.removed_ids, vec!["wake", "coffee", "leave"]);
    assert_eq!(applied.first_target, at(180));

    let schedule = scheduler
        .schedule_at(&stack(), start())
        .await
        .unwrap()
        .unwrap();
    let fire_times: Vec<Timestamp> = schedule.iter().map(|s| s.fire_at).collect();
    assert_eq!(fire_times, vec![at(180), at(300), at(360)]);
    assert!(schedule.iter().all(|s| s.id != s.base_id));
}

#[tokio::test]
async fn test_concurrent_snoozes_are_serialized() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();

    let first = snooze("coffee", 3);
    let second = snooze("coffee", 2);
    let (a, b) = tokio::join!(
        scheduler.snooze_at(&first, at(120)),
        scheduler.snooze_at(&second, at(120)),
    );
    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());

    let chain = scheduler.show_stack(&stack()).await.unwrap().unwrap();
    let coffee: Vec<_> = chain
        .steps
        .iter()
        .filter(|s| s.base_id == "coffee")
        .collect();
    assert_eq!(coffee.len(), 1);
    assert_eq!(coffee[0].offset_from_first, Some(120 + 300));
    assert_eq!(chain.steps.len(), 3);
}

#[tokio::test]
async fn test_snooze_respects_allow_snooze() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let mut params = morning();
    params.steps[2].allow_snooze = false;
    scheduler.activate_stack(&params).await.unwrap();

    let result = scheduler.snooze_at(&snooze("leave", 5), at(180)).await;
    assert!(matches!(result, Err(ChimeError::SnoozeNotAllowed { .. })));

    // Nothing moved.
    let chain = scheduler.show_stack(&stack()).await.unwrap().unwrap();
    assert_eq!(chain.active_ids(), vec!["wake", "coffee", "leave"]);
}

#[tokio::test]
async fn test_snooze_rejects_zero_minutes() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();

    let result = scheduler.snooze(&snooze("wake", 0)).await;
    assert!(matches!(result, Err(ChimeError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_snooze_of_unknown_or_retired_step_is_noop() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    assert!(scheduler.snooze(&snooze("ghost", 5)).await.unwrap().is_none());

    scheduler.activate_stack(&morning()).await.unwrap();
    let retired = scheduler.retire_stack(&stack()).await.unwrap().unwrap();
    assert_eq!(retired, vec!["wake", "coffee", "leave"]);

    assert!(scheduler.snooze(&snooze("wake", 5)).await.unwrap().is_none());
    assert!(scheduler.show_stack(&stack()).await.unwrap().is_none());
    assert!(scheduler.list_stacks().await.unwrap().is_empty());
    assert!(scheduler.retire_stack(&stack()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_step_follows_replacement() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();
    scheduler
        .snooze_at(&snooze("wake", 1), start())
        .await
        .unwrap();

    let updated = scheduler
        .update_step(&UpdateStep {
            id: "wake".to_string(),
            sound_name: Some(Some("birds".to_string())),
            ..UpdateStep::default()
        })
        .await
        .unwrap()
        .expect("wake resolves through its mapping");
    assert_ne!(updated.id, "wake");
    assert_eq!(updated.base_id, "wake");
    assert_eq!(updated.metadata.sound_name.as_deref(), Some("birds"));

    assert!(scheduler
        .update_step(&UpdateStep {
            id: "ghost".to_string(),
            ..UpdateStep::default()
        })
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let (temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();
    drop(scheduler);

    let reopened = SchedulerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_time_zone(TimeZone::UTC)
        .build()
        .await
        .unwrap();
    assert_eq!(reopened.list_stacks().await.unwrap(), vec!["morning"]);
}

#[tokio::test]
async fn test_next_fire_is_pure() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let fire = scheduler
        .next_fire(&NextFire {
            kind: "fixed:07:30".parse().unwrap(),
            base: Some(start()),
        })
        .unwrap();
    assert_eq!(fire, "2024-05-01T07:30:00Z".parse::<Timestamp>().unwrap());
    assert!(scheduler.list_stacks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_retire_releases_stack_guard() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    scheduler.activate_stack(&morning()).await.unwrap();
    scheduler.snooze_at(&snooze("wake", 3), at(30)).await.unwrap();
    assert!(scheduler.guards.lock().await.contains_key("morning"));

    scheduler.retire_stack(&stack()).await.unwrap();
    assert!(!scheduler.guards.lock().await.contains_key("morning"));

    // Retiring an unknown stack leaves nothing behind either.
    let removed = scheduler
        .retire_stack(&Id {
            id: "evening".to_string(),
        })
        .await
        .unwrap();
    assert!(removed.is_none());
    assert!(scheduler.guards.lock().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_activations_cannot_share_a_step_id() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let first = ActivateStack {
        stack_id: "weekday".to_string(),
        start: Some(start()),
        steps: vec![definition("wake", "timer:0"), definition("shower", "relative:300")],
    };
    let second = ActivateStack {
        stack_id: "weekend".to_string(),
        start: Some(start()),
        steps: vec![definition("wake", "timer:3600")],
    };

    let (a, b) = tokio::join!(scheduler.activate_stack(&first), scheduler.activate_stack(&second));

    let rejected = match (a, b) {
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
        (a, b) => panic!("Expected exactly one activation to succeed: {a:?} / {b:?}"),
    };
    assert!(matches!(rejected, ChimeError::InvalidInput { .. }));
    assert_eq!(scheduler.list_stacks().await.unwrap().len(), 1);
}
