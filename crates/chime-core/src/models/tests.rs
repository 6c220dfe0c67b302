use jiff::{tz::TimeZone, Timestamp};

use crate::{
    error::ChimeError,
    models::{Chain, Step, StepKind, StepMetadata},
};

fn step(id: &str, kind: &str, offset: Option<i64>) -> Step {
    Step {
        id: id.to_string(),
        base_id: id.to_string(),
        kind: kind.parse().unwrap(),
        offset_from_first: offset,
        snoozed_until: None,
        allow_snooze: true,
        metadata: StepMetadata {
            title: format!("Title {id}"),
            ..StepMetadata::default()
        },
    }
}

fn chain(steps: Vec<Step>) -> Chain {
    Chain {
        stack_id: "morning".to_string(),
        first_target: "2024-05-01T06:30:00Z".parse().unwrap(),
        anchor_offset: 0,
        steps,
    }
}

#[test]
fn test_fixed_step_has_no_chain_offset() {
    let mut fixed = step("leave", "fixed:08:00", None);
    assert!(fixed.is_fixed());
    assert_eq!(fixed.chain_offset(), None);

    // A stray offset on a fixed step is ignored for ordering.
    fixed.offset_from_first = Some(42);
    assert_eq!(fixed.chain_offset(), None);
}

#[test]
fn test_pending_snooze_expires() {
    let mut fixed = step("leave", "fixed:08:00", None);
    let until: Timestamp = "2024-05-01T08:05:00Z".parse().unwrap();
    fixed.snoozed_until = Some(until);

    assert_eq!(fixed.pending_snooze("2024-05-01T08:00:00Z".parse().unwrap()), Some(until));
    assert_eq!(fixed.pending_snooze("2024-05-01T08:06:00Z".parse().unwrap()), None);
}

#[test]
fn test_anchored_fire_time_honours_anchor_offset() {
    let mut chain = chain(vec![
        step("wake", "timer:0", Some(180)),
        step("coffee", "relative:120", Some(300)),
    ]);
    chain.first_target = "2024-05-01T06:33:00Z".parse().unwrap();
    chain.anchor_offset = 180;

    assert_eq!(
        chain.anchored_fire_time(300).unwrap(),
        "2024-05-01T06:35:00Z".parse::<Timestamp>().unwrap()
    );
    assert_eq!(chain.lead_offset(), Some(180));
}

#[test]
fn test_schedule_mixes_fixed_and_anchored_steps() {
    let chain = chain(vec![
        step("wake", "timer:0", Some(0)),
        step("leave", "fixed:08:00", None),
        step("coffee", "relative:600", Some(600)),
    ]);
    let now: Timestamp = "2024-05-01T06:00:00Z".parse().unwrap();

    let schedule = chain.schedule(now, &TimeZone::UTC).unwrap();
    let fire_at: Vec<String> = schedule.iter().map(|s| s.fire_at.to_string()).collect();
    assert_eq!(
        fire_at,
        vec![
            "2024-05-01T06:30:00Z",
            "2024-05-01T08:00:00Z",
            "2024-05-01T06:40:00Z",
        ]
    );
    assert_eq!(schedule[1].title, "Title leave");
}

#[test]
fn test_validate_order_skips_fixed_steps() {
    let ordered = chain(vec![
        step("a", "timer:0", Some(0)),
        step("f", "fixed:05:00", None),
        step("b", "relative:0", Some(0)),
        step("c", "relative:60", Some(60)),
    ]);
    assert!(ordered.validate_order().is_ok());

    let unordered = chain(vec![
        step("a", "timer:0", Some(120)),
        step("b", "relative:-60", Some(60)),
    ]);
    assert!(matches!(
        unordered.validate_order(),
        Err(ChimeError::InvalidInput { .. })
    ));
}

#[test]
fn test_chain_display() {
    let mut chain = chain(vec![
        step("wake", "timer:0", Some(0)),
        step("leave", "fixed:08:00@1,2,3,4,5", None),
    ]);
    chain.steps[0].id = "wake#1".to_string();
    chain.steps[1].allow_snooze = false;
    let output = chain.to_string();

    assert!(output.contains("# Stack morning"));
    assert!(output.contains("- Anchor: 2024-05-01T06:30:00Z"));
    assert!(output.contains("### Title wake (`wake#1`)"));
    assert!(output.contains("- Snoozed from: `wake`"));
    assert!(output.contains("- Offset: +0s"));
    assert!(output.contains("- Kind: `fixed:08:00@1,2,3,4,5`"));
    assert!(output.contains("- Offset: fixed time"));
    assert!(output.contains("- Snooze: disabled"));
}

#[test]
fn test_empty_chain_display() {
    let output = chain(vec![]).to_string();
    assert!(output.contains("No active steps in this stack."));
    assert!(!output.contains("## Steps"));
}

#[test]
fn test_step_kind_json_in_chain() {
    let chain = chain(vec![step("wake", "timer:600/2d", Some(0))]);
    let json = serde_json::to_value(&chain).unwrap();
    assert_eq!(json["steps"][0]["kind"]["type"], "timer");
    assert_eq!(json["steps"][0]["kind"]["every_n_days"], 2);

    let back: Chain = serde_json::from_value(json).unwrap();
    assert_eq!(back, chain);
    assert!(matches!(back.steps[0].kind, StepKind::Timer { .. }));
}
