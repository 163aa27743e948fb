//! Tests for status parsing and response statistics.

use jiff::Timestamp;

use super::*;

fn participant(id: u64, status: ParticipantStatus) -> Participant {
    Participant {
        id,
        activity_id: 1,
        name: None,
        phone_number: format!("+1555000{id:04}"),
        email: None,
        allow_group_text: false,
        status,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

#[test]
fn test_plan_status_round_trip() {
    for status in [
        PlanStatus::Draft,
        PlanStatus::Revised,
        PlanStatus::PendingApproval,
        PlanStatus::Final,
    ] {
        assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
    }
    assert!("archived".parse::<PlanStatus>().is_err());
}

#[test]
fn test_plan_status_serde_matches_storage_form() {
    let json = serde_json::to_string(&PlanStatus::PendingApproval).unwrap();
    assert_eq!(json, "\"pending_approval\"");
}

#[test]
fn test_plan_transitions() {
    assert!(PlanStatus::Draft.can_transition_to(PlanStatus::Revised));
    assert!(PlanStatus::Revised.can_transition_to(PlanStatus::Revised));
    assert!(PlanStatus::PendingApproval.can_transition_to(PlanStatus::Final));
    assert!(!PlanStatus::PendingApproval.can_transition_to(PlanStatus::PendingApproval));
    assert!(!PlanStatus::Final.can_transition_to(PlanStatus::Final));
    assert!(!PlanStatus::Revised.can_transition_to(PlanStatus::Draft));
}

#[test]
fn test_activity_and_participant_status_parse() {
    assert_eq!("Planned".parse::<ActivityStatus>().unwrap(), ActivityStatus::Planned);
    assert_eq!(
        "complete".parse::<ParticipantStatus>().unwrap(),
        ParticipantStatus::Complete
    );
    assert!("done".parse::<ParticipantStatus>().is_err());
}

#[test]
fn test_response_stats() {
    let participants = vec![
        participant(1, ParticipantStatus::Invited),
        participant(2, ParticipantStatus::Active),
        participant(3, ParticipantStatus::Complete),
        participant(4, ParticipantStatus::Complete),
    ];
    let stats = ResponseStats::from_participants(&participants);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.responded, 3);
    assert_eq!(stats.completed, 2);
    assert!((stats.response_rate - 75.0).abs() < f64::EPSILON);
    assert!((stats.completion_rate - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_response_stats_empty() {
    let stats = ResponseStats::from_participants(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.response_rate, 0.0);
}
