use rally_core::{
    db::activity_queries::ActivityFields,
    models::{ActivityStatus, PlanDraft, PlanStatus, ScheduleBlock},
    Database, PlannerError,
};
use serde_json::json;
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn create_activity(db: &mut Database) -> u64 {
    db.create_activity(&ActivityFields {
        title: Some("Picnic"),
        ..Default::default()
    })
    .expect("Failed to create activity")
    .id
}

fn draft(title: &str) -> PlanDraft {
    PlanDraft {
        title: title.to_string(),
        description: "Bring blankets.".to_string(),
        schedule: vec![ScheduleBlock {
            time: "12:00 PM".to_string(),
            activity: "Meet at the location".to_string(),
        }],
    }
}

#[test]
fn test_reopening_is_idempotent() {
    let (temp_file, mut db) = create_test_db();
    let id = create_activity(&mut db);
    drop(db);

    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    assert!(db.activity_exists(id).expect("Failed to query activity"));
}

#[test]
fn test_preference_last_write_wins() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (participant, _) = db
        .add_participant(activity_id, "555-0100", None, None)
        .expect("Failed to add participant");

    db.save_preference(activity_id, Some(participant.id), "activity", "activity_type", &json!("Food"))
        .expect("Failed to save preference");
    db.save_preference(activity_id, Some(participant.id), "activity", "activity_type", &json!(["Sports", "Outdoor"]))
        .expect("Failed to save preference");

    let prefs = db
        .get_participant_preferences(participant.id)
        .expect("Failed to get preferences");
    assert_eq!(prefs["activity"]["activity_type"], json!(["Sports", "Outdoor"]));
    assert_eq!(prefs["activity"].len(), 1);
}

#[test]
fn test_group_preferences_are_unique_per_key() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);

    db.save_preference(activity_id, None, "timing", "preferred_day", &json!("Weekday"))
        .expect("Failed to save preference");
    db.save_preference(activity_id, None, "timing", "preferred_day", &json!("Weekend"))
        .expect("Failed to save preference");

    let set = db
        .get_all_preferences(activity_id)
        .expect("Failed to get preferences");
    assert_eq!(set.group["timing"]["preferred_day"], json!("Weekend"));
    assert!(set.participants.is_empty());
}

#[test]
fn test_values_round_trip_and_malformed_json_stays_text() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (participant, _) = db
        .add_participant(activity_id, "555-0100", None, None)
        .expect("Failed to add participant");

    db.save_preferences(
        activity_id,
        Some(participant.id),
        &[
            ("group".to_string(), "has_children".to_string(), json!(true)),
            ("group".to_string(), "group_size".to_string(), json!(5)),
            ("meals".to_string(), "meals_included".to_string(), json!("[\"Lunch\",")),
        ],
    )
    .expect("Failed to save preferences");

    let prefs = db
        .get_participant_preferences(participant.id)
        .expect("Failed to get preferences");
    assert_eq!(prefs["group"]["has_children"], json!(true));
    assert_eq!(prefs["group"]["group_size"], json!(5));
    assert_eq!(prefs["meals"]["meals_included"], json!("[\"Lunch\","));
}

#[test]
fn test_json_looking_text_keeps_its_type() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (participant, _) = db
        .add_participant(activity_id, "555-0100", None, None)
        .expect("Failed to add participant");

    let texts = ["null", "true", "\"quoted\"", "[\"x\"]"];
    for (i, text) in texts.iter().enumerate() {
        db.save_preference(activity_id, Some(participant.id), "requirements", &format!("note_{i}"), &json!(text))
            .expect("Failed to save preference");
    }

    let prefs = db
        .get_participant_preferences(participant.id)
        .expect("Failed to get preferences");
    for (i, text) in texts.iter().enumerate() {
        assert_eq!(prefs["requirements"][format!("note_{i}").as_str()], json!(text));
    }
}

#[test]
fn test_participant_phone_dedupe() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let other_activity = create_activity(&mut db);

    let (first, created) = db
        .add_participant(activity_id, "555-0100", None, Some("Ana"))
        .expect("Failed to add participant");
    assert!(created);

    let (again, created) = db
        .add_participant(activity_id, "555-0100", Some("ana@example.com"), Some("Anna"))
        .expect("Failed to add participant");
    assert!(!created);
    assert_eq!(again.id, first.id);
    assert_eq!(again.name.as_deref(), Some("Ana"));
    assert_eq!(again.email.as_deref(), Some("ana@example.com"));

    let (elsewhere, created) = db
        .add_participant(other_activity, "555-0100", None, None)
        .expect("Failed to add participant");
    assert!(created);
    assert_ne!(elsewhere.id, first.id);
}

#[test]
fn test_plan_history_keeps_revisions() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);

    let original = db
        .create_plan(activity_id, &draft("First"), PlanStatus::Draft, None, Some(ActivityStatus::Planned))
        .expect("Failed to create plan");
    let revised = db
        .create_plan(activity_id, &draft("Second"), PlanStatus::Revised, Some(original.id), None)
        .expect("Failed to create plan");

    let plans = db.list_plans(activity_id).expect("Failed to list plans");
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].id, revised.id);
    assert_eq!(plans[0].revised_from, Some(original.id));
    assert_eq!(plans[1].schedule, draft("First").schedule);

    let current = db
        .current_plan(activity_id)
        .expect("Failed to get current plan")
        .expect("Activity should have a plan");
    assert_eq!(current.id, revised.id);

    let activity = db
        .get_activity(activity_id)
        .expect("Failed to get activity")
        .expect("Activity should exist");
    assert_eq!(activity.status, ActivityStatus::Planned);
}

#[test]
fn test_status_transitions_are_validated() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let plan = db
        .create_plan(activity_id, &draft("Plan"), PlanStatus::Draft, None, None)
        .expect("Failed to create plan");

    let final_plan = db
        .transition_plan(plan.id, PlanStatus::Final, Some(ActivityStatus::Finalized))
        .expect("Failed to finalize plan");
    assert_eq!(final_plan.status, PlanStatus::Final);

    let result = db.transition_plan(plan.id, PlanStatus::PendingApproval, None);
    assert!(matches!(result, Err(PlannerError::InvalidTransition { .. })));

    let result = db.transition_plan(999, PlanStatus::Final, None);
    assert!(matches!(result, Err(PlannerError::PlanNotFound { id: 999 })));
}

#[test]
fn test_approval_is_replaced() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (participant, _) = db
        .add_participant(activity_id, "555-0100", None, None)
        .expect("Failed to add participant");
    let plan = db
        .create_plan(activity_id, &draft("Plan"), PlanStatus::PendingApproval, None, None)
        .expect("Failed to create plan");

    db.record_approval(plan.id, participant.id, false, Some("Too early"))
        .expect("Failed to record approval");
    db.record_approval(plan.id, participant.id, true, None)
        .expect("Failed to record approval");

    let approvals = db.get_approvals(plan.id).expect("Failed to get approvals");
    assert_eq!(approvals.len(), 1);
    assert!(approvals[0].approved);
    assert_eq!(approvals[0].feedback, None);
}

#[test]
fn test_participants_and_approvals_are_listed() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (first, _) = db
        .add_participant(activity_id, "555-0100", None, Some("Ana"))
        .expect("Failed to add participant");
    let (second, _) = db
        .add_participant(activity_id, "555-0101", None, Some("Ben"))
        .expect("Failed to add participant");

    let participants = db
        .get_participants(activity_id)
        .expect("Failed to get participants");
    let phones: Vec<_> = participants.iter().map(|p| p.phone_number.as_str()).collect();
    assert_eq!(phones, vec!["555-0100", "555-0101"]);

    let plan = db
        .create_plan(activity_id, &draft("Plan"), PlanStatus::PendingApproval, None, None)
        .expect("Failed to create plan");
    db.record_approval(plan.id, second.id, false, Some("Too early"))
        .expect("Failed to record approval");
    db.record_approval(plan.id, first.id, true, None)
        .expect("Failed to record approval");

    let approvals = db.get_approvals(plan.id).expect("Failed to get approvals");
    let votes: Vec<_> = approvals.iter().map(|a| (a.participant_id, a.approved)).collect();
    assert_eq!(votes, vec![(first.id, true), (second.id, false)]);
}

#[test]
fn test_delete_activity_cascades() {
    let (_temp_file, mut db) = create_test_db();
    let activity_id = create_activity(&mut db);
    let (participant, _) = db
        .add_participant(activity_id, "555-0100", None, None)
        .expect("Failed to add participant");
    db.save_preference(activity_id, Some(participant.id), "group", "group_size", &json!(3))
        .expect("Failed to save preference");
    let plan = db
        .create_plan(activity_id, &draft("Plan"), PlanStatus::Draft, None, None)
        .expect("Failed to create plan");

    assert!(db.delete_activity(activity_id).expect("Failed to delete activity"));
    assert!(!db.delete_activity(activity_id).expect("Failed to delete activity"));

    assert!(db.get_participant(participant.id).expect("Failed to query").is_none());
    assert!(db.get_plan(plan.id).expect("Failed to query").is_none());
    assert!(db
        .get_participant_preferences(participant.id)
        .expect("Failed to query")
        .is_empty());
}

#[test]
fn test_list_activities_by_status() {
    let (_temp_file, mut db) = create_test_db();
    let first = create_activity(&mut db);
    let second = create_activity(&mut db);
    assert!(db
        .set_activity_status(second, ActivityStatus::Finalized)
        .expect("Failed to set status"));

    let all = db.list_activities(None).expect("Failed to list activities");
    assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second, first]);

    let planning = db
        .list_activities(Some(ActivityStatus::Planning))
        .expect("Failed to list activities");
    assert_eq!(planning.len(), 1);
    assert_eq!(planning[0].id, first);
}
