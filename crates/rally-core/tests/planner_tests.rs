mod common;

use std::collections::BTreeMap;

use rally_core::{
    models::{ActivityStatus, ParticipantStatus, PlanStatus},
    params::{
        ActivityId, AddParticipant, ConversationInput, CreateActivity, Id, RecordApproval,
        RevisePlan, SubmitAnswers,
    },
};
use serde_json::{json, Value};

fn answers(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_planning_workflow() {
    let (_temp_dir, planner) = common::create_test_planner().await;

    let activity = planner
        .create_activity(&CreateActivity {
            title: Some("Birthday brunch".to_string()),
            description: Some("Celebrating Jo".to_string()),
            start_time: Some("9 am".to_string()),
            location_address: None,
        })
        .await
        .expect("Failed to create activity");
    assert_eq!(activity.start_time.as_deref(), Some("9:00 AM"));

    let mut participant_ids = Vec::new();
    for (phone, name, meals) in [
        ("555-0100", "Jo", json!(["Breakfast", "Snacks"])),
        ("555-0101", "Kim", json!(["Breakfast"])),
        ("555-0102", "Lee", json!(["None"])),
    ] {
        let participant = planner
            .add_participant(&AddParticipant {
                activity_id: activity.id,
                phone_number: phone.to_string(),
                ..Default::default()
            })
            .await
            .expect("Failed to add participant");

        let submission = planner
            .submit_answers(&SubmitAnswers {
                participant_id: participant.id,
                answers: answers(&[
                    ("name", json!(name)),
                    ("email", json!(format!("{}@example.com", name.to_lowercase()))),
                    ("allow_group_text", json!(true)),
                    ("activity_type", json!(["Food"])),
                    ("preferred_day", json!("Weekend morning")),
                    ("duration", json!("2-4 hours")),
                    ("budget_range", json!("$25-$50")),
                    ("meals_included", json!(meals)),
                ]),
            })
            .await
            .expect("Failed to submit answers");
        assert_eq!(submission.participant.name.as_deref(), Some(name));
        assert_eq!(submission.participant.status, ParticipantStatus::Active);
        participant_ids.push(participant.id);
    }

    planner
        .process_conversation_input(&ConversationInput {
            activity_id: activity.id,
            participant_id: Some(participant_ids[0]),
            text: "Somewhere with outdoor seating please".to_string(),
        })
        .await
        .expect("Failed to process conversation input");

    let stats = planner
        .response_stats(&ActivityId {
            activity_id: activity.id,
        })
        .await
        .expect("Failed to get stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.responded, 3);

    let plan = planner
        .generate_plan(&ActivityId {
            activity_id: activity.id,
        })
        .await
        .expect("Failed to generate plan");

    assert_eq!(plan.title, "Food Tour - Weekend Morning Activity");
    assert!(plan.description.contains("The budget is about $25-$50 per person."));
    assert!(plan.description.contains("The plan includes Breakfast."));
    assert!(plan
        .description
        .contains("Additional participant requests:\n- Somewhere with outdoor seating please"));
    assert!(plan.description.contains("Proposed Date: Saturday, June 08, 2024"));

    let labels: Vec<&str> = plan.schedule.iter().map(|b| b.activity.as_str()).collect();
    assert_eq!(labels.first(), Some(&"Meet at the location"));
    assert_eq!(labels.last(), Some(&"Activity concludes"));
    assert!(labels.contains(&"Breakfast"));
    assert_eq!(plan.schedule[0].time, "9:00 AM");
    assert_eq!(plan.schedule.last().map(|b| b.time.as_str()), Some("12:00 PM"));

    let revised = planner
        .revise_plan(&RevisePlan {
            plan_id: plan.id,
            feedback: "Could we meet at 10 instead?".to_string(),
            participant_id: Some(participant_ids[1]),
        })
        .await
        .expect("Failed to revise plan");
    assert_eq!(revised.revised_from, Some(plan.id));
    assert_eq!(revised.schedule, plan.schedule);

    planner
        .request_approval(&Id { id: revised.id })
        .await
        .expect("Failed to request approval");

    for (i, participant_id) in participant_ids.iter().enumerate() {
        planner
            .record_approval(&RecordApproval {
                plan_id: revised.id,
                participant_id: *participant_id,
                approved: i != 2,
                feedback: (i == 2).then(|| "I'll be late".to_string()),
            })
            .await
            .expect("Failed to record approval");
    }

    let final_plan = planner
        .finalize_plan(&Id { id: revised.id })
        .await
        .expect("Failed to finalize plan");
    assert_eq!(final_plan.status, PlanStatus::Final);
    assert_eq!(final_plan.approvals.iter().filter(|a| a.approved).count(), 2);

    let activity = planner
        .get_activity(&Id { id: activity.id })
        .await
        .expect("Failed to get activity");
    assert_eq!(activity.status, ActivityStatus::Finalized);
}

#[tokio::test]
async fn test_known_limitation_no_dinner_for_morning_outing() {
    let (_temp_dir, planner) = common::create_test_planner().await;

    let activity = planner
        .create_activity(&CreateActivity {
            start_time: Some("9:00 AM".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create activity");
    let participant = planner
        .add_participant(&AddParticipant {
            activity_id: activity.id,
            phone_number: "555-0100".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to add participant");
    planner
        .submit_answers(&SubmitAnswers {
            participant_id: participant.id,
            answers: answers(&[
                ("duration", json!("2-4 hours")),
                ("meals_included", json!(["Dinner"])),
            ]),
        })
        .await
        .expect("Failed to submit answers");

    let plan = planner
        .generate_plan(&ActivityId {
            activity_id: activity.id,
        })
        .await
        .expect("Failed to generate plan");

    assert!(plan.description.contains("The plan includes Dinner."));
    assert!(plan.schedule.iter().all(|b| b.activity != "Dinner"));
}

#[tokio::test]
async fn test_conversation_text_is_quoted_as_written() {
    let (_temp_dir, planner) = common::create_test_planner().await;

    let activity = planner
        .create_activity(&CreateActivity::default())
        .await
        .expect("Failed to create activity");
    let participant = planner
        .add_participant(&AddParticipant {
            activity_id: activity.id,
            phone_number: "555-0100".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to add participant");
    planner
        .process_conversation_input(&ConversationInput {
            activity_id: activity.id,
            participant_id: Some(participant.id),
            text: "null".to_string(),
        })
        .await
        .expect("Failed to process conversation input");

    let plan = planner
        .generate_plan(&ActivityId {
            activity_id: activity.id,
        })
        .await
        .expect("Failed to generate plan");

    assert!(plan
        .description
        .contains("Additional participant requests:\n- null"));
}
