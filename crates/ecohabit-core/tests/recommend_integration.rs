//! Integration tests for the full store -> engine -> assignment flow.
//!
//! These run the builtin catalog against an in-memory store the way the CLI
//! does: record a questionnaire, recommend, persist the shortlist, progress
//! instances to completion, and refill the freed quota.

use ecohabit_core::catalog::{builtin_questions, builtin_templates};
use ecohabit_core::{recommend, EngineConfig, HabitDb, QuestionnaireResponse, TaskInstance, UserId};

fn seeded_db() -> HabitDb {
    let db = HabitDb::open_memory().unwrap();
    db.install_catalog(&builtin_questions(), &builtin_templates())
        .unwrap();
    db
}

/// A user who recycles and drinks plant milk already, flies, eats meat, and
/// finds bag-bringing easy.
fn record_full_questionnaire(db: &HabitDb, user_id: UserId) {
    let answers: [(i64, &str, Option<&str>); 6] = [
        (1, "yes", None),      // already recycles
        (2, "no", Some("2")),  // no bag, easy to adopt
        (3, "yes", Some("5")), // eats meat, very hard to stop
        (4, "yes", Some("5")), // flies, very hard to fly less
        (5, "no", Some("4")),  // uses single-use containers
        (6, "no", None),       // already off dairy milk
    ];
    for (question_id, answer1, answer2) in answers {
        db.record_response(&QuestionnaireResponse::new(
            user_id,
            question_id,
            answer1,
            answer2.map(str::to_string),
        ))
        .unwrap();
    }
}

fn shortlist_ids(db: &HabitDb, config: &EngineConfig, user_id: UserId) -> Vec<i64> {
    let questions = db.list_questions().unwrap();
    let templates = db.list_templates().unwrap();
    let responses = db.responses_for_user(user_id).unwrap();
    let incomplete = db.incomplete_tasks(user_id).unwrap();
    let completed = db.completed_tasks(user_id).unwrap();

    recommend(
        config,
        &questions,
        &responses,
        &templates,
        &incomplete,
        &completed,
    )
    .into_iter()
    .map(|t| t.id)
    .collect()
}

#[test]
fn fresh_user_gets_highest_impact_shortlist() {
    let db = seeded_db();
    let user = db.create_user("fresh").unwrap();
    record_full_questionnaire(&db, user.id);

    // Bag-bringing wins on easy adoption; single-use containers and the
    // already-adopted recycling maintenance follow.
    let ids = shortlist_ids(&db, &EngineConfig::default(), user.id);
    assert_eq!(ids, vec![2, 5, 1]);
}

#[test]
fn unanswered_questionnaire_yields_no_recommendations() {
    let db = seeded_db();
    let user = db.create_user("silent").unwrap();

    let ids = shortlist_ids(&db, &EngineConfig::default(), user.id);
    assert!(ids.is_empty());
}

#[test]
fn full_quota_blocks_new_assignments() {
    let db = seeded_db();
    let user = db.create_user("busy").unwrap();
    record_full_questionnaire(&db, user.id);
    let templates = db.list_templates().unwrap();

    for template in templates.iter().take(3) {
        db.assign_task(&TaskInstance::assign(template, user.id))
            .unwrap();
    }

    let ids = shortlist_ids(&db, &EngineConfig::default(), user.id);
    assert!(ids.is_empty());
}

#[test]
fn completing_an_instance_frees_quota_without_re_recommending_it() {
    let db = seeded_db();
    let config = EngineConfig::default();
    let user = db.create_user("progressing").unwrap();
    record_full_questionnaire(&db, user.id);
    let templates = db.list_templates().unwrap();

    // persist the initial shortlist [2, 5, 1]
    let initial = shortlist_ids(&db, &config, user.id);
    let mut assigned = Vec::new();
    for id in &initial {
        let template = templates.iter().find(|t| t.id == *id).unwrap();
        let task = TaskInstance::assign(template, user.id);
        db.assign_task(&task).unwrap();
        assigned.push(task);
    }

    // complete the bag template (2 completions required)
    let bag_task = &assigned[0];
    assert!(!db.record_progress(&bag_task.id).unwrap().completed_now);
    assert!(db.record_progress(&bag_task.id).unwrap().completed_now);

    // 10 points per completion
    assert_eq!(db.get_user(user.id).unwrap().unwrap().points, 20);

    // one slot free; the completed template is zeroed and the other two are
    // in progress, so the flight task is next by impact
    let refill = shortlist_ids(&db, &config, user.id);
    assert_eq!(refill, vec![4]);
}

#[test]
fn identical_snapshots_recommend_identically() {
    let db = seeded_db();
    let user = db.create_user("stable").unwrap();
    record_full_questionnaire(&db, user.id);

    let config = EngineConfig::default();
    assert_eq!(
        shortlist_ids(&db, &config, user.id),
        shortlist_ids(&db, &config, user.id)
    );
}
