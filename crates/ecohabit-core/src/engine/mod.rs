//! Task recommendation engine.
//!
//! A pure function of the questionnaire snapshot, composed of three stages:
//!
//! 1. **Hardness extraction**: classify each response into a 0-5 difficulty
//!    rating ([`hardness`])
//! 2. **Impact scoring**: combine the rating with the template's
//!    environmental savings into a single score, sorted descending
//!    ([`scoring`])
//! 3. **Shortlist selection**: fill the user's remaining active-task quota
//!    from the sorted candidates ([`select`])
//!
//! The engine holds no state and performs no I/O; loading the snapshot and
//! persisting the selected assignments are the caller's responsibility.
//! Calls for different users need no coordination. For a single user the
//! caller must serialize read-then-write cycles over that user's task set,
//! since the engine only trusts the snapshot it is handed.

pub mod hardness;
pub mod scoring;
pub mod select;

pub use hardness::{classify, Hardness};
pub use select::select_shortlist;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::catalog::{Question, QuestionId, TaskTemplate, TemplateId};
use crate::questionnaire::QuestionnaireResponse;
use crate::task::TaskInstance;

use scoring::impact_score;

/// Tunable constants for the recommendation engine.
///
/// Injected into every run rather than read from process-wide state; the
/// defaults are the shipped policy values.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Probability the user succeeds at hardness 0..=5 when the task is
    /// recommended to them.
    pub recommended_success: [f64; 6],
    /// Probability of unprompted adherence at hardness 0..=5. Entry 0 is
    /// 0.95^2: a user already practicing the behavior keeps it up with high
    /// probability even without a nudge. Any real difficulty gets zero
    /// unprompted adherence.
    pub unprompted_success: [f64; 6],
    /// Average weekly CO2 footprint (kg) used to normalize carbon savings.
    pub avg_weekly_co2_kg: f64,
    /// Average weekly waste footprint (kg) used to normalize waste savings.
    pub avg_weekly_waste_kg: f64,
    /// Maximum concurrently in-progress task instances per user.
    pub max_active_tasks: usize,
    /// Flight-frequency question. Hardness-0 responses to it are dropped
    /// from scoring entirely: flight tasks are only worth recommending to
    /// users who actually fly.
    pub flight_question_id: Option<QuestionId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommended_success: [0.95, 0.90, 0.75, 0.50, 0.15, 0.01],
            unprompted_success: [0.95 * 0.95, 0.0, 0.0, 0.0, 0.0, 0.0],
            avg_weekly_co2_kg: 192.0,
            avg_weekly_waste_kg: 7.5,
            max_active_tasks: 3,
            flight_question_id: Some(4),
        }
    }
}

/// One scored recommendation candidate.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub template: &'a TaskTemplate,
    pub hardness: Hardness,
    pub score: f64,
}

/// Score every usable response and sort descending by score.
///
/// Responses that cannot be joined to the catalog or classified are logged
/// and skipped rather than failing the run. The sort is stable, so equal
/// scores keep response order.
pub fn rank_candidates<'a>(
    config: &EngineConfig,
    questions: &[Question],
    responses: &[QuestionnaireResponse],
    templates: &'a [TaskTemplate],
    completed: &[TaskInstance],
) -> Vec<ScoredCandidate<'a>> {
    let questions_by_id: HashMap<QuestionId, &Question> =
        questions.iter().map(|q| (q.id, q)).collect();
    let templates_by_id: HashMap<TemplateId, &'a TaskTemplate> =
        templates.iter().map(|t| (t.id, t)).collect();
    let completed_templates: HashSet<TemplateId> =
        completed.iter().map(|t| t.template_id).collect();

    let mut candidates = Vec::new();
    for response in responses {
        let Some(question) = questions_by_id.get(&response.question_id).copied() else {
            warn!(
                question_id = response.question_id,
                user_id = response.user_id,
                "skipping response to unknown question"
            );
            continue;
        };
        let Some(template) = templates_by_id.get(&question.template_id).copied() else {
            warn!(
                question_id = question.id,
                template_id = question.template_id,
                "skipping response: question joins to unknown template"
            );
            continue;
        };
        let hardness = match classify(response, question) {
            Ok(hardness) => hardness,
            Err(err) => {
                warn!(%err, "skipping unclassifiable response");
                continue;
            }
        };

        if hardness.is_already_adopted() && config.flight_question_id == Some(question.id) {
            debug!(question_id = question.id, "dropping flight question for a non-flyer");
            continue;
        }

        let score = impact_score(
            config,
            hardness,
            template,
            completed_templates.contains(&template.id),
        );
        candidates.push(ScoredCandidate {
            template,
            hardness,
            score,
        });
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Compute the ordered shortlist of templates to assign to a user.
///
/// Composes classification, scoring, and selection over one consistent
/// snapshot of the user's data. Identical snapshots always produce identical
/// output; instantiating and persisting the returned templates is the
/// caller's responsibility.
pub fn recommend<'a>(
    config: &EngineConfig,
    questions: &[Question],
    responses: &[QuestionnaireResponse],
    templates: &'a [TaskTemplate],
    incomplete: &[TaskInstance],
    completed: &[TaskInstance],
) -> Vec<&'a TaskTemplate> {
    if incomplete.len() >= config.max_active_tasks {
        return Vec::new();
    }

    let candidates = rank_candidates(config, questions, responses, templates, completed);
    select_shortlist(&candidates, incomplete, config.max_active_tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Polarity;

    fn make_template(id: TemplateId, carbon_savings: f64, waste_savings: f64) -> TaskTemplate {
        TaskTemplate {
            id,
            desc: format!("template {id}"),
            user_points: 10,
            carbon_savings,
            waste_savings,
            max_completions: 1,
        }
    }

    fn make_question(id: QuestionId, polarity: Polarity) -> Question {
        Question {
            id,
            template_id: id,
            prompt: format!("question {id}"),
            followup: "How hard would it be?".to_string(),
            polarity,
        }
    }

    fn make_response(question_id: QuestionId, answer1: &str, answer2: Option<&str>) -> QuestionnaireResponse {
        QuestionnaireResponse::new(1, question_id, answer1, answer2.map(str::to_string))
    }

    /// The worked two-template example: a mid-hardness recycling response
    /// beats nothing, and the flight response is dropped because the user
    /// does not fly.
    #[test]
    fn recommends_scored_template_and_drops_non_flyer() {
        let config = EngineConfig::default();
        let templates = [make_template(1, 0.43, 0.40), make_template(4, 25.00, 0.00)];
        let questions = [make_question(1, Polarity::No), make_question(4, Polarity::No)];
        let responses = [
            make_response(1, "no", Some("3")),
            make_response(4, "yes", None),
        ];

        let candidates = rank_candidates(&config, &questions, &responses, &templates, &[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].template.id, 1);
        assert!((candidates[0].score - 0.02779).abs() < 1e-4);

        let selected = recommend(&config, &questions, &responses, &templates, &[], &[]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 1);
    }

    #[test]
    fn flight_drop_only_applies_to_the_configured_question() {
        let config = EngineConfig::default();
        let templates = [make_template(2, 0.20, 0.20)];
        let questions = [make_question(2, Polarity::No)];
        // hardness 0 on a non-flight question still scores (maintenance lift)
        let responses = [make_response(2, "yes", None)];

        let candidates = rank_candidates(&config, &questions, &responses, &templates, &[]);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].hardness.is_already_adopted());
        assert!(candidates[0].score > 0.0);
    }

    #[test]
    fn candidates_sort_descending_with_stable_ties() {
        let config = EngineConfig::default();
        let templates = [
            make_template(1, 1.0, 0.0),
            make_template(2, 1.0, 0.0),
            make_template(3, 50.0, 0.0),
        ];
        let questions: Vec<_> = (1..=3).map(|id| make_question(id, Polarity::No)).collect();
        let responses: Vec<_> = (1..=3)
            .map(|id| make_response(id, "no", Some("2")))
            .collect();

        let candidates = rank_candidates(&config, &questions, &responses, &templates, &[]);
        assert_eq!(candidates[0].template.id, 3);
        // equal scores keep response order
        assert_eq!(candidates[1].template.id, 1);
        assert_eq!(candidates[2].template.id, 2);
    }

    #[test]
    fn full_quota_short_circuits() {
        let config = EngineConfig::default();
        let templates = [make_template(1, 0.43, 0.40)];
        let questions = [make_question(1, Polarity::No)];
        let responses = [make_response(1, "no", Some("3"))];
        let incomplete: Vec<_> = [5, 6, 7]
            .into_iter()
            .map(|id| TaskInstance::assign(&make_template(id, 1.0, 0.0), 1))
            .collect();

        let selected = recommend(&config, &questions, &responses, &templates, &incomplete, &[]);
        assert!(selected.is_empty());
    }

    #[test]
    fn unparsable_and_unjoined_responses_are_skipped_not_fatal() {
        let config = EngineConfig::default();
        let templates = [make_template(1, 0.43, 0.40)];
        let questions = [make_question(1, Polarity::No), make_question(9, Polarity::No)];
        let responses = [
            make_response(77, "no", Some("3")),  // unknown question
            make_response(9, "no", Some("3")),   // question joins to missing template
            make_response(1, "no", Some("bad")), // unparsable hardness
            make_response(1, "no", Some("2")),   // fine
        ];

        let candidates = rank_candidates(&config, &questions, &responses, &templates, &[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].hardness.value(), 2);
    }

    #[test]
    fn completed_template_is_never_the_top_pick() {
        let config = EngineConfig::default();
        let templates = [make_template(1, 50.0, 5.0), make_template(2, 0.20, 0.20)];
        let questions = [make_question(1, Polarity::No), make_question(2, Polarity::No)];
        let responses = [
            make_response(1, "no", Some("1")),
            make_response(2, "no", Some("1")),
        ];
        let completed = [TaskInstance::assign(&templates[0], 1)];

        let candidates = rank_candidates(&config, &questions, &responses, &templates, &completed);
        assert_eq!(candidates[0].template.id, 2);
        assert_eq!(candidates[1].score, 0.0);
    }

    #[test]
    fn no_responses_means_no_recommendations() {
        let config = EngineConfig::default();
        let templates = [make_template(1, 0.43, 0.40)];
        let questions = [make_question(1, Polarity::No)];

        // capacity is free, but selection only walks the scored list
        let selected = recommend(&config, &questions, &[], &templates, &[], &[]);
        assert!(selected.is_empty());
    }

    #[test]
    fn identical_snapshots_produce_identical_output() {
        let config = EngineConfig::default();
        let templates: Vec<_> = (1..=6).map(|id| make_template(id, id as f64, 0.1)).collect();
        let questions: Vec<_> = (1..=6).map(|id| make_question(id, Polarity::No)).collect();
        let responses: Vec<_> = (1..=6)
            .map(|id| make_response(id, "no", Some("2")))
            .collect();

        let first = recommend(&config, &questions, &responses, &templates, &[], &[]);
        let second = recommend(&config, &questions, &responses, &templates, &[], &[]);
        assert_eq!(
            first.iter().map(|t| t.id).collect::<Vec<_>>(),
            second.iter().map(|t| t.id).collect::<Vec<_>>()
        );
    }
}
