//! Shortlist selection under the active-task quota.

use crate::catalog::TaskTemplate;
use crate::task::TaskInstance;

use super::ScoredCandidate;

/// Walk candidates in score order and fill the user's remaining capacity.
///
/// Candidates whose template is already in progress are skipped. Returns
/// fewer templates than the remaining capacity only when the candidate list
/// runs out; returns nothing when the user already holds `max_active`
/// incomplete instances (or more, if an external writer overfilled the set).
pub fn select_shortlist<'a>(
    candidates: &[ScoredCandidate<'a>],
    incomplete: &[TaskInstance],
    max_active: usize,
) -> Vec<&'a TaskTemplate> {
    if incomplete.len() >= max_active {
        return Vec::new();
    }

    let mut selected = Vec::new();
    for candidate in candidates {
        if selected.len() + incomplete.len() >= max_active {
            break;
        }
        let in_progress = incomplete
            .iter()
            .any(|task| task.template_id == candidate.template.id);
        if !in_progress {
            selected.push(candidate.template);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateId;
    use crate::engine::Hardness;
    use proptest::prelude::*;

    fn make_template(id: TemplateId) -> TaskTemplate {
        TaskTemplate {
            id,
            desc: format!("template {id}"),
            user_points: 10,
            carbon_savings: 1.0,
            waste_savings: 0.0,
            max_completions: 1,
        }
    }

    fn make_instance(template_id: TemplateId) -> TaskInstance {
        let template = make_template(template_id);
        TaskInstance::assign(&template, 1)
    }

    fn make_candidates(templates: &[TaskTemplate]) -> Vec<ScoredCandidate<'_>> {
        templates
            .iter()
            .enumerate()
            .map(|(rank, template)| ScoredCandidate {
                template,
                hardness: Hardness::new(3).unwrap(),
                score: (templates.len() - rank) as f64,
            })
            .collect()
    }

    #[test]
    fn fills_remaining_capacity_in_order() {
        let templates: Vec<_> = (1..=5).map(make_template).collect();
        let candidates = make_candidates(&templates);
        let incomplete = [make_instance(9)];

        let selected = select_shortlist(&candidates, &incomplete, 3);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, candidates[0].template.id);
        assert_eq!(selected[1].id, candidates[1].template.id);
    }

    #[test]
    fn skips_templates_already_in_progress() {
        let templates: Vec<_> = (1..=5).map(make_template).collect();
        let candidates = make_candidates(&templates);
        let top_id = candidates[0].template.id;
        let incomplete = [make_instance(top_id)];

        let selected = select_shortlist(&candidates, &incomplete, 3);
        assert!(selected.iter().all(|t| t.id != top_id));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn full_quota_returns_nothing() {
        let templates: Vec<_> = (1..=5).map(make_template).collect();
        let candidates = make_candidates(&templates);
        let incomplete: Vec<_> = (7..=9).map(make_instance).collect();

        assert!(select_shortlist(&candidates, &incomplete, 3).is_empty());
    }

    #[test]
    fn over_quota_returns_nothing() {
        let templates: Vec<_> = (1..=5).map(make_template).collect();
        let candidates = make_candidates(&templates);
        let incomplete: Vec<_> = (6..=9).map(make_instance).collect();

        assert!(select_shortlist(&candidates, &incomplete, 3).is_empty());
    }

    #[test]
    fn exhausted_candidates_return_short() {
        let templates = [make_template(1)];
        let candidates = make_candidates(&templates);

        let selected = select_shortlist(&candidates, &[], 3);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn no_candidates_means_no_selection() {
        assert!(select_shortlist(&[], &[], 3).is_empty());
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity_or_repeats_in_progress(
            template_ids in prop::collection::vec(0i64..20, 0..12),
            incomplete_ids in prop::collection::vec(0i64..20, 0..6),
        ) {
            let templates: Vec<_> = template_ids.iter().copied().map(make_template).collect();
            let candidates = make_candidates(&templates);
            let incomplete: Vec<_> = incomplete_ids.iter().copied().map(make_instance).collect();

            let selected = select_shortlist(&candidates, &incomplete, 3);

            prop_assert!(selected.len() <= 3usize.saturating_sub(incomplete.len()));
            for template in &selected {
                prop_assert!(!incomplete_ids.contains(&template.id));
            }
        }
    }
}
