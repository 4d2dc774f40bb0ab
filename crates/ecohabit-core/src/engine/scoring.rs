//! Impact scoring for recommendation candidates.
//!
//! A candidate's score combines the template's environmental savings,
//! normalized against the average weekly footprint, with the expected
//! behavioral lift of recommending the task at the user's hardness rating.

use crate::catalog::TaskTemplate;

use super::hardness::Hardness;
use super::EngineConfig;

/// Expected marginal lift in the probability the user performs the behavior
/// if the task is recommended versus not.
///
/// Unprompted adherence is zero for every real difficulty, so for hardness
/// 1-5 the lift equals the recommended-success probability exactly. For
/// hardness 0 the lift is the small maintenance gap 0.95 - 0.9025.
pub fn success_lift(config: &EngineConfig, hardness: Hardness) -> f64 {
    config.recommended_success[hardness.index()] - config.unprompted_success[hardness.index()]
}

/// Template savings as a dimensionless fraction of the average weekly
/// footprint.
pub fn footprint_fraction(config: &EngineConfig, template: &TaskTemplate) -> f64 {
    template.carbon_savings / config.avg_weekly_co2_kg
        + template.waste_savings / config.avg_weekly_waste_kg
}

/// Impact score for one candidate.
///
/// Templates the user has already completed score 0, so a one-off task is
/// never offered again.
pub fn impact_score(
    config: &EngineConfig,
    hardness: Hardness,
    template: &TaskTemplate,
    completed_before: bool,
) -> f64 {
    if completed_before {
        return 0.0;
    }
    footprint_fraction(config, template) * success_lift(config, hardness)
}
