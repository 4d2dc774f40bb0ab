//! Hardness classification of questionnaire responses.

use serde::{Deserialize, Serialize};

use crate::catalog::{Polarity, Question};
use crate::error::EngineError;
use crate::questionnaire::QuestionnaireResponse;

/// Self-reported difficulty of adopting a sustainable behavior, 0-5.
///
/// 0 means the user already practices the behavior; 1-5 come from the
/// follow-up answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hardness(u8);

impl Hardness {
    /// Behavior is already adopted; no change needed.
    pub const ALREADY_ADOPTED: Hardness = Hardness(0);

    /// Build a rating, rejecting values above 5.
    pub fn new(value: u8) -> Option<Hardness> {
        (value <= 5).then_some(Hardness(value))
    }

    pub fn is_already_adopted(self) -> bool {
        self.0 == 0
    }

    /// Index into the probability-of-success tables.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Classify one response into a hardness rating.
///
/// The question's polarity flag encodes which literal primary answer means
/// the sustainable behavior is already in place; the rating is 0 exactly when
/// the user's answer matches it. Otherwise the rating is read from the
/// follow-up answer, which must parse as an integer 1-5.
pub fn classify(
    response: &QuestionnaireResponse,
    question: &Question,
) -> Result<Hardness, EngineError> {
    let already_adopted = (question.polarity == Polarity::No) == response.says_yes();
    if already_adopted {
        return Ok(Hardness::ALREADY_ADOPTED);
    }

    let raw = response
        .answer2
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(EngineError::MissingHardness {
            question_id: question.id,
        })?;

    let value: u8 = raw.parse().map_err(|_| EngineError::InvalidHardness {
        question_id: question.id,
        value: raw.to_string(),
    })?;
    if !(1..=5).contains(&value) {
        return Err(EngineError::InvalidHardness {
            question_id: question.id,
            value: raw.to_string(),
        });
    }
    Ok(Hardness(value))
}
