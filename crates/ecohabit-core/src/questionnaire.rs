//! Questionnaire response records.

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionId;
use crate::user::UserId;

/// One user's answer to one catalog question.
///
/// `answer1` holds the literal "yes"/"no" reply to the primary prompt.
/// `answer2` holds the self-reported hardness rating ("1".."5") and is only
/// present when the primary answer indicates the behavior is not yet adopted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub id: i64,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub answer1: String,
    pub answer2: Option<String>,
}

impl QuestionnaireResponse {
    /// A response not yet persisted (id assigned by the store on insert).
    pub fn new(
        user_id: UserId,
        question_id: QuestionId,
        answer1: impl Into<String>,
        answer2: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            question_id,
            answer1: answer1.into(),
            answer2,
        }
    }

    /// Whether the primary answer is the literal "yes".
    pub fn says_yes(&self) -> bool {
        self.answer1 == "yes"
    }
}
