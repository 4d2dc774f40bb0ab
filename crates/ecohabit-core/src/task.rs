//! Per-user task instances assigned from catalog templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{TaskTemplate, TemplateId};
use crate::user::UserId;

/// A task template assigned to a specific user.
///
/// Instances are created by the recommendation flow, progressed by the user,
/// and never deleted. The completion counter is bounded by the template's
/// `max_completions`; reaching the bound marks the instance completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: String,
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub completed: bool,
    pub num_completions: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskInstance {
    /// Assign a fresh instance of `template` to a user.
    pub fn assign(template: &TaskTemplate, user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            template_id: template.id,
            user_id,
            completed: false,
            num_completions: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record one completion against this instance.
    ///
    /// Returns `true` when this call brought the counter to the template's
    /// limit and completed the instance. Completed instances are not
    /// progressed further.
    pub fn record_completion(&mut self, template: &TaskTemplate) -> bool {
        if self.completed {
            return false;
        }
        self.num_completions += 1;
        if self.num_completions >= template.max_completions {
            self.completed = true;
            self.completed_at = Some(Utc::now());
            return true;
        }
        false
    }
}
