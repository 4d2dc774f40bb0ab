//! User accounts and reward points.

use serde::{Deserialize, Serialize};

/// Identifier for a user.
pub type UserId = i64;

/// A registered user with an accumulated points balance.
///
/// Points are awarded by the task-progress flow, `user_points` per recorded
/// completion of an assigned task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub points: i64,
}
