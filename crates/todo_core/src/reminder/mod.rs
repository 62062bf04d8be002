//! Reminder scheduling boundary.
//!
//! # Responsibility
//! - Turn tasks with a reminder date into one-shot notification requests.
//! - Define the scheduler contract the platform notification center fulfills.
//!
//! # Invariants
//! - At most one pending request exists per identifier; re-scheduling replaces.
//! - Requests fire once; nothing repeats.
//! - The identifier of a task reminder is the task id.

use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod outbox;

/// Notification title used for task reminders.
pub const REMINDER_TITLE: &str = "Reminder";

/// One-shot local notification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub identifier: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl ReminderRequest {
    /// Builds the request for `task`, or `None` when it has no reminder.
    pub fn for_task(task: &Task) -> Option<Self> {
        let fire_at = task.reminder_date?;
        Some(Self {
            identifier: task.id.to_string(),
            fire_at,
            title: REMINDER_TITLE.to_string(),
            body: task.title.clone(),
        })
    }
}

/// Platform notification scheduler.
pub trait ReminderScheduler {
    /// Registers `request`, replacing any pending request with the same identifier.
    fn schedule(&mut self, request: ReminderRequest);
    /// Drops the pending request for `identifier`. Unknown identifiers change nothing.
    fn cancel(&mut self, identifier: &str);
}
