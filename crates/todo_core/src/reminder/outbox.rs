//! In-process reminder scheduler.
//!
//! The outbox keeps the authoritative pending set and queues the commands the
//! host must forward to the OS notification center.

use super::{ReminderRequest, ReminderScheduler};
use log::debug;
use std::collections::BTreeMap;

/// Scheduler command waiting to be forwarded to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    Schedule(ReminderRequest),
    Cancel { identifier: String },
}

/// Pending reminders plus a FIFO of platform commands.
#[derive(Debug, Default)]
pub struct ReminderOutbox {
    pending: BTreeMap<String, ReminderRequest>,
    commands: Vec<ReminderCommand>,
}

impl ReminderOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outbox whose queue starts with `commands`.
    ///
    /// Used to hand undrained commands over when a store is replaced.
    pub fn with_queued(commands: Vec<ReminderCommand>) -> Self {
        Self {
            pending: BTreeMap::new(),
            commands,
        }
    }

    /// Pending requests ordered by identifier.
    pub fn pending(&self) -> impl Iterator<Item = &ReminderRequest> {
        self.pending.values()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, identifier: &str) -> Option<&ReminderRequest> {
        self.pending.get(identifier)
    }

    /// Drains queued commands in the order they were issued.
    pub fn take_commands(&mut self) -> Vec<ReminderCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl ReminderScheduler for ReminderOutbox {
    fn schedule(&mut self, request: ReminderRequest) {
        let replaced = self
            .pending
            .insert(request.identifier.clone(), request.clone())
            .is_some();
        debug!(
            "event=reminder_schedule module=reminder status=ok replaced={} pending={}",
            replaced,
            self.pending.len()
        );
        self.commands.push(ReminderCommand::Schedule(request));
    }

    // Unknown identifiers still queue a cancel: the platform may hold a
    // request registered in an earlier session.
    fn cancel(&mut self, identifier: &str) {
        let removed = self.pending.remove(identifier).is_some();
        debug!(
            "event=reminder_cancel module=reminder status=ok removed={} pending={}",
            removed,
            self.pending.len()
        );
        self.commands.push(ReminderCommand::Cancel {
            identifier: identifier.to_string(),
        });
    }
}
