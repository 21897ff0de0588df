//! Fire-once delayed tasks on simulation time
//!
//! Each task is keyed by the transition that scheduled it. Scheduling a task
//! that is already pending replaces it, and the transition that supersedes a
//! task cancels it by key, so a stale task can never fire after its state
//! has been left.

use serde::{Deserialize, Serialize};

/// Session-level delayed work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    /// End of the head-start grace period
    HeadStart,
    /// Show the game-over summary and hide the player
    GameOverReveal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    /// Scheduling order, for ties
    seq: u64,
    task: Task,
    remaining: f32,
}

/// Pending delayed tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire after `delay` seconds, replacing any pending
    /// instance of the same task
    pub fn schedule(&mut self, task: Task, delay: f32) {
        self.cancel_task(task);
        self.pending.push(Pending {
            seq: self.next_seq,
            task,
            remaining: delay.max(0.0),
        });
        self.next_seq += 1;
    }

    /// Cancel every pending instance of `task`
    pub fn cancel_task(&mut self, task: Task) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.task != task);
        self.pending.len() != before
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// Seconds until `task` fires, if pending
    pub fn remaining(&self, task: Task) -> Option<f32> {
        self.pending
            .iter()
            .find(|p| p.task == task)
            .map(|p| p.remaining)
    }

    /// Count down by `dt` and return due tasks, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<Task> {
        let mut due: Vec<(f32, u64, Task)> = Vec::new();
        self.pending.retain_mut(|p| {
            p.remaining -= dt;
            if p.remaining <= 0.0 {
                due.push((p.remaining, p.seq, p.task));
                false
            } else {
                true
            }
        });
        // Most negative remaining was due first; ties keep scheduling order
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, task)| task).collect()
    }
}
