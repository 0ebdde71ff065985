//! Single-slot work unit.
//!
//! A unit is either idle or busy with exactly one item. While busy it
//! counts down the item's remaining ticks; reaching zero returns it to
//! idle and bumps its completion counter.

use serde::{Deserialize, Serialize};

use loadgrid_core::{UnitId, WorkItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Idle,
    Busy,
}

#[derive(Debug)]
pub struct WorkUnit {
    id: UnitId,
    state: UnitState,
    /// Ticks left on the current item. Zero whenever idle.
    remaining: u32,
    completed: u64,
}

impl WorkUnit {
    pub fn new(id: UnitId) -> Self {
        Self {
            id,
            state: UnitState::Idle,
            remaining: 0,
            completed: 0,
        }
    }

    /// Start processing `item`. Only the balancer calls this, and only
    /// after checking the unit is idle.
    pub(crate) fn assign(&mut self, item: &WorkItem) {
        debug_assert!(!self.is_busy(), "unit {} assigned while busy", self.id);
        self.state = UnitState::Busy;
        self.remaining = item.duration.max(1);
    }

    /// Burn one tick of work. No-op when idle.
    pub fn advance(&mut self) {
        if self.state != UnitState::Busy {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = UnitState::Idle;
            self.completed += 1;
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == UnitState::Busy
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total_processed(&self) -> u64 {
        self.completed
    }
}
