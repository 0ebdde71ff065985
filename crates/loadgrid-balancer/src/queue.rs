//! Unbounded FIFO of admitted work items.

use std::collections::VecDeque;

use loadgrid_core::WorkItem;

/// Arrival-ordered queue. No priorities, no reordering.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    items: VecDeque<WorkItem>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail.
    pub fn push(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    /// Remove and return the head, if any.
    pub fn pop_front(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items in dispatch order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &WorkItem> {
        self.items.iter()
    }
}
