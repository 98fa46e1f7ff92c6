// Undo/redo over whole dashboard snapshots. The engine is pure, so the
// caller keeps the snapshots; nothing here knows about layout.

use std::collections::VecDeque;

use gridboard_core::Dashboard;

pub struct History {
    undo_stack: VecDeque<Dashboard>,
    redo_stack: Vec<Dashboard>,
    limit: usize,
}

impl History {
    /// A history keeping at most `limit` undo steps. A limit of 0 disables it.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(64)),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Remember `before` as the state preceding a new edit. Clears redo.
    pub fn record(&mut self, before: Dashboard) {
        self.redo_stack.clear();
        if self.limit == 0 {
            return;
        }
        if self.undo_stack.len() == self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(before);
    }

    /// Step back. Returns the snapshot to restore, or None if nothing to undo.
    pub fn undo(&mut self, current: &Dashboard) -> Option<Dashboard> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Re-apply the last undone step, or None if nothing to redo.
    pub fn redo(&mut self, current: &Dashboard) -> Option<Dashboard> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
