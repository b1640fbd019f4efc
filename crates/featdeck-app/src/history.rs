// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;

use crate::{Document, EditError, EditResult};

pub const HISTORY_LIMIT: usize = 100;

/// Document as it was before a mutation. `dirty` and `saves` are the editor's dirty flag and
/// completed-save count at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub document: Document,
    pub dirty: bool,
    pub saves: u64,
}

impl Snapshot {
    /// Dirty flag to restore along with this snapshot, given the current save count.
    pub const fn dirty_after_undo(&self, saves: u64) -> bool {
        self.dirty || self.saves != saves
    }
}

/// Bounded stack of pre-mutation snapshots. The oldest snapshot is dropped once the limit is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoHistory {
    entries: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl UndoHistory {
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn undo(&mut self) -> EditResult<Snapshot> {
        self.entries.pop_back().ok_or(EditError::EmptyHistory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
