// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cursor over the group/feature hierarchy. `item` is `None` only when the group is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub group: usize,
    pub item: Option<usize>,
}

impl Selection {
    pub fn first(document: &Document) -> Self {
        Self::entering(document, 0)
    }

    /// Cursor on the first feature of `group`, clamped to the last group.
    pub fn entering(document: &Document, group: usize) -> Self {
        let group = group.min(document.group_count().saturating_sub(1));
        let item = document
            .group(group)
            .filter(|group| !group.is_empty())
            .map(|_| 0);
        Self { group, item }
    }

    pub fn is_valid(&self, document: &Document) -> bool {
        let Some(group) = document.group(self.group) else {
            return false;
        };
        match self.item {
            Some(item) => item < group.len(),
            None => group.is_empty(),
        }
    }

    /// Moves the cursor one step, clamping at the edges. Returns whether it moved.
    pub fn step(&mut self, document: &Document, direction: Direction) -> bool {
        let before = *self;
        match direction {
            Direction::Up => {
                if let Some(item) = self.item {
                    self.item = Some(item.saturating_sub(1));
                }
            }
            Direction::Down => {
                let len = document.group(self.group).map_or(0, |group| group.len());
                if let Some(item) = self.item {
                    self.item = Some((item + 1).min(len.saturating_sub(1)));
                }
            }
            Direction::Left => {
                if self.group > 0 {
                    *self = Self::entering(document, self.group - 1);
                }
            }
            Direction::Right => {
                if self.group + 1 < document.group_count() {
                    *self = Self::entering(document, self.group + 1);
                }
            }
        }
        *self != before
    }

    pub fn jump_first(&mut self, document: &Document) -> bool {
        let before = *self;
        *self = Self::entering(document, self.group);
        *self != before
    }

    pub fn jump_last(&mut self, document: &Document) -> bool {
        let before = *self;
        let len = document.group(self.group).map_or(0, |group| group.len());
        self.item = len.checked_sub(1);
        *self != before
    }

    /// Re-validates the cursor after a structural change: a missing group falls back to the last
    /// item of the last group, a missing item to the group's last item, an empty group to "no
    /// item".
    pub fn clamp(&mut self, document: &Document) {
        let groups = document.group_count();
        if groups == 0 {
            *self = Self::default();
            return;
        }
        if self.group >= groups {
            self.group = groups - 1;
            self.item = document
                .group(self.group)
                .and_then(|group| group.len().checked_sub(1));
            return;
        }
        let len = document.group(self.group).map_or(0, |group| group.len());
        self.item = match (self.item, len) {
            (_, 0) => None,
            (Some(item), len) => Some(item.min(len - 1)),
            (None, _) => Some(0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Selection};
    use crate::Document;

    fn two_groups() -> Document {
        let mut document = Document::seed();
        document.add_group("Empty").expect("new group");
        document
    }

    #[test]
    fn first_selection_points_at_first_feature() {
        let selection = Selection::first(&Document::seed());
        assert_eq!(
            selection,
            Selection {
                group: 0,
                item: Some(0)
            }
        );
    }

    #[test]
    fn vertical_moves_clamp_without_wrapping() {
        let document = Document::seed();
        let mut selection = Selection::first(&document);

        assert!(!selection.step(&document, Direction::Up));
        for _ in 0..10 {
            selection.step(&document, Direction::Down);
        }
        assert_eq!(selection.item, Some(4));
        assert!(!selection.step(&document, Direction::Down));
    }

    #[test]
    fn horizontal_moves_reset_item_on_group_entry() {
        let document = two_groups();
        let mut selection = Selection::first(&document);
        selection.step(&document, Direction::Down);

        assert!(selection.step(&document, Direction::Right));
        assert_eq!(
            selection,
            Selection {
                group: 1,
                item: None
            }
        );
        assert!(!selection.step(&document, Direction::Right));

        assert!(selection.step(&document, Direction::Left));
        assert_eq!(selection.item, Some(0));
        assert!(!selection.step(&document, Direction::Left));
    }

    #[test]
    fn jumps_reach_group_edges() {
        let document = Document::seed();
        let mut selection = Selection::first(&document);
        assert!(selection.jump_last(&document));
        assert_eq!(selection.item, Some(4));
        assert!(selection.jump_first(&document));
        assert_eq!(selection.item, Some(0));
    }

    #[test]
    fn clamp_moves_to_new_last_item_after_delete() {
        let mut document = Document::seed();
        let mut selection = Selection {
            group: 0,
            item: Some(4),
        };
        document.delete_feature(0, 4).expect("delete last");
        selection.clamp(&document);
        assert_eq!(selection.item, Some(3));
        assert!(selection.is_valid(&document));
    }

    #[test]
    fn clamp_reports_no_item_for_emptied_group() {
        let mut document = Document::seed();
        let mut selection = Selection::first(&document);
        for _ in 0..5 {
            document.delete_feature(0, 0).expect("delete");
            selection.clamp(&document);
        }
        assert_eq!(selection.item, None);
        assert!(selection.is_valid(&document));
    }

    #[test]
    fn clamp_falls_back_to_last_item_of_last_group() {
        let mut document = two_groups();
        let mut selection = Selection::entering(&document, 1);
        document.delete_group(1).expect("delete second group");
        selection.clamp(&document);
        assert_eq!(
            selection,
            Selection {
                group: 0,
                item: Some(4)
            }
        );
    }

    #[test]
    fn clamp_ignores_stale_item_when_group_vanishes() {
        let mut document = two_groups();
        document.add_group("Third").expect("third group");
        document
            .add_feature(1, "Only", "x", "one feature")
            .expect("add to second group");
        let mut selection = Selection {
            group: 2,
            item: None,
        };
        document.delete_group(2).expect("delete third group");
        selection.clamp(&document);
        assert_eq!(
            selection,
            Selection {
                group: 1,
                item: Some(0)
            }
        );

        document.add_feature(1, "Second", "x", "").expect("add");
        let mut selection = Selection {
            group: 5,
            item: Some(0),
        };
        selection.clamp(&document);
        assert_eq!(selection.item, Some(1));
    }

    #[test]
    fn invalid_positions_are_detected() {
        let document = two_groups();
        assert!(
            !Selection {
                group: 1,
                item: Some(0)
            }
            .is_valid(&document)
        );
        assert!(
            !Selection {
                group: 0,
                item: None
            }
            .is_valid(&document)
        );
        assert!(
            !Selection {
                group: 5,
                item: None
            }
            .is_valid(&document)
        );
    }
}
