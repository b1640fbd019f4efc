// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use thiserror::Error;

/// A position in the document that an edit referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Group(usize),
    Feature { group: usize, item: usize },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => write!(f, "group {}", group + 1),
            Self::Feature { group, item } => {
                write!(f, "feature {} in group {}", item + 1, group + 1)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} no longer exists")]
    NotFound(Target),
    #[error("nothing to undo")]
    EmptyHistory,
}

impl EditError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type EditResult<T> = std::result::Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::{EditError, Target};

    #[test]
    fn targets_render_one_based_positions() {
        assert_eq!(Target::Group(0).to_string(), "group 1");
        assert_eq!(
            Target::Feature { group: 1, item: 4 }.to_string(),
            "feature 5 in group 2"
        );
    }

    #[test]
    fn not_found_message_names_the_target() {
        let error = EditError::NotFound(Target::Feature { group: 0, item: 2 });
        assert_eq!(error.to_string(), "feature 3 in group 1 no longer exists");
        assert!(!error.is_validation());
        assert!(EditError::validation("bad").is_validation());
    }
}
