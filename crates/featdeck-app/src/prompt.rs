// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Document, EditError, EditResult, Feature, FeaturePatch, Group, Mutation, normalize_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    Name,
    Icon,
    Description,
}

impl PromptStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Icon => "icon",
            Self::Description => "description",
        }
    }
}

const FEATURE_STEPS: [PromptStep; 3] = [PromptStep::Name, PromptStep::Icon, PromptStep::Description];
const GROUP_STEPS: [PromptStep; 1] = [PromptStep::Name];

/// What a prompt produces once every step is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    NewFeature { group: usize },
    Feature { group: usize, item: usize },
    NewGroup,
    Group { group: usize },
}

impl PromptTarget {
    pub const fn title(self) -> &'static str {
        match self {
            Self::NewFeature { .. } => "add feature",
            Self::Feature { .. } => "edit feature",
            Self::NewGroup => "new group",
            Self::Group { .. } => "rename group",
        }
    }

    pub const fn steps(self) -> &'static [PromptStep] {
        match self {
            Self::NewFeature { .. } | Self::Feature { .. } => &FEATURE_STEPS,
            Self::NewGroup | Self::Group { .. } => &GROUP_STEPS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureDraft {
    pub name: String,
    pub icon: String,
    pub description: String,
}

impl FeatureDraft {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            name: feature.name.clone(),
            icon: feature.icon.clone(),
            description: feature.description.clone(),
        }
    }

    pub fn to_feature(&self) -> Feature {
        Feature::new(&self.name, &self.icon, &self.description)
    }

    fn field(&self, step: PromptStep) -> &str {
        match step {
            PromptStep::Name => &self.name,
            PromptStep::Icon => &self.icon,
            PromptStep::Description => &self.description,
        }
    }

    fn field_mut(&mut self, step: PromptStep) -> &mut String {
        match step {
            PromptStep::Name => &mut self.name,
            PromptStep::Icon => &mut self.icon,
            PromptStep::Description => &mut self.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptProgress {
    Continue(PromptStep),
    Complete,
}

/// A modal, step-by-step text prompt. Each step's answer is edited in `input` and committed into
/// `draft` on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub target: PromptTarget,
    pub step: PromptStep,
    pub draft: FeatureDraft,
    pub input: String,
}

impl Prompt {
    fn start(target: PromptTarget, draft: FeatureDraft) -> Self {
        let step = PromptStep::Name;
        let input = draft.field(step).to_owned();
        Self {
            target,
            step,
            draft,
            input,
        }
    }

    pub fn add_feature(group: usize) -> Self {
        Self::start(PromptTarget::NewFeature { group }, FeatureDraft::default())
    }

    pub fn edit_feature(group: usize, item: usize, feature: &Feature) -> Self {
        Self::start(
            PromptTarget::Feature { group, item },
            FeatureDraft::from_feature(feature),
        )
    }

    pub fn add_group() -> Self {
        Self::start(PromptTarget::NewGroup, FeatureDraft::default())
    }

    pub fn rename_group(group: usize, current: &Group) -> Self {
        Self::start(
            PromptTarget::Group { group },
            FeatureDraft {
                name: current.name.clone(),
                ..FeatureDraft::default()
            },
        )
    }

    pub fn push(&mut self, ch: char) {
        if ch != '\n' && ch != '\r' {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// 1-based position of the current step and the step count, for display.
    pub fn position(&self) -> (usize, usize) {
        let steps = self.target.steps();
        let index = steps
            .iter()
            .position(|step| *step == self.step)
            .unwrap_or(0);
        (index + 1, steps.len())
    }

    /// Commits the current input and moves to the next step. A blank name is rejected and the
    /// prompt stays where it is.
    pub fn advance(&mut self) -> EditResult<PromptProgress> {
        let value = normalize_field(&self.input);
        if self.step == PromptStep::Name && value.is_empty() {
            let subject = match self.target {
                PromptTarget::NewFeature { .. } | PromptTarget::Feature { .. } => "feature",
                PromptTarget::NewGroup | PromptTarget::Group { .. } => "group",
            };
            return Err(EditError::validation(format!(
                "{subject} name is required -- enter a name and retry"
            )));
        }
        *self.draft.field_mut(self.step) = value;

        let steps = self.target.steps();
        let next = steps
            .iter()
            .skip_while(|step| **step != self.step)
            .nth(1)
            .copied();
        match next {
            Some(step) => {
                self.step = step;
                self.input = self.draft.field(step).to_owned();
                Ok(PromptProgress::Continue(step))
            }
            None => Ok(PromptProgress::Complete),
        }
    }

    /// Sends the prompt back to its first step, keeping the answers collected so far.
    pub fn reopen(&mut self) {
        self.step = PromptStep::Name;
        self.input = self.draft.name.clone();
    }

    /// The mutation this prompt describes, or `None` when an edit changes nothing.
    pub fn mutation(&self, document: &Document) -> Option<Mutation> {
        match self.target {
            PromptTarget::NewFeature { group } => Some(Mutation::AddFeature {
                group,
                feature: self.draft.to_feature(),
            }),
            PromptTarget::Feature { group, item } => {
                let edited = self.draft.to_feature();
                let patch = match document.feature(group, item) {
                    Some(original) => FeaturePatch::between(original, &edited),
                    None => FeaturePatch {
                        name: Some(edited.name),
                        icon: Some(edited.icon),
                        description: Some(edited.description),
                    },
                };
                (!patch.is_empty()).then_some(Mutation::EditFeature { group, item, patch })
            }
            PromptTarget::NewGroup => Some(Mutation::AddGroup {
                name: self.draft.name.clone(),
            }),
            PromptTarget::Group { group } => {
                let unchanged = document
                    .group(group)
                    .is_some_and(|current| current.name == self.draft.name);
                (!unchanged).then(|| Mutation::RenameGroup {
                    group,
                    name: self.draft.name.clone(),
                })
            }
        }
    }
}
