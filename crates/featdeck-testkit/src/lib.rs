// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use featdeck_app::{Document, EditResult, Feature, FeaturePatch, Group, Mutation};
use std::path::PathBuf;

const ICONS: [&str; 10] = ["✏️", "📋", "🗑️", "✅", "📤", "🔔", "⭐", "🔒", "📎", ""];

const VERBS: [&str; 12] = [
    "Add", "Archive", "Export", "Filter", "Import", "Mark", "Pin", "Rename", "Search", "Share",
    "Sort", "Tag",
];

const NOUNS: [&str; 10] = [
    "Task",
    "Tasks",
    "Reminder",
    "Project",
    "Label",
    "Due Date",
    "Checklist",
    "Note",
    "Attachment",
    "Comment",
];

const GROUP_NAMES: [&str; 8] = [
    "Core Features",
    "Collaboration",
    "Integrations",
    "Later",
    "Polish",
    "Reporting",
    "Settings",
    "Sync",
];

const DESCRIPTION_WORDS: [&str; 16] = [
    "creates", "lists", "updates", "removes", "every", "task", "with", "status", "by", "id",
    "quickly", "and", "details", "for", "the", "user",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of features, documents and valid mutation scripts. The same seed always
/// yields the same output.
#[derive(Debug, Clone)]
pub struct FeatureFaker {
    rng: DeterministicRng,
    groups_made: usize,
}

impl FeatureFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            groups_made: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn feature(&mut self) -> Feature {
        let name = format!("{} {}", self.pick(&VERBS), self.pick(&NOUNS));
        let icon = self.pick(&ICONS);
        let description = if self.rng.int_n(5) == 0 {
            String::new()
        } else {
            let words = 3 + self.rng.int_n(6);
            self.sentence(words)
        };
        Feature::new(name, icon, description)
    }

    /// A group name no earlier call on this faker has returned.
    pub fn group_name(&mut self) -> String {
        let base = self.pick(&GROUP_NAMES);
        self.groups_made += 1;
        format!("{base} {}", self.groups_made)
    }

    pub fn document(&mut self, groups: usize, features_per_group: usize) -> Document {
        let groups = (0..groups.max(1))
            .map(|_| {
                let name = self.group_name();
                let features = (0..features_per_group).map(|_| self.feature()).collect();
                Group::with_features(name, features)
            })
            .collect();
        Document::from_groups(groups).unwrap_or_default()
    }

    /// A mutation that `document` will accept.
    pub fn mutation(&mut self, document: &Document) -> Mutation {
        let populated: Vec<usize> = document
            .groups()
            .iter()
            .enumerate()
            .filter(|(_, group)| !group.is_empty())
            .map(|(index, _)| index)
            .collect();
        let group_count = document.group_count();

        loop {
            match self.rng.int_n(6) {
                0 => {
                    return Mutation::AddFeature {
                        group: self.rng.int_n(group_count),
                        feature: self.feature(),
                    };
                }
                1 if !populated.is_empty() => {
                    let group = populated[self.rng.int_n(populated.len())];
                    let item = self.rng.int_n(document.groups()[group].len());
                    let replacement = self.feature();
                    let patch = FeaturePatch {
                        name: Some(replacement.name),
                        icon: self.rng.bool().then_some(replacement.icon),
                        description: self.rng.bool().then_some(replacement.description),
                    };
                    return Mutation::EditFeature { group, item, patch };
                }
                2 if !populated.is_empty() => {
                    let group = populated[self.rng.int_n(populated.len())];
                    let item = self.rng.int_n(document.groups()[group].len());
                    return Mutation::DeleteFeature { group, item };
                }
                3 => {
                    return Mutation::AddGroup {
                        name: self.group_name(),
                    };
                }
                4 => {
                    return Mutation::RenameGroup {
                        group: self.rng.int_n(group_count),
                        name: self.group_name(),
                    };
                }
                5 if group_count > 1 => {
                    return Mutation::DeleteGroup {
                        group: self.rng.int_n(group_count),
                    };
                }
                _ => {}
            }
        }
    }

    /// `len` mutations, each valid against the document produced by the ones before it.
    pub fn script(&mut self, start: &Document, len: usize) -> Vec<Mutation> {
        let mut document = start.clone();
        let mut script = Vec::with_capacity(len);
        while script.len() < len {
            let mutation = self.mutation(&document);
            if document.apply(mutation.clone()).is_ok() {
                script.push(mutation);
            }
        }
        script
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    fn sentence(&mut self, words: usize) -> String {
        let mut sentence = (0..words)
            .map(|_| self.pick(&DESCRIPTION_WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence
    }
}

pub fn replay(start: &Document, script: &[Mutation]) -> EditResult<Document> {
    let mut document = start.clone();
    for mutation in script {
        document.apply(mutation.clone())?;
    }
    Ok(document)
}

/// Two groups, the second one empty.
pub fn sample_document() -> Document {
    let mut document = Document::seed();
    document
        .add_group("Later")
        .expect("seed document has no group named Later");
    document
}

pub fn sample_text() -> &'static str {
    "## Core Features\n\n- 📤 | Export | Export tasks\n- 🔔 | Remind |\n\n## Later\n"
}

pub fn temp_feature_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("features.md");
    Ok((dir, path))
}
