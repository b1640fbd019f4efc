// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{EditError, EditResult, Target};

pub const SEED_GROUP_NAME: &str = "Core Features";

const SEED_FEATURES: [(&str, &str, &str); 5] = [
    (
        "✏️",
        "Add Task",
        "Creates new tasks with unique IDs, titles, and descriptions",
    ),
    (
        "📋",
        "View Tasks",
        "Lists all tasks with completion status and details",
    ),
    (
        "✏️",
        "Update Task",
        "Modifies existing task titles and descriptions by ID",
    ),
    (
        "🗑️",
        "Delete Task",
        "Removes tasks from the in-memory list by ID",
    ),
    (
        "✅ / ❌",
        "Mark Complete/Incomplete",
        "Toggles task completion status (complete/incomplete)",
    ),
];

/// Field values are single-line and trimmed.
pub fn normalize_field(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ").trim().to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub icon: String,
    pub description: String,
}

impl Feature {
    pub fn new(
        name: impl AsRef<str>,
        icon: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            name: normalize_field(name.as_ref()),
            icon: normalize_field(icon.as_ref()),
            description: normalize_field(description.as_ref()),
        }
    }

    /// Same feature with every field passed through [`normalize_field`].
    pub fn normalized(self) -> Self {
        Self::new(self.name, self.icon, self.description)
    }

    pub fn validate(&self) -> EditResult<()> {
        if self.name.is_empty() {
            return Err(EditError::validation(
                "feature name is required -- enter a name and retry",
            ));
        }
        Ok(())
    }
}

/// Partial update for a feature; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl FeaturePatch {
    /// Patch carrying only the fields where `edited` differs from `original`.
    pub fn between(original: &Feature, edited: &Feature) -> Self {
        let changed = |before: &String, after: &String| (before != after).then(|| after.clone());
        Self {
            name: changed(&original.name, &edited.name),
            icon: changed(&original.icon, &edited.icon),
            description: changed(&original.description, &edited.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none() && self.description.is_none()
    }

    fn applied_to(&self, feature: &Feature) -> Feature {
        Feature::new(
            self.name.as_deref().unwrap_or(&feature.name),
            self.icon.as_deref().unwrap_or(&feature.icon),
            self.description.as_deref().unwrap_or(&feature.description),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub features: Vec<Feature>,
}

impl Group {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize_field(name.as_ref()),
            features: Vec::new(),
        }
    }

    pub fn with_features(name: impl AsRef<str>, features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::new(name)
        }
    }

    pub fn normalized(self) -> Self {
        Self::with_features(
            self.name,
            self.features.into_iter().map(Feature::normalized).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Every structural change to a [`Document`] is one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddFeature {
        group: usize,
        feature: Feature,
    },
    EditFeature {
        group: usize,
        item: usize,
        patch: FeaturePatch,
    },
    DeleteFeature {
        group: usize,
        item: usize,
    },
    AddGroup {
        name: String,
    },
    RenameGroup {
        group: usize,
        name: String,
    },
    DeleteGroup {
        group: usize,
    },
}

impl Mutation {
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::AddFeature { .. } => "added feature",
            Self::EditFeature { .. } => "updated feature",
            Self::DeleteFeature { .. } => "deleted feature",
            Self::AddGroup { .. } => "added group",
            Self::RenameGroup { .. } => "renamed group",
            Self::DeleteGroup { .. } => "deleted group",
        }
    }
}

/// Ordered groups of features. Always holds at least one group and never two groups with the
/// same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    groups: Vec<Group>,
}

impl Default for Document {
    fn default() -> Self {
        Self::seed()
    }
}

impl Document {
    pub fn seed() -> Self {
        let features = SEED_FEATURES
            .iter()
            .map(|(icon, name, description)| Feature::new(name, icon, description))
            .collect();
        Self {
            groups: vec![Group::with_features(SEED_GROUP_NAME, features)],
        }
    }

    /// Builds a document from raw groups. Field values are normalized first, so whatever is
    /// accepted here serializes back to the same document.
    pub fn from_groups(groups: Vec<Group>) -> EditResult<Self> {
        let groups: Vec<Group> = groups.into_iter().map(Group::normalized).collect();
        if groups.is_empty() {
            return Err(EditError::validation(
                "a feature document needs at least one group",
            ));
        }
        for (index, group) in groups.iter().enumerate() {
            validate_group_name(&group.name)?;
            if groups[..index].iter().any(|other| other.name == group.name) {
                return Err(duplicate_group(&group.name));
            }
            for feature in &group.features {
                feature.validate()?;
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn feature(&self, group: usize, item: usize) -> Option<&Feature> {
        self.groups.get(group)?.features.get(item)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn feature_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn position_of_group(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.name == name)
    }

    pub fn add_feature(
        &mut self,
        group: usize,
        name: &str,
        icon: &str,
        description: &str,
    ) -> EditResult<()> {
        self.apply(Mutation::AddFeature {
            group,
            feature: Feature::new(name, icon, description),
        })
    }

    pub fn edit_feature(&mut self, group: usize, item: usize, patch: FeaturePatch) -> EditResult<()> {
        self.apply(Mutation::EditFeature { group, item, patch })
    }

    pub fn delete_feature(&mut self, group: usize, item: usize) -> EditResult<()> {
        self.apply(Mutation::DeleteFeature { group, item })
    }

    pub fn add_group(&mut self, name: &str) -> EditResult<()> {
        self.apply(Mutation::AddGroup {
            name: name.to_owned(),
        })
    }

    pub fn rename_group(&mut self, group: usize, name: &str) -> EditResult<()> {
        self.apply(Mutation::RenameGroup {
            group,
            name: name.to_owned(),
        })
    }

    pub fn delete_group(&mut self, group: usize) -> EditResult<()> {
        self.apply(Mutation::DeleteGroup { group })
    }

    /// Applies a mutation, leaving the document untouched when it fails.
    pub fn apply(&mut self, mutation: Mutation) -> EditResult<()> {
        match mutation {
            Mutation::AddFeature { group, feature } => {
                let feature = feature.normalized();
                feature.validate()?;
                let count = self.groups.len();
                let target = self.groups.get_mut(group).ok_or_else(|| {
                    EditError::validation(format!(
                        "group {} does not exist (document has {count})",
                        group + 1
                    ))
                })?;
                target.features.push(feature);
            }
            Mutation::EditFeature { group, item, patch } => {
                let current = self
                    .feature(group, item)
                    .ok_or(EditError::NotFound(Target::Feature { group, item }))?;
                let updated = patch.applied_to(current);
                updated.validate()?;
                self.groups[group].features[item] = updated;
            }
            Mutation::DeleteFeature { group, item } => {
                if self.feature(group, item).is_none() {
                    return Err(EditError::NotFound(Target::Feature { group, item }));
                }
                self.groups[group].features.remove(item);
            }
            Mutation::AddGroup { name } => {
                let name = normalize_field(&name);
                validate_group_name(&name)?;
                if self.position_of_group(&name).is_some() {
                    return Err(duplicate_group(&name));
                }
                self.groups.push(Group::new(name));
            }
            Mutation::RenameGroup { group, name } => {
                if group >= self.groups.len() {
                    return Err(EditError::NotFound(Target::Group(group)));
                }
                let name = normalize_field(&name);
                validate_group_name(&name)?;
                if self
                    .position_of_group(&name)
                    .is_some_and(|existing| existing != group)
                {
                    return Err(duplicate_group(&name));
                }
                self.groups[group].name = name;
            }
            Mutation::DeleteGroup { group } => {
                if group >= self.groups.len() {
                    return Err(EditError::NotFound(Target::Group(group)));
                }
                if self.groups.len() == 1 {
                    return Err(EditError::validation(
                        "cannot delete the only group -- add another group first",
                    ));
                }
                self.groups.remove(group);
            }
        }
        Ok(())
    }
}

fn validate_group_name(name: &str) -> EditResult<()> {
    if name.is_empty() {
        return Err(EditError::validation(
            "group name is required -- enter a name and retry",
        ));
    }
    Ok(())
}

fn duplicate_group(name: &str) -> EditError {
    EditError::validation(format!(
        "group {name:?} already exists -- choose another name"
    ))
}

#[cfg(test)]
mod tests {
    use super::{Document, EditError, Feature, FeaturePatch, Group, Mutation, SEED_GROUP_NAME};
    use crate::Target;

    #[test]
    fn seed_ships_one_group_with_five_features() {
        let document = Document::seed();
        assert_eq!(document.group_count(), 1);
        assert_eq!(document.groups()[0].name, SEED_GROUP_NAME);
        assert_eq!(document.feature_count(), 5);
        assert_eq!(
            document.feature(0, 4).map(|feature| feature.icon.as_str()),
            Some("✅ / ❌")
        );
    }

    #[test]
    fn new_feature_trims_and_flattens_fields() {
        let feature = Feature::new("  Export \n", " 📤 ", "line one\nline two  ");
        assert_eq!(feature.name, "Export");
        assert_eq!(feature.icon, "📤");
        assert_eq!(feature.description, "line one line two");
    }

    #[test]
    fn add_feature_appends_to_group() {
        let mut document = Document::seed();
        document
            .add_feature(0, "Export", "📤", "Export tasks")
            .expect("add should succeed");
        assert_eq!(document.groups()[0].len(), 6);
        assert_eq!(
            document.feature(0, 5),
            Some(&Feature::new("Export", "📤", "Export tasks"))
        );
    }

    #[test]
    fn add_feature_rejects_blank_name_and_bad_group() {
        let mut document = Document::seed();
        let before = document.clone();

        let blank = document.add_feature(0, "   ", "x", "y");
        assert!(matches!(blank, Err(EditError::Validation(_))));

        let missing = document.add_feature(3, "Export", "", "");
        assert!(matches!(missing, Err(EditError::Validation(_))));
        assert_eq!(document, before);
    }

    #[test]
    fn edit_feature_updates_only_supplied_fields() {
        let mut document = Document::seed();
        document
            .edit_feature(
                0,
                1,
                FeaturePatch {
                    description: Some("Shows everything".to_owned()),
                    ..FeaturePatch::default()
                },
            )
            .expect("edit should succeed");

        let feature = document.feature(0, 1).expect("feature exists");
        assert_eq!(feature.name, "View Tasks");
        assert_eq!(feature.icon, "📋");
        assert_eq!(feature.description, "Shows everything");
    }

    #[test]
    fn edit_feature_reports_stale_index() {
        let mut document = Document::seed();
        let result = document.edit_feature(0, 9, FeaturePatch::default());
        assert_eq!(
            result,
            Err(EditError::NotFound(Target::Feature { group: 0, item: 9 }))
        );
    }

    #[test]
    fn edit_feature_rejects_blanking_the_name() {
        let mut document = Document::seed();
        let result = document.edit_feature(
            0,
            0,
            FeaturePatch {
                name: Some("  ".to_owned()),
                ..FeaturePatch::default()
            },
        );
        assert!(matches!(result, Err(EditError::Validation(_))));
        assert_eq!(document, Document::seed());
    }

    #[test]
    fn delete_feature_removes_entry() {
        let mut document = Document::seed();
        document.delete_feature(0, 0).expect("delete should succeed");
        assert_eq!(document.groups()[0].len(), 4);
        assert_eq!(
            document.feature(0, 0).map(|feature| feature.name.as_str()),
            Some("View Tasks")
        );
        assert_eq!(
            document.delete_feature(0, 4),
            Err(EditError::NotFound(Target::Feature { group: 0, item: 4 }))
        );
    }

    #[test]
    fn group_names_stay_unique() {
        let mut document = Document::seed();
        document.add_group("Later").expect("new group");
        assert!(matches!(
            document.add_group(" Later "),
            Err(EditError::Validation(_))
        ));
        assert!(matches!(
            document.rename_group(1, SEED_GROUP_NAME),
            Err(EditError::Validation(_))
        ));
        document
            .rename_group(1, "Later")
            .expect("renaming to the same name is accepted");
        assert_eq!(document.group_count(), 2);
    }

    #[test]
    fn deleting_the_last_group_is_rejected() {
        let mut document = Document::seed();
        assert!(matches!(
            document.delete_group(0),
            Err(EditError::Validation(_))
        ));
        document.add_group("Later").expect("new group");
        document.delete_group(0).expect("delete first group");
        assert_eq!(document.groups()[0].name, "Later");
        assert_eq!(
            document.delete_group(4),
            Err(EditError::NotFound(Target::Group(4)))
        );
    }

    #[test]
    fn from_groups_enforces_invariants() {
        assert!(Document::from_groups(Vec::new()).is_err());
        assert!(Document::from_groups(vec![Group::new("A"), Group::new("A")]).is_err());
        assert!(Document::from_groups(vec![Group::new(" ")]).is_err());
        assert!(
            Document::from_groups(vec![Group::with_features(
                "A",
                vec![Feature::new("", "x", "y")]
            )])
            .is_err()
        );
        assert!(Document::from_groups(vec![Group::new("A"), Group::new("B")]).is_ok());
    }

    #[test]
    fn from_groups_normalizes_struct_literal_fields() {
        let raw = Group {
            name: " Later\n".to_owned(),
            features: vec![Feature {
                name: "Multi\nline ".to_owned(),
                icon: " 📤".to_owned(),
                description: "first\r\nsecond".to_owned(),
            }],
        };
        let document = Document::from_groups(vec![raw]).expect("valid after normalizing");
        assert_eq!(document.groups()[0].name, "Later");
        assert_eq!(
            document.feature(0, 0),
            Some(&Feature::new("Multi line", "📤", "first  second"))
        );

        let blank = Group {
            name: " \n ".to_owned(),
            features: Vec::new(),
        };
        assert!(Document::from_groups(vec![blank]).is_err());
    }

    #[test]
    fn add_feature_mutation_normalizes_struct_literal() {
        let mut document = Document::seed();
        document
            .apply(Mutation::AddFeature {
                group: 0,
                feature: Feature {
                    name: " Export\n".to_owned(),
                    icon: "📤".to_owned(),
                    description: "a\nb".to_owned(),
                },
            })
            .expect("add should succeed");
        assert_eq!(
            document.feature(0, 5),
            Some(&Feature::new("Export", "📤", "a b"))
        );
    }

    #[test]
    fn patch_between_tracks_changed_fields() {
        let original = Feature::new("Add Task", "✏️", "Creates tasks");
        let edited = Feature::new("Add Task", "➕", "Creates tasks");
        let patch = FeaturePatch::between(&original, &edited);
        assert_eq!(patch.name, None);
        assert_eq!(patch.icon.as_deref(), Some("➕"));
        assert!(FeaturePatch::between(&original, &original).is_empty());
    }

    #[test]
    fn mutation_verbs_are_human_readable() {
        assert_eq!(Mutation::DeleteGroup { group: 0 }.verb(), "deleted group");
    }
}
