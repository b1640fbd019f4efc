// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use featdeck_app::{Document, Feature, Group};
use featdeck_store::{Store, StoreError, deserialize, serialize, validate_file_path};
use featdeck_testkit::{FeatureFaker, sample_document, sample_text, temp_feature_path};
use std::fs;

#[test]
fn validate_file_path_rejects_uri_forms() {
    assert!(validate_file_path("").is_err());
    assert!(validate_file_path("file:features.md").is_err());
    assert!(validate_file_path("https://example.com/features.md").is_err());
    assert!(validate_file_path("/tmp/features.md").is_ok());
    assert!(validate_file_path("notes/features.md").is_ok());
}

#[test]
fn open_rejects_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let error = Store::open(dir.path()).expect_err("directory should be rejected");
    assert!(matches!(error, StoreError::InvalidPath(_)));
    Ok(())
}

#[test]
fn missing_file_loads_as_none_and_seed() -> Result<()> {
    let (_dir, path) = temp_feature_path()?;
    let store = Store::open(&path)?;
    assert!(!store.exists());
    assert_eq!(store.load()?, None);
    assert_eq!(store.load_or_seed()?, Document::seed());
    Ok(())
}

#[test]
fn save_then_load_returns_same_document() -> Result<()> {
    let (_dir, path) = temp_feature_path()?;
    let store = Store::open(&path)?;
    let document = sample_document();

    let report = store.save(&document)?;
    assert_eq!(report.path, path);
    assert_eq!(report.group_count, 2);
    assert_eq!(report.feature_count, 5);
    assert_eq!(report.bytes, fs::read_to_string(&path)?.len());

    assert_eq!(store.load()?, Some(document));
    Ok(())
}

#[test]
fn save_overwrites_and_leaves_no_temp_file() -> Result<()> {
    let (dir, path) = temp_feature_path()?;
    fs::write(&path, "stale contents that are not a feature file")?;
    let store = Store::open(&path)?;

    store.save(&Document::seed())?;

    let names: Vec<_> = fs::read_dir(dir.path())?
        .map(|entry| entry.map(|entry| entry.file_name()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names.len(), 1);
    assert_eq!(fs::read_to_string(&path)?, serialize(&Document::seed()));
    Ok(())
}

#[test]
fn save_creates_missing_parent_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("deeper").join("features.md");
    let store = Store::open(&path)?;
    store.save(&Document::seed())?;
    assert!(store.exists());
    Ok(())
}

#[test]
fn save_into_unwritable_location_reports_io_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file where a directory should be")?;
    let store = Store::open(blocker.join("features.md"))?;

    let error = store.save(&Document::seed()).expect_err("save should fail");
    assert!(matches!(error, StoreError::Io { .. }));
    assert!(!error.summary().is_empty());
    Ok(())
}

#[test]
fn corrupt_file_reports_format_error_with_line() -> Result<()> {
    let (_dir, path) = temp_feature_path()?;
    fs::write(&path, "## Core Features\n\nthis is not a list item\n")?;
    let store = Store::open(&path)?;

    let error = store.load().expect_err("corrupt file should fail");
    assert!(error.is_format());
    match &error {
        StoreError::Format { source, .. } => assert_eq!(source.line, 3),
        other => panic!("expected format error, got {other:?}"),
    }
    assert!(error.summary().contains("line 3"));
    Ok(())
}

#[test]
fn sample_text_parses_with_empty_description_and_group() -> Result<()> {
    let document = deserialize(sample_text())?;
    assert_eq!(document.group_count(), 2);
    assert_eq!(
        document.feature(0, 1),
        Some(&Feature::new("Remind", "🔔", ""))
    );
    assert!(document.groups()[1].is_empty());
    Ok(())
}

#[test]
fn generated_documents_round_trip() -> Result<()> {
    let mut faker = FeatureFaker::new(7);
    for groups in 1..5 {
        let mut document = faker.document(groups, groups * 2);
        let script = faker.script(&document, 20);
        for mutation in script {
            document.apply(mutation)?;
        }
        assert_eq!(deserialize(&serialize(&document))?, document);
    }
    Ok(())
}

#[test]
fn struct_literal_fields_round_trip_after_from_groups() -> Result<()> {
    let document = Document::from_groups(vec![Group {
        name: "Later \n".to_owned(),
        features: vec![Feature {
            name: " Multi\nline".to_owned(),
            icon: "📤 ".to_owned(),
            description: "keeps | pipes\nand breaks".to_owned(),
        }],
    }])?;
    let text = serialize(&document);
    assert_eq!(text.lines().count(), 3);
    assert_eq!(deserialize(&text)?, document);
    Ok(())
}
