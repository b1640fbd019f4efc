// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod codec;

use anyhow::{Context, anyhow};
use featdeck_app::Document;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;

pub use codec::{FormatError, deserialize, serialize};

pub const APP_NAME: &str = "featdeck";
pub const FILE_ENV: &str = "FEATDECK_FILE";
pub const DEFAULT_FILE_NAME: &str = "features.md";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    InvalidPath(String),
    #[error("parse feature file {}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// The error and its cause on one line, for the status bar.
    pub fn summary(&self) -> String {
        match self {
            Self::InvalidPath(message) => message.clone(),
            Self::Format { source, .. } => format!("{self}: {source}"),
            Self::Io { source, .. } => format!("{self}: {source}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub group_count: usize,
    pub feature_count: usize,
    pub saved_at: OffsetDateTime,
}

/// A feature document backed by one text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        validate_file_path(&path.to_string_lossy())?;
        if path.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "feature file path {} is a directory; pass a file path",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and parses the file. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Document>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "feature file does not exist yet");
                return Ok(None);
            }
            Err(error) => return Err(StoreError::io("read", &self.path, error)),
        };

        let document = deserialize(&text).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            groups = document.group_count(),
            features = document.feature_count(),
            "loaded feature file"
        );
        Ok(Some(document))
    }

    pub fn load_or_seed(&self) -> Result<Document, StoreError> {
        Ok(self.load()?.unwrap_or_else(Document::seed))
    }

    /// Writes the whole document to a sibling temp file and renames it over the target, so a
    /// failed save leaves the previous file intact.
    pub fn save(&self, document: &Document) -> Result<SaveReport, StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|error| StoreError::io("create directory", parent, error))?;
        }

        let text = serialize(document);
        let temp = self.temp_path();
        if let Err(error) = fs::write(&temp, &text) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::io("write", &temp, error));
        }
        if let Err(error) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::io("replace", &self.path, error));
        }

        let report = SaveReport {
            path: self.path.clone(),
            bytes: text.len(),
            group_count: document.group_count(),
            feature_count: document.feature_count(),
            saved_at: OffsetDateTime::now_utc(),
        };
        tracing::info!(
            path = %report.path.display(),
            bytes = report.bytes,
            features = report.feature_count,
            "saved feature file"
        );
        Ok(report)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

pub fn default_file_path() -> anyhow::Result<PathBuf> {
    if let Some(override_path) = env::var_os(FILE_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {FILE_ENV} to a writable feature file path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join(DEFAULT_FILE_NAME))
}

pub fn validate_file_path(path: &str) -> Result<(), StoreError> {
    if path.trim().is_empty() {
        return Err(StoreError::InvalidPath(
            "feature file path must not be empty".to_owned(),
        ));
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            return Err(StoreError::InvalidPath(format!(
                "feature file path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            )));
        }
    }

    if path.starts_with("file:") {
        return Err(StoreError::InvalidPath(format!(
            "feature file path {path:?} uses file: URI syntax; pass a plain filesystem path"
        )));
    }

    Ok(())
}
