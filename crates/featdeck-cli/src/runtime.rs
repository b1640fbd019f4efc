// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use featdeck_app::Document;
use featdeck_store::Store;
use featdeck_tui::SaveOutcome;

pub struct FileRuntime {
    store: Store,
}

impl FileRuntime {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl featdeck_tui::EditorRuntime for FileRuntime {
    fn save_document(&mut self, document: &Document) -> Result<SaveOutcome> {
        let report = self.store.save(document)?;
        Ok(SaveOutcome {
            location: report.path.display().to_string(),
            group_count: report.group_count,
            feature_count: report.feature_count,
            saved_at: report.saved_at,
        })
    }

    fn location(&self) -> String {
        self.store.path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::FileRuntime;
    use anyhow::Result;
    use featdeck_app::Document;
    use featdeck_store::{Store, deserialize};
    use featdeck_tui::EditorRuntime;

    #[test]
    fn save_document_writes_feature_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("features.md");
        let mut runtime = FileRuntime::new(Store::open(&path)?);

        let outcome = runtime.save_document(&Document::seed())?;

        assert_eq!(outcome.location, path.display().to_string());
        assert_eq!(outcome.feature_count, 5);
        assert_eq!(outcome.group_count, 1);
        assert_eq!(deserialize(&std::fs::read_to_string(&path)?)?, Document::seed());
        assert_eq!(runtime.location(), path.display().to_string());
        Ok(())
    }

    #[test]
    fn save_document_error_names_the_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "")?;
        let mut runtime = FileRuntime::new(Store::open(blocker.join("features.md"))?);

        let error = runtime
            .save_document(&Document::seed())
            .expect_err("save under a regular file should fail");
        assert!(format!("{error:#}").contains("blocker"));
        Ok(())
    }
}
