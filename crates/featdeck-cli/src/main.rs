// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;
mod summary;

use anyhow::{Context, Result};
use config::Config;
use featdeck_app::{Document, EditorCommand, EditorState};
use featdeck_store::{Store, StoreError};
use runtime::FileRuntime;
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `featdeck --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let feature_path = config.feature_path(options.file.as_deref())?;
    if options.print_path {
        println!("{}", feature_path.display());
        return Ok(());
    }

    let store = Store::open(&feature_path).with_context(|| {
        format!(
            "open feature file {} -- if this path is wrong, pass --file, set [storage].file or FEATDECK_FILE",
            feature_path.display()
        )
    })?;

    if options.check_only {
        let document = store
            .load_or_seed()
            .with_context(|| format!("check feature file {}", feature_path.display()))?;
        println!(
            "ok: {} ({} groups, {} features{})",
            feature_path.display(),
            document.group_count(),
            document.feature_count(),
            if store.exists() { "" } else { ", not created yet" }
        );
        return Ok(());
    }

    if options.summary {
        let document = store.load_or_seed()?;
        print!(
            "{}",
            summary::render_summary(&document, std::io::stdout().is_terminal())
        );
        return Ok(());
    }

    let log_path = config.log_path()?;
    logging::init_tracing(&config.log_level(), &log_path)?;
    tracing::info!(
        config = %options.config_path.display(),
        file = %feature_path.display(),
        "starting featdeck"
    );

    let (document, notice) = load_for_editing(&store)?;
    let mut state = EditorState::new(document);
    if let Some(notice) = notice {
        state.dispatch(EditorCommand::SetStatus(notice));
    }

    let mut runtime = FileRuntime::new(store);
    featdeck_tui::run_app(&mut state, &mut runtime)
}

/// Loads the document to edit. A corrupt file is not fatal: the editor opens the seed document
/// and says why, and the file is only replaced if the user saves.
fn load_for_editing(store: &Store) -> Result<(Document, Option<String>)> {
    match store.load() {
        Ok(Some(document)) => Ok((document, None)),
        Ok(None) => Ok((
            Document::seed(),
            Some(format!(
                "new feature file; press s to create {}",
                store.path().display()
            )),
        )),
        Err(error @ StoreError::Format { .. }) => {
            tracing::warn!(error = %error.summary(), "feature file is corrupt; opening seed document");
            Ok((
                Document::seed(),
                Some(format!(
                    "{} -- showing defaults, saving will overwrite the file",
                    error.summary()
                )),
            ))
        }
        Err(error) => Err(error)
            .with_context(|| format!("load feature file {}", store.path().display())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    file: Option<PathBuf>,
    print_config_path: bool,
    print_path: bool,
    print_example: bool,
    summary: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        file: None,
        print_config_path: false,
        print_path: false,
        print_example: false,
        summary: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--file requires a file path"))?;
                options.file = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--summary" => {
                options.summary = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("featdeck - interactive feature list editor");
    println!("  --config <path>          Use a specific config path");
    println!("  --file <path>            Edit this feature file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved feature file path");
    println!("  --print-example-config   Print a config template");
    println!("  --summary                Print a feature summary and exit");
    println!("  --check                  Validate config + feature file");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, load_for_editing, parse_cli_args};
    use anyhow::Result;
    use featdeck_app::Document;
    use featdeck_store::Store;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/featdeck-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                file: None,
                print_config_path: false,
                print_path: false,
                print_example: false,
                summary: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_file_overrides() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--file", "notes/features.md"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.file, Some(PathBuf::from("notes/features.md")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--file"], default_options_path())
            .expect_err("missing file value should fail");
        assert!(error.to_string().contains("--file requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_summary_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--summary",
                "--check",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_path);
        assert!(options.print_example);
        assert!(options.summary);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn corrupt_feature_file_falls_back_to_seed_with_notice() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("features.md");
        std::fs::write(&path, "- orphan | item | before heading\n")?;

        let (document, notice) = load_for_editing(&Store::open(&path)?)?;
        assert_eq!(document, Document::seed());
        let notice = notice.expect("corrupt file should produce a notice");
        assert!(notice.contains("line 1"), "unexpected notice: {notice}");
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "- orphan | item | before heading\n"
        );
        Ok(())
    }

    #[test]
    fn missing_feature_file_opens_seed_with_hint() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("features.md");
        let (document, notice) = load_for_editing(&Store::open(&path)?)?;
        assert_eq!(document, Document::seed());
        assert!(notice.is_some_and(|notice| notice.contains("press s")));
        assert!(!path.exists());
        Ok(())
    }
}
