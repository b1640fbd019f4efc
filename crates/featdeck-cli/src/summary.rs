// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crossterm::style::Stylize;
use featdeck_app::Document;
use std::fmt::Write;

const USAGE_HINT: &str = "Run `featdeck` to add, edit, or remove features.";

/// Plain-text or ANSI-styled feature summary: one heading per group, one block per feature.
pub fn render_summary(document: &Document, styled: bool) -> String {
    let mut out = String::new();
    for group in document.groups() {
        let heading = format!("{} -- Feature Summary", group.name);
        if styled {
            let _ = writeln!(out, "\n{}\n", heading.as_str().cyan().bold());
        } else {
            let _ = writeln!(out, "\n{heading}\n");
        }

        if group.is_empty() {
            let _ = writeln!(out, "  (no features)\n");
            continue;
        }

        for feature in &group.features {
            let title = if feature.icon.is_empty() {
                feature.name.clone()
            } else {
                format!("{} {}", feature.icon, feature.name)
            };
            if styled {
                let _ = writeln!(out, "  {}", title.as_str().magenta().bold());
                if !feature.description.is_empty() {
                    let _ = writeln!(out, "  {}", feature.description.as_str().white());
                }
            } else {
                let _ = writeln!(out, "  {title}");
                if !feature.description.is_empty() {
                    let _ = writeln!(out, "  {}", feature.description);
                }
            }
            out.push('\n');
        }
    }

    if styled {
        let _ = writeln!(out, "{}", USAGE_HINT.dim());
    } else {
        let _ = writeln!(out, "{USAGE_HINT}");
    }
    out
}
