// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Text format for feature documents.
//!
//! ```text
//! ## Core Features
//!
//! - ✏️ | Add Task | Creates new tasks
//! ```
//!
//! Inside any field `\` is written as `\\` and `|` as `\|`.

use featdeck_app::{Document, Feature, Group};
use thiserror::Error;

const HEADING_PREFIX: &str = "##";
const ITEM_PREFIX: char = '-';
const FIELD_SEPARATOR: char = '|';
const ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct FormatError {
    /// 1-based line number in the source text.
    pub line: usize,
    pub message: String,
}

impl FormatError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    for (index, group) in document.groups().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(HEADING_PREFIX);
        out.push(' ');
        out.push_str(&escape(&group.name));
        out.push('\n');
        if !group.is_empty() {
            out.push('\n');
        }
        for feature in &group.features {
            out.push_str(&format!(
                "{ITEM_PREFIX} {} {FIELD_SEPARATOR} {} {FIELD_SEPARATOR} {}\n",
                escape(&feature.icon),
                escape(&feature.name),
                escape(&feature.description),
            ));
        }
    }
    out
}

pub fn deserialize(text: &str) -> Result<Document, FormatError> {
    let mut groups: Vec<(usize, Group)> = Vec::new();
    let mut last_line = 0;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = heading_text(line) {
            let name = unescape(rest, line_no)?.trim().to_owned();
            if name.is_empty() {
                return Err(FormatError::new(
                    line_no,
                    "group heading has no name -- write `## <group name>`",
                ));
            }
            if let Some((first, _)) = groups.iter().find(|(_, group)| group.name == name) {
                return Err(FormatError::new(
                    line_no,
                    format!("group {name:?} already appears on line {first}"),
                ));
            }
            groups.push((line_no, Group::new(name)));
            continue;
        }

        if let Some(rest) = item_text(line) {
            let Some((_, group)) = groups.last_mut() else {
                return Err(FormatError::new(
                    line_no,
                    "feature listed before any `## <group name>` heading",
                ));
            };
            let fields = split_fields(rest, line_no)?;
            let [icon, name, description] = fields.as_slice() else {
                return Err(FormatError::new(
                    line_no,
                    format!(
                        "expected `- <icon> | <name> | <description>`, found {} field(s)",
                        fields.len()
                    ),
                ));
            };
            let feature = Feature::new(name, icon, description);
            if feature.name.is_empty() {
                return Err(FormatError::new(line_no, "feature name is blank"));
            }
            group.features.push(feature);
            continue;
        }

        return Err(FormatError::new(
            line_no,
            format!("unrecognized line {line:?} -- expected a `##` heading or a `-` item"),
        ));
    }

    if groups.is_empty() {
        return Err(FormatError::new(
            last_line.max(1),
            "no groups found -- add a `## <group name>` heading",
        ));
    }

    let groups = groups.into_iter().map(|(_, group)| group).collect();
    Document::from_groups(groups).map_err(|error| FormatError::new(last_line, error.to_string()))
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(HEADING_PREFIX)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

fn item_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(ITEM_PREFIX)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == ESCAPE || ch == FIELD_SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    out
}

fn unescape(value: &str, line: usize) -> Result<String, FormatError> {
    let mut fields = split(value, line, false)?;
    Ok(fields.pop().unwrap_or_default())
}

fn split_fields(value: &str, line: usize) -> Result<Vec<String>, FormatError> {
    split(value, line, true)
}

fn split(value: &str, line: usize, on_separator: bool) -> Result<Vec<String>, FormatError> {
    let mut fields = vec![String::new()];
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        let current = fields.last_mut().ok_or_else(|| FormatError::new(line, "empty field list"))?;
        match ch {
            ESCAPE => match chars.next() {
                Some(next @ (ESCAPE | FIELD_SEPARATOR)) => current.push(next),
                Some(other) => {
                    return Err(FormatError::new(
                        line,
                        format!("unknown escape `\\{other}` -- only `\\\\` and `\\|` are allowed"),
                    ));
                }
                None => {
                    return Err(FormatError::new(line, "dangling `\\` at end of line"));
                }
            },
            FIELD_SEPARATOR if on_separator => fields.push(String::new()),
            _ => current.push(ch),
        }
    }
    Ok(fields
        .into_iter()
        .map(|field| field.trim().to_owned())
        .collect())
}
