//! The on-disk snapshot format
//!
//! An INI-like text layout, one section per widget kind, one line per widget:
//!
//! ```text
//! [Sliders]
//! Radius | 6bd7f2a1-08a3-4b4e-9c60-1f0d6c76f2ce = 1.5
//! B      | 0a1a44b8-4a56-4a2c-b1f7-6d9d0c9f3a11 = 2.75
//! [Boolean Toggles]
//! Bake | 7c7f2f4e-7e79-44a0-9a35-2d8c16f2b0d4 = True
//! ```
//!
//! Labels are right-padded to the widest label of their own section, so the
//! identifier column lines up within a section. Parsing is the forgiving
//! inverse: anything that does not look like a section header or a well
//! formed entry is skipped, never fatal.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// One saved widget value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Display label as written to the file (padding stripped on parse).
    pub label: String,
    pub id: Uuid,
    /// Canonical value text.
    pub value: String,
}

/// All entries of one widget kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSection {
    /// Section header line, brackets included.
    pub label: String,
    pub entries: Vec<StateEntry>,
}

impl StateSection {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, id: Uuid, value: impl Into<String>) {
        self.entries.push(StateEntry {
            label: label.into(),
            id,
            value: value.into(),
        });
    }
}

/// In-memory form of one state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub sections: Vec<StateSection>,
}

impl StateFile {
    /// Total entry count across sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Serialize to the line format.
    ///
    /// Two passes per section: the label column width is the widest label of
    /// that section, determined before any of its lines are written.
    /// Sections without entries are omitted entirely, header included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if section.entries.is_empty() {
                continue;
            }
            let width = section
                .entries
                .iter()
                .map(|e| e.label.chars().count())
                .max()
                .unwrap_or(0);
            out.push_str(&section.label);
            out.push('\n');
            for entry in &section.entries {
                out.push_str(&format!(
                    "{:<width$} | {} = {}\n",
                    entry.label,
                    entry.id,
                    entry.value,
                    width = width
                ));
            }
        }
        out
    }

    /// Parse the line format.
    ///
    /// `known_labels` are the section header lines that exist this session;
    /// a `[`-line matching one of them switches the current section, any
    /// other `[`-line resets it to none. Entry lines split at the first `=`;
    /// the left side splits at the last `|`, which must not be its first
    /// character; the identifier must parse as a Uuid. Anything else is
    /// skipped without aborting the parse, blank lines and lines outside a
    /// section included.
    pub fn parse(input: &str, known_labels: &[&str]) -> StateFile {
        let mut file = StateFile::default();
        let mut current: Option<usize> = None;

        for line in input.lines() {
            if line.starts_with('[') {
                current = known_labels.iter().find(|l| **l == line).map(|label| {
                    match file.sections.iter().position(|s| s.label == **label) {
                        Some(index) => index,
                        None => {
                            file.sections.push(StateSection::new(*label));
                            file.sections.len() - 1
                        }
                    }
                });
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some(section) = current else {
                continue;
            };
            let Some((left, right)) = line.split_once('=') else {
                continue;
            };
            let name_and_id = left.trim();
            let Some(pipe) = name_and_id.rfind('|') else {
                continue;
            };
            if pipe == 0 {
                continue;
            }
            let id_text = name_and_id[pipe + 1..].trim();
            let id = match Uuid::parse_str(id_text) {
                Ok(id) => id,
                Err(_) => {
                    debug!(line, "skipping entry line with unparseable id");
                    continue;
                }
            };
            let label = name_and_id[..pipe].trim_end().to_string();
            file.sections[section].entries.push(StateEntry {
                label,
                id,
                value: right.trim().to_string(),
            });
        }

        file
    }
}
