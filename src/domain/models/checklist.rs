//! Read-only view of the shared task checklist.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[-*]\s+\[( |x|X)\]\s+(.*)$").expect("checklist pattern is valid")
    })
}

/// One `- [ ]` / `- [x]` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    /// 1-based line number in the task file.
    pub line: usize,
    /// Whether the box is checked.
    pub done: bool,
    /// Item text after the checkbox.
    pub description: String,
}

/// Parsed task checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checklist {
    /// Items in file order.
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Collect checklist lines; everything else is ignored.
    pub fn parse(contents: &str) -> Self {
        let items = contents
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let caps = item_pattern().captures(line)?;
                Some(ChecklistItem {
                    line: idx + 1,
                    done: !caps[1].trim().is_empty(),
                    description: caps[2].trim().to_string(),
                })
            })
            .collect();
        Self { items }
    }

    /// Number of items.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of checked items.
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }

    /// At least one item, and all of them checked.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.completed() == self.total()
    }
}
