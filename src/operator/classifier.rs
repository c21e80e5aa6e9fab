//! Statement classification by leading keyword.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DaoError, Result};

/// Coarse kind of a templated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Insert,
    Delete,
    Update,
    Select,
}

impl StatementKind {
    const ALL: [StatementKind; 4] = [
        StatementKind::Insert,
        StatementKind::Delete,
        StatementKind::Update,
        StatementKind::Select,
    ];

    /// Returns the keyword that introduces this kind of statement.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Insert => "INSERT",
            StatementKind::Delete => "DELETE",
            StatementKind::Update => "UPDATE",
            StatementKind::Select => "SELECT",
        }
    }

    /// Returns true for INSERT, DELETE and UPDATE.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StatementKind::Select)
    }

    /// Classifies a raw template by its leading keyword.
    ///
    /// Leading whitespace is skipped; the keyword is matched
    /// case-insensitively and must be followed by whitespace. Keywords
    /// anywhere else in the template are ignored.
    ///
    /// # Errors
    ///
    /// Returns `UnclassifiedStatement` if no keyword matches.
    pub fn classify(template: &str) -> Result<Self> {
        let trimmed = template.trim_start();
        Self::ALL
            .into_iter()
            .find(|kind| starts_with_keyword(trimmed, kind.keyword()))
            .ok_or_else(|| {
                DaoError::UnclassifiedStatement(format!(
                    "template must start with INSERT, DELETE, UPDATE or SELECT: {}",
                    preview(trimmed)
                ))
            })
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let Some(head) = text.get(..keyword.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(keyword)
        && text[keyword.len()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
}

fn preview(text: &str) -> String {
    const MAX: usize = 32;
    match text.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
