//! Binder configuration.

use serde::{Deserialize, Serialize};

/// How bound-value placeholders are written into rendered SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` for every value (JDBC, MySQL, SQLite).
    #[default]
    QuestionMark,
    /// `$1`, `$2`, ... numbered from the start of the statement (Postgres).
    Numbered,
}

impl PlaceholderStyle {
    /// Writes the placeholder for the value at 1-based `position`.
    pub fn write(self, sql: &mut String, position: usize) {
        match self {
            PlaceholderStyle::QuestionMark => sql.push('?'),
            PlaceholderStyle::Numbered => {
                sql.push('$');
                sql.push_str(&position.to_string());
            }
        }
    }
}

/// Configuration for operator construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Placeholder syntax of rendered statements (default: `?`).
    #[serde(default)]
    pub placeholder_style: PlaceholderStyle,
}

impl BinderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder style.
    #[must_use]
    pub fn with_placeholder_style(mut self, placeholder_style: PlaceholderStyle) -> Self {
        self.placeholder_style = placeholder_style;
        self
    }
}
