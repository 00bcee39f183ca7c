use serde::{Deserialize, Serialize};

/// The two file suffixes that distinguish otherwise mirrored trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialects {
    #[serde(default = "default_primary")]
    pub primary_extension: String,
    #[serde(default = "default_secondary")]
    pub secondary_extension: String,
}

fn default_primary() -> String {
    ".go".to_string()
}

fn default_secondary() -> String {
    ".gno".to_string()
}

impl Default for Dialects {
    fn default() -> Self {
        Self {
            primary_extension: default_primary(),
            secondary_extension: default_secondary(),
        }
    }
}

/// Which dialect the source directory is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Source uses the primary extension, destination the secondary one
    #[default]
    PrimaryToSecondary,
    /// Source uses the secondary extension, destination the primary one
    SecondaryToPrimary,
}

impl Direction {
    pub fn from_source_is_secondary(source_is_secondary: bool) -> Self {
        if source_is_secondary {
            Direction::SecondaryToPrimary
        } else {
            Direction::PrimaryToSecondary
        }
    }
}

/// Resolved suffixes for one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionPair {
    pub source: String,
    pub destination: String,
}

impl Dialects {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary_extension: primary.into(),
            secondary_extension: secondary.into(),
        }
    }

    pub fn extensions(&self, direction: Direction) -> ExtensionPair {
        match direction {
            Direction::PrimaryToSecondary => ExtensionPair {
                source: self.primary_extension.clone(),
                destination: self.secondary_extension.clone(),
            },
            Direction::SecondaryToPrimary => ExtensionPair {
                source: self.secondary_extension.clone(),
                destination: self.primary_extension.clone(),
            },
        }
    }

    /// Strip a trailing primary suffix, then a trailing secondary suffix
    pub fn strip<'a>(&self, name: &'a str) -> &'a str {
        let name = name.strip_suffix(&self.primary_extension).unwrap_or(name);
        name.strip_suffix(&self.secondary_extension).unwrap_or(name)
    }
}
