//! Skip-Pages Configuration
//!
//! Vendors and test setups can leave pages out of the wizard by listing
//! their ids in a small TOML file:
//!
//! ```toml
//! [pages]
//! skip = ["network", "location"]
//! ```

use crate::page_table::PageId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the skip list is read from unless overridden on the command line
pub const DEFAULT_SKIP_FILE: &str = "/var/lib/initial-setup/skip-pages.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default)]
struct SkipFile {
    #[serde(default)]
    pages: PagesSection,
}

#[derive(Debug, Deserialize, Default)]
struct PagesSection {
    #[serde(default)]
    skip: Vec<String>,
}

/// Page ids that must not be shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    ids: Vec<String>,
}

impl SkipList {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the skip list; a missing file means nothing is skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: SkipFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for id in &file.pages.skip {
            if id.parse::<PageId>().is_err() {
                tracing::warn!("Ignoring unknown page id in {}: {}", path.display(), id);
            }
        }

        Ok(Self::from_ids(file.pages.skip))
    }

    /// Like [`SkipList::load`], but logs and falls back to an empty list.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Self::default()
        })
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.ids.iter().any(|skip| skip == id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_skips_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let skip = SkipList::load(&dir.path().join("absent.toml")).unwrap();
        assert!(skip.is_empty());
    }

    #[test]
    fn test_parse_skip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skip.toml");
        std::fs::write(
            &path,
            r#"
                [pages]
                skip = ["network", "location", "bogus"]
            "#,
        )
        .unwrap();

        let skip = SkipList::load(&path).unwrap();
        assert!(skip.contains(PageId::Network));
        assert!(skip.contains(PageId::Location));
        assert!(!skip.contains(PageId::Account));
    }

    #[test]
    fn test_empty_file_skips_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skip.toml");
        std::fs::write(&path, "").unwrap();

        assert!(SkipList::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skip.toml");
        std::fs::write(&path, "[pages]\nskip = network").unwrap();

        assert!(matches!(SkipList::load(&path), Err(ConfigError::Parse { .. })));
        assert!(SkipList::load_or_default(&path).is_empty());
    }
}
