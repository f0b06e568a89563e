//! Settings file for the composer markup tools.
//!
//! ```toml
//! [shorthand]
//! enabled = true
//!
//! [commit]
//! strip_placeholders = true
//! ```
//!
//! Every section and key is optional. A missing file is not an error: callers
//! get `Ok(None)` and fall back to [`Config::default`].

use anyhow::Context;
use composer_markup_engine::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings in {path} are malformed: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shorthand: ShorthandSettings,
    pub commit: CommitSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorthandSettings {
    /// Convert `**`, `__`, `~~`, `||` and backtick runs into formatting.
    pub enabled: bool,
}

impl Default for ShorthandSettings {
    fn default() -> Self {
        Self {
            enabled: !ParseOptions::default().skip_markdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSettings {
    /// Drop caret placeholders from committed message text.
    pub strip_placeholders: bool,
}

impl Default for CommitSettings {
    fn default() -> Self {
        Self {
            strip_placeholders: ParseOptions::default().strip_placeholders,
        }
    }
}

impl Config {
    /// Reads settings from `path`, expanding `~` and environment variables in
    /// it first.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = expand(path.as_ref());
        if !path.is_file() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::default_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = expand(path.as_ref());
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating settings directory {}", dir.display()))?;
        }
        let body = toml::to_string_pretty(self).context("encoding settings")?;
        std::fs::write(&path, body)
            .with_context(|| format!("writing settings to {}", path.display()))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::default_path())
    }

    /// `~/.config/composer-markup/config.toml`, with `~` expanded.
    pub fn default_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~/.config/composer-markup/config.toml").as_ref())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            skip_markdown: !self.shorthand.enabled,
            strip_placeholders: self.commit.strip_placeholders,
        }
    }
}

/// Unknown variables leave the path as written.
fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .unwrap_or_else(|_| path.to_path_buf())
}
