//! Menu configuration options.
//!
//! Options are injected once into a menu chain and copied into every menu
//! instance it mounts. All fields default to off, so an absent file, an
//! empty file and `MenuOptions::default()` behave the same.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Options shared by every menu instance in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuOptions {
    /// Request input focus one render pass after a menu mounts.
    pub auto_focus: bool,
    /// Render entries with the alternate styling variant.
    pub use_alternate_styling: bool,
}

impl MenuOptions {
    /// Create options with everything off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            auto_focus: false,
            use_alternate_styling: false,
        }
    }

    /// Set auto-focus.
    #[must_use]
    pub const fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Set alternate styling.
    #[must_use]
    pub const fn with_alternate_styling(mut self, alternate: bool) -> Self {
        self.use_alternate_styling = alternate;
        self
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: Self = toml::from_str(content)?;
        Ok(options)
    }

    /// Load options from a TOML file.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?options, "loaded menu options");
        Ok(options)
    }

    /// Serialize options back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
