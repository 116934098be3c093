//! Locator conventions: extensions and location formats.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

/// Recognized view file extensions in priority order.
///
/// When several files share a base name, the extension appearing earlier in
/// the configured list wins for extensionless lookups.
pub const VIEW_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2", ".html"];

/// Default location formats for main-page contextual search.
pub const LOCATION_FORMATS: &[&str] = &[
    "{area}/{controller}/{name}",
    "{controller}/{name}",
    "shared/{name}",
];

/// Default location formats for partial contextual search.
pub const PARTIAL_LOCATION_FORMATS: &[&str] = &[
    "{area}/{controller}/_{name}",
    "{controller}/_{name}",
    "shared/_{name}",
];

/// Conventions driving [`JinjaViewLocator`](super::JinjaViewLocator).
///
/// All fields have defaults, so a YAML document may override only what it
/// cares about:
///
/// ```rust
/// use offstage::locator::LocatorConfig;
///
/// let config = LocatorConfig::from_yaml(r#"
/// location_formats:
///   - "{controller}/{name}"
///   - "common/{name}"
/// "#).unwrap();
///
/// assert_eq!(config.location_formats[1], "common/{name}");
/// assert_eq!(config.extensions[0], ".jinja");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocatorConfig {
    /// Recognized extensions, probed in order for extensionless names.
    pub extensions: Vec<String>,
    /// Location formats searched for main pages.
    pub location_formats: Vec<String>,
    /// Location formats searched for partials.
    pub partial_location_formats: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            extensions: VIEW_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            location_formats: LOCATION_FORMATS.iter().map(|s| s.to_string()).collect(),
            partial_location_formats: PARTIAL_LOCATION_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LocatorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from YAML. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if the document is not valid YAML or
    /// has mistyped fields.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ViewError::Config(e.to_string()))
    }

    /// Returns `true` if `name` ends with a recognized extension.
    pub fn has_known_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Returns the candidate file names for a lookup: the name verbatim when
    /// it already carries a recognized extension, otherwise one candidate
    /// per extension in priority order.
    pub fn candidates(&self, name: &str) -> Vec<String> {
        if self.has_known_extension(name) {
            vec![name.to_string()]
        } else {
            self.extensions
                .iter()
                .map(|ext| format!("{name}{ext}"))
                .collect()
        }
    }
}
