//! View location: turning a name into an invocable view.
//!
//! Two lookup strategies exist, matching how hosting code refers to views:
//!
//! 1. **Direct** ([`ViewLocator::get_view`]): the caller gives an exact
//!    path — `"mail/welcome"`, `"mail/welcome.jinja"`, or a `./`-relative
//!    path resolved against the view currently executing.
//! 2. **Contextual** ([`ViewLocator::find_view`]): the caller gives a bare
//!    name — `"welcome"` — and configured location formats expand it with
//!    route values (`{controller}`, `{area}`) into concrete candidates.
//!
//! Either strategy reports a miss together with every location it probed, so
//! callers can produce a complete "not found" diagnosis.
//!
//! [`JinjaViewLocator`] is the built-in MiniJinja-backed implementation;
//! [`LocatorConfig`] describes its conventions.

mod config;
mod jinja;

pub use config::LocatorConfig;
pub use jinja::JinjaViewLocator;

use std::collections::BTreeMap;

use crate::context::ActionContext;
use crate::view::ViewLookup;

/// Locates views by exact path or by contextual convention.
pub trait ViewLocator: Send + Sync {
    /// Direct lookup by exact name or path.
    ///
    /// `executing_path` is the path of the view currently rendering, if any;
    /// `./`- and `../`-relative `view_path`s resolve against its directory.
    /// `is_main_page` distinguishes page renders from partial renders and is
    /// part of the locator contract; implementations may resolve both the
    /// same way for direct paths.
    fn get_view(
        &self,
        executing_path: Option<&str>,
        view_path: &str,
        is_main_page: bool,
    ) -> ViewLookup;

    /// Contextual search expanding configured location formats with the
    /// context's route values.
    fn find_view(
        &self,
        context: &ActionContext,
        view_name: &str,
        is_main_page: bool,
    ) -> ViewLookup;
}

/// Expands a location format with a view name and route values.
///
/// `{name}` substitutes the view name; any other `{placeholder}` substitutes
/// the matching route value. Returns `None` when a placeholder has no value
/// (or an empty one) — such formats are skipped, not errors. Text outside
/// placeholders, including an unterminated `{`, passes through literally.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use offstage::locator::expand_location;
///
/// let mut route = BTreeMap::new();
/// route.insert("controller".to_string(), "mail".to_string());
///
/// let expanded = expand_location("{controller}/{name}", "welcome", &route);
/// assert_eq!(expanded.as_deref(), Some("mail/welcome"));
///
/// assert_eq!(expand_location("{area}/{name}", "welcome", &route), None);
/// ```
pub fn expand_location(
    format: &str,
    name: &str,
    values: &BTreeMap<String, String>,
) -> Option<String> {
    let mut out = String::with_capacity(format.len() + name.len());
    let mut rest = format;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                if key == "name" {
                    out.push_str(name);
                } else {
                    match values.get(key) {
                        Some(value) if !value.is_empty() => out.push_str(value),
                        _ => return None,
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    Some(out)
}

/// Resolves a `./`- or `../`-relative view path against the executing view.
///
/// Non-relative paths are returned unchanged. With no executing path,
/// relative paths resolve against the source root.
pub fn resolve_relative(executing: Option<&str>, path: &str) -> String {
    if !path.starts_with("./") && !path.starts_with("../") {
        return path.to_string();
    }

    let mut segments: Vec<&str> = match executing {
        Some(executing) => {
            let mut parts: Vec<&str> = executing.split('/').collect();
            parts.pop(); // drop the file name
            parts
        }
        None => Vec::new(),
    };

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_expand_substitutes_name_and_route_values() {
        let values = route(&[("controller", "mail"), ("area", "admin")]);
        assert_eq!(
            expand_location("{area}/{controller}/{name}", "welcome", &values).as_deref(),
            Some("admin/mail/welcome")
        );
    }

    #[test]
    fn test_expand_skips_on_missing_placeholder() {
        let values = route(&[("controller", "mail")]);
        assert_eq!(expand_location("{area}/{name}", "welcome", &values), None);
    }

    #[test]
    fn test_expand_skips_on_empty_value() {
        let values = route(&[("area", "")]);
        assert_eq!(expand_location("{area}/{name}", "welcome", &values), None);
    }

    #[test]
    fn test_expand_without_placeholders_is_identity() {
        let values = route(&[]);
        assert_eq!(
            expand_location("shared/header", "x", &values).as_deref(),
            Some("shared/header")
        );
    }

    #[test]
    fn test_expand_keeps_unterminated_brace_literal() {
        let values = route(&[]);
        assert_eq!(
            expand_location("odd{brace", "x", &values).as_deref(),
            Some("odd{brace")
        );
    }

    #[test]
    fn test_resolve_relative_sibling() {
        assert_eq!(
            resolve_relative(Some("mail/welcome.jinja"), "./_footer"),
            "mail/_footer"
        );
    }

    #[test]
    fn test_resolve_relative_parent() {
        assert_eq!(
            resolve_relative(Some("mail/campaigns/spring.jinja"), "../shared/layout"),
            "mail/shared/layout"
        );
    }

    #[test]
    fn test_resolve_relative_without_executing_path() {
        assert_eq!(resolve_relative(None, "./welcome"), "welcome");
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        assert_eq!(
            resolve_relative(Some("mail/welcome.jinja"), "shared/layout"),
            "shared/layout"
        );
    }
}
