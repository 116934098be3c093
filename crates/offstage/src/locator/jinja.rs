//! MiniJinja-backed view locator.
//!
//! Views come from two sources: directories on disk (searched in
//! registration order) and embedded `(name, content)` entries (compile-time
//! material for deployed builds). Files shadow embedded entries with the
//! same name.
//!
//! # Resolution
//!
//! A lookup name without a recognized extension probes each configured
//! extension in priority order; a name that already carries one is probed
//! verbatim. Every probed candidate is recorded, so a miss can report the
//! full search.
//!
//! # Includes and inheritance
//!
//! The locator installs a MiniJinja loader over the same sources, so
//! `{% include %}` and `{% extends %}` inside views resolve through
//! identical rules, extensionless names included.
//!
//! # Development vs release
//!
//! In debug builds the engine environment is rebuilt on every lookup, so
//! edited view files are picked up without restarting. Release builds cache
//! the environment after the first lookup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};

use super::config::LocatorConfig;
use super::{expand_location, resolve_relative, ViewLocator};
use crate::context::ActionContext;
use crate::error::{Result, ViewError};
use crate::view::{View, ViewContext, ViewLookup};

/// Locates and compiles MiniJinja views.
///
/// # Example
///
/// ```rust
/// use offstage::locator::{JinjaViewLocator, ViewLocator};
///
/// let mut locator = JinjaViewLocator::new();
/// locator.add_embedded("welcome.jinja", "Hello, {{ name }}!");
///
/// let lookup = locator.get_view(None, "welcome", true);
/// assert!(lookup.is_found());
/// ```
pub struct JinjaViewLocator {
    config: LocatorConfig,
    dirs: Vec<PathBuf>,
    embedded: BTreeMap<String, String>,
    env_cache: RwLock<Option<Arc<Environment<'static>>>>,
}

impl Default for JinjaViewLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl JinjaViewLocator {
    /// Creates a locator with the default conventions and no sources.
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    /// Creates a locator with explicit conventions.
    pub fn with_config(config: LocatorConfig) -> Self {
        Self {
            config,
            dirs: Vec::new(),
            embedded: BTreeMap::new(),
            env_cache: RwLock::new(None),
        }
    }

    /// Returns the locator's conventions.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Adds a directory to search for view files.
    ///
    /// Directories are searched in registration order; the first directory
    /// containing a candidate wins.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if the path doesn't exist or isn't a
    /// directory.
    pub fn add_view_dir<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ViewError::Config(format!(
                "view directory does not exist: {}",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(ViewError::Config(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        self.dirs.push(path.to_path_buf());
        self.invalidate();
        Ok(())
    }

    /// Adds an embedded view.
    ///
    /// `name` must include the file extension (e.g. `"mail/welcome.jinja"`);
    /// extensionless lookups still resolve it through the usual probing.
    /// View files shadow embedded entries with the same name.
    pub fn add_embedded(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.embedded.insert(name.into(), content.into());
        self.invalidate();
    }

    /// Adds embedded views from `(name_with_extension, content)` pairs,
    /// typically `include_str!` material.
    pub fn add_embedded_entries(&mut self, entries: &[(&str, &str)]) {
        for (name, content) in entries {
            self.embedded.insert(name.to_string(), content.to_string());
        }
        self.invalidate();
    }

    fn invalidate(&self) {
        *self.env_cache.write().expect("environment cache poisoned") = None;
    }

    /// Returns the shared engine environment, rebuilding per call in debug
    /// builds (hot reload) and caching in release builds.
    fn environment(&self) -> Arc<Environment<'static>> {
        if !cfg!(debug_assertions) {
            if let Some(env) = self
                .env_cache
                .read()
                .expect("environment cache poisoned")
                .as_ref()
            {
                return Arc::clone(env);
            }
        }

        let env = Arc::new(self.build_environment());
        if !cfg!(debug_assertions) {
            *self.env_cache.write().expect("environment cache poisoned") = Some(Arc::clone(&env));
        }
        env
    }

    fn build_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        let dirs = self.dirs.clone();
        let embedded = self.embedded.clone();
        let config = self.config.clone();

        env.set_loader(move |name| {
            for dir in &dirs {
                for candidate in config.candidates(name) {
                    let path = dir.join(&candidate);
                    if path.is_file() {
                        return std::fs::read_to_string(&path).map(Some).map_err(|e| {
                            minijinja::Error::new(
                                minijinja::ErrorKind::InvalidOperation,
                                format!("failed to read view {}: {}", path.display(), e),
                            )
                        });
                    }
                }
            }
            for candidate in config.candidates(name) {
                if let Some(content) = embedded.get(&candidate) {
                    return Ok(Some(content.clone()));
                }
            }
            Ok(None)
        });

        env
    }

    /// Probes candidates against every source, recording each location.
    fn probe(&self, candidates: &[String], searched: &mut Vec<String>) -> Option<JinjaView> {
        for dir in &self.dirs {
            for candidate in candidates {
                let path = dir.join(candidate);
                searched.push(path.display().to_string());
                if path.is_file() {
                    return Some(JinjaView {
                        env: self.environment(),
                        template_name: candidate.clone(),
                        path: path.display().to_string(),
                    });
                }
            }
        }

        for candidate in candidates {
            let location = format!("embedded:{candidate}");
            searched.push(location.clone());
            if self.embedded.contains_key(candidate) {
                return Some(JinjaView {
                    env: self.environment(),
                    template_name: candidate.clone(),
                    path: location,
                });
            }
        }

        None
    }
}

impl ViewLocator for JinjaViewLocator {
    fn get_view(
        &self,
        executing_path: Option<&str>,
        view_path: &str,
        _is_main_page: bool,
    ) -> ViewLookup {
        let resolved = resolve_relative(executing_path, view_path);
        let mut searched = Vec::new();
        match self.probe(&self.config.candidates(&resolved), &mut searched) {
            Some(view) => ViewLookup::Found(Arc::new(view)),
            None => ViewLookup::NotFound { searched },
        }
    }

    fn find_view(
        &self,
        context: &ActionContext,
        view_name: &str,
        is_main_page: bool,
    ) -> ViewLookup {
        let formats = if is_main_page {
            &self.config.location_formats
        } else {
            &self.config.partial_location_formats
        };
        let values = context.route_values();

        let mut searched = Vec::new();
        for format in formats {
            let Some(expanded) = expand_location(format, view_name, &values) else {
                continue;
            };
            if let Some(view) = self.probe(&self.config.candidates(&expanded), &mut searched) {
                return ViewLookup::Found(Arc::new(view));
            }
        }

        ViewLookup::NotFound { searched }
    }
}

/// A resolved MiniJinja view.
struct JinjaView {
    env: Arc<Environment<'static>>,
    template_name: String,
    path: String,
}

impl View for JinjaView {
    fn path(&self) -> &str {
        &self.path
    }

    fn render(&self, ctx: &mut ViewContext<'_>) -> Result<()> {
        let mut env = (*self.env).clone();
        if ctx.options.strict_vars {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        if ctx.options.autoescape {
            env.set_auto_escape_callback(|_| AutoEscape::Html);
        }

        let template = env.get_template(&self.template_name)?;
        let rendered = template.render(template_vars(ctx))?;
        ctx.output.push_str(&rendered);
        Ok(())
    }
}

/// Builds the variables a view renders with: the ambient objects plus the
/// model. Map-shaped models merge into the root and their keys win over
/// ambient keys; anything else appears as `model`.
fn template_vars(ctx: &ViewContext<'_>) -> BTreeMap<String, Value> {
    let mut vars = BTreeMap::new();
    vars.insert("request".to_string(), ctx.action.request.to_value());
    vars.insert(
        "route".to_string(),
        Value::from_serialize(&ctx.action.route_values()),
    );
    vars.insert(
        "temp_data".to_string(),
        Value::from_serialize(ctx.temp_data.values()),
    );

    match ctx.model {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                vars.insert(key.clone(), Value::from_serialize(value));
            }
        }
        serde_json::Value::Null => {}
        other => {
            vars.insert("model".to_string(), Value::from_serialize(other));
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RequestContext, RouteData};
    use crate::services::Services;
    use crate::temp_data::TempData;
    use crate::view::RenderOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_view(dir: &Path, relative: &str, content: &str) {
        let full = dir.join(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&full).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn render_found(lookup: ViewLookup, ctx: &ActionContext) -> String {
        let ViewLookup::Found(view) = lookup else {
            panic!("expected a view");
        };
        let model = serde_json::Value::Null;
        let temp = TempData::new();
        let mut output = String::new();
        view.render(&mut ViewContext {
            action: ctx,
            model: &model,
            temp_data: &temp,
            output: &mut output,
            options: RenderOptions::default(),
        })
        .unwrap();
        output
    }

    fn empty_context() -> ActionContext {
        ActionContext::synthesize(Services::new())
    }

    #[test]
    fn test_get_view_hits_embedded() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("welcome.jinja", "hi");

        let lookup = locator.get_view(None, "welcome", true);
        assert_eq!(render_found(lookup, &empty_context()), "hi");
    }

    #[test]
    fn test_get_view_records_searched_locations() {
        let locator = JinjaViewLocator::new();
        let lookup = locator.get_view(None, "ghost", true);

        let searched = lookup.searched_locations();
        assert!(!searched.is_empty());
        assert!(searched.iter().all(|loc| loc.contains("ghost")));
    }

    #[test]
    fn test_file_shadows_embedded() {
        let tmp = TempDir::new().unwrap();
        write_view(tmp.path(), "welcome.jinja", "from file");

        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("welcome.jinja", "from embedded");
        locator.add_view_dir(tmp.path()).unwrap();

        let lookup = locator.get_view(None, "welcome", true);
        assert_eq!(render_found(lookup, &empty_context()), "from file");
    }

    #[test]
    fn test_extension_priority_within_dir() {
        let tmp = TempDir::new().unwrap();
        write_view(tmp.path(), "report.j2", "from j2");
        write_view(tmp.path(), "report.jinja", "from jinja");

        let mut locator = JinjaViewLocator::new();
        locator.add_view_dir(tmp.path()).unwrap();

        let lookup = locator.get_view(None, "report", true);
        assert_eq!(render_found(lookup, &empty_context()), "from jinja");
    }

    #[test]
    fn test_first_dir_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_view(first.path(), "page.jinja", "first");
        write_view(second.path(), "page.jinja", "second");

        let mut locator = JinjaViewLocator::new();
        locator.add_view_dir(first.path()).unwrap();
        locator.add_view_dir(second.path()).unwrap();

        let lookup = locator.get_view(None, "page", true);
        assert_eq!(render_found(lookup, &empty_context()), "first");
    }

    #[test]
    fn test_get_view_resolves_relative_to_executing_view() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("mail/_footer.jinja", "footer");

        let lookup = locator.get_view(Some("mail/welcome.jinja"), "./_footer", false);
        assert_eq!(render_found(lookup, &empty_context()), "footer");
    }

    #[test]
    fn test_find_view_uses_controller_convention() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("mail/welcome.jinja", "mail view");

        let ctx = ActionContext {
            request: RequestContext::new(Services::new()),
            route: RouteData::new().with("controller", "mail"),
            action: Default::default(),
        };

        let lookup = locator.find_view(&ctx, "welcome", true);
        assert_eq!(render_found(lookup, &ctx), "mail view");
    }

    #[test]
    fn test_find_view_skips_unsatisfiable_formats() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("shared/notice.jinja", "shared view");

        // no controller, no area: only the shared format applies
        let ctx = empty_context();
        let lookup = locator.find_view(&ctx, "notice", true);
        assert_eq!(render_found(lookup, &ctx), "shared view");
    }

    #[test]
    fn test_find_view_partial_uses_underscore_convention() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("shared/_badge.jinja", "badge");

        let ctx = empty_context();
        let lookup = locator.find_view(&ctx, "badge", false);
        assert_eq!(render_found(lookup, &ctx), "badge");
    }

    #[test]
    fn test_includes_resolve_through_loader() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded_entries(&[
            ("page.jinja", "start {% include 'shared/_part' %} end"),
            ("shared/_part.jinja", "PART"),
        ]);

        let lookup = locator.get_view(None, "page", true);
        assert_eq!(render_found(lookup, &empty_context()), "start PART end");
    }

    #[test]
    fn test_add_view_dir_rejects_missing_path() {
        let mut locator = JinjaViewLocator::new();
        let result = locator.add_view_dir("/nonexistent/view/tree");
        assert!(matches!(result, Err(ViewError::Config(_))));
    }

    #[test]
    fn test_strict_vars_fail_on_undefined() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("page.jinja", "{{ nothing_here }}");

        let ViewLookup::Found(view) = locator.get_view(None, "page", true) else {
            panic!("expected a view");
        };

        let ctx = empty_context();
        let model = serde_json::Value::Null;
        let temp = TempData::new();
        let mut output = String::new();
        let result = view.render(&mut ViewContext {
            action: &ctx,
            model: &model,
            temp_data: &temp,
            output: &mut output,
            options: RenderOptions::new().strict(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_autoescape_escapes_model_values() {
        let mut locator = JinjaViewLocator::new();
        locator.add_embedded("page.jinja", "{{ body }}");

        let ViewLookup::Found(view) = locator.get_view(None, "page", true) else {
            panic!("expected a view");
        };

        let ctx = empty_context();
        let model = serde_json::json!({"body": "<b>hi</b>"});
        let temp = TempData::new();
        let mut output = String::new();
        view.render(&mut ViewContext {
            action: &ctx,
            model: &model,
            temp_data: &temp,
            output: &mut output,
            options: RenderOptions::new().escaped(),
        })
        .unwrap();
        assert!(output.starts_with("&lt;b&gt;hi"));
        assert!(!output.contains("<b>"));
    }
}
