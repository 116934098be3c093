//! Property-based tests for location expansion and relative resolution.

use std::collections::BTreeMap;

use proptest::prelude::*;

use offstage::locator::{expand_location, resolve_relative};

fn route_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{1,8}", 0..4)
}

proptest! {
    /// Expansion never panics, whatever the format looks like.
    #[test]
    fn expand_never_panics(
        format in ".{0,40}",
        name in "[a-z/_.]{0,20}",
        values in route_strategy(),
    ) {
        let _ = expand_location(&format, &name, &values);
    }

    /// A format without placeholders expands to itself.
    #[test]
    fn plain_formats_are_identity(
        format in "[a-z/_.]{0,30}",
        name in "[a-z]{1,10}",
        values in route_strategy(),
    ) {
        let expanded = expand_location(&format, &name, &values);
        prop_assert_eq!(expanded.as_deref(), Some(format.as_str()));
    }

    /// `{name}` always substitutes, and the result contains the view name.
    #[test]
    fn name_placeholder_always_substitutes(
        prefix in "[a-z/]{0,10}",
        name in "[a-z]{1,10}",
        values in route_strategy(),
    ) {
        let format = format!("{prefix}{{name}}");
        let expanded = expand_location(&format, &name, &values).unwrap();
        prop_assert!(expanded.contains(&name));
        prop_assert!(expanded.starts_with(&prefix));
    }

    /// A placeholder absent from the route values skips the format.
    #[test]
    fn missing_placeholder_skips_format(
        name in "[a-z]{1,10}",
        values in route_strategy(),
    ) {
        prop_assume!(!values.contains_key("zzzmissing"));
        prop_assert_eq!(expand_location("{zzzmissing}/{name}", &name, &values), None);
    }

    /// Successful expansion substitutes every satisfied placeholder.
    #[test]
    fn satisfied_placeholders_substitute(
        name in "[a-z]{1,10}",
        key in "[a-z]{1,8}",
        value in "[a-z0-9]{1,8}",
    ) {
        prop_assume!(key != "name");
        let mut values = BTreeMap::new();
        values.insert(key.clone(), value.clone());

        let format = format!("{{{key}}}/{{name}}");
        let expanded = expand_location(&format, &name, &values).unwrap();
        prop_assert_eq!(expanded, format!("{value}/{name}"));
    }

    /// Relative resolution never panics and never emits `.` or `..` segments.
    #[test]
    fn resolve_relative_is_normalized(
        executing in prop::option::of("[a-z/]{1,20}\\.jinja"),
        path in "(\\./|\\.\\./)[a-z/_.]{0,20}",
    ) {
        let resolved = resolve_relative(executing.as_deref(), &path);
        for segment in resolved.split('/') {
            prop_assert_ne!(segment, ".");
            prop_assert_ne!(segment, "..");
        }
    }

    /// Paths that are not `./`- or `../`-relative pass through unchanged.
    #[test]
    fn absolute_paths_pass_through(
        executing in prop::option::of("[a-z/]{1,20}\\.jinja"),
        path in "[a-z][a-z/_.]{0,20}",
    ) {
        prop_assert_eq!(resolve_relative(executing.as_deref(), &path), path);
    }
}
