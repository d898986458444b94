use itertools::Itertools;

/// Renames generated types, e.g. `TopologyEntityDTO` to `TopologyEntityImpl`.
///
/// Applied to every segment of a declaration's name within the outer class, and
/// to the type names of fields referring to other declarations.
pub trait TypeNameFormatter {
    fn format_type_name(&self, name: &str) -> String;
}

/// Leaves type names untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityFormatter;

impl TypeNameFormatter for IdentityFormatter {
    fn format_type_name(&self, name: &str) -> String {
        name.to_owned()
    }
}

impl<F> TypeNameFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format_type_name(&self, name: &str) -> String {
        self(name)
    }
}

/// Joins name segments with `.`, skipping empty ones so that declarations in a
/// file without a package don't get a leading dot.
pub fn join_qualified<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|segment| segment.trim_matches('.'))
        .filter(|segment| !segment.is_empty())
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_qualified() {
        assert_eq!("a.b.C", join_qualified(["a.b", "C"]));
        assert_eq!("C", join_qualified(["", "C"]));
        assert_eq!("a.Outer.M.N", join_qualified(["a", "Outer", "M", "N"]));
        assert_eq!("a.N", join_qualified([".a.", "", "N"]));
    }

    #[test]
    fn test_closure_formatter() {
        let formatter = |name: &str| name.replace("DTO", "Impl");
        assert_eq!("FooImpl", formatter.format_type_name("FooDTO"));
        assert_eq!("FooDTO", IdentityFormatter.format_type_name("FooDTO"));
    }
}
