//! Utility functions for working with identifiers.
//!
//! These reproduce the conversions protobuf-java applies when it names generated
//! classes and accessors (Guava's `CaseFormat` and commons-lang's `capitalize`),
//! so names computed here line up with the classes protoc actually emitted.

/// Upper-cases the first character of `s`, leaving the rest untouched.
///
/// Like Java's `Character.toTitleCase`, one character maps to exactly one: a
/// character whose upper case spans several (`ß`) is kept as is.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let first = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    std::iter::once(first).chain(chars).collect()
}

/// Converts a `lower_underscore` identifier to `UpperCamel` case.
///
/// Every underscore separated word gets an upper-case first character and
/// lower-case remainder; empty words disappear.
pub fn to_upper_camel(s: &str) -> String {
    s.split('_').map(first_char_only_to_upper).collect()
}

/// Converts a `lower_underscore` identifier to `lowerCamel` case.
///
/// The first word is lower-cased entirely, subsequent words are treated as in
/// [`to_upper_camel`].
pub fn to_lower_camel(s: &str) -> String {
    let mut words = s.split('_');
    let mut ident = words
        .next()
        .map(|word| word.to_ascii_lowercase())
        .unwrap_or_default();
    ident.extend(words.map(first_char_only_to_upper));
    ident
}

fn first_char_only_to_upper(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// Formats a protobuf field name the way generated Java accessors spell it.
///
/// Names without an underscore are returned unchanged.
pub fn format_field_name(name: &str) -> String {
    if name.contains('_') {
        to_lower_camel(name)
    } else {
        name.to_owned()
    }
}

/// Derives the outer class protobuf-java generates for a `.proto` file that
/// does not set `java_outer_classname`.
pub fn outer_class_name_from_file(file_name: &str) -> String {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let class_name = capitalize(&base.replace(".proto", ""));
    if class_name.contains('_') {
        to_upper_camel(&class_name.to_lowercase())
    } else {
        class_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!("", capitalize(""));
        assert_eq!("F", capitalize("f"));
        assert_eq!("FooBar", capitalize("fooBar"));
        assert_eq!("FOO", capitalize("FOO"));
        assert_eq!("_foo", capitalize("_foo"));
        assert_eq!("Émile", capitalize("émile"));
        assert_eq!("ßtraße", capitalize("ßtraße"));
    }

    #[test]
    fn test_to_upper_camel() {
        assert_eq!("", to_upper_camel(""));
        assert_eq!("TestMsg", to_upper_camel("test_msg"));
        assert_eq!("FooBar", to_upper_camel("foo__bar"));
        assert_eq!("FooBar", to_upper_camel("_foo_bar_"));
        assert_eq!("Foo2bar", to_upper_camel("foo_2bar"));
        assert_eq!("FooBar", to_upper_camel("FOO_BAR"));
    }

    #[test]
    fn test_to_lower_camel() {
        assert_eq!("myField", to_lower_camel("my_field"));
        assert_eq!("myField", to_lower_camel("my_field_"));
        assert_eq!("myField", to_lower_camel("my_Field"));
        assert_eq!("foobarBaz", to_lower_camel("fooBar_baz"));
        assert_eq!("field0Name6", to_lower_camel("field_0_name6"));
        assert_eq!("Field", to_lower_camel("_field"));
    }

    #[test]
    fn test_format_field_name() {
        assert_eq!("fieldName7", format_field_name("fieldName7"));
        assert_eq!("FieldName8", format_field_name("FieldName8"));
        assert_eq!("fieldName9", format_field_name("field_Name9"));
        assert_eq!("fieldName15", format_field_name("field__name15"));
        assert_eq!("fieldName17", format_field_name("field_name17__"));
    }

    #[test]
    fn test_outer_class_name_from_file() {
        assert_eq!("TestMsg", outer_class_name_from_file("test_msg.proto"));
        assert_eq!("TestMsg", outer_class_name_from_file("protos/nested/test_msg.proto"));
        assert_eq!("TestDTO", outer_class_name_from_file("TestDTO.proto"));
        assert_eq!("Foo", outer_class_name_from_file("foo.proto"));
        assert_eq!("TopologyDto", outer_class_name_from_file("Topology_DTO.proto"));
        assert_eq!("Foo2", outer_class_name_from_file("foo_2.proto"));
    }
}
