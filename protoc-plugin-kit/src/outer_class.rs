use std::cell::Cell;

use log::debug;
use prost_types::FileDescriptorProto;

use crate::ident::outer_class_name_from_file;
use crate::{Error, Result};

/// Suffix protobuf-java appends to the outer class when a declaration in the
/// file already uses the derived name.
pub const COLLISION_SUFFIX: &str = "OuterClass";

/// Both protobuf-java and plugins built on this crate wrap everything declared
/// in a `.proto` file in one outer class. This keeps both names.
#[derive(Debug)]
pub struct OuterClass {
    /// The class protobuf-java wraps its generated code in, before any
    /// collision suffix.
    proto_class: String,
    plugin_class: String,
    /// `java_multiple_files`: protobuf-java emits top-level declarations as
    /// their own classes instead of nesting them in the outer class.
    multiple_files: bool,
    /// Set once a declaration named like `proto_class` is registered; protoc
    /// then appends [`COLLISION_SUFFIX`] to its outer class.
    collision: Cell<bool>,
}

impl OuterClass {
    /// Derives the outer class names for `file`. `plugin_class` maps the
    /// protobuf-java class name to the plugin's own wrapper class name.
    pub fn new(file: &FileDescriptorProto, plugin_class: impl FnOnce(&str) -> String) -> Self {
        let proto_class = original_class_name(file);
        let plugin_class = plugin_class(&proto_class);
        let multiple_files = file
            .options
            .as_ref()
            .map_or(false, |options| options.java_multiple_files());
        OuterClass {
            proto_class,
            plugin_class,
            multiple_files,
            collision: Cell::new(false),
        }
    }

    /// The effective name of the protobuf-java outer class, including the
    /// collision suffix once a collision was seen.
    pub fn proto_class(&self) -> String {
        if self.collision.get() {
            format!("{}{}", self.proto_class, COLLISION_SUFFIX)
        } else {
            self.proto_class.clone()
        }
    }

    pub fn plugin_class(&self) -> &str {
        &self.plugin_class
    }

    pub fn is_multiple_files_enabled(&self) -> bool {
        self.multiple_files
    }

    pub fn has_collision(&self) -> bool {
        self.collision.get()
    }

    /// Called for every declaration as it is registered, at any nesting depth.
    ///
    /// Once the suffix is in use, a declaration named like the suffixed class
    /// is a conflict protobuf-java cannot resolve.
    pub fn on_new_descriptor(&self, name: &str) -> Result<()> {
        if self.collision.get() && name == self.proto_class() {
            Err(Error::NamingConflict {
                name: name.to_owned(),
                reason: "clashes with the suffixed protobuf-java outer class".to_owned(),
            })
        } else if name == self.proto_class {
            if !self.collision.replace(true) {
                debug!(
                    "declaration {} collides with outer class, using {}{}",
                    name, self.proto_class, COLLISION_SUFFIX
                );
            }
            Ok(())
        } else if name == self.plugin_class {
            Err(Error::NamingConflict {
                name: name.to_owned(),
                reason: format!("reserved for the generated {} wrapper class", name),
            })
        } else {
            Ok(())
        }
    }
}

/// `java_outer_classname` if set, otherwise the class name protobuf-java
/// derives from the file name.
pub fn original_class_name(file: &FileDescriptorProto) -> String {
    match file
        .options
        .as_ref()
        .and_then(|options| options.java_outer_classname.as_deref())
    {
        Some(explicit) => explicit.to_owned(),
        None => outer_class_name_from_file(file.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FileOptions;

    fn file(name: &str, options: Option<FileOptions>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_owned()),
            options,
            ..Default::default()
        }
    }

    fn rest_class(proto_class: &str) -> String {
        format!("{}REST", proto_class)
    }

    #[test]
    fn test_derived_names() {
        let outer = OuterClass::new(&file("dir/test_msg.proto", None), rest_class);
        assert_eq!("TestMsg", outer.proto_class());
        assert_eq!("TestMsgREST", outer.plugin_class());
        assert!(!outer.is_multiple_files_enabled());
    }

    #[test]
    fn test_explicit_options() {
        let options = FileOptions {
            java_outer_classname: Some("Explicit".to_owned()),
            java_multiple_files: Some(true),
            ..Default::default()
        };
        let outer = OuterClass::new(&file("test_msg.proto", Some(options)), rest_class);
        assert_eq!("Explicit", outer.proto_class());
        assert!(outer.is_multiple_files_enabled());
    }

    #[test]
    fn test_collision_appends_suffix() {
        let outer = OuterClass::new(&file("test_msg.proto", None), rest_class);
        outer.on_new_descriptor("Other").unwrap();
        assert!(!outer.has_collision());

        outer.on_new_descriptor("TestMsg").unwrap();
        assert!(outer.has_collision());
        assert_eq!("TestMsgOuterClass", outer.proto_class());

        // A second declaration with the same name (e.g. nested) keeps the suffix.
        outer.on_new_descriptor("TestMsg").unwrap();
        assert_eq!("TestMsgOuterClass", outer.proto_class());
    }

    #[test]
    fn test_suffixed_name_conflicts_after_collision() {
        let outer = OuterClass::new(&file("test_msg.proto", None), rest_class);
        // Before any collision the suffixed name is an ordinary declaration.
        outer.on_new_descriptor("TestMsgOuterClass").unwrap();
        assert!(!outer.has_collision());

        outer.on_new_descriptor("TestMsg").unwrap();
        let err = outer.on_new_descriptor("TestMsgOuterClass").unwrap_err();
        assert!(
            matches!(err, Error::NamingConflict { ref name, .. } if name == "TestMsgOuterClass")
        );
        assert_eq!("TestMsgOuterClass", outer.proto_class());
    }

    #[test]
    fn test_plugin_class_is_reserved() {
        let outer = OuterClass::new(&file("test_msg.proto", None), rest_class);
        let err = outer.on_new_descriptor("TestMsgREST").unwrap_err();
        assert!(matches!(err, Error::NamingConflict { ref name, .. } if name == "TestMsgREST"));
    }
}
