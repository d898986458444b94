#![doc(html_root_url = "https://docs.rs/protoc-plugin-kit/0.3.0")]

//! `protoc-plugin-kit` is a small library for writing `protoc` plugins that
//! generate Java code meant to sit next to the classes protobuf-java
//! generates for the same `.proto` files.
//!
//! The library does the bookkeeping every such plugin needs: it decodes the
//! `CodeGeneratorRequest`, registers every message, enum, oneof and service of
//! every file, resolves references between them, attaches source comments and
//! `google.api.http` annotations, and names everything exactly the way
//! protobuf-java does, including its outer class collision rule. The plugin
//! only implements the [`Generator`] hooks that turn descriptors into code.
//!
//! ## Example
//!
//! A plugin that lists the fields of every top-level message:
//!
//! ```rust,no_run
//! use protoc_plugin_kit::{GenerationContext, Generator, MessageDescriptor, Plugin, Result};
//!
//! struct Fields;
//!
//! impl Generator for Fields {
//!     fn plugin_name(&self) -> &str {
//!         "protoc-gen-fields"
//!     }
//!
//!     fn plugin_class_name(&self, proto_class: &str) -> String {
//!         format!("{}Fields", proto_class)
//!     }
//!
//!     fn imports(&self) -> String {
//!         "import java.util.List;\nimport java.util.Map;".to_owned()
//!     }
//!
//!     fn generate_message_code(
//!         &mut self,
//!         message: &MessageDescriptor,
//!         cx: &GenerationContext<'_>,
//!     ) -> Result<Option<String>> {
//!         let mut code = format!("public static class {} {{\n", message.name());
//!         for field in message.fields() {
//!             let ty = field.field_type(cx.registry())?;
//!             code.push_str(&format!("    public {} {};\n", ty, field.suffixed_name()));
//!         }
//!         code.push('}');
//!         Ok(Some(code))
//!     }
//! }
//!
//! fn main() {
//!     if let Err(e) = Plugin::new(Fields).run() {
//!         eprintln!("{}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! Running `protoc --plugin=protoc-gen-fields --fields_out=out widget.proto`
//! then writes `out/<java package>/WidgetFields.java`.
//!
//! ## Naming
//!
//! Every declaration has three qualified names:
//!
//!  - the protobuf name, `pkg.Outer.Inner`, under which fields and methods
//!    refer to it;
//!  - the original name, `com.example.Widget.Outer.Inner`, of the class
//!    protobuf-java generated for it;
//!  - the plugin name, `com.example.WidgetFields.Outer.Inner`, of the class
//!    the plugin generates for it.
//!
//! See [`DescriptorBase`] for the details.

mod comments;
mod context;
mod descriptor;
mod error;
mod generator;
mod http;
mod ident;
mod locations;
mod naming;
mod outer_class;
mod output;
mod plugin;
mod registry;
mod request;
mod syntax;

#[cfg(test)]
mod testing;

pub use crate::comments::{format_comment, CommentIndex, EMPTY_COMMENT};
pub use crate::context::{target_package, ListKind, ProcessingContext};
pub use crate::descriptor::{
    Descriptor, DescriptorBase, DescriptorKind, EnumDescriptor, EnumValueDescriptor,
    FieldDescriptor, FieldType, MessageDescriptor, MethodDescriptor, MethodType,
    OneOfDescriptor, ScalarType, ServiceDescriptor,
};
pub use crate::error::{BoxError, Error, Result};
pub use crate::generator::{generate_code, GenerationContext, Generator};
pub use crate::http::{
    decode_http_rules, http_rule, CustomHttpPattern, HttpRule, HttpRules, HTTP_EXTENSION_TAG,
};
pub use crate::ident::{
    capitalize, format_field_name, outer_class_name_from_file, to_lower_camel, to_upper_camel,
};
pub use crate::naming::{join_qualified, IdentityFormatter, TypeNameFormatter};
pub use crate::outer_class::{original_class_name, OuterClass, COLLISION_SUFFIX};
pub use crate::output::FileContent;
pub use crate::plugin::{common_package, Plugin};
pub use crate::registry::{FileDeclarations, Registry};
pub use crate::request::{Parameters, PluginRequest};
pub use crate::syntax::Syntax;
