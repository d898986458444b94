use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{FieldDescriptorProto, OneofDescriptorProto};

use crate::context::ProcessingContext;
use crate::descriptor::Descriptor;
use crate::ident::format_field_name;
use crate::naming::TypeNameFormatter;
use crate::registry::Registry;
use crate::{Error, Result};

/// Appended to field names when they are used as Java identifiers, so that a
/// field can never clash with a keyword.
const IDENTIFIER_SUFFIX: &str = "_";

/// The boxed Java types protobuf scalars map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Long,
    Integer,
    Boolean,
    String,
    ByteString,
}

impl ScalarType {
    /// Returns `None` for groups, messages and enums.
    pub fn from_proto(ty: Type) -> Option<ScalarType> {
        match ty {
            Type::Double => Some(ScalarType::Double),
            Type::Float => Some(ScalarType::Float),
            Type::Int64 | Type::Uint64 | Type::Fixed64 | Type::Sfixed64 | Type::Sint64 => {
                Some(ScalarType::Long)
            }
            Type::Int32 | Type::Uint32 | Type::Fixed32 | Type::Sfixed32 | Type::Sint32 => {
                Some(ScalarType::Integer)
            }
            Type::Bool => Some(ScalarType::Boolean),
            Type::String => Some(ScalarType::String),
            Type::Bytes => Some(ScalarType::ByteString),
            Type::Group | Type::Message | Type::Enum => None,
        }
    }

    pub fn java_name(self) -> &'static str {
        match self {
            ScalarType::Double => "Double",
            ScalarType::Float => "Float",
            ScalarType::Long => "Long",
            ScalarType::Integer => "Integer",
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::ByteString => "ByteString",
        }
    }
}

/// The full Java type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Single(String),
    List(String),
    Map { key: String, value: String },
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Single(ty) => f.write_str(ty),
            FieldType::List(ty) => write!(f, "List<{}>", ty),
            FieldType::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
        }
    }
}

/// A single field of a message.
///
/// Fields may refer to declarations that are registered after the enclosing
/// message (a later sibling, or the message itself), so anything touching the
/// referenced type is resolved on demand against the registry.
pub struct FieldDescriptor {
    proto: FieldDescriptorProto,
    comment: String,
    /// Set when another field of the same message formats to the same camel
    /// case name, e.g. `my_field` and `my_field_`.
    append_number: bool,
    proto3: bool,
    oneof_name: Option<String>,
    type_name_formatter: Rc<dyn TypeNameFormatter>,
}

impl FieldDescriptor {
    pub(crate) fn new(
        ctx: &ProcessingContext,
        proto: &FieldDescriptorProto,
        duplicate_names: &HashSet<String>,
        oneofs: &[OneofDescriptorProto],
    ) -> Self {
        let oneof_name = proto
            .oneof_index
            .and_then(|idx| oneofs.get(idx as usize))
            .map(|oneof| format_field_name(oneof.name()));
        FieldDescriptor {
            proto: proto.clone(),
            comment: ctx.comment_at_path(),
            append_number: duplicate_names.contains(&format_field_name(proto.name())),
            proto3: ctx.is_proto3_syntax(),
            oneof_name,
            type_name_formatter: Rc::clone(ctx.type_name_formatter()),
        }
    }

    /// The camel case name of the field, with the field number appended if
    /// the name is ambiguous within its message.
    pub fn name(&self) -> String {
        let name = format_field_name(self.proto.name());
        if self.append_number {
            format!("{}{}", name, self.proto.number())
        } else {
            name
        }
    }

    pub fn suffixed_name(&self) -> String {
        self.name() + IDENTIFIER_SUFFIX
    }

    pub fn proto(&self) -> &FieldDescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn number(&self) -> i32 {
        self.proto.number()
    }

    pub fn is_proto3_syntax(&self) -> bool {
        self.proto3
    }

    pub fn is_required(&self) -> bool {
        self.proto.label() == Label::Required
    }

    pub fn is_list(&self) -> bool {
        self.proto.label() == Label::Repeated
    }

    pub fn is_enum(&self) -> bool {
        self.proto.r#type() == Type::Enum
    }

    /// The camel case name of the enclosing oneof, e.g. `myOneof`.
    pub fn oneof_name(&self) -> Option<&str> {
        self.oneof_name.as_deref()
    }

    /// The message or enum this field refers to, `None` for scalars.
    pub fn content<'r>(&self, registry: &'r Registry) -> Result<Option<&'r Descriptor>> {
        match self.proto.r#type() {
            Type::Message | Type::Enum => registry.lookup(self.proto.type_name()).map(Some),
            _ => Ok(None),
        }
    }

    pub fn scalar_type(&self) -> Result<ScalarType> {
        let ty = self.proto.r#type();
        ScalarType::from_proto(ty).ok_or_else(|| Error::InvalidScalar {
            field: self.proto.name().to_owned(),
            ty,
        })
    }

    /// The element type of the field in generated code: the qualified name
    /// of the plugin class for references, the boxed Java type otherwise.
    pub fn type_name(&self, registry: &Registry) -> Result<String> {
        match self.content(registry)? {
            Some(descriptor) => {
                let formatter = self.type_name_formatter.as_ref();
                Ok(formatter.format_type_name(&descriptor.qualified_name(formatter)))
            }
            None => self.scalar_type().map(|scalar| scalar.java_name().to_owned()),
        }
    }

    /// Like [`type_name`](Self::type_name), but names the class protobuf-java
    /// generated.
    pub fn proto_type_name(&self, registry: &Registry) -> Result<String> {
        match self.content(registry)? {
            Some(descriptor) => Ok(descriptor.qualified_original_name()),
            None => self.scalar_type().map(|scalar| scalar.java_name().to_owned()),
        }
    }

    pub fn is_map_field(&self, registry: &Registry) -> Result<bool> {
        if !self.is_list() {
            return Ok(false);
        }
        Ok(matches!(
            self.content(registry)?,
            Some(Descriptor::Message(entry)) if entry.is_map_entry()
        ))
    }

    /// The full type, turning repeated fields into lists and repeated map
    /// entries into maps.
    pub fn field_type(&self, registry: &Registry) -> Result<FieldType> {
        if !self.is_list() {
            return self.type_name(registry).map(FieldType::Single);
        }
        if let Some(Descriptor::Message(entry)) = self.content(registry)? {
            if entry.is_map_entry() {
                let (key, value) = entry.map_types(registry)?;
                return Ok(FieldType::Map { key, value });
            }
        }
        self.type_name(registry).map(FieldType::List)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("proto", &self.proto)
            .field("comment", &self.comment)
            .field("append_number", &self.append_number)
            .field("proto3", &self.proto3)
            .field("oneof_name", &self.oneof_name)
            .finish_non_exhaustive()
    }
}
