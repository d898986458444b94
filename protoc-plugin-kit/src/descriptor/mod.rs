//! The descriptor model: one immutable value per registered declaration.

use std::fmt;
use std::rc::Rc;

use crate::context::ProcessingContext;
use crate::naming::{join_qualified, IdentityFormatter, TypeNameFormatter};
use crate::outer_class::OuterClass;
use crate::Result;

mod enums;
mod field;
mod message;
mod oneof;
mod service;

pub use enums::{EnumDescriptor, EnumValueDescriptor};
pub use field::{FieldDescriptor, FieldType, ScalarType};
pub use message::MessageDescriptor;
pub use oneof::OneOfDescriptor;
pub use service::{MethodDescriptor, MethodType, ServiceDescriptor};

/// The kinds of declarations kept in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Message,
    Enum,
    OneOf,
    Service,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorKind::Message => "a message",
            DescriptorKind::Enum => "an enum",
            DescriptorKind::OneOf => "a oneof",
            DescriptorKind::Service => "a service",
        })
    }
}

/// Naming information shared by every kind of declaration.
#[derive(Debug, Clone)]
pub struct DescriptorBase {
    /// The unqualified name.
    name: String,
    target_package: String,
    proto_package: String,
    /// Names of the enclosing messages, outermost first. Empty for top-level
    /// declarations.
    outers: Vec<String>,
    outer_class: Rc<OuterClass>,
}

impl DescriptorBase {
    /// Captures the naming state of `ctx` and reports `name` to the file's
    /// outer class for collision tracking.
    pub(crate) fn new(ctx: &ProcessingContext, name: &str) -> Result<Self> {
        let outer_class = Rc::clone(ctx.outer_class());
        outer_class.on_new_descriptor(name)?;
        Ok(DescriptorBase {
            name: name.to_owned(),
            target_package: ctx.target_package().to_owned(),
            proto_package: ctx.proto_package().to_owned(),
            outers: ctx.outers().to_vec(),
            outer_class,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_package(&self) -> &str {
        &self.target_package
    }

    pub fn proto_package(&self) -> &str {
        &self.proto_package
    }

    pub fn outers(&self) -> &[String] {
        &self.outers
    }

    pub fn outer_class(&self) -> &OuterClass {
        &self.outer_class
    }

    /// The name relative to the outer class of the file, e.g. `Msg.Msg2.Msg3`
    /// for a message nested two levels deep. Equal to the name for top-level
    /// declarations.
    pub fn name_within_outer_class(&self, formatter: &dyn TypeNameFormatter) -> String {
        let mut segments: Vec<String> = self
            .outers
            .iter()
            .map(|outer| formatter.format_type_name(outer))
            .collect();
        segments.push(formatter.format_type_name(&self.name));
        segments.join(".")
    }

    /// The fully qualified name of the class the plugin generates.
    pub fn qualified_name(&self, formatter: &dyn TypeNameFormatter) -> String {
        join_qualified([
            self.target_package.as_str(),
            self.outer_class.plugin_class(),
            &self.name_within_outer_class(formatter),
        ])
    }

    /// The fully qualified name of the class protobuf-java generated.
    ///
    /// With `java_multiple_files` protobuf-java does not nest declarations in
    /// its outer class.
    pub fn qualified_original_name(&self) -> String {
        self.original_name_with(&self.name_within_outer_class(&IdentityFormatter))
    }

    /// The fully qualified protobuf name, without a leading dot.
    pub fn qualified_proto_name(&self) -> String {
        join_qualified([
            self.proto_package.as_str(),
            &self.name_within_outer_class(&IdentityFormatter),
        ])
    }

    fn original_name_with(&self, within_outer_class: &str) -> String {
        if self.outer_class.is_multiple_files_enabled() {
            join_qualified([self.target_package.as_str(), within_outer_class])
        } else {
            join_qualified([
                self.target_package.as_str(),
                &self.outer_class.proto_class(),
                within_outer_class,
            ])
        }
    }
}

/// A registered declaration.
///
/// Cloning is cheap; clones share the underlying descriptor.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Message(Rc<MessageDescriptor>),
    Enum(Rc<EnumDescriptor>),
    OneOf(Rc<OneOfDescriptor>),
    Service(Rc<ServiceDescriptor>),
}

impl Descriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Message(_) => DescriptorKind::Message,
            Descriptor::Enum(_) => DescriptorKind::Enum,
            Descriptor::OneOf(_) => DescriptorKind::OneOf,
            Descriptor::Service(_) => DescriptorKind::Service,
        }
    }

    pub fn base(&self) -> &DescriptorBase {
        match self {
            Descriptor::Message(message) => message.base(),
            Descriptor::Enum(enumeration) => enumeration.base(),
            Descriptor::OneOf(oneof) => oneof.base(),
            Descriptor::Service(service) => service.base(),
        }
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn name_within_outer_class(&self, formatter: &dyn TypeNameFormatter) -> String {
        self.base().name_within_outer_class(formatter)
    }

    pub fn qualified_name(&self, formatter: &dyn TypeNameFormatter) -> String {
        self.base().qualified_name(formatter)
    }

    pub fn qualified_original_name(&self) -> String {
        match self {
            Descriptor::OneOf(oneof) => oneof.qualified_original_name(),
            _ => self.base().qualified_original_name(),
        }
    }

    pub fn qualified_proto_name(&self) -> String {
        self.base().qualified_proto_name()
    }

    pub fn as_message(&self) -> Option<&Rc<MessageDescriptor>> {
        match self {
            Descriptor::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Rc<EnumDescriptor>> {
        match self {
            Descriptor::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_oneof(&self) -> Option<&Rc<OneOfDescriptor>> {
        match self {
            Descriptor::OneOf(oneof) => Some(oneof),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&Rc<ServiceDescriptor>> {
        match self {
            Descriptor::Service(service) => Some(service),
            _ => None,
        }
    }

    /// Returns `true` if both refer to the same registered declaration.
    pub fn ptr_eq(&self, other: &Descriptor) -> bool {
        match (self, other) {
            (Descriptor::Message(a), Descriptor::Message(b)) => Rc::ptr_eq(a, b),
            (Descriptor::Enum(a), Descriptor::Enum(b)) => Rc::ptr_eq(a, b),
            (Descriptor::OneOf(a), Descriptor::OneOf(b)) => Rc::ptr_eq(a, b),
            (Descriptor::Service(a), Descriptor::Service(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
