use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FileDescriptorProto, OneofDescriptorProto,
    ServiceDescriptorProto,
};

use crate::context::{ListKind, ProcessingContext};
use crate::descriptor::{
    Descriptor, DescriptorKind, EnumDescriptor, MessageDescriptor, OneOfDescriptor,
    ServiceDescriptor,
};
use crate::{Error, Result};

/// The symbol table of one plugin run.
///
/// Every registered declaration is reachable under two names: its fully
/// qualified protobuf name (`pkg.Outer.Inner`) and its name relative to the
/// outer class of its file (`Outer.Inner`), formatted by the file's type name
/// formatter. Relative names are not unique across packages; the most
/// recently registered declaration wins.
#[derive(Debug, Default)]
pub struct Registry {
    by_proto_name: HashMap<String, Descriptor>,
    by_relative_name: HashMap<String, Descriptor>,
}

/// The top-level declarations of one file, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct FileDeclarations {
    pub messages: Vec<Descriptor>,
    pub enums: Vec<Descriptor>,
    pub services: Vec<Descriptor>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Registers everything declared in `file`: enums, then messages with
    /// everything nested in them, then services.
    ///
    /// Files must be registered in dependency order, since service methods
    /// resolve their messages immediately.
    pub fn register_file(
        &mut self,
        ctx: &mut ProcessingContext,
        file: &FileDescriptorProto,
    ) -> Result<FileDeclarations> {
        let enums = ctx.with_list(ListKind::Enums, |ctx| {
            file.enum_type
                .iter()
                .enumerate()
                .map(|(idx, proto)| ctx.with_element(idx, |ctx| self.register_enum(ctx, proto)))
                .collect::<Result<Vec<_>>>()
        })?;
        let messages = ctx.with_list(ListKind::Messages, |ctx| {
            file.message_type
                .iter()
                .enumerate()
                .map(|(idx, proto)| ctx.with_element(idx, |ctx| self.register_message(ctx, proto)))
                .collect::<Result<Vec<_>>>()
        })?;
        let services = ctx.with_list(ListKind::Services, |ctx| {
            file.service
                .iter()
                .enumerate()
                .map(|(idx, proto)| ctx.with_element(idx, |ctx| self.register_service(ctx, proto)))
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(FileDeclarations {
            messages,
            enums,
            services,
        })
    }

    /// Registers the message at the current element of a message list.
    ///
    /// Nested messages, nested enums and oneofs are registered first, in
    /// that order, so they are all known before the message itself.
    pub fn register_message(
        &mut self,
        ctx: &mut ProcessingContext,
        proto: &DescriptorProto,
    ) -> Result<Descriptor> {
        let name = proto.name();
        let mut children = ctx.with_list(ListKind::NestedMessages(name), |ctx| {
            proto
                .nested_type
                .iter()
                .enumerate()
                .map(|(idx, nested)| ctx.with_element(idx, |ctx| self.register_message(ctx, nested)))
                .collect::<Result<Vec<_>>>()
        })?;
        let enums = ctx.with_list(ListKind::NestedEnums(name), |ctx| {
            proto
                .enum_type
                .iter()
                .enumerate()
                .map(|(idx, nested)| ctx.with_element(idx, |ctx| self.register_enum(ctx, nested)))
                .collect::<Result<Vec<_>>>()
        })?;
        let oneofs = ctx.with_list(ListKind::NestedOneofs(name), |ctx| {
            proto
                .oneof_decl
                .iter()
                .enumerate()
                .map(|(idx, oneof)| {
                    ctx.with_element(idx, |ctx| self.register_oneof(ctx, oneof, idx))
                })
                .collect::<Result<Vec<_>>>()
        })?;
        children.extend(enums);
        children.extend(oneofs);

        let message = MessageDescriptor::new(ctx, proto, children)?;
        Ok(self.insert(ctx, Descriptor::Message(Rc::new(message))))
    }

    /// Registers the enum at the current element of an enum list.
    pub fn register_enum(
        &mut self,
        ctx: &mut ProcessingContext,
        proto: &EnumDescriptorProto,
    ) -> Result<Descriptor> {
        let enumeration = EnumDescriptor::new(ctx, proto)?;
        Ok(self.insert(ctx, Descriptor::Enum(Rc::new(enumeration))))
    }

    /// Registers the oneof at the current element of a oneof list. `index` is
    /// its position among the oneofs of the enclosing message.
    pub fn register_oneof(
        &mut self,
        ctx: &mut ProcessingContext,
        proto: &OneofDescriptorProto,
        index: usize,
    ) -> Result<Descriptor> {
        let oneof = OneOfDescriptor::new(ctx, proto, index)?;
        Ok(self.insert(ctx, Descriptor::OneOf(Rc::new(oneof))))
    }

    /// Registers the service at the current element of a service list,
    /// resolving the messages of its methods.
    pub fn register_service(
        &mut self,
        ctx: &mut ProcessingContext,
        proto: &ServiceDescriptorProto,
    ) -> Result<Descriptor> {
        let service = ServiceDescriptor::new(ctx, self, proto)?;
        Ok(self.insert(ctx, Descriptor::Service(Rc::new(service))))
    }

    fn insert(&mut self, ctx: &ProcessingContext, descriptor: Descriptor) -> Descriptor {
        let proto_name = descriptor.qualified_proto_name();
        let relative_name = descriptor.name_within_outer_class(ctx.type_name_formatter().as_ref());
        debug!(
            "registered {} {} as {}",
            descriptor.kind(),
            proto_name,
            relative_name
        );
        self.by_proto_name.insert(proto_name, descriptor.clone());
        self.by_relative_name.insert(relative_name, descriptor.clone());
        descriptor
    }

    /// Resolves a name as it appears in a `FieldDescriptorProto::type_name`
    /// or a method input/output type (`.pkg.Msg`), or a name relative to an
    /// outer class (`Msg.Inner`).
    ///
    /// Names from files without a package may arrive without the leading
    /// dot, so a failed qualified lookup falls back to the bare name.
    pub fn lookup(&self, name: &str) -> Result<&Descriptor> {
        name.strip_prefix('.')
            .and_then(|qualified| self.by_proto_name.get(qualified))
            .or_else(|| self.by_relative_name.get(name))
            .or_else(|| self.by_proto_name.get(name))
            .ok_or_else(|| Error::UnresolvedReference {
                name: name.to_owned(),
            })
    }

    /// Like [`lookup`](Self::lookup), but the declaration must be a message.
    pub fn lookup_message(&self, name: &str) -> Result<Rc<MessageDescriptor>> {
        match self.lookup(name)? {
            Descriptor::Message(message) => Ok(Rc::clone(message)),
            other => Err(Error::UnexpectedKind {
                name: name.to_owned(),
                expected: DescriptorKind::Message,
                actual: other.kind(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.by_proto_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_proto_name.is_empty()
    }

    /// Every registered declaration, keyed by its qualified protobuf name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.by_proto_name
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }
}
