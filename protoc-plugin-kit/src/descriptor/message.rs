use std::collections::HashSet;

use itertools::Itertools;
use prost_types::{DescriptorProto, FieldDescriptorProto};

use crate::context::{ListKind, ProcessingContext};
use crate::descriptor::{Descriptor, DescriptorBase, FieldDescriptor};
use crate::ident::format_field_name;
use crate::registry::Registry;
use crate::{Error, Result};

/// A message, with its fields and the declarations nested in it.
#[derive(Debug)]
pub struct MessageDescriptor {
    base: DescriptorBase,
    proto: DescriptorProto,
    comment: String,
    fields: Vec<FieldDescriptor>,
    /// Nested messages, then nested enums, then oneofs, each in declaration
    /// order.
    children: Vec<Descriptor>,
}

impl MessageDescriptor {
    /// Builds the descriptor at the current element of a message list. The
    /// `children` must already be registered.
    pub(crate) fn new(
        ctx: &mut ProcessingContext,
        proto: &DescriptorProto,
        children: Vec<Descriptor>,
    ) -> Result<Self> {
        let base = DescriptorBase::new(ctx, proto.name())?;
        let comment = ctx.comment_at_path();
        let duplicate_names = duplicate_field_names(&proto.field);
        let fields = ctx.with_list(ListKind::Fields, |ctx| {
            proto
                .field
                .iter()
                .enumerate()
                .map(|(idx, field)| {
                    ctx.with_element(idx, |ctx| {
                        Ok(FieldDescriptor::new(
                            ctx,
                            field,
                            &duplicate_names,
                            &proto.oneof_decl,
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(MessageDescriptor {
            base,
            proto: proto.clone(),
            comment,
            fields,
            children,
        })
    }

    pub fn base(&self) -> &DescriptorBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn proto(&self) -> &DescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn children(&self) -> &[Descriptor] {
        &self.children
    }

    /// Looks up a field by its protobuf name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.proto().name() == name)
    }

    /// The fields belonging to the oneof at `index` in this message.
    pub fn oneof_fields(&self, index: usize) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields
            .iter()
            .filter(move |field| field.proto().oneof_index == Some(index as i32))
    }

    /// `true` for the synthetic `FooEntry` messages protoc generates for
    /// `map<K, V> foo` fields.
    pub fn is_map_entry(&self) -> bool {
        self.proto
            .options
            .as_ref()
            .map_or(false, |options| options.map_entry())
    }

    /// The key and value types of a map entry message.
    pub fn map_types(&self, registry: &Registry) -> Result<(String, String)> {
        let key = self.map_entry_field("key")?.type_name(registry)?;
        let value = self.map_entry_field("value")?.type_name(registry)?;
        Ok((key, value))
    }

    /// The Java type of a map field whose entries are this message, e.g.
    /// `Map<String, Long>`.
    pub fn map_type_name(&self, registry: &Registry) -> Result<String> {
        let (key, value) = self.map_types(registry)?;
        Ok(format!("Map<{}, {}>", key, value))
    }

    fn map_entry_field(&self, name: &'static str) -> Result<&FieldDescriptor> {
        self.field_by_name(name)
            .ok_or_else(|| Error::MalformedMapEntry {
                name: self.base.qualified_proto_name(),
                missing: name,
            })
    }
}

/// The camel case names shared by more than one field.
fn duplicate_field_names(fields: &[FieldDescriptorProto]) -> HashSet<String> {
    fields
        .iter()
        .map(|field| format_field_name(field.name()))
        .counts()
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(name, _)| name)
        .collect()
}
