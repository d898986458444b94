use prost_types::EnumDescriptorProto;

use crate::context::{ListKind, ProcessingContext};
use crate::descriptor::DescriptorBase;
use crate::Result;

#[derive(Debug)]
pub struct EnumDescriptor {
    base: DescriptorBase,
    proto: EnumDescriptorProto,
    comment: String,
    values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    name: String,
    number: i32,
    comment: String,
}

impl EnumDescriptor {
    pub(crate) fn new(ctx: &mut ProcessingContext, proto: &EnumDescriptorProto) -> Result<Self> {
        let base = DescriptorBase::new(ctx, proto.name())?;
        let comment = ctx.comment_at_path();
        let values = ctx.with_list(ListKind::EnumValues, |ctx| {
            proto
                .value
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    ctx.with_element(idx, |ctx| {
                        Ok(EnumValueDescriptor {
                            name: value.name().to_owned(),
                            number: value.number(),
                            comment: ctx.comment_at_path(),
                        })
                    })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(EnumDescriptor {
            base,
            proto: proto.clone(),
            comment,
            values,
        })
    }

    pub fn base(&self) -> &DescriptorBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn proto(&self) -> &EnumDescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn values(&self) -> &[EnumValueDescriptor] {
        &self.values
    }
}

impl EnumValueDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}
