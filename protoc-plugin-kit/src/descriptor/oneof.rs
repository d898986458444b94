use itertools::Itertools;
use prost_types::OneofDescriptorProto;

use crate::context::ProcessingContext;
use crate::descriptor::DescriptorBase;
use crate::ident::{capitalize, format_field_name};
use crate::naming::join_qualified;
use crate::Result;

/// A oneof declaration. The fields in it stay with the enclosing message.
#[derive(Debug)]
pub struct OneOfDescriptor {
    base: DescriptorBase,
    proto: OneofDescriptorProto,
    comment: String,
    /// Position among the oneofs of the enclosing message, matching
    /// `FieldDescriptorProto::oneof_index`.
    index: usize,
}

impl OneOfDescriptor {
    pub(crate) fn new(
        ctx: &ProcessingContext,
        proto: &OneofDescriptorProto,
        index: usize,
    ) -> Result<Self> {
        Ok(OneOfDescriptor {
            base: DescriptorBase::new(ctx, proto.name())?,
            proto: proto.clone(),
            comment: ctx.comment_at_path(),
            index,
        })
    }

    pub fn base(&self) -> &DescriptorBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn proto(&self) -> &OneofDescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// protobuf-java exposes a oneof `my_choice` in `Msg` as the case enum
    /// `Msg.MyChoiceCase`; this names the `Msg.MyChoice` prefix of it.
    ///
    /// The protobuf name stays `pkg.Msg.my_choice`, and the oneof is registered
    /// under it, unlike the Java generators this mirrors, which fold the case
    /// name into the protobuf name.
    pub fn qualified_original_name(&self) -> String {
        let base = &self.base;
        let case_name = capitalize(&format_field_name(base.name()));
        let within_outer_class = base
            .outers()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(case_name.as_str()))
            .join(".");
        if base.outer_class().is_multiple_files_enabled() {
            join_qualified([base.target_package(), &within_outer_class])
        } else {
            join_qualified([
                base.target_package(),
                &base.outer_class().proto_class(),
                &within_outer_class,
            ])
        }
    }
}
