use std::rc::Rc;

use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use crate::context::{ListKind, ProcessingContext};
use crate::descriptor::{DescriptorBase, MessageDescriptor};
use crate::http::HttpRule;
use crate::registry::Registry;
use crate::Result;

/// How requests and responses flow through a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodType {
    Simple,
    ServerStream,
    ClientStream,
    BiStream,
}

impl MethodType {
    pub fn from_streaming(client_streaming: bool, server_streaming: bool) -> MethodType {
        match (client_streaming, server_streaming) {
            (false, false) => MethodType::Simple,
            (false, true) => MethodType::ServerStream,
            (true, false) => MethodType::ClientStream,
            (true, true) => MethodType::BiStream,
        }
    }
}

#[derive(Debug)]
pub struct ServiceDescriptor {
    base: DescriptorBase,
    proto: ServiceDescriptorProto,
    comment: String,
    methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// Builds the service and its methods. Method input and output messages
    /// must already be registered.
    pub(crate) fn new(
        ctx: &mut ProcessingContext,
        registry: &Registry,
        proto: &ServiceDescriptorProto,
    ) -> Result<Self> {
        let base = DescriptorBase::new(ctx, proto.name())?;
        let comment = ctx.comment_at_path();
        let methods = ctx.with_list(ListKind::Methods, |ctx| {
            proto
                .method
                .iter()
                .enumerate()
                .map(|(idx, method)| {
                    ctx.with_element(idx, |ctx| MethodDescriptor::new(ctx, registry, method))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(ServiceDescriptor {
            base,
            proto: proto.clone(),
            comment,
            methods,
        })
    }

    pub fn base(&self) -> &DescriptorBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn proto(&self) -> &ServiceDescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name() == name)
    }
}

#[derive(Debug)]
pub struct MethodDescriptor {
    proto: MethodDescriptorProto,
    comment: String,
    method_type: MethodType,
    input: Rc<MessageDescriptor>,
    output: Rc<MessageDescriptor>,
    http_rule: Option<HttpRule>,
}

impl MethodDescriptor {
    fn new(
        ctx: &ProcessingContext,
        registry: &Registry,
        proto: &MethodDescriptorProto,
    ) -> Result<Self> {
        Ok(MethodDescriptor {
            proto: proto.clone(),
            comment: ctx.comment_at_path(),
            method_type: MethodType::from_streaming(
                proto.client_streaming(),
                proto.server_streaming(),
            ),
            input: registry.lookup_message(proto.input_type())?,
            output: registry.lookup_message(proto.output_type())?,
            http_rule: ctx.http_rule().cloned(),
        })
    }

    pub fn name(&self) -> &str {
        self.proto.name()
    }

    pub fn proto(&self) -> &MethodDescriptorProto {
        &self.proto
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn method_type(&self) -> MethodType {
        self.method_type
    }

    pub fn input(&self) -> &Rc<MessageDescriptor> {
        &self.input
    }

    pub fn output(&self) -> &Rc<MessageDescriptor> {
        &self.output
    }

    /// The `google.api.http` binding of the method, if annotated.
    pub fn http_rule(&self) -> Option<&HttpRule> {
        self.http_rule.as_ref()
    }
}
