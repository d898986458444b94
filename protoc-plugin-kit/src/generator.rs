use std::rc::Rc;

use prost_types::compiler::code_generator_response::File;
use prost_types::FileDescriptorProto;

use crate::descriptor::{
    Descriptor, EnumDescriptor, MessageDescriptor, OneOfDescriptor, ServiceDescriptor,
};
use crate::naming::{IdentityFormatter, TypeNameFormatter};
use crate::registry::Registry;
use crate::request::Parameters;
use crate::{BoxError, Result};

/// The hooks a plugin implements.
///
/// [`Plugin`](crate::Plugin) registers every declaration of every file, then
/// asks the generator for code for each top-level declaration and wraps the
/// pieces into one file per `.proto`. Every code hook defaults to generating
/// nothing.
pub trait Generator {
    /// Shown in the header of generated files.
    fn plugin_name(&self) -> &str;

    /// Derives the outer class this plugin wraps a file's code in from the
    /// outer class protobuf-java generates, e.g. `TestDTO` to `TestDTOMoney`.
    fn plugin_class_name(&self, proto_class: &str) -> String;

    /// Import statements placed at the top of every generated file.
    fn imports(&self) -> String;

    /// The formatter applied to generated type names. `common_package` is the
    /// longest package prefix shared by all files in the request.
    fn type_name_formatter(&self, _common_package: Option<&str>) -> Rc<dyn TypeNameFormatter> {
        Rc::new(IdentityFormatter)
    }

    fn generate_message_code(
        &mut self,
        _message: &MessageDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    fn generate_enum_code(
        &mut self,
        _enumeration: &EnumDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    fn generate_service_code(
        &mut self,
        _service: &ServiceDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    /// Called for oneofs only through [`generate_code`], typically while
    /// generating the enclosing message. The fields of the oneof are part of
    /// the message.
    fn generate_oneof_code(
        &mut self,
        _oneof: &OneOfDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    /// Files to skip during generation. Their declarations are still
    /// registered, so other files can refer to them.
    fn skip_file(&self, _file: &FileDescriptorProto) -> bool {
        false
    }

    /// Extra files not tied to any `.proto`, e.g. an interface shared by all
    /// generated classes. Called once, after every file was processed.
    fn miscellaneous_files(&mut self, _cx: &GenerationContext<'_>) -> Result<Vec<File>> {
        Ok(Vec::new())
    }

    fn source_extension(&self) -> &str {
        ".java"
    }

    /// Pretty-prints the assembled source of a file.
    fn format_source(&self, source: &str) -> Result<String, BoxError> {
        Ok(source.to_owned())
    }
}

/// What the code hooks can see of the run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    registry: &'a Registry,
    common_package: Option<&'a str>,
    parameters: &'a Parameters,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        registry: &'a Registry,
        common_package: Option<&'a str>,
        parameters: &'a Parameters,
    ) -> Self {
        GenerationContext {
            registry,
            common_package,
            parameters,
        }
    }

    /// Everything registered so far: the current file and all files before it.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn common_package(&self) -> Option<&'a str> {
        self.common_package
    }

    pub fn parameters(&self) -> &'a Parameters {
        self.parameters
    }
}

/// Dispatches `descriptor` to the matching hook of `generator`.
pub fn generate_code<G>(
    generator: &mut G,
    descriptor: &Descriptor,
    cx: &GenerationContext<'_>,
) -> Result<Option<String>>
where
    G: Generator + ?Sized,
{
    match descriptor {
        Descriptor::Message(message) => generator.generate_message_code(message, cx),
        Descriptor::Enum(enumeration) => generator.generate_enum_code(enumeration, cx),
        Descriptor::OneOf(oneof) => generator.generate_oneof_code(oneof, cx),
        Descriptor::Service(service) => generator.generate_service_code(service, cx),
    }
}
