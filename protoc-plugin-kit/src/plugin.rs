use std::io::{self, Read, Write};

use log::{debug, info};
use prost::Message;
use prost_types::compiler::code_generator_response::File;
use prost_types::compiler::CodeGeneratorResponse;
use prost_types::FileDescriptorProto;

use crate::context::{target_package, ProcessingContext};
use crate::descriptor::Descriptor;
use crate::generator::{generate_code, GenerationContext, Generator};
use crate::http::HttpRules;
use crate::output::FileContent;
use crate::outer_class::OuterClass;
use crate::registry::Registry;
use crate::request::{Parameters, PluginRequest};
use crate::{Error, Result};

/// Drives a [`Generator`] over a `CodeGeneratorRequest`.
///
/// protoc hands the files over in dependency order, so each file is
/// registered and generated in one pass without a separate linking step:
/// everything a file refers to is already in the registry.
#[derive(Debug)]
pub struct Plugin<G> {
    generator: G,
}

impl<G: Generator> Plugin<G> {
    pub fn new(generator: G) -> Self {
        Plugin { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Reads the request from stdin and writes the response to stdout.
    pub fn run(&mut self) -> Result<()> {
        self.run_with(io::stdin().lock(), io::stdout().lock())
    }

    /// Reads a serialized request from `input` and writes the serialized
    /// response to `output`. Nothing is written unless every file succeeded.
    pub fn run_with<R, W>(&mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: Read,
        W: Write,
    {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;
        let request = PluginRequest::decode(&buf)?;

        let response = self.generate(&request)?;
        output.write_all(&response.encode_to_vec())?;
        output.flush()?;
        Ok(())
    }

    /// Generates the response for `request` with a fresh registry.
    pub fn generate(&mut self, request: &PluginRequest) -> Result<CodeGeneratorResponse> {
        let mut registry = Registry::new();
        self.generate_with_registry(request, &mut registry)
    }

    /// Like [`generate`](Self::generate), registering into `registry`. The
    /// registry may already hold declarations the request refers to.
    pub fn generate_with_registry(
        &mut self,
        request: &PluginRequest,
        registry: &mut Registry,
    ) -> Result<CodeGeneratorResponse> {
        let common_package = common_package(request.files());
        debug!("common package: {:?}", common_package);

        let mut files = Vec::new();
        for (idx, file) in request.files().iter().enumerate() {
            let generated = self.process_file(
                registry,
                file,
                request.http_rules(idx),
                common_package.as_deref(),
                request.parameters(),
            )?;
            files.extend(generated);
        }

        let cx = GenerationContext::new(registry, common_package.as_deref(), request.parameters());
        let miscellaneous = self.generator.miscellaneous_files(&cx)?;
        debug!("adding {} miscellaneous files", miscellaneous.len());
        files.extend(miscellaneous);

        Ok(CodeGeneratorResponse {
            file: files,
            ..Default::default()
        })
    }

    /// Registers the declarations of `file` and, unless the generator skips
    /// it, generates its output file.
    pub fn process_file(
        &mut self,
        registry: &mut Registry,
        file: &FileDescriptorProto,
        http_rules: HttpRules,
        common_package: Option<&str>,
        parameters: &Parameters,
    ) -> Result<Option<File>> {
        info!(
            "Registering declarations in file: {} in package: {}",
            file.name(),
            file.package()
        );
        let generator = &self.generator;
        let outer_class = OuterClass::new(file, |class| generator.plugin_class_name(class));
        let mut ctx = ProcessingContext::new(file, outer_class)
            .with_http_rules(http_rules)
            .with_type_name_formatter(generator.type_name_formatter(common_package))
            .with_common_package(common_package.map(str::to_owned));
        let declarations = registry.register_file(&mut ctx, file)?;

        if self.generator.skip_file(file) {
            debug!("skipping generation for {}", file.name());
            return Ok(None);
        }

        info!(
            "Generating code for file: {} in package: {}",
            file.name(),
            file.package()
        );
        let cx = GenerationContext::new(registry, common_package, parameters);
        let content = FileContent {
            plugin_name: self.generator.plugin_name().to_owned(),
            imports: self.generator.imports(),
            proto_source_name: file.name().to_owned(),
            package: ctx.target_package().to_owned(),
            outer_class_name: ctx.outer_class().plugin_class().to_owned(),
            message_code: self.generate_all(&declarations.messages, &cx)?,
            enum_code: self.generate_all(&declarations.enums, &cx)?,
            service_code: self.generate_all(&declarations.services, &cx)?,
        };

        let name = ctx.output_file_name(self.generator.source_extension());
        let source = content.render();
        debug!("formatting {}", name);
        let formatted = match self.generator.format_source(&source) {
            Ok(formatted) => formatted,
            Err(source_error) => {
                return Err(Error::Rendering {
                    file: name,
                    content: source,
                    source: source_error,
                })
            }
        };

        Ok(Some(File {
            name: Some(name),
            content: Some(formatted),
            ..Default::default()
        }))
    }

    fn generate_all(
        &mut self,
        descriptors: &[Descriptor],
        cx: &GenerationContext<'_>,
    ) -> Result<Vec<String>> {
        let mut code = Vec::new();
        for descriptor in descriptors {
            code.extend(generate_code(&mut self.generator, descriptor, cx)?);
        }
        Ok(code)
    }
}

/// The longest prefix shared by the target packages of all `files`, without a
/// trailing `.`. Files with neither `java_package` nor a package are ignored.
///
/// The prefix is taken character by character, so `com.ab` and `com.ac` share
/// `com.a`.
pub fn common_package(files: &[FileDescriptorProto]) -> Option<String> {
    let mut common: Option<String> = None;
    for file in files {
        let has_java_package = file
            .options
            .as_ref()
            .map_or(false, |options| options.java_package.is_some());
        if !has_java_package && file.package.is_none() {
            continue;
        }
        let package = target_package(file);
        let prefix = match &common {
            Some(current) => common_prefix(current, package),
            None => package,
        };
        common = Some(prefix.strip_suffix('.').unwrap_or(prefix).to_owned());
    }
    common
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((idx, _), _)| idx);
    &a[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{MessageDescriptor, ServiceDescriptor};
    use crate::testing::{field, message, method, proto_file, service};
    use crate::BoxError;
    use pretty_assertions::assert_eq;
    use prost_types::compiler::CodeGeneratorRequest;
    use prost_types::field_descriptor_proto::Type;
    use prost_types::FileOptions;

    struct Outline {
        skip: Option<&'static str>,
        fail_formatting: bool,
    }

    impl Outline {
        fn new() -> Self {
            Outline {
                skip: None,
                fail_formatting: false,
            }
        }
    }

    impl Generator for Outline {
        fn plugin_name(&self) -> &str {
            "outline"
        }

        fn plugin_class_name(&self, proto_class: &str) -> String {
            format!("{}Outline", proto_class)
        }

        fn imports(&self) -> String {
            "import java.util.List;".to_owned()
        }

        fn generate_message_code(
            &mut self,
            message: &MessageDescriptor,
            cx: &GenerationContext<'_>,
        ) -> Result<Option<String>> {
            let mut fields = Vec::new();
            for field in message.fields() {
                fields.push(format!(
                    "{} {};",
                    field.field_type(cx.registry())?,
                    field.suffixed_name()
                ));
            }
            Ok(Some(format!(
                "class {} {{ {} }}",
                message.name(),
                fields.join(" ")
            )))
        }

        fn generate_service_code(
            &mut self,
            service: &ServiceDescriptor,
            _cx: &GenerationContext<'_>,
        ) -> Result<Option<String>> {
            Ok(Some(format!("interface {} {{}}", service.name())))
        }

        fn skip_file(&self, file: &FileDescriptorProto) -> bool {
            self.skip == Some(file.name())
        }

        fn miscellaneous_files(&mut self, cx: &GenerationContext<'_>) -> Result<Vec<File>> {
            Ok(vec![File {
                name: Some("Shared.java".to_owned()),
                content: Some(format!("// {}", cx.common_package().unwrap_or_default())),
                ..Default::default()
            }])
        }

        fn format_source(&self, source: &str) -> Result<String, BoxError> {
            if self.fail_formatting {
                Err("unbalanced braces".into())
            } else {
                Ok(source.to_owned())
            }
        }
    }

    fn request() -> PluginRequest {
        let base = proto_file(vec![message("Widget", vec![field("id", 1, Type::Int64)])]);

        let mut dependent = proto_file(vec![]);
        dependent.name = Some("api/widget_service.proto".to_owned());
        dependent.package = Some("pkg.api".to_owned());
        dependent.options = Some(FileOptions {
            java_package: Some("com.example.api".to_owned()),
            ..Default::default()
        });
        let mut reply = field("widget", 1, Type::Message);
        reply.type_name = Some(".pkg.Widget".to_owned());
        dependent.message_type.push(message("GetReply", vec![reply]));
        dependent.service.push(service(
            "WidgetService",
            vec![method("Get", ".pkg.api.GetReply", ".pkg.api.GetReply")],
        ));

        PluginRequest::new(CodeGeneratorRequest {
            proto_file: vec![base, dependent],
            ..Default::default()
        })
    }

    #[test]
    fn test_generate() {
        let mut plugin = Plugin::new(Outline::new());
        let response = plugin.generate(&request()).unwrap();

        let names: Vec<&str> = response.file.iter().map(|file| file.name()).collect();
        assert_eq!(
            vec![
                "com/example/ProtoOutline.java",
                "com/example/api/WidgetServiceOutline.java",
                "Shared.java",
            ],
            names
        );
        assert_eq!("// com.example", response.file[2].content());
        let dependent = response.file[1].content();
        assert!(dependent.contains("package com.example.api;"));
        assert!(dependent.contains("import java.util.List;"));
        assert!(dependent.contains("public final class WidgetServiceOutline {"));
        assert!(dependent.contains("class GetReply { com.example.ProtoOutline.Widget widget_; }"));
        assert!(dependent.contains("interface WidgetService {}"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_skipped_files_are_still_registered() {
        let mut plugin = Plugin::new(Outline {
            skip: Some("proto.proto"),
            fail_formatting: false,
        });
        let mut registry = Registry::new();
        let response = plugin
            .generate_with_registry(&request(), &mut registry)
            .unwrap();
        assert_eq!(2, response.file.len());
        assert!(registry.contains(".pkg.Widget"));
        assert!(registry.contains(".pkg.api.WidgetService"));
    }

    #[test]
    fn test_rendering_failure_keeps_content() {
        let mut plugin = Plugin::new(Outline {
            skip: None,
            fail_formatting: true,
        });
        let err = plugin.generate(&request()).unwrap_err();
        match err {
            Error::Rendering { file, content, .. } => {
                assert_eq!("com/example/ProtoOutline.java", file);
                assert!(content.contains("class Widget { Long id_; }"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_run_with_writes_nothing_on_failure() {
        let mut broken = request().request().clone();
        broken.proto_file.swap(0, 1);
        let mut output = Vec::new();
        let err = Plugin::new(Outline::new())
            .run_with(broken.encode_to_vec().as_slice(), &mut output)
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { .. }));
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_with_round_trip() {
        let mut output = Vec::new();
        Plugin::new(Outline::new())
            .run_with(request().request().encode_to_vec().as_slice(), &mut output)
            .unwrap();
        let response = CodeGeneratorResponse::decode(output.as_slice()).unwrap();
        assert_eq!(3, response.file.len());
    }

    #[test]
    fn test_common_package() {
        fn file(package: Option<&str>, java_package: Option<&str>) -> FileDescriptorProto {
            FileDescriptorProto {
                package: package.map(str::to_owned),
                options: java_package.map(|java_package| FileOptions {
                    java_package: Some(java_package.to_owned()),
                    ..Default::default()
                }),
                ..Default::default()
            }
        }

        assert_eq!(None, common_package(&[]));
        assert_eq!(None, common_package(&[file(None, None)]));
        assert_eq!(
            Some("com.example".to_owned()),
            common_package(&[
                file(Some("ignored"), Some("com.example.a")),
                file(None, None),
                file(Some("com.example.b"), None),
            ])
        );
        assert_eq!(
            Some("com.a".to_owned()),
            common_package(&[file(Some("com.ab"), None), file(Some("com.ac"), None)])
        );
        assert_eq!(
            Some(String::new()),
            common_package(&[file(Some("a"), None), file(Some("b"), None)])
        );
        assert_eq!(
            Some("com.example".to_owned()),
            common_package(&[file(Some("com.example."), None)])
        );
    }

    #[test]
    fn test_dedup_is_visible_to_generators() {
        let fields = vec![field("a_b", 1, Type::Bool), field("aB", 2, Type::Bool)];
        let file = proto_file(vec![message("Dup", fields)]);
        let response = Plugin::new(Outline::new())
            .generate(&PluginRequest::new(CodeGeneratorRequest {
                proto_file: vec![file],
                ..Default::default()
            }))
            .unwrap();
        assert!(response.file[0]
            .content()
            .contains("class Dup { Boolean aB1_; Boolean aB2_; }"));
    }
}
