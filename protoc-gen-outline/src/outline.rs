use std::collections::HashSet;
use std::fmt::Write;

use heck::ToShoutySnakeCase;
use itertools::Itertools;
use log::debug;
use prost_types::compiler::code_generator_response::File;
use prost_types::FileDescriptorProto;
use protoc_plugin_kit::{
    generate_code, Descriptor, DescriptorKind, EnumDescriptor, GenerationContext, Generator,
    IdentityFormatter, MessageDescriptor, OneOfDescriptor, Parameters, Result, ServiceDescriptor,
};

const DEFAULT_SUFFIX: &str = "Outline";
const INDEX_CLASS: &str = "OutlineIndex";

/// Emits, for every `.proto`, a Java class of string constants naming its
/// declarations: protobuf names, protobuf-java class names, field names and
/// comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineGenerator {
    /// Appended to the protobuf-java outer class name.
    suffix: String,
    /// Files registered but not generated.
    skip: HashSet<String>,
    /// Whether to emit the `OutlineIndex` class listing every message.
    index: bool,
}

impl OutlineGenerator {
    /// Options: `suffix=<Name>`, `skip=<file.proto>` (repeatable) and
    /// `no_index`.
    pub fn from_parameters(parameters: &Parameters) -> Self {
        OutlineGenerator {
            suffix: parameters
                .get("suffix")
                .filter(|suffix| !suffix.is_empty())
                .unwrap_or(DEFAULT_SUFFIX)
                .to_owned(),
            skip: parameters
                .get_all("skip")
                .into_iter()
                .map(str::to_owned)
                .collect(),
            index: !parameters.contains("no_index"),
        }
    }

    fn children_code(
        &mut self,
        message: &MessageDescriptor,
        cx: &GenerationContext<'_>,
    ) -> Result<Vec<String>> {
        let mut code = Vec::new();
        for child in message.children() {
            code.extend(generate_code(self, child, cx)?);
        }
        Ok(code)
    }
}

impl Default for OutlineGenerator {
    fn default() -> Self {
        OutlineGenerator::from_parameters(&Parameters::default())
    }
}

impl Generator for OutlineGenerator {
    fn plugin_name(&self) -> &str {
        "protoc-gen-outline"
    }

    fn plugin_class_name(&self, proto_class: &str) -> String {
        format!("{}{}", proto_class, self.suffix)
    }

    fn imports(&self) -> String {
        "import java.util.Arrays;\nimport java.util.List;".to_owned()
    }

    fn generate_message_code(
        &mut self,
        message: &MessageDescriptor,
        cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        let base = message.base();
        let mut body = String::new();
        constant(&mut body, "PROTO_NAME", &quote(&base.qualified_proto_name()));
        constant(&mut body, "ORIGINAL_CLASS", &quote(&base.qualified_original_name()));
        constant(&mut body, "COMMENT", message.comment());

        for field in message.fields() {
            let name = field.name();
            let ty = field.field_type(cx.registry())?;
            body.push('\n');
            let _ = writeln!(body, "/** {} {}, field {}. */", ty, name, field.number());
            constant(&mut body, &name.to_shouty_snake_case(), &quote(&name));
            constant(
                &mut body,
                &format!("{}_COMMENT", name.to_shouty_snake_case()),
                field.comment(),
            );
        }

        for child in self.children_code(message, cx)? {
            body.push('\n');
            body.push_str(&child);
            body.push('\n');
        }

        Ok(Some(class("public static final class", message.name(), &body)))
    }

    fn generate_enum_code(
        &mut self,
        enumeration: &EnumDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        let base = enumeration.base();
        let mut body = String::new();
        constant(&mut body, "PROTO_NAME", &quote(&base.qualified_proto_name()));
        constant(&mut body, "ORIGINAL_CLASS", &quote(&base.qualified_original_name()));
        constant(&mut body, "COMMENT", enumeration.comment());
        let values = enumeration
            .values()
            .iter()
            .map(|value| quote(value.name()))
            .join(", ");
        constant_of(&mut body, "List<String>", "VALUES", &format!("Arrays.asList({})", values));
        for value in enumeration.values() {
            constant(
                &mut body,
                &format!("{}_COMMENT", value.name().to_shouty_snake_case()),
                value.comment(),
            );
        }
        Ok(Some(class("public static final class", enumeration.name(), &body)))
    }

    fn generate_oneof_code(
        &mut self,
        oneof: &OneOfDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        let mut code = String::new();
        let name = oneof.name().to_shouty_snake_case();
        let _ = writeln!(code, "/** Oneof {}, index {}. */", oneof.name(), oneof.index());
        constant(
            &mut code,
            &format!("{}_CASE_CLASS", name),
            &quote(&format!("{}Case", oneof.qualified_original_name())),
        );
        constant(&mut code, &format!("{}_COMMENT", name), oneof.comment());
        Ok(Some(code.trim_end().to_owned()))
    }

    fn generate_service_code(
        &mut self,
        service: &ServiceDescriptor,
        _cx: &GenerationContext<'_>,
    ) -> Result<Option<String>> {
        let base = service.base();
        let mut body = String::new();
        constant(&mut body, "PROTO_NAME", &quote(&base.qualified_proto_name()));
        constant(&mut body, "COMMENT", service.comment());
        for method in service.methods() {
            body.push('\n');
            let _ = write!(
                body,
                "/** {} to {}, {:?}",
                method.input().base().qualified_original_name(),
                method.output().base().qualified_original_name(),
                method.method_type()
            );
            if let Some((verb, path)) = method.http_rule().and_then(|rule| rule.verb_and_path()) {
                let _ = write!(body, ", {} {}", verb, path);
            }
            body.push_str(". */\n");
            constant(
                &mut body,
                &method.name().to_shouty_snake_case(),
                &quote(&format!("/{}/{}", base.qualified_proto_name(), method.name())),
            );
            constant(
                &mut body,
                &format!("{}_COMMENT", method.name().to_shouty_snake_case()),
                method.comment(),
            );
        }
        Ok(Some(class("public static final class", service.name(), &body)))
    }

    fn skip_file(&self, file: &FileDescriptorProto) -> bool {
        self.skip.contains(file.name())
    }

    fn miscellaneous_files(&mut self, cx: &GenerationContext<'_>) -> Result<Vec<File>> {
        if !self.index {
            return Ok(Vec::new());
        }
        let package = cx.common_package().unwrap_or_default();
        let entries = cx
            .registry()
            .iter()
            .filter(|(_, descriptor)| descriptor.kind() == DescriptorKind::Message)
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(name, descriptor)| index_entry(name, descriptor))
            .join(",\n");
        debug!("indexing {} messages", cx.registry().len());

        let mut content = String::new();
        if !package.is_empty() {
            let _ = writeln!(content, "package {};\n", package);
        }
        content.push_str("import java.util.Arrays;\nimport java.util.List;\n\n");
        let body = format!(
            "public static final List<String[]> MESSAGES = Arrays.asList(\n{});\n",
            indent(&entries)
        );
        content.push_str(&class("public final class", INDEX_CLASS, &body));
        content.push('\n');

        let name = if package.is_empty() {
            format!("{}.java", INDEX_CLASS)
        } else {
            format!("{}/{}.java", package.replace('.', "/"), INDEX_CLASS)
        };
        Ok(vec![File {
            name: Some(name),
            content: Some(content),
            ..Default::default()
        }])
    }
}

fn index_entry(name: &str, descriptor: &Descriptor) -> String {
    format!(
        "new String[] {{{}, {}}}",
        quote(name),
        quote(&descriptor.qualified_name(&IdentityFormatter))
    )
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

fn constant(out: &mut String, name: &str, value: &str) {
    constant_of(out, "String", name, value);
}

fn constant_of(out: &mut String, ty: &str, name: &str, value: &str) {
    let _ = writeln!(out, "public static final {} {} = {};", ty, name, value);
}

fn class(declaration: &str, name: &str, body: &str) -> String {
    format!(
        "{} {} {{\n    private {}() {{}}\n\n{}\n}}",
        declaration,
        name,
        name,
        indent(body.trim_end())
    )
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .join("\n")
}
