//! Descriptor builders shared by the unit tests.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileOptions, MethodDescriptorProto, ServiceDescriptorProto,
};

use crate::context::ProcessingContext;
use crate::outer_class::OuterClass;
use crate::registry::{FileDeclarations, Registry};

pub(crate) fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub(crate) fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: fields,
        ..Default::default()
    }
}

pub(crate) fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_owned()),
        value: values
            .iter()
            .enumerate()
            .map(|(number, value)| EnumValueDescriptorProto {
                name: Some((*value).to_owned()),
                number: Some(number as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub(crate) fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_owned()),
        input_type: Some(input.to_owned()),
        output_type: Some(output.to_owned()),
        ..Default::default()
    }
}

pub(crate) fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_owned()),
        method: methods,
        ..Default::default()
    }
}

/// `proto.proto` in package `pkg`, generating into `com.example`.
pub(crate) fn proto_file(messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("proto.proto".to_owned()),
        package: Some("pkg".to_owned()),
        message_type: messages,
        options: Some(FileOptions {
            java_package: Some("com.example".to_owned()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A context whose plugin class is the protobuf-java class plus `Rest`.
pub(crate) fn context(file: &FileDescriptorProto) -> ProcessingContext {
    ProcessingContext::new(file, OuterClass::new(file, |class| format!("{}Rest", class)))
}

pub(crate) fn register(file: &FileDescriptorProto) -> (Registry, FileDeclarations) {
    let mut registry = Registry::new();
    let declarations = registry
        .register_file(&mut context(file), file)
        .expect("registration failed");
    (registry, declarations)
}

pub(crate) fn registered(messages: Vec<DescriptorProto>) -> (Registry, FileDeclarations) {
    register(&proto_file(messages))
}
