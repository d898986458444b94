//! Field numbers from `descriptor.proto` that make up `SourceCodeInfo` location paths.

pub(crate) struct FileDescriptorProtoLocations;

impl FileDescriptorProtoLocations {
    pub const MESSAGE_TYPE: i32 = 4;
    pub const ENUM_TYPE: i32 = 5;
    pub const SERVICE: i32 = 6;
}

pub(crate) struct DescriptorLocations;

impl DescriptorLocations {
    pub const FIELD: i32 = 2;
    pub const NESTED_TYPE: i32 = 3;
    pub const ENUM_TYPE: i32 = 4;
    pub const ONEOF_DECL: i32 = 8;
}

pub(crate) struct EnumDescriptorLocations;

impl EnumDescriptorLocations {
    pub const VALUE: i32 = 2;
}

pub(crate) struct ServiceDescriptorProtoLocations;

impl ServiceDescriptorProtoLocations {
    pub const METHOD: i32 = 2;
}
