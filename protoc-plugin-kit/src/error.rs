use std::io;

use prost_types::field_descriptor_proto::Type;
use thiserror::Error;

use crate::descriptor::DescriptorKind;

/// Boxed error returned by the source formatting hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a plugin run can fail.
///
/// None of these are recoverable: a run either produces a complete response or
/// aborts before anything is written.
#[derive(Debug, Error)]
pub enum Error {
    /// A name was looked up that was never registered. Given files arrive in
    /// dependency order this is either malformed input or a registration
    /// ordering defect.
    #[error("descriptor {name} is not present in the registry")]
    UnresolvedReference { name: String },

    /// A reference resolved, but to the wrong kind of declaration.
    #[error("descriptor {name} is {actual}, expected {expected}")]
    UnexpectedKind {
        name: String,
        expected: DescriptorKind,
        actual: DescriptorKind,
    },

    /// A declaration name clashes with an outer class name.
    #[error("descriptor name {name} not allowed: {reason}")]
    NamingConflict { name: String, reason: String },

    /// The location path or enclosing-name stack was popped out of order.
    #[error("traversal consistency failure: {0}")]
    Traversal(String),

    /// A field whose type is not a scalar reached the scalar type table.
    #[error("field {field} has unexpected non-scalar type {ty:?}")]
    InvalidScalar { field: String, ty: Type },

    /// A message flagged as a map entry lacks its key or value field.
    #[error("map entry {name} has no {missing} field")]
    MalformedMapEntry { name: String, missing: &'static str },

    /// The formatting hook rejected the assembled source of a file.
    #[error("got error {source} when formatting {file}:\n{content}")]
    Rendering {
        file: String,
        content: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn traversal(message: impl Into<String>) -> Self {
        Error::Traversal(message.into())
    }
}
