//! Error types for type definition, construction, and mutation.
//!
//! Two diagnostic families exist. Definition errors ([`DefineError`]) are
//! fatal: the enclosing `define` call aborts and no type is registered.
//! Validation errors during construction are advisory and surface through
//! the [`Reporter`](crate::Reporter) instead of a `Result`; only failures
//! that make construction impossible ([`InstanceError`]) or reject a
//! mutation ([`MutateError`]) are returned as errors.
//!
//! Several display strings below are stable contracts consumed by existing
//! assertions; they must not be reworded.

use thiserror::Error;

/// Schema-definition failures. Reported at `fatal` level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefineError {
    /// Field name starts with the reserved `$` prefix.
    #[error("Type definition error: \"{0}\" is a reserved field.")]
    ReservedField(String),
    /// Field type is poisoned or otherwise not a usable type.
    #[error("Type definition error: \"{0}\" must be a primitive type or extend core3.Type")]
    InvalidFieldType(String),
    /// List field declared without element type parameters.
    #[error(
        "Type definition error: \"{0}\" Untyped Lists are not supported please state type of list item in the format core3.List<string>"
    )]
    UntypedList(String),
    /// Map field declared without key/value type parameters.
    #[error(
        "Type definition error: \"{0}\" Untyped Maps are not supported please state types of key and value in the format core3.Map<string, string>"
    )]
    UntypedMap(String),
}

impl DefineError {
    /// The offending field path, e.g. `invalid.zagzag<0>`.
    pub fn path(&self) -> &str {
        match self {
            Self::ReservedField(path)
            | Self::InvalidFieldType(path)
            | Self::UntypedList(path)
            | Self::UntypedMap(path) => path,
        }
    }
}

/// Failures that prevent an instance from being constructed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// Instantiating a list container with no element types.
    #[error(
        "List constructor: Untyped Lists are not supported please state type of list item in the format core3.List<string>"
    )]
    UntypedList,
    /// Instantiating a map container with missing or invalid key/value types.
    #[error(
        "Map constructor: Untyped Maps are not supported please state types of key and value in the format core3.Map<string, string>"
    )]
    UntypedMap,
    /// A by-name reference did not resolve against the registry.
    #[error("type {0} is not registered")]
    UnknownType(String),
    /// The descriptor does not describe an instantiable type.
    #[error("type {0} cannot be instantiated")]
    NotInstantiable(String),
}

/// Failures rejecting an in-place mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutateError {
    /// The handle is a read-only projection.
    #[error("Attempt to override a read only value {0}")]
    ReadOnly(String),
    /// The composite declares no such field.
    #[error("no field named {0}")]
    UnknownField(String),
    /// List index past the end.
    #[error("index {0} out of bounds for list of length {1}")]
    OutOfBounds(usize, usize),
    /// The new value failed the same validation construction uses. Carries
    /// the reported diagnostic message.
    #[error("{0}")]
    IllegalValue(String),
    /// The operation does not apply to this kind of instance.
    #[error("instance of {0} does not support this operation")]
    Unsupported(String),
}
