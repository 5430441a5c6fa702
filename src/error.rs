use thiserror::Error;

use crate::model::{ComponentType, ElementShape};

/// Error values returned by the conversion entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A node, mesh, accessor, buffer, material or vertex reference points
    /// outside the table it indexes into.
    #[error("{kind} index {index} out of bounds [0, {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: i64,
        len: usize,
    },

    /// The accessor element shape differs from the one the attribute requires.
    #[error("expected accessor type {expected} instead of {actual}")]
    TypeMismatch {
        expected: ElementShape,
        actual: ElementShape,
    },

    /// The accessor storage kind cannot be decoded for this usage.
    #[error("unsupported component type {component_type} for {usage}")]
    UnsupportedComponentType {
        component_type: ComponentType,
        usage: &'static str,
    },

    /// The triangle index stream does not group into whole triangles.
    #[error("triangle list with {count} indices is not a multiple of 3")]
    MalformedTriangleList { count: usize },

    /// A triangle primitive lacks an attribute the conversion depends on.
    #[error("primitive has no {semantic} attribute")]
    MissingAttribute { semantic: &'static str },

    /// An accessor element extends past the end of its buffer.
    #[error("accessor {accessor} reads {offset} bytes past a buffer of {len} bytes")]
    AccessorOutOfBounds {
        accessor: usize,
        offset: usize,
        len: usize,
    },

    /// An index accessor holds a value that is not a valid vertex index.
    #[error("accessor {accessor} holds an invalid index at element {position}")]
    InvalidIndexValue { accessor: usize, position: usize },
}
