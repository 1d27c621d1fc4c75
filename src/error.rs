//! Detail types carried by the variants of [`crate::Error`]

use crate::cell_type::CellType;
use crate::format::Format;

use derive_more::{Constructor, Display};

/// an element type tag with no counterpart in the requested vocabulary
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "unknown {vocabulary} element type `{tag}`")]
pub struct UnknownElementType {
    pub tag: String,
    pub vocabulary: Vocabulary,
}

/// which side of an element type lookup failed
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    #[display(fmt = "exodus")]
    Exodus,
    #[display(fmt = "canonical")]
    Canonical,
}

/// stored data whose type cannot be represented as a numeric array, or a
/// numeric array that cannot be stored in the requested encoding
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "`{variable}` has dtype `{dtype}`, which has no mapping here")]
pub struct UnsupportedDtype {
    pub variable: String,
    pub dtype: &'static str,
}

/// a file name whose extension does not match any known format
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "could not deduce file format from extension `{extension}` of `{path}`")]
pub struct UnknownFormat {
    pub path: String,
    pub extension: String,
}

/// an explicit format tag that is not known, or not usable in this direction
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "unsupported file format `{tag}` for {direction} `{path}`")]
pub struct UnsupportedFormat {
    pub tag: String,
    pub path: String,
    pub direction: crate::format::Direction,
}

/// a known format without a registered codec
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "no codec registered for file format `{format}`")]
pub struct NoCodec {
    pub format: Format,
}

/// a cell block whose rows do not have the arity of its cell type
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(
    fmt = "`{}` cells need {} nodes per row, the block has shape {:?}",
    cell_type,
    expected,
    shape
)]
pub struct MalformedCellBlock {
    pub cell_type: CellType,
    pub expected: usize,
    pub shape: Vec<usize>,
}

/// a mesh that breaks one of the data model invariants
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "invalid mesh: {reason}")]
pub struct InvalidMesh {
    pub reason: String,
}

/// a failure reported by the netCDF container while opening, defining or
/// moving data through a file
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "`{context}`: {message}")]
pub struct ContainerError {
    /// the file, dimension or variable being handled
    pub context: String,
    pub message: String,
}

/// an index shift that would leave the range of the array's dtype
#[derive(Display, Debug, Clone, PartialEq, Constructor)]
#[display(fmt = "shifting `{array}` by {delta} overflows its dtype")]
pub struct IndexOverflow {
    pub array: String,
    pub delta: i8,
}

macro_rules! impl_error {
    ($($ty:ty),*) => {
        $(impl std::error::Error for $ty {})*
    };
}

impl_error!(
    UnknownElementType,
    UnsupportedDtype,
    UnknownFormat,
    UnsupportedFormat,
    NoCodec,
    MalformedCellBlock,
    InvalidMesh,
    IndexOverflow,
    ContainerError
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_block_message() {
        let err = MalformedCellBlock::new(CellType::Hexahedron, 8, vec![2, 6]);
        assert_eq!(
            err.to_string(),
            "`hexahedron` cells need 8 nodes per row, the block has shape [2, 6]"
        );
    }
}
