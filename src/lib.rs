#![doc = include_str!("../README.md")]

pub mod array;
pub mod cell_type;
mod dispatch;
pub mod error;
pub mod exodus;
pub mod format;
pub mod mesh;
pub mod prelude;
mod traits;
mod utils;

pub use array::{DataArray, Dtype, Element};
pub use cell_type::CellType;
pub use dispatch::{read, write, write_points_cells, Dispatcher};
pub use format::{Direction, Family, Format};
pub use mesh::{ArrayMap, CellBlocks, Fields, Mesh};
pub use traits::{Codec, Encoding};

pub use ndarray;
pub use netcdf3;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error in the netCDF container: `{0}`")]
    Container(#[from] error::ContainerError),
    #[error("Could not convert stored text to utf8: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Array data did not have the expected shape: `{0}`")]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    UnknownElementType(#[from] error::UnknownElementType),
    #[error(transparent)]
    UnsupportedDtype(#[from] error::UnsupportedDtype),
    #[error(transparent)]
    UnknownFormat(#[from] error::UnknownFormat),
    #[error(transparent)]
    UnsupportedFormat(#[from] error::UnsupportedFormat),
    #[error(transparent)]
    NoCodec(#[from] error::NoCodec),
    #[error(transparent)]
    MalformedCellBlock(#[from] error::MalformedCellBlock),
    #[error(transparent)]
    InvalidMesh(#[from] error::InvalidMesh),
    #[error(transparent)]
    IndexOverflow(#[from] error::IndexOverflow),
}
