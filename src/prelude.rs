//! Common traits and types that are useful for working with `meshport`
#![allow(unused_imports)]

pub use crate::array::{DataArray, Dtype, Element};
pub use crate::cell_type::CellType;
pub use crate::exodus::ExodusOptions;
pub use crate::format::{Direction, Family, Format};
pub use crate::mesh::{CellBlocks, Fields, Mesh};
pub use crate::traits::{Codec, Encoding};
pub use crate::{Dispatcher, Error};
