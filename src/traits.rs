//! # Traits
//!
//! The contract shared by every file format codec. The crate ships the Exodus
//! codec; codecs for the other formats known to [`crate::Format`] are supplied
//! by the caller and registered with a [`crate::Dispatcher`]:
//!
//! ```ignore
//! struct OffCodec;
//!
//! impl meshport::Codec for OffCodec {
//!     fn read(&self, path: &Path) -> Result<meshport::Mesh, meshport::Error> {
//!         // parse the file
//!     }
//!
//!     fn write(&self, path: &Path, mesh: &meshport::Mesh, encoding: meshport::Encoding)
//!         -> Result<(), meshport::Error> {
//!         // serialize the mesh
//!     }
//! }
//!
//! let mut dispatcher = meshport::Dispatcher::new();
//! dispatcher.register(meshport::Family::Off, Box::new(OffCodec));
//! ```

use crate::mesh::Mesh;
use crate::Error;

use std::path::Path;

/// the text or binary flavour requested through a format tag such as `vtk-ascii`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// whatever the codec writes when no flavour is named
    #[default]
    Default,
    Ascii,
    Binary,
}

impl Encoding {
    pub fn is_binary(self) -> bool {
        matches!(self, Self::Binary)
    }
}

/// reads and writes one family of mesh files
///
/// codecs must not modify the mesh handed to `write`, and must leave any
/// error to the caller; no partially written file is cleaned up
pub trait Codec {
    fn read(&self, path: &Path) -> Result<Mesh, Error>;

    fn write(&self, path: &Path, mesh: &Mesh, encoding: Encoding) -> Result<(), Error>;
}
