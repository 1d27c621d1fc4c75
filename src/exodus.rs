//! Exodus II meshes
//!
//! Exodus II is a fixed layout of dimensions and variables inside a netCDF
//! container: node coordinates, element blocks with their connectivity,
//! nodal result variables per time step and named node and side sets.
//! Everything is 1-based on disk and 0-based in a [`Mesh`].
//!
//! ```ignore
//! let mesh = meshport::exodus::read("box.e")?;
//! meshport::exodus::write("copy.exo", &mesh)?;
//! ```

pub mod element;
mod read;
mod write;

use crate::error::ContainerError;
use crate::mesh::Mesh;
use crate::traits::{Codec, Encoding};
use crate::Error;

use netcdf3::{DataSet, FileReader, Variable};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub(crate) const NUM_NODES: &str = "num_nodes";
pub(crate) const NUM_DIM: &str = "num_dim";
pub(crate) const NUM_ELEM: &str = "num_elem";
pub(crate) const NUM_EL_BLK: &str = "num_el_blk";
pub(crate) const NUM_NODE_SETS: &str = "num_node_sets";
pub(crate) const NUM_SIDE_SETS: &str = "num_side_sets";
pub(crate) const LEN_STRING: &str = "len_string";
pub(crate) const LEN_LINE: &str = "len_line";
pub(crate) const FOUR: &str = "four";
pub(crate) const TIME_STEP: &str = "time_step";
pub(crate) const NUM_NOD_VAR: &str = "num_nod_var";

pub(crate) const TIME_WHOLE: &str = "time_whole";
pub(crate) const COOR_NAMES: &str = "coor_names";
pub(crate) const COORD: &str = "coord";
pub(crate) const COORD_AXES: [&str; 3] = ["coordx", "coordy", "coordz"];
pub(crate) const EB_PROP1: &str = "eb_prop1";
pub(crate) const NAME_NOD_VAR: &str = "name_nod_var";
pub(crate) const VALS_NOD_VAR: &str = "vals_nod_var";
pub(crate) const NS_PROP1: &str = "ns_prop1";
pub(crate) const NS_NAMES: &str = "ns_names";
pub(crate) const SS_PROP1: &str = "ss_prop1";
pub(crate) const SS_NAMES: &str = "ss_names";
pub(crate) const ELEM_TYPE: &str = "elem_type";

/// width of every stored name, including the terminating NUL
pub const LEN_STRING_VALUE: usize = 33;
pub(crate) const LEN_LINE_VALUE: usize = 81;
/// file format version written to the `version` and `api_version` attributes
pub(crate) const EXODUS_VERSION: f32 = 5.1;

/// first bytes of a netCDF-4 file, which is an HDF5 file underneath
const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";

/// netCDF encoding of a written file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// CDF-1, 32-bit file offsets
    Classic,
    /// CDF-2, for files past 2 GiB
    #[default]
    Offset64,
}

impl Version {
    fn netcdf(self) -> netcdf3::Version {
        match self {
            Self::Classic => netcdf3::Version::Classic,
            Self::Offset64 => netcdf3::Version::Offset64Bit,
        }
    }
}

/// settings for writing Exodus files
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExodusOptions {
    /// overrides the generated `title` attribute
    pub title: Option<String>,
    pub version: Version,
}

impl ExodusOptions {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}

/// the Exodus codec, usable through a [`crate::Dispatcher`] or on its own
#[derive(Debug, Clone, Default)]
pub struct Exodus {
    pub options: ExodusOptions,
}

impl Exodus {
    pub fn new(options: ExodusOptions) -> Self {
        Self { options }
    }
}

impl Codec for Exodus {
    fn read(&self, path: &Path) -> Result<Mesh, Error> {
        read(path)
    }

    /// Exodus has a single encoding, so `encoding` is ignored
    fn write(&self, path: &Path, mesh: &Mesh, _encoding: Encoding) -> Result<(), Error> {
        write_with_options(path, mesh, &self.options)
    }
}

/// wrap an error of the netCDF library, naming what was being handled
pub(crate) fn container<E: fmt::Debug>(context: &str, err: E) -> Error {
    ContainerError::new(context.to_string(), format!("{err:?}")).into()
}

/// extents of `variable`, record dimension included
pub(crate) fn shape(ds: &DataSet, variable: &Variable) -> Vec<usize> {
    variable
        .dim_names()
        .iter()
        .map(|dim| ds.dim_size(dim).unwrap_or(0))
        .collect()
}

/// fail early on netCDF-4 files, which only the HDF5 based library can open
fn check_signature(path: &Path) -> Result<(), Error> {
    let mut head = Vec::with_capacity(HDF5_SIGNATURE.len());
    File::open(path)?
        .take(HDF5_SIGNATURE.len() as u64)
        .read_to_end(&mut head)?;
    if head == HDF5_SIGNATURE {
        return Err(ContainerError::new(
            path.display().to_string(),
            "netCDF-4 (HDF5) files are not supported, store the file with the classic or \
             64-bit offset netCDF encoding"
                .to_string(),
        )
        .into());
    }
    Ok(())
}

/// read an Exodus II file
pub fn read<P: AsRef<Path>>(path: P) -> Result<Mesh, Error> {
    let path = path.as_ref();
    log::debug!("reading exodus file {}", path.display());
    check_signature(path)?;
    let context = path.display().to_string();
    let reader = FileReader::open(path).map_err(|e| container(&context, e))?;
    read::from_reader(reader, &context)
}

/// write `mesh` as an Exodus II file with the default options
pub fn write<P: AsRef<Path>>(path: P, mesh: &Mesh) -> Result<(), Error> {
    write_with_options(path, mesh, &ExodusOptions::default())
}

/// write `mesh` as an Exodus II file, truncating any existing file
///
/// every check happens before the file is created
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    mesh: &Mesh,
    options: &ExodusOptions,
) -> Result<(), Error> {
    let path = path.as_ref();
    let layout = write::to_layout(mesh, options)?;
    log::debug!(
        "writing exodus file {} ({} nodes, {} element blocks, {:?})",
        path.display(),
        mesh.num_points(),
        mesh.cells.len(),
        options.version
    );
    layout.save(path, options.version)
}
