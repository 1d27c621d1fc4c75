//! Routing meshes to and from the codec of their format.

use crate::array::DataArray;
use crate::error::NoCodec;
use crate::exodus::{Exodus, ExodusOptions};
use crate::format::{Direction, Family, Format};
use crate::mesh::{CellBlocks, Mesh};
use crate::traits::Codec;
use crate::Error;

use std::collections::HashMap;
use std::path::Path;

/// picks the codec for a file from its format tag or extension
///
/// Exodus files are handled by the built-in codec; every other family needs
/// a codec registered with [`Dispatcher::register`].
#[derive(Default)]
pub struct Dispatcher {
    exodus: Exodus,
    external: HashMap<Family, Box<dyn Codec>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exodus_options(mut self, options: ExodusOptions) -> Self {
        self.exodus = Exodus::new(options);
        self
    }

    /// use `codec` for every format of `family`, returning the codec it replaces
    ///
    /// registering for [`Family::Exodus`] overrides the built-in codec
    pub fn register(&mut self, family: Family, codec: Box<dyn Codec>) -> Option<Box<dyn Codec>> {
        self.external.insert(family, codec)
    }

    fn codec(&self, format: Format) -> Result<&dyn Codec, NoCodec> {
        match (self.external.get(&format.family()), format.family()) {
            (Some(codec), _) => Ok(&**codec),
            (None, Family::Exodus) => Ok(&self.exodus),
            (None, _) => Err(NoCodec::new(format)),
        }
    }

    /// read a mesh, deducing the format from the extension unless `format` is given
    pub fn read<P: AsRef<Path>>(&self, path: P, format: Option<&str>) -> Result<Mesh, Error> {
        let path = path.as_ref();
        let format = Format::resolve(path, format, Direction::Read)?;
        log::debug!("reading {} as {format}", path.display());
        self.codec(format)?.read(path)
    }

    /// write a mesh, deducing the format from the extension unless `format` is given
    ///
    /// every cell block is checked against the arity of its cell type before
    /// the codec runs
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        mesh: &Mesh,
        format: Option<&str>,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let format = Format::resolve(path, format, Direction::Write)?;
        mesh.check_cell_blocks()?;
        let codec = self.codec(format)?;
        log::debug!("writing {} as {format}", path.display());
        codec.write(path, mesh, format.encoding())
    }
}

/// read a mesh with the built-in codecs
pub fn read<P: AsRef<Path>>(path: P, format: Option<&str>) -> Result<Mesh, Error> {
    Dispatcher::new().read(path, format)
}

/// write a mesh with the built-in codecs
pub fn write<P: AsRef<Path>>(path: P, mesh: &Mesh, format: Option<&str>) -> Result<(), Error> {
    Dispatcher::new().write(path, mesh, format)
}

/// build a mesh from its parts and write it
pub fn write_points_cells<P: AsRef<Path>, A: Into<DataArray>>(
    path: P,
    points: A,
    cells: CellBlocks,
    format: Option<&str>,
) -> Result<(), Error> {
    write(path, &Mesh::new(points, cells), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Encoding;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        written: RefCell<Vec<(PathBuf, Encoding)>>,
    }

    impl Codec for &'static Recorder {
        fn read(&self, _path: &Path) -> Result<Mesh, Error> {
            Ok(Mesh::default())
        }

        fn write(&self, path: &Path, _mesh: &Mesh, encoding: Encoding) -> Result<(), Error> {
            self.written.borrow_mut().push((path.to_path_buf(), encoding));
            Ok(())
        }
    }

    #[test]
    fn known_format_without_codec() {
        let err = read("mesh.vtu", None).unwrap_err();
        match err {
            Error::NoCodec(e) => assert_eq!(e.format, Format::VtuBinary),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn registered_codec_gets_encoding() {
        let recorder: &'static Recorder = Box::leak(Box::new(Recorder::default()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Family::Vtk, Box::new(recorder));

        dispatcher
            .write("out.dat", &Mesh::default(), Some("vtk-ascii"))
            .unwrap();
        dispatcher.write("out.vtk", &Mesh::default(), None).unwrap();
        dispatcher.read("in.vtk", None).unwrap();

        let written = recorder.written.borrow();
        assert_eq!(
            *written,
            vec![
                (PathBuf::from("out.dat"), Encoding::Ascii),
                (PathBuf::from("out.vtk"), Encoding::Binary),
            ]
        );
    }

    #[test]
    fn arity_is_checked_before_the_codec() {
        let recorder: &'static Recorder = Box::leak(Box::new(Recorder::default()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Family::Off, Box::new(recorder));

        let mesh = Mesh::default().with_cells(
            crate::CellType::Hexahedron,
            ndarray::Array2::<i32>::zeros((1, 6)),
        );
        let err = dispatcher.write("bad.off", &mesh, None).unwrap_err();
        assert!(matches!(err, Error::MalformedCellBlock(_)));
        assert!(recorder.written.borrow().is_empty());
    }
}
