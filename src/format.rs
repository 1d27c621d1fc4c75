//! Format tags, file extensions and the codec family behind each tag.

use crate::error::{UnknownFormat, UnsupportedFormat};
use crate::traits::Encoding;
use crate::Error;

use std::fmt;
use std::path::Path;

/// whether a file is being read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("reading"),
            Self::Write => f.write_str("writing"),
        }
    }
}

/// one codec implementation serves every format of its family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Abaqus,
    Ansys,
    DolfinXml,
    Exodus,
    Gmsh,
    Med,
    Medit,
    Moab,
    Off,
    Permas,
    Stl,
    Vtk,
    Vtu,
    Xdmf,
}

/// every format tag accepted by [`crate::read`] or [`crate::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Abaqus,
    Ansys,
    AnsysAscii,
    AnsysBinary,
    Exodus,
    Gmsh,
    GmshAscii,
    GmshBinary,
    DolfinXml,
    Med,
    Medit,
    Permas,
    Moab,
    Off,
    Stl,
    StlAscii,
    StlBinary,
    Vtk,
    VtkAscii,
    VtkBinary,
    Vtu,
    VtuAscii,
    VtuBinary,
    Xdmf,
    Xdmf3,
}

/// file name suffixes and the format they imply
pub const EXTENSIONS: [(&str, Format); 19] = [
    (".e", Format::Exodus),
    (".ex2", Format::Exodus),
    (".exo", Format::Exodus),
    (".med", Format::Med),
    (".mesh", Format::Medit),
    (".msh", Format::GmshBinary),
    (".xml", Format::DolfinXml),
    (".post", Format::Permas),
    (".post.gz", Format::Permas),
    (".dato", Format::Permas),
    (".dato.gz", Format::Permas),
    (".h5m", Format::Moab),
    (".off", Format::Off),
    (".stl", Format::StlBinary),
    (".vtu", Format::VtuBinary),
    (".vtk", Format::VtkBinary),
    (".xdmf", Format::Xdmf),
    (".xmf", Format::Xdmf),
    (".inp", Format::Abaqus),
];

impl Format {
    pub const ALL: [Format; 25] = [
        Self::Abaqus,
        Self::Ansys,
        Self::AnsysAscii,
        Self::AnsysBinary,
        Self::Exodus,
        Self::Gmsh,
        Self::GmshAscii,
        Self::GmshBinary,
        Self::DolfinXml,
        Self::Med,
        Self::Medit,
        Self::Permas,
        Self::Moab,
        Self::Off,
        Self::Stl,
        Self::StlAscii,
        Self::StlBinary,
        Self::Vtk,
        Self::VtkAscii,
        Self::VtkBinary,
        Self::Vtu,
        Self::VtuAscii,
        Self::VtuBinary,
        Self::Xdmf,
        Self::Xdmf3,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Abaqus => "abaqus",
            Self::Ansys => "ansys",
            Self::AnsysAscii => "ansys-ascii",
            Self::AnsysBinary => "ansys-binary",
            Self::Exodus => "exodus",
            Self::Gmsh => "gmsh",
            Self::GmshAscii => "gmsh-ascii",
            Self::GmshBinary => "gmsh-binary",
            Self::DolfinXml => "dolfin-xml",
            Self::Med => "med",
            Self::Medit => "medit",
            Self::Permas => "permas",
            Self::Moab => "moab",
            Self::Off => "off",
            Self::Stl => "stl",
            Self::StlAscii => "stl-ascii",
            Self::StlBinary => "stl-binary",
            Self::Vtk => "vtk",
            Self::VtkAscii => "vtk-ascii",
            Self::VtkBinary => "vtk-binary",
            Self::Vtu => "vtu",
            Self::VtuAscii => "vtu-ascii",
            Self::VtuBinary => "vtu-binary",
            Self::Xdmf => "xdmf",
            Self::Xdmf3 => "xdmf3",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Self::Abaqus => Family::Abaqus,
            Self::Ansys | Self::AnsysAscii | Self::AnsysBinary => Family::Ansys,
            Self::Exodus => Family::Exodus,
            Self::Gmsh | Self::GmshAscii | Self::GmshBinary => Family::Gmsh,
            Self::DolfinXml => Family::DolfinXml,
            Self::Med => Family::Med,
            Self::Medit => Family::Medit,
            Self::Permas => Family::Permas,
            Self::Moab => Family::Moab,
            Self::Off => Family::Off,
            Self::Stl | Self::StlAscii | Self::StlBinary => Family::Stl,
            Self::Vtk | Self::VtkAscii | Self::VtkBinary => Family::Vtk,
            Self::Vtu | Self::VtuAscii | Self::VtuBinary => Family::Vtu,
            Self::Xdmf | Self::Xdmf3 => Family::Xdmf,
        }
    }

    /// the flavour handed to the family codec
    ///
    /// the bare `vtk` and `vtu` aliases write binary files
    pub fn encoding(self) -> Encoding {
        match self {
            Self::AnsysAscii | Self::GmshAscii | Self::StlAscii | Self::VtkAscii | Self::VtuAscii => {
                Encoding::Ascii
            }
            Self::AnsysBinary
            | Self::GmshBinary
            | Self::StlBinary
            | Self::Vtk
            | Self::VtkBinary
            | Self::Vtu
            | Self::VtuBinary => Encoding::Binary,
            _ => Encoding::Default,
        }
    }

    /// whether the tag may be used in `direction`
    ///
    /// the bare `ansys`, `gmsh` and `stl` tags are only read, the `vtk`, `vtu`
    /// and `xdmf3` aliases are only written
    pub fn supports(self, direction: Direction) -> bool {
        match direction {
            Direction::Read => !matches!(self, Self::Vtk | Self::Vtu | Self::Xdmf3),
            Direction::Write => !matches!(self, Self::Ansys | Self::Gmsh | Self::Stl),
        }
    }

    /// look up an explicit format tag
    pub fn from_tag(tag: &str) -> Option<Format> {
        Self::ALL.iter().copied().find(|f| f.tag() == tag)
    }

    /// deduce the format from the longest known compound extension of the
    /// file name, so `mesh.post.gz` is matched before `mesh.gz`
    pub fn from_path(path: &Path) -> Result<Format, UnknownFormat> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        // every suffix starting at a dot, longest first
        let suffixes: Vec<&str> = file_name
            .match_indices('.')
            .map(|(i, _)| &file_name[i..])
            .filter(|suffix| suffix.len() > 1)
            .collect();

        suffixes
            .iter()
            .find_map(|suffix| {
                EXTENSIONS
                    .iter()
                    .find(|(ext, _)| ext == suffix)
                    .map(|(_, format)| *format)
            })
            .ok_or_else(|| {
                UnknownFormat::new(
                    path.display().to_string(),
                    suffixes.first().copied().unwrap_or_default().to_string(),
                )
            })
    }

    /// the format to use for `path`: the explicit tag when one is given, the
    /// extension of the file name otherwise
    ///
    /// an empty tag counts as no tag
    pub fn resolve(path: &Path, tag: Option<&str>, direction: Direction) -> Result<Format, Error> {
        let unsupported = |tag: &str| {
            UnsupportedFormat::new(tag.to_string(), path.display().to_string(), direction)
        };

        let format = match tag.filter(|tag| !tag.is_empty()) {
            Some(tag) => Self::from_tag(tag).ok_or_else(|| unsupported(tag))?,
            None => Self::from_path(path)?,
        };

        if !format.supports(direction) {
            return Err(unsupported(format.tag()).into());
        }

        Ok(format)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::from_tag(format.tag()), Some(format));
        }
        assert_eq!(Format::from_tag("obj"), None);
    }

    #[test]
    fn compound_extensions_win() {
        assert_eq!(Format::from_path(Path::new("a/mesh.post.gz")).unwrap(), Format::Permas);
        assert_eq!(Format::from_path(Path::new("mesh.post")).unwrap(), Format::Permas);
        assert_eq!(Format::from_path(Path::new("my.mesh.exo")).unwrap(), Format::Exodus);
        assert_eq!(Format::from_path(Path::new("mesh.xdmf")).unwrap(), Format::Xdmf);
    }

    #[test]
    fn unknown_extension_names_whole_suffix() {
        let err = Format::from_path(Path::new("mesh.tar.unknown")).unwrap_err();
        assert_eq!(err.extension, ".tar.unknown");

        let err = Format::from_path(Path::new("mesh")).unwrap_err();
        assert_eq!(err.extension, "");
    }

    #[test]
    fn direction_aware_tags() {
        let path = Path::new("out.bin");
        assert_eq!(
            Format::resolve(path, Some("vtk"), Direction::Write).unwrap(),
            Format::Vtk
        );
        assert!(matches!(
            Format::resolve(path, Some("vtk"), Direction::Read),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Format::resolve(path, Some("stl"), Direction::Write),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(
            Format::resolve(path, Some("stl"), Direction::Read).unwrap(),
            Format::Stl
        );
    }

    #[test]
    fn empty_tag_falls_back_to_extension() {
        let format = Format::resolve(Path::new("mesh.e"), Some(""), Direction::Read).unwrap();
        assert_eq!(format, Format::Exodus);
    }

    #[test]
    fn families_and_encodings() {
        assert_eq!(Format::VtkAscii.family(), Family::Vtk);
        assert_eq!(Format::VtkAscii.encoding(), Encoding::Ascii);
        assert_eq!(Format::Vtu.encoding(), Encoding::Binary);
        assert_eq!(Format::Xdmf3.family(), Family::Xdmf);
        assert_eq!(Format::Exodus.encoding(), Encoding::Default);
    }
}
