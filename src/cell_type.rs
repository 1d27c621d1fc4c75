//! The canonical cell type vocabulary shared by every codec.

use crate::error::{UnknownElementType, Vocabulary};

use std::fmt;
use std::str::FromStr;

/// Element types, named after their shape and node count.
///
/// The bare names (`Triangle`, `Hexahedron`, ...) are the linear elements;
/// a numeric suffix gives the number of nodes of a higher order variant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum CellType {
    /// single point
    Vertex,
    /// 2 node segment
    Line,
    /// 3 node segment
    Line3,
    /// 3 node triangle
    Triangle,
    Triangle6,
    Triangle7,
    /// 4 node quadrilateral
    Quad,
    Quad5,
    Quad8,
    Quad9,
    /// 4 node tetrahedron
    Tetra,
    /// 4 node tetrahedron, kept apart from [`CellType::Tetra`] by some writers
    Tetra4,
    Tetra8,
    Tetra10,
    Tetra14,
    /// 8 node hexahedron
    Hexahedron,
    Hexahedron9,
    Hexahedron20,
    Hexahedron27,
    /// 6 node prism
    Wedge,
    Wedge15,
    /// 5 node pyramid
    Pyramid,
    Pyramid13,
}

impl CellType {
    pub const ALL: [CellType; 23] = [
        Self::Vertex,
        Self::Line,
        Self::Line3,
        Self::Triangle,
        Self::Triangle6,
        Self::Triangle7,
        Self::Quad,
        Self::Quad5,
        Self::Quad8,
        Self::Quad9,
        Self::Tetra,
        Self::Tetra4,
        Self::Tetra8,
        Self::Tetra10,
        Self::Tetra14,
        Self::Hexahedron,
        Self::Hexahedron9,
        Self::Hexahedron20,
        Self::Hexahedron27,
        Self::Wedge,
        Self::Wedge15,
        Self::Pyramid,
        Self::Pyramid13,
    ];

    /// the canonical tag of this type
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Line => "line",
            Self::Line3 => "line3",
            Self::Triangle => "triangle",
            Self::Triangle6 => "triangle6",
            Self::Triangle7 => "triangle7",
            Self::Quad => "quad",
            Self::Quad5 => "quad5",
            Self::Quad8 => "quad8",
            Self::Quad9 => "quad9",
            Self::Tetra => "tetra",
            Self::Tetra4 => "tetra4",
            Self::Tetra8 => "tetra8",
            Self::Tetra10 => "tetra10",
            Self::Tetra14 => "tetra14",
            Self::Hexahedron => "hexahedron",
            Self::Hexahedron9 => "hexahedron9",
            Self::Hexahedron20 => "hexahedron20",
            Self::Hexahedron27 => "hexahedron27",
            Self::Wedge => "wedge",
            Self::Wedge15 => "wedge15",
            Self::Pyramid => "pyramid",
            Self::Pyramid13 => "pyramid13",
        }
    }

    /// nodes per element
    pub fn num_nodes(self) -> usize {
        match self {
            Self::Vertex => 1,
            Self::Line => 2,
            Self::Line3 | Self::Triangle => 3,
            Self::Quad | Self::Tetra | Self::Tetra4 => 4,
            Self::Quad5 | Self::Pyramid => 5,
            Self::Triangle6 | Self::Wedge => 6,
            Self::Triangle7 => 7,
            Self::Quad8 | Self::Tetra8 | Self::Hexahedron => 8,
            Self::Quad9 | Self::Hexahedron9 => 9,
            Self::Tetra10 => 10,
            Self::Pyramid13 => 13,
            Self::Tetra14 => 14,
            Self::Wedge15 => 15,
            Self::Hexahedron20 => 20,
            Self::Hexahedron27 => 27,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|cell_type| cell_type.name() == s)
            .ok_or_else(|| UnknownElementType::new(s.to_string(), Vocabulary::Canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for cell_type in CellType::ALL {
            assert_eq!(cell_type.name().parse::<CellType>().unwrap(), cell_type);
        }
    }

    #[test]
    fn unknown_name() {
        let err = "hexahedron64".parse::<CellType>().unwrap_err();
        assert_eq!(err.tag, "hexahedron64");
        assert_eq!(err.vocabulary, Vocabulary::Canonical);
    }

    #[test]
    fn arity() {
        assert_eq!(CellType::Hexahedron.num_nodes(), 8);
        assert_eq!(CellType::Triangle6.num_nodes(), 6);
        assert_eq!(CellType::Hexahedron27.num_nodes(), 27);
    }
}
