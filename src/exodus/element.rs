//! Exodus element type names and their canonical cell types.

use crate::cell_type::CellType;
use crate::error::{UnknownElementType, Vocabulary};

/// every Exodus element name understood on read
const FORWARD: [(&str, CellType); 30] = [
    // curves
    ("BEAM", CellType::Line),
    ("BEAM2", CellType::Line),
    ("BEAM3", CellType::Line3),
    ("BAR2", CellType::Line),
    // surfaces
    ("SHELL", CellType::Quad),
    ("SHELL4", CellType::Quad),
    ("SHELL8", CellType::Quad8),
    ("SHELL9", CellType::Quad9),
    ("QUAD", CellType::Quad),
    ("QUAD4", CellType::Quad),
    ("QUAD5", CellType::Quad5),
    ("QUAD8", CellType::Quad8),
    ("QUAD9", CellType::Quad9),
    ("TRIANGLE", CellType::Triangle),
    ("TRI3", CellType::Triangle),
    ("TRI7", CellType::Triangle7),
    ("TRI6", CellType::Triangle6),
    // volumes
    ("HEX", CellType::Hexahedron),
    ("HEXAHEDRON", CellType::Hexahedron),
    ("HEX8", CellType::Hexahedron),
    ("HEX9", CellType::Hexahedron9),
    ("HEX20", CellType::Hexahedron20),
    ("HEX27", CellType::Hexahedron27),
    ("TETRA", CellType::Tetra),
    ("TETRA4", CellType::Tetra4),
    ("TETRA8", CellType::Tetra8),
    ("TETRA10", CellType::Tetra10),
    ("TETRA14", CellType::Tetra14),
    ("PYRAMID", CellType::Pyramid),
    ("WEDGE", CellType::Wedge),
];

/// the canonical type of an on-disk element name
///
/// names are matched ignoring case and surrounding whitespace (fixed width
/// writers tend to pad them)
pub fn to_canonical(tag: &str) -> Result<CellType, UnknownElementType> {
    let upper = tag.trim().to_ascii_uppercase();
    FORWARD
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, cell_type)| *cell_type)
        .ok_or_else(|| UnknownElementType::new(tag.to_string(), Vocabulary::Exodus))
}

/// the element name written for a canonical type
pub fn to_disk(cell_type: CellType) -> Result<&'static str, UnknownElementType> {
    let name = match cell_type {
        CellType::Line => "BAR2",
        CellType::Line3 => "BEAM3",
        CellType::Quad => "QUAD4",
        CellType::Quad5 => "QUAD5",
        CellType::Quad8 => "QUAD8",
        CellType::Quad9 => "QUAD9",
        CellType::Triangle => "TRI3",
        CellType::Triangle6 => "TRI6",
        CellType::Triangle7 => "TRI7",
        CellType::Hexahedron => "HEX8",
        CellType::Hexahedron9 => "HEX9",
        CellType::Hexahedron20 => "HEX20",
        CellType::Hexahedron27 => "HEX27",
        CellType::Tetra => "TETRA",
        CellType::Tetra4 => "TETRA4",
        CellType::Tetra8 => "TETRA8",
        CellType::Tetra10 => "TETRA10",
        CellType::Tetra14 => "TETRA14",
        CellType::Pyramid => "PYRAMID",
        CellType::Wedge => "WEDGE",
        CellType::Vertex | CellType::Wedge15 | CellType::Pyramid13 => {
            return Err(UnknownElementType::new(
                cell_type.name().to_string(),
                Vocabulary::Canonical,
            ))
        }
    };
    Ok(name)
}

/// every on-disk name that reads as `cell_type`
pub fn aliases(cell_type: CellType) -> impl Iterator<Item = &'static str> {
    FORWARD
        .iter()
        .filter(move |(_, c)| *c == cell_type)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_names_read_back() {
        for cell_type in CellType::ALL {
            if let Ok(name) = to_disk(cell_type) {
                assert_eq!(to_canonical(name).unwrap(), cell_type);
            }
        }
    }

    #[test]
    fn every_alias_maps_to_a_writable_type() {
        for (name, cell_type) in FORWARD.iter() {
            let canonical = to_canonical(name).unwrap();
            assert_eq!(canonical, *cell_type);
            if let Ok(preferred) = to_disk(canonical) {
                assert!(aliases(canonical).any(|alias| alias == preferred));
            }
        }
    }

    #[test]
    fn preferred_names() {
        assert_eq!(to_disk(CellType::Line).unwrap(), "BAR2");
        assert_eq!(to_disk(CellType::Quad).unwrap(), "QUAD4");
        assert_eq!(to_disk(CellType::Hexahedron).unwrap(), "HEX8");
        assert_eq!(to_disk(CellType::Tetra).unwrap(), "TETRA");
    }

    #[test]
    fn case_and_padding_are_ignored() {
        assert_eq!(to_canonical("hex8").unwrap(), CellType::Hexahedron);
        assert_eq!(to_canonical(" Tri3 ").unwrap(), CellType::Triangle);
    }

    #[test]
    fn unknown_names() {
        let err = to_canonical("TRISHELL").unwrap_err();
        assert_eq!(err.vocabulary, Vocabulary::Exodus);

        let err = to_disk(CellType::Wedge15).unwrap_err();
        assert_eq!(err.tag, "wedge15");
        assert_eq!(err.vocabulary, Vocabulary::Canonical);
    }
}
