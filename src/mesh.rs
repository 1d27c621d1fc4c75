//! The in-memory mesh every codec reads into and writes from.

use crate::array::DataArray;
use crate::cell_type::CellType;
use crate::error::{InvalidMesh, MalformedCellBlock};
use crate::Error;

use std::borrow::Borrow;

/// a small map of arrays that remembers insertion order
///
/// mesh files list blocks and fields in a meaningful order, and codecs write
/// them back out in the order they appear here
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMap<K> {
    entries: Vec<(K, DataArray)>,
}

impl<K> Default for ArrayMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> ArrayMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert an array, replacing (in place) any array stored under the same key
    pub fn insert(&mut self, key: K, array: DataArray) -> Option<DataArray> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, array)),
            None => {
                self.entries.push((key, array));
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&DataArray>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K> ArrayMap<K> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &DataArray)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &DataArray> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq> FromIterator<(K, DataArray)> for ArrayMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, DataArray)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K> IntoIterator for ArrayMap<K> {
    type Item = (K, DataArray);
    type IntoIter = std::vec::IntoIter<(K, DataArray)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a ArrayMap<K> {
    type Item = &'a (K, DataArray);
    type IntoIter = std::slice::Iter<'a, (K, DataArray)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// cell connectivity, one `M x k` array of 0-based node indices per cell type
pub type CellBlocks = ArrayMap<CellType>;

/// named arrays
pub type Fields = ArrayMap<String>;

/// unstructured mesh geometry plus the data attached to it
///
/// Node indices everywhere in this structure are 0-based.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// `N x 3` node coordinates
    pub points: DataArray,
    pub cells: CellBlocks,
    /// one value per node, keyed by field name
    pub point_data: Fields,
    pub cell_data: Fields,
    /// free-form auxiliary arrays
    pub field_data: Fields,
    /// 1D arrays of node indices
    pub node_sets: Fields,
    /// `M x 2` arrays of (element index, local side number)
    pub side_sets: Fields,
}

impl Mesh {
    pub fn new<P: Into<DataArray>>(points: P, cells: CellBlocks) -> Self {
        Self {
            points: points.into(),
            cells,
            ..Self::default()
        }
    }

    pub fn with_cells<A: Into<DataArray>>(mut self, cell_type: CellType, cells: A) -> Self {
        self.cells.insert(cell_type, cells.into());
        self
    }

    pub fn with_point_data<A: Into<DataArray>>(mut self, name: &str, data: A) -> Self {
        self.point_data.insert(name.to_string(), data.into());
        self
    }

    pub fn with_cell_data<A: Into<DataArray>>(mut self, name: &str, data: A) -> Self {
        self.cell_data.insert(name.to_string(), data.into());
        self
    }

    pub fn with_field_data<A: Into<DataArray>>(mut self, name: &str, data: A) -> Self {
        self.field_data.insert(name.to_string(), data.into());
        self
    }

    pub fn with_node_set<A: Into<DataArray>>(mut self, name: &str, nodes: A) -> Self {
        self.node_sets.insert(name.to_string(), nodes.into());
        self
    }

    pub fn with_side_set<A: Into<DataArray>>(mut self, name: &str, sides: A) -> Self {
        self.side_sets.insert(name.to_string(), sides.into());
        self
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// total number of cells over every block
    pub fn num_cells(&self) -> usize {
        self.cells.values().map(DataArray::len).sum()
    }

    /// check that every cell block has rows as wide as its cell type needs
    pub fn check_cell_blocks(&self) -> Result<(), MalformedCellBlock> {
        for (cell_type, block) in self.cells.iter() {
            let expected = cell_type.num_nodes();
            let shape = block.shape();
            if shape.len() != 2 || shape[1] != expected {
                return Err(MalformedCellBlock::new(*cell_type, expected, shape.to_vec()));
            }
        }
        Ok(())
    }

    /// check every invariant of the data model, reporting the first violation
    pub fn validate(&self) -> Result<(), Error> {
        let shape = self.points.shape();
        if shape.len() != 2 || shape[1] != 3 {
            return Err(invalid(format!("points have shape {shape:?}, expected N x 3")));
        }

        self.check_cell_blocks()?;

        let n = self.num_points();
        for (cell_type, block) in self.cells.iter() {
            check_indices(block, n, &format!("`{cell_type}` cells"), "node")?;
        }

        for (name, data) in self.point_data.iter() {
            if data.len() != n {
                return Err(invalid(format!(
                    "point data `{name}` has {} values for {n} points",
                    data.len()
                )));
            }
        }

        for (name, nodes) in self.node_sets.iter() {
            if nodes.ndim() != 1 {
                return Err(invalid(format!(
                    "node set `{name}` has shape {:?}, expected a 1D array",
                    nodes.shape()
                )));
            }
            check_indices(nodes, n, &format!("node set `{name}`"), "node")?;
        }

        let num_cells = self.num_cells();
        for (name, sides) in self.side_sets.iter() {
            let shape = sides.shape();
            if shape.len() != 2 || shape[1] != 2 {
                return Err(invalid(format!(
                    "side set `{name}` has shape {shape:?}, expected M x 2"
                )));
            }
            check_indices(&sides.column(0), num_cells, &format!("side set `{name}`"), "cell")?;
        }

        Ok(())
    }
}

fn invalid(reason: String) -> Error {
    InvalidMesh::new(reason).into()
}

/// every entry must be a whole number below `n`
fn check_indices(indices: &DataArray, n: usize, what: &str, target: &str) -> Result<(), Error> {
    let indices = indices.to_array::<f64>();
    match indices.iter().find(|i| **i < 0.0 || **i >= n as f64 || i.fract() != 0.0) {
        Some(bad) => Err(invalid(format!(
            "{what} reference {target} {bad}, but there are {n} {target}s"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn triangle() -> Mesh {
        Mesh::new(
            arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            CellBlocks::new(),
        )
        .with_cells(CellType::Triangle, arr2(&[[0u32, 1, 2]]))
    }

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut fields = Fields::new();
        fields.insert("b".into(), DataArray::from(vec![1.0f64]));
        fields.insert("a".into(), DataArray::from(vec![2.0f64]));
        let old = fields.insert("b".into(), DataArray::from(vec![3.0f64]));

        assert_eq!(old, Some(DataArray::from(vec![1.0f64])));
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(fields.get("b"), Some(&DataArray::from(vec![3.0f64])));
    }

    #[test]
    fn valid_mesh() {
        let mesh = triangle()
            .with_point_data("u", vec![1.0f64, 2.0, 3.0])
            .with_node_set("corner", vec![0i32])
            .with_side_set("edge", arr2(&[[0i32, 1]]));
        mesh.validate().unwrap();
        assert_eq!(mesh.num_cells(), 1);
    }

    #[test]
    fn wrong_arity() {
        let mesh = triangle().with_cells(CellType::Quad, arr2(&[[0u32, 1, 2]]));
        let err = mesh.check_cell_blocks().unwrap_err();
        assert_eq!(err.cell_type, CellType::Quad);
        assert_eq!(err.expected, 4);
        assert_eq!(err.shape, vec![1, 3]);
    }

    #[test]
    fn out_of_range_node() {
        let mesh = triangle().with_node_set("far", arr1(&[7i64]));
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn side_set_elements_must_exist() {
        let far = triangle().with_side_set("far", arr2(&[[999i32, 1]]));
        match far.validate() {
            Err(Error::InvalidMesh(e)) => assert!(e.reason.contains("cell 999"), "{}", e.reason),
            other => panic!("unexpected result {other:?}"),
        }

        let negative = triangle().with_side_set("negative", arr2(&[[-1i32, 1]]));
        assert!(matches!(negative.validate(), Err(Error::InvalidMesh(_))));

        let fractional = triangle().with_side_set("fractional", arr2(&[[0.5f64, 1.0]]));
        assert!(matches!(fractional.validate(), Err(Error::InvalidMesh(_))));

        // the side number is not an index
        triangle()
            .with_side_set("edge", arr2(&[[0i32, 6]]))
            .validate()
            .unwrap();
    }

    #[test]
    fn short_point_data() {
        let mesh = triangle().with_point_data("u", vec![1.0f64]);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn empty_mesh_is_valid() {
        Mesh::default().validate().unwrap();
    }
}
