use super::element;
use super::*;
use crate::array::{stored_type_name, DataArray};
use crate::error::UnsupportedDtype;
use crate::mesh::{CellBlocks, Fields};
use crate::utils::decode_fixed_width;

use ndarray::Array2;
use netcdf3::DataVector;
use std::collections::BTreeMap;

/// what a variable means to the reader, decided from its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// `connect<k>`
    Block(u64),
    /// `coord`, all axes at once
    Coord,
    /// `coordx`, `coordy` or `coordz`
    Axis(usize),
    NodalNames,
    NodalValues,
    NodeSetNames,
    /// `node_ns<k>`
    NodeSet(u64),
    SideSetNames,
    /// `elem_ss<k>`
    SideSetElements(u64),
    /// `side_ss<k>`
    SideSetSides(u64),
    Ignored,
}

/// the number following `prefix`, if all of the rest is digits
fn numbered(name: &str, prefix: &str) -> Option<u64> {
    let rest = name.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

impl Entry {
    fn classify(name: &str) -> Entry {
        if let Some(axis) = COORD_AXES.iter().position(|axis| *axis == name) {
            return Entry::Axis(axis);
        }
        match name {
            COORD => return Entry::Coord,
            NAME_NOD_VAR => return Entry::NodalNames,
            VALS_NOD_VAR => return Entry::NodalValues,
            NS_NAMES => return Entry::NodeSetNames,
            SS_NAMES => return Entry::SideSetNames,
            _ => (),
        }

        if let Some(k) = numbered(name, "connect") {
            Entry::Block(k)
        } else if let Some(k) = numbered(name, "node_ns") {
            Entry::NodeSet(k)
        } else if let Some(k) = numbered(name, "elem_ss") {
            Entry::SideSetElements(k)
        } else if let Some(k) = numbered(name, "side_ss") {
            Entry::SideSetSides(k)
        } else {
            Entry::Ignored
        }
    }
}

/// a variable the reader needs, with what its header says about it
struct Stored {
    name: String,
    entry: Entry,
    shape: Vec<usize>,
    elem_type: Option<String>,
}

impl Stored {
    fn array(&self, values: DataVector) -> Result<DataArray, Error> {
        DataArray::from_data_vector(values, &self.shape, &self.name)
    }

    /// fixed-width character rows, as wide as the last dimension
    fn names(&self, values: DataVector) -> Result<Vec<String>, Error> {
        match values {
            DataVector::U8(bytes) => {
                let width = self.shape.last().copied().unwrap_or(0);
                Ok(decode_fixed_width(&bytes, width)?)
            }
            other => Err(UnsupportedDtype::new(self.name.clone(), stored_type_name(&other)).into()),
        }
    }
}

/// name set `k` (1-based), falling back to a generated name when the file
/// stores none
fn set_name(names: &[String], k: u64, prefix: &str) -> String {
    let index = k.checked_sub(1).map(|i| i as usize);
    match index.and_then(|i| names.get(i)) {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("{prefix}{k}"),
    }
}

#[derive(Default)]
struct SideSet {
    elements: Option<DataArray>,
    sides: Option<DataArray>,
}

/// rebuild a mesh from an opened Exodus II file
///
/// `context` names the file in container errors
pub(super) fn from_reader(mut reader: FileReader, context: &str) -> Result<Mesh, Error> {
    let ds = reader.data_set();
    let num_nodes = ds.dim_size(NUM_NODES).unwrap_or(0);

    let mut wanted = Vec::new();
    for variable in ds.get_vars() {
        let entry = Entry::classify(variable.name());
        log::trace!("`{}` is {entry:?}", variable.name());
        if entry == Entry::Ignored {
            continue;
        }
        wanted.push(Stored {
            name: variable.name().to_string(),
            entry,
            shape: shape(ds, variable),
            elem_type: ds.get_var_attr_as_string(variable.name(), ELEM_TYPE),
        });
    }

    let mut coord = None;
    let mut axes: [Option<DataArray>; 3] = Default::default();
    let mut blocks = BTreeMap::new();
    let mut nodal_names = Vec::new();
    let mut nodal_values = None;
    let mut node_set_names = Vec::new();
    let mut node_sets = BTreeMap::new();
    let mut side_set_names = Vec::new();
    let mut side_sets: BTreeMap<u64, SideSet> = BTreeMap::new();

    for stored in wanted {
        let values = reader
            .read_var(&stored.name)
            .map_err(|e| container(&format!("{context}: {}", stored.name), e))?;
        let name = stored.name.as_str();

        match stored.entry {
            Entry::Block(k) => {
                let elem_type = stored.elem_type.clone().unwrap_or_default();
                let cell_type = element::to_canonical(&elem_type)?;
                let cells = stored.array(values)?.offset(-1, name)?;
                blocks.insert(k, (cell_type, cells));
            }
            Entry::Coord => coord = Some(stored.array(values)?.transpose()),
            Entry::Axis(axis) => axes[axis] = Some(stored.array(values)?),
            Entry::NodalNames => nodal_names = stored.names(values)?,
            Entry::NodalValues => nodal_values = Some(stored.array(values)?),
            Entry::NodeSetNames => node_set_names = stored.names(values)?,
            Entry::NodeSet(k) => {
                node_sets.insert(k, stored.array(values)?.offset(-1, name)?);
            }
            Entry::SideSetNames => side_set_names = stored.names(values)?,
            Entry::SideSetElements(k) => {
                side_sets.entry(k).or_default().elements =
                    Some(stored.array(values)?.offset(-1, name)?);
            }
            Entry::SideSetSides(k) => {
                side_sets.entry(k).or_default().sides = Some(stored.array(values)?);
            }
            Entry::Ignored => (),
        }
    }

    let points = match coord {
        Some(coord) => coord,
        None => {
            let mut points = Array2::<f64>::zeros((num_nodes, 3));
            for (i, axis) in axes.iter().enumerate() {
                if let Some(axis) = axis {
                    let values = axis.to_array::<f64>().into_shape(num_nodes)?;
                    points.column_mut(i).assign(&values);
                }
            }
            DataArray::from(points)
        }
    };

    // blocks are stacked per cell type in increasing block number
    let mut cells = CellBlocks::new();
    for (cell_type, block) in blocks.into_values() {
        let stacked = match cells.get(&cell_type) {
            Some(existing) => existing.vstack(&block)?,
            None => block,
        };
        cells.insert(cell_type, stacked);
    }

    // only the first time step is read
    let mut point_data = Fields::new();
    if let Some(values) = nodal_values.filter(|v| !v.is_empty()) {
        let first_step = values.index_first(0);
        let num_fields = first_step.len();
        for (k, name) in nodal_names.into_iter().enumerate().take(num_fields) {
            point_data.insert(name, first_step.index_first(k));
        }
    }

    let node_sets: Fields = node_sets
        .into_iter()
        .map(|(k, nodes)| (set_name(&node_set_names, k, "node_set_"), nodes))
        .collect();

    let mut side_set_fields = Fields::new();
    for (k, side_set) in side_sets {
        if let (Some(elements), Some(sides)) = (side_set.elements, side_set.sides) {
            let dtype = elements.dtype();
            let pairs = DataArray::stack(&[&elements, &sides], dtype)?.transpose();
            side_set_fields.insert(set_name(&side_set_names, k, "side_set_"), pairs);
        } else {
            log::warn!("side set {k} is missing its element or side list, skipping it");
        }
    }

    log::debug!(
        "read {} nodes in {} cell blocks with {} nodal fields",
        points.len(),
        cells.len(),
        point_data.len()
    );

    Ok(Mesh {
        points,
        cells,
        point_data,
        cell_data: Fields::new(),
        field_data: Fields::new(),
        node_sets,
        side_sets: side_set_fields,
    })
}
