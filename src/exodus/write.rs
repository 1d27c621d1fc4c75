use super::element;
use super::*;
use crate::array::DataArray;
use crate::error::InvalidMesh;
use crate::utils::encode_fixed_width;

use netcdf3::{DataType, DataVector, FileWriter};

/// an Exodus dataset definition together with the values of its variables,
/// kept in memory until every check has passed
pub(super) struct Layout {
    pub(super) ds: DataSet,
    pub(super) data: Vec<(String, DataVector)>,
}

impl Layout {
    pub(super) fn new() -> Self {
        Self {
            ds: DataSet::new(),
            data: Vec::new(),
        }
    }

    /// the values stored for variable `name`
    #[cfg(test)]
    pub(super) fn values(&self, name: &str) -> Option<&DataVector> {
        self.data.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// create the file at `path` and write the definition and every variable
    pub(super) fn save(&self, path: &Path, version: Version) -> Result<(), Error> {
        let context = path.display().to_string();

        let mut writer = FileWriter::open(path).map_err(|e| container(&context, e))?;
        writer
            .set_def(&self.ds, version.netcdf(), 0)
            .map_err(|e| container(&context, e))?;
        for (name, values) in &self.data {
            let written = match values {
                DataVector::I8(v) => writer.write_var_i8(name, v),
                DataVector::U8(v) => writer.write_var_u8(name, v),
                DataVector::I16(v) => writer.write_var_i16(name, v),
                DataVector::I32(v) => writer.write_var_i32(name, v),
                DataVector::F32(v) => writer.write_var_f32(name, v),
                DataVector::F64(v) => writer.write_var_f64(name, v),
            };
            written.map_err(|e| container(name, e))?;
        }
        writer.close().map_err(|e| container(&context, e))?;
        Ok(())
    }
}

pub(super) fn data_type(values: &DataVector) -> DataType {
    match values {
        DataVector::I8(_) => DataType::I8,
        DataVector::U8(_) => DataType::U8,
        DataVector::I16(_) => DataType::I16,
        DataVector::I32(_) => DataType::I32,
        DataVector::F32(_) => DataType::F32,
        DataVector::F64(_) => DataType::F64,
    }
}

/// a layout under construction
///
/// netCDF classic files cannot hold a zero length fixed dimension, so empty
/// dimensions are never declared and variables over them are left out
struct Builder {
    out: Layout,
}

impl Builder {
    fn dimension(&mut self, name: &str, len: usize) -> Result<(), Error> {
        if len == 0 {
            log::trace!("leaving out empty dimension `{name}`");
            return Ok(());
        }
        self.out
            .ds
            .add_fixed_dim(name, len)
            .map_err(|e| container(name, e))?;
        Ok(())
    }

    /// declare a variable and queue its values if all of its dimensions exist
    ///
    /// returns whether the variable was declared
    fn variable(&mut self, name: &str, dims: &[&str], values: DataVector) -> Result<bool, Error> {
        if let Some(missing) = dims.iter().find(|d| self.out.ds.dim_size(d).is_none()) {
            log::trace!("leaving out `{name}`, dimension `{missing}` is empty");
            return Ok(false);
        }
        self.out
            .ds
            .add_var(name, dims, data_type(&values))
            .map_err(|e| container(name, e))?;
        self.out.data.push((name.to_string(), values));
        Ok(true)
    }

    fn array(&mut self, name: &str, dims: &[&str], array: &DataArray) -> Result<bool, Error> {
        let values = array.to_data_vector(name)?;
        self.variable(name, dims, values)
    }

    fn names<S: AsRef<str>>(&mut self, name: &str, dim: &str, names: &[S]) -> Result<bool, Error> {
        let bytes = encode_fixed_width(names, LEN_STRING_VALUE);
        self.variable(name, &[dim, LEN_STRING], DataVector::U8(bytes))
    }

    /// `0..count` as int32 ids
    fn ids(&mut self, name: &str, dim: &str, count: usize) -> Result<bool, Error> {
        let ids = (0..count as i32).collect::<Vec<_>>();
        self.variable(name, &[dim], DataVector::I32(ids))
    }

    fn attribute(&mut self, variable: &str, name: &str, value: &str) -> Result<(), Error> {
        self.out
            .ds
            .add_var_attr_string(variable, name, value)
            .map_err(|e| container(variable, e))?;
        Ok(())
    }
}

fn title() -> String {
    format!(
        "Created by meshport v{}, {}",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f")
    )
}

/// lay out `mesh` as an Exodus II dataset
pub(super) fn to_layout(mesh: &Mesh, options: &ExodusOptions) -> Result<Layout, Error> {
    let shape = mesh.points.shape();
    if shape.len() != 2 || shape[1] != 3 {
        return Err(InvalidMesh::new(format!("points have shape {shape:?}, expected N x 3")).into());
    }
    mesh.check_cell_blocks()?;

    // fail on an unknown cell type before anything is built
    let elem_types = mesh
        .cells
        .keys()
        .map(|cell_type| element::to_disk(*cell_type))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Builder { out: Layout::new() };

    let title = options.title.clone().unwrap_or_else(title);
    let global = |e| container("global attributes", e);
    let ds = &mut out.out.ds;
    ds.add_global_attr_string("title", &title).map_err(global)?;
    ds.add_global_attr_f32("version", vec![EXODUS_VERSION]).map_err(global)?;
    ds.add_global_attr_f32("api_version", vec![EXODUS_VERSION]).map_err(global)?;
    ds.add_global_attr_i32("floating_point_word_size", vec![8]).map_err(global)?;

    let num_nodes = mesh.num_points();
    out.dimension(NUM_NODES, num_nodes)?;
    out.dimension(NUM_DIM, 3)?;
    out.dimension(NUM_ELEM, mesh.num_cells())?;
    out.dimension(NUM_EL_BLK, mesh.cells.len())?;
    out.dimension(NUM_NODE_SETS, mesh.node_sets.len())?;
    out.dimension(NUM_SIDE_SETS, mesh.side_sets.len())?;
    out.dimension(LEN_STRING, LEN_STRING_VALUE)?;
    out.dimension(LEN_LINE, LEN_LINE_VALUE)?;
    out.dimension(FOUR, 4)?;
    out.out
        .ds
        .set_unlimited_dim(TIME_STEP, 1)
        .map_err(|e| container(TIME_STEP, e))?;

    // a single time step at t = 0
    out.variable(TIME_WHOLE, &[TIME_STEP], DataVector::F32(vec![0.0]))?;

    out.names(COOR_NAMES, NUM_DIM, &["X", "Y", "Z"])?;
    out.array(COORD, &[NUM_DIM, NUM_NODES], &mesh.points.transpose())?;

    // element blocks
    out.ids(EB_PROP1, NUM_EL_BLK, mesh.cells.len())?;
    for (k, ((cell_type, block), elem_type)) in mesh.cells.iter().zip(&elem_types).enumerate() {
        let k = k + 1;
        let num_el_in_blk = format!("num_el_in_blk{k}");
        let num_nod_per_el = format!("num_nod_per_el{k}");
        let connect = format!("connect{k}");
        log::trace!("block {k}: {} `{cell_type}` cells as {elem_type}", block.len());

        out.dimension(&num_el_in_blk, block.len())?;
        out.dimension(&num_nod_per_el, cell_type.num_nodes())?;
        let on_disk = block.offset(1, &connect)?;
        if out.array(&connect, &[num_el_in_blk.as_str(), num_nod_per_el.as_str()], &on_disk)? {
            out.attribute(&connect, ELEM_TYPE, elem_type)?;
        }
    }

    // nodal variables, all stored with the dtype of the first one
    if let Some(first) = mesh.point_data.values().next() {
        let names: Vec<&str> = mesh.point_data.keys().map(String::as_str).collect();
        out.dimension(NUM_NOD_VAR, names.len())?;
        out.names(NAME_NOD_VAR, NUM_NOD_VAR, &names)?;

        let fields: Vec<&DataArray> = mesh.point_data.values().collect();
        let stacked = DataArray::stack(&fields, first.dtype())?;
        out.array(VALS_NOD_VAR, &[TIME_STEP, NUM_NOD_VAR, NUM_NODES], &stacked)?;
    }

    // node sets
    if !mesh.node_sets.is_empty() {
        let names: Vec<&str> = mesh.node_sets.keys().map(String::as_str).collect();
        out.ids(NS_PROP1, NUM_NODE_SETS, names.len())?;
        out.names(NS_NAMES, NUM_NODE_SETS, &names)?;

        for (k, nodes) in mesh.node_sets.values().enumerate() {
            let k = k + 1;
            let num_nod_ns = format!("num_nod_ns{k}");
            let node_ns = format!("node_ns{k}");
            out.dimension(&num_nod_ns, nodes.len())?;
            out.array(&node_ns, &[num_nod_ns.as_str()], &nodes.offset(1, &node_ns)?)?;
        }
    }

    // side sets
    if !mesh.side_sets.is_empty() {
        let names: Vec<&str> = mesh.side_sets.keys().map(String::as_str).collect();
        out.ids(SS_PROP1, NUM_SIDE_SETS, names.len())?;
        out.names(SS_NAMES, NUM_SIDE_SETS, &names)?;

        for (k, (name, sides)) in mesh.side_sets.iter().enumerate() {
            let k = k + 1;
            let shape = sides.shape();
            if shape.len() != 2 || shape[1] != 2 {
                return Err(InvalidMesh::new(format!(
                    "side set `{name}` has shape {shape:?}, expected M x 2"
                ))
                .into());
            }
            let num_side_ss = format!("num_side_ss{k}");
            let elem_ss = format!("elem_ss{k}");
            let side_ss = format!("side_ss{k}");
            out.dimension(&num_side_ss, sides.len())?;
            out.array(&elem_ss, &[num_side_ss.as_str()], &sides.column(0).offset(1, &elem_ss)?)?;
            out.array(&side_ss, &[num_side_ss.as_str()], &sides.column(1))?;
        }
    }

    Ok(out.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_type::CellType;
    use crate::mesh::CellBlocks;
    use ndarray::arr2;

    fn quad() -> Mesh {
        Mesh::new(
            arr2(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]),
            CellBlocks::new(),
        )
        .with_cells(CellType::Quad, arr2(&[[0i32, 1, 2, 3]]))
    }

    fn ints(layout: &Layout, name: &str) -> Vec<i32> {
        match layout.values(name) {
            Some(DataVector::I32(v)) => v.clone(),
            other => panic!("`{name}` holds {other:?}"),
        }
    }

    #[test]
    fn layout() {
        let layout = to_layout(&quad(), &ExodusOptions::default()).unwrap();
        let ds = &layout.ds;

        assert_eq!(ds.dim_size(NUM_NODES), Some(4));
        assert_eq!(ds.dim_size(NUM_ELEM), Some(1));
        assert_eq!(ds.dim_size(LEN_STRING), Some(33));
        assert_eq!(ds.dim_size(TIME_STEP), Some(1));
        // no sets, so the set dimensions are left out
        assert_eq!(ds.dim_size(NUM_NODE_SETS), None);
        assert!(ds.get_var(NS_PROP1).is_none());
        assert!(layout.values(NS_PROP1).is_none());

        assert_eq!(ints(&layout, "connect1"), vec![1, 2, 3, 4]);
        assert_eq!(
            ds.get_var_attr_as_string("connect1", ELEM_TYPE),
            Some("QUAD4".to_string())
        );

        let coord = ds.get_var(COORD).unwrap();
        assert_eq!(shape(ds, coord), vec![3, 4]);
        match layout.values(COORD) {
            Some(DataVector::F64(v)) => assert_eq!(
                v,
                &vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]
            ),
            other => panic!("unexpected coordinates {other:?}"),
        }

        let title = ds.get_global_attr_as_string("title").unwrap();
        assert!(title.starts_with("Created by meshport v"));
    }

    #[test]
    fn title_override() {
        let options = ExodusOptions::default().with_title("box");
        let layout = to_layout(&quad(), &options).unwrap();
        assert_eq!(
            layout.ds.get_global_attr_as_string("title"),
            Some("box".to_string())
        );
    }

    #[test]
    fn point_data_takes_first_dtype() {
        let mesh = quad()
            .with_point_data("a", vec![1i32, 2, 3, 4])
            .with_point_data("b", vec![0.5f64, 1.5, 2.5, 3.5]);
        let layout = to_layout(&mesh, &ExodusOptions::default()).unwrap();

        let vals = layout.ds.get_var(VALS_NOD_VAR).unwrap();
        assert_eq!(shape(&layout.ds, vals), vec![1, 2, 4]);
        assert_eq!(ints(&layout, VALS_NOD_VAR), vec![1, 2, 3, 4, 0, 1, 2, 3]);
    }

    #[test]
    fn wide_indices_are_stored_as_int32() {
        let mesh = quad().with_cells(CellType::Quad, arr2(&[[0u64, 1, 2, 3]]));
        let layout = to_layout(&mesh, &ExodusOptions::default()).unwrap();
        assert_eq!(ints(&layout, "connect1"), vec![1, 2, 3, 4]);

        let mesh = quad().with_cells(CellType::Quad, arr2(&[[0i64, 1, 2, 1 << 40]]));
        match to_layout(&mesh, &ExodusOptions::default()) {
            Err(Error::UnsupportedDtype(e)) => {
                assert_eq!(e.variable, "connect1");
                assert_eq!(e.dtype, "int64");
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("an index past the int32 range was accepted"),
        }
    }

    #[test]
    fn unwritable_cell_type() {
        let mesh = quad().with_cells(CellType::Vertex, arr2(&[[0i32]]));
        assert!(matches!(
            to_layout(&mesh, &ExodusOptions::default()),
            Err(Error::UnknownElementType(_))
        ));
    }

    #[test]
    fn side_sets_split_columns() {
        let mesh = quad().with_side_set("left", arr2(&[[0i32, 4], [0, 1]]));
        let layout = to_layout(&mesh, &ExodusOptions::default()).unwrap();
        assert_eq!(ints(&layout, "elem_ss1"), vec![1, 1]);
        assert_eq!(ints(&layout, "side_ss1"), vec![4, 1]);
        match layout.values(SS_NAMES) {
            Some(DataVector::U8(bytes)) => assert_eq!(bytes.len(), 33),
            other => panic!("unexpected names {other:?}"),
        }
    }
}
