//! Dtype-tagged numeric arrays
//!
//! Mesh files store connectivity, coordinates and field values with whatever
//! numeric type the producer chose. [`DataArray`] keeps that type around so a
//! mesh can be written back out with the dtype it was read with.

use crate::error::{IndexOverflow, UnsupportedDtype};
use crate::Error;

use ndarray::{ArrayD, Axis, IxDyn};
use netcdf3::DataVector;
use num_traits::AsPrimitive;
use std::fmt;

/// the closed set of element types a [`DataArray`] can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl Dtype {
    pub fn name(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// numeric types that can live inside a [`DataArray`]
pub trait Element: Copy + PartialEq + fmt::Debug + Default + 'static {
    const DTYPE: Dtype;

    fn wrap(array: ArrayD<Self>) -> DataArray;

    fn checked_offset(self, delta: i8) -> Option<Self>;
}

macro_rules! int_element {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Element for $ty {
                const DTYPE: Dtype = Dtype::$variant;

                fn wrap(array: ArrayD<Self>) -> DataArray {
                    DataArray::$variant(array)
                }

                fn checked_offset(self, delta: i8) -> Option<Self> {
                    if delta >= 0 {
                        self.checked_add(delta as $ty)
                    } else {
                        self.checked_sub(delta.unsigned_abs() as $ty)
                    }
                }
            }
        )*
    };
}

macro_rules! float_element {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Element for $ty {
                const DTYPE: Dtype = Dtype::$variant;

                fn wrap(array: ArrayD<Self>) -> DataArray {
                    DataArray::$variant(array)
                }

                fn checked_offset(self, delta: i8) -> Option<Self> {
                    Some(self + delta as $ty)
                }
            }
        )*
    };
}

int_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64
);
float_element!(f32 => Float32, f64 => Float64);

/// an n-dimensional array whose element type is only known at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum DataArray {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Int8(ArrayD<i8>),
    Int16(ArrayD<i16>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    UInt16(ArrayD<u16>),
    UInt32(ArrayD<u32>),
    UInt64(ArrayD<u64>),
}

/// run `$body` against whichever array is inside `$value`
macro_rules! dispatch {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            DataArray::Float32($arr) => $body,
            DataArray::Float64($arr) => $body,
            DataArray::Int8($arr) => $body,
            DataArray::Int16($arr) => $body,
            DataArray::Int32($arr) => $body,
            DataArray::Int64($arr) => $body,
            DataArray::UInt8($arr) => $body,
            DataArray::UInt16($arr) => $body,
            DataArray::UInt32($arr) => $body,
            DataArray::UInt64($arr) => $body,
        }
    };
}

/// like `dispatch!`, but wraps the resulting array back into the same variant
macro_rules! rewrap {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            DataArray::Float32($arr) => DataArray::Float32($body),
            DataArray::Float64($arr) => DataArray::Float64($body),
            DataArray::Int8($arr) => DataArray::Int8($body),
            DataArray::Int16($arr) => DataArray::Int16($body),
            DataArray::Int32($arr) => DataArray::Int32($body),
            DataArray::Int64($arr) => DataArray::Int64($body),
            DataArray::UInt8($arr) => DataArray::UInt8($body),
            DataArray::UInt16($arr) => DataArray::UInt16($body),
            DataArray::UInt32($arr) => DataArray::UInt32($body),
            DataArray::UInt64($arr) => DataArray::UInt64($body),
        }
    };
}

impl Default for DataArray {
    /// zero points in three dimensions
    fn default() -> Self {
        Self::Float64(ArrayD::zeros(IxDyn(&[0, 3])))
    }
}

impl DataArray {
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::Float32(_) => Dtype::Float32,
            Self::Float64(_) => Dtype::Float64,
            Self::Int8(_) => Dtype::Int8,
            Self::Int16(_) => Dtype::Int16,
            Self::Int32(_) => Dtype::Int32,
            Self::Int64(_) => Dtype::Int64,
            Self::UInt8(_) => Dtype::UInt8,
            Self::UInt16(_) => Dtype::UInt16,
            Self::UInt32(_) => Dtype::UInt32,
            Self::UInt64(_) => Dtype::UInt64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// extent of the first axis (rows for a 2D array)
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// borrow the inner array if it holds elements of type `T`
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        macro_rules! pick {
            ($a:expr) => {
                (&*$a as &dyn std::any::Any).downcast_ref::<ArrayD<T>>()
            };
        }
        dispatch!(self, a => pick!(a))
    }

    /// convert every element to `U` with `as` semantics
    ///
    /// narrowing conversions truncate or lose precision silently
    pub fn to_array<U>(&self) -> ArrayD<U>
    where
        U: Element,
        f32: AsPrimitive<U>,
        f64: AsPrimitive<U>,
        i8: AsPrimitive<U>,
        i16: AsPrimitive<U>,
        i32: AsPrimitive<U>,
        i64: AsPrimitive<U>,
        u8: AsPrimitive<U>,
        u16: AsPrimitive<U>,
        u32: AsPrimitive<U>,
        u64: AsPrimitive<U>,
    {
        dispatch!(self, a => a.mapv(|v| v.as_()))
    }

    /// this array converted to another dtype with `as` semantics
    pub fn cast(&self, dtype: Dtype) -> DataArray {
        if dtype == self.dtype() {
            return self.clone();
        }
        match dtype {
            Dtype::Float32 => f32::wrap(self.to_array()),
            Dtype::Float64 => f64::wrap(self.to_array()),
            Dtype::Int8 => i8::wrap(self.to_array()),
            Dtype::Int16 => i16::wrap(self.to_array()),
            Dtype::Int32 => i32::wrap(self.to_array()),
            Dtype::Int64 => i64::wrap(self.to_array()),
            Dtype::UInt8 => u8::wrap(self.to_array()),
            Dtype::UInt16 => u16::wrap(self.to_array()),
            Dtype::UInt32 => u32::wrap(self.to_array()),
            Dtype::UInt64 => u64::wrap(self.to_array()),
        }
    }

    /// reverse the axes (the matrix transpose for 2D data)
    pub fn transpose(&self) -> DataArray {
        rewrap!(self, a => a.t().as_standard_layout().into_owned())
    }

    /// the sub-array at `index` along the first axis
    pub fn index_first(&self, index: usize) -> DataArray {
        rewrap!(self, a => a.index_axis(Axis(0), index).to_owned())
    }

    /// the sub-array at `index` along the second axis (a column for 2D data)
    pub fn column(&self, index: usize) -> DataArray {
        rewrap!(self, a => a.index_axis(Axis(1), index).to_owned())
    }

    /// add `delta` to every element, failing instead of wrapping around
    ///
    /// `name` identifies the array in the error
    pub fn offset(&self, delta: i8, name: &str) -> Result<DataArray, Error> {
        fn shift<T: Element>(a: &ArrayD<T>, delta: i8, name: &str) -> Result<ArrayD<T>, Error> {
            let values = a
                .iter()
                .map(|v| v.checked_offset(delta))
                .collect::<Option<Vec<T>>>()
                .ok_or_else(|| IndexOverflow::new(name.to_string(), delta))?;
            Ok(ArrayD::from_shape_vec(a.raw_dim(), values)?)
        }

        Ok(rewrap!(self, a => shift(a, delta, name)?))
    }

    /// stack `other` below this array along the first axis
    ///
    /// `other` is converted to this array's dtype first
    pub fn vstack(&self, other: &DataArray) -> Result<DataArray, Error> {
        let other = other.cast(self.dtype());
        macro_rules! stack {
            ($a:expr, $b:expr) => {
                ndarray::concatenate(Axis(0), &[$a.view(), $b.view()])?
            };
        }
        let stacked = match (self, &other) {
            (Self::Float32(a), Self::Float32(b)) => Self::Float32(stack!(a, b)),
            (Self::Float64(a), Self::Float64(b)) => Self::Float64(stack!(a, b)),
            (Self::Int8(a), Self::Int8(b)) => Self::Int8(stack!(a, b)),
            (Self::Int16(a), Self::Int16(b)) => Self::Int16(stack!(a, b)),
            (Self::Int32(a), Self::Int32(b)) => Self::Int32(stack!(a, b)),
            (Self::Int64(a), Self::Int64(b)) => Self::Int64(stack!(a, b)),
            (Self::UInt8(a), Self::UInt8(b)) => Self::UInt8(stack!(a, b)),
            (Self::UInt16(a), Self::UInt16(b)) => Self::UInt16(stack!(a, b)),
            (Self::UInt32(a), Self::UInt32(b)) => Self::UInt32(stack!(a, b)),
            (Self::UInt64(a), Self::UInt64(b)) => Self::UInt64(stack!(a, b)),
            _ => unreachable!("cast produced a different dtype"),
        };
        Ok(stacked)
    }

    /// join equally shaped arrays along a new leading axis, storing them as `dtype`
    pub fn stack(arrays: &[&DataArray], dtype: Dtype) -> Result<DataArray, Error> {
        fn stack_as<T: Element>(arrays: &[DataArray]) -> Result<ArrayD<T>, Error> {
            let views = arrays
                .iter()
                .filter_map(|a| a.as_array::<T>())
                .map(|a| a.view())
                .collect::<Vec<_>>();
            Ok(ndarray::stack(Axis(0), &views)?)
        }

        let cast: Vec<DataArray> = arrays.iter().map(|a| a.cast(dtype)).collect();
        let stacked = match dtype {
            Dtype::Float32 => f32::wrap(stack_as(&cast)?),
            Dtype::Float64 => f64::wrap(stack_as(&cast)?),
            Dtype::Int8 => i8::wrap(stack_as(&cast)?),
            Dtype::Int16 => i16::wrap(stack_as(&cast)?),
            Dtype::Int32 => i32::wrap(stack_as(&cast)?),
            Dtype::Int64 => i64::wrap(stack_as(&cast)?),
            Dtype::UInt8 => u8::wrap(stack_as(&cast)?),
            Dtype::UInt16 => u16::wrap(stack_as(&cast)?),
            Dtype::UInt32 => u32::wrap(stack_as(&cast)?),
            Dtype::UInt64 => u64::wrap(stack_as(&cast)?),
        };
        Ok(stacked)
    }

    /// the elements in logical row-major order as netCDF classic values
    ///
    /// uint8 and uint16 widen to the next signed type; int64, uint32 and
    /// uint64 are stored as int32 and fail with [`UnsupportedDtype`] when a
    /// value does not fit. `name` identifies the variable in the error.
    pub(crate) fn to_data_vector(&self, name: &str) -> Result<DataVector, Error> {
        fn narrow<T: Copy + TryInto<i32>>(
            a: &ArrayD<T>,
            dtype: Dtype,
            name: &str,
        ) -> Result<Vec<i32>, Error> {
            a.iter()
                .map(|v| (*v).try_into().ok())
                .collect::<Option<Vec<i32>>>()
                .ok_or_else(|| UnsupportedDtype::new(name.to_string(), dtype.name()).into())
        }

        let values = match self {
            Self::Float32(a) => DataVector::F32(a.iter().copied().collect()),
            Self::Float64(a) => DataVector::F64(a.iter().copied().collect()),
            Self::Int8(a) => DataVector::I8(a.iter().copied().collect()),
            Self::Int16(a) => DataVector::I16(a.iter().copied().collect()),
            Self::Int32(a) => DataVector::I32(a.iter().copied().collect()),
            Self::UInt8(a) => DataVector::I16(a.iter().map(|v| i16::from(*v)).collect()),
            Self::UInt16(a) => DataVector::I32(a.iter().map(|v| i32::from(*v)).collect()),
            Self::Int64(a) => DataVector::I32(narrow(a, self.dtype(), name)?),
            Self::UInt32(a) => DataVector::I32(narrow(a, self.dtype(), name)?),
            Self::UInt64(a) => DataVector::I32(narrow(a, self.dtype(), name)?),
        };
        Ok(values)
    }

    /// build an array of `shape` from the values of a netCDF variable
    ///
    /// `name` identifies the variable if it holds characters
    pub(crate) fn from_data_vector(
        values: DataVector,
        shape: &[usize],
        name: &str,
    ) -> Result<Self, Error> {
        let shape = IxDyn(shape);
        let array = match values {
            DataVector::I8(v) => Self::Int8(ArrayD::from_shape_vec(shape, v)?),
            DataVector::I16(v) => Self::Int16(ArrayD::from_shape_vec(shape, v)?),
            DataVector::I32(v) => Self::Int32(ArrayD::from_shape_vec(shape, v)?),
            DataVector::F32(v) => Self::Float32(ArrayD::from_shape_vec(shape, v)?),
            DataVector::F64(v) => Self::Float64(ArrayD::from_shape_vec(shape, v)?),
            DataVector::U8(_) => {
                return Err(UnsupportedDtype::new(name.to_string(), CHAR).into())
            }
        };
        Ok(array)
    }
}

/// the name netCDF character data is reported under
pub(crate) const CHAR: &str = "char";

/// the type name of stored values, as used in errors
pub(crate) fn stored_type_name(values: &DataVector) -> &'static str {
    match values {
        DataVector::I8(_) => Dtype::Int8.name(),
        DataVector::U8(_) => CHAR,
        DataVector::I16(_) => Dtype::Int16.name(),
        DataVector::I32(_) => Dtype::Int32.name(),
        DataVector::F32(_) => Dtype::Float32.name(),
        DataVector::F64(_) => Dtype::Float64.name(),
    }
}

macro_rules! from_ndarray {
    ($($ty:ty),*) => {
        $(
            impl<D: ndarray::Dimension> From<ndarray::Array<$ty, D>> for DataArray {
                fn from(x: ndarray::Array<$ty, D>) -> Self {
                    <$ty as Element>::wrap(x.into_dyn())
                }
            }

            impl From<Vec<$ty>> for DataArray {
                fn from(x: Vec<$ty>) -> Self {
                    <$ty as Element>::wrap(ndarray::Array1::from(x).into_dyn())
                }
            }
        )*
    };
}

from_ndarray!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);
