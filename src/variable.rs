//! Variable binding and single-grid frame transfer
//!
//! A [`FrameVariable`] names an array stored in the file and carries the
//! marshalling between the caller's logical (x, y, z, channel) grid and
//! the variable's on-disk layout. Axis-order reversal happens here and
//! only here: variables store the unlimited axis first and the fixed axes
//! in reverse declaration order, so the last-listed dimension (logical x)
//! varies fastest on disk.

use ndarray::{ArrayD, IxDyn};
use netcdf::{Extent, Extents};
use netcdf::types::NcTypeDescriptor;
use netcdf::{File, FileMut, VariableMut};
use tracing::{debug, trace};

use crate::dimension::DimensionSet;
use crate::error::{Error, Result};
use crate::grid::GridShape;

/// Position of a frame along the unlimited axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// One past the last frame currently in the file: every write
    /// extends the file by one frame
    Append,
    /// An explicit frame index, permitting overwrite of an existing frame
    At(usize),
}

/// A named variable bound to a [`DimensionSet`].
///
/// The binding is by name; the engine handle is re-resolved on every
/// transfer, so bindings stay valid for the whole file session without
/// borrowing the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameVariable {
    name: String,
}

impl FrameVariable {
    /// Create a new variable over the dimension set, storing the
    /// unlimited axis first and the fixed axes in reverse declaration
    /// order, and attach its `units` string attribute.
    pub fn declare<T: NcTypeDescriptor>(
        file: &mut FileMut,
        dims: &DimensionSet,
        name: &str,
        units: &str,
    ) -> Result<Self> {
        Self::add::<T>(file, dims, name, units, true)
    }

    /// Create a variable addressed purely by its fixed axes, with no
    /// frame axis.
    pub fn declare_without_record<T: NcTypeDescriptor>(
        file: &mut FileMut,
        dims: &DimensionSet,
        name: &str,
        units: &str,
    ) -> Result<Self> {
        Self::add::<T>(file, dims, name, units, false)
    }

    /// Shape-checked declaration: the grid is validated against the
    /// dimension set before anything is written to the file.
    pub fn declare_for<T: NcTypeDescriptor, S: GridShape>(
        file: &mut FileMut,
        dims: &DimensionSet,
        name: &str,
        units: &str,
        grid: &S,
    ) -> Result<Self> {
        dims.check_shape(grid)?;
        Self::declare::<T>(file, dims, name, units)
    }

    fn add<T: NcTypeDescriptor>(
        file: &mut FileMut,
        dims: &DimensionSet,
        name: &str,
        units: &str,
        with_record: bool,
    ) -> Result<Self> {
        if dims.rank() == 0 {
            return Err(Error::DimensionMismatch {
                axis: None,
                expected: 1,
                found: 0,
            });
        }
        let order = dims.storage_dim_names(with_record)?;
        debug!(variable = name, ?order, "declaring variable");
        let mut var = file.add_variable::<T>(name, &order)?;
        var.put_attribute("units", units)?;
        Ok(Self {
            name: name.to_owned(),
        })
    }

    /// Look up an existing variable by name
    pub fn resolve(file: &File, name: &str) -> Result<Self> {
        if file.variable(name).is_none() {
            return Err(Error::NotFound(name.to_owned()));
        }
        debug!(variable = name, "resolved variable");
        Ok(Self {
            name: name.to_owned(),
        })
    }

    /// Look up an existing variable and, when the caller's grid is
    /// unallocated, allocate it to the logical (x, y, z, channel) shape
    /// of the dimension set — the declaration order, not the on-disk
    /// storage order.
    pub fn resolve_into<T>(
        file: &File,
        dims: &DimensionSet,
        name: &str,
        grid: &mut ArrayD<T>,
    ) -> Result<Self>
    where
        T: NcTypeDescriptor + Copy + Default,
    {
        let var = Self::resolve(file, name)?;
        if grid.is_unallocated() {
            *grid = ArrayD::from_elem(IxDyn(&dims.logical_shape()), T::default());
        }
        Ok(var)
    }

    /// Name of the bound variable
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one frame of the grid at the given position.
    ///
    /// The grid's shape is validated against the dimension set before any
    /// I/O happens. [`Frame::Append`] resolves to the unlimited axis's
    /// current size, so consecutive appends populate frames `0..k`.
    pub fn put_frame<T>(
        &self,
        file: &mut FileMut,
        dims: &DimensionSet,
        grid: &ArrayD<T>,
        frame: Frame,
    ) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        dims.check_shape(grid)?;
        let index = match frame {
            Frame::At(index) => index,
            Frame::Append => dims.frame_count(file)?,
        };
        trace!(variable = %self.name, frame = index, "writing frame");
        let buffer = storage_order_buffer(grid);
        let extents = frame_extents(dims, index);
        self.bind_mut(file)?.put_values(&buffer, extents)?;
        Ok(())
    }

    /// Read the frame at `index` into the grid.
    ///
    /// When the grid already has the logical shape its storage is reused
    /// in place; otherwise it is reallocated. The frame index must lie in
    /// `0..frame_count()`; out-of-range reads surface as the engine's own
    /// bounds error.
    pub fn get_frame<T>(
        &self,
        file: &File,
        dims: &DimensionSet,
        grid: &mut ArrayD<T>,
        index: usize,
    ) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        trace!(variable = %self.name, frame = index, "reading frame");
        let values = self
            .bind(file)?
            .get_values::<T, _>(frame_extents(dims, index))?;
        unmarshal(dims, grid, values)
    }

    /// Write the whole variable, addressing it as if it had no frame axis
    pub fn put_all<T>(&self, file: &mut FileMut, dims: &DimensionSet, grid: &ArrayD<T>) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        dims.check_shape(grid)?;
        trace!(variable = %self.name, "writing without frame axis");
        let buffer = storage_order_buffer(grid);
        let extents = fixed_extents(dims);
        self.bind_mut(file)?.put_values(&buffer, extents)?;
        Ok(())
    }

    /// Read the whole variable, addressing it as if it had no frame axis
    pub fn get_all<T>(&self, file: &File, dims: &DimensionSet, grid: &mut ArrayD<T>) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        trace!(variable = %self.name, "reading without frame axis");
        let values = self.bind(file)?.get_values::<T, _>(fixed_extents(dims))?;
        unmarshal(dims, grid, values)
    }

    fn bind<'f>(&self, file: &'f File) -> Result<netcdf::Variable<'f>> {
        file.variable(&self.name)
            .ok_or_else(|| Error::NotFound(self.name.clone()))
    }

    fn bind_mut<'f>(&self, file: &'f mut FileMut) -> Result<VariableMut<'f>> {
        file.variable_mut(&self.name)
            .ok_or_else(|| Error::NotFound(self.name.clone()))
    }
}

/// Flatten the grid into the variable's storage order.
///
/// On disk the dimension list is reversed, so the logical x axis varies
/// fastest. Iterating the transposed view yields exactly that order
/// regardless of the grid's own memory layout.
fn storage_order_buffer<T: Copy>(grid: &ArrayD<T>) -> Vec<T> {
    grid.t().iter().copied().collect()
}

/// Rebuild the logical grid from a buffer in storage order, reusing the
/// caller's allocation when the shape already matches.
fn unmarshal<T: Copy>(dims: &DimensionSet, grid: &mut ArrayD<T>, values: Vec<T>) -> Result<()> {
    let shape = dims.logical_shape();
    let expected: usize = shape.iter().product();
    if values.len() != expected {
        return Err(Error::DimensionMismatch {
            axis: None,
            expected,
            found: values.len(),
        });
    }
    let mut storage_shape = shape.clone();
    storage_shape.reverse();
    let frame = ArrayD::from_shape_vec(IxDyn(&storage_shape), values)
        .expect("element count verified above")
        .reversed_axes();
    if grid.shape() == shape.as_slice() {
        grid.assign(&frame);
    } else {
        *grid = frame;
    }
    Ok(())
}

fn frame_extents(dims: &DimensionSet, frame: usize) -> Extents {
    let mut extents: Vec<Extent> = Vec::with_capacity(dims.rank() + 1);
    extents.push(frame.into());
    push_fixed_extents(&mut extents, dims);
    Extents::from(extents)
}

fn fixed_extents(dims: &DimensionSet) -> Extents {
    let mut extents: Vec<Extent> = Vec::with_capacity(dims.rank());
    push_fixed_extents(&mut extents, dims);
    Extents::from(extents)
}

fn push_fixed_extents(extents: &mut Vec<Extent>, dims: &DimensionSet) {
    for &size in dims.logical_shape().iter().rev() {
        extents.push((0..size).into());
    }
}
