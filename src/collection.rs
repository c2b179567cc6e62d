//! Ordered collections of variables over one shared dimension set
//!
//! A [`VariableSet`] pairs an ordered list of bound variables with an
//! index-aligned list of caller grids, e.g. the x-velocity, y-velocity
//! and flag-mask components of a field living on the same grid. Every
//! member shares one [`DimensionSet`], and frame transfers preserve the
//! pairing order.
//!
//! Collection transfers are not atomic: a failure partway through
//! `declare` or `put_frame` leaves earlier members declared or written.
//! A caller seeing such an error must treat the frame as inconsistent
//! until every member has been rewritten or verified.

use ndarray::{ArrayD, IxDyn};
use netcdf::types::NcTypeDescriptor;
use netcdf::{File, FileMut};
use tracing::debug;

use crate::dimension::DimensionSet;
use crate::error::{Error, Result};
use crate::variable::{Frame, FrameVariable};

/// An ordered list of variables sharing one dimension set
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    vars: Vec<FrameVariable>,
}

impl VariableSet {
    /// Declare one variable per name/unit pair, in order.
    ///
    /// The grids must be non-empty and `names` must pair up with `units`;
    /// both are checked before anything is declared. Collection members
    /// are assumed shape-homogeneous, so the shape check runs once
    /// against the first grid. On a declaration failure the variables
    /// already declared are left intact.
    pub fn declare<T: NcTypeDescriptor>(
        file: &mut FileMut,
        dims: &DimensionSet,
        grids: &[ArrayD<T>],
        names: &[&str],
        units: &[&str],
    ) -> Result<Self> {
        let Some(first) = grids.first() else {
            return Err(Error::DimensionMismatch {
                axis: None,
                expected: 1,
                found: 0,
            });
        };
        if names.len() != units.len() {
            return Err(Error::DimensionMismatch {
                axis: None,
                expected: names.len(),
                found: units.len(),
            });
        }
        dims.check_shape(first)?;
        debug!(?names, "declaring variable collection");
        let mut vars = Vec::with_capacity(names.len());
        for (&name, &unit) in names.iter().zip(units) {
            vars.push(FrameVariable::declare::<T>(file, dims, name, unit)?);
        }
        Ok(Self { vars })
    }

    /// Look up each named variable, allocating the grid collection to the
    /// logical shape when it is currently empty.
    pub fn resolve<T>(
        file: &File,
        dims: &DimensionSet,
        names: &[&str],
        grids: &mut Vec<ArrayD<T>>,
    ) -> Result<Self>
    where
        T: NcTypeDescriptor + Copy + Default,
    {
        if grids.is_empty() {
            let shape = IxDyn(&dims.logical_shape());
            grids.extend((0..names.len()).map(|_| ArrayD::from_elem(shape.clone(), T::default())));
        }
        debug!(?names, "resolving variable collection");
        let mut vars = Vec::with_capacity(names.len());
        for &name in names {
            vars.push(FrameVariable::resolve(file, name)?);
        }
        Ok(Self { vars })
    }

    /// Write every grid to its paired variable at the same frame.
    ///
    /// [`Frame::Append`] is resolved once, against the shared dimension
    /// set, so all members land on the same frame index. Members already
    /// written stay written if a later member fails.
    pub fn put_frame<T>(
        &self,
        file: &mut FileMut,
        dims: &DimensionSet,
        grids: &[ArrayD<T>],
        frame: Frame,
    ) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        self.check_pairing(grids.len())?;
        let index = match frame {
            Frame::At(index) => index,
            Frame::Append => dims.frame_count(file)?,
        };
        for (var, grid) in self.vars.iter().zip(grids) {
            var.put_frame(file, dims, grid, Frame::At(index))?;
        }
        Ok(())
    }

    /// Read the frame at `index` into every paired grid
    pub fn get_frame<T>(
        &self,
        file: &File,
        dims: &DimensionSet,
        grids: &mut [ArrayD<T>],
        index: usize,
    ) -> Result<()>
    where
        T: NcTypeDescriptor + Copy,
    {
        self.check_pairing(grids.len())?;
        for (var, grid) in self.vars.iter().zip(grids) {
            var.get_frame(file, dims, grid, index)?;
        }
        Ok(())
    }

    fn check_pairing(&self, grids: usize) -> Result<()> {
        if grids != self.vars.len() {
            return Err(Error::DimensionMismatch {
                axis: None,
                expected: self.vars.len(),
                found: grids,
            });
        }
        Ok(())
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether any variables are bound
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The bound variables, in declaration order
    pub fn variables(&self) -> &[FrameVariable] {
        &self.vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_rejects_any_grids() {
        let set = VariableSet::default();
        assert!(set.is_empty());
        assert!(set.check_pairing(0).is_ok());
        assert!(matches!(
            set.check_pairing(2),
            Err(Error::DimensionMismatch {
                axis: None,
                expected: 0,
                found: 2,
            })
        ));
    }
}
