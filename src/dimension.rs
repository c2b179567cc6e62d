//! Fixed and unlimited axis bookkeeping
//!
//! A [`DimensionSet`] records up to four fixed axes (width, height, depth,
//! channel count) and one growable axis, conventionally time. Fixed sizes
//! are captured once per file session, either by declaring new dimensions
//! in a freshly created file or by resolving existing ones; the unlimited
//! axis's current size is queried from the file on demand since every
//! appended frame grows it.

use netcdf::{File, FileMut};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::GridShape;

/// Logical position of a fixed axis.
///
/// The position is significant: axis 0 is always x/width, axis 3 always
/// the channel count. A dimension set of rank `n` uses the first `n`
/// positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width, the first declared axis
    X,
    /// Height
    Y,
    /// Depth
    Z,
    /// Channel count, the last declared axis
    Channel,
}

impl Axis {
    /// All fixed axes in declaration order
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::Channel];

    /// Position of this axis in declaration order
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::Channel => 3,
        }
    }

    pub(crate) fn at(index: usize) -> Option<Axis> {
        Self::ALL.get(index).copied()
    }
}

/// Ordered record of 1–4 fixed axes plus one optional unlimited axis.
///
/// The set is bound to one file session. Variables declared against it
/// store their dimensions in reverse declaration order (unlimited axis
/// first), which the frame marshaller mirrors on every transfer; callers
/// only ever see the logical (x, y, z, channel) order.
#[derive(Debug, Clone, Default)]
pub struct DimensionSet {
    fixed: Vec<(String, usize)>,
    record: Option<String>,
}

impl DimensionSet {
    /// Create fixed dimensions in a new file and record their handles.
    ///
    /// `names` and `sizes` pair up in logical axis order and must hold
    /// between one and four entries. Call at most once per file session
    /// in write mode.
    pub fn declare(file: &mut FileMut, names: &[&str], sizes: &[usize]) -> Result<Self> {
        if names.len() != sizes.len() {
            return Err(Error::DimensionMismatch {
                axis: None,
                expected: names.len(),
                found: sizes.len(),
            });
        }
        check_rank(names.len())?;
        debug!(?names, ?sizes, "declaring fixed dimensions");
        let mut fixed = Vec::with_capacity(names.len());
        for (&name, &size) in names.iter().zip(sizes) {
            file.add_dimension(name, size)?;
            fixed.push((name.to_owned(), size));
        }
        Ok(Self {
            fixed,
            record: None,
        })
    }

    /// Create fixed dimensions sized from an in-memory grid.
    pub fn declare_for<S: GridShape>(
        file: &mut FileMut,
        names: &[&str],
        grid: &S,
    ) -> Result<Self> {
        check_rank(names.len())?;
        let sizes: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(index, _)| {
                let axis = Axis::at(index).expect("rank checked above");
                grid.extent(axis)
            })
            .collect();
        Self::declare(file, names, &sizes)
    }

    /// Create the single growable axis.
    ///
    /// Fixed axes referenced by a variable must exist before that variable
    /// is declared, but fixed and unlimited declaration may happen in
    /// either order relative to each other.
    pub fn declare_record(&mut self, file: &mut FileMut, name: &str) -> Result<()> {
        debug!(name, "declaring unlimited dimension");
        file.add_unlimited_dimension(name)?;
        self.record = Some(name.to_owned());
        Ok(())
    }

    /// Look up fixed dimensions in an existing file, in the given order.
    pub fn resolve(file: &File, names: &[&str]) -> Result<Self> {
        check_rank(names.len())?;
        debug!(?names, "resolving fixed dimensions");
        let mut fixed = Vec::with_capacity(names.len());
        for &name in names {
            let dim = file
                .dimension(name)
                .ok_or_else(|| Error::NotFound(name.to_owned()))?;
            fixed.push((name.to_owned(), dim.len()));
        }
        Ok(Self {
            fixed,
            record: None,
        })
    }

    /// Look up the unlimited axis by name.
    pub fn resolve_record(&mut self, file: &File, name: &str) -> Result<()> {
        if file.dimension(name).is_none() {
            return Err(Error::NotFound(name.to_owned()));
        }
        self.record = Some(name.to_owned());
        Ok(())
    }

    /// Infer a dimension set from an existing variable.
    ///
    /// The variable's first on-disk dimension is taken as the unlimited
    /// axis when `with_record` is set; the remaining dimensions are read
    /// back into logical order by undoing the storage-order reversal.
    pub fn from_variable(file: &File, var_name: &str, with_record: bool) -> Result<Self> {
        let var = file
            .variable(var_name)
            .ok_or_else(|| Error::NotFound(var_name.to_owned()))?;
        let dims = var.dimensions();
        let record = if with_record {
            let first = dims.first().ok_or(Error::NotBound)?;
            Some(first.name())
        } else {
            None
        };
        let skip = usize::from(with_record);
        check_rank(dims.len() - skip)?;
        let fixed: Vec<(String, usize)> = dims[skip..]
            .iter()
            .rev()
            .map(|dim| (dim.name(), dim.len()))
            .collect();
        debug!(variable = var_name, ?fixed, ?record, "inferred dimensions");
        Ok(Self { fixed, record })
    }

    /// Size of the fixed axis at the given logical position
    pub fn size(&self, axis: Axis) -> Result<usize> {
        self.fixed
            .get(axis.index())
            .map(|&(_, size)| size)
            .ok_or(Error::Index(axis.index()))
    }

    /// Number of fixed axes
    pub fn rank(&self) -> usize {
        self.fixed.len()
    }

    /// Fixed axis names in logical order
    pub fn fixed_names(&self) -> impl Iterator<Item = &str> {
        self.fixed.iter().map(|(name, _)| name.as_str())
    }

    /// Name of the unlimited axis, if bound
    pub fn record_name(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Fixed sizes in logical (x, y, z, channel) order
    pub fn logical_shape(&self) -> Vec<usize> {
        self.fixed.iter().map(|&(_, size)| size).collect()
    }

    /// Current size of the unlimited axis, i.e. the number of frames
    /// written so far
    pub fn frame_count(&self, file: &File) -> Result<usize> {
        let name = self.record.as_deref().ok_or(Error::NotBound)?;
        let dim = file
            .dimension(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        Ok(dim.len())
    }

    /// Check every fixed axis against the grid's logical extent.
    ///
    /// Detects a mismatch before any I/O is attempted for the transfer.
    pub fn check_shape<S: GridShape + ?Sized>(&self, grid: &S) -> Result<()> {
        for (&axis, &(_, size)) in Axis::ALL.iter().zip(&self.fixed) {
            let found = grid.extent(axis);
            if found != size {
                return Err(Error::DimensionMismatch {
                    axis: Some(axis),
                    expected: size,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Dimension names in on-disk storage order: unlimited axis first,
    /// fixed axes reversed.
    pub(crate) fn storage_dim_names(&self, with_record: bool) -> Result<Vec<&str>> {
        let mut order = Vec::with_capacity(self.fixed.len() + 1);
        if with_record {
            order.push(self.record.as_deref().ok_or(Error::NotBound)?);
        }
        order.extend(self.fixed.iter().rev().map(|(name, _)| name.as_str()));
        Ok(order)
    }
}

fn check_rank(rank: usize) -> Result<()> {
    if rank == 0 || rank > Axis::ALL.len() {
        return Err(Error::DimensionMismatch {
            axis: None,
            expected: Axis::ALL.len(),
            found: rank,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn sample_set() -> DimensionSet {
        DimensionSet {
            fixed: vec![
                ("x".to_owned(), 4),
                ("y".to_owned(), 3),
                ("c".to_owned(), 2),
            ],
            record: Some("t".to_owned()),
        }
    }

    #[test]
    fn axis_positions_are_fixed() {
        for (index, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), index);
            assert_eq!(Axis::at(index), Some(*axis));
        }
        assert_eq!(Axis::at(4), None);
    }

    #[test]
    fn storage_order_reverses_fixed_axes() {
        let dims = sample_set();
        assert_eq!(dims.storage_dim_names(true).unwrap(), ["t", "c", "y", "x"]);
        assert_eq!(dims.storage_dim_names(false).unwrap(), ["c", "y", "x"]);
    }

    #[test]
    fn storage_order_requires_record_axis() {
        let dims = DimensionSet {
            record: None,
            ..sample_set()
        };
        assert!(matches!(
            dims.storage_dim_names(true),
            Err(Error::NotBound)
        ));
    }

    #[test]
    fn size_past_rank_is_an_index_error() {
        let dims = sample_set();
        assert_eq!(dims.size(Axis::Z).unwrap(), 2);
        assert!(matches!(dims.size(Axis::Channel), Err(Error::Index(3))));
    }

    #[test]
    fn shape_check_reports_first_mismatch() {
        let dims = sample_set();
        let good = ArrayD::<f64>::zeros(IxDyn(&[4, 3, 2]));
        assert!(dims.check_shape(&good).is_ok());

        let bad = ArrayD::<f64>::zeros(IxDyn(&[4, 5, 2]));
        match dims.check_shape(&bad) {
            Err(Error::DimensionMismatch {
                axis: Some(Axis::Y),
                expected: 3,
                found: 5,
            }) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
