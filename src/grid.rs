//! Capability interface for the in-memory grid type

use ndarray::ArrayD;

use crate::dimension::Axis;

/// Logical shape reporting for an in-memory grid.
///
/// Axes follow the fixed x, y, z, channel convention. Axes beyond the
/// grid's own rank report an extent of 1, so a 2-D grid checks cleanly
/// against a two-axis [`DimensionSet`](crate::DimensionSet) without
/// special casing.
pub trait GridShape {
    /// Extent along one logical axis
    fn extent(&self, axis: Axis) -> usize;

    /// Total number of elements
    fn element_count(&self) -> usize;

    /// Whether the grid currently holds no storage
    fn is_unallocated(&self) -> bool {
        self.element_count() == 0
    }
}

impl<T> GridShape for ArrayD<T> {
    fn extent(&self, axis: Axis) -> usize {
        self.shape().get(axis.index()).copied().unwrap_or(1)
    }

    fn element_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn trailing_axes_report_one() {
        let grid = ArrayD::<f32>::zeros(IxDyn(&[4, 3]));
        assert_eq!(grid.extent(Axis::X), 4);
        assert_eq!(grid.extent(Axis::Y), 3);
        assert_eq!(grid.extent(Axis::Z), 1);
        assert_eq!(grid.extent(Axis::Channel), 1);
    }

    #[test]
    fn empty_grid_is_unallocated() {
        let grid = ArrayD::<i32>::zeros(IxDyn(&[0]));
        assert!(grid.is_unallocated());
        let grid = ArrayD::<i32>::zeros(IxDyn(&[2, 2]));
        assert!(!grid.is_unallocated());
    }
}
