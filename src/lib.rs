//! Frame-oriented `netCDF` persistence for multi-dimensional ndarray grids.
//!
//! This crate maps an in-memory [`ndarray::ArrayD`] with up to four logical
//! axes (x, y, z, channel) plus one growable frame axis (conventionally
//! time) onto the `netCDF` dimension/variable model, via the [`netcdf`]
//! crate. Variables store their fixed axes in reverse declaration order
//! with the unlimited axis first; the marshaller applies that reversal on
//! every transfer, so callers work purely in logical terms.
//!
//! # Examples
//!
//! Writing frames of a field to a new file:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ncframe::{DimensionSet, Frame, FrameVariable};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let mut file = ncframe::create("field.nc")?;
//!
//! let field = ArrayD::from_shape_vec(IxDyn(&[4, 3, 2]), (0..24).collect::<Vec<i32>>())?;
//!
//! // Fixed axes sized from the grid, plus the growable frame axis
//! let mut dims = DimensionSet::declare_for(&mut file, &["x", "y", "c"], &field)?;
//! dims.declare_record(&mut file, "t")?;
//!
//! let var = FrameVariable::declare::<i32>(&mut file, &dims, "field", "m/s")?;
//!
//! // Each append extends the file by one frame
//! var.put_frame(&mut file, &dims, &field, Frame::Append)?;
//! var.put_frame(&mut file, &dims, &field, Frame::Append)?;
//! assert_eq!(dims.frame_count(&file)?, 2);
//! # Ok(()) }
//! ```
//!
//! Reading a frame back, letting the resolver allocate the grid:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ncframe::{DimensionSet, FrameVariable};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let file = ncframe::open("field.nc")?;
//!
//! let mut dims = DimensionSet::resolve(&file, &["x", "y", "c"])?;
//! dims.resolve_record(&file, "t")?;
//!
//! let mut field = ArrayD::<i32>::zeros(IxDyn(&[0]));
//! let var = FrameVariable::resolve_into(&file, &dims, "field", &mut field)?;
//! var.get_frame(&file, &dims, &mut field, 1)?;
//! # Ok(()) }
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod collection;
pub mod dimension;
pub mod error;
pub mod grid;
pub mod variable;

pub use collection::VariableSet;
pub use dimension::{Axis, DimensionSet};
pub use error::{Error, Result};
pub use grid::GridShape;
pub use variable::{Frame, FrameVariable};

// File sessions are owned by the storage engine; its entry points are the
// crate's entry points.
pub use netcdf::{append, create, open, File, FileMut};
