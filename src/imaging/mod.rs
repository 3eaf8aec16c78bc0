//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Bound-fit → JPEG** | Lanczos3 + `jpeg-encoder` (progressive) |
//! | **Cover crop → PNG/JPEG** | fill-resize + center `crop_imm` |
//! | **ICO** | `IcoEncoder` with PNG frames |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    calculate_bound_fit, calculate_center_crop_offset, calculate_fill_dimensions,
};
pub use operations::{BoundFitConfig, create_bound_fit, create_cover_crop, get_dimensions};
pub use params::{BoundFitParams, CoverCropParams, Encoding, IcoParams, Quality};
pub use rust_backend::RustBackend;
