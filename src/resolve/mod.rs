//! Output resolution and work-order building.
//!
//! # Modules
//!
//! - [`order`]: work-order value types (rasterizations, post-processing, conversions)
//! - [`policy`]: choices for sources without sizing or without any raster op
//! - [`builder`]: per-source resolution into a [`WorkOrder`]

mod builder;
pub mod order;
mod policy;

pub use builder::{Resolution, ResolveOptions, build};
pub use order::{Conversion, PostOp, Rasterization, WorkOrder};
pub use policy::{NoOpsPolicy, UnsizedPolicy};
