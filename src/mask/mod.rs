//! Feasibility masks: filters composed into one predicate and broadcast over
//! the outer product of named grids.

mod builder;
mod cache;

pub use builder::{build_mask, FixedInputs, Mask, MaskBuilder, MaskOptions, FIXED_INPUT_PREFIX};
pub use cache::{plan_cache_len, reset_plan_cache};
