//! Request and response contract.
//!
//! - [`OptimizationRequest`]: wire-level input, validated into an [`Instance`]
//! - [`OptimizationResult`]: wire-level output, built by [`assemble`]

mod request;
mod result;

pub use request::{Instance, OptimizationRequest};
pub use result::{assemble, next_run_id, OptimizationResult};
