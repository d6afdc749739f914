//! Build execution
//!
//! This module holds the task registry, the built-in handlers, the plan types
//! and the build runner that executes a plan.

pub mod build;
pub mod context;
pub mod handlers;
pub mod registry;
pub mod task;

// Re-export main types
pub use build::*;
pub use context::*;
pub use registry::*;
pub use task::*;
