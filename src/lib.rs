//! Ship - a small build-automation DSL
//!
//! Ship reads a declarative script describing a sequence of build steps,
//! resolves it into a flat plan and runs the steps in order, stopping at
//! the first failure.

// Public modules
pub mod cli;
pub mod error;
pub mod runner;
pub mod script;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, ShipError};

/// Current version of Ship
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
