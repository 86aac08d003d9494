//! Fixed-rate background task execution.

pub mod periodic;

pub use periodic::*;
