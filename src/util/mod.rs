//! Helpers around the hook core: vectors, cursor access and console I/O.

pub mod console;
pub mod cursor;
pub mod vector;

pub use vector::Vector2D;
