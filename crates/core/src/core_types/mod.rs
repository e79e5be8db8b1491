//! Core types and utilities

pub mod climate;
pub mod geology;
pub mod units;
pub mod vegetation;

pub use climate::*;
pub use geology::*;
pub use units::*;
pub use vegetation::*;
