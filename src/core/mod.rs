//! Core measurement types and constants for DFI prediction

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
