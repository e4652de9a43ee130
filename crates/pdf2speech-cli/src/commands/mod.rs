//! CLI command implementations.

pub mod convert;
pub mod extract;
pub mod info;
pub mod normalize;
