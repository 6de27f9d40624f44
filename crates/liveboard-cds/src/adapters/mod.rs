//! Derived stream transforms layered on top of a source.

pub mod emulation;
pub mod fts;
pub mod tuned;
