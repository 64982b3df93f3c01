//! Personal task tracking over a tree of arbitrarily nested tasks.
//!
//! The engines in [`ops`] are pure functions over the tree; [`store`] owns the
//! one mutable copy and persists it after each change.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod store;
pub mod util;
