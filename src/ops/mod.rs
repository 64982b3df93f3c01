pub mod autocomplete;
pub mod id;
pub mod query;
pub mod tags;
pub mod tree;
