//! Use cases: building node trees from element descriptions.

pub mod builder;

pub use builder::{Content, ElementBuilder, create_elem, make_elem};
