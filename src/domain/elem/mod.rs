//! Declarative element descriptions and the host capability they are built against.

pub mod attributes;
pub mod host;
pub mod json;
pub mod spec;

pub use attributes::{AttrEntry, AttrValue, Attributes, EventHandler, SubProps};
pub use host::UiHost;
pub use spec::{ElemSpec, ElementSpec, SecondSlot};
