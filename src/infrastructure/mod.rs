pub mod memory;

#[cfg(not(feature = "logic-only"))]
pub mod dom;
#[cfg(not(feature = "logic-only"))]
pub mod services;

pub use memory::{MemNode, MemoryEvent, MemoryHost};

#[cfg(not(feature = "logic-only"))]
pub use dom::DomHost;
