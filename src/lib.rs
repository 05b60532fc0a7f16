//! Declarative UI-element construction for the graphics sample gallery.
//!
//! Describe a node tree as an [`ElemSpec`](domain::elem::ElemSpec) (in Rust, with
//! the [`elem!`] macro, or as JSON), then build it through any
//! [`UiHost`](domain::elem::UiHost): the browser DOM or the in-memory tree.

#[macro_use]
pub mod macros;

pub mod application;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
#[cfg(not(feature = "logic-only"))]
pub mod presentation;

pub use application::{Content, ElementBuilder, create_elem, make_elem};
pub use domain::elem::{AttrValue, Attributes, ElemSpec, ElementSpec, EventHandler, SubProps, UiHost};

#[cfg(not(feature = "logic-only"))]
use wasm_bindgen::prelude::*;

/// Install the panic hook, the browser clock and the console logger.
#[cfg(not(feature = "logic-only"))]
#[wasm_bindgen(start)]
pub fn initialize() {
    use crate::domain::logging::{LogComponent, get_logger};

    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "element builder ready");
}
