//! JS-facing bridge: converts JS values into `ElemSpec`s and builds through `DomHost`.

pub mod wasm_api;

pub use wasm_api::spec_from_js;
