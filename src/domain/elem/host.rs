use super::attributes::{EventHandler, SubProps};
use crate::event_utils::EventOptions;

/// Capabilities the element builder needs from a UI tree.
///
/// Every fallible call reports the host's own error type; callers above this
/// trait pass those errors through untouched.
pub trait UiHost {
    type Node: Clone;
    type Event;
    type Error;

    fn create_element(&self, tag: &str) -> Result<Self::Node, Self::Error>;

    fn create_text_node(&self, text: &str) -> Result<Self::Node, Self::Error>;

    /// Replace the node's content with `text`.
    fn set_text_content(&self, node: &Self::Node, text: &str) -> Result<(), Self::Error>;

    /// Whether the node already exposes a field named `key`
    /// (i.e. reading it would not yield `undefined`).
    fn has_property(&self, node: &Self::Node, key: &str) -> Result<bool, Self::Error>;

    fn set_attribute(&self, node: &Self::Node, key: &str, value: &str) -> Result<(), Self::Error>;

    fn set_property(&self, node: &Self::Node, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Write each field into the object already stored under `key`.
    fn merge_property(&self, node: &Self::Node, key: &str, fields: &SubProps) -> Result<(), Self::Error>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    fn add_event_listener(
        &self,
        node: &Self::Node,
        event: &str,
        handler: EventHandler<Self::Event>,
        options: &EventOptions,
    ) -> Result<(), Self::Error>;
}
