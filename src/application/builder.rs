use crate::domain::elem::{AttrEntry, Attributes, ElemSpec, UiHost};
use crate::domain::logging::{LogComponent, get_logger};
use crate::event_utils::EventOptions;
use crate::log_trace;

/// Second argument of `create_elem`: an attributes mapping or a text shorthand.
pub enum Content<Ev> {
    Attrs(Attributes<Ev>),
    Text(String),
}

impl<Ev> Default for Content<Ev> {
    fn default() -> Self {
        Content::Attrs(Attributes::new())
    }
}

impl<Ev> From<Attributes<Ev>> for Content<Ev> {
    fn from(value: Attributes<Ev>) -> Self {
        Content::Attrs(value)
    }
}

impl<Ev> From<&str> for Content<Ev> {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl<Ev> From<String> for Content<Ev> {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

/// Builds node trees through a `UiHost`.
///
/// Holds nothing but the host reference; every call works on freshly created
/// nodes. Host errors are returned exactly as the host produced them.
pub struct ElementBuilder<'h, H: UiHost> {
    host: &'h H,
}

impl<'h, H: UiHost> ElementBuilder<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Create one `tag` element, apply `content`, then append `children` in order.
    pub fn create_elem<I>(&self, tag: &str, content: impl Into<Content<H::Event>>, children: I) -> Result<H::Node, H::Error>
    where
        I: IntoIterator<Item = H::Node>,
    {
        let node = self.host.create_element(tag)?;
        match content.into() {
            Content::Text(text) => self.host.set_text_content(&node, &text)?,
            Content::Attrs(attrs) => self.apply_attributes(&node, &attrs)?,
        }
        for child in children {
            self.host.append_child(&node, &child)?;
        }
        log_trace!(LogComponent::Application("ElementBuilder"), "created <{}>", tag);
        Ok(node)
    }

    /// Build the whole tree described by `spec` and return its root.
    pub fn make_elem(&self, spec: &ElemSpec<H::Event>) -> Result<H::Node, H::Error> {
        match spec {
            ElemSpec::Text(text) => self.host.create_text_node(text),
            ElemSpec::Element(element) => {
                let node = self.host.create_element(&element.tag)?;
                if let Some(attrs) = &element.attrs {
                    self.apply_attributes(&node, attrs)?;
                }
                for child in &element.children {
                    let child = self.make_elem(child)?;
                    self.host.append_child(&node, &child)?;
                }
                log_trace!(
                    LogComponent::Application("ElementBuilder"),
                    "built <{}> with {} children",
                    element.tag,
                    element.children.len()
                );
                Ok(node)
            }
        }
    }

    fn apply_attributes(&self, node: &H::Node, attrs: &Attributes<H::Event>) -> Result<(), H::Error> {
        for (key, value) in attrs.iter() {
            let entry = AttrEntry::classify(key, value, |name| self.host.has_property(node, name))?;
            match entry {
                Some(AttrEntry::EventHandler { event, handler }) => {
                    self.host.add_event_listener(node, &event, handler.clone(), &EventOptions::non_passive())?;
                }
                Some(AttrEntry::NestedMerge { name, fields }) => self.host.merge_property(node, name, fields)?,
                Some(AttrEntry::Attribute { name, value }) => self.host.set_attribute(node, name, value)?,
                Some(AttrEntry::Property { name, value }) => self.host.set_property(node, name, value)?,
                None => get_logger().warn(
                    LogComponent::Application("ElementBuilder"),
                    &format!("handler under '{}' ignored: event keys need the 'on' prefix", key),
                ),
            }
        }
        Ok(())
    }
}

/// `ElementBuilder::create_elem` without naming the builder.
pub fn create_elem<H, I>(host: &H, tag: &str, content: impl Into<Content<H::Event>>, children: I) -> Result<H::Node, H::Error>
where
    H: UiHost,
    I: IntoIterator<Item = H::Node>,
{
    ElementBuilder::new(host).create_elem(tag, content, children)
}

pub fn make_elem<H: UiHost>(host: &H, spec: &ElemSpec<H::Event>) -> Result<H::Node, H::Error> {
    ElementBuilder::new(host).make_elem(spec)
}
