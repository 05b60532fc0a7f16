use std::fmt;

use super::attributes::Attributes;

/// Recursive description of one node and its subtree.
pub enum ElemSpec<Ev> {
    Text(String),
    Element(ElementSpec<Ev>),
}

/// An element description: tag, optional attributes, ordered children.
pub struct ElementSpec<Ev> {
    pub tag: String,
    pub attrs: Option<Attributes<Ev>>,
    pub children: Vec<ElemSpec<Ev>>,
}

impl<Ev> ElemSpec<Ev> {
    pub fn text(text: impl Into<String>) -> Self {
        ElemSpec::Text(text.into())
    }

    pub fn element(tag: impl Into<String>) -> ElementSpec<Ev> {
        ElementSpec::new(tag)
    }

    /// Number of nodes this description builds, itself included.
    pub fn node_count(&self) -> usize {
        match self {
            ElemSpec::Text(_) => 1,
            ElemSpec::Element(el) => 1 + el.children.iter().map(ElemSpec::node_count).sum::<usize>(),
        }
    }
}

impl<Ev> ElementSpec<Ev> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attrs: None, children: Vec::new() }
    }

    pub fn with_attrs(mut self, attrs: Attributes<Ev>) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn child(mut self, child: impl Into<ElemSpec<Ev>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ElemSpec<Ev>>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

impl<Ev> From<ElementSpec<Ev>> for ElemSpec<Ev> {
    fn from(value: ElementSpec<Ev>) -> Self {
        ElemSpec::Element(value)
    }
}

impl<Ev> From<&str> for ElemSpec<Ev> {
    fn from(value: &str) -> Self {
        ElemSpec::Text(value.to_string())
    }
}

impl<Ev> From<String> for ElemSpec<Ev> {
    fn from(value: String) -> Self {
        ElemSpec::Text(value)
    }
}

impl<Ev> Clone for ElementSpec<Ev> {
    fn clone(&self) -> Self {
        Self { tag: self.tag.clone(), attrs: self.attrs.clone(), children: self.children.clone() }
    }
}

impl<Ev> Clone for ElemSpec<Ev> {
    fn clone(&self) -> Self {
        match self {
            ElemSpec::Text(text) => ElemSpec::Text(text.clone()),
            ElemSpec::Element(el) => ElemSpec::Element(el.clone()),
        }
    }
}

impl<Ev> fmt::Debug for ElementSpec<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSpec")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish()
    }
}

impl<Ev> fmt::Debug for ElemSpec<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElemSpec::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ElemSpec::Element(el) => el.fmt(f),
        }
    }
}

/// Shape of the value at index 1 of a sequence-form description.
///
/// Attributes are detected by position: anything present there that is
/// neither a string nor a sequence is the attributes mapping, so a sequence
/// at index 1 is always the first child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondSlot {
    Missing,
    Text,
    Sequence,
    Other,
}

impl SecondSlot {
    pub fn holds_attributes(self) -> bool {
        self == SecondSlot::Other
    }

    /// Index of the first child in the sequence.
    pub fn first_child_index(self) -> usize {
        if self.holds_attributes() { 2 } else { 1 }
    }
}
