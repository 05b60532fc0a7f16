use std::fmt;
use std::rc::Rc;

/// A unary callback receiving the host's event value.
pub struct EventHandler<Ev>(Rc<dyn Fn(&Ev)>);

impl<Ev> EventHandler<Ev> {
    pub fn new(handler: impl Fn(&Ev) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, event: &Ev) {
        (self.0)(event)
    }

    /// Whether both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<Ev> Clone for EventHandler<Ev> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<Ev> fmt::Debug for EventHandler<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

/// Ordered string map merged into an object-valued node property such as `style`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubProps(Vec<(String, String)>);

impl SubProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, keeping its first insertion position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubProps {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = SubProps::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

/// Value side of one attributes-map entry.
pub enum AttrValue<Ev> {
    Text(String),
    Nested(SubProps),
    Handler(EventHandler<Ev>),
}

impl<Ev> Clone for AttrValue<Ev> {
    fn clone(&self) -> Self {
        match self {
            AttrValue::Text(s) => AttrValue::Text(s.clone()),
            AttrValue::Nested(props) => AttrValue::Nested(props.clone()),
            AttrValue::Handler(h) => AttrValue::Handler(h.clone()),
        }
    }
}

impl<Ev> fmt::Debug for AttrValue<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            AttrValue::Nested(props) => f.debug_tuple("Nested").field(props).finish(),
            AttrValue::Handler(h) => f.debug_tuple("Handler").field(h).finish(),
        }
    }
}

impl<Ev> From<&str> for AttrValue<Ev> {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl<Ev> From<String> for AttrValue<Ev> {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl<Ev> From<SubProps> for AttrValue<Ev> {
    fn from(value: SubProps) -> Self {
        AttrValue::Nested(value)
    }
}

impl<Ev> From<EventHandler<Ev>> for AttrValue<Ev> {
    fn from(value: EventHandler<Ev>) -> Self {
        AttrValue::Handler(value)
    }
}

/// The attributes mapping of one element, in insertion order.
pub struct Attributes<Ev> {
    entries: Vec<(String, AttrValue<Ev>)>,
}

impl<Ev> Attributes<Ev> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert or overwrite `key`. Overwriting keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue<Ev>>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue<Ev>>) -> Self {
        self.set(key, value);
        self
    }

    /// Register `handler` under `on{event}`.
    pub fn on(self, event: &str, handler: impl Fn(&Ev) + 'static) -> Self {
        self.with(format!("on{}", event), EventHandler::new(handler))
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue<Ev>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue<Ev>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Ev> Default for Attributes<Ev> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ev> Clone for Attributes<Ev> {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<Ev> fmt::Debug for Attributes<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

/// How one attributes-map entry is applied to a node.
#[derive(Debug)]
pub enum AttrEntry<'a, Ev> {
    /// Native attribute write (`setAttribute`).
    Attribute { name: &'a str, value: &'a str },
    /// Direct write to an existing node field, e.g. `textContent`.
    Property { name: &'a str, value: &'a str },
    EventHandler { event: String, handler: &'a EventHandler<Ev> },
    /// Merge into the existing object-valued property `name`.
    NestedMerge { name: &'a str, fields: &'a SubProps },
}

impl<'a, Ev> AttrEntry<'a, Ev> {
    /// Classify one entry.
    ///
    /// `has_property` answers whether the target node already carries a field
    /// named like the key; it is only consulted for text values. Returns
    /// `Ok(None)` for a handler stored under a key without the `on` prefix:
    /// it has no event to bind to and is not written to the node either, where
    /// a script host would let it reach the `key in node` test.
    pub fn classify<E>(
        key: &'a str,
        value: &'a AttrValue<Ev>,
        has_property: impl FnOnce(&str) -> Result<bool, E>,
    ) -> Result<Option<Self>, E> {
        let entry = match value {
            AttrValue::Handler(handler) => match key.strip_prefix("on") {
                Some(event) => AttrEntry::EventHandler { event: event.to_lowercase(), handler },
                None => return Ok(None),
            },
            AttrValue::Nested(fields) => AttrEntry::NestedMerge { name: key, fields },
            AttrValue::Text(text) => {
                if has_property(key)? {
                    AttrEntry::Property { name: key, value: text.as_str() }
                } else {
                    AttrEntry::Attribute { name: key, value: text.as_str() }
                }
            }
        };
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn no_fields(_: &str) -> Result<bool, Infallible> {
        Ok(false)
    }

    #[test]
    fn on_prefixed_handler_becomes_lowercased_event() {
        let value: AttrValue<()> = EventHandler::new(|_| {}).into();
        let entry = AttrEntry::classify("onPointerDown", &value, no_fields).unwrap();
        match entry {
            Some(AttrEntry::EventHandler { event, .. }) => assert_eq!(event, "pointerdown"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn on_prefixed_text_is_a_plain_write() {
        let value: AttrValue<()> = "alert(1)".into();
        let entry = AttrEntry::classify("onclick", &value, |_| Ok::<_, Infallible>(true)).unwrap();
        assert!(matches!(entry, Some(AttrEntry::Property { name: "onclick", value: "alert(1)" })));
    }

    #[test]
    fn handler_without_prefix_is_unbound() {
        let value: AttrValue<()> = EventHandler::new(|_| {}).into();
        assert!(AttrEntry::classify("click", &value, no_fields).unwrap().is_none());
    }

    #[test]
    fn existing_field_decides_attribute_or_property() {
        let value: AttrValue<()> = "x".into();
        let attr = AttrEntry::classify("data-x", &value, no_fields).unwrap();
        assert!(matches!(attr, Some(AttrEntry::Attribute { name: "data-x", .. })));
        let prop = AttrEntry::classify("textContent", &value, |k| Ok::<_, Infallible>(k == "textContent")).unwrap();
        assert!(matches!(prop, Some(AttrEntry::Property { name: "textContent", .. })));
    }

    #[test]
    fn nested_value_never_probes_the_node() {
        let value: AttrValue<()> = SubProps::new().with("color", "red").into();
        let entry = AttrEntry::classify("style", &value, |_| -> Result<bool, &str> { Err("probed") }).unwrap();
        match entry {
            Some(AttrEntry::NestedMerge { name, fields }) => {
                assert_eq!(name, "style");
                assert_eq!(fields.get("color"), Some("red"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn overwriting_a_key_keeps_its_position() {
        let attrs: Attributes<()> = Attributes::new().with("a", "1").with("b", "2").with("a", "3");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(attrs.len(), 2);
        assert!(matches!(attrs.get("a"), Some(AttrValue::Text(v)) if v == "3"));
    }
}
