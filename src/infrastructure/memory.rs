//! In-memory UI tree with the DOM semantics the element builder relies on.
//!
//! Nodes are reference-counted and single-threaded, like DOM nodes. Tag names
//! are lower-cased, names are validated as XML names, each tag exposes a fixed
//! set of properties, and a handful of properties reflect to attributes
//! (`id`, `className` -> `class`, `style`, `dataset` -> `data-*`, ...).

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::elem::{EventHandler, SubProps, UiHost};
use crate::domain::errors::{DomError, DomResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::event_utils::EventOptions;
use crate::log_trace;

static GLOBAL_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "textContent", "innerHTML", "innerText", "outerHTML", "id", "className", "classList",
        "title", "lang", "dir", "hidden", "tabIndex", "draggable", "style", "dataset",
        "children", "childNodes", "attributes", "nodeName", "tagName", "parentNode",
        "firstChild", "lastChild",
        "onclick", "ondblclick", "oninput", "onchange", "onsubmit", "onkeydown", "onkeyup",
        "onkeypress", "onfocus", "onblur", "onpointerdown", "onpointermove", "onpointerup",
        "onpointercancel", "onpointerenter", "onpointerleave", "onmousedown", "onmousemove",
        "onmouseup", "onmouseover", "onmouseout", "onmouseenter", "onmouseleave", "onwheel",
        "oncontextmenu", "onscroll", "onload", "onerror", "onresize", "ontouchstart",
        "ontouchmove", "ontouchend",
    ]
    .into_iter()
    .collect()
});

static TAG_PROPERTIES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let media: &'static [&'static str] = &["src", "controls", "autoplay", "loop", "muted", "currentTime"];
    let mut props: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    props.insert("a", &["href", "target", "download", "rel", "hreflang", "type"]);
    props.insert("button", &["disabled", "type", "name", "value"]);
    props.insert("canvas", &["width", "height"]);
    props.insert("details", &["open"]);
    props.insert("form", &["action", "method", "enctype", "target"]);
    props.insert("iframe", &["src", "width", "height", "name", "allow"]);
    props.insert("img", &["src", "alt", "width", "height", "srcset", "loading"]);
    props.insert(
        "input",
        &["value", "type", "checked", "disabled", "placeholder", "name", "min", "max", "step", "readOnly", "required"],
    );
    props.insert("label", &["htmlFor"]);
    props.insert("option", &["value", "selected", "disabled", "label"]);
    props.insert("select", &["value", "disabled", "multiple", "selectedIndex"]);
    props.insert("textarea", &["value", "placeholder", "disabled", "rows", "cols", "readOnly"]);
    props.insert("audio", media);
    props.insert("video", media);
    props
});

/// Properties mirrored to an attribute of (possibly) another name.
static REFLECTED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("id", "id"), ("className", "class"), ("title", "title"), ("lang", "lang"), ("dir", "dir"),
        ("tabIndex", "tabindex"), ("href", "href"), ("target", "target"), ("download", "download"),
        ("rel", "rel"), ("hreflang", "hreflang"), ("type", "type"), ("name", "name"),
        ("src", "src"), ("alt", "alt"), ("width", "width"), ("height", "height"),
        ("srcset", "srcset"), ("loading", "loading"), ("placeholder", "placeholder"),
        ("min", "min"), ("max", "max"), ("step", "step"), ("htmlFor", "for"),
        ("action", "action"), ("method", "method"), ("enctype", "enctype"), ("allow", "allow"),
        ("label", "label"), ("rows", "rows"), ("cols", "cols"),
    ])
});

/// Boolean properties reflected as present/absent attributes.
static BOOLEAN_REFLECTED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hidden", "hidden"), ("disabled", "disabled"), ("readOnly", "readonly"),
        ("required", "required"), ("multiple", "multiple"), ("open", "open"),
        ("controls", "controls"), ("autoplay", "autoplay"), ("loop", "loop"),
    ])
});

const TEXT_PROPERTIES: [&str; 4] = ["textContent", "data", "nodeValue", "length"];

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | ':') || !c.is_ascii())
}

fn kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_css_text(text: &str) -> SubProps {
    text.split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (camel_case(name.trim()), value.trim().to_string()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .collect()
}

fn css_text(style: &SubProps) -> String {
    style
        .iter()
        .map(|(name, value)| format!("{}: {};", kebab_case(name), value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Event value delivered to `MemoryHost` listeners.
#[derive(Debug)]
pub struct MemoryEvent {
    event_type: String,
    cancelable: bool,
    default_prevented: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl MemoryEvent {
    /// A cancelable event of the given type.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            cancelable: true,
            default_prevented: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    pub fn non_cancelable(event_type: impl Into<String>) -> Self {
        Self { cancelable: false, ..Self::new(event_type) }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Ignored inside passive listeners and for non-cancelable events.
    pub fn prevent_default(&self) {
        if self.cancelable && !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Clone)]
struct Listener {
    event: String,
    handler: EventHandler<MemoryEvent>,
    options: EventOptions,
}

impl Listener {
    fn same_registration(&self, other: &Listener) -> bool {
        self.event == other.event && self.options.capture == other.options.capture && self.handler.ptr_eq(&other.handler)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    properties: BTreeMap<String, String>,
    style: SubProps,
    dataset: SubProps,
    inner_html: Option<String>,
}

impl ElementData {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            properties: BTreeMap::new(),
            style: SubProps::new(),
            dataset: SubProps::new(),
            inner_html: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn put_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    /// Attribute write, keeping `style` and `dataset` in sync.
    fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.put_attribute(&name, value);
        if name == "style" {
            self.style = parse_css_text(value);
        } else if let Some(key) = name.strip_prefix("data-") {
            self.dataset.set(camel_case(key), value);
        }
    }

    fn sync_style_attribute(&mut self) {
        if self.style.is_empty() {
            self.remove_attribute("style");
        } else {
            let text = css_text(&self.style);
            self.put_attribute("style", &text);
        }
    }

    fn has_property(&self, key: &str) -> bool {
        GLOBAL_PROPERTIES.contains(key)
            || TAG_PROPERTIES.get(self.tag.as_str()).is_some_and(|props| props.contains(&key))
            || self.properties.contains_key(key)
    }

    fn property(&self, key: &str) -> Option<String> {
        if let Some(attr) = REFLECTED.get(key) {
            return self.attribute(attr).map(str::to_string);
        }
        if let Some(attr) = BOOLEAN_REFLECTED.get(key) {
            return Some(self.attribute(attr).is_some().to_string());
        }
        match key {
            "style" => Some(css_text(&self.style)),
            "innerHTML" => self.inner_html.clone(),
            _ => self.properties.get(key).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<MemNode>,
    listeners: Vec<Listener>,
}

/// Handle to a node of the in-memory tree. Clones share the node.
#[derive(Clone)]
pub struct MemNode(Rc<RefCell<NodeData>>);

impl MemNode {
    fn from_kind(kind: NodeKind) -> Self {
        MemNode(Rc::new(RefCell::new(NodeData {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        })))
    }

    fn new_element(tag: &str) -> Self {
        Self::from_kind(NodeKind::Element(ElementData::new(tag.to_ascii_lowercase())))
    }

    fn new_text(text: &str) -> Self {
        Self::from_kind(NodeKind::Text(text.to_string()))
    }

    fn with_element<R>(&self, operation: &'static str, f: impl FnOnce(&mut ElementData) -> R) -> DomResult<R> {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element(el) => Ok(f(el)),
            NodeKind::Text(_) => Err(DomError::NotAnElement { operation }),
        }
    }

    pub fn ptr_eq(&self, other: &MemNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        !self.is_element()
    }

    /// Lower-cased tag name; `None` for text nodes.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(el.tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => data.children.iter().map(MemNode::text_content).collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.attribute(&name.to_ascii_lowercase()).map(str::to_string),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.attributes.clone(),
            NodeKind::Text(_) => Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<String> {
        if name == "textContent" {
            return Some(self.text_content());
        }
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el.property(name),
            NodeKind::Text(text) => matches!(name, "data" | "nodeValue").then(|| text.clone()),
        }
    }

    /// Field `key` of the object-valued property `object` (`style` or `dataset`).
    pub fn sub_property(&self, object: &str, key: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => match object {
                "style" => el.style.get(&camel_case(key)).map(str::to_string),
                "dataset" => el.dataset.get(key).map(str::to_string),
                _ => None,
            },
            NodeKind::Text(_) => None,
        }
    }

    pub fn children(&self) -> Vec<MemNode> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn parent(&self) -> Option<MemNode> {
        self.0.borrow().parent.upgrade().map(MemNode)
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    /// Options of every listener registered for `event`, in registration order.
    pub fn listener_options(&self, event: &str) -> Vec<EventOptions> {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.options.clone())
            .collect()
    }

    /// Deliver `event` to this node's listeners (target phase only).
    ///
    /// Returns `false` when a non-passive listener cancelled the event, like
    /// the DOM's `dispatchEvent`.
    pub fn dispatch(&self, event: &MemoryEvent) -> bool {
        let listeners: Vec<Listener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event.event_type)
            .cloned()
            .collect();
        log_trace!(
            LogComponent::Infrastructure("MemoryHost"),
            "dispatch '{}' to {} listeners",
            event.event_type,
            listeners.len()
        );

        for listener in listeners {
            if listener.options.once {
                self.0.borrow_mut().listeners.retain(|l| !l.same_registration(&listener));
            }
            event.in_passive_listener.set(listener.options.passive);
            listener.handler.call(event);
            event.in_passive_listener.set(false);
        }
        !event.default_prevented()
    }

    fn detach(&self) {
        let parent = std::mem::take(&mut self.0.borrow_mut().parent).upgrade();
        if let Some(parent) = parent {
            parent.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
    }

    fn append(&self, child: &MemNode) -> DomResult<()> {
        if !self.is_element() {
            return Err(DomError::HierarchyRequest);
        }
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(child) {
                return Err(DomError::HierarchyRequest);
            }
            cursor = node.parent();
        }
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn replace_children_with_text(&self, text: &str) {
        let old = std::mem::take(&mut self.0.borrow_mut().children);
        for child in old {
            child.0.borrow_mut().parent = Weak::new();
        }
        if !text.is_empty() {
            let child = MemNode::new_text(text);
            child.0.borrow_mut().parent = Rc::downgrade(&self.0);
            self.0.borrow_mut().children.push(child);
        }
    }

    fn set_text(&self, text: &str) {
        let is_text = {
            let mut data = self.0.borrow_mut();
            match &mut data.kind {
                NodeKind::Text(current) => {
                    *current = text.to_string();
                    true
                }
                NodeKind::Element(el) => {
                    el.inner_html = None;
                    false
                }
            }
        };
        if !is_text {
            self.replace_children_with_text(text);
        }
    }

    /// Serialize the subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                match (&el.inner_html, data.children.is_empty()) {
                    (Some(raw), true) => out.push_str(raw),
                    _ => data.children.iter().for_each(|child| child.write_html(out)),
                }
                out.push_str(&format!("</{}>", el.tag));
            }
        }
    }

    /// Serialize the subtree in the sequence form `[tag, {attrs}?, ...children]`.
    pub fn to_jsonml(&self) -> Value {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => Value::String(text.clone()),
            NodeKind::Element(el) => {
                let mut items = vec![Value::String(el.tag.clone())];
                if !el.attributes.is_empty() {
                    let attrs: Map<String, Value> = el
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect();
                    items.push(Value::Object(attrs));
                }
                items.extend(data.children.iter().map(MemNode::to_jsonml));
                Value::Array(items)
            }
        }
    }
}

/// Deep structural equality: same kind, content, listener registrations and children.
impl PartialEq for MemNode {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.0.borrow();
        let b = other.0.borrow();
        let listeners_match = a.listeners.len() == b.listeners.len()
            && a.listeners
                .iter()
                .zip(&b.listeners)
                .all(|(x, y)| x.event == y.event && x.options == y.options);
        a.kind == b.kind && listeners_match && a.children == b.children
    }
}

impl fmt::Debug for MemNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemNode({})", self.to_html())
    }
}

/// `UiHost` backed by `MemNode` trees.
#[derive(Debug, Default)]
pub struct MemoryHost {
    created: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes created through this host so far.
    pub fn nodes_created(&self) -> usize {
        self.created.get()
    }

    fn count(&self, node: MemNode) -> MemNode {
        self.created.set(self.created.get() + 1);
        node
    }
}

impl UiHost for MemoryHost {
    type Node = MemNode;
    type Event = MemoryEvent;
    type Error = DomError;

    fn create_element(&self, tag: &str) -> DomResult<MemNode> {
        if !is_valid_name(tag) {
            return Err(DomError::InvalidCharacter { name: tag.to_string() });
        }
        Ok(self.count(MemNode::new_element(tag)))
    }

    fn create_text_node(&self, text: &str) -> DomResult<MemNode> {
        Ok(self.count(MemNode::new_text(text)))
    }

    fn set_text_content(&self, node: &MemNode, text: &str) -> DomResult<()> {
        node.set_text(text);
        Ok(())
    }

    fn has_property(&self, node: &MemNode, key: &str) -> DomResult<bool> {
        Ok(match &node.0.borrow().kind {
            NodeKind::Element(el) => el.has_property(key),
            NodeKind::Text(_) => TEXT_PROPERTIES.contains(&key),
        })
    }

    fn set_attribute(&self, node: &MemNode, key: &str, value: &str) -> DomResult<()> {
        if !is_valid_name(key) {
            return Err(DomError::InvalidCharacter { name: key.to_string() });
        }
        node.with_element("setAttribute", |el| el.set_attribute(key, value))
    }

    fn set_property(&self, node: &MemNode, key: &str, value: &str) -> DomResult<()> {
        match key {
            "textContent" | "innerText" => {
                node.set_text(value);
                return Ok(());
            }
            "data" | "nodeValue" if node.is_text() => {
                node.set_text(value);
                return Ok(());
            }
            "innerHTML" => {
                node.with_element("innerHTML", |_| ())?;
                node.replace_children_with_text("");
                return node.with_element("innerHTML", |el| el.inner_html = Some(value.to_string()));
            }
            _ => {}
        }

        node.with_element("property assignment", |el| {
            if key == "dataset" {
                return Err(DomError::ReadOnlyProperty { property: key.to_string() });
            }
            if key == "style" {
                el.style = parse_css_text(value);
                el.sync_style_attribute();
            } else if let Some(attr) = REFLECTED.get(key) {
                el.put_attribute(attr, value);
            } else if let Some(attr) = BOOLEAN_REFLECTED.get(key) {
                if value.is_empty() {
                    el.remove_attribute(attr);
                } else {
                    el.put_attribute(attr, "");
                }
            } else {
                el.properties.insert(key.to_string(), value.to_string());
            }
            Ok(())
        })?
    }

    fn merge_property(&self, node: &MemNode, key: &str, fields: &SubProps) -> DomResult<()> {
        node.with_element("property merge", |el| match key {
            "style" => {
                // `background-color` and `backgroundColor` name the same declaration.
                for (name, value) in fields.iter() {
                    let name = camel_case(name);
                    if value.is_empty() {
                        el.style.remove(&name);
                    } else {
                        el.style.set(name, value);
                    }
                }
                el.sync_style_attribute();
                Ok(())
            }
            "dataset" => {
                for (name, value) in fields.iter() {
                    el.dataset.set(name, value);
                    el.put_attribute(&format!("data-{}", kebab_case(name)), value);
                }
                Ok(())
            }
            _ => Err(DomError::NotAnObject { property: key.to_string() }),
        })?
    }

    fn append_child(&self, parent: &MemNode, child: &MemNode) -> DomResult<()> {
        parent.append(child)
    }

    fn add_event_listener(
        &self,
        node: &MemNode,
        event: &str,
        handler: EventHandler<MemoryEvent>,
        options: &EventOptions,
    ) -> DomResult<()> {
        let listener = Listener { event: event.to_string(), handler, options: options.clone() };
        let mut data = node.0.borrow_mut();
        if data.listeners.iter().any(|l| l.same_registration(&listener)) {
            get_logger().debug(
                LogComponent::Infrastructure("MemoryHost"),
                &format!("duplicate '{}' listener ignored", event),
            );
            return Ok(());
        }
        data.listeners.push(listener);
        Ok(())
    }
}
