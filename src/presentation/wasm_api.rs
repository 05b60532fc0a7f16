use std::str::FromStr;

use js_sys::{Array, Function, Object};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, Node};

use crate::application::{Content, ElementBuilder};
use crate::domain::elem::{AttrValue, Attributes, ElemSpec, ElementSpec, EventHandler, SecondSlot, SubProps};
use crate::domain::errors::{SpecError, SpecResult};
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::infrastructure::DomHost;

impl From<SpecError> for JsValue {
    fn from(err: SpecError) -> Self {
        js_sys::TypeError::new(&err.to_string()).into()
    }
}

fn js_type(value: &JsValue) -> &'static str {
    if value.is_null() {
        "null"
    } else if value.is_undefined() {
        "undefined"
    } else if value.is_string() {
        "string"
    } else if Array::is_array(value) {
        "array"
    } else if value.is_function() {
        "function"
    } else if value.as_f64().is_some() {
        "number"
    } else if value.as_bool().is_some() {
        "boolean"
    } else {
        "object"
    }
}

fn scalar_text(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
        .or_else(|| value.as_bool().map(|b| b.to_string()))
}

fn entries(object: &Object) -> Vec<(String, JsValue)> {
    Object::entries(object)
        .iter()
        .map(|pair| {
            let pair: Array = pair.unchecked_into();
            (pair.get(0).as_string().unwrap_or_default(), pair.get(1))
        })
        .collect()
}

/// Wrap a JS function as a handler. Exceptions it throws are rethrown to the
/// browser's event dispatch.
fn js_handler(function: Function) -> EventHandler<Event> {
    EventHandler::new(move |event: &Event| {
        if let Err(err) = function.call1(&JsValue::NULL, event) {
            wasm_bindgen::throw_val(err);
        }
    })
}

fn sub_props_from_js(key: &str, object: &Object) -> SpecResult<SubProps> {
    let mut props = SubProps::new();
    for (sub_key, value) in entries(object) {
        match scalar_text(&value) {
            Some(text) => props.set(sub_key, text),
            None => return Err(SpecError::UnsupportedNesting { key: key.to_string(), sub_key }),
        }
    }
    Ok(props)
}

fn attributes_from_js(value: &JsValue) -> SpecResult<Attributes<Event>> {
    if value.is_null() || value.is_undefined() {
        return Err(SpecError::InvalidAttributes { found: js_type(value) });
    }
    // Numbers and booleans have no own entries.
    let Some(object) = value.dyn_ref::<Object>() else {
        return Ok(Attributes::new());
    };

    let mut attrs = Attributes::new();
    for (key, value) in entries(object) {
        let parsed: AttrValue<Event> = if value.is_function() {
            AttrValue::Handler(js_handler(value.unchecked_into()))
        } else if let Some(text) = scalar_text(&value) {
            AttrValue::Text(text)
        } else if value.is_object() && !Array::is_array(&value) {
            AttrValue::Nested(sub_props_from_js(&key, value.unchecked_ref())?)
        } else {
            return Err(SpecError::InvalidAttributeValue { key, found: js_type(&value) });
        };
        attrs.set(key, parsed);
    }
    Ok(attrs)
}

fn sequence_from_js(items: &Array) -> SpecResult<ElemSpec<Event>> {
    let length = items.length();
    if length == 0 {
        return Err(SpecError::EmptySequence);
    }
    let first = items.get(0);
    let tag = first.as_string().ok_or_else(|| SpecError::InvalidTag { found: js_type(&first) })?;

    let slot = if length < 2 {
        SecondSlot::Missing
    } else {
        let second = items.get(1);
        if second.is_string() {
            SecondSlot::Text
        } else if Array::is_array(&second) {
            SecondSlot::Sequence
        } else {
            SecondSlot::Other
        }
    };

    let mut element = ElementSpec::new(tag);
    if slot.holds_attributes() {
        element.attrs = Some(attributes_from_js(&items.get(1))?);
    }
    for index in slot.first_child_index() as u32..length {
        let item = items.get(index);
        let child = if let Some(text) = item.as_string() {
            ElemSpec::Text(text)
        } else if let Some(seq) = item.dyn_ref::<Array>() {
            sequence_from_js(seq)?
        } else {
            return Err(SpecError::InvalidChild { index: index as usize, found: js_type(&item) });
        };
        element.children.push(child);
    }
    Ok(ElemSpec::Element(element))
}

/// Convert a JS value in sequence form (`["ul", {...}, ["li", "x"]]`) into an `ElemSpec`.
pub fn spec_from_js(value: &JsValue) -> SpecResult<ElemSpec<Event>> {
    if let Some(text) = value.as_string() {
        return Ok(ElemSpec::Text(text));
    }
    match value.dyn_ref::<Array>() {
        Some(items) => sequence_from_js(items),
        None => Err(SpecError::InvalidChild { index: 0, found: js_type(value) }),
    }
}

/// Build a DOM tree from a sequence-form `ElemSpec`.
#[wasm_bindgen(js_name = makeElem)]
pub fn make_elem_js(spec: JsValue) -> Result<Node, JsValue> {
    let spec = spec_from_js(&spec)?;
    let host = DomHost::new()?;
    ElementBuilder::new(&host).make_elem(&spec)
}

/// Create one element with attributes (or text) and already-built children.
#[wasm_bindgen(js_name = createElem)]
pub fn create_elem_js(tag: &str, attrs_or_text: JsValue, children: Option<Array>) -> Result<Node, JsValue> {
    let content = if attrs_or_text.is_undefined() {
        Content::default()
    } else if let Some(text) = attrs_or_text.as_string() {
        Content::Text(text)
    } else {
        Content::Attrs(attributes_from_js(&attrs_or_text)?)
    };

    let children = match children {
        Some(list) => list
            .iter()
            .map(|child| {
                child
                    .dyn_into::<Node>()
                    .map_err(|_| JsValue::from(js_sys::TypeError::new("children must be DOM nodes")))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let host = DomHost::new()?;
    ElementBuilder::new(&host).create_elem(tag, content, children)
}

/// Set the console logger's minimum level (`"trace"` .. `"error"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = LogLevel::from_str(level)
        .map_err(|_| JsValue::from(js_sys::TypeError::new(&format!("unknown log level '{}'", level))))?;
    get_logger().set_min_level(level);
    get_logger().info(LogComponent::Presentation("WasmApi"), &format!("log level set to {}", level));
    Ok(())
}
