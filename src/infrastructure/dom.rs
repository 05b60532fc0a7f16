use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, Node};

use crate::domain::elem::{EventHandler, SubProps, UiHost};
use crate::event_utils::{EventOptions, listener_options};

/// `UiHost` over the browser document.
///
/// Errors are the `JsValue`s thrown by the DOM, handed back as-is.
#[derive(Clone, Debug)]
pub struct DomHost {
    document: Document,
}

impl DomHost {
    /// Host for the current window's document.
    pub fn new() -> Result<Self, JsValue> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::from_document)
            .ok_or_else(|| js_sys::Error::new("Document not available").into())
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl UiHost for DomHost {
    type Node = Node;
    type Event = Event;
    type Error = JsValue;

    fn create_element(&self, tag: &str) -> Result<Node, JsValue> {
        self.document.create_element(tag).map(Node::from)
    }

    fn create_text_node(&self, text: &str) -> Result<Node, JsValue> {
        Ok(self.document.create_text_node(text).into())
    }

    fn set_text_content(&self, node: &Node, text: &str) -> Result<(), JsValue> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn has_property(&self, node: &Node, key: &str) -> Result<bool, JsValue> {
        let value = Reflect::get(node, &JsValue::from_str(key))?;
        Ok(!value.is_undefined())
    }

    fn set_attribute(&self, node: &Node, key: &str, value: &str) -> Result<(), JsValue> {
        match node.dyn_ref::<Element>() {
            Some(element) => element.set_attribute(key, value),
            None => Err(js_sys::TypeError::new("setAttribute requires an element node").into()),
        }
    }

    fn set_property(&self, node: &Node, key: &str, value: &str) -> Result<(), JsValue> {
        Reflect::set(node, &JsValue::from_str(key), &JsValue::from_str(value))?;
        Ok(())
    }

    fn merge_property(&self, node: &Node, key: &str, fields: &SubProps) -> Result<(), JsValue> {
        // Reflect.set throws a TypeError when the target is not an object.
        let target = Reflect::get(node, &JsValue::from_str(key))?;
        for (name, value) in fields.iter() {
            Reflect::set(&target, &JsValue::from_str(name), &JsValue::from_str(value))?;
        }
        Ok(())
    }

    fn append_child(&self, parent: &Node, child: &Node) -> Result<(), JsValue> {
        parent.append_child(child).map(|_| ())
    }

    fn add_event_listener(
        &self,
        node: &Node,
        event: &str,
        handler: EventHandler<Event>,
        options: &EventOptions,
    ) -> Result<(), JsValue> {
        let opts = listener_options(options);
        let callback = Closure::wrap(Box::new(move |ev: Event| {
            handler.call(&ev);
        }) as Box<dyn FnMut(Event)>);

        node.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &opts,
        )?;
        // The listener lives as long as the element; JS owns the closure from here.
        callback.forget();
        Ok(())
    }
}
