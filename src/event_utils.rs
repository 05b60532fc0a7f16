use leptos::ev::EventDescriptor;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event};

use crate::domain::elem::Attributes;

/// Listener registration options, as in the DOM's `AddEventListenerOptions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

impl EventOptions {
    /// Options for handlers that may cancel the default action.
    pub fn non_passive() -> Self {
        Self { passive: false, ..Self::default() }
    }
}

pub fn listener_options(options: &EventOptions) -> AddEventListenerOptions {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);
    opts
}

/// Attributes key under which a handler for `event` is stored, e.g. `onclick`.
pub fn event_key<E: EventDescriptor>(event: &E) -> String {
    format!("on{}", event.name())
}

impl Attributes<Event> {
    /// Register a handler receiving the event's concrete DOM type.
    pub fn on_typed<E>(self, event: E, handler: impl Fn(&E::EventType) + 'static) -> Self
    where
        E: EventDescriptor + 'static,
        E::EventType: JsCast,
    {
        self.on(&event.name(), move |ev: &Event| {
            handler(ev.unchecked_ref::<E::EventType>());
        })
    }
}
