//! In-memory `PageDocument` used by tests and the demo harness.
//!
//! Elements declare the descriptor strings they match, so selector semantics
//! stay opaque here as they are in the trait. Every mutating call is appended
//! to an ordered operation log so tests can assert side-effect ordering (the
//! focus-before-assign write contract) and not just end state.

use std::sync::Mutex;

use prmsg_core::lock_or_recover;

use crate::document::{
    ElementId, ListenerId, PageDocument, SignalKind, SignalListener, SyntheticSignal,
};

/// One recorded page mutation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOperation {
    Focus(ElementId),
    SetValue(ElementId, String),
    Dispatch(ElementId, SignalKind),
    SetSelection(ElementId, usize, usize),
}

struct FakeElement {
    id: ElementId,
    selectors: Vec<String>,
    text: String,
    value: Option<String>,
    selection: (usize, usize),
    parent: Option<ElementId>,
}

#[derive(Default)]
struct FakePageInner {
    location: String,
    elements: Vec<FakeElement>,
    listeners: Vec<(ListenerId, ElementId, SignalKind, SignalListener)>,
    operations: Vec<PageOperation>,
    next_element: u64,
    next_listener: u64,
}

#[derive(Default)]
pub struct FakePage {
    inner: Mutex<FakePageInner>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_location(&self, location: &str) {
        lock_or_recover(&self.inner).location = location.to_string();
    }

    fn insert(
        &self,
        selectors: &[&str],
        text: &str,
        value: Option<String>,
        parent: Option<ElementId>,
    ) -> ElementId {
        let mut inner = lock_or_recover(&self.inner);
        inner.next_element += 1;
        let id = ElementId(inner.next_element);
        inner.elements.push(FakeElement {
            id,
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            text: text.to_string(),
            value,
            selection: (0, 0),
            parent,
        });
        id
    }

    /// Insert a plain element matching the given descriptors.
    pub fn insert_element(&self, selectors: &[&str], text: &str) -> ElementId {
        self.insert(selectors, text, None, None)
    }

    /// Insert a text-field element with an initial value.
    pub fn insert_field(&self, selectors: &[&str], value: &str) -> ElementId {
        self.insert(selectors, "", Some(value.to_string()), None)
    }

    pub fn insert_child_element(
        &self,
        parent: ElementId,
        selectors: &[&str],
        text: &str,
    ) -> ElementId {
        self.insert(selectors, text, None, Some(parent))
    }

    pub fn remove_element(&self, element: ElementId) {
        lock_or_recover(&self.inner)
            .elements
            .retain(|candidate| candidate.id != element);
    }

    pub fn set_text(&self, element: ElementId, text: &str) {
        let mut inner = lock_or_recover(&self.inner);
        if let Some(found) = inner.elements.iter_mut().find(|e| e.id == element) {
            found.text = text.to_string();
        }
    }

    /// Simulate a user click on the element.
    pub fn click(&self, element: ElementId) {
        self.dispatch(
            element,
            &SyntheticSignal {
                kind: SignalKind::Click,
                key: None,
                bubbles: true,
                cancelable: true,
            },
        );
    }

    /// Simulate the user typing into a field: appends to the value and fires
    /// an input signal, as the host does for genuine keystrokes.
    pub fn type_text(&self, element: ElementId, text: &str) {
        {
            let mut inner = lock_or_recover(&self.inner);
            if let Some(found) = inner.elements.iter_mut().find(|e| e.id == element) {
                if let Some(value) = found.value.as_mut() {
                    value.push_str(text);
                }
            }
        }
        self.dispatch(element, &SyntheticSignal::input());
    }

    pub fn operations(&self) -> Vec<PageOperation> {
        lock_or_recover(&self.inner).operations.clone()
    }

    pub fn selection_of(&self, element: ElementId) -> Option<(usize, usize)> {
        lock_or_recover(&self.inner)
            .elements
            .iter()
            .find(|e| e.id == element)
            .map(|e| e.selection)
    }
}

impl PageDocument for FakePage {
    fn location(&self) -> String {
        lock_or_recover(&self.inner).location.clone()
    }

    fn resolve_all(&self, selector: &str) -> Vec<ElementId> {
        lock_or_recover(&self.inner)
            .elements
            .iter()
            .filter(|e| e.selectors.iter().any(|s| s == selector))
            .map(|e| e.id)
            .collect()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        lock_or_recover(&self.inner)
            .elements
            .iter()
            .find(|e| e.id == element)?
            .parent
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        lock_or_recover(&self.inner)
            .elements
            .iter()
            .find(|e| e.id == element)
            .map(|e| e.text.clone())
    }

    fn field_value(&self, element: ElementId) -> Option<String> {
        lock_or_recover(&self.inner)
            .elements
            .iter()
            .find(|e| e.id == element)?
            .value
            .clone()
    }

    fn set_field_value(&self, element: ElementId, value: &str) -> bool {
        let mut inner = lock_or_recover(&self.inner);
        let updated = match inner.elements.iter_mut().find(|e| e.id == element) {
            Some(found) if found.value.is_some() => {
                found.value = Some(value.to_string());
                true
            }
            _ => false,
        };
        if updated {
            inner
                .operations
                .push(PageOperation::SetValue(element, value.to_string()));
        }
        updated
    }

    fn focus(&self, element: ElementId) -> bool {
        let mut inner = lock_or_recover(&self.inner);
        let present = inner.elements.iter().any(|e| e.id == element);
        if present {
            inner.operations.push(PageOperation::Focus(element));
        }
        present
    }

    fn set_selection_range(&self, element: ElementId, start: usize, end: usize) -> bool {
        let mut inner = lock_or_recover(&self.inner);
        let updated = match inner.elements.iter_mut().find(|e| e.id == element) {
            Some(found) => {
                found.selection = (start, end);
                true
            }
            None => false,
        };
        if updated {
            inner
                .operations
                .push(PageOperation::SetSelection(element, start, end));
        }
        updated
    }

    fn dispatch(&self, element: ElementId, signal: &SyntheticSignal) {
        let matching: Vec<SignalListener> = {
            let mut inner = lock_or_recover(&self.inner);
            inner
                .operations
                .push(PageOperation::Dispatch(element, signal.kind));
            inner
                .listeners
                .iter()
                .filter(|(_, target, kind, _)| *target == element && *kind == signal.kind)
                .map(|(_, _, _, listener)| listener.clone())
                .collect()
        };
        // Lock released before callbacks run, so listeners may re-enter the page.
        for listener in matching {
            listener(signal);
        }
    }

    fn add_signal_listener(
        &self,
        element: ElementId,
        kind: SignalKind,
        listener: SignalListener,
    ) -> ListenerId {
        let mut inner = lock_or_recover(&self.inner);
        inner.next_listener += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.push((id, element, kind, listener));
        id
    }

    fn remove_signal_listener(&self, listener: ListenerId) {
        lock_or_recover(&self.inner)
            .listeners
            .retain(|(id, _, _, _)| *id != listener);
    }
}
