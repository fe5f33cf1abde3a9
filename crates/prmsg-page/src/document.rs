use std::sync::Arc;

/// Opaque element handle; equality is element identity, so a host re-render
/// that replaces a node yields a different id for the same selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Handle for a registered signal listener, used to detach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Click,
    KeyDown,
    KeyPress,
    KeyUp,
    Input,
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalKeyInfo {
    pub key: String,
    pub code: String,
    pub key_code: u32,
}

/// A programmatically constructed event dispatched to mimic user interaction
/// for host-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticSignal {
    pub kind: SignalKind,
    pub key: Option<SignalKeyInfo>,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl SyntheticSignal {
    pub fn keyboard(kind: SignalKind, key: &str, code: &str, key_code: u32) -> Self {
        Self {
            kind,
            key: Some(SignalKeyInfo {
                key: key.to_string(),
                code: code.to_string(),
                key_code,
            }),
            bubbles: true,
            cancelable: true,
        }
    }

    pub fn input() -> Self {
        Self {
            kind: SignalKind::Input,
            key: None,
            bubbles: true,
            cancelable: true,
        }
    }

    pub fn change() -> Self {
        Self {
            kind: SignalKind::Change,
            key: None,
            bubbles: true,
            cancelable: true,
        }
    }
}

/// Callback invoked synchronously while a signal is dispatched to the element
/// it is registered on.
pub type SignalListener = Arc<dyn Fn(&SyntheticSignal) + Send + Sync>;

/// Capability contract for the host document.
///
/// This is everything the enhancer needs from the page: descriptor-based
/// element lookup, text reads, one writable text field (value, focus,
/// selection range), synthetic signal dispatch, and listener registration.
/// Descriptors are opaque selector strings interpreted by the implementation.
pub trait PageDocument: Send + Sync {
    /// Current location URL of the page.
    fn location(&self) -> String;

    /// All elements currently matching the descriptor, in document order.
    fn resolve_all(&self, selector: &str) -> Vec<ElementId>;

    /// Parent element, when the node is attached and has one.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Raw text content; callers trim.
    fn text_content(&self, element: ElementId) -> Option<String>;

    /// Current value of a text field element.
    fn field_value(&self, element: ElementId) -> Option<String>;

    /// Assign a text field's value. Returns false if the element is gone or
    /// is not a field.
    fn set_field_value(&self, element: ElementId, value: &str) -> bool;

    fn focus(&self, element: ElementId) -> bool;

    fn set_selection_range(&self, element: ElementId, start: usize, end: usize) -> bool;

    /// Dispatch a synthetic signal; listeners registered for the element and
    /// kind run synchronously before this returns.
    fn dispatch(&self, element: ElementId, signal: &SyntheticSignal);

    fn add_signal_listener(
        &self,
        element: ElementId,
        kind: SignalKind,
        listener: SignalListener,
    ) -> ListenerId;

    fn remove_signal_listener(&self, listener: ListenerId);

    /// First element matching the descriptor, if any.
    fn resolve_first(&self, selector: &str) -> Option<ElementId> {
        self.resolve_all(selector).into_iter().next()
    }
}
