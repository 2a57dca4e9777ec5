//! Input events routed to menu instances.
//!
//! A raw [`Event`] describes what happened. An [`InputEvent`] wraps it with
//! routing context: which kind of element it originated from, a serial that
//! identifies the physical input, and the default-prevention and propagation
//! flags a handler may set while the event bubbles.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Context menu requested (secondary click or menu key)
    ContextMenu {
        /// Position of the request
        position: Point,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Pointer entered element bounds
    MouseEnter,
    /// Pointer left element bounds
    MouseLeave,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character
    Char(char),

    // Control keys
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Space key
    Space,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,

    // Arrow keys
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl Event {
    /// Check if this event counts as a press anywhere on the surface.
    ///
    /// Only presses can dismiss an open menu from outside.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self, Self::MouseDown { .. } | Self::ContextMenu { .. })
    }

    /// Get the key if this is a key-down event.
    #[must_use]
    pub const fn key_down(&self) -> Option<Key> {
        match self {
            Self::KeyDown { key } => Some(*key),
            _ => None,
        }
    }
}

/// Kind of element an input originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetKind {
    /// The document or window itself
    #[default]
    Document,
    /// A menu popup container
    Menu,
    /// A single entry inside a menu popup
    MenuItem,
    /// Single-line text entry
    TextInput,
    /// Multi-line text entry
    TextArea,
    /// Option picker
    Select,
    /// Anything else
    Other,
}

/// The element an input was dispatched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventTarget {
    /// Element kind
    pub kind: TargetKind,
    /// Whether the element is an editable region regardless of its kind
    pub content_editable: bool,
}

impl EventTarget {
    /// Create a target of the given kind.
    #[must_use]
    pub const fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            content_editable: false,
        }
    }

    /// Mark the target as an editable region.
    #[must_use]
    pub const fn content_editable(mut self, editable: bool) -> Self {
        self.content_editable = editable;
        self
    }

    /// Check if the target accepts free-text entry.
    ///
    /// Navigation keys aimed at such a target belong to the control, not the menu.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.content_editable
            || matches!(
                self.kind,
                TargetKind::TextInput | TargetKind::TextArea | TargetKind::Select
            )
    }
}

/// Identifies one physical input as it travels through several handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventSerial(pub u64);

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

impl EventSerial {
    /// Allocate a fresh serial.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SERIAL.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for EventSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event in flight, with routing context and handler flags.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// The raw event
    pub event: Event,
    /// Where the event was dispatched
    pub target: EventTarget,
    /// Serial of the physical input
    pub serial: EventSerial,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl InputEvent {
    /// Wrap an event targeted at the document, with a fresh serial.
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self {
            event,
            target: EventTarget::default(),
            serial: EventSerial::next(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Shorthand for a key-down event.
    #[must_use]
    pub fn key(key: Key) -> Self {
        Self::new(Event::KeyDown { key })
    }

    /// Shorthand for a left click at a position.
    #[must_use]
    pub fn click(position: Point) -> Self {
        Self::new(Event::MouseDown {
            position,
            button: MouseButton::Left,
        })
    }

    /// Set the dispatch target.
    #[must_use]
    pub const fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    /// Reuse the serial of an earlier dispatch of the same input.
    #[must_use]
    pub const fn with_serial(mut self, serial: EventSerial) -> Self {
        self.serial = serial;
        self
    }

    /// Suppress the platform's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching outer handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Prevent default and stop propagation.
    pub fn cancel(&mut self) {
        self.prevent_default();
        self.stop_propagation();
    }

    /// Whether a handler prevented the default action.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a handler stopped propagation.
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl From<Event> for InputEvent {
    fn from(event: Event) -> Self {
        Self::new(event)
    }
}
