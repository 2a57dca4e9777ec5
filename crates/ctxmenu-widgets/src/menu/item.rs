//! Menu entry descriptors.
//!
//! A [`MenuItem`] is the static declaration of one entry: how to label it,
//! when it is enabled or visible, whether it is a divider or a passive entry,
//! and which nested [`Menu`] it opens. Predicates are expressed as a
//! [`Guard`], which is either a constant or a function of the data item the
//! menu was opened for.

use ctxmenu_core::{Event, Signal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A boolean that is either fixed or computed from the menu's data item.
pub enum Guard<D> {
    /// Constant value
    Const(bool),
    /// Predicate over the data item
    When(Rc<dyn Fn(&D) -> bool>),
}

impl<D> Guard<D> {
    /// Build a predicate guard.
    pub fn when(predicate: impl Fn(&D) -> bool + 'static) -> Self {
        Self::When(Rc::new(predicate))
    }

    /// Evaluate against a data item.
    pub fn evaluate(&self, data: &D) -> bool {
        match self {
            Self::Const(value) => *value,
            Self::When(predicate) => predicate(data),
        }
    }
}

impl<D> Default for Guard<D> {
    fn default() -> Self {
        Self::Const(true)
    }
}

impl<D> Clone for Guard<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Const(value) => Self::Const(*value),
            Self::When(predicate) => Self::When(Rc::clone(predicate)),
        }
    }
}

impl<D> From<bool> for Guard<D> {
    fn from(value: bool) -> Self {
        Self::Const(value)
    }
}

impl<D> fmt::Debug for Guard<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Entry label: fixed text or produced from the data item.
pub enum Label<D> {
    /// Fixed text
    Text(String),
    /// Produced per data item
    Dynamic(Rc<dyn Fn(&D) -> String>),
}

impl<D> Label<D> {
    /// Render the label for a data item.
    pub fn render(&self, data: &D) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Dynamic(produce) => produce(data),
        }
    }
}

impl<D> Clone for Label<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Text(text) => Self::Text(text.clone()),
            Self::Dynamic(produce) => Self::Dynamic(Rc::clone(produce)),
        }
    }
}

impl<D> fmt::Debug for Label<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Payload of an item's execute signal.
#[derive(Debug, Clone)]
pub struct ExecuteEvent<D> {
    /// Data item the menu was opened for
    pub data: D,
    /// Input that chose the item, if any
    pub event: Option<Event>,
}

/// Declaration of a single menu entry.
pub struct MenuItem<D> {
    label: Label<D>,
    enabled: Guard<D>,
    visible: Guard<D>,
    divider: bool,
    passive: bool,
    sub_menu: Option<Rc<Menu<D>>>,
    execute: Signal<ExecuteEvent<D>>,
    current_item: RefCell<Option<D>>,
}

impl<D: Clone + 'static> MenuItem<D> {
    /// Create an entry with a fixed label.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_label(Label::Text(label.into()))
    }

    /// Create an entry whose label is produced from the data item.
    pub fn dynamic(label: impl Fn(&D) -> String + 'static) -> Self {
        Self::with_label(Label::Dynamic(Rc::new(label)))
    }

    /// Create a divider.
    pub fn divider() -> Self {
        let mut item = Self::with_label(Label::Text(String::new()));
        item.divider = true;
        item
    }

    fn with_label(label: Label<D>) -> Self {
        Self {
            label,
            enabled: Guard::default(),
            visible: Guard::default(),
            divider: false,
            passive: false,
            sub_menu: None,
            execute: Signal::new(),
            current_item: RefCell::new(None),
        }
    }

    /// Set the enabled guard.
    #[must_use]
    pub fn enabled(mut self, enabled: impl Into<Guard<D>>) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Enable the entry only when `predicate` holds for the data item.
    #[must_use]
    pub fn enabled_when(self, predicate: impl Fn(&D) -> bool + 'static) -> Self {
        self.enabled(Guard::when(predicate))
    }

    /// Set the visibility guard.
    #[must_use]
    pub fn visible(mut self, visible: impl Into<Guard<D>>) -> Self {
        self.visible = visible.into();
        self
    }

    /// Show the entry only when `predicate` holds for the data item.
    #[must_use]
    pub fn visible_when(self, predicate: impl Fn(&D) -> bool + 'static) -> Self {
        self.visible(Guard::when(predicate))
    }

    /// Mark as passive: rendered but never clickable or executable.
    #[must_use]
    pub const fn passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    /// Attach a nested menu.
    #[must_use]
    pub fn sub_menu(mut self, menu: impl Into<Rc<Menu<D>>>) -> Self {
        self.sub_menu = Some(menu.into());
        self
    }

    /// Subscribe to executions of this entry.
    #[must_use]
    pub fn on_execute(self, handler: impl Fn(&ExecuteEvent<D>) + 'static) -> Self {
        // Handler subscriptions live as long as the item.
        let _ = self.execute.subscribe(handler);
        self
    }

    /// Render the label.
    pub fn label(&self, data: &D) -> String {
        self.label.render(data)
    }

    /// Whether the entry is enabled for `data`.
    pub fn is_enabled(&self, data: &D) -> bool {
        self.enabled.evaluate(data)
    }

    /// Whether the entry is visible for `data`.
    pub fn is_visible(&self, data: &D) -> bool {
        self.visible.evaluate(data)
    }

    /// Whether this is a divider.
    pub const fn is_divider(&self) -> bool {
        self.divider
    }

    /// Whether this is a passive entry.
    pub const fn is_passive(&self) -> bool {
        self.passive
    }

    /// Nested menu, if any.
    pub const fn nested(&self) -> Option<&Rc<Menu<D>>> {
        self.sub_menu.as_ref()
    }

    /// Whether the entry opens a nested menu.
    pub const fn has_sub_menu(&self) -> bool {
        self.sub_menu.is_some()
    }

    /// Whether keyboard navigation may land on the entry for `data`.
    pub fn is_activatable(&self, data: &D) -> bool {
        !self.divider && !self.passive && self.is_visible(data) && self.is_enabled(data)
    }

    /// The execute signal, for subscribing and unsubscribing.
    pub const fn execute_signal(&self) -> &Signal<ExecuteEvent<D>> {
        &self.execute
    }

    /// Bind the data item of the menu opening this entry belongs to.
    pub fn bind(&self, data: D) {
        *self.current_item.borrow_mut() = Some(data);
    }

    /// Data item bound by the most recent opening.
    pub fn current_item(&self) -> Option<D> {
        self.current_item.borrow().clone()
    }

    /// Fire the execute signal if the entry is enabled for `data`.
    ///
    /// Returns whether the signal fired.
    pub fn trigger_execute(&self, data: &D, event: Option<&Event>) -> bool {
        if self.divider || self.passive || !self.is_enabled(data) {
            return false;
        }
        self.execute.emit(&ExecuteEvent {
            data: data.clone(),
            event: event.cloned(),
        });
        true
    }
}

impl<D> fmt::Debug for MenuItem<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("divider", &self.divider)
            .field("passive", &self.passive)
            .field("sub_menu", &self.sub_menu.as_ref().map(|m| m.items.len()))
            .finish_non_exhaustive()
    }
}

/// Ordered list of entries. Insertion order is display and navigation order.
pub struct Menu<D> {
    items: Vec<Rc<MenuItem<D>>>,
}

impl<D: Clone + 'static> Menu<D> {
    /// Create an empty menu.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an entry.
    #[must_use]
    pub fn item(mut self, item: MenuItem<D>) -> Self {
        self.items.push(Rc::new(item));
        self
    }

    /// Add a divider.
    #[must_use]
    pub fn divider(self) -> Self {
        self.item(MenuItem::divider())
    }

    /// All entries.
    pub fn items(&self) -> &[Rc<MenuItem<D>>] {
        &self.items
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Rc<MenuItem<D>>> {
        self.items.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Activatable flag of every entry for `data`, in order.
    pub fn activatable(&self, data: &D) -> Vec<bool> {
        self.items.iter().map(|i| i.is_activatable(data)).collect()
    }
}

impl<D: Clone + 'static> Default for Menu<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + 'static> FromIterator<MenuItem<D>> for Menu<D> {
    fn from_iter<I: IntoIterator<Item = MenuItem<D>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Rc::new).collect(),
        }
    }
}

impl<D> fmt::Debug for Menu<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu").field("items", &self.items).finish()
    }
}

/// Styling variant handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemStyle {
    /// Default styling
    #[default]
    Classic,
    /// Alternate styling
    Alternate,
}

/// Snapshot of one visible entry, for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// Index in the menu's entry list
    pub index: usize,
    /// Rendered label
    pub label: String,
    /// Enabled for the current data item
    pub enabled: bool,
    /// Logically active
    pub active: bool,
    /// Divider entry
    pub divider: bool,
    /// Passive entry
    pub passive: bool,
    /// Opens a nested menu
    pub has_sub_menu: bool,
    /// Styling variant
    pub style: ItemStyle,
}
