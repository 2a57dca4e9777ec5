//! One mounted level of a context menu.
//!
//! A [`MenuInstance`] owns the runtime state of a single popup: the data item
//! it was opened for, its active entry and its open/leaf state. It translates
//! input into [`MenuEvent`]s but never mounts or closes other instances
//! itself; that is the job of the [`MenuChain`](super::MenuChain) that owns it.

use super::item::{ExecuteEvent, ItemStyle, ItemView, Menu, MenuItem};
use super::message::{Anchor, MenuEvent, MenuId};
use super::tracker::ActiveItemTracker;
use ctxmenu_core::{Event, EventSerial, InputEvent, Key, MenuOptions, SubscriptionId};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Lifecycle state of a menu instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuState {
    /// Not mounted, or torn down
    #[default]
    Closed,
    /// Open with an open descendant
    OpenNonLeaf,
    /// Open and deepest in its chain; receives keyboard input
    OpenLeaf,
}

impl MenuState {
    /// Whether the instance is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether the instance is the open leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::OpenLeaf)
    }
}

type Outbox<D> = Rc<RefCell<Vec<MenuEvent<D>>>>;

/// Runtime state of one open menu level.
pub struct MenuInstance<D: Clone + 'static> {
    id: MenuId,
    parent: Option<MenuId>,
    anchor: Option<Anchor>,
    menu: Rc<Menu<D>>,
    data: D,
    state: MenuState,
    tracker: ActiveItemTracker,
    options: MenuOptions,
    trigger: Option<EventSerial>,
    outbox: Outbox<D>,
    // Set only while this instance fires an item, so a menu mounted at two
    // levels does not relay the other level's executions.
    armed: Rc<Cell<bool>>,
    subscriptions: Vec<(usize, SubscriptionId)>,
}

impl<D: Clone + 'static> MenuInstance<D> {
    /// Mount `menu` for `data`. The instance starts as the open leaf.
    pub fn mount(id: MenuId, menu: Rc<Menu<D>>, data: D, options: MenuOptions) -> Self {
        let outbox: Outbox<D> = Rc::new(RefCell::new(Vec::new()));
        let armed = Rc::new(Cell::new(false));
        let mut subscriptions = Vec::with_capacity(menu.len());

        for (index, item) in menu.items().iter().enumerate() {
            item.bind(data.clone());
            let relay = Rc::clone(&outbox);
            let armed = Rc::clone(&armed);
            let weak: Weak<MenuItem<D>> = Rc::downgrade(item);
            let sid = item
                .execute_signal()
                .subscribe(move |e: &ExecuteEvent<D>| {
                    if !armed.get() {
                        return;
                    }
                    if let Some(menu_item) = weak.upgrade() {
                        relay.borrow_mut().push(MenuEvent::Execute {
                            event: e.event.clone(),
                            data: e.data.clone(),
                            menu_item,
                        });
                    }
                });
            subscriptions.push((index, sid));
        }

        let tracker = ActiveItemTracker::with_items(menu.activatable(&data));
        trace!(menu = %id, items = menu.len(), "mounted menu instance");

        Self {
            id,
            parent: None,
            anchor: None,
            menu,
            data,
            state: MenuState::OpenLeaf,
            tracker,
            options,
            trigger: None,
            outbox,
            armed,
            subscriptions,
        }
    }

    /// Attach to a parent entry.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.parent = Some(anchor.menu);
        self.anchor = Some(anchor);
        self
    }

    /// Remember the input that opened the menu, so the same input cannot close it.
    #[must_use]
    pub fn with_trigger(mut self, serial: EventSerial) -> Self {
        self.trigger = Some(serial);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Instance id.
    pub const fn id(&self) -> MenuId {
        self.id
    }

    /// Enclosing instance, if this is a nested menu.
    pub const fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    /// Parent entry this instance is attached to.
    pub const fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Menu being shown.
    pub const fn menu(&self) -> &Rc<Menu<D>> {
        &self.menu
    }

    /// Data item the menu was opened for.
    pub const fn data(&self) -> &D {
        &self.data
    }

    /// Current state.
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the instance is open.
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether the instance is the open leaf.
    pub const fn is_leaf(&self) -> bool {
        self.state.is_leaf()
    }

    /// Options the instance was mounted with.
    pub const fn options(&self) -> MenuOptions {
        self.options
    }

    /// Active entry index.
    pub const fn active_index(&self) -> Option<usize> {
        self.tracker.current()
    }

    /// Active entry.
    pub fn active_item(&self) -> Option<&Rc<MenuItem<D>>> {
        self.tracker.current().and_then(|i| self.menu.get(i))
    }

    /// Whether `serial` is the input that opened this menu.
    pub fn is_trigger(&self, serial: EventSerial) -> bool {
        self.trigger == Some(serial)
    }

    /// Number of live item subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether a deferred focus request for this instance should still run.
    pub const fn wants_focus(&self) -> bool {
        self.options.auto_focus && self.state.is_open()
    }

    /// Snapshot of visible entries for rendering.
    pub fn views(&self) -> Vec<ItemView> {
        let style = if self.options.use_alternate_styling {
            ItemStyle::Alternate
        } else {
            ItemStyle::Classic
        };
        let active = self.tracker.current();

        self.menu
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_visible(&self.data))
            .map(|(index, item)| {
                let enabled = item.is_enabled(&self.data);
                ItemView {
                    index,
                    label: if item.is_divider() {
                        String::new()
                    } else {
                        item.label(&self.data)
                    },
                    enabled,
                    active: enabled && active == Some(index),
                    divider: item.is_divider(),
                    passive: item.is_passive(),
                    has_sub_menu: item.has_sub_menu(),
                    style,
                }
            })
            .collect()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Handle a key press. Only the open leaf reacts.
    ///
    /// Presses aimed at an editable control are left untouched, flags included.
    pub fn handle_key(&mut self, event: &mut InputEvent) -> Vec<MenuEvent<D>> {
        let Some(key) = event.event.key_down() else {
            return Vec::new();
        };
        if !self.is_leaf() {
            trace!(menu = %self.id, ?key, "ignoring key on non-leaf menu");
            return Vec::new();
        }
        if event.target.is_editable() {
            trace!(menu = %self.id, ?key, "ignoring key aimed at editable control");
            return Vec::new();
        }

        match key {
            Key::Down => self.navigate(event, ActiveItemTracker::move_next),
            Key::Up => self.navigate(event, ActiveItemTracker::move_previous),
            Key::Home => self.navigate(event, ActiveItemTracker::move_first),
            Key::End => self.navigate(event, ActiveItemTracker::move_last),
            Key::Right => {
                event.cancel();
                if let Some(index) = self.tracker.current() {
                    if self.menu.get(index).is_some_and(|i| i.has_sub_menu()) {
                        self.request_sub_menu(index, Some(event.event.clone()));
                    }
                }
            }
            Key::Enter | Key::Space => {
                event.cancel();
                if let Some(index) = self.tracker.current() {
                    return self.select(index, event);
                }
            }
            Key::Escape | Key::Left => {
                event.cancel();
                self.push(MenuEvent::CloseLeafMenu {
                    except_root_menu: key == Key::Left,
                });
            }
            _ => {}
        }

        self.drain()
    }

    /// Choose entry `index` (click, Enter or Space).
    ///
    /// Entries with a nested menu request it, even when disabled; enabled
    /// entries without one execute and then request that the whole chain
    /// close. Divider clicks are left to bubble.
    pub fn select(&mut self, index: usize, event: &mut InputEvent) -> Vec<MenuEvent<D>> {
        if !self.is_open() {
            return Vec::new();
        }
        let Some(item) = self.menu.get(index).cloned() else {
            return Vec::new();
        };
        if item.is_divider() || !item.is_visible(&self.data) {
            return Vec::new();
        }
        if item.is_passive() {
            // Embedded controls keep their default action.
            event.stop_propagation();
            return Vec::new();
        }

        event.cancel();
        self.refresh();
        self.tracker.activate(index);

        if item.has_sub_menu() {
            self.request_sub_menu(index, Some(event.event.clone()));
        } else if item.is_enabled(&self.data) {
            self.armed.set(true);
            let fired = item.trigger_execute(&self.data, Some(&event.event));
            self.armed.set(false);
            if fired {
                self.push(MenuEvent::CloseAllMenus);
            }
        } else {
            trace!(menu = %self.id, index, "ignoring selection of disabled entry");
        }

        self.drain()
    }

    /// Pointer entered entry `index`.
    ///
    /// Entries with a nested menu open it even when disabled. Any other entry
    /// collapses submenus this instance has open.
    pub fn hover(&mut self, index: usize, event: &InputEvent) -> Vec<MenuEvent<D>> {
        if !self.is_open() {
            return Vec::new();
        }
        let Some(item) = self.menu.get(index).cloned() else {
            return Vec::new();
        };
        if item.is_divider() || item.is_passive() || !item.is_visible(&self.data) {
            return Vec::new();
        }

        self.refresh();
        self.tracker.activate(index);

        if item.has_sub_menu() {
            self.request_sub_menu(index, Some(event.event.clone()));
        } else if self.state == MenuState::OpenNonLeaf {
            self.push(MenuEvent::CloseSubMenus { menu: self.id });
        }

        self.drain()
    }

    /// A press reached the document without being consumed by any menu.
    pub fn handle_outside(&mut self, event: &InputEvent) -> Vec<MenuEvent<D>> {
        if !self.is_open() || !event.event.is_press() || event.is_propagation_stopped() {
            return Vec::new();
        }
        if self.is_trigger(event.serial) {
            trace!(menu = %self.id, serial = %event.serial, "ignoring the press that opened the menu");
            return Vec::new();
        }

        self.push(MenuEvent::CloseAllMenus);
        self.drain()
    }

    /// Tear the instance down and release its item subscriptions.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.state = MenuState::Closed;
        self.tracker.clear();
        self.outbox.borrow_mut().clear();
        self.release_subscriptions();
        trace!(menu = %self.id, "closed menu instance");
    }

    /// Promote to or demote from leaf. Closed instances stay closed.
    pub(crate) fn set_leaf(&mut self, leaf: bool) {
        if self.is_open() {
            self.state = if leaf {
                MenuState::OpenLeaf
            } else {
                MenuState::OpenNonLeaf
            };
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn navigate(
        &mut self,
        event: &mut InputEvent,
        step: fn(&mut ActiveItemTracker) -> Option<usize>,
    ) {
        event.prevent_default();
        self.refresh();
        step(&mut self.tracker);
    }

    fn refresh(&mut self) {
        self.tracker.refresh(self.menu.activatable(&self.data));
    }

    fn request_sub_menu(&self, index: usize, event: Option<Event>) {
        let Some(sub_menu) = self.menu.get(index).and_then(|i| i.nested().cloned()) else {
            return;
        };
        self.push(MenuEvent::OpenSubMenu {
            anchor: Anchor {
                menu: self.id,
                index,
            },
            sub_menu,
            event,
            data: self.data.clone(),
            parent: self.id,
        });
    }

    fn push(&self, event: MenuEvent<D>) {
        self.outbox.borrow_mut().push(event);
    }

    fn drain(&self) -> Vec<MenuEvent<D>> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    fn release_subscriptions(&mut self) {
        for (index, sid) in self.subscriptions.drain(..) {
            if let Some(item) = self.menu.get(index) {
                item.execute_signal().unsubscribe(sid);
            }
        }
    }
}

impl<D: Clone + 'static> Drop for MenuInstance<D> {
    fn drop(&mut self) {
        self.release_subscriptions();
    }
}

impl<D: Clone + fmt::Debug + 'static> fmt::Debug for MenuInstance<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuInstance")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("anchor", &self.anchor)
            .field("data", &self.data)
            .field("state", &self.state)
            .field("active", &self.tracker.current())
            .field("items", &self.menu.len())
            .finish_non_exhaustive()
    }
}
