//! Owner of the open menu chain.
//!
//! At most one chain is open at a time. The chain is a stack of
//! [`MenuInstance`]s from root to leaf; the top of the stack is always the
//! leaf and the only instance that receives keyboard input. Instances never
//! mount or close each other: they emit [`MenuEvent`]s and the chain applies
//! them.

use super::instance::MenuInstance;
use super::item::Menu;
use super::message::{Anchor, MenuEvent, MenuId};
use ctxmenu_core::{DeferredQueue, InputEvent, MenuOptions};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Coordinator holding the open chain of menu instances.
pub struct MenuChain<D: Clone + 'static> {
    options: MenuOptions,
    stack: Vec<MenuInstance<D>>,
    next_id: u64,
    focus: DeferredQueue<MenuId>,
}

impl<D: Clone + 'static> MenuChain<D> {
    /// Create an empty chain whose instances use `options`.
    pub const fn new(options: MenuOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            next_id: 0,
            focus: DeferredQueue::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Options injected into every mounted instance.
    pub const fn options(&self) -> MenuOptions {
        self.options
    }

    /// Whether any menu is open.
    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of open levels.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Root instance.
    pub fn root(&self) -> Option<&MenuInstance<D>> {
        self.stack.first()
    }

    /// Leaf instance.
    pub fn leaf(&self) -> Option<&MenuInstance<D>> {
        self.stack.last()
    }

    /// Open instance with `id`.
    pub fn get(&self, id: MenuId) -> Option<&MenuInstance<D>> {
        self.stack.iter().find(|m| m.id() == id)
    }

    /// Ids of open instances, root first.
    pub fn ids(&self) -> Vec<MenuId> {
        self.stack.iter().map(MenuInstance::id).collect()
    }

    /// Number of focus requests waiting for [`tick`](Self::tick).
    pub fn pending_focus(&self) -> usize {
        self.focus.pending_count()
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Open `menu` for `data` as a new root, closing any open chain first.
    ///
    /// `trigger` is the input that opened the menu; the same input reaching
    /// [`document_event`](Self::document_event) will not close it.
    pub fn open(
        &mut self,
        menu: impl Into<Rc<Menu<D>>>,
        data: D,
        trigger: &InputEvent,
    ) -> MenuId {
        if self.is_open() {
            debug!(depth = self.depth(), "replacing open menu chain");
            self.close_all();
        }

        let id = self.allocate_id();
        let instance = MenuInstance::mount(id, menu.into(), data, self.options)
            .with_trigger(trigger.serial);
        self.stack.push(instance);
        self.request_focus(id);

        debug!(menu = %id, trigger = %trigger.serial, "opened menu chain");
        id
    }

    /// Route a key press to the leaf.
    pub fn handle_key(&mut self, event: &mut InputEvent) -> Vec<MenuEvent<D>> {
        let events = match self.stack.last_mut() {
            Some(leaf) => leaf.handle_key(event),
            None => return Vec::new(),
        };
        self.apply(&events);
        events
    }

    /// Pointer entered entry `index` of `menu`.
    pub fn hover_item(
        &mut self,
        menu: MenuId,
        index: usize,
        event: &InputEvent,
    ) -> Vec<MenuEvent<D>> {
        let events = match self.instance_mut(menu) {
            Some(instance) => instance.hover(index, event),
            None => return Vec::new(),
        };
        self.apply(&events);
        events
    }

    /// Entry `index` of `menu` was clicked.
    pub fn click_item(
        &mut self,
        menu: MenuId,
        index: usize,
        event: &mut InputEvent,
    ) -> Vec<MenuEvent<D>> {
        let events = match self.instance_mut(menu) {
            Some(instance) => instance.select(index, event),
            None => return Vec::new(),
        };
        self.apply(&events);
        events
    }

    /// A press bubbled to the document without being consumed by a menu.
    pub fn document_event(&mut self, event: &InputEvent) -> Vec<MenuEvent<D>> {
        let events = match self.stack.first_mut() {
            Some(root) => root.handle_outside(event),
            None => return Vec::new(),
        };
        self.apply(&events);
        events
    }

    /// Close the leaf.
    ///
    /// With `except_root_menu` the leaf is closed only when it is not the
    /// root, and focus returns to the new leaf. Without it the whole chain
    /// closes.
    pub fn close_leaf(&mut self, except_root_menu: bool) {
        if !except_root_menu {
            self.close_all();
            return;
        }
        if self.depth() <= 1 {
            trace!("keeping root menu open");
            return;
        }
        self.truncate(self.depth() - 1);
        self.reassign_leaf();
        if let Some(leaf) = self.leaf().map(MenuInstance::id) {
            self.request_focus(leaf);
        }
    }

    /// Close every descendant of `menu`, making it the leaf.
    pub fn close_sub_menus(&mut self, menu: MenuId) {
        let Some(pos) = self.position(menu) else {
            return;
        };
        if pos + 1 < self.depth() {
            self.truncate(pos + 1);
            self.reassign_leaf();
        }
    }

    /// Tear down the whole chain.
    pub fn close_all(&mut self) {
        if !self.is_open() {
            return;
        }
        let depth = self.depth();
        self.truncate(0);
        debug!(depth, "closed menu chain");
    }

    /// Run deferred focus requests queued since the last tick.
    ///
    /// Returns the instances that should take input focus now, each at most
    /// once. Requests for instances closed in the meantime are dropped.
    pub fn tick(&mut self) -> Vec<MenuId> {
        self.focus
            .flush()
            .into_iter()
            .filter_map(|d| {
                if self.get(d.target).is_some_and(MenuInstance::wants_focus) {
                    Some(d.target)
                } else {
                    trace!(menu = %d.target, queued_at = d.queued_at, "dropping stale focus request");
                    None
                }
            })
            .collect()
    }

    // =========================================================================
    // Event application
    // =========================================================================

    fn apply(&mut self, events: &[MenuEvent<D>]) {
        for event in events {
            trace!(event = event.kind(), "applying menu event");
            match event {
                MenuEvent::Execute { .. } => {}
                MenuEvent::OpenSubMenu {
                    anchor,
                    sub_menu,
                    data,
                    parent,
                    ..
                } => self.open_sub_menu(*parent, *anchor, sub_menu, data),
                MenuEvent::CloseSubMenus { menu } => self.close_sub_menus(*menu),
                MenuEvent::CloseLeafMenu { except_root_menu } => {
                    self.close_leaf(*except_root_menu);
                }
                MenuEvent::CloseAllMenus => self.close_all(),
            }
        }
    }

    fn open_sub_menu(
        &mut self,
        parent: MenuId,
        anchor: Anchor,
        sub_menu: &Rc<Menu<D>>,
        data: &D,
    ) {
        let Some(pos) = self.position(parent) else {
            trace!(menu = %parent, "submenu requested by a closed menu");
            return;
        };

        if let Some(child) = self.stack.get(pos + 1) {
            if child.anchor() == Some(anchor) && Rc::ptr_eq(child.menu(), sub_menu) {
                trace!(menu = %child.id(), "submenu already open");
                return;
            }
        }

        self.truncate(pos + 1);
        let id = self.allocate_id();
        let child = MenuInstance::mount(id, Rc::clone(sub_menu), data.clone(), self.options)
            .with_anchor(anchor);
        self.stack.push(child);
        self.reassign_leaf();
        self.request_focus(id);

        debug!(menu = %id, parent = %parent, index = anchor.index, depth = self.depth(), "opened submenu");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn instance_mut(&mut self, id: MenuId) -> Option<&mut MenuInstance<D>> {
        self.stack.iter_mut().find(|m| m.id() == id)
    }

    fn position(&self, id: MenuId) -> Option<usize> {
        self.stack.iter().position(|m| m.id() == id)
    }

    fn allocate_id(&mut self) -> MenuId {
        let id = MenuId(self.next_id);
        self.next_id += 1;
        id
    }

    fn request_focus(&mut self, id: MenuId) {
        if self.options.auto_focus && !self.focus.queue(id) {
            trace!(menu = %id, "focus already requested");
        }
    }

    /// Close instances from the top down until `len` remain.
    fn truncate(&mut self, len: usize) {
        while self.stack.len() > len {
            if let Some(mut instance) = self.stack.pop() {
                instance.close();
                trace!(menu = %instance.id(), "closed menu level");
            }
        }
    }

    fn reassign_leaf(&mut self) {
        let last = self.stack.len().saturating_sub(1);
        for (i, instance) in self.stack.iter_mut().enumerate() {
            instance.set_leaf(i == last);
        }
        if let Some(leaf) = self.stack.last() {
            trace!(menu = %leaf.id(), "leaf reassigned");
        }
    }
}

impl<D: Clone + 'static> Default for MenuChain<D> {
    fn default() -> Self {
        Self::new(MenuOptions::default())
    }
}

impl<D: Clone + fmt::Debug + 'static> fmt::Debug for MenuChain<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuChain")
            .field("options", &self.options)
            .field("stack", &self.stack)
            .field("pending_focus", &self.focus.pending_count())
            .finish_non_exhaustive()
    }
}
