//! Events a menu instance emits to whoever mounted it.

use super::item::{Menu, MenuItem};
use ctxmenu_core::Event;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Identifies one mounted menu instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuId(pub u64);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Where a nested menu should be attached: an entry of a mounted menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// Menu owning the entry
    pub menu: MenuId,
    /// Index of the entry
    pub index: usize,
}

/// Lifecycle and action events emitted by a [`MenuInstance`](super::MenuInstance).
///
/// Within one handler call the events are ordered: an `Execute` always comes
/// before the `CloseAllMenus` it causes.
pub enum MenuEvent<D> {
    /// An entry without a nested menu was chosen.
    Execute {
        /// Input that chose the entry
        event: Option<Event>,
        /// Data item the menu was opened for
        data: D,
        /// The chosen entry
        menu_item: Rc<MenuItem<D>>,
    },
    /// Mount `sub_menu` as a child of `parent`, attached at `anchor`.
    OpenSubMenu {
        /// Entry the child attaches to
        anchor: Anchor,
        /// Menu to mount
        sub_menu: Rc<Menu<D>>,
        /// Input that requested the child
        event: Option<Event>,
        /// Data item passed down to the child
        data: D,
        /// Instance requesting the child
        parent: MenuId,
    },
    /// Close every descendant of `menu`, making it the leaf again.
    CloseSubMenus {
        /// Instance to keep open
        menu: MenuId,
    },
    /// Close the leaf. With `except_root_menu` false the whole chain closes.
    CloseLeafMenu {
        /// Keep the root open when the leaf is the root
        except_root_menu: bool,
    },
    /// Tear down the entire chain.
    CloseAllMenus,
}

impl<D> MenuEvent<D> {
    /// Short name of the variant, for logs and assertions.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Execute { .. } => "execute",
            Self::OpenSubMenu { .. } => "open_sub_menu",
            Self::CloseSubMenus { .. } => "close_sub_menus",
            Self::CloseLeafMenu { .. } => "close_leaf_menu",
            Self::CloseAllMenus => "close_all_menus",
        }
    }
}

impl<D: Clone> Clone for MenuEvent<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Execute {
                event,
                data,
                menu_item,
            } => Self::Execute {
                event: event.clone(),
                data: data.clone(),
                menu_item: Rc::clone(menu_item),
            },
            Self::OpenSubMenu {
                anchor,
                sub_menu,
                event,
                data,
                parent,
            } => Self::OpenSubMenu {
                anchor: *anchor,
                sub_menu: Rc::clone(sub_menu),
                event: event.clone(),
                data: data.clone(),
                parent: *parent,
            },
            Self::CloseSubMenus { menu } => Self::CloseSubMenus { menu: *menu },
            Self::CloseLeafMenu { except_root_menu } => Self::CloseLeafMenu {
                except_root_menu: *except_root_menu,
            },
            Self::CloseAllMenus => Self::CloseAllMenus,
        }
    }
}

impl<D: Clone + fmt::Debug + 'static> fmt::Debug for MenuEvent<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute {
                event,
                data,
                menu_item,
            } => f
                .debug_struct("Execute")
                .field("event", event)
                .field("data", data)
                .field("menu_item", menu_item)
                .finish(),
            Self::OpenSubMenu {
                anchor,
                sub_menu,
                event,
                data,
                parent,
            } => f
                .debug_struct("OpenSubMenu")
                .field("anchor", anchor)
                .field("sub_menu_len", &sub_menu.items().len())
                .field("event", event)
                .field("data", data)
                .field("parent", parent)
                .finish(),
            Self::CloseSubMenus { menu } => {
                f.debug_struct("CloseSubMenus").field("menu", menu).finish()
            }
            Self::CloseLeafMenu { except_root_menu } => f
                .debug_struct("CloseLeafMenu")
                .field("except_root_menu", except_root_menu)
                .finish(),
            Self::CloseAllMenus => f.write_str("CloseAllMenus"),
        }
    }
}
