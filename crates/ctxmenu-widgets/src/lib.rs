//! Context menu widgets for the ctxmenu framework.
//!
//! A menu is opened for a data item, navigated with the pointer or keyboard,
//! and may open nested submenus. See [`MenuChain`] for the entry point.

pub mod menu;

pub use menu::{
    ActiveItemTracker, Anchor, ExecuteEvent, Guard, ItemStyle, ItemView, Label, Menu, MenuChain,
    MenuEvent, MenuId, MenuInstance, MenuItem, MenuState,
};
