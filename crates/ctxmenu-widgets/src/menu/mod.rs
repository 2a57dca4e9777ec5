//! Nested context menu.
//!
//! Declare entries with [`MenuItem`] and [`Menu`], then open them through a
//! [`MenuChain`], which owns every mounted [`MenuInstance`] and routes input
//! to them.

mod chain;
mod instance;
mod item;
mod message;
mod tracker;

pub use chain::MenuChain;
pub use instance::{MenuInstance, MenuState};
pub use item::{ExecuteEvent, Guard, ItemStyle, ItemView, Label, Menu, MenuItem};
pub use message::{Anchor, MenuEvent, MenuId};
pub use tracker::ActiveItemTracker;
