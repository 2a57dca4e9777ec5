//! Core types for the ctxmenu context menu framework.
//!
//! This crate provides the plumbing menus are built on:
//! - Input events and routing flags: [`Event`], [`InputEvent`], [`EventTarget`]
//! - Multicast signals: [`Signal`]
//! - Deferred lifecycle work: [`DeferredQueue`]
//! - Configuration: [`MenuOptions`]

mod error;
mod event;
mod geometry;
pub mod lifecycle;
mod options;
pub mod signal;

pub use error::{Error, Result};
pub use event::{Event, EventSerial, EventTarget, InputEvent, Key, MouseButton, TargetKind};
pub use geometry::Point;
pub use lifecycle::{Deferred, DeferredQueue};
pub use options::MenuOptions;
pub use signal::{Signal, SubscriptionId};
