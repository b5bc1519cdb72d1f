// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: directional focus navigation for menu-driven UIs.
//!
//! This crate adds a keyboard/gamepad-style focus layer on top of an
//! otherwise pointer-driven UI:
//!
//! - An **active-focus state machine** ([`ActiveFocus`]) holding at most
//!   one active item and emitting activation/deactivation signals
//!   ([`FocusChange`]) to registered [`FocusObserver`]s.
//! - A **directional navigator** ([`Navigator`]) that, given a movement
//!   direction, picks the next focusable item from a geometric snapshot of
//!   the current menu — filtering by half-plane and an approximate lane
//!   test, then choosing the nearest candidate with a tie band and a
//!   cross-axis tie-break.
//! - An **input-command table** ([`InputMap`]) mapping raw key codes to
//!   normalized commands; back/select are surfaced as [`NavRequest`]
//!   effects for the host to execute, keeping this crate free of menu
//!   mutation.
//!
//! The world is read through the [`ItemView`] snapshot trait. Bounds are
//! queried at movement time and never cached; only the focusable item list
//! is cached per `(menu, layout)`, and not at all in dynamic-menu mode.
//! With the `graph_adapter` feature, [`adapters::menu_graph`] builds an
//! [`ItemView`] directly from a `trellis_menu::Graph`.
//!
//! ## Minimal example
//!
//! Two buttons laid out left-to-right:
//!
//! ```rust
//! use kurbo::Rect;
//! use trellis_focus::{Direction, InputMap, ItemView, Navigator, NavigatorOptions};
//!
//! struct Row;
//!
//! impl ItemView<u32> for Row {
//!     fn current_menu(&self) -> &str {
//!         "home"
//!     }
//!     fn current_layout(&self) -> &str {
//!         "main"
//!     }
//!     fn focusable_items(&self) -> Vec<u32> {
//!         vec![1, 2]
//!     }
//!     fn bounds(&self, item: u32) -> Option<Rect> {
//!         let x = f64::from(item) * 20.0;
//!         Some(Rect::new(x, 0.0, x + 10.0, 10.0))
//!     }
//! }
//!
//! let mut navigator: Navigator<u32> =
//!     Navigator::new(InputMap::default(), NavigatorOptions::default());
//!
//! // The first move activates the first focusable item…
//! navigator.move_focus(Direction::Right, &Row);
//! assert_eq!(navigator.active(), Some(1));
//! // …and the next one walks right. There is no wraparound at the edge.
//! navigator.move_focus(Direction::Right, &Row);
//! assert_eq!(navigator.active(), Some(2));
//! navigator.move_focus(Direction::Right, &Row);
//! assert_eq!(navigator.active(), Some(2));
//! ```
//!
//! The item key type `K` is generic: any small, copyable handle works (for
//! example `trellis_menu::ItemId`, or an application-specific id).
//! Geometry is expressed in terms of [`kurbo::Rect`] in one stable
//! document coordinate space.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as
//!   `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for
//!   floating-point math; typically used when integrating into embedded
//!   or `no_std` environments.
//! - `graph_adapter`: enables the [`adapters::menu_graph`] module and
//!   pulls in `trellis_menu`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod active;
mod navigator;

#[cfg(feature = "graph_adapter")]
pub mod adapters;

pub use active::ActiveFocus;
pub use navigator::{Command, InputMap, ItemView, NavRequest, Navigator, NavigatorOptions};

/// Axis of a directional movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/right.
    Horizontal,
    /// Up/down.
    Vertical,
}

/// Direction of a focus movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller document y.
    Up,
    /// Toward larger document y.
    Down,
    /// Toward smaller document x.
    Left,
    /// Toward larger document x.
    Right,
}

impl Direction {
    /// Builds a direction from an axis and a sign (positive is
    /// right/down). Returns `None` for a zero sign.
    pub fn from_axis(axis: Axis, sign: i32) -> Option<Self> {
        match (axis, sign.signum()) {
            (Axis::Horizontal, 1) => Some(Self::Right),
            (Axis::Horizontal, -1) => Some(Self::Left),
            (Axis::Vertical, 1) => Some(Self::Down),
            (Axis::Vertical, -1) => Some(Self::Up),
            _ => None,
        }
    }

    /// The movement axis of this direction.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }
}

/// Why an item was activated or deactivated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusReason {
    /// Initial activation when a menu gains focus handling.
    FirstFocus,
    /// Pointer-driven activation.
    Hover,
    /// Explicit save/restore of a menu's focus.
    RestoreFocus,
    /// The owning menu is being left.
    LeaveMenu,
    /// Directional movement. See
    /// [`Navigator::move_focus`] for which directions report which reason.
    MoveLeft,
    /// Directional movement to the left reports this reason.
    MoveRight,
    /// Directional movement upward. Unused by the shipped direction
    /// mapping, which reports [`FocusReason::MoveLeft`] for upward moves.
    MoveUp,
    /// Directional movement downward.
    MoveDown,
}

/// Payload of an activation or deactivation signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusChange<K> {
    /// The item the signal is about.
    pub target: K,
    /// The counterpart item: the newly active item on deactivation, the
    /// previously active item on activation.
    pub other: Option<K>,
    /// Whether a pointer event triggered the change.
    pub is_pointer: bool,
    /// Why the change happened.
    pub reason: FocusReason,
}

/// Observer of activation/deactivation signals.
///
/// Register with [`ActiveFocus::add_observer`] (or
/// [`Navigator::add_observer`]). Both methods default to doing nothing so
/// implementations override only the side they care about.
pub trait FocusObserver<K> {
    /// An item became active.
    fn activated(&mut self, change: &FocusChange<K>) {
        let _ = change;
    }

    /// An item stopped being active.
    fn deactivated(&mut self, change: &FocusChange<K>) {
        let _ = change;
    }
}
