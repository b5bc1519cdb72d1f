// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional navigation over a snapshot of focusable items.
//!
//! The navigator owns the [`ActiveFocus`] machine, an input-command table,
//! and a cache of the current menu/layout's focusable items. It reads the
//! world through an [`ItemView`] snapshot passed into every call and never
//! writes anything but its own focus state; navigation side effects (going
//! back, replaying a click) are returned to the host as [`NavRequest`]
//! values instead of being performed here.
//!
//! ## Movement
//!
//! A directional move from an active item works on bounding boxes queried
//! at call time (never cached):
//!
//! 1. keep candidates strictly on the far side of the active item along
//!    the movement axis,
//! 2. keep candidates whose cross-axis leading-edge offset from the active
//!    item is at most the larger of the two extents (an approximate "lane"
//!    test, not exact intersection),
//! 3. order by leading-edge distance along the movement axis, treating
//!    distances within half a coordinate unit as equal and breaking such
//!    ties by the smaller cross-axis offset,
//! 4. activate the nearest survivor; with no survivor the active item is
//!    left alone — there is no wraparound.
//!
//! With no active item, a move activates the first focusable item instead.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::active::ActiveFocus;
use crate::{Axis, Direction, FocusObserver, FocusReason};

/// Read-only snapshot of the current menu's focusable items.
///
/// All bounds are expected in one stable document coordinate space. The
/// navigator queries bounds on demand for every movement and never caches
/// them; only the item *list* is cached, keyed by `(menu, layout)`.
pub trait ItemView<K> {
    /// Id of the current menu.
    fn current_menu(&self) -> &str;
    /// Name of the current menu's active layout.
    fn current_layout(&self) -> &str;
    /// Focusable items of the current menu/layout, in display order.
    fn focusable_items(&self) -> Vec<K>;
    /// Bounds of `item`, or `None` while it is not displayed.
    fn bounds(&self, item: K) -> Option<Rect>;
}

/// Raw key-code table mapping input to navigation commands.
///
/// Held as instance state of the navigator; there is no process-wide
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputMap {
    /// Codes triggering back navigation.
    pub back: Vec<u32>,
    /// Codes triggering selection of the active item.
    pub select: Vec<u32>,
    /// Codes moving focus up.
    pub up: Vec<u32>,
    /// Codes moving focus down.
    pub down: Vec<u32>,
    /// Codes moving focus left.
    pub left: Vec<u32>,
    /// Codes moving focus right.
    pub right: Vec<u32>,
}

impl InputMap {
    /// Resolves a raw key code to a command.
    pub fn command_for(&self, code: u32) -> Option<Command> {
        if self.back.contains(&code) {
            Some(Command::Back)
        } else if self.select.contains(&code) {
            Some(Command::Select)
        } else if self.up.contains(&code) {
            Some(Command::Up)
        } else if self.down.contains(&code) {
            Some(Command::Down)
        } else if self.left.contains(&code) {
            Some(Command::Left)
        } else if self.right.contains(&code) {
            Some(Command::Right)
        } else {
            None
        }
    }
}

/// Normalized input command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Navigate back through the menu history.
    Back,
    /// Select (click) the active item.
    Select,
    /// Move focus up.
    Up,
    /// Move focus down.
    Down,
    /// Move focus left.
    Left,
    /// Move focus right.
    Right,
}

/// Navigation side effect for the host to execute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavRequest<K> {
    /// Invoke back navigation on the menu graph.
    Back,
    /// Replay a synthetic activation (click) on the given item.
    Activate(K),
}

/// Navigator configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigatorOptions {
    /// Activate the first focusable item when the navigator starts.
    pub first_focus: bool,
    /// Items change at runtime: query the view on every call instead of
    /// caching the item list.
    pub dynamic_menu: bool,
}

#[derive(Clone, Debug)]
struct CachedItems<K> {
    menu: String,
    layout: String,
    items: Vec<K>,
}

/// Directional input navigator.
#[derive(Debug)]
pub struct Navigator<K> {
    focus: ActiveFocus<K>,
    input: InputMap,
    options: NavigatorOptions,
    cache: Option<CachedItems<K>>,
}

impl<K: Copy + Eq> Navigator<K> {
    /// Creates a navigator with the given input table and options.
    pub fn new(input: InputMap, options: NavigatorOptions) -> Self {
        Self {
            focus: ActiveFocus::new(),
            input,
            options,
            cache: None,
        }
    }

    /// The focus state machine.
    pub fn focus(&self) -> &ActiveFocus<K> {
        &self.focus
    }

    /// Mutable access to the focus state machine.
    pub fn focus_mut(&mut self) -> &mut ActiveFocus<K> {
        &mut self.focus
    }

    /// The active item, if any.
    pub fn active(&self) -> Option<K> {
        self.focus.active()
    }

    /// Registers an observer of activation/deactivation signals.
    pub fn add_observer(&mut self, observer: Box<dyn FocusObserver<K>>) {
        self.focus.add_observer(observer);
    }

    /// Applies the `first_focus` option; call once after wiring.
    pub fn initial_focus(&mut self, view: &impl ItemView<K>) -> bool {
        if self.options.first_focus {
            self.focus_first(view, false, FocusReason::FirstFocus)
        } else {
            false
        }
    }

    /// Resolves a raw key code and executes the resulting command.
    pub fn handle_key(&mut self, code: u32, view: &impl ItemView<K>) -> Option<NavRequest<K>> {
        self.input
            .command_for(code)
            .and_then(|command| self.handle_command(command, view))
    }

    /// Executes a normalized command.
    ///
    /// Movement is handled internally; `Back` and `Select` are returned as
    /// [`NavRequest`]s for the host (`Select` resolves to the active item
    /// and is dropped when nothing is active).
    pub fn handle_command(
        &mut self,
        command: Command,
        view: &impl ItemView<K>,
    ) -> Option<NavRequest<K>> {
        let direction = match command {
            Command::Back => return Some(NavRequest::Back),
            Command::Select => return self.focus.active().map(NavRequest::Activate),
            Command::Up => Direction::Up,
            Command::Down => Direction::Down,
            Command::Left => Direction::Left,
            Command::Right => Direction::Right,
        };
        self.move_focus(direction, view);
        None
    }

    /// Moves along an axis; the sign picks the direction (positive is
    /// right/down). A zero sign does nothing.
    pub fn move_along(&mut self, axis: Axis, sign: i32, view: &impl ItemView<K>) -> bool {
        Direction::from_axis(axis, sign).is_some_and(|direction| self.move_focus(direction, view))
    }

    /// Moves the active focus in `direction`.
    ///
    /// Returns `true` when the active item changed. With no active item the
    /// first focusable item is activated instead, carrying the same reason
    /// a real move would.
    pub fn move_focus(&mut self, direction: Direction, view: &impl ItemView<K>) -> bool {
        let reason = move_reason(direction);
        let items = self.items(view);

        let Some(active) = self.focus.active() else {
            let Some(&first) = items.first() else {
                return false;
            };
            return self
                .focus
                .change(Some(first), view.current_menu(), false, reason);
        };
        let Some(origin) = view.bounds(active) else {
            log::debug!("active item has no bounds, ignoring move");
            return false;
        };

        let mut candidates: SmallVec<[(K, Rect); 16]> = items
            .iter()
            .filter(|&&item| item != active)
            .filter_map(|&item| view.bounds(item).map(|rect| (item, rect)))
            .filter(|(_, rect)| in_half_plane(direction, &origin, rect))
            .filter(|(_, rect)| in_lane(direction, &origin, rect))
            .collect();
        candidates.sort_by(|a, b| compare_candidates(direction, &origin, &a.1, &b.1));

        match candidates.first() {
            Some(&(next, _)) => self
                .focus
                .change(Some(next), view.current_menu(), false, reason),
            None => false,
        }
    }

    /// Pointer-driven activation (for example on pointer-enter).
    pub fn hover(&mut self, item: K, view: &impl ItemView<K>) -> bool {
        self.focus
            .change(Some(item), view.current_menu(), true, FocusReason::Hover)
    }

    /// Activates the first focusable item of the current menu/layout.
    pub fn focus_first(
        &mut self,
        view: &impl ItemView<K>,
        is_pointer: bool,
        reason: FocusReason,
    ) -> bool {
        let items = self.items(view);
        let Some(&first) = items.first() else {
            return false;
        };
        self.focus
            .change(Some(first), view.current_menu(), is_pointer, reason)
    }

    /// Activates `item` in `menu`, discarding any last-active marker the
    /// menu held.
    pub fn set_focus_on(
        &mut self,
        menu: &str,
        item: K,
        is_pointer: bool,
        reason: FocusReason,
    ) -> bool {
        self.focus.take_marker(menu);
        self.focus.change(Some(item), menu, is_pointer, reason)
    }

    /// Marks `item` (or the active item of `menu` when `None`) as the
    /// menu's last-active item. At most one marker exists per menu.
    pub fn save_focus(&mut self, menu: &str, item: Option<K>) -> bool {
        let item = item.or_else(|| {
            (self.focus.active_menu() == Some(menu))
                .then(|| self.focus.active())
                .flatten()
        });
        let Some(item) = item else {
            return false;
        };
        self.focus.save_marker(menu, item);
        true
    }

    /// Restores the menu's last-active item, clearing its marker; without a
    /// marker the first focusable item is activated instead.
    pub fn restore_focus(
        &mut self,
        menu: &str,
        is_pointer: bool,
        view: &impl ItemView<K>,
    ) -> bool {
        match self.focus.take_marker(menu) {
            Some(item) => self
                .focus
                .change(Some(item), menu, is_pointer, FocusReason::RestoreFocus),
            None => self.focus_first(view, is_pointer, FocusReason::RestoreFocus),
        }
    }

    /// Deactivates the active item when it belongs to `menu`; wire this as
    /// a before-hook on the menu graph for the menu being left.
    pub fn leave_menu(&mut self, menu: &str) -> bool {
        self.focus.leave_menu(menu)
    }

    /// Drops the cached item list.
    ///
    /// The cache keys itself by `(menu, layout)` and refreshes on any
    /// change of either, so this is only needed when the item set of the
    /// *current* menu/layout changed in place (or configure
    /// [`NavigatorOptions::dynamic_menu`]).
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn items(&mut self, view: &impl ItemView<K>) -> SmallVec<[K; 16]> {
        if self.options.dynamic_menu {
            return view.focusable_items().into_iter().collect();
        }
        let menu = view.current_menu();
        let layout = view.current_layout();
        let fresh = matches!(&self.cache, Some(c) if c.menu == menu && c.layout == layout);
        if !fresh {
            self.cache = Some(CachedItems {
                menu: String::from(menu),
                layout: String::from(layout),
                items: view.focusable_items(),
            });
        }
        match &self.cache {
            Some(cached) => cached.items.iter().copied().collect(),
            None => SmallVec::new(),
        }
    }
}

/// Reason reported to observers for a directional move.
///
/// The mapping is deliberately asymmetric: `Right` and `Up` report
/// [`FocusReason::MoveLeft`] and `Left` reports [`FocusReason::MoveRight`];
/// only `Down` reports its own direction. Hosts ship observers keyed to
/// this contract, so it is preserved as observable behavior.
fn move_reason(direction: Direction) -> FocusReason {
    match direction {
        Direction::Right | Direction::Up => FocusReason::MoveLeft,
        Direction::Left => FocusReason::MoveRight,
        Direction::Down => FocusReason::MoveDown,
    }
}

/// Candidates must lie strictly on the far side of the origin along the
/// movement axis.
fn in_half_plane(direction: Direction, origin: &Rect, candidate: &Rect) -> bool {
    match direction {
        Direction::Right => candidate.x0 >= origin.x1,
        Direction::Left => candidate.x1 <= origin.x0,
        Direction::Down => candidate.y0 >= origin.y1,
        Direction::Up => candidate.y1 <= origin.y0,
    }
}

/// Approximate lane test: the cross-axis leading-edge offset must be within
/// the larger of the two extents.
fn in_lane(direction: Direction, origin: &Rect, candidate: &Rect) -> bool {
    match direction.axis() {
        Axis::Horizontal => {
            (candidate.y0 - origin.y0).abs() <= candidate.height().max(origin.height())
        }
        Axis::Vertical => {
            (candidate.x0 - origin.x0).abs() <= candidate.width().max(origin.width())
        }
    }
}

/// Distances this close (in coordinate units) count as equal.
const TIE_BAND: f64 = 0.5;

fn compare_candidates(direction: Direction, origin: &Rect, a: &Rect, b: &Rect) -> Ordering {
    let (lead_a, lead_b, sign) = match direction {
        Direction::Right => (a.x0, b.x0, 1.0),
        Direction::Left => (a.x1, b.x1, -1.0),
        Direction::Down => (a.y0, b.y0, 1.0),
        Direction::Up => (a.y1, b.y1, -1.0),
    };
    let distance = (lead_a - lead_b) * sign;
    if distance.abs() < TIE_BAND {
        // Tied along the movement axis: the candidate nearer the origin on
        // the cross axis wins.
        let (cross_a, cross_b, cross_origin) = match direction.axis() {
            Axis::Horizontal => (a.y0, b.y0, origin.y0),
            Axis::Vertical => (a.x0, b.x0, origin.x0),
        };
        (cross_a - cross_origin)
            .abs()
            .partial_cmp(&(cross_b - cross_origin).abs())
            .unwrap_or(Ordering::Equal)
    } else {
        distance.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    }
}
