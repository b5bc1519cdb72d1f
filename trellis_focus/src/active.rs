// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active-focus state machine.
//!
//! At most one item is active at any time. A change from one item to
//! another is two atomic steps — `Active(x) → Idle`, then
//! `Idle → Active(y)` — and observers are dispatched *between* the steps,
//! always seeing settled state: deactivation observers run while the
//! machine is idle, activation observers run once the new item is in
//! place. Observers receive the change payload by reference and have no
//! access to the machine itself, so a dispatch can never re-enter the
//! transition.
//!
//! The machine also keeps one "last-active" marker per menu, used only by
//! explicit save/restore (see
//! [`Navigator::save_focus`](crate::Navigator::save_focus)); markers are
//! independent of the active item and survive menu changes.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use crate::{FocusChange, FocusObserver, FocusReason};

#[derive(Clone, Debug, PartialEq, Eq)]
enum FocusState<K> {
    Idle,
    Active { item: K, menu: String },
}

enum Signal {
    Activated,
    Deactivated,
}

/// Holder of the single active item and its observers.
pub struct ActiveFocus<K> {
    state: FocusState<K>,
    /// Last-active marker per menu id.
    markers: BTreeMap<String, K>,
    observers: Vec<Box<dyn FocusObserver<K>>>,
}

impl<K> Default for ActiveFocus<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ActiveFocus<K> {
    /// Creates an idle machine with no observers.
    pub fn new() -> Self {
        Self {
            state: FocusState::Idle,
            markers: BTreeMap::new(),
            observers: Vec::new(),
        }
    }

    /// Registers an observer of activation/deactivation signals.
    ///
    /// Observers are invoked in registration order. An observer must not
    /// call back into the machine through shared mutability while a
    /// dispatch is on the stack; queue follow-up work for the host loop
    /// instead.
    pub fn add_observer(&mut self, observer: Box<dyn FocusObserver<K>>) {
        self.observers.push(observer);
    }
}

impl<K: Copy + Eq> ActiveFocus<K> {
    /// The active item, if any.
    pub fn active(&self) -> Option<K> {
        match &self.state {
            FocusState::Idle => None,
            FocusState::Active { item, .. } => Some(*item),
        }
    }

    /// The menu owning the active item, if any.
    pub fn active_menu(&self) -> Option<&str> {
        match &self.state {
            FocusState::Idle => None,
            FocusState::Active { menu, .. } => Some(menu),
        }
    }

    /// Changes the active item.
    ///
    /// `menu` names the menu owning `new` (ignored when clearing). A call
    /// that would not change anything is a signal-free no-op. Otherwise the
    /// previous item (if any) is deactivated first — its observers see
    /// `{target: old, other: new}` — and the new item (if any) is then
    /// activated with `{target: new, other: old}`.
    ///
    /// Returns `true` when the state changed.
    pub fn change(
        &mut self,
        new: Option<K>,
        menu: &str,
        is_pointer: bool,
        reason: FocusReason,
    ) -> bool {
        if self.active() == new {
            return false;
        }

        // Step 1: Active(x) → Idle. The state is settled before observers run.
        let old = match mem::replace(&mut self.state, FocusState::Idle) {
            FocusState::Active { item, .. } => Some(item),
            FocusState::Idle => None,
        };
        if let Some(old_item) = old {
            self.dispatch(
                &Signal::Deactivated,
                &FocusChange {
                    target: old_item,
                    other: new,
                    is_pointer,
                    reason,
                },
            );
        }

        // Step 2: Idle → Active(y).
        if let Some(new_item) = new {
            self.state = FocusState::Active {
                item: new_item,
                menu: String::from(menu),
            };
            self.dispatch(
                &Signal::Activated,
                &FocusChange {
                    target: new_item,
                    other: old,
                    is_pointer,
                    reason,
                },
            );
        }
        true
    }

    /// Deactivates the active item if it belongs to `menu`.
    ///
    /// Fired on menu change for the menu being left, before the transition
    /// proceeds; the deactivation signal carries
    /// [`FocusReason::LeaveMenu`]. Last-active markers are left alone so
    /// focus can be restored on a later revisit.
    pub fn leave_menu(&mut self, menu: &str) -> bool {
        if self.active_menu() == Some(menu) {
            self.change(None, menu, false, FocusReason::LeaveMenu)
        } else {
            false
        }
    }

    /// Marks `item` as the last-active item of `menu`, replacing any
    /// previous marker for that menu.
    pub fn save_marker(&mut self, menu: &str, item: K) {
        self.markers.insert(String::from(menu), item);
    }

    /// The last-active marker of `menu`, if any.
    pub fn marker(&self, menu: &str) -> Option<K> {
        self.markers.get(menu).copied()
    }

    /// Removes and returns the last-active marker of `menu`.
    pub fn take_marker(&mut self, menu: &str) -> Option<K> {
        self.markers.remove(menu)
    }

    fn dispatch(&mut self, signal: &Signal, change: &FocusChange<K>) {
        for observer in &mut self.observers {
            match signal {
                Signal::Activated => observer.activated(change),
                Signal::Deactivated => observer.deactivated(change),
            }
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ActiveFocus<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveFocus")
            .field("state", &self.state)
            .field("markers", &self.markers)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
