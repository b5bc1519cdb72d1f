// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout resolution: choosing which declared variant of a menu is visible.
//!
//! The graph never decides layouts itself; it asks a host-supplied
//! [`LayoutChooser`] on every resolution. Choosers are expected to be cheap
//! and pure — typical implementations key off viewport size or input mode.
//! Resolution is re-invocable at any time and never alters item state.

use alloc::string::{String, ToString};

use crate::node::{MAIN_LAYOUT, MenuNode};

/// Host policy selecting a layout variant per menu.
pub trait LayoutChooser {
    /// Variant to display for `menu_id`, or `None` for the main layout.
    ///
    /// Returning the name of a variant the menu does not declare is not an
    /// error; resolution falls back to the main layout.
    fn variant_for(&self, menu_id: &str) -> Option<String>;
}

/// The default chooser: every menu shows its main layout.
#[derive(Copy, Clone, Debug, Default)]
pub struct MainOnly;

impl LayoutChooser for MainOnly {
    fn variant_for(&self, _menu_id: &str) -> Option<String> {
        None
    }
}

/// Resolve the layout name to display for `node`.
pub(crate) fn resolve<T>(node: &MenuNode<T>, chooser: &dyn LayoutChooser) -> String {
    match chooser.variant_for(node.id()) {
        Some(name) if node.has_layout(&name) => name,
        Some(name) => {
            log::debug!(
                "menu `{}` declares no layout `{name}`, falling back to `{MAIN_LAYOUT}`",
                node.id()
            );
            MAIN_LAYOUT.to_string()
        }
        None => MAIN_LAYOUT.to_string(),
    }
}

/// Resolve and apply the layout for `node`. Returns `true` when the current
/// layout changed, `false` for the idempotent no-op case.
pub(crate) fn apply<T>(node: &mut MenuNode<T>, chooser: &dyn LayoutChooser) -> bool {
    let name = resolve(node, chooser);
    node.apply_layout(&name)
}
