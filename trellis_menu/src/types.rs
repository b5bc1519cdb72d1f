// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the menu graph: declarations, item flags, materialized
//! items, and the error taxonomy.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Identifier for a materialized item instance (graph-assigned).
///
/// Every instance gets its own id, including clones of the same declaration
/// placed into alternate layout variants. Two clones share behavior (tag,
/// label, flags) but are distinct focusable instances.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value, stable for the lifetime of the graph.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Behavior flags declared on an item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// Navigate through the back-history instead of by label.
        const BACK      = 0b0000_0001;
        /// Clear the history after this item's transition commits.
        const CLEAR     = 0b0000_0010;
        /// Open an external resource instead of navigating.
        const REDIRECT  = 0b0000_0100;
        /// Like `REDIRECT`, but in a new viewing context.
        const BLANK     = 0b0000_1000;
        /// Participates in directional focus navigation.
        const FOCUSABLE = 0b0001_0000;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::FOCUSABLE
    }
}

/// Declaration of a single item, as produced by external discovery.
///
/// `T` is a host-supplied correlation tag (for example a widget handle or a
/// markup node id) carried through to every materialized instance.
#[derive(Clone, Debug)]
pub struct ItemDecl<T> {
    /// Host correlation tag, shared by all clones of this declaration.
    pub tag: T,
    /// Target menu id for navigation items, or the resource for redirect
    /// items. May be empty.
    pub goto_label: String,
    /// Behavior flags.
    pub flags: ItemFlags,
}

/// A named group of items inside a menu's main layout.
///
/// Alternate layout variants pull groups in by name.
#[derive(Clone, Debug)]
pub struct GroupDecl<T> {
    /// Group name, unique within its menu.
    pub name: String,
    /// Items declared in this group.
    pub items: Vec<ItemDecl<T>>,
}

/// Declaration of an alternate layout variant.
#[derive(Clone, Debug)]
pub struct VariantDecl {
    /// Variant name, as reported by the host's layout chooser.
    pub name: String,
    /// Names of main-layout item groups this variant displays.
    pub groups: Vec<String>,
}

/// Declaration of a menu, as produced by external discovery.
#[derive(Clone, Debug)]
pub struct MenuDecl<T> {
    /// Unique menu id.
    pub id: String,
    /// The main layout's item groups. The main layout is authoritative:
    /// variants only reference these groups by name.
    pub main: Vec<GroupDecl<T>>,
    /// Alternate layout variants.
    pub variants: Vec<VariantDecl>,
    /// Name of the animation to run when this menu is entered, if any.
    pub enter_animation: Option<String>,
    /// Name of the animation to run when this menu is exited, if any.
    pub exit_animation: Option<String>,
}

impl<T> MenuDecl<T> {
    /// Convenience constructor for a menu with only a main layout and no
    /// animations.
    pub fn new(id: impl Into<String>, main: Vec<GroupDecl<T>>) -> Self {
        Self {
            id: id.into(),
            main,
            variants: Vec::new(),
            enter_animation: None,
            exit_animation: None,
        }
    }
}

/// A materialized item instance inside a menu's layout.
#[derive(Clone, Debug)]
pub struct Item<T> {
    pub(crate) id: ItemId,
    pub(crate) tag: T,
    pub(crate) goto_label: String,
    pub(crate) flags: ItemFlags,
}

impl<T> Item<T> {
    /// Graph-assigned identity of this instance.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Host correlation tag from the declaration.
    pub fn tag(&self) -> &T {
        &self.tag
    }

    /// Declared goto label (may be empty).
    pub fn goto_label(&self) -> &str {
        &self.goto_label
    }

    /// Behavior flags.
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Whether this instance participates in directional focus navigation.
    pub fn is_focusable(&self) -> bool {
        self.flags.contains(ItemFlags::FOCUSABLE)
    }

    /// What selecting this item should do.
    ///
    /// Redirect flags win over navigation; an item with neither a label nor
    /// the `BACK` flag does nothing.
    pub fn action(&self) -> ItemAction<'_> {
        if self
            .flags
            .intersects(ItemFlags::REDIRECT | ItemFlags::BLANK)
        {
            ItemAction::Redirect {
                url: &self.goto_label,
                blank: self.flags.contains(ItemFlags::BLANK),
            }
        } else if self.flags.contains(ItemFlags::BACK) || !self.goto_label.is_empty() {
            ItemAction::Goto {
                label: &self.goto_label,
                is_back: self.flags.contains(ItemFlags::BACK),
                clear_history: self.flags.contains(ItemFlags::CLEAR),
            }
        } else {
            ItemAction::None
        }
    }
}

/// Resolved behavior of an item, for the host to execute on selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemAction<'a> {
    /// Inert item.
    None,
    /// Navigate the graph.
    Goto {
        /// Target menu id, or the back-search label (may be empty).
        label: &'a str,
        /// Navigate through history instead of by label.
        is_back: bool,
        /// Clear the history once the transition commits.
        clear_history: bool,
    },
    /// Open an external resource; the graph is not involved.
    Redirect {
        /// Resource to open.
        url: &'a str,
        /// Open in a new viewing context.
        blank: bool,
    },
}

/// Failure to construct (or re-scan) a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The declaration set was empty.
    NoMenus,
    /// Two menus were declared with the same id.
    DuplicateMenu {
        /// The offending id.
        id: String,
    },
    /// The designated main menu was not declared.
    UnknownMainMenu {
        /// The id that was requested as main.
        id: String,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMenus => write!(f, "no menus declared"),
            Self::DuplicateMenu { id } => write!(f, "menu `{id}` declared more than once"),
            Self::UnknownMainMenu { id } => write!(f, "main menu `{id}` is not declared"),
        }
    }
}

impl core::error::Error for GraphError {}

/// Failure of a `goto` call. The graph is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationError {
    /// Forward navigation to a label no menu carries.
    UnknownMenu {
        /// The unresolved label.
        label: String,
        /// The menu that was current when the call was made.
        current: String,
    },
    /// Back navigation with an empty history.
    NoHistory {
        /// The menu that was current when the call was made.
        current: String,
    },
    /// A before-hook cancelled the transition.
    ///
    /// This is cooperative cancellation, not a fault; it is reported at
    /// debug level only.
    Vetoed {
        /// Menu the transition would have left.
        from: String,
        /// Menu the transition would have entered.
        to: String,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMenu { label, current } => {
                write!(f, "`{label}` is not a valid menu in `{current}`")
            }
            Self::NoHistory { current } => {
                write!(f, "`{current}` cannot go back, no previous menu found")
            }
            Self::Vetoed { from, to } => {
                write!(f, "transition `{from}` -> `{to}` vetoed by a before-hook")
            }
        }
    }
}

impl core::error::Error for NavigationError {}

/// Degraded condition met while materializing or resolving layouts.
///
/// These are reported through the logger and never abort an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A variant referenced an item group the main layout does not declare.
    MissingGroup {
        /// Menu owning the variant.
        menu: String,
        /// Variant naming the group.
        variant: String,
        /// The missing group name.
        group: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGroup {
                menu,
                variant,
                group,
            } => write!(
                f,
                "layout `{variant}` of menu `{menu}` references missing item group `{group}`"
            ),
        }
    }
}

impl core::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn item(label: &str, flags: ItemFlags) -> Item<u32> {
        Item {
            id: ItemId::new(0),
            tag: 0,
            goto_label: label.to_string(),
            flags,
        }
    }

    #[test]
    fn action_resolves_goto() {
        let it = item("settings", ItemFlags::FOCUSABLE);
        assert_eq!(
            it.action(),
            ItemAction::Goto {
                label: "settings",
                is_back: false,
                clear_history: false,
            }
        );
    }

    #[test]
    fn action_back_wins_over_empty_label() {
        let it = item("", ItemFlags::BACK | ItemFlags::CLEAR);
        assert_eq!(
            it.action(),
            ItemAction::Goto {
                label: "",
                is_back: true,
                clear_history: true,
            }
        );
    }

    #[test]
    fn action_redirect_wins_over_navigation() {
        let it = item("https://example.org", ItemFlags::REDIRECT | ItemFlags::BACK);
        assert_eq!(
            it.action(),
            ItemAction::Redirect {
                url: "https://example.org",
                blank: false,
            }
        );
        let blank = item("https://example.org", ItemFlags::BLANK);
        assert!(matches!(
            blank.action(),
            ItemAction::Redirect { blank: true, .. }
        ));
    }

    #[test]
    fn action_inert_without_label_or_back() {
        let it = item("", ItemFlags::FOCUSABLE);
        assert_eq!(it.action(), ItemAction::None);
    }
}
