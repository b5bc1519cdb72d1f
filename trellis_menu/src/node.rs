// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Materialized menu nodes and their layouts.
//!
//! A [`MenuNode`] is built once from a [`MenuDecl`] and owns every item
//! instance it will ever display. The main layout holds one instance per
//! declared item; each alternate variant holds fresh clones of the groups it
//! references, so the same declaration can appear as several distinct
//! focusable instances.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::types::{Item, ItemId, LayoutError, MenuDecl};

/// Name of the implicit main layout every menu carries.
pub const MAIN_LAYOUT: &str = "main";

/// One layout of a menu: a name plus the item instances it displays.
#[derive(Clone, Debug)]
pub struct Layout {
    name: String,
    /// Indices into the owning node's item arena.
    items: Vec<usize>,
}

impl Layout {
    /// Layout name (`"main"` for the main layout).
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A menu in the graph: identity, item instances, and layout variants.
///
/// Nodes are created at graph construction and never destroyed during the
/// process lifetime. The only mutation after construction is which layout is
/// current, driven by the layout resolver.
#[derive(Clone, Debug)]
pub struct MenuNode<T> {
    id: String,
    items: Vec<Item<T>>,
    /// Index 0 is always the main layout.
    layouts: Vec<Layout>,
    current_layout: usize,
    enter_animation: Option<String>,
    exit_animation: Option<String>,
}

impl<T: Clone> MenuNode<T> {
    /// Materialize a node from its declaration.
    ///
    /// `next_item` is the graph-wide item id counter. A variant referencing
    /// a missing group degrades to skipping that group, reported through the
    /// logger as a [`LayoutError`].
    pub(crate) fn from_decl(decl: MenuDecl<T>, next_item: &mut u32) -> Self {
        let mut items = Vec::new();
        let mut main_items = Vec::new();
        let mut group_spans: Vec<(String, Vec<usize>)> = Vec::new();

        for group in &decl.main {
            let mut span = Vec::with_capacity(group.items.len());
            for item in &group.items {
                let idx = items.len();
                items.push(Item {
                    id: ItemId::new(*next_item),
                    tag: item.tag.clone(),
                    goto_label: item.goto_label.clone(),
                    flags: item.flags,
                });
                *next_item += 1;
                span.push(idx);
                main_items.push(idx);
            }
            group_spans.push((group.name.clone(), span));
        }

        let mut layouts = Vec::with_capacity(decl.variants.len() + 1);
        layouts.push(Layout {
            name: MAIN_LAYOUT.to_string(),
            items: main_items,
        });

        for variant in &decl.variants {
            let mut variant_items = Vec::new();
            for group_name in &variant.groups {
                let Some((_, span)) = group_spans.iter().find(|(name, _)| name == group_name)
                else {
                    log::error!(
                        "{}",
                        LayoutError::MissingGroup {
                            menu: decl.id.clone(),
                            variant: variant.name.clone(),
                            group: group_name.clone(),
                        }
                    );
                    continue;
                };
                // Clone the group's items into fresh instances.
                for &src in span {
                    let idx = items.len();
                    let source = items[src].clone();
                    items.push(Item {
                        id: ItemId::new(*next_item),
                        ..source
                    });
                    *next_item += 1;
                    variant_items.push(idx);
                }
            }
            layouts.push(Layout {
                name: variant.name.clone(),
                items: variant_items,
            });
        }

        Self {
            id: decl.id,
            items,
            layouts,
            current_layout: 0,
            enter_animation: decl.enter_animation,
            exit_animation: decl.exit_animation,
        }
    }
}

impl<T> MenuNode<T> {
    /// Menu id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the currently active layout.
    pub fn current_layout(&self) -> &str {
        self.layouts[self.current_layout].name()
    }

    /// Names of all declared layouts, main first.
    pub fn layout_names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(Layout::name)
    }

    /// Whether this menu declares the named layout.
    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.iter().any(|l| l.name == name)
    }

    /// Item instances of the currently active layout, in declaration order.
    pub fn items_in_current(&self) -> impl Iterator<Item = &Item<T>> {
        self.layouts[self.current_layout]
            .items
            .iter()
            .map(|&idx| &self.items[idx])
    }

    /// Look up an item instance anywhere in this menu.
    pub fn item(&self, id: ItemId) -> Option<&Item<T>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn enter_animation(&self) -> Option<&str> {
        self.enter_animation.as_deref()
    }

    pub(crate) fn exit_animation(&self) -> Option<&str> {
        self.exit_animation.as_deref()
    }

    /// Make the named layout current. Returns `true` if the current layout
    /// actually changed. Unknown names leave the node untouched.
    pub(crate) fn apply_layout(&mut self, name: &str) -> bool {
        let Some(idx) = self.layouts.iter().position(|l| l.name == name) else {
            return false;
        };
        if idx == self.current_layout {
            return false;
        }
        self.current_layout = idx;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupDecl, ItemDecl, ItemFlags, VariantDecl};
    use alloc::vec;

    fn decl() -> MenuDecl<&'static str> {
        MenuDecl {
            id: "home".to_string(),
            main: vec![
                GroupDecl {
                    name: "primary".to_string(),
                    items: vec![
                        ItemDecl {
                            tag: "play",
                            goto_label: "levels".to_string(),
                            flags: ItemFlags::FOCUSABLE,
                        },
                        ItemDecl {
                            tag: "quit",
                            goto_label: String::new(),
                            flags: ItemFlags::FOCUSABLE,
                        },
                    ],
                },
                GroupDecl {
                    name: "footer".to_string(),
                    items: vec![ItemDecl {
                        tag: "credits",
                        goto_label: "credits".to_string(),
                        flags: ItemFlags::empty(),
                    }],
                },
            ],
            variants: vec![VariantDecl {
                name: "compact".to_string(),
                groups: vec!["primary".to_string(), "missing".to_string()],
            }],
            enter_animation: None,
            exit_animation: None,
        }
    }

    #[test]
    fn materializes_main_and_variants() {
        let mut next = 0;
        let node = MenuNode::from_decl(decl(), &mut next);

        assert_eq!(node.current_layout(), MAIN_LAYOUT);
        assert_eq!(node.items_in_current().count(), 3);
        assert!(node.has_layout("compact"));
        // Two main items cloned into the variant; the missing group was skipped.
        assert_eq!(next, 5);
    }

    #[test]
    fn clones_are_distinct_instances_with_shared_behavior() {
        let mut next = 0;
        let mut node = MenuNode::from_decl(decl(), &mut next);

        let main_ids: Vec<ItemId> = node.items_in_current().map(Item::id).collect();
        assert!(node.apply_layout("compact"));
        let compact: Vec<&Item<&str>> = node.items_in_current().collect();

        assert_eq!(compact.len(), 2);
        for item in &compact {
            assert!(!main_ids.contains(&item.id()));
        }
        assert_eq!(*compact[0].tag(), "play");
        assert_eq!(compact[0].goto_label(), "levels");
    }

    #[test]
    fn apply_layout_is_idempotent_and_rejects_unknown_names() {
        let mut next = 0;
        let mut node = MenuNode::from_decl(decl(), &mut next);

        assert!(node.apply_layout("compact"));
        assert!(!node.apply_layout("compact"));
        assert!(!node.apply_layout("nonexistent"));
        assert_eq!(node.current_layout(), "compact");
    }
}
