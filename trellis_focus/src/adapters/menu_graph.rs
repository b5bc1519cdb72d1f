// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter: build an [`ItemView`] from a [`trellis_menu::Graph`].
//!
//! The graph knows the current menu, its active layout, and the focusable
//! item instances; the host supplies geometry through [`ItemBounds`]. A
//! [`GraphView`] borrows both for the duration of one navigator call:
//!
//! ```ignore
//! let view = GraphView::new(&graph, &geometry);
//! navigator.move_focus(Direction::Right, &view);
//! ```
//!
//! [`LeaveMenuHook`] is the ready-made before-hook that clears stale focus
//! when a menu is left; register it on the graph and keep the navigator in
//! an `Rc<RefCell<…>>` so both the hook and the input loop can reach it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::Rect;

use trellis_menu::{Graph, Item, ItemId, Outcome, TransitionObserver};

use crate::navigator::{ItemView, Navigator};

/// Host geometry source for graph items.
pub trait ItemBounds<T> {
    /// Document-space bounds of `item` as displayed by `layout` of `menu`,
    /// or `None` while it is not on screen.
    fn bounds(&self, menu: &str, layout: &str, item: &Item<T>) -> Option<Rect>;
}

/// [`ItemView`] over a menu graph plus host geometry.
pub struct GraphView<'a, T, B> {
    graph: &'a Graph<T>,
    bounds: &'a B,
}

impl<'a, T, B: ItemBounds<T>> GraphView<'a, T, B> {
    /// Creates a view of `graph`'s current menu.
    pub fn new(graph: &'a Graph<T>, bounds: &'a B) -> Self {
        Self { graph, bounds }
    }
}

impl<T, B: ItemBounds<T>> ItemView<ItemId> for GraphView<'_, T, B> {
    fn current_menu(&self) -> &str {
        self.graph.current_menu().id()
    }

    fn current_layout(&self) -> &str {
        self.graph.current_menu().current_layout()
    }

    fn focusable_items(&self) -> Vec<ItemId> {
        self.graph
            .current_menu()
            .items_in_current()
            .filter(|item| item.is_focusable())
            .map(Item::id)
            .collect()
    }

    fn bounds(&self, item: ItemId) -> Option<Rect> {
        let menu = self.graph.current_menu();
        let item = menu.item(item)?;
        self.bounds.bounds(menu.id(), menu.current_layout(), item)
    }
}

impl<T, B> fmt::Debug for GraphView<'_, T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphView")
            .field("current_menu", &self.graph.current_menu().id())
            .finish_non_exhaustive()
    }
}

/// Before-hook clearing focus in the menu being left.
pub struct LeaveMenuHook<K> {
    navigator: Rc<RefCell<Navigator<K>>>,
}

impl<K: Copy + Eq + 'static> LeaveMenuHook<K> {
    /// Wraps a shared navigator as a graph before-hook.
    pub fn new(navigator: Rc<RefCell<Navigator<K>>>) -> Box<dyn TransitionObserver> {
        Box::new(Self { navigator })
    }
}

impl<K: Copy + Eq> TransitionObserver for LeaveMenuHook<K> {
    fn before_transition(&mut self, from: &str, _to: &str) -> Outcome {
        self.navigator.borrow_mut().leave_menu(from);
        Outcome::Continue
    }
}

impl<K> fmt::Debug for LeaveMenuHook<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaveMenuHook").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, FocusReason, InputMap, NavigatorOptions};
    use alloc::string::String;
    use alloc::vec;
    use trellis_menu::{GraphOptions, GroupDecl, ItemDecl, ItemFlags, MenuDecl, VariantDecl};

    struct RowLayout;

    impl<T> ItemBounds<T> for RowLayout {
        fn bounds(&self, _menu: &str, _layout: &str, item: &Item<T>) -> Option<Rect> {
            // Lay items out on one row, spaced by id.
            let x = f64::from(item.id().raw()) * 20.0;
            Some(Rect::new(x, 0.0, x + 8.0, 8.0))
        }
    }

    fn decls() -> Vec<MenuDecl<&'static str>> {
        vec![
            MenuDecl {
                id: "home".into(),
                main: vec![GroupDecl {
                    name: "actions".into(),
                    items: vec![
                        ItemDecl {
                            tag: "play",
                            goto_label: "levels".into(),
                            flags: ItemFlags::FOCUSABLE,
                        },
                        ItemDecl {
                            tag: "credits",
                            goto_label: String::new(),
                            flags: ItemFlags::FOCUSABLE,
                        },
                        ItemDecl {
                            tag: "decoration",
                            goto_label: String::new(),
                            flags: ItemFlags::empty(),
                        },
                    ],
                }],
                variants: vec![VariantDecl {
                    name: "compact".into(),
                    groups: vec!["actions".into()],
                }],
                enter_animation: None,
                exit_animation: None,
            },
            MenuDecl::new("levels", vec![]),
        ]
    }

    #[test]
    fn view_exposes_focusable_items_of_the_current_layout() {
        let graph = Graph::new(decls(), "home", GraphOptions::default()).expect("graph");
        let view = GraphView::new(&graph, &RowLayout);

        assert_eq!(view.current_menu(), "home");
        assert_eq!(view.current_layout(), "main");
        // The non-focusable decoration is filtered out.
        assert_eq!(view.focusable_items().len(), 2);
    }

    #[test]
    fn navigator_moves_across_graph_items() {
        let graph = Graph::new(decls(), "home", GraphOptions::default()).expect("graph");
        let mut nav: Navigator<ItemId> =
            Navigator::new(InputMap::default(), NavigatorOptions::default());

        let view = GraphView::new(&graph, &RowLayout);
        assert!(nav.focus_first(&view, false, FocusReason::FirstFocus));
        let first = nav.active().expect("first item active");
        assert!(nav.move_focus(Direction::Right, &view));
        assert_ne!(nav.active(), Some(first));
        // Nothing beyond the last focusable item.
        assert!(!nav.move_focus(Direction::Right, &view));
    }

    #[test]
    fn leave_menu_hook_clears_focus_on_transition() {
        let mut graph = Graph::new(decls(), "home", GraphOptions::default()).expect("graph");
        let nav: Rc<RefCell<Navigator<ItemId>>> = Rc::new(RefCell::new(Navigator::new(
            InputMap::default(),
            NavigatorOptions::default(),
        )));
        graph.add_hook(LeaveMenuHook::new(Rc::clone(&nav)), true);

        {
            let view = GraphView::new(&graph, &RowLayout);
            let mut nav = nav.borrow_mut();
            nav.focus_first(&view, false, FocusReason::FirstFocus);
            assert!(nav.active().is_some());
        }

        graph.goto("levels", false, false).expect("home->levels");
        assert_eq!(nav.borrow().active(), None);
    }
}
