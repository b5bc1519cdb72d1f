// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu graph + directional focus, wired end to end.
//!
//! This example shows how to combine:
//! - `trellis_menu` for the menu graph, history, layouts, and animations,
//! - `trellis_focus` for keyboard-style directional navigation,
//! - the `graph_adapter` feature to bridge the two.
//!
//! Run:
//! - `cargo run -p trellis_demos --example menu_walkthrough`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Rect;
use trellis_focus::adapters::menu_graph::{GraphView, ItemBounds, LeaveMenuHook};
use trellis_focus::{InputMap, NavRequest, Navigator, NavigatorOptions};
use trellis_menu::{
    Animation, AnimationCx, AnimationRegistry, Graph, GraphOptions, GroupDecl, Item, ItemAction,
    ItemDecl, ItemFlags, ItemId, LayoutChooser, MenuDecl, Progress, VariantDecl, after_hook,
};

/// Fake geometry: one row of 24×24 boxes per layout, in item order.
struct RowBounds;

impl ItemBounds<&'static str> for RowBounds {
    fn bounds(&self, _menu: &str, _layout: &str, item: &Item<&'static str>) -> Option<Rect> {
        let x = f64::from(item.id().raw()) * 32.0;
        Some(Rect::new(x, 0.0, x + 24.0, 24.0))
    }
}

/// Layout policy flipping the home menu to its compact variant on demand.
struct ViewportChooser {
    compact: Rc<Cell<bool>>,
}

impl LayoutChooser for ViewportChooser {
    fn variant_for(&self, menu_id: &str) -> Option<String> {
        (menu_id == "home" && self.compact.get()).then(|| "compact".to_string())
    }
}

/// Animation that just narrates what it was asked to do.
struct Announce(&'static str);

impl Animation for Announce {
    fn run(&mut self, cx: AnimationCx<'_>) -> Progress {
        println!("  [anim] {} {} -> {} (back: {})", self.0, cx.from, cx.to, cx.is_back);
        Progress::Complete
    }
}

fn item(tag: &'static str, goto: &str, flags: ItemFlags) -> ItemDecl<&'static str> {
    ItemDecl {
        tag,
        goto_label: goto.to_string(),
        flags,
    }
}

fn declarations() -> Vec<MenuDecl<&'static str>> {
    vec![
        MenuDecl {
            id: "home".to_string(),
            main: vec![GroupDecl {
                name: "actions".to_string(),
                items: vec![
                    item("play", "levels", ItemFlags::FOCUSABLE),
                    item("options", "options", ItemFlags::FOCUSABLE),
                    item("website", "https://example.org", ItemFlags::FOCUSABLE | ItemFlags::BLANK),
                ],
            }],
            variants: vec![VariantDecl {
                name: "compact".to_string(),
                groups: vec!["actions".to_string()],
            }],
            enter_animation: Some("fade.enter".to_string()),
            exit_animation: Some("fade.exit".to_string()),
        },
        MenuDecl {
            id: "levels".to_string(),
            main: vec![GroupDecl {
                name: "levels".to_string(),
                items: vec![
                    item("level-1", "", ItemFlags::FOCUSABLE),
                    item("level-2", "", ItemFlags::FOCUSABLE),
                    item("back", "", ItemFlags::FOCUSABLE | ItemFlags::BACK),
                ],
            }],
            variants: vec![],
            enter_animation: None,
            exit_animation: None,
        },
        MenuDecl::new(
            "options",
            vec![GroupDecl {
                name: "options".to_string(),
                items: vec![item("back", "", ItemFlags::FOCUSABLE | ItemFlags::BACK)],
            }],
        ),
    ]
}

const KEY_ESC: u32 = 27;
const KEY_ENTER: u32 = 13;
const KEY_RIGHT: u32 = 39;

fn main() {
    let compact = Rc::new(Cell::new(false));

    let mut animations = AnimationRegistry::new();
    animations.register("fade.enter", Box::new(Announce("enter")));
    animations.register("fade.exit", Box::new(Announce("exit")));
    let options = GraphOptions {
        chooser: Box::new(ViewportChooser {
            compact: Rc::clone(&compact),
        }),
        animations,
        ..GraphOptions::default()
    };

    let mut graph = Graph::new(declarations(), "home", options).expect("valid declarations");
    graph.add_hook(
        after_hook(|from, to| println!("  [hook] settled {from} -> {to}")),
        false,
    );

    let navigator: Rc<RefCell<Navigator<ItemId>>> = Rc::new(RefCell::new(Navigator::new(
        InputMap {
            back: vec![KEY_ESC],
            select: vec![KEY_ENTER],
            up: vec![38],
            down: vec![40],
            left: vec![37],
            right: vec![KEY_RIGHT],
        },
        NavigatorOptions {
            first_focus: true,
            dynamic_menu: false,
        },
    )));
    graph.add_hook(LeaveMenuHook::new(Rc::clone(&navigator)), true);

    {
        let view = GraphView::new(&graph, &RowBounds);
        navigator.borrow_mut().initial_focus(&view);
    }

    // Select play (into levels), back out, then visit options and return.
    for key in [KEY_ENTER, KEY_ESC, KEY_RIGHT, KEY_RIGHT, KEY_ENTER, KEY_ESC] {
        press(key, &mut graph, &navigator);
    }

    // The viewport shrinks: re-resolve the home layout.
    compact.set(true);
    let changed = graph.force_update_layout();
    println!(
        "viewport change: layout of `{}` is now `{}` (changed: {changed})",
        graph.current_menu().id(),
        graph.current_menu().current_layout()
    );
}

fn press(key: u32, graph: &mut Graph<&'static str>, navigator: &Rc<RefCell<Navigator<ItemId>>>) {
    let request = {
        let view = GraphView::new(graph, &RowBounds);
        navigator.borrow_mut().handle_key(key, &view)
    };
    match request {
        Some(NavRequest::Back) => {
            if graph.goto("", true, false).is_ok() {
                println!("back -> `{}`", graph.current_menu().id());
            }
        }
        Some(NavRequest::Activate(id)) => {
            // Replay the click: resolve the item's declared action.
            let action = graph.item(id).map(|item| match item.action() {
                ItemAction::Goto {
                    label,
                    is_back,
                    clear_history,
                } => Some((label.to_string(), is_back, clear_history)),
                ItemAction::Redirect { url, blank } => {
                    println!("open `{url}` (new context: {blank})");
                    None
                }
                ItemAction::None => None,
            });
            if let Some(Some((label, is_back, clear_history))) = action
                && graph.goto(&label, is_back, clear_history).is_ok()
            {
                println!("goto -> `{}`", graph.current_menu().id());
            }
        }
        None => {
            let nav = navigator.borrow();
            let active = nav.active().and_then(|id| graph.item(id));
            println!(
                "key {key}: focus on {:?}",
                active.map(Item::tag).copied().unwrap_or("nothing")
            );
        }
    }
}
