// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Menu: a declarative, history-backed menu graph.
//!
//! This crate models a set of named menus (screens) connected by labeled
//! transitions, with:
//! - **Back-history**: every forward transition pushes the departed menu,
//!   and back navigation walks the stack — optionally searching it for a
//!   labeled entry.
//! - **Layout variants**: each menu owns a main layout (the authoritative
//!   item set, organized into named groups) plus alternate variants that
//!   clone groups by name; a host-supplied [`LayoutChooser`] picks the
//!   visible variant at resolution time.
//! - **Transition hooks**: ordered before-hooks (which may veto) and
//!   after-hooks around every transition, via [`TransitionObserver`].
//! - **Coordinated animations**: named exit/enter animations resolved from
//!   an explicit [`AnimationRegistry`], both initiated concurrently;
//!   after-hooks wait for both to settle while menu state updates
//!   immediately.
//! - **Persistence boundary**: an optional [`StateStore`] consulted at
//!   construction and written after every committed transition.
//!
//! Menus and items are declared up front (see [`MenuDecl`]) and consumed
//! once at construction; [`Graph::rescan`] re-runs materialization when the
//! host's view of the world changes wholesale.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_menu::{
//!     Commit, Graph, GraphOptions, GroupDecl, ItemDecl, ItemFlags, MenuDecl,
//! };
//!
//! let decls = vec![
//!     MenuDecl::new(
//!         "home",
//!         vec![GroupDecl {
//!             name: "actions".to_string(),
//!             items: vec![ItemDecl {
//!                 tag: "play-button",
//!                 goto_label: "levels".to_string(),
//!                 flags: ItemFlags::FOCUSABLE,
//!             }],
//!         }],
//!     ),
//!     MenuDecl::new("levels", vec![]),
//! ];
//!
//! let mut graph = Graph::new(decls, "home", GraphOptions::default()).expect("valid declarations");
//!
//! // Forward navigation pushes the departed menu onto the history…
//! assert_eq!(graph.goto("levels", false, false), Ok(Commit::Complete));
//! assert_eq!(graph.current_menu().id(), "levels");
//! assert_eq!(graph.history(), ["home"]);
//!
//! // …and back navigation pops it.
//! assert_eq!(graph.goto("", true, false), Ok(Commit::Complete));
//! assert_eq!(graph.current_menu().id(), "home");
//! ```
//!
//! ## Errors degrade, they never halt
//!
//! Unresolved goto labels, back navigation on an empty history, missing
//! layout groups, and unregistered animation names all degrade to "no-op
//! plus log": the failing operation reports through its return value and
//! the graph is left exactly as it was. See [`NavigationError`],
//! [`LayoutError`], and [`GraphError`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod graph;
mod layout;
mod node;
mod transition;
mod types;

pub use graph::{
    CURRENT_KEY, Commit, Graph, GraphOptions, HISTORY_KEY, Outcome, StateStore,
    TransitionObserver, after_hook, before_hook,
};
pub use layout::{LayoutChooser, MainOnly};
pub use node::{Layout, MAIN_LAYOUT, MenuNode};
pub use transition::{Animation, AnimationCx, AnimationRegistry, Progress, TransitionToken};
pub use types::{
    GraphError, GroupDecl, Item, ItemAction, ItemDecl, ItemFlags, ItemId, LayoutError, MenuDecl,
    NavigationError, VariantDecl,
};
