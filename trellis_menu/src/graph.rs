// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The menu graph: current menu, back-history, hooks, and `goto`.
//!
//! ## Transition lifecycle
//!
//! A successful [`Graph::goto`] runs these steps in order:
//!
//! 1. Resolve the target menu (by label, or by walking the history for back
//!    navigation) and snapshot the history.
//! 2. Apply the layout resolver to the target.
//! 3. Run before-hooks in registration order; any veto restores the history
//!    snapshot and cancels the transition.
//! 4. Initiate the exit and enter animations — both are started before
//!    either completion is considered.
//! 5. Update `current`, apply `clear_history`, persist state.
//! 6. Run after-hooks once both animations have settled: synchronously when
//!    neither kept running, otherwise when the host settles the
//!    transition's token.
//!
//! `current` is updated at `goto` return time regardless of animation
//! progress, so navigation is logically instantaneous for input handling
//! while visuals catch up. Two `goto` calls with animations in flight are
//! not synchronized against each other; rapid-fire navigation is the
//! caller's to serialize (for example through input debouncing). Each
//! in-flight transition settles independently, so late after-hooks still
//! run, in commit order per transition.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::layout::{self, LayoutChooser, MainOnly};
use crate::node::MenuNode;
use crate::transition::{AnimationCx, AnimationRegistry, Pending, Progress, TransitionToken};
use crate::types::{GraphError, Item, ItemId, MenuDecl, NavigationError};

/// Storage key for the current menu id.
pub const CURRENT_KEY: &str = "trellis.current";
/// Storage key for the comma-joined history ids.
pub const HISTORY_KEY: &str = "trellis.history";

/// Verdict of a before-hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Let the transition proceed.
    Continue,
    /// Cancel the transition and restore the pre-call history.
    Veto,
}

/// Observer of menu transitions.
///
/// Register with [`Graph::add_hook`]; hooks registered as "before" run prior
/// to any animation and may veto, hooks registered as "after" run once both
/// animations have settled and are fire-and-forget. Both receive the menu
/// ids captured when the transition was resolved.
pub trait TransitionObserver {
    /// Called before animations start. Returning [`Outcome::Veto`] cancels.
    fn before_transition(&mut self, from: &str, to: &str) -> Outcome {
        let _ = (from, to);
        Outcome::Continue
    }

    /// Called after both animations of a committed transition settle.
    fn after_transition(&mut self, from: &str, to: &str) {
        let _ = (from, to);
    }
}

struct BeforeFn<F>(F);

impl<F: FnMut(&str, &str) -> Outcome> TransitionObserver for BeforeFn<F> {
    fn before_transition(&mut self, from: &str, to: &str) -> Outcome {
        (self.0)(from, to)
    }
}

struct AfterFn<F>(F);

impl<F: FnMut(&str, &str)> TransitionObserver for AfterFn<F> {
    fn after_transition(&mut self, from: &str, to: &str) {
        (self.0)(from, to);
    }
}

/// Wraps a closure as a before-hook.
pub fn before_hook<F>(f: F) -> Box<dyn TransitionObserver>
where
    F: FnMut(&str, &str) -> Outcome + 'static,
{
    Box::new(BeforeFn(f))
}

/// Wraps a closure as an after-hook.
pub fn after_hook<F>(f: F) -> Box<dyn TransitionObserver>
where
    F: FnMut(&str, &str) + 'static,
{
    Box::new(AfterFn(f))
}

/// Optional key-value store for menu state.
///
/// When configured, the graph reads the saved current menu and history once
/// at construction and writes them back after every committed transition.
pub trait StateStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value.
    fn set(&mut self, key: &str, value: &str);
}

/// Configuration for [`Graph::new`].
pub struct GraphOptions {
    /// Layout selection policy. Defaults to [`MainOnly`].
    pub chooser: Box<dyn LayoutChooser>,
    /// Host-populated animation registry.
    pub animations: AnimationRegistry,
    /// Optional persistence boundary.
    pub store: Option<Box<dyn StateStore>>,
    /// Run the initial menu's enter animation at construction.
    pub play_first_animation: bool,
    /// Enter animation used when a menu declares none.
    pub default_enter_animation: Option<String>,
    /// Exit animation used when a menu declares none.
    pub default_exit_animation: Option<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            chooser: Box::new(MainOnly),
            animations: AnimationRegistry::new(),
            store: None,
            play_first_animation: true,
            default_enter_animation: None,
            default_exit_animation: None,
        }
    }
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("animations", &self.animations)
            .field("has_store", &self.store.is_some())
            .field("play_first_animation", &self.play_first_animation)
            .field("default_enter_animation", &self.default_enter_animation)
            .field("default_exit_animation", &self.default_exit_animation)
            .finish_non_exhaustive()
    }
}

/// How a successful [`Graph::goto`] committed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Commit {
    /// The label resolved to the current menu; nothing happened.
    AlreadyCurrent,
    /// The transition committed and both animations settled synchronously;
    /// after-hooks have already run.
    Complete,
    /// The transition committed with animations still running; after-hooks
    /// run once every running animation settles this token.
    InFlight(TransitionToken),
}

/// State machine over a statically-declared set of menus.
///
/// See the [crate docs](crate) for an end-to-end example.
pub struct Graph<T> {
    nodes: Vec<MenuNode<T>>,
    index: HashMap<String, usize>,
    main: String,
    current: usize,
    history: Vec<String>,
    before: Vec<Box<dyn TransitionObserver>>,
    after: Vec<Box<dyn TransitionObserver>>,
    animations: AnimationRegistry,
    chooser: Box<dyn LayoutChooser>,
    store: Option<Box<dyn StateStore>>,
    default_enter: Option<String>,
    default_exit: Option<String>,
    pending: Vec<Pending>,
    next_token: u64,
    next_item: u32,
}

impl<T: Clone> Graph<T> {
    /// Builds a graph from discovered declarations.
    ///
    /// `main_id` names the menu shown when no saved state overrides it.
    pub fn new(
        decls: Vec<MenuDecl<T>>,
        main_id: &str,
        options: GraphOptions,
    ) -> Result<Self, GraphError> {
        let GraphOptions {
            chooser,
            animations,
            store,
            play_first_animation,
            default_enter_animation,
            default_exit_animation,
        } = options;

        let mut next_item = 0;
        let (nodes, index) = build_nodes(decls, &mut next_item)?;
        let Some(&main_idx) = index.get(main_id) else {
            return Err(GraphError::UnknownMainMenu {
                id: main_id.to_string(),
            });
        };

        let mut graph = Self {
            nodes,
            index,
            main: main_id.to_string(),
            current: main_idx,
            history: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            animations,
            chooser,
            store,
            default_enter: default_enter_animation,
            default_exit: default_exit_animation,
            pending: Vec::new(),
            next_token: 0,
            next_item,
        };

        graph.load_saved_state();
        for idx in 0..graph.nodes.len() {
            layout::apply(&mut graph.nodes[idx], &*graph.chooser);
        }
        if play_first_animation {
            graph.play_enter_for_current();
        }
        Ok(graph)
    }

    /// Replaces every declaration, re-running discovery materialization.
    ///
    /// The current menu is kept when its id survives the re-scan (falling
    /// back to the main menu otherwise) and history entries whose menus
    /// disappeared are dropped.
    pub fn rescan(&mut self, decls: Vec<MenuDecl<T>>) -> Result<(), GraphError> {
        let current_id = self.nodes[self.current].id().to_string();
        let (nodes, index) = build_nodes(decls, &mut self.next_item)?;
        let Some(&main_idx) = index.get(self.main.as_str()) else {
            return Err(GraphError::UnknownMainMenu {
                id: self.main.clone(),
            });
        };

        self.nodes = nodes;
        self.index = index;
        self.current = match self.index.get(current_id.as_str()) {
            Some(&idx) => idx,
            None => {
                log::warn!(
                    "menu `{current_id}` disappeared in re-scan, returning to `{}`",
                    self.main
                );
                main_idx
            }
        };
        self.history.retain(|id| {
            let known = self.index.contains_key(id.as_str());
            if !known {
                log::warn!("dropping unknown menu `{id}` from history after re-scan");
            }
            known
        });
        for idx in 0..self.nodes.len() {
            layout::apply(&mut self.nodes[idx], &*self.chooser);
        }
        Ok(())
    }
}

impl<T> Graph<T> {
    /// Navigates the graph.
    ///
    /// Forward (`is_back == false`): `label` must name a declared menu.
    /// Resolving to the current menu is a success-without-side-effects
    /// no-op. Otherwise the current id is pushed onto the history before
    /// the move.
    ///
    /// Back (`is_back == true`): with an empty `label`, pops the most
    /// recent history entry; with a non-empty `label`, pops until the
    /// popped id matches or the history is exhausted, navigating to the
    /// last popped id either way.
    ///
    /// `clear_history` empties the history after a committed transition.
    pub fn goto(
        &mut self,
        label: &str,
        is_back: bool,
        clear_history: bool,
    ) -> Result<Commit, NavigationError> {
        let from_idx = self.current;
        let from_id = self.nodes[from_idx].id().to_string();
        let snapshot = self.history.clone();

        let target = if !is_back {
            match self.index.get(label) {
                Some(&idx) if idx == self.current => return Ok(Commit::AlreadyCurrent),
                Some(&idx) => {
                    self.history.push(from_id.clone());
                    idx
                }
                None => {
                    let err = NavigationError::UnknownMenu {
                        label: label.to_string(),
                        current: from_id,
                    };
                    log::error!("{err}");
                    return Err(err);
                }
            }
        } else {
            let Some(mut target_id) = self.history.pop() else {
                let err = NavigationError::NoHistory { current: from_id };
                log::error!("{err}");
                return Err(err);
            };
            if !label.is_empty() {
                // Pop until the label matches or the history is exhausted;
                // the last popped id is the target either way.
                while target_id != label {
                    match self.history.pop() {
                        Some(next) => target_id = next,
                        None => break,
                    }
                }
            }
            match self.index.get(target_id.as_str()) {
                Some(&idx) => idx,
                None => {
                    self.history = snapshot;
                    let err = NavigationError::UnknownMenu {
                        label: target_id,
                        current: from_id,
                    };
                    log::error!("{err}");
                    return Err(err);
                }
            }
        };

        // Show the correct layout on the target before hooks or animations.
        layout::apply(&mut self.nodes[target], &*self.chooser);
        let to_id = self.nodes[target].id().to_string();

        for hook in &mut self.before {
            if hook.before_transition(&from_id, &to_id) == Outcome::Veto {
                self.history = snapshot;
                let err = NavigationError::Vetoed {
                    from: from_id,
                    to: to_id,
                };
                log::debug!("{err}");
                return Err(err);
            }
        }

        let exit = self.nodes[from_idx]
            .exit_animation()
            .map(String::from)
            .or_else(|| self.default_exit.clone());
        let enter = self.nodes[target]
            .enter_animation()
            .map(String::from)
            .or_else(|| self.default_enter.clone());

        self.next_token += 1;
        let token = TransitionToken(self.next_token);
        let cx = AnimationCx {
            from: &from_id,
            to: &to_id,
            is_back,
            token,
        };
        // Initiate both animations before considering either completion.
        let exit_progress = self.animations.run(exit.as_deref(), cx);
        let enter_progress = self.animations.run(enter.as_deref(), cx);
        let remaining = u8::from(exit_progress == Progress::Running)
            + u8::from(enter_progress == Progress::Running);

        self.current = target;
        if clear_history {
            self.history.clear();
        }
        self.persist();

        if remaining == 0 {
            self.fire_after_hooks(&from_id, &to_id);
            Ok(Commit::Complete)
        } else {
            self.pending.push(Pending {
                seq: token.0,
                from: from_id,
                to: to_id,
                remaining,
            });
            Ok(Commit::InFlight(token))
        }
    }

    /// Reports completion of one running animation of a committed
    /// transition.
    ///
    /// Returns `false` (with a debug log) for tokens that are unknown or
    /// already fully settled. Once every running animation of the
    /// transition has settled, its after-hooks run.
    pub fn settle_animation(&mut self, token: TransitionToken) -> bool {
        let Some(pos) = self.pending.iter().position(|p| p.seq == token.0) else {
            log::debug!("ignoring settle for unknown transition token {token:?}");
            return false;
        };
        self.pending[pos].remaining -= 1;
        if self.pending[pos].remaining == 0 {
            let done = self.pending.remove(pos);
            self.fire_after_hooks(&done.from, &done.to);
        }
        true
    }

    /// Re-resolves and applies the layout of the current menu.
    ///
    /// Call whenever the environment may have changed shape (for example a
    /// viewport mutation). Returns `true` when the applied layout changed.
    pub fn force_update_layout(&mut self) -> bool {
        layout::apply(&mut self.nodes[self.current], &*self.chooser)
    }

    /// Registers a transition hook.
    ///
    /// `before_animation` selects the hook list: before-hooks may veto,
    /// after-hooks are fire-and-forget. There is no removal; hooks live as
    /// long as the graph.
    pub fn add_hook(&mut self, hook: Box<dyn TransitionObserver>, before_animation: bool) {
        if before_animation {
            self.before.push(hook);
        } else {
            self.after.push(hook);
        }
    }

    /// The current menu.
    pub fn current_menu(&self) -> &MenuNode<T> {
        &self.nodes[self.current]
    }

    /// The back-history, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Looks up a menu by id.
    pub fn node(&self, id: &str) -> Option<&MenuNode<T>> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Looks up an item instance anywhere in the graph.
    pub fn item(&self, id: ItemId) -> Option<&Item<T>> {
        self.nodes.iter().find_map(|node| node.item(id))
    }

    /// The host-populated animation registry.
    pub fn animations_mut(&mut self) -> &mut AnimationRegistry {
        &mut self.animations
    }

    fn fire_after_hooks(&mut self, from: &str, to: &str) {
        for hook in &mut self.after {
            hook.after_transition(from, to);
        }
    }

    fn persist(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        store.set(CURRENT_KEY, self.nodes[self.current].id());
        let joined = self.history.join(",");
        store.set(HISTORY_KEY, &joined);
    }

    fn load_saved_state(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Some(saved) = store.get(CURRENT_KEY) {
            match self.index.get(saved.as_str()) {
                Some(&idx) => self.current = idx,
                None => log::warn!(
                    "saved menu `{saved}` is not declared, starting at `{}`",
                    self.main
                ),
            }
        }
        if let Some(saved) = store.get(HISTORY_KEY) {
            self.history = saved
                .split(',')
                .filter(|id| !id.is_empty())
                .filter(|id| {
                    let known = self.index.contains_key(*id);
                    if !known {
                        log::warn!("dropping unknown menu `{id}` from saved history");
                    }
                    known
                })
                .map(ToString::to_string)
                .collect();
        }
    }

    fn play_enter_for_current(&mut self) {
        let node = &self.nodes[self.current];
        let id = node.id().to_string();
        let name = node
            .enter_animation()
            .map(String::from)
            .or_else(|| self.default_enter.clone());
        self.next_token += 1;
        let token = TransitionToken(self.next_token);
        // Completion of the first enter animation is not tracked; there is
        // no transition to run after-hooks for.
        let _ = self.animations.run(
            name.as_deref(),
            AnimationCx {
                from: &id,
                to: &id,
                is_back: false,
                token,
            },
        );
    }
}

impl<T> fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("current", &self.nodes[self.current].id())
            .field("history", &self.history)
            .field("menus", &self.nodes.len())
            .field("in_flight", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn build_nodes<T: Clone>(
    decls: Vec<MenuDecl<T>>,
    next_item: &mut u32,
) -> Result<(Vec<MenuNode<T>>, HashMap<String, usize>), GraphError> {
    if decls.is_empty() {
        return Err(GraphError::NoMenus);
    }
    let mut nodes = Vec::with_capacity(decls.len());
    let mut index = HashMap::with_capacity(decls.len());
    for decl in decls {
        let id = decl.id.clone();
        if index.contains_key(&id) {
            return Err(GraphError::DuplicateMenu { id });
        }
        index.insert(id, nodes.len());
        nodes.push(MenuNode::from_decl(decl, next_item));
    }
    Ok((nodes, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Animation;
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::{Cell, RefCell};

    fn decls(ids: &[&str]) -> Vec<MenuDecl<u32>> {
        ids.iter().map(|id| MenuDecl::new(*id, vec![])).collect()
    }

    fn graph(ids: &[&str]) -> Graph<u32> {
        Graph::new(decls(ids), ids[0], GraphOptions::default()).expect("graph")
    }

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<BTreeMap<String, String>>>);

    impl StateStore for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        progress: Progress,
        token: Rc<Cell<Option<TransitionToken>>>,
    }

    impl Animation for Recorder {
        fn run(&mut self, cx: AnimationCx<'_>) -> Progress {
            self.log
                .borrow_mut()
                .push(format!("{} {}->{} back={}", self.label, cx.from, cx.to, cx.is_back));
            self.token.set(Some(cx.token));
            self.progress
        }
    }

    fn recorder(
        label: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
        progress: Progress,
        token: &Rc<Cell<Option<TransitionToken>>>,
    ) -> Box<dyn Animation> {
        Box::new(Recorder {
            label,
            log: Rc::clone(log),
            progress,
            token: Rc::clone(token),
        })
    }

    #[test]
    fn forward_goto_pushes_history_and_back_walks_it() {
        let mut g = graph(&["a", "b", "c"]);

        assert_eq!(g.goto("b", false, false), Ok(Commit::Complete));
        assert_eq!(g.goto("c", false, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "c");
        assert_eq!(g.history(), ["a", "b"]);

        assert_eq!(g.goto("", true, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "b");
        assert_eq!(g.goto("", true, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "a");
        assert_eq!(
            g.goto("", true, false),
            Err(NavigationError::NoHistory {
                current: "a".to_string()
            })
        );
    }

    #[test]
    fn goto_current_menu_is_a_success_no_op() {
        let mut g = graph(&["a", "b"]);
        g.goto("b", false, false).expect("forward");

        assert_eq!(g.goto("b", false, false), Ok(Commit::AlreadyCurrent));
        assert_eq!(g.history(), ["a"]);
        assert_eq!(g.current_menu().id(), "b");
    }

    #[test]
    fn goto_unknown_label_leaves_state_untouched() {
        let mut g = graph(&["a", "b"]);

        let err = g.goto("nope", false, false).expect_err("unknown label");
        assert_eq!(
            err,
            NavigationError::UnknownMenu {
                label: "nope".to_string(),
                current: "a".to_string()
            }
        );
        assert_eq!(g.current_menu().id(), "a");
        assert!(g.history().is_empty());
    }

    #[test]
    fn veto_restores_history_and_skips_later_hooks() {
        let mut g = graph(&["a", "b"]);
        let first = Rc::new(Cell::new(0));
        let third = Rc::new(Cell::new(0));

        let c = Rc::clone(&first);
        g.add_hook(
            before_hook(move |_, _| {
                c.set(c.get() + 1);
                Outcome::Continue
            }),
            true,
        );
        g.add_hook(before_hook(|_, _| Outcome::Veto), true);
        let c = Rc::clone(&third);
        g.add_hook(
            before_hook(move |_, _| {
                c.set(c.get() + 1);
                Outcome::Continue
            }),
            true,
        );

        let err = g.goto("b", false, false).expect_err("vetoed");
        assert_eq!(
            err,
            NavigationError::Vetoed {
                from: "a".to_string(),
                to: "b".to_string()
            }
        );
        assert_eq!(g.current_menu().id(), "a");
        assert!(g.history().is_empty());
        assert_eq!(first.get(), 1);
        assert_eq!(third.get(), 0);
    }

    #[test]
    fn clear_history_makes_back_fail_immediately() {
        let mut g = graph(&["a", "b"]);

        assert_eq!(g.goto("b", false, true), Ok(Commit::Complete));
        assert!(g.history().is_empty());
        assert!(matches!(
            g.goto("", true, false),
            Err(NavigationError::NoHistory { .. })
        ));
    }

    #[test]
    fn back_with_label_pops_to_the_match() {
        let mut g = graph(&["a", "b", "c", "d"]);
        g.goto("b", false, false).expect("a->b");
        g.goto("c", false, false).expect("b->c");
        g.goto("d", false, false).expect("c->d");

        assert_eq!(g.goto("b", true, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "b");
        assert_eq!(g.history(), ["a"]);
    }

    // A label that is nowhere in the history drains it and lands on the
    // oldest entry.
    #[test]
    fn back_label_missing_falls_to_oldest() {
        let mut g = graph(&["a", "b", "c", "d"]);
        g.goto("b", false, false).expect("a->b");
        g.goto("c", false, false).expect("b->c");
        g.goto("d", false, false).expect("c->d");

        assert_eq!(g.goto("zzz", true, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "a");
        assert!(g.history().is_empty());
    }

    #[test]
    fn persistence_round_trips_state() {
        let store = SharedStore::default();
        store
            .0
            .borrow_mut()
            .insert(CURRENT_KEY.to_string(), "b".to_string());
        store
            .0
            .borrow_mut()
            .insert(HISTORY_KEY.to_string(), "a".to_string());

        let options = GraphOptions {
            store: Some(Box::new(store.clone())),
            ..GraphOptions::default()
        };
        let mut g = Graph::new(decls(&["a", "b", "c"]), "a", options).expect("graph");

        assert_eq!(g.current_menu().id(), "b");
        assert_eq!(g.history(), ["a"]);

        g.goto("c", false, false).expect("b->c");
        assert_eq!(store.0.borrow()[CURRENT_KEY], "c");
        assert_eq!(store.0.borrow()[HISTORY_KEY], "a,b");
    }

    #[test]
    fn saved_unknown_menu_falls_back_to_main() {
        let store = SharedStore::default();
        store
            .0
            .borrow_mut()
            .insert(CURRENT_KEY.to_string(), "gone".to_string());
        store
            .0
            .borrow_mut()
            .insert(HISTORY_KEY.to_string(), "a,gone".to_string());

        let options = GraphOptions {
            store: Some(Box::new(store)),
            ..GraphOptions::default()
        };
        let g = Graph::new(decls(&["a", "b"]), "a", options).expect("graph");

        assert_eq!(g.current_menu().id(), "a");
        assert_eq!(g.history(), ["a"]);
    }

    #[test]
    fn synchronous_animations_run_after_hooks_inside_goto() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let token = Rc::new(Cell::new(None));

        let mut decls = decls(&["a", "b"]);
        decls[0].exit_animation = Some("fade.out".to_string());
        decls[1].enter_animation = Some("fade.in".to_string());

        let mut animations = AnimationRegistry::new();
        animations.register("fade.out", recorder("out", &log, Progress::Complete, &token));
        animations.register("fade.in", recorder("in", &log, Progress::Complete, &token));
        let options = GraphOptions {
            animations,
            play_first_animation: false,
            ..GraphOptions::default()
        };
        let mut g = Graph::new(decls, "a", options).expect("graph");

        let hook_log = Rc::clone(&log);
        g.add_hook(
            after_hook(move |from, to| hook_log.borrow_mut().push(format!("after {from}->{to}"))),
            false,
        );

        assert_eq!(g.goto("b", false, false), Ok(Commit::Complete));
        assert_eq!(
            log.borrow().as_slice(),
            [
                "out a->b back=false",
                "in a->b back=false",
                "after a->b"
            ]
        );
    }

    #[test]
    fn running_animations_defer_after_hooks_until_settled() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let token = Rc::new(Cell::new(None));

        let mut decls = decls(&["a", "b"]);
        decls[0].exit_animation = Some("slide.out".to_string());
        decls[1].enter_animation = Some("slide.in".to_string());

        let mut animations = AnimationRegistry::new();
        animations.register("slide.out", recorder("out", &log, Progress::Running, &token));
        animations.register("slide.in", recorder("in", &log, Progress::Running, &token));
        let options = GraphOptions {
            animations,
            play_first_animation: false,
            ..GraphOptions::default()
        };
        let mut g = Graph::new(decls, "a", options).expect("graph");

        let hook_log = Rc::clone(&log);
        g.add_hook(
            after_hook(move |from, to| hook_log.borrow_mut().push(format!("after {from}->{to}"))),
            false,
        );

        let commit = g.goto("b", false, false).expect("b");
        let Commit::InFlight(tok) = commit else {
            panic!("expected an in-flight commit, got {commit:?}");
        };
        assert_eq!(Some(tok), token.get());
        // Current menu updated synchronously, after-hooks still deferred.
        assert_eq!(g.current_menu().id(), "b");
        assert_eq!(log.borrow().len(), 2);

        assert!(g.settle_animation(tok));
        assert_eq!(log.borrow().len(), 2);
        assert!(g.settle_animation(tok));
        assert_eq!(log.borrow().last().map(String::as_str), Some("after a->b"));

        // Fully settled tokens are stale.
        assert!(!g.settle_animation(tok));
    }

    #[test]
    fn unregistered_animation_names_degrade_to_skips() {
        let mut decls = decls(&["a", "b"]);
        decls[1].enter_animation = Some("missing.anim".to_string());

        let options = GraphOptions {
            play_first_animation: false,
            ..GraphOptions::default()
        };
        let mut g = Graph::new(decls, "a", options).expect("graph");

        assert_eq!(g.goto("b", false, false), Ok(Commit::Complete));
        assert_eq!(g.current_menu().id(), "b");
    }

    #[test]
    fn first_enter_animation_plays_at_construction() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let token = Rc::new(Cell::new(None));

        let mut animations = AnimationRegistry::new();
        animations.register("boot.in", recorder("in", &log, Progress::Complete, &token));
        let options = GraphOptions {
            animations,
            default_enter_animation: Some("boot.in".to_string()),
            ..GraphOptions::default()
        };
        let _ = Graph::new(decls(&["a", "b"]), "a", options).expect("graph");

        assert_eq!(log.borrow().as_slice(), ["in a->a back=false"]);
    }

    #[test]
    fn construction_validates_declarations() {
        assert_eq!(
            Graph::<u32>::new(vec![], "a", GraphOptions::default()).err(),
            Some(GraphError::NoMenus)
        );
        assert_eq!(
            Graph::new(decls(&["a", "a"]), "a", GraphOptions::default()).err(),
            Some(GraphError::DuplicateMenu {
                id: "a".to_string()
            })
        );
        assert_eq!(
            Graph::new(decls(&["a"]), "zzz", GraphOptions::default()).err(),
            Some(GraphError::UnknownMainMenu {
                id: "zzz".to_string()
            })
        );
    }

    #[test]
    fn rescan_keeps_current_and_filters_history() {
        let mut g = graph(&["a", "b", "c"]);
        g.goto("b", false, false).expect("a->b");
        g.goto("c", false, false).expect("b->c");

        // "b" disappears; current "c" survives.
        g.rescan(decls(&["a", "c"])).expect("rescan");
        assert_eq!(g.current_menu().id(), "c");
        assert_eq!(g.history(), ["a"]);

        // Current disappears too: fall back to main.
        g.rescan(decls(&["a"])).expect("rescan");
        assert_eq!(g.current_menu().id(), "a");
    }
}
