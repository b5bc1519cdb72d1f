// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition coordination: typed animation registry and completion tracking.
//!
//! Animations are host-defined, side-effecting operations resolved by name
//! from an explicit [`AnimationRegistry`]. An animation may finish inside
//! [`Animation::run`] ([`Progress::Complete`]) or keep running after it
//! returns ([`Progress::Running`]), in which case the host must settle it
//! later through [`Graph::settle_animation`](crate::Graph::settle_animation)
//! using the token carried in [`AnimationCx`].
//!
//! The coordinator itself never blocks: exit and enter animations are both
//! initiated before either completion is considered, menu state is updated
//! at `goto` return time, and after-hooks are deferred until every running
//! animation of the transition has settled. There is no executor involved;
//! completion is an external discrete event, exactly like input.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use hashbrown::HashMap;

/// Context handed to an animation when a transition starts.
#[derive(Copy, Clone, Debug)]
pub struct AnimationCx<'a> {
    /// Menu being left.
    pub from: &'a str,
    /// Menu being entered.
    pub to: &'a str,
    /// Whether this is a back transition.
    pub is_back: bool,
    /// Token identifying the transition. An animation that returns
    /// [`Progress::Running`] must eventually settle this token, exactly
    /// once, through the graph.
    pub token: TransitionToken,
}

/// How far an animation got inside [`Animation::run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The animation finished synchronously (or was skipped).
    Complete,
    /// The animation keeps running; the host settles it later.
    Running,
}

/// A named animation capability, registered by the host.
pub trait Animation {
    /// Start the animation for the given transition.
    fn run(&mut self, cx: AnimationCx<'_>) -> Progress;
}

/// Identifies one committed transition with in-flight animations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TransitionToken(pub(crate) u64);

/// Explicit name → animation mapping.
///
/// Lookup failures are not fatal: a transition naming an unregistered
/// animation logs a warning and proceeds without it.
#[derive(Default)]
pub struct AnimationRegistry {
    entries: HashMap<String, Box<dyn Animation>>,
}

impl AnimationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `animation` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, animation: Box<dyn Animation>) {
        self.entries.insert(name.into(), animation);
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Run the named animation, degrading missing names to a logged skip.
    pub(crate) fn run(&mut self, name: Option<&str>, cx: AnimationCx<'_>) -> Progress {
        let Some(name) = name else {
            return Progress::Complete;
        };
        match self.entries.get_mut(name) {
            Some(animation) => animation.run(cx),
            None => {
                log::warn!("animation `{name}` not found, skipping");
                Progress::Complete
            }
        }
    }
}

impl fmt::Debug for AnimationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRegistry")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// A committed transition whose animations have not all settled yet.
#[derive(Clone, Debug)]
pub(crate) struct Pending {
    pub(crate) seq: u64,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) remaining: u8,
}
