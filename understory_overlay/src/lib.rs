// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Overlay: headless coordination of floating UI.
//!
//! ## Overview
//!
//! Dropdowns, modals, menus, and tooltips all share one problem: deciding which of
//! them is open, which one receives keyboard input, and which ones must close when
//! something else happens. This crate solves that problem without a DOM. The host
//! describes its document through [`DomLookup`] and registers each widget with a
//! [`Handlers`] capability set; [`Overlays`] does the rest.
//!
//! ## Pieces
//!
//! - [`Registry`](registry::Registry): which components exist and which are open.
//! - [`resolve`]: the innermost open component around a focused or clicked node.
//! - [`router`]: maps a key press onto the active component's handlers, gated by an
//!   allow-list of [`Keybindings`].
//! - [`cascade`]: opening one component closes unrelated ones; closing a component
//!   closes its open descendants first; ancestors are never closed by their children.
//! - Transitions: opens finish on the next [`Overlays::tick`]; animated closes finish
//!   on [`Overlays::transition_end`] or when their timeout passes.
//!
//! ## Example
//!
//! ```
//! use understory_overlay::{
//!     ComponentProps, DomLookup, KeyEvent, NoHandlers, Overlays,
//! };
//!
//! // body(1) > menu A(10) > menu B(20) > item(21)
//! struct Dom;
//! impl DomLookup<u32> for Dom {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         match node {
//!             10 => Some(1),
//!             20 => Some(10),
//!             21 => Some(20),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut overlays = Overlays::new();
//! let a = overlays
//!     .register_component(Some(10), NoHandlers, ComponentProps::default())
//!     .unwrap();
//! let b = overlays
//!     .register_component(Some(20), NoHandlers, ComponentProps::default())
//!     .unwrap();
//!
//! overlays.open(&Dom, a, 0);
//! // B is nested in A, so opening it leaves A open.
//! overlays.open(&Dom, b, 0);
//! assert_eq!(overlays.opened(), [a, b]);
//!
//! // Escape closes only the innermost component around the focused item.
//! overlays.handle_key(&Dom, 21, &KeyEvent::new("Escape"), 0);
//! assert_eq!(overlays.opened(), [a]);
//! ```
//!
//! ## Errors
//!
//! Nothing here fails loudly. Unknown handles, repeated closes, detached targets,
//! and keys outside the allow-list are all no-ops reported through `bool` or
//! `Option` returns.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_focus::TypeaheadHistory;

pub mod cascade;
pub mod handlers;
pub mod keys;
pub mod registry;
pub mod resolve;
pub mod router;
mod stack;
mod transition;
pub mod types;

pub use handlers::{CustomHandler, CustomHandlers, Handlers, NoHandlers};
pub use keys::{Arrow, Key, KeyEvent, Keybindings, Modifiers, Orientation};
pub use registry::{Component, Registry};
pub use router::{Binding, KeyDispatch};
pub use stack::Layer;
pub use types::{
    AutoClose, CloseMode, ComponentFlags, ComponentId, ComponentProps, DomLookup, FlatDom, Phase,
};

use transition::{TransitionKind, Transitions};

/// Coordinator configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Close the active component after its `on_esc` handler runs.
    pub close_on_escape: bool,
    /// Extra time granted to an exit transition before it is forced to finish.
    pub transition_grace_ms: u64,
    /// Z-index of the first opened component.
    pub base_z_index: i32,
    /// Z-index increment for each component opened on top.
    pub z_index_step: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            transition_grace_ms: 50,
            base_z_index: 60,
            z_index_step: 10,
        }
    }
}

/// Coordination context shared by every widget of an application.
///
/// Construct one at startup and pass it by reference to widgets; drop it at teardown.
/// The first-letter search history is shared by all components of one context.
pub struct Overlays<N> {
    pub(crate) registry: Registry<N>,
    pub(crate) keybindings: Keybindings,
    pub(crate) history: TypeaheadHistory,
    pub(crate) transitions: Transitions,
    pub(crate) config: OverlayConfig,
}

impl<N> core::fmt::Debug for Overlays<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Overlays")
            .field("registry", &self.registry)
            .field("keybindings", &self.keybindings)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<N: Copy + Eq> Default for Overlays<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq> Overlays<N> {
    /// A context with the default configuration and keybindings.
    pub fn new() -> Self {
        Self::with_config(OverlayConfig::default())
    }

    /// A context with an explicit configuration.
    pub fn with_config(config: OverlayConfig) -> Self {
        Self {
            registry: Registry::new(),
            keybindings: Keybindings::default(),
            history: TypeaheadHistory::new(),
            transitions: Transitions::default(),
            config,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Read-only access to the registry.
    pub fn registry(&self) -> &Registry<N> {
        &self.registry
    }

    /// Register a widget mounted on `wrapper`.
    ///
    /// Returns `None` when there is no wrapper; nothing is registered then.
    pub fn register_component(
        &mut self,
        wrapper: Option<N>,
        handlers: impl Handlers + 'static,
        props: ComponentProps<N>,
    ) -> Option<ComponentId> {
        let id = self.registry.register(wrapper, Box::new(handlers), props)?;
        log::debug!("registered component {id:?}");
        Some(id)
    }

    /// Record an open or close the widget performed on its own.
    ///
    /// Pending transitions of the component are dropped; the component settles in
    /// the requested state without any handler being called.
    pub fn update_component_state(&mut self, id: ComponentId, is_opened: bool) -> bool {
        if !self.registry.update_state(id, is_opened) {
            return false;
        }
        self.transitions.cancel(id);
        true
    }

    /// Remove a widget. Safe to call more than once.
    pub fn unregister_component(&mut self, id: ComponentId) -> bool {
        if !self.registry.unregister(id) {
            return false;
        }
        self.transitions.cancel(id);
        log::debug!("unregistered component {id:?}");
        true
    }

    /// Named callbacks of a component.
    pub fn custom_handlers_mut(&mut self, id: ComponentId) -> Option<&mut CustomHandlers> {
        self.registry.get_mut(id).map(|c| &mut c.custom)
    }

    /// Invoke a named callback of a component. Unknown components or names are a no-op.
    pub fn call_custom(&mut self, id: ComponentId, name: &str, arg: Option<&str>) -> bool {
        self.registry
            .get_mut(id)
            .is_some_and(|c| c.custom.call(name, arg))
    }

    /// Allow the router to intercept `key`. Returns `false` if it already was.
    pub fn add_allowed_keybinding(&mut self, key: &str) -> bool {
        self.keybindings.add(key)
    }

    /// Stop intercepting `key`. Returns `false` if it was not intercepted.
    pub fn remove_allowed_keybinding(&mut self, key: &str) -> bool {
        self.keybindings.remove(key)
    }

    /// Intercepted key names, sorted.
    pub fn allowed_keybindings(&self) -> Vec<&str> {
        self.keybindings.to_vec()
    }

    /// The first-letter search history shared by all components.
    pub fn history(&self) -> &TypeaheadHistory {
        &self.history
    }

    /// Forget the first-letter search history.
    pub fn reset_history(&mut self) {
        self.history.reset();
    }

    /// Opened components, in the order they opened.
    pub fn opened(&self) -> &[ComponentId] {
        self.registry.opened()
    }

    /// Whether a component is registered and opened.
    pub fn is_opened(&self, id: ComponentId) -> bool {
        self.registry.is_opened(id)
    }

    /// Whether a component is registered.
    pub fn is_registered(&self, id: ComponentId) -> bool {
        self.registry.is_registered(id)
    }

    /// Lifecycle phase of a component.
    pub fn phase(&self, id: ComponentId) -> Option<Phase> {
        self.registry.phase(id)
    }

    /// Finish every transition due at `now`. Returns how many finished.
    ///
    /// Pending opens always finish here; closes finish once their deadline passed.
    pub fn tick(&mut self, now: u64) -> usize {
        let due = self.transitions.take_due(now);
        for pending in &due {
            match pending.kind {
                TransitionKind::Open => self.finish_open(pending.id),
                TransitionKind::Close => {
                    log::debug!("transition of {:?} timed out", pending.id);
                    self.finish_close(pending.id);
                }
            }
        }
        due.len()
    }

    /// The visual layer reports that the transition of `id` ended.
    pub fn transition_end(&mut self, id: ComponentId) -> bool {
        match self.transitions.cancel(id) {
            Some(pending) => {
                match pending.kind {
                    TransitionKind::Open => self.finish_open(id),
                    TransitionKind::Close => self.finish_close(id),
                }
                true
            }
            None => false,
        }
    }

    /// Whether `id` waits for a transition to finish.
    pub fn is_transitioning(&self, id: ComponentId) -> bool {
        self.transitions.is_pending(id)
    }

    /// When the host should call [`tick`](Self::tick) next, if anything is pending.
    pub fn next_deadline(&self) -> Option<u64> {
        self.transitions.next_deadline()
    }
}
