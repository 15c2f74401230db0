// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability set a component exposes to the coordinator.
//!
//! Every method of [`Handlers`] has a no-op default, so a widget only implements
//! the events it cares about. Widget-specific events go through [`CustomHandlers`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::keys::KeyEvent;
use crate::types::CloseMode;

/// Callbacks the coordinator invokes on a component.
///
/// Keyboard callbacks fire for the active component only. Lifecycle callbacks fire
/// when the coordinator opens or closes the component, including forced closes
/// caused by another component opening.
pub trait Handlers {
    /// `Enter` was pressed.
    fn on_enter(&mut self) {}

    /// `Escape` was pressed. The coordinator closes the component afterwards unless
    /// that is disabled in [`OverlayConfig`](crate::OverlayConfig).
    fn on_esc(&mut self) {}

    /// The space bar was pressed (only when `" "` is an allowed keybinding).
    fn on_space(&mut self) {}

    /// An arrow key was pressed; inspect [`KeyEvent::arrow`] for the direction.
    fn on_arrow(&mut self, event: &KeyEvent) {
        let _ = event;
    }

    /// `Tab` was pressed.
    fn on_tab(&mut self) {}

    /// `Shift+Tab` was pressed.
    fn on_shift_tab(&mut self) {}

    /// `Home` was pressed.
    fn on_home(&mut self) {}

    /// `End` was pressed.
    fn on_end(&mut self) {}

    /// A printable character was typed. `matched` is the index into
    /// [`item_labels`](Self::item_labels) picked by first-letter search.
    fn on_first_letter(&mut self, key: char, matched: Option<usize>) {
        let _ = (key, matched);
    }

    /// Labels of the focusable items, in order, for first-letter search.
    fn item_labels(&self) -> &[String] {
        &[]
    }

    /// The component was marked open; set up the enter transition.
    fn before_open(&mut self) {}

    /// The open completed on the tick after [`before_open`](Self::before_open).
    fn after_open(&mut self) {}

    /// The component was marked closed; start the exit transition, if any.
    fn before_close(&mut self, mode: CloseMode) {
        let _ = mode;
    }

    /// The close completed; tear down backdrops and restore scrolling.
    fn after_close(&mut self) {}
}

/// A component that reacts to nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHandlers;

impl Handlers for NoHandlers {}

/// A named callback taking an optional argument.
pub type CustomHandler = Box<dyn FnMut(Option<&str>)>;

/// Named callbacks for widget-specific events.
#[derive(Default)]
pub struct CustomHandlers {
    handlers: HashMap<String, CustomHandler>,
}

impl core::fmt::Debug for CustomHandlers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl CustomHandlers {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, handler: impl FnMut(Option<&str>) + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Remove the callback named `name`. Returns `false` if there was none.
    pub fn remove(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    /// Whether a callback named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Invoke the callback named `name`. Unknown names are a no-op returning `false`.
    pub fn call(&mut self, name: &str, arg: Option<&str>) -> bool {
        match self.handlers.get_mut(name) {
            Some(handler) => {
                handler(arg);
                true
            }
            None => false,
        }
    }

    /// Installed callback names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
