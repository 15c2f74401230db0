// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input types and the allow-list of globally intercepted keys.
//!
//! Key names follow the DOM `KeyboardEvent.key` values: `"Enter"`, `"Escape"`,
//! `"ArrowDown"`, `" "` for the space bar, `"a"` for a letter, and so on.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashSet;
use understory_focus::Navigation;

/// Arrow key direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arrow {
    /// `ArrowUp`.
    Up,
    /// `ArrowDown`.
    Down,
    /// `ArrowLeft`.
    Left,
    /// `ArrowRight`.
    Right,
}

/// Layout direction of a list of items.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items stacked top to bottom (menus, listboxes).
    Vertical,
    /// Items laid out left to right (tab lists, toolbars).
    Horizontal,
}

impl Arrow {
    /// The focus movement this arrow means in a list with the given orientation.
    ///
    /// Arrows across the orientation have no meaning and return `None`.
    pub fn navigation(self, orientation: Orientation) -> Option<Navigation> {
        match (orientation, self) {
            (Orientation::Vertical, Self::Down) | (Orientation::Horizontal, Self::Right) => {
                Some(Navigation::Next)
            }
            (Orientation::Vertical, Self::Up) | (Orientation::Horizontal, Self::Left) => {
                Some(Navigation::Prev)
            }
            _ => None,
        }
    }
}

/// A parsed key name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// `Enter`.
    Enter,
    /// `Escape`.
    Escape,
    /// The space bar (`" "`).
    Space,
    /// One of the four arrows.
    Arrow(Arrow),
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `Tab`.
    Tab,
    /// A single printable character.
    Character(char),
    /// Any other key name, kept verbatim.
    Other(&'a str),
}

impl<'a> Key<'a> {
    /// Parse a DOM key name.
    pub fn from_name(name: &'a str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            " " => Self::Space,
            "ArrowUp" => Self::Arrow(Arrow::Up),
            "ArrowDown" => Self::Arrow(Arrow::Down),
            "ArrowLeft" => Self::Arrow(Arrow::Left),
            "ArrowRight" => Self::Arrow(Arrow::Right),
            "Home" => Self::Home,
            "End" => Self::End,
            "Tab" => Self::Tab,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Self::Character(c),
                    _ => Self::Other(name),
                }
            }
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
        /// Meta / Command / Windows.
        const META  = 0b1000;
    }
}

/// A key press as delivered by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// DOM key name.
    pub key: String,
    /// Modifiers held during the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The parsed key.
    pub fn parsed(&self) -> Key<'_> {
        Key::from_name(&self.key)
    }

    /// The arrow of this press, if it is one.
    pub fn arrow(&self) -> Option<Arrow> {
        match self.parsed() {
            Key::Arrow(arrow) => Some(arrow),
            _ => None,
        }
    }

    /// Whether Shift was held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// The character typed for first-letter search, if this press is one.
    ///
    /// Any single printable character qualifies except the space bar, and not while
    /// Ctrl, Alt, or Meta is held, so shortcuts of the host page pass through.
    pub fn first_letter(&self) -> Option<char> {
        if self
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
        {
            return None;
        }
        match self.parsed() {
            Key::Character(c) => Some(c),
            _ => None,
        }
    }
}

/// Allow-list entry standing for every single printable character.
///
/// While it is allowed, individual characters can still be disallowed by name.
pub const PRINTABLE_KEYS: &str = "Printable";

/// Key names intercepted by default.
pub const DEFAULT_KEYBINDINGS: [&str; 10] = [
    "Enter",
    "Escape",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Home",
    "End",
    "Tab",
    PRINTABLE_KEYS,
];

/// Allow-list of key names the router intercepts.
///
/// Names are opaque strings: unknown names are accepted and simply never match a
/// key press the host does not produce. Single printable characters are allowed
/// either by name or through [`PRINTABLE_KEYS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keybindings {
    keys: HashSet<String>,
    /// Characters disallowed by name while [`PRINTABLE_KEYS`] is allowed.
    excluded: HashSet<String>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYBINDINGS.iter().map(ToString::to_string).collect(),
            excluded: HashSet::new(),
        }
    }
}

fn is_printable(key: &str) -> bool {
    matches!(Key::from_name(key), Key::Character(_))
}

impl Keybindings {
    /// An empty allow-list.
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
            excluded: HashSet::new(),
        }
    }

    /// Allow `key`. Returns `false` if it was already allowed.
    pub fn add(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        if self.excluded.remove(key) {
            return true;
        }
        self.keys.insert(key.to_string())
    }

    /// Disallow `key`. Returns `false` if it was not allowed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.keys.remove(key);
        if key == PRINTABLE_KEYS {
            self.excluded.clear();
        }
        if self.contains(key) {
            self.excluded.insert(key.to_string());
            return true;
        }
        removed
    }

    /// Whether `key` is allowed.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
            || (is_printable(key)
                && self.keys.contains(PRINTABLE_KEYS)
                && !self.excluded.contains(key))
    }

    /// Allowed key names, sorted.
    pub fn to_vec(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of allowed names.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is allowed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
