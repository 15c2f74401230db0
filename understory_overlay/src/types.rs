// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: component handles, flags, lifecycle phases, and the document lookup trait.

use alloc::string::String;

/// Identifier for a registered component (generational).
///
/// Handles of unregistered components stay invalid even after their slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComponentId(pub(crate) u32, pub(crate) u32);

impl ComponentId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Behavior flags of a component.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ComponentFlags: u8 {
        /// Positioned relative to its trigger; closed without animation on resize.
        const POSITIONED  = 0b0000_0001;
        /// Tab and Shift+Tab stay inside the component while it is open.
        const TRAP_FOCUS  = 0b0000_0010;
        /// Shows a backdrop behind itself while open.
        const BACKDROP    = 0b0000_0100;
        /// Locks page scrolling while open.
        const LOCK_SCROLL = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Which clicks close a component automatically.
    ///
    /// `all()` closes on any click (the usual dropdown behavior), `empty()` never
    /// closes automatically. Opening another, unrelated component counts as an
    /// outside interaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AutoClose: u8 {
        /// Close when a click lands inside the component.
        const INSIDE  = 0b01;
        /// Close when a click lands outside the component.
        const OUTSIDE = 0b10;
    }
}

impl Default for AutoClose {
    fn default() -> Self {
        Self::all()
    }
}

/// Lifecycle phase of a component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Closed and settled.
    #[default]
    Closed,
    /// Marked open; waiting for the next tick before the open completes.
    Opening,
    /// Open and settled.
    Open,
    /// Marked closed; waiting for its exit transition to end.
    Closing,
}

impl Phase {
    /// Whether the component counts as opened.
    ///
    /// The flag flips at the start of a transition, so a second close request
    /// arriving mid-transition is a no-op.
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

/// How a close is carried out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloseMode {
    /// Run the exit transition and finish when it ends (or times out).
    Animated,
    /// Finish right away, for example when the layout it was positioned against is stale.
    Immediate,
}

/// Registration properties of a component.
#[derive(Clone, Debug)]
pub struct ComponentProps<N> {
    /// Whether the component starts out open.
    pub is_opened: bool,
    /// Free-form name used for lookups.
    pub name: String,
    /// Selector identifying the component's markup root.
    pub selector: String,
    /// Alternate subtree root for content rendered outside the wrapper (for example a
    /// menu portaled into the document body).
    pub context: Option<N>,
    /// Behavior flags.
    pub flags: ComponentFlags,
    /// Auto-close behavior.
    pub auto_close: AutoClose,
    /// Exit transition duration in milliseconds, or `None` when the component does not animate.
    pub transition_ms: Option<u64>,
}

impl<N> Default for ComponentProps<N> {
    fn default() -> Self {
        Self {
            is_opened: false,
            name: String::new(),
            selector: String::new(),
            context: None,
            flags: ComponentFlags::empty(),
            auto_close: AutoClose::default(),
            transition_ms: None,
        }
    }
}

/// Read-only view of the host document tree.
///
/// Nodes are opaque handles; the coordination core only needs to walk from a node
/// to its parent and to know whether a node is still part of the document.
pub trait DomLookup<N> {
    /// Parent of `node`, or `None` at the root.
    fn parent_of(&self, node: &N) -> Option<N>;

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: &N) -> bool {
        let _ = node;
        true
    }
}

/// A document without hierarchy: every node is its own root.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlatDom;

impl<N> DomLookup<N> for FlatDom {
    fn parent_of(&self, _: &N) -> Option<N> {
        None
    }
}
