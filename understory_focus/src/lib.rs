// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: headless roving focus primitives.
//!
//! This crate models keyboard focus movement inside a single container (a menu,
//! a listbox, a modal's focus trap) as a combination of:
//! - **Navigation intents** ([`Navigation`]) such as [`Navigation::Next`] (Tab, or
//!   the "forward" arrow of a menu) and [`Navigation::First`] (Home).
//! - A **read-only view of candidates** ([`FocusEntry`] / [`FocusSpace`]) listing
//!   the focusable items of the container in document order.
//! - Pluggable **policies** ([`FocusPolicy`]) that select the next focused item
//!   given an origin and a navigation intent.
//! - **Typeahead** ([`typeahead`]): first-letter search that cycles through
//!   repeated matches using a small history tracker.
//!
//! ## Minimal example
//!
//! A focus trap over two buttons: Tab on the last one wraps back to the first.
//!
//! ```rust
//! use understory_focus::{
//!     DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode,
//! };
//!
//! let entries = [FocusEntry::new(1_u32), FocusEntry::new(2_u32)];
//!
//! let space = FocusSpace { nodes: &entries };
//! let policy = DefaultPolicy { wrap: WrapMode::Scope };
//!
//! // Tab moves from the first button to the second…
//! assert_eq!(policy.next(Some(1), Navigation::Next, &space), Some(2));
//! // …and wraps back to the first.
//! assert_eq!(policy.next(Some(2), Navigation::Next, &space), Some(1));
//! // Home and End ignore the origin.
//! assert_eq!(policy.next(None, Navigation::Last, &space), Some(2));
//! ```
//!
//! The core types are generic over the item identifier `K`, so callers can use any small,
//! copyable handle (an index into a menu, a DOM node handle, an application-specific id).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use core::cmp::Ordering;

use smallvec::SmallVec;

pub mod typeahead;

pub use typeahead::{TypeaheadHistory, first_letter_match};

/// Direction of focus navigation.
///
/// These values represent high-level navigation intents. Hosts map physical keys
/// onto them according to the container's orientation (for example, `ArrowDown`
/// is [`Navigation::Next`] in a vertical menu, `ArrowRight` in a horizontal tab list).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in forward order (for example, Tab).
    Next,
    /// Move to the previous candidate (for example, Shift+Tab).
    Prev,
    /// Move to the first candidate (for example, Home).
    First,
    /// Move to the last candidate (for example, End).
    Last,
}

/// A single focusable candidate within a [`FocusSpace`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this focusable item.
    pub id: K,
    /// Optional explicit ordering key.
    ///
    /// Entries with an explicit order come before entries without one, mirroring
    /// positive `tabindex` values in a document.
    pub order: Option<i32>,
    /// Whether this item is enabled for focus.
    pub enabled: bool,
}

impl<K> FocusEntry<K> {
    /// An enabled entry in document order.
    pub const fn new(id: K) -> Self {
        Self {
            id,
            order: None,
            enabled: true,
        }
    }
}

/// A read-only view of focusable candidates, in document order.
///
/// Policies should treat it as an immutable snapshot.
#[derive(Clone, Debug)]
pub struct FocusSpace<'a, K> {
    /// Focusable candidates of the current container.
    pub nodes: &'a [FocusEntry<K>],
}

/// Wrap mode configuration for focus traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the sequence yields no next candidate.
    Never,
    /// Wrap within the current container. This is what a focus trap uses.
    Scope,
}

/// Trait for focus traversal policies.
///
/// A policy receives a navigation intent, the currently focused item (if focus is
/// inside the container at all), and a read-only view of candidates, and returns
/// the next focused item if any.
pub trait FocusPolicy<K>
where
    K: Copy + Eq,
{
    /// Compute the next focus target given an origin, navigation intent, and focus space.
    fn next(&self, origin: Option<K>, direction: Navigation, space: &FocusSpace<'_, K>)
    -> Option<K>;
}

/// Default linear traversal policy.
///
/// Disabled entries are skipped. Entries with an explicit order come first, sorted
/// by that order; the rest keep document order. When the origin is not part of the
/// space, `Next` lands on the first candidate and `Prev` on the last one.
#[derive(Copy, Clone, Debug)]
pub struct DefaultPolicy {
    /// Wrap behavior when traversing focusable candidates.
    pub wrap: WrapMode,
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Scope,
        }
    }
}

impl<K> FocusPolicy<K> for DefaultPolicy
where
    K: Copy + Eq,
{
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        space: &FocusSpace<'_, K>,
    ) -> Option<K> {
        let nodes = space.nodes;
        let indices = ordered_candidates(nodes);
        let (&first, &last) = (indices.first()?, indices.last()?);

        let origin_pos = origin.and_then(|o| indices.iter().position(|&i| nodes[i].id == o));
        let wraps = matches!(self.wrap, WrapMode::Scope);

        let picked = match direction {
            Navigation::First => first,
            Navigation::Last => last,
            Navigation::Next => match origin_pos {
                Some(pos) if pos + 1 < indices.len() => indices[pos + 1],
                Some(_) if wraps => first,
                Some(_) => return None,
                None => first,
            },
            Navigation::Prev => match origin_pos {
                Some(pos) if pos > 0 => indices[pos - 1],
                Some(_) if wraps => last,
                Some(_) => return None,
                None => last,
            },
        };
        Some(nodes[picked].id)
    }
}

fn ordered_candidates<K>(nodes: &[FocusEntry<K>]) -> SmallVec<[usize; 16]> {
    let mut indices: SmallVec<[usize; 16]> = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.enabled.then_some(i))
        .collect();
    // Stable sort keeps document order among equal keys.
    indices.sort_by(|&ia, &ib| compare_linear(&nodes[ia], &nodes[ib]));
    indices
}

fn compare_linear<K>(a: &FocusEntry<K>, b: &FocusEntry<K>) -> Ordering {
    match (a.order, b.order) {
        (Some(ao), Some(bo)) => ao.cmp(&bo),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
