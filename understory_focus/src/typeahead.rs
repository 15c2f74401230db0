// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-letter search ("typeahead") for menus and lists.
//!
//! Typing a letter moves focus to the next item whose label starts with that letter.
//! Typing the same letter again moves on to the following match, and once every
//! match has been visited the search starts over from the top.
//!
//! ```
//! use understory_focus::typeahead::{TypeaheadHistory, first_letter_match};
//!
//! let labels = ["Apple", "Avocado", "Banana"];
//! let mut history = TypeaheadHistory::new();
//!
//! let picks: Vec<_> = (0..4)
//!     .map(|_| first_letter_match(labels, 'a', &mut history))
//!     .collect();
//! assert_eq!(picks, [Some(0), Some(1), Some(0), Some(1)]);
//! ```
//!
//! The history only stores the last matched index. It does not remember which
//! letter or which container produced it, so sharing one history between several
//! menus lets a search in one menu influence the next search in another.

use smallvec::SmallVec;

/// Remembers the last index picked by [`first_letter_match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeaheadHistory {
    last: Option<usize>,
}

impl TypeaheadHistory {
    /// An empty history; every index is new.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `index` as the last visited match.
    pub fn record(&mut self, index: usize) {
        self.last = Some(index);
    }

    /// Whether `index` lies past the last recorded index.
    pub fn is_new(&self, index: usize) -> bool {
        self.last.is_none_or(|last| index > last)
    }

    /// Forget the last recorded index.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The last recorded index, if any.
    pub fn last(&self) -> Option<usize> {
        self.last
    }
}

/// Find the item to focus when `key` is typed.
///
/// `labels` are the visible labels of the container's focusable items, in order.
/// Leading whitespace is ignored and the comparison is case-insensitive. Pass an
/// empty label for items that must never match (for example disabled items).
///
/// Returns the first matching index past the last recorded one and records it.
/// When every match has already been visited, the history is reset and the first
/// match is returned instead. Returns `None` without touching the history when
/// nothing matches.
pub fn first_letter_match<'a, I>(
    labels: I,
    key: char,
    history: &mut TypeaheadHistory,
) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let matches: SmallVec<[usize; 8]> = labels
        .into_iter()
        .enumerate()
        .filter_map(|(i, label)| starts_with_ignore_case(label, key).then_some(i))
        .collect();
    let &first = matches.first()?;

    let picked = match matches.iter().copied().find(|&i| history.is_new(i)) {
        Some(i) => i,
        None => {
            history.reset();
            first
        }
    };
    history.record(picked);
    Some(picked)
}

fn starts_with_ignore_case(label: &str, key: char) -> bool {
    label
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.to_lowercase().eq(key.to_lowercase()))
}
