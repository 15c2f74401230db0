// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending open and close transitions.
//!
//! Opens complete on the next tick. Closes complete when the visual layer reports
//! the end of the exit transition, or once their deadline passes, whichever comes
//! first. Timestamps are milliseconds on a host-chosen monotonic clock.

use smallvec::SmallVec;

use crate::types::ComponentId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TransitionKind {
    Open,
    Close,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pending {
    pub(crate) id: ComponentId,
    pub(crate) kind: TransitionKind,
    pub(crate) deadline: u64,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Transitions {
    pending: SmallVec<[Pending; 4]>,
}

impl Transitions {
    /// Schedule a transition, replacing any pending one for the same component.
    pub(crate) fn schedule(&mut self, id: ComponentId, kind: TransitionKind, deadline: u64) {
        self.cancel(id);
        self.pending.push(Pending { id, kind, deadline });
    }

    pub(crate) fn cancel(&mut self, id: ComponentId) -> Option<Pending> {
        let pos = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(pos))
    }

    /// Remove and return every transition due at `now`, in scheduling order.
    pub(crate) fn take_due(&mut self, now: u64) -> SmallVec<[Pending; 4]> {
        let mut due = SmallVec::new();
        self.pending.retain(|p| {
            let ready = match p.kind {
                TransitionKind::Open => true,
                TransitionKind::Close => now >= p.deadline,
            };
            if ready {
                due.push(*p);
            }
            !ready
        });
        due
    }

    pub(crate) fn is_pending(&self, id: ComponentId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest close deadline; pending opens are due immediately.
    pub(crate) fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.deadline).min()
    }
}
