// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Close cascades.
//!
//! ## Opening
//!
//! Opening a component first closes every open component that is neither one of its
//! ancestors nor exempt through [`AutoClose`] (a component without
//! [`AutoClose::OUTSIDE`] survives unrelated components opening). The component is
//! then marked open and [`Handlers::before_open`](crate::Handlers::before_open)
//! runs; [`Handlers::after_open`](crate::Handlers::after_open) follows on the next
//! [`Overlays::tick`].
//!
//! ## Closing
//!
//! Closing a component closes its open descendants first, innermost first, so a
//! parent never disappears while a child is still showing. Closing a child never
//! touches its ancestors. Each close marks the component closed right away, calls
//! [`Handlers::before_close`](crate::Handlers::before_close), and finishes with
//! [`Handlers::after_close`](crate::Handlers::after_close) either immediately or once
//! the exit transition ends.
//!
//! ## Triggers
//!
//! - [`Overlays::open`], [`Overlays::close`], [`Overlays::toggle`], [`Overlays::close_all`].
//! - [`Overlays::handle_click`]: inside and outside clicks, filtered by [`AutoClose`].
//! - [`Overlays::handle_resize`]: positioned components close without animation.
//! - Escape, through [`Overlays::handle_key`].

use smallvec::SmallVec;

use crate::Overlays;
use crate::resolve::{contains, find_closest_open_parent, is_ancestor};
use crate::transition::TransitionKind;
use crate::types::{AutoClose, CloseMode, ComponentFlags, ComponentId, DomLookup, Phase};

type Ids = SmallVec<[ComponentId; 8]>;

impl<N: Copy + Eq> Overlays<N> {
    /// Open a component, closing unrelated open components first.
    ///
    /// Returns `false` if the component is unknown or already open.
    pub fn open<D: DomLookup<N>>(&mut self, dom: &D, id: ComponentId, now: u64) -> bool {
        match self.registry.phase(id) {
            None | Some(Phase::Opening | Phase::Open) => return false,
            Some(Phase::Closing) => {
                self.transitions.cancel(id);
                self.finish_close(id);
            }
            Some(Phase::Closed) => {}
        }

        let others: Ids = self
            .registry
            .opened()
            .iter()
            .rev()
            .copied()
            .filter(|&other| {
                !is_ancestor(&self.registry, dom, other, id)
                    && self
                        .registry
                        .get(other)
                        .is_some_and(|c| c.auto_close().contains(AutoClose::OUTSIDE))
            })
            .collect();
        for other in others {
            self.close(dom, other, CloseMode::Animated, now);
        }

        self.registry.set_phase(id, Phase::Opening);
        if let Some(component) = self.registry.get_mut(id) {
            component.handlers.before_open();
        }
        self.transitions.schedule(id, TransitionKind::Open, now);
        log::debug!("opening {id:?}");
        true
    }

    /// Close a component and its open descendants.
    ///
    /// Returns `false` if the component is unknown or not open.
    pub fn close<D: DomLookup<N>>(
        &mut self,
        dom: &D,
        id: ComponentId,
        mode: CloseMode,
        now: u64,
    ) -> bool {
        if !self.registry.is_opened(id) {
            return false;
        }
        for target in self.close_order(dom, id) {
            self.begin_close(target, mode, now);
        }
        true
    }

    /// Open a closed component or close an open one.
    pub fn toggle<D: DomLookup<N>>(&mut self, dom: &D, id: ComponentId, now: u64) -> bool {
        if self.registry.is_opened(id) {
            self.close(dom, id, CloseMode::Animated, now)
        } else {
            self.open(dom, id, now)
        }
    }

    /// Close every open component. Returns how many closed.
    pub fn close_all<D: DomLookup<N>>(&mut self, dom: &D, mode: CloseMode, now: u64) -> usize {
        let before = self.registry.opened().len();
        let roots: Ids = self.registry.opened().iter().rev().copied().collect();
        for id in roots {
            self.close(dom, id, mode, now);
        }
        before - self.registry.opened().len()
    }

    /// React to a click on `target`. Returns how many components closed.
    ///
    /// The innermost open component around the target closes only with
    /// [`AutoClose::INSIDE`]; components around it are left alone. Every other open
    /// component closes with [`AutoClose::OUTSIDE`]. Detached targets are ignored.
    pub fn handle_click<D: DomLookup<N>>(&mut self, dom: &D, target: N, now: u64) -> usize {
        if !dom.is_connected(&target) {
            return 0;
        }
        let before = self.registry.opened().len();
        let inner = find_closest_open_parent(&self.registry, dom, target);

        let doomed: Ids = self
            .registry
            .opened()
            .iter()
            .rev()
            .copied()
            .filter(|&id| {
                let Some(component) = self.registry.get(id) else {
                    return false;
                };
                let auto_close = component.auto_close();
                if Some(id) == inner {
                    auto_close.contains(AutoClose::INSIDE)
                } else if contains(&self.registry, dom, id, target) {
                    false
                } else {
                    auto_close.contains(AutoClose::OUTSIDE)
                }
            })
            .collect();
        for id in doomed {
            self.close(dom, id, CloseMode::Animated, now);
        }

        let closed = before - self.registry.opened().len();
        log::trace!("click closed {closed} component(s)");
        closed
    }

    /// Close positioned components without animation after a viewport resize.
    ///
    /// Returns how many components closed.
    pub fn handle_resize<D: DomLookup<N>>(&mut self, dom: &D, now: u64) -> usize {
        let before = self.registry.opened().len();
        let positioned: Ids = self
            .registry
            .opened()
            .iter()
            .rev()
            .copied()
            .filter(|&id| {
                self.registry
                    .get(id)
                    .is_some_and(|c| c.flags().contains(ComponentFlags::POSITIONED))
            })
            .collect();
        for id in positioned {
            self.close(dom, id, CloseMode::Immediate, now);
        }
        before - self.registry.opened().len()
    }

    /// `id` preceded by its open descendants, innermost first.
    fn close_order<D: DomLookup<N>>(&self, dom: &D, id: ComponentId) -> Ids {
        let mut order = Ids::new();
        let mut stack: SmallVec<[(ComponentId, bool); 8]> = SmallVec::new();
        stack.push((id, false));
        while let Some((current, expanded)) = stack.pop() {
            if order.contains(&current) {
                continue;
            }
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            // Children opened last close first. Entries still being expanded are
            // skipped so overlapping contexts cannot loop.
            for &child in self.registry.opened() {
                if !order.contains(&child)
                    && !stack.iter().any(|&(s, expanding)| expanding && s == child)
                    && is_ancestor(&self.registry, dom, current, child)
                {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    fn begin_close(&mut self, id: ComponentId, mode: CloseMode, now: u64) {
        let Some(component) = self.registry.get_mut(id) else {
            return;
        };
        if !component.is_opened() {
            return;
        }
        let transition_ms = component.transition_ms();
        component.handlers.before_close(mode);
        // A pending open never completes once the close started.
        self.transitions.cancel(id);
        self.registry.set_phase(id, Phase::Closing);
        log::debug!("closing {id:?} ({mode:?})");

        match (mode, transition_ms) {
            (CloseMode::Animated, Some(ms)) => {
                let deadline = now
                    .saturating_add(ms)
                    .saturating_add(self.config.transition_grace_ms);
                self.transitions
                    .schedule(id, TransitionKind::Close, deadline);
            }
            _ => self.finish_close(id),
        }
    }

    pub(crate) fn finish_open(&mut self, id: ComponentId) {
        if self.registry.phase(id) != Some(Phase::Opening) {
            return;
        }
        self.registry.set_phase(id, Phase::Open);
        if let Some(component) = self.registry.get_mut(id) {
            component.handlers.after_open();
        }
        log::debug!("opened {id:?}");
    }

    pub(crate) fn finish_close(&mut self, id: ComponentId) {
        if self.registry.phase(id) != Some(Phase::Closing) {
            return;
        }
        self.registry.set_phase(id, Phase::Closed);
        if let Some(component) = self.registry.get_mut(id) {
            component.handlers.after_close();
        }
        log::debug!("closed {id:?}");
    }
}
