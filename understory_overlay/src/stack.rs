// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking order, backdrop, and scroll lock derived from the opened list.

use crate::Overlays;
use crate::types::{ComponentFlags, ComponentId};

/// An open component and the z-index it should be shown at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    /// The open component.
    pub component: ComponentId,
    /// Its z-index; later opens stack on top.
    pub z_index: i32,
}

impl<N: Copy + Eq> Overlays<N> {
    /// Open components bottom to top with their z-index.
    pub fn stack(&self) -> impl Iterator<Item = Layer> + '_ {
        let base = self.config.base_z_index;
        let step = self.config.z_index_step;
        self.registry
            .opened()
            .iter()
            .zip(0_i32..)
            .map(move |(&component, level)| Layer {
                component,
                z_index: base.saturating_add(step.saturating_mul(level)),
            })
    }

    /// Z-index of an open component.
    pub fn z_index(&self, id: ComponentId) -> Option<i32> {
        self.stack().find(|l| l.component == id).map(|l| l.z_index)
    }

    /// The topmost open component that shows a backdrop.
    pub fn backdrop_owner(&self) -> Option<ComponentId> {
        self.topmost_with(ComponentFlags::BACKDROP)
    }

    /// Whether page scrolling should be locked.
    pub fn scroll_locked(&self) -> bool {
        self.topmost_with(ComponentFlags::LOCK_SCROLL).is_some()
    }

    fn topmost_with(&self, flag: ComponentFlags) -> Option<ComponentId> {
        self.registry
            .opened()
            .iter()
            .rev()
            .copied()
            .find(|&id| {
                self.registry
                    .get(id)
                    .is_some_and(|c| c.flags().contains(flag))
            })
    }
}
