// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component registry: the single source of truth for which components exist and
//! which of them are open.
//!
//! Components live in generational slots, so a stale [`ComponentId`] never aliases a
//! component registered later. The registry keeps an "opened" list in opening order
//! next to the per-component phase; the two never diverge.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::handlers::{CustomHandlers, Handlers};
use crate::types::{AutoClose, ComponentFlags, ComponentId, ComponentProps, Phase};

/// A registered component.
pub struct Component<N> {
    generation: u32,
    wrapper: N,
    context: Option<N>,
    name: String,
    selector: String,
    flags: ComponentFlags,
    auto_close: AutoClose,
    transition_ms: Option<u64>,
    phase: Phase,
    pub(crate) handlers: Box<dyn Handlers>,
    pub(crate) custom: CustomHandlers,
}

impl<N: core::fmt::Debug> core::fmt::Debug for Component<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Component")
            .field("wrapper", &self.wrapper)
            .field("context", &self.context)
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("flags", &self.flags)
            .field("auto_close", &self.auto_close)
            .field("phase", &self.phase)
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}

impl<N: Copy> Component<N> {
    /// The node the component is mounted on.
    pub fn wrapper(&self) -> N {
        self.wrapper
    }

    /// The alternate subtree root, if any.
    pub fn context(&self) -> Option<N> {
        self.context
    }
}

impl<N> Component<N> {
    /// Lookup name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Markup selector.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Behavior flags.
    pub fn flags(&self) -> ComponentFlags {
        self.flags
    }

    /// Auto-close behavior.
    pub fn auto_close(&self) -> AutoClose {
        self.auto_close
    }

    /// Exit transition duration in milliseconds.
    pub fn transition_ms(&self) -> Option<u64> {
        self.transition_ms
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the component counts as opened.
    pub fn is_opened(&self) -> bool {
        self.phase.is_opened()
    }
}

/// Arena of registered components.
pub struct Registry<N> {
    slots: Vec<Option<Component<N>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    opened: Vec<ComponentId>,
}

impl<N> core::fmt::Debug for Registry<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.len())
            .field("free_list", &self.free_list.len())
            .field("opened", &self.opened)
            .finish_non_exhaustive()
    }
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Registry<N> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            opened: Vec::new(),
        }
    }

    /// Register a component mounted on `wrapper`.
    ///
    /// Returns `None` (and registers nothing) when there is no wrapper.
    pub fn register(
        &mut self,
        wrapper: Option<N>,
        handlers: Box<dyn Handlers>,
        props: ComponentProps<N>,
    ) -> Option<ComponentId> {
        let wrapper = wrapper?;
        let ComponentProps {
            is_opened,
            name,
            selector,
            context,
            flags,
            auto_close,
            transition_ms,
        } = props;

        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        self.slots[idx] = Some(Component {
            generation,
            wrapper,
            context,
            name,
            selector,
            flags,
            auto_close,
            transition_ms,
            phase: Phase::Closed,
            handlers,
            custom: CustomHandlers::new(),
        });

        #[allow(
            clippy::cast_possible_truncation,
            reason = "ComponentId uses 32-bit indices by design."
        )]
        let id = ComponentId::new(idx as u32, generation);
        if is_opened {
            self.set_phase(id, Phase::Open);
        }
        Some(id)
    }

    /// Remove a component. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ComponentId) -> bool {
        if !self.is_registered(id) {
            return false;
        }
        self.opened.retain(|&o| o != id);
        self.slots[id.idx()] = None;
        self.free_list.push(id.idx());
        true
    }

    /// Record that a component opened or closed outside the coordinator.
    ///
    /// Settles the component in [`Phase::Open`] or [`Phase::Closed`]. Returns `false`
    /// if the component is unknown or already in the requested state.
    pub fn update_state(&mut self, id: ComponentId, is_opened: bool) -> bool {
        match self.get(id) {
            Some(c) if c.is_opened() != is_opened => {}
            _ => return false,
        }
        let phase = if is_opened { Phase::Open } else { Phase::Closed };
        self.set_phase(id, phase)
    }

    /// Move a component to `phase`, keeping the opened list in sync.
    pub(crate) fn set_phase(&mut self, id: ComponentId, phase: Phase) -> bool {
        let Some(component) = self.get_mut(id) else {
            return false;
        };
        let was_opened = component.is_opened();
        component.phase = phase;
        match (was_opened, phase.is_opened()) {
            (false, true) => self.opened.push(id),
            (true, false) => self.opened.retain(|&o| o != id),
            _ => {}
        }
        true
    }

    /// Whether `id` refers to a live component.
    pub fn is_registered(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Whether `id` is registered and opened.
    pub fn is_opened(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(Component::is_opened)
    }

    /// Phase of a live component.
    pub fn phase(&self, id: ComponentId) -> Option<Phase> {
        self.get(id).map(Component::phase)
    }

    /// Access a live component.
    pub fn get(&self, id: ComponentId) -> Option<&Component<N>> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|c| c.generation == id.generation())
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component<N>> {
        self.slots
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|c| c.generation == id.generation())
    }

    /// Opened components, in the order they opened.
    pub fn opened(&self) -> &[ComponentId] {
        &self.opened
    }

    /// All live components, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ComponentId uses 32-bit indices by design."
            )]
            let idx = idx as u32;
            slot.as_ref().map(|c| ComponentId::new(idx, c.generation))
        })
    }

    /// First live component with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ComponentId> {
        self.ids().find(|&id| self.get(id).is_some_and(|c| c.name == name))
    }

    /// First live component with the given selector.
    pub fn find_by_selector(&self, selector: &str) -> Option<ComponentId> {
        self.ids()
            .find(|&id| self.get(id).is_some_and(|c| c.selector == selector))
    }

    /// Number of live components.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no component is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::NoHandlers;
    use alloc::vec;

    fn props(name: &str) -> ComponentProps<u32> {
        ComponentProps {
            name: name.into(),
            selector: alloc::format!(".{name}"),
            ..ComponentProps::default()
        }
    }

    fn assert_consistent(registry: &Registry<u32>) {
        let flagged: Vec<ComponentId> = registry
            .ids()
            .filter(|&id| registry.is_opened(id))
            .collect();
        let mut listed = registry.opened().to_vec();
        listed.sort_by_key(|id| id.idx());
        assert_eq!(flagged, listed);
    }

    #[test]
    fn register_without_wrapper_is_a_no_op() {
        let mut registry: Registry<u32> = Registry::new();
        assert!(registry.register(None, Box::new(NoHandlers), props("menu")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn initially_open_component_is_listed() {
        let mut registry = Registry::new();
        let id = registry
            .register(
                Some(1_u32),
                Box::new(NoHandlers),
                ComponentProps {
                    is_opened: true,
                    ..props("menu")
                },
            )
            .unwrap();
        assert_eq!(registry.opened(), [id]);
        assert_eq!(registry.phase(id), Some(Phase::Open));
    }

    #[test]
    fn update_state_is_idempotent() {
        let mut registry = Registry::new();
        let id = registry
            .register(Some(1_u32), Box::new(NoHandlers), props("menu"))
            .unwrap();
        assert!(!registry.update_state(id, false));
        assert!(registry.update_state(id, true));
        assert!(!registry.update_state(id, true));
        assert_eq!(registry.opened(), [id]);
        assert!(registry.update_state(id, false));
        assert!(registry.opened().is_empty());
    }

    #[test]
    fn unregister_is_safe_to_repeat_and_invalidates_handle() {
        let mut registry = Registry::new();
        let a = registry
            .register(Some(1_u32), Box::new(NoHandlers), props("a"))
            .unwrap();
        registry.update_state(a, true);
        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));
        assert!(registry.opened().is_empty());

        // The slot is reused with a new generation; the old handle stays dead.
        let b = registry
            .register(Some(2_u32), Box::new(NoHandlers), props("b"))
            .unwrap();
        assert_eq!(a.idx(), b.idx());
        assert!(!registry.is_registered(a));
        assert!(!registry.update_state(a, true));
        assert!(registry.opened().is_empty());
    }

    #[test]
    fn lookup_by_name_and_selector() {
        let mut registry = Registry::new();
        let a = registry
            .register(Some(1_u32), Box::new(NoHandlers), props("menu-a"))
            .unwrap();
        let b = registry
            .register(Some(2_u32), Box::new(NoHandlers), props("menu-b"))
            .unwrap();
        assert_eq!(registry.find_by_name("menu-b"), Some(b));
        assert_eq!(registry.find_by_selector(".menu-a"), Some(a));
        assert_eq!(registry.find_by_name("missing"), None);
        assert_eq!(registry.get(a).map(Component::wrapper), Some(1));
    }

    #[test]
    fn opened_list_tracks_flags_across_mixed_operations() {
        let mut registry = Registry::new();
        let mut ids = vec![];
        // Small deterministic LCG drives a mixed sequence of operations.
        let mut seed = 0x2545_f491_u32;
        for step in 0..400_u32 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let roll = (seed >> 16) % 10;
            match roll {
                0..=2 => {
                    let id = registry
                        .register(Some(step), Box::new(NoHandlers), props("c"))
                        .unwrap();
                    ids.push(id);
                }
                3..=5 if !ids.is_empty() => {
                    let id = ids[((seed >> 3) as usize) % ids.len()];
                    registry.update_state(id, true);
                }
                6..=7 if !ids.is_empty() => {
                    let id = ids[((seed >> 3) as usize) % ids.len()];
                    registry.update_state(id, false);
                }
                8 if !ids.is_empty() => {
                    let id = ids[((seed >> 3) as usize) % ids.len()];
                    registry.unregister(id);
                }
                _ => {}
            }
            assert_consistent(&registry);
        }
    }
}
