// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active component resolution.
//!
//! ## Overview
//!
//! Walks from an event target up through its ancestors and picks the first open
//! component mounted on one of them. A component matches a node when the node is
//! its wrapper or its context root, so content portaled out of the wrapper still
//! resolves to its owner.
//!
//! ## Ties
//!
//! - The innermost match wins; ancestors are only reached when nothing closer is open.
//! - Two open components on the same node resolve to the one opened last.
//!
//! Nothing here is cached: every event resolves against the current registry.

use crate::registry::{Component, Registry};
use crate::types::{ComponentId, DomLookup};

/// Iterator over a node and its ancestors, innermost first.
#[derive(Debug)]
pub struct Ancestors<'a, N, D> {
    dom: &'a D,
    next: Option<N>,
}

impl<N: Copy, D: DomLookup<N>> Iterator for Ancestors<'_, N, D> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.next?;
        self.next = self.dom.parent_of(&current);
        Some(current)
    }
}

/// `node` followed by its ancestors up to the root.
///
/// The caller ensures the document is acyclic.
pub fn ancestors<N: Copy, D: DomLookup<N>>(dom: &D, node: N) -> Ancestors<'_, N, D> {
    Ancestors {
        dom,
        next: Some(node),
    }
}

fn mounted_on<N: Copy + Eq>(component: &Component<N>, node: N) -> bool {
    component.wrapper() == node || component.context() == Some(node)
}

/// The innermost open component whose wrapper or context contains `node`.
pub fn find_closest_open_parent<N, D>(
    registry: &Registry<N>,
    dom: &D,
    node: N,
) -> Option<ComponentId>
where
    N: Copy + Eq,
    D: DomLookup<N>,
{
    ancestors(dom, node).find_map(|n| {
        registry
            .opened()
            .iter()
            .rev()
            .copied()
            .find(|&id| registry.get(id).is_some_and(|c| mounted_on(c, n)))
    })
}

/// The component that receives keyboard input for an event targeting `target`.
///
/// Targets detached from the document resolve to nothing.
pub fn resolve_active<N, D>(registry: &Registry<N>, dom: &D, target: N) -> Option<ComponentId>
where
    N: Copy + Eq,
    D: DomLookup<N>,
{
    if !dom.is_connected(&target) {
        return None;
    }
    find_closest_open_parent(registry, dom, target)
}

/// Whether `node` lies inside the wrapper or context subtree of `id`.
pub fn contains<N, D>(registry: &Registry<N>, dom: &D, id: ComponentId, node: N) -> bool
where
    N: Copy + Eq,
    D: DomLookup<N>,
{
    let Some(component) = registry.get(id) else {
        return false;
    };
    ancestors(dom, node).any(|n| mounted_on(component, n))
}

/// Whether `descendant` is nested inside `ancestor`.
///
/// Nesting is decided by the descendant's wrapper: it must sit strictly below the
/// ancestor's wrapper, or anywhere inside the ancestor's context subtree. A
/// component is never its own ancestor.
pub fn is_ancestor<N, D>(
    registry: &Registry<N>,
    dom: &D,
    ancestor: ComponentId,
    descendant: ComponentId,
) -> bool
where
    N: Copy + Eq,
    D: DomLookup<N>,
{
    if ancestor == descendant {
        return false;
    }
    let (Some(outer), Some(inner)) = (registry.get(ancestor), registry.get(descendant)) else {
        return false;
    };
    let wrapper = inner.wrapper();
    if outer.context().is_some_and(|ctx| ctx == wrapper) {
        return true;
    }
    if outer.wrapper() == wrapper {
        return false;
    }
    ancestors(dom, wrapper).any(|n| mounted_on(outer, n))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::handlers::NoHandlers;
    use crate::types::{ComponentProps, FlatDom};
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use hashbrown::HashMap;

    /// A document described by child → parent edges.
    #[derive(Default)]
    pub(crate) struct TestDom {
        pub(crate) parents: HashMap<u32, u32>,
        pub(crate) detached: Vec<u32>,
    }

    impl TestDom {
        pub(crate) fn new(edges: &[(u32, u32)]) -> Self {
            Self {
                parents: edges.iter().copied().collect(),
                detached: Vec::new(),
            }
        }
    }

    impl DomLookup<u32> for TestDom {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            self.parents.get(node).copied()
        }

        fn is_connected(&self, node: &u32) -> bool {
            !self.detached.contains(node)
        }
    }

    fn register(registry: &mut Registry<u32>, wrapper: u32, context: Option<u32>) -> ComponentId {
        registry
            .register(
                Some(wrapper),
                Box::new(NoHandlers),
                ComponentProps {
                    context,
                    ..ComponentProps::default()
                },
            )
            .unwrap()
    }

    // 1 (body)
    // ├── 10 (menu A)
    // │   ├── 11 (item)
    // │   └── 20 (menu B)
    // │       └── 21 (item)
    // └── 30 (portal of A)
    //     └── 31 (item)
    fn dom() -> TestDom {
        TestDom::new(&[(10, 1), (11, 10), (20, 10), (21, 20), (30, 1), (31, 30)])
    }

    #[test]
    fn innermost_open_component_wins() {
        let dom = dom();
        let mut registry = Registry::new();
        let a = register(&mut registry, 10, None);
        let b = register(&mut registry, 20, None);
        registry.update_state(a, true);
        registry.update_state(b, true);

        assert_eq!(resolve_active(&registry, &dom, 21), Some(b));
        assert_eq!(resolve_active(&registry, &dom, 11), Some(a));
        assert_eq!(resolve_active(&registry, &dom, 1), None);

        // Closed components are transparent.
        registry.update_state(b, false);
        assert_eq!(resolve_active(&registry, &dom, 21), Some(a));
    }

    #[test]
    fn context_root_counts_as_inside() {
        let dom = dom();
        let mut registry = Registry::new();
        let a = register(&mut registry, 10, Some(30));
        registry.update_state(a, true);

        assert_eq!(resolve_active(&registry, &dom, 31), Some(a));
        assert!(contains(&registry, &dom, a, 31));
        assert!(!contains(&registry, &dom, a, 1));
    }

    #[test]
    fn detached_target_resolves_to_nothing() {
        let mut dom = dom();
        let mut registry = Registry::new();
        let a = register(&mut registry, 10, None);
        registry.update_state(a, true);
        dom.detached.push(11);

        assert_eq!(resolve_active(&registry, &dom, 11), None);
        // The structural query does not care.
        assert_eq!(find_closest_open_parent(&registry, &dom, 11), Some(a));
    }

    #[test]
    fn same_node_resolves_to_last_opened() {
        let mut registry = Registry::new();
        let a = register(&mut registry, 5, None);
        let b = register(&mut registry, 5, None);
        registry.update_state(b, true);
        registry.update_state(a, true);
        assert_eq!(resolve_active(&registry, &FlatDom, 5), Some(a));
    }

    #[test]
    fn ancestry_follows_wrappers_and_contexts() {
        let dom = dom();
        let mut registry = Registry::new();
        let a = register(&mut registry, 10, Some(30));
        let b = register(&mut registry, 20, None);
        // A submenu rendered inside A's portal.
        let c = register(&mut registry, 31, None);
        let unrelated = register(&mut registry, 1, None);

        assert!(is_ancestor(&registry, &dom, a, b));
        assert!(is_ancestor(&registry, &dom, a, c));
        assert!(!is_ancestor(&registry, &dom, b, a));
        assert!(!is_ancestor(&registry, &dom, a, a));
        assert!(is_ancestor(&registry, &dom, unrelated, a));
        assert!(!is_ancestor(&registry, &dom, b, c));
    }
}
