// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard routing.
//!
//! ## Overview
//!
//! A key press is routed to the active component: the innermost open component
//! around the focused node (see [`resolve_active`]). Nothing happens when no
//! component is active, and the host keeps the default action of the key.
//!
//! ## Gating
//!
//! Only keys in the allow-list ([`Keybindings`](crate::Keybindings)) are routed.
//! Printable characters are allowed through the
//! [`PRINTABLE_KEYS`](crate::keys::PRINTABLE_KEYS) entry unless disallowed by name;
//! typed without Ctrl, Alt, or Meta they drive first-letter search. Allowed keys
//! without a built-in meaning go to the component's custom handler registered
//! under the key name.
//!
//! ## Mapping
//!
//! | Key              | Handler                                                 |
//! |------------------|---------------------------------------------------------|
//! | `Enter`          | [`on_enter`](crate::Handlers::on_enter)                 |
//! | `Escape`         | [`on_esc`](crate::Handlers::on_esc), then close         |
//! | `" "`            | [`on_space`](crate::Handlers::on_space)                 |
//! | arrows           | [`on_arrow`](crate::Handlers::on_arrow)                 |
//! | `Home` / `End`   | [`on_home`](crate::Handlers::on_home) / [`on_end`](crate::Handlers::on_end) |
//! | `Tab`            | [`on_tab`](crate::Handlers::on_tab) or [`on_shift_tab`](crate::Handlers::on_shift_tab) |
//! | printable char   | [`on_first_letter`](crate::Handlers::on_first_letter)   |

use alloc::string::String;

use understory_focus::first_letter_match;

use crate::Overlays;
use crate::keys::{Arrow, Key, KeyEvent};
use crate::resolve::resolve_active;
use crate::types::{CloseMode, ComponentFlags, ComponentId, DomLookup};

/// The handler a key press was routed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// [`Handlers::on_enter`](crate::Handlers::on_enter).
    Enter,
    /// [`Handlers::on_esc`](crate::Handlers::on_esc).
    Escape,
    /// [`Handlers::on_space`](crate::Handlers::on_space).
    Space,
    /// [`Handlers::on_arrow`](crate::Handlers::on_arrow).
    Arrow(Arrow),
    /// [`Handlers::on_home`](crate::Handlers::on_home).
    Home,
    /// [`Handlers::on_end`](crate::Handlers::on_end).
    End,
    /// [`Handlers::on_tab`](crate::Handlers::on_tab).
    Tab,
    /// [`Handlers::on_shift_tab`](crate::Handlers::on_shift_tab).
    ShiftTab,
    /// [`Handlers::on_first_letter`](crate::Handlers::on_first_letter) with the typed
    /// character and the item picked by first-letter search.
    FirstLetter {
        /// Typed character.
        key: char,
        /// Index of the picked item.
        matched: Option<usize>,
    },
    /// A custom handler, by name.
    Custom(String),
}

/// Report of a routed key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDispatch {
    /// The active component that received the key.
    pub component: ComponentId,
    /// The handler that ran.
    pub binding: Binding,
    /// Whether the host should suppress the key's default action.
    ///
    /// Tab keeps its default (moving focus) unless the component traps focus.
    pub prevent_default: bool,
}

impl<N: Copy + Eq> Overlays<N> {
    /// Route a key press on the focused node `focus`.
    ///
    /// Returns `None` when the key was not routed: no active component, key not
    /// allowed, or a custom key without a handler.
    pub fn handle_key<D: DomLookup<N>>(
        &mut self,
        dom: &D,
        focus: N,
        event: &KeyEvent,
        now: u64,
    ) -> Option<KeyDispatch> {
        let Some(active) = resolve_active(&self.registry, dom, focus) else {
            log::trace!("key {:?} ignored: no active component", event.key);
            return None;
        };

        if !self.keybindings.contains(&event.key) {
            log::trace!("key {:?} ignored: not allowed", event.key);
            return None;
        }

        let binding = match (event.first_letter(), event.parsed()) {
            (Some(key), _) => Binding::FirstLetter { key, matched: None },
            (None, Key::Enter) => Binding::Enter,
            (None, Key::Escape) => Binding::Escape,
            (None, Key::Space) => Binding::Space,
            (None, Key::Arrow(arrow)) => Binding::Arrow(arrow),
            (None, Key::Home) => Binding::Home,
            (None, Key::End) => Binding::End,
            (None, Key::Tab) if event.shift() => Binding::ShiftTab,
            (None, Key::Tab) => Binding::Tab,
            (None, Key::Character(_) | Key::Other(_)) => Binding::Custom(event.key.clone()),
        };

        let component = self.registry.get_mut(active)?;
        let traps_focus = component.flags().contains(ComponentFlags::TRAP_FOCUS);
        let binding = match binding {
            Binding::Enter => {
                component.handlers.on_enter();
                Binding::Enter
            }
            Binding::Escape => {
                component.handlers.on_esc();
                Binding::Escape
            }
            Binding::Space => {
                component.handlers.on_space();
                Binding::Space
            }
            Binding::Arrow(arrow) => {
                component.handlers.on_arrow(event);
                Binding::Arrow(arrow)
            }
            Binding::Home => {
                component.handlers.on_home();
                Binding::Home
            }
            Binding::End => {
                component.handlers.on_end();
                Binding::End
            }
            Binding::Tab => {
                component.handlers.on_tab();
                Binding::Tab
            }
            Binding::ShiftTab => {
                component.handlers.on_shift_tab();
                Binding::ShiftTab
            }
            Binding::FirstLetter { key, .. } => {
                let labels = component.handlers.item_labels().iter().map(String::as_str);
                let matched = first_letter_match(labels, key, &mut self.history);
                component.handlers.on_first_letter(key, matched);
                Binding::FirstLetter { key, matched }
            }
            Binding::Custom(name) => {
                if !component.custom.call(&name, None) {
                    log::trace!("key {name:?} ignored: no custom handler");
                    return None;
                }
                Binding::Custom(name)
            }
        };

        let prevent_default = match binding {
            Binding::Tab | Binding::ShiftTab => traps_focus,
            _ => true,
        };
        log::trace!("key {:?} routed to {active:?} as {binding:?}", event.key);

        if binding == Binding::Escape && self.config.close_on_escape {
            self.close(dom, active, CloseMode::Animated, now);
        }

        Some(KeyDispatch {
            component: active,
            binding,
            prevent_default,
        })
    }

    /// The component that would receive a key press on `focus`.
    pub fn active_component<D: DomLookup<N>>(&self, dom: &D, focus: N) -> Option<ComponentId> {
        resolve_active(&self.registry, dom, focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Handlers;
    use crate::keys::{Modifiers, PRINTABLE_KEYS};
    use crate::resolve::tests::TestDom;
    use crate::types::ComponentProps;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Menu {
        tag: &'static str,
        journal: Journal,
        labels: Vec<String>,
    }

    impl Menu {
        fn new(tag: &'static str, journal: &Journal) -> Self {
            Self {
                tag,
                journal: journal.clone(),
                labels: Vec::new(),
            }
        }

        fn log(&self, event: &str) {
            self.journal
                .borrow_mut()
                .push(alloc::format!("{}:{event}", self.tag));
        }
    }

    impl Handlers for Menu {
        fn on_enter(&mut self) {
            self.log("enter");
        }
        fn on_esc(&mut self) {
            self.log("esc");
        }
        fn on_arrow(&mut self, event: &KeyEvent) {
            self.log(&alloc::format!("arrow {:?}", event.arrow()));
        }
        fn on_tab(&mut self) {
            self.log("tab");
        }
        fn on_shift_tab(&mut self) {
            self.log("shift-tab");
        }
        fn on_first_letter(&mut self, key: char, matched: Option<usize>) {
            self.log(&alloc::format!("letter {key} {matched:?}"));
        }
        fn item_labels(&self) -> &[String] {
            &self.labels
        }
        fn before_close(&mut self, _: CloseMode) {
            self.log("close");
        }
    }

    // 1 (body) > 10 (menu A) > 20 (menu B) > 21 (item); 2 (outside)
    fn dom() -> TestDom {
        TestDom::new(&[(10, 1), (20, 10), (21, 20), (2, 1)])
    }

    fn setup(journal: &Journal) -> (Overlays<u32>, ComponentId, ComponentId) {
        let mut overlays = Overlays::new();
        let a = overlays
            .register_component(Some(10), Menu::new("a", journal), ComponentProps::default())
            .unwrap();
        let mut b_menu = Menu::new("b", journal);
        b_menu.labels = vec!["Apple".into(), "Avocado".into(), "Banana".into()];
        let b = overlays
            .register_component(
                Some(20),
                b_menu,
                ComponentProps {
                    flags: ComponentFlags::TRAP_FOCUS,
                    ..ComponentProps::default()
                },
            )
            .unwrap();
        (overlays, a, b)
    }

    #[test]
    fn no_active_component_means_no_routing() {
        let journal = Journal::default();
        let (mut overlays, a, _) = setup(&journal);
        let dom = dom();
        assert_eq!(overlays.handle_key(&dom, 21, &KeyEvent::new("Enter"), 0), None);
        overlays.open(&dom, a, 0);
        assert_eq!(overlays.handle_key(&dom, 2, &KeyEvent::new("Enter"), 0), None);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn keys_route_to_innermost_open_component() {
        let journal = Journal::default();
        let (mut overlays, a, b) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.open(&dom, b, 0);

        let dispatch = overlays
            .handle_key(&dom, 21, &KeyEvent::new("ArrowDown"), 0)
            .unwrap();
        assert_eq!(dispatch.component, b);
        assert_eq!(dispatch.binding, Binding::Arrow(Arrow::Down));
        assert!(dispatch.prevent_default);
        assert_eq!(*journal.borrow(), ["b:arrow Some(Down)"]);
    }

    #[test]
    fn allow_list_gates_routing() {
        let journal = Journal::default();
        let (mut overlays, a, _) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);

        assert!(overlays.remove_allowed_keybinding("Enter"));
        assert_eq!(overlays.handle_key(&dom, 10, &KeyEvent::new("Enter"), 0), None);
        assert_eq!(overlays.handle_key(&dom, 10, &KeyEvent::new("PageDown"), 0), None);
        assert!(journal.borrow().is_empty());

        assert!(overlays.add_allowed_keybinding("Enter"));
        assert!(overlays.handle_key(&dom, 10, &KeyEvent::new("Enter"), 0).is_some());
        assert_eq!(*journal.borrow(), ["a:enter"]);
        assert!(!overlays.allowed_keybindings().is_empty());
    }

    #[test]
    fn tab_prevents_default_only_when_trapping_focus() {
        let journal = Journal::default();
        let (mut overlays, a, b) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);

        let tab = overlays.handle_key(&dom, 10, &KeyEvent::new("Tab"), 0).unwrap();
        assert_eq!(tab.binding, Binding::Tab);
        assert!(!tab.prevent_default);

        overlays.open(&dom, b, 0);
        let shift_tab = KeyEvent::new("Tab").with_modifiers(Modifiers::SHIFT);
        let back = overlays.handle_key(&dom, 21, &shift_tab, 0).unwrap();
        assert_eq!(back.binding, Binding::ShiftTab);
        assert!(back.prevent_default);
        assert_eq!(*journal.borrow(), ["a:tab", "b:shift-tab"]);
    }

    #[test]
    fn first_letter_cycles_through_matches() {
        let journal = Journal::default();
        let (mut overlays, a, b) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.open(&dom, b, 0);

        let picks: Vec<Option<usize>> = (0..4)
            .map(|_| {
                match overlays
                    .handle_key(&dom, 21, &KeyEvent::new("a"), 0)
                    .map(|d| d.binding)
                {
                    Some(Binding::FirstLetter { matched, .. }) => matched,
                    other => panic!("unexpected dispatch {other:?}"),
                }
            })
            .collect();
        assert_eq!(picks, [Some(0), Some(1), Some(0), Some(1)]);

        // Shortcut modifiers keep the key for the host.
        let ctrl_a = KeyEvent::new("a").with_modifiers(Modifiers::CTRL);
        assert_eq!(overlays.handle_key(&dom, 21, &ctrl_a, 0), None);
    }

    #[test]
    fn disallowed_letters_are_not_routed() {
        let journal = Journal::default();
        let (mut overlays, a, b) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.open(&dom, b, 0);

        assert!(overlays.remove_allowed_keybinding("a"));
        assert_eq!(overlays.handle_key(&dom, 21, &KeyEvent::new("a"), 0), None);
        assert!(overlays.handle_key(&dom, 21, &KeyEvent::new("b"), 0).is_some());

        assert!(overlays.remove_allowed_keybinding(PRINTABLE_KEYS));
        assert_eq!(overlays.handle_key(&dom, 21, &KeyEvent::new("b"), 0), None);
        assert_eq!(*journal.borrow(), ["b:letter b Some(2)"]);
    }

    #[test]
    fn symbols_drive_first_letter_search() {
        let journal = Journal::default();
        let (mut overlays, a, _) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);

        let dispatch = overlays
            .handle_key(&dom, 10, &KeyEvent::new("/"), 0)
            .unwrap();
        assert_eq!(dispatch.binding, Binding::FirstLetter {
            key: '/',
            matched: None
        });
        assert_eq!(*journal.borrow(), ["a:letter / None"]);
    }

    #[test]
    fn custom_keys_go_to_named_handlers() {
        let journal = Journal::default();
        let (mut overlays, a, _) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.add_allowed_keybinding("PageDown");

        // Allowed but unhandled.
        assert_eq!(overlays.handle_key(&dom, 10, &KeyEvent::new("PageDown"), 0), None);

        let sink = journal.clone();
        overlays
            .custom_handlers_mut(a)
            .unwrap()
            .insert("PageDown", move |_| sink.borrow_mut().push("a:page-down".into()));
        let dispatch = overlays
            .handle_key(&dom, 10, &KeyEvent::new("PageDown"), 0)
            .unwrap();
        assert_eq!(dispatch.binding, Binding::Custom("PageDown".into()));
        assert_eq!(*journal.borrow(), ["a:page-down"]);
    }

    #[test]
    fn escape_closes_only_the_innermost_component() {
        let journal = Journal::default();
        let (mut overlays, a, b) = setup(&journal);
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.open(&dom, b, 0);
        assert_eq!(overlays.opened(), [a, b]);

        let dispatch = overlays
            .handle_key(&dom, 21, &KeyEvent::new("Escape"), 0)
            .unwrap();
        assert_eq!(dispatch.component, b);
        assert_eq!(overlays.opened(), [a]);
        assert_eq!(*journal.borrow(), ["b:esc", "b:close"]);
    }

    #[test]
    fn escape_can_leave_closing_to_the_handler() {
        let journal = Journal::default();
        let mut overlays = Overlays::with_config(crate::OverlayConfig {
            close_on_escape: false,
            ..crate::OverlayConfig::default()
        });
        let a = overlays
            .register_component(Some(10_u32), Menu::new("a", &journal), ComponentProps::default())
            .unwrap();
        let dom = dom();
        overlays.open(&dom, a, 0);
        overlays.handle_key(&dom, 10, &KeyEvent::new("Escape"), 0);
        assert_eq!(overlays.opened(), [a]);
        assert_eq!(*journal.borrow(), ["a:esc"]);
    }
}
