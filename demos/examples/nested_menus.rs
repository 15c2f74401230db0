// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested menus and a focus-trapping dialog driven by `understory_overlay`.
//!
//! The document lives in a `HashMap` of parent links. Each widget keeps its own
//! highlighted item behind an `Rc<RefCell<_>>` so the demo can print it after every
//! routed key.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example nested_menus`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use understory_focus::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation};
use understory_overlay::{
    CloseMode, ComponentFlags, ComponentProps, DomLookup, Handlers, KeyEvent, Modifiers,
    Orientation, Overlays,
};

/// Parent links of the demo document.
struct Dom {
    parents: HashMap<u32, u32>,
}

impl DomLookup<u32> for Dom {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.parents.get(node).copied()
    }
}

/// A vertical menu that moves its highlight with arrows and first letters.
struct Menu {
    name: &'static str,
    labels: Vec<String>,
    highlight: Rc<RefCell<Option<usize>>>,
}

impl Menu {
    fn new(name: &'static str, labels: &[&str], highlight: Rc<RefCell<Option<usize>>>) -> Self {
        Self {
            name,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            highlight,
        }
    }

    fn navigate(&mut self, direction: Navigation) {
        let entries: Vec<FocusEntry<usize>> = (0..self.labels.len()).map(FocusEntry::new).collect();
        let space = FocusSpace { nodes: &entries };
        let current = *self.highlight.borrow();
        let next = DefaultPolicy::default().next(current, direction, &space);
        *self.highlight.borrow_mut() = next;
    }
}

impl Handlers for Menu {
    fn on_arrow(&mut self, event: &KeyEvent) {
        if let Some(direction) = event
            .arrow()
            .and_then(|arrow| arrow.navigation(Orientation::Vertical))
        {
            self.navigate(direction);
        }
    }

    fn on_home(&mut self) {
        self.navigate(Navigation::First);
    }

    fn on_end(&mut self) {
        self.navigate(Navigation::Last);
    }

    fn on_enter(&mut self) {
        if let Some(i) = *self.highlight.borrow() {
            println!("{}: activated {:?}", self.name, self.labels[i]);
        }
    }

    fn on_first_letter(&mut self, _key: char, matched: Option<usize>) {
        if matched.is_some() {
            *self.highlight.borrow_mut() = matched;
        }
    }

    fn item_labels(&self) -> &[String] {
        &self.labels
    }

    fn after_open(&mut self) {
        println!("{}: shown", self.name);
    }

    fn before_close(&mut self, mode: CloseMode) {
        println!("{}: closing ({mode:?})", self.name);
        *self.highlight.borrow_mut() = None;
    }

    fn after_close(&mut self) {
        println!("{}: hidden", self.name);
    }
}

/// A dialog that cycles focus through its buttons without letting Tab escape.
struct Dialog {
    focus: Rc<RefCell<Option<u32>>>,
    buttons: Vec<FocusEntry<u32>>,
}

impl Dialog {
    fn cycle(&mut self, direction: Navigation) {
        let space = FocusSpace {
            nodes: &self.buttons,
        };
        let current = *self.focus.borrow();
        *self.focus.borrow_mut() = DefaultPolicy::default().next(current, direction, &space);
    }
}

impl Handlers for Dialog {
    fn on_tab(&mut self) {
        self.cycle(Navigation::Next);
    }

    fn on_shift_tab(&mut self) {
        self.cycle(Navigation::Prev);
    }
}

fn main() {
    env_logger::init();

    // 1 body
    // ├── 10 menu "File"
    // │   ├── 11..=13 items
    // │   └── 20 submenu "Recent"
    // │       └── 21..=22 items
    // ├── 40 dialog
    // │   └── 41..=43 buttons
    // └── 2 canvas
    let dom = Dom {
        parents: [
            (10, 1),
            (11, 10),
            (12, 10),
            (13, 10),
            (20, 10),
            (21, 20),
            (22, 20),
            (40, 1),
            (41, 40),
            (42, 40),
            (43, 40),
            (2, 1),
        ]
        .into_iter()
        .collect(),
    };

    let mut overlays = Overlays::new();
    let file_highlight = Rc::new(RefCell::new(None));
    let recent_highlight = Rc::new(RefCell::new(None));
    let dialog_focus = Rc::new(RefCell::new(None));

    let Some(file) = overlays.register_component(
        Some(10),
        Menu::new(
            "file",
            &["New", "Open", "Recent", "Save", "Save as"],
            file_highlight.clone(),
        ),
        ComponentProps {
            name: "file".into(),
            selector: "#file-menu".into(),
            flags: ComponentFlags::POSITIONED,
            transition_ms: Some(120),
            ..ComponentProps::default()
        },
    ) else {
        return;
    };
    let Some(recent) = overlays.register_component(
        Some(20),
        Menu::new("recent", &["notes.txt", "todo.md"], recent_highlight.clone()),
        ComponentProps {
            name: "recent".into(),
            flags: ComponentFlags::POSITIONED,
            ..ComponentProps::default()
        },
    ) else {
        return;
    };
    let Some(dialog) = overlays.register_component(
        Some(40),
        Dialog {
            focus: dialog_focus.clone(),
            buttons: (41..=43).map(FocusEntry::new).collect(),
        },
        ComponentProps {
            name: "dialog".into(),
            flags: ComponentFlags::TRAP_FOCUS
                | ComponentFlags::BACKDROP
                | ComponentFlags::LOCK_SCROLL,
            ..ComponentProps::default()
        },
    ) else {
        return;
    };

    log::info!("registered {} components", overlays.registry().len());

    let mut now = 0;
    let press = |overlays: &mut Overlays<u32>, focus: u32, event: KeyEvent, now: u64| {
        let dispatch = overlays.handle_key(&dom, focus, &event, now);
        println!("key {:?} on {focus} -> {dispatch:?}", event.key);
    };

    // Open "File", then its nested "Recent" submenu: both stay open.
    overlays.open(&dom, file, now);
    overlays.tick(now);
    overlays.open(&dom, recent, now);
    overlays.tick(now);
    println!("opened: {:?}", overlays.opened());
    for layer in overlays.stack() {
        println!("  {layer:?}");
    }

    // Keys on a submenu item go to the submenu.
    press(&mut overlays, 21, KeyEvent::new("ArrowDown"), now);
    press(&mut overlays, 21, KeyEvent::new("ArrowDown"), now);
    println!("recent highlight: {:?}", recent_highlight.borrow());

    // Escape closes the submenu only.
    press(&mut overlays, 21, KeyEvent::new("Escape"), now);
    println!("opened: {:?}", overlays.opened());

    // First-letter search cycles through "Save" and "Save as".
    for _ in 0..3 {
        press(&mut overlays, 11, KeyEvent::new("s"), now);
        println!("file highlight: {:?}", file_highlight.borrow());
    }
    press(&mut overlays, 11, KeyEvent::new("Enter"), now);

    // Opening the dialog closes the unrelated menu. Its exit transition never
    // reports an end here, so the deadline finishes it.
    now += 10;
    overlays.open(&dom, dialog, now);
    overlays.tick(now);
    println!(
        "file transitioning: {}, next deadline: {:?}",
        overlays.is_transitioning(file),
        overlays.next_deadline()
    );
    if let Some(deadline) = overlays.next_deadline() {
        now = deadline;
        overlays.tick(now);
    }
    println!(
        "opened: {:?}, backdrop: {:?}, scroll locked: {}",
        overlays.opened(),
        overlays.backdrop_owner(),
        overlays.scroll_locked()
    );

    // Tab is trapped inside the dialog and wraps around its buttons.
    for _ in 0..4 {
        press(&mut overlays, 41, KeyEvent::new("Tab"), now);
        println!("dialog focus: {:?}", dialog_focus.borrow());
    }
    press(
        &mut overlays,
        41,
        KeyEvent::new("Tab").with_modifiers(Modifiers::SHIFT),
        now,
    );
    println!("dialog focus: {:?}", dialog_focus.borrow());

    // A click on the canvas dismisses the dialog.
    let closed = overlays.handle_click(&dom, 2, now);
    println!("click closed {closed}, opened: {:?}", overlays.opened());

    overlays.unregister_component(file);
    overlays.unregister_component(recent);
    overlays.unregister_component(dialog);
}
