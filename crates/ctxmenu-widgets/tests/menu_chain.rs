//! Integration tests for ctxmenu-widgets.
//!
//! These drive a [`MenuChain`] the way a host would: open on a context-menu
//! press, forward pointer and keyboard input, and react to emitted events.

use ctxmenu_core::{Event, EventTarget, InputEvent, Key, MenuOptions, Point, TargetKind};
use ctxmenu_widgets::{Menu, MenuChain, MenuEvent, MenuItem, MenuState};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: u32,
    locked: bool,
}

fn row(id: u32) -> Row {
    Row { id, locked: false }
}

/// File-browser style menu used across tests.
///
/// Root: Open, Rename (disabled when locked), ---, Send to >, Delete
/// Send to: Mail, Drive >, Clipboard
/// Drive: Upload
fn row_menu(log: &Rc<RefCell<Vec<String>>>) -> Rc<Menu<Row>> {
    let record = |name: &'static str| {
        let log = Rc::clone(log);
        move |e: &ctxmenu_widgets::ExecuteEvent<Row>| {
            log.borrow_mut().push(format!("{name}:{}", e.data.id));
        }
    };

    let drive = Menu::new().item(MenuItem::new("Upload").on_execute(record("upload")));
    let send_to = Menu::new()
        .item(MenuItem::new("Mail").on_execute(record("mail")))
        .item(MenuItem::new("Drive").sub_menu(drive))
        .item(MenuItem::new("Clipboard").on_execute(record("clipboard")));

    Rc::new(
        Menu::new()
            .item(MenuItem::new("Open").on_execute(record("open")))
            .item(
                MenuItem::new("Rename")
                    .enabled_when(|r: &Row| !r.locked)
                    .on_execute(record("rename")),
            )
            .divider()
            .item(MenuItem::new("Send to").sub_menu(send_to))
            .item(MenuItem::new("Delete").on_execute(record("delete"))),
    )
}

fn context_press() -> InputEvent {
    InputEvent::new(Event::ContextMenu {
        position: Point::new(120.0, 48.0),
    })
}

fn key(chain: &mut MenuChain<Row>, key: Key) -> Vec<MenuEvent<Row>> {
    chain.handle_key(&mut InputEvent::key(key))
}

fn kinds(events: &[MenuEvent<Row>]) -> Vec<&'static str> {
    events.iter().map(MenuEvent::kind).collect()
}

// =============================================================================
// Selection Tests
// =============================================================================

#[test]
fn test_keyboard_selection_executes_before_close() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    chain.open(row_menu(&log), row(3), &context_press());

    key(&mut chain, Key::Down);
    let events = key(&mut chain, Key::Enter);

    assert_eq!(kinds(&events), vec!["execute", "close_all_menus"]);
    match &events[0] {
        MenuEvent::Execute {
            data, menu_item, ..
        } => {
            assert_eq!(data.id, 3);
            assert_eq!(menu_item.label(data), "Open");
        }
        other => panic!("Expected Execute, got {other:?}"),
    }
    assert_eq!(*log.borrow(), vec!["open:3".to_string()]);
    assert!(!chain.is_open());
}

#[test]
fn test_nested_click_executes_with_root_data() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let root = chain.open(row_menu(&log), row(9), &context_press());

    chain.hover_item(root, 3, &InputEvent::new(Event::MouseEnter));
    let send_to = chain.leaf().map(|m| m.id()).expect("send-to menu");
    chain.hover_item(send_to, 1, &InputEvent::new(Event::MouseEnter));
    let drive = chain.leaf().map(|m| m.id()).expect("drive menu");
    assert_eq!(chain.depth(), 3);

    let mut click = InputEvent::click(Point::new(300.0, 60.0));
    let events = chain.click_item(drive, 0, &mut click);

    assert_eq!(kinds(&events), vec!["execute", "close_all_menus"]);
    assert!(click.is_propagation_stopped());
    assert!(chain.document_event(&click).is_empty());
    assert_eq!(*log.borrow(), vec!["upload:9".to_string()]);
    assert!(!chain.is_open());
}

#[test]
fn test_submenu_entry_never_executes() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let root = chain.open(row_menu(&log), row(1), &context_press());

    let events = chain.click_item(root, 3, &mut InputEvent::click(Point::ORIGIN));

    assert_eq!(kinds(&events), vec!["open_sub_menu"]);
    assert!(log.borrow().is_empty());
    assert_eq!(chain.depth(), 2);
}

#[test]
fn test_disabled_entry_is_skipped_and_refuses_clicks() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let locked = Row {
        id: 4,
        locked: true,
    };
    let root = chain.open(row_menu(&log), locked, &context_press());

    key(&mut chain, Key::Down);
    key(&mut chain, Key::Down);
    assert_eq!(chain.leaf().and_then(|m| m.active_index()), Some(3));

    let mut click = InputEvent::click(Point::ORIGIN);
    assert!(chain.click_item(root, 1, &mut click).is_empty());
    assert!(click.is_propagation_stopped());
    assert!(chain.is_open());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_divider_click_bubbles_and_closes_chain() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let root = chain.open(row_menu(&log), row(1), &context_press());

    let mut click = InputEvent::click(Point::new(130.0, 70.0));
    assert!(chain.click_item(root, 2, &mut click).is_empty());
    assert!(!click.is_propagation_stopped());
    assert!(chain.is_open());

    assert_eq!(kinds(&chain.document_event(&click)), vec!["close_all_menus"]);
    assert!(!chain.is_open());
    assert!(log.borrow().is_empty());
}

// =============================================================================
// Keyboard Chain Tests
// =============================================================================

#[test]
fn test_arrow_left_closes_exactly_one_level() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let root = chain.open(row_menu(&log), row(1), &context_press());

    key(&mut chain, Key::End);
    key(&mut chain, Key::Up);
    key(&mut chain, Key::Right);
    key(&mut chain, Key::Down);
    key(&mut chain, Key::Down);
    key(&mut chain, Key::Right);
    assert_eq!(chain.depth(), 3);

    let events = key(&mut chain, Key::Left);
    assert!(matches!(
        events.as_slice(),
        [MenuEvent::CloseLeafMenu {
            except_root_menu: true
        }]
    ));
    assert_eq!(chain.depth(), 2);
    assert_eq!(chain.root().map(|m| m.state()), Some(MenuState::OpenNonLeaf));
    assert_eq!(chain.leaf().and_then(|m| m.active_index()), Some(1));

    key(&mut chain, Key::Left);
    assert_eq!(chain.ids(), vec![root]);
    assert_eq!(chain.root().map(|m| m.state()), Some(MenuState::OpenLeaf));
}

#[test]
fn test_escape_closes_full_chain() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let root = chain.open(row_menu(&log), row(1), &context_press());
    chain.hover_item(root, 3, &InputEvent::new(Event::MouseEnter));

    let events = key(&mut chain, Key::Escape);
    assert!(matches!(
        events.as_slice(),
        [MenuEvent::CloseLeafMenu {
            except_root_menu: false
        }]
    ));
    assert!(!chain.is_open());
}

#[test]
fn test_editable_target_is_left_alone() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    chain.open(row_menu(&log), row(1), &context_press());
    key(&mut chain, Key::Down);

    for k in [Key::Down, Key::Up, Key::Left, Key::Escape, Key::Enter, Key::Space] {
        let mut typing = InputEvent::key(k)
            .with_target(EventTarget::new(TargetKind::Other).content_editable(true));
        assert!(chain.handle_key(&mut typing).is_empty());
        assert!(!typing.is_default_prevented());
        assert!(!typing.is_propagation_stopped());
    }

    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.leaf().and_then(|m| m.active_index()), Some(0));
    assert!(log.borrow().is_empty());
}

// =============================================================================
// Outside Interaction Tests
// =============================================================================

#[test]
fn test_opening_press_does_not_close_menu() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut chain = MenuChain::default();
    let press = context_press();
    chain.open(row_menu(&log), row(1), &press);

    assert!(chain.document_event(&press).is_empty());
    assert!(chain.is_open());

    let elsewhere = InputEvent::new(Event::ContextMenu {
        position: Point::new(400.0, 400.0),
    });
    assert_eq!(kinds(&chain.document_event(&elsewhere)), vec!["close_all_menus"]);
    assert!(!chain.is_open());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_reopen_keeps_single_chain() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let menu = row_menu(&log);
    let mut chain = MenuChain::default();

    let first = chain.open(Rc::clone(&menu), row(1), &context_press());
    chain.hover_item(first, 3, &InputEvent::new(Event::MouseEnter));
    let second = chain.open(Rc::clone(&menu), row(2), &context_press());

    assert_eq!(chain.ids(), vec![second]);
    assert_eq!(chain.root().map(|m| m.data().id), Some(2));
    assert!(menu
        .items()
        .iter()
        .all(|i| i.execute_signal().listener_count() <= 2));
}

#[test]
fn test_close_releases_item_subscriptions() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let menu = row_menu(&log);
    let mut chain = MenuChain::default();

    chain.open(Rc::clone(&menu), row(1), &context_press());
    chain.close_all();

    // Only the host's own handlers remain.
    for item in menu.items() {
        let expected = usize::from(!item.is_divider() && !item.has_sub_menu());
        assert_eq!(item.execute_signal().listener_count(), expected);
    }
}

// =============================================================================
// Focus Tests
// =============================================================================

#[test]
fn test_auto_focus_runs_on_next_tick_only_for_live_menus() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let options = MenuOptions::from_toml_str("auto_focus = true").expect("options");
    let mut chain = MenuChain::new(options);

    let root = chain.open(row_menu(&log), row(1), &context_press());
    chain.hover_item(root, 3, &InputEvent::new(Event::MouseEnter));
    let child = chain.leaf().map(|m| m.id()).expect("child");
    key(&mut chain, Key::Escape);

    assert!(chain.tick().is_empty());

    let reopened = chain.open(row_menu(&log), row(1), &context_press());
    assert_ne!(reopened, child);
    assert_eq!(chain.tick(), vec![reopened]);
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_single_leaf_under_any_input(ops in prop::collection::vec((0u8..6, 0usize..6), 0..48)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = MenuChain::default();
        chain.open(row_menu(&log), row(1), &context_press());

        for (op, index) in ops {
            let target = chain.ids().get(index % chain.depth().max(1)).copied();
            match (op, target) {
                (0, _) => { key(&mut chain, Key::Down); }
                (1, _) => { key(&mut chain, Key::Right); }
                (2, _) => { key(&mut chain, Key::Left); }
                (3, Some(menu)) => { chain.hover_item(menu, index, &InputEvent::new(Event::MouseEnter)); }
                (4, Some(menu)) => { chain.click_item(menu, index, &mut InputEvent::click(Point::ORIGIN)); }
                _ => { key(&mut chain, Key::Up); }
            }

            if !chain.is_open() {
                chain.open(row_menu(&log), row(1), &context_press());
            }
            let leaves = chain.ids().into_iter()
                .filter(|id| chain.get(*id).is_some_and(|m| m.is_leaf()))
                .count();
            prop_assert_eq!(leaves, 1);
            prop_assert!(chain.leaf().is_some_and(|m| m.is_leaf()));
        }
    }

    #[test]
    fn prop_execute_always_precedes_close(index in 0usize..5) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = MenuChain::default();
        let root = chain.open(row_menu(&log), row(1), &context_press());
        let events = chain.click_item(root, index, &mut InputEvent::click(Point::ORIGIN));

        let executes = events.iter().filter(|e| matches!(e, MenuEvent::Execute { .. })).count();
        let closes = events.iter().filter(|e| matches!(e, MenuEvent::CloseAllMenus)).count();
        prop_assert_eq!(executes, closes);
        prop_assert!(executes <= 1);
        if executes == 1 {
            prop_assert!(matches!(events[0], MenuEvent::Execute { .. }), "first event should be Execute");
        }
    }
}
