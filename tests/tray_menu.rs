// tests/tray_menu.rs

use apprelay::status::tray::{details_message, tip_buffer, TrayMenu, FIRST_COMMAND_ID, TIP_CAPACITY};
use apprelay::status::StatusAction;

fn tip_units(buf: &[u16; TIP_CAPACITY]) -> Vec<u16> {
    let end = buf.iter().position(|&u| u == 0).expect("tooltip is NUL-terminated");
    buf[..end].to_vec()
}

#[test]
fn short_tip_is_copied_and_terminated() {
    let buf = tip_buffer("Waiting for Game\nElapsed 00:00:05");
    let text = String::from_utf16(&tip_units(&buf)).unwrap();
    assert_eq!(text, "Waiting for Game\nElapsed 00:00:05");
}

#[test]
fn long_tip_keeps_127_units_and_the_nul() {
    let buf = tip_buffer(&"x".repeat(300));
    assert_eq!(tip_units(&buf).len(), TIP_CAPACITY - 1);
    assert_eq!(buf[TIP_CAPACITY - 1], 0);
}

#[test]
fn tip_never_ends_in_half_a_surrogate_pair() {
    // 126 ASCII units leave one slot; the emoji needs two.
    let text = format!("{}\u{1F3AE}", "a".repeat(126));
    let units = tip_units(&tip_buffer(&text));
    assert_eq!(units.len(), 126);
    assert!(String::from_utf16(&units).is_ok());

    // 125 leave room for the whole pair.
    let text = format!("{}\u{1F3AE}", "a".repeat(125));
    let units = tip_units(&tip_buffer(&text));
    assert_eq!(units.len(), 127);
    assert!(String::from_utf16(&units).unwrap().ends_with('\u{1F3AE}'));
}

#[test]
fn menu_entries_follow_registration_order() {
    let menu = TrayMenu::new(&[StatusAction::ShowDetails, StatusAction::Exit]);
    let entries: Vec<_> = menu.entries().collect();
    assert_eq!(
        entries,
        vec![
            (FIRST_COMMAND_ID, "Show details"),
            (FIRST_COMMAND_ID + 1, "Exit AppRelay"),
        ]
    );
    assert!(menu.contains(StatusAction::Exit));
}

#[test]
fn command_ids_map_back_to_actions() {
    let menu = TrayMenu::new(&[StatusAction::ShowDetails, StatusAction::Exit]);
    assert_eq!(menu.action_for_command(0), None, "dismissed menu");
    assert_eq!(
        menu.action_for_command(FIRST_COMMAND_ID),
        Some(StatusAction::ShowDetails)
    );
    assert_eq!(
        menu.action_for_command(FIRST_COMMAND_ID + 1),
        Some(StatusAction::Exit)
    );
    assert_eq!(menu.action_for_command(FIRST_COMMAND_ID + 2), None);
    assert_eq!(menu.action_for_command(FIRST_COMMAND_ID - 1), None);
}

#[test]
fn empty_menu_has_no_entries() {
    let menu = TrayMenu::default();
    assert_eq!(menu.entries().count(), 0);
    assert!(!menu.contains(StatusAction::ShowDetails));
    assert_eq!(menu.action_for_command(FIRST_COMMAND_ID), None);
}

#[test]
fn details_are_one_window_per_line() {
    let lines = vec!["Main Window".to_string(), "(untitled)".to_string()];
    assert_eq!(details_message(&lines), "Main Window\n(untitled)");
    assert_eq!(details_message(&[]), "");
}
