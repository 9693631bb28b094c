use super::*;

#[test]
fn test_newline_maps_to_enter() {
    assert_eq!(Keystroke::for_char('\n'), Some(Keystroke::Key(Key::Enter)));
}

#[test]
fn test_tab_maps_to_tab_key() {
    assert_eq!(Keystroke::for_char('\t'), Some(Keystroke::Key(Key::Tab)));
}

#[test]
fn test_carriage_return_is_skipped() {
    assert_eq!(Keystroke::for_char('\r'), None);
}

#[test]
fn test_literal_characters() {
    for c in ['a', 'Z', ' ', '.', 'é', '字'] {
        assert_eq!(Keystroke::for_char(c), Some(Keystroke::Char(c)));
    }
}

#[test]
fn test_key_names() {
    assert_eq!(Key::Enter.name(), "enter");
    assert_eq!(Key::Tab.name(), "tab");
    assert_eq!(Key::Backspace.name(), "backspace");
}

#[test]
fn test_dry_run_counts_keystrokes() {
    let mut keyboard = DryRunKeyboard::new();
    keyboard.send(Keystroke::Char('a')).unwrap();
    keyboard.send(Keystroke::Key(Key::Backspace)).unwrap();
    keyboard.send_char('b').unwrap();
    assert_eq!(keyboard.sent(), 3);
}

#[test]
fn test_enigo_key_mapping() {
    assert_eq!(enigo_key(Key::Enter), enigo::Key::Return);
    assert_eq!(enigo_key(Key::Tab), enigo::Key::Tab);
    assert_eq!(enigo_key(Key::Backspace), enigo::Key::Backspace);
}
