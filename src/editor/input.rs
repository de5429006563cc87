use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::toolbar::ToolbarCommand;

/// Formatting shortcut bound to a key press, if any.
///
/// Every shortcut needs Ctrl. Key releases never trigger anything.
pub fn command_for_key(key: &KeyEvent) -> Option<ToolbarCommand> {
    if key.kind == KeyEventKind::Release || !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    match (c.to_ascii_lowercase(), shift) {
        ('b', _) => Some(ToolbarCommand::Bold),
        ('i', _) => Some(ToolbarCommand::Italic),
        ('u', _) => Some(ToolbarCommand::Underline),
        ('x', true) => Some(ToolbarCommand::Strikethrough),
        ('k', _) => Some(ToolbarCommand::InsertLink),
        ('z', false) => Some(ToolbarCommand::Undo),
        ('z', true) | ('y', _) => Some(ToolbarCommand::Redo),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    #[error("empty key combo")]
    Empty,
    #[error("unknown modifier `{0}`")]
    Modifier(String),
    #[error("unknown key `{0}`")]
    Key(String),
}

/// Parse a combo such as `ctrl+shift+z` into a key press.
pub fn parse_key_combo(combo: &str) -> Result<KeyEvent, ParseKeyError> {
    let mut parts: Vec<&str> = combo.split('+').map(str::trim).collect();
    let key = parts
        .pop()
        .filter(|k| !k.is_empty())
        .ok_or(ParseKeyError::Empty)?;

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        modifiers |= match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(ParseKeyError::Modifier(part.to_owned())),
        };
    }

    let code = match key.to_ascii_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        single if single.chars().count() == 1 => {
            KeyCode::Char(single.chars().next().ok_or(ParseKeyError::Empty)?)
        }
        _ => return Err(ParseKeyError::Key(key.to_owned())),
    };
    Ok(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_shortcuts() {
        assert_eq!(command_for_key(&ctrl('b')), Some(ToolbarCommand::Bold));
        assert_eq!(command_for_key(&ctrl('i')), Some(ToolbarCommand::Italic));
        assert_eq!(command_for_key(&ctrl('u')), Some(ToolbarCommand::Underline));
        assert_eq!(command_for_key(&ctrl('k')), Some(ToolbarCommand::InsertLink));
        assert_eq!(command_for_key(&ctrl('z')), Some(ToolbarCommand::Undo));
        assert_eq!(command_for_key(&ctrl('y')), Some(ToolbarCommand::Redo));
    }

    #[test]
    fn test_shift_variants() {
        let shifted = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(command_for_key(&shifted('Z')), Some(ToolbarCommand::Redo));
        assert_eq!(
            command_for_key(&shifted('x')),
            Some(ToolbarCommand::Strikethrough)
        );
        assert_eq!(command_for_key(&ctrl('x')), None);
    }

    #[test]
    fn test_plain_keys_and_releases_are_ignored() {
        let plain = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE);
        assert_eq!(command_for_key(&plain), None);
        let mut release = ctrl('b');
        release.kind = KeyEventKind::Release;
        assert_eq!(command_for_key(&release), None);
    }

    #[test]
    fn test_parse_key_combo() {
        let key = parse_key_combo("Ctrl+Shift+z").unwrap();
        assert_eq!(key.code, KeyCode::Char('z'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(command_for_key(&key), Some(ToolbarCommand::Redo));
    }

    #[test]
    fn test_parse_key_combo_errors() {
        assert_eq!(parse_key_combo(""), Err(ParseKeyError::Empty));
        assert_eq!(
            parse_key_combo("hyper+b"),
            Err(ParseKeyError::Modifier("hyper".into()))
        );
        assert_eq!(
            parse_key_combo("ctrl+f13"),
            Err(ParseKeyError::Key("f13".into()))
        );
    }
}
