//! Key-combination parsing: `+`-separated, case-insensitive aliases mapped
//! to DOM key names. Unrecognized tokens pass through trimmed, so plain
//! characters like `a` work as-is.

/// CDP modifier bitmask values (Input.dispatchKeyEvent).
pub const MODIFIER_ALT: i64 = 1;
pub const MODIFIER_CTRL: i64 = 2;
pub const MODIFIER_META: i64 = 4;
pub const MODIFIER_SHIFT: i64 = 8;

/// Parse a combo like `ctrl+shift+a` into DOM key names in press order.
pub fn parse_key_combo(combo: &str) -> Vec<String> {
    combo
        .split('+')
        .map(|token| {
            let lower = token.trim().to_ascii_lowercase();
            match lower.as_str() {
                "ctrl" | "control" => "Control".to_string(),
                "alt" => "Alt".to_string(),
                "shift" => "Shift".to_string(),
                "meta" | "cmd" | "command" => "Meta".to_string(),
                "enter" => "Enter".to_string(),
                "tab" => "Tab".to_string(),
                "esc" | "escape" => "Escape".to_string(),
                "backspace" => "Backspace".to_string(),
                "delete" => "Delete".to_string(),
                "space" => " ".to_string(),
                "up" => "ArrowUp".to_string(),
                "down" => "ArrowDown".to_string(),
                "left" => "ArrowLeft".to_string(),
                "right" => "ArrowRight".to_string(),
                _ => token.trim().to_string(),
            }
        })
        .collect()
}

/// Modifier bit contributed by a key while held, 0 for ordinary keys.
pub fn modifier_bit(key: &str) -> i64 {
    match key {
        "Alt" => MODIFIER_ALT,
        "Control" => MODIFIER_CTRL,
        "Meta" => MODIFIER_META,
        "Shift" => MODIFIER_SHIFT,
        _ => 0,
    }
}

/// Physical-key metadata for a DOM key name: the `code` value and the US
/// virtual key code. Chrome resolves several built-in shortcuts from the
/// virtual key code rather than the `key` string.
pub struct KeyDefinition {
    pub code: Option<String>,
    pub virtual_key_code: Option<i64>,
}

pub fn key_definition(key: &str) -> KeyDefinition {
    let (code, vk) = match key {
        "Control" => ("ControlLeft", 17),
        "Alt" => ("AltLeft", 18),
        "Shift" => ("ShiftLeft", 16),
        "Meta" => ("MetaLeft", 91),
        "Enter" => ("Enter", 13),
        "Tab" => ("Tab", 9),
        "Escape" => ("Escape", 27),
        "Backspace" => ("Backspace", 8),
        "Delete" => ("Delete", 46),
        " " => ("Space", 32),
        "ArrowUp" => ("ArrowUp", 38),
        "ArrowDown" => ("ArrowDown", 40),
        "ArrowLeft" => ("ArrowLeft", 37),
        "ArrowRight" => ("ArrowRight", 39),
        _ => return char_definition(key),
    };
    KeyDefinition {
        code: Some(code.to_string()),
        virtual_key_code: Some(vk),
    }
}

fn char_definition(key: &str) -> KeyDefinition {
    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            return KeyDefinition {
                code: Some(format!("Key{upper}")),
                virtual_key_code: Some(upper as i64),
            };
        }
        if ch.is_ascii_digit() {
            return KeyDefinition {
                code: Some(format!("Digit{ch}")),
                virtual_key_code: Some(ch as i64),
            };
        }
    }
    if let Some(n) = key.strip_prefix('F').and_then(|n| n.parse::<i64>().ok()) {
        if (1..=24).contains(&n) {
            return KeyDefinition {
                code: Some(key.to_string()),
                virtual_key_code: Some(111 + n),
            };
        }
    }
    KeyDefinition {
        code: None,
        virtual_key_code: None,
    }
}

/// Character payload a key-down should carry, if any. Without this, keys
/// like Enter or plain letters produce no input in text fields.
pub fn key_text(key: &str) -> Option<String> {
    if key == "Enter" {
        return Some("\r".to_string());
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifier_combo_in_order() {
        assert_eq!(
            parse_key_combo("ctrl+shift+a"),
            vec!["Control", "Shift", "a"]
        );
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(parse_key_combo("CMD+Esc"), vec!["Meta", "Escape"]);
        assert_eq!(parse_key_combo("ENTER"), vec!["Enter"]);
    }

    #[test]
    fn arrows_and_space_map_to_dom_names() {
        assert_eq!(
            parse_key_combo("up+down+left+right+space"),
            vec!["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", " "]
        );
    }

    #[test]
    fn unknown_tokens_pass_through_trimmed() {
        assert_eq!(parse_key_combo(" F5 "), vec!["F5"]);
    }

    #[test]
    fn modifier_bits() {
        assert_eq!(modifier_bit("Control"), MODIFIER_CTRL);
        assert_eq!(modifier_bit("Shift"), MODIFIER_SHIFT);
        assert_eq!(modifier_bit("a"), 0);
    }

    #[test]
    fn key_definitions_cover_letters_modifiers_and_function_keys() {
        let a = key_definition("a");
        assert_eq!(a.code.as_deref(), Some("KeyA"));
        assert_eq!(a.virtual_key_code, Some(65));

        let ctrl = key_definition("Control");
        assert_eq!(ctrl.code.as_deref(), Some("ControlLeft"));
        assert_eq!(ctrl.virtual_key_code, Some(17));

        let f5 = key_definition("F5");
        assert_eq!(f5.code.as_deref(), Some("F5"));
        assert_eq!(f5.virtual_key_code, Some(116));

        let unknown = key_definition("Compose");
        assert!(unknown.code.is_none());
        assert!(unknown.virtual_key_code.is_none());
    }

    #[test]
    fn key_text_for_printables_and_enter() {
        assert_eq!(key_text("a").as_deref(), Some("a"));
        assert_eq!(key_text(" ").as_deref(), Some(" "));
        assert_eq!(key_text("Enter").as_deref(), Some("\r"));
        assert_eq!(key_text("Control"), None);
    }
}
