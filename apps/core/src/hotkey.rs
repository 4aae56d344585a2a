use std::fmt::{Display, Formatter};

pub const DEFAULT_PALETTE_HOTKEY: &str = "Ctrl+K";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: String,
}

impl KeyChord {
    pub fn key(key: &str) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: canonical_key(key),
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    pub fn cmd(key: &str) -> Self {
        Self {
            meta: true,
            ..Self::key(key)
        }
    }

    fn platform_twin(&self) -> Self {
        Self {
            ctrl: self.meta,
            meta: self.ctrl,
            ..self.clone()
        }
    }
}

impl Display for KeyChord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.meta {
            parts.push("Cmd");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(&self.key);
        f.write_str(&parts.join("+"))
    }
}

pub fn parse_hotkey(input: &str) -> Result<KeyChord, String> {
    let parts: Vec<&str> = input
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() < 2 {
        return Err("Hotkey must include at least one modifier and one key.".to_string());
    }

    let mut chord = KeyChord::key(&normalize_key(parts[parts.len() - 1])?);
    for part in &parts[..parts.len() - 1] {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => chord.ctrl = true,
            "cmd" | "command" | "meta" | "super" => chord.meta = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            _ => {
                return Err(format!(
                    "Unsupported modifier '{part}'. Use Ctrl, Cmd, Alt, or Shift."
                ))
            }
        }
    }

    if !chord.ctrl && !chord.meta && !chord.alt {
        return Err("Hotkey must include Ctrl, Cmd, or Alt.".to_string());
    }

    Ok(chord)
}

fn canonical_key(key: &str) -> String {
    let key = key.trim();
    if key.eq_ignore_ascii_case("space") {
        "Space".to_string()
    } else {
        key.to_ascii_uppercase()
    }
}

fn normalize_key(input: &str) -> Result<String, String> {
    let upper = input.trim().to_ascii_uppercase();
    if upper == "SPACE" {
        return Ok("Space".to_string());
    }

    if upper.len() == 1 {
        let c = upper.chars().next().unwrap_or_default();
        if c.is_ascii_alphanumeric() {
            return Ok(upper);
        }
    }

    Err("Key must be A-Z, 0-9, or Space.".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    chord: KeyChord,
}

impl HotkeyBinding {
    pub fn parse(input: &str) -> Result<Self, String> {
        parse_hotkey(input).map(|chord| Self { chord })
    }

    pub fn matches(&self, pressed: &KeyChord) -> bool {
        let pressed = KeyChord {
            key: canonical_key(&pressed.key),
            ..pressed.clone()
        };
        pressed == self.chord || pressed == self.chord.platform_twin()
    }

    pub fn label(&self) -> String {
        self.chord.to_string()
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self {
            chord: KeyChord::ctrl("K"),
        }
    }
}
