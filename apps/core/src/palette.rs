use crate::hotkey::HotkeyBinding;
use crate::state::SearchState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Show,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    Closed,
    Idle,
    Suggesting,
    ServerSearching,
}

impl PaletteMode {
    pub fn from_state(state: &SearchState) -> Self {
        if !state.is_open {
            Self::Closed
        } else if state.is_searching_server {
            Self::ServerSearching
        } else if state.query.trim().is_empty() {
            Self::Idle
        } else {
            Self::Suggesting
        }
    }

    pub fn is_open(self) -> bool {
        self != Self::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteState {
    visible: bool,
    selected: usize,
}

impl PaletteState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn on_hotkey(&mut self) -> HotkeyAction {
        if self.visible {
            self.visible = false;
            self.selected = 0;
            return HotkeyAction::Hide;
        }
        self.visible = true;
        self.selected = 0;
        HotkeyAction::Show
    }

    pub fn on_escape(&mut self) -> bool {
        if self.visible {
            self.visible = false;
            self.selected = 0;
            return true;
        }
        false
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    pub fn move_selection(&mut self, direction: Direction, len: usize) -> usize {
        self.selected = next_selection_index(self.selected, len, direction);
        self.selected
    }
}

pub fn next_selection_index(current: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }

    let current = current.min(len - 1);
    match direction {
        Direction::Up => (current + len - 1) % len,
        Direction::Down => (current + 1) % len,
    }
}

pub fn footer_hints(binding: &HotkeyBinding) -> [String; 4] {
    [
        "↑↓ Navigate".to_string(),
        "↵ Select".to_string(),
        "ESC Close".to_string(),
        format!("{} to open", binding.label()),
    ]
}
