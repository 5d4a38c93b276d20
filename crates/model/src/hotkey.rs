//! Hotkey descriptors for the dash, toggle, and block scroll modifiers.
//!
//! A hotkey is a typed `(kind, code)` pair recorded from a keyboard key or a
//! mouse button. Codes are Linux input event codes (`KEY_*` / `BTN_*`).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Linux key codes of the modifier keys.
pub mod key_code {
    pub const LEFT_CTRL: u16 = 29;
    pub const LEFT_SHIFT: u16 = 42;
    pub const RIGHT_SHIFT: u16 = 54;
    pub const LEFT_ALT: u16 = 56;
    pub const RIGHT_CTRL: u16 = 97;
    pub const RIGHT_ALT: u16 = 100;
    pub const LEFT_META: u16 = 125;
    pub const RIGHT_META: u16 = 126;
}

bitflags! {
    /// Set of modifier keys currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ModifierMask: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const META = 0b1000;
    }
}

impl ModifierMask {
    /// The modifier flag a key code contributes, if it is a modifier key.
    pub fn from_key_code(code: u16) -> Option<ModifierMask> {
        match code {
            key_code::LEFT_SHIFT | key_code::RIGHT_SHIFT => Some(ModifierMask::SHIFT),
            key_code::LEFT_CTRL | key_code::RIGHT_CTRL => Some(ModifierMask::CONTROL),
            key_code::LEFT_ALT | key_code::RIGHT_ALT => Some(ModifierMask::ALT),
            key_code::LEFT_META | key_code::RIGHT_META => Some(ModifierMask::META),
            _ => None,
        }
    }
}

/// Hotkey trigger device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyKind {
    Keyboard,
    Mouse,
}

/// The `(kind, code)` identity of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub kind: HotkeyKind,
    pub code: u16,
}

impl EventDescriptor {
    pub fn keyboard(code: u16) -> Self {
        Self {
            kind: HotkeyKind::Keyboard,
            code,
        }
    }

    pub fn mouse(code: u16) -> Self {
        Self {
            kind: HotkeyKind::Mouse,
            code,
        }
    }

    /// Whether this descriptor names a keyboard modifier key.
    pub fn is_modifier_key(&self) -> bool {
        self.kind == HotkeyKind::Keyboard && ModifierMask::from_key_code(self.code).is_some()
    }
}

/// A recorded scroll hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollHotkey {
    #[serde(flatten)]
    pub trigger: EventDescriptor,

    /// When present, the held modifier mask must equal this exactly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<ModifierMask>,
}

impl ScrollHotkey {
    pub fn keyboard(code: u16) -> Self {
        Self {
            trigger: EventDescriptor::keyboard(code),
            modifiers: None,
        }
    }

    pub fn mouse(code: u16) -> Self {
        Self {
            trigger: EventDescriptor::mouse(code),
            modifiers: None,
        }
    }

    /// Require an exact modifier mask alongside the trigger.
    pub fn with_modifiers(mut self, modifiers: ModifierMask) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Human-readable label for logs and reports.
    pub fn display_name(&self) -> String {
        let base = match self.trigger.kind {
            HotkeyKind::Keyboard => key_name(self.trigger.code)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Key {}", self.trigger.code)),
            HotkeyKind::Mouse => button_name(self.trigger.code)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Button {}", self.trigger.code)),
        };

        match self.modifiers {
            Some(mask) if !mask.is_empty() => format!("{} + {base}", modifier_label(mask)),
            _ => base,
        }
    }
}

/// The three optional scroll hotkey roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HotkeyBindings {
    /// Multiplies gain while held.
    #[serde(default)]
    pub dash: Option<ScrollHotkey>,

    /// Inverts per-axis smoothing while held.
    #[serde(default)]
    pub toggle: Option<ScrollHotkey>,

    /// Suppresses scroll output while held.
    #[serde(default)]
    pub block: Option<ScrollHotkey>,
}

fn key_name(code: u16) -> Option<&'static str> {
    Some(match code {
        key_code::LEFT_SHIFT | key_code::RIGHT_SHIFT => "Shift",
        key_code::LEFT_CTRL | key_code::RIGHT_CTRL => "Control",
        key_code::LEFT_ALT | key_code::RIGHT_ALT => "Alt",
        key_code::LEFT_META | key_code::RIGHT_META => "Meta",
        1 => "Escape",
        14 => "Backspace",
        15 => "Tab",
        28 => "Return",
        57 => "Space",
        58 => "Caps Lock",
        _ => return None,
    })
}

fn button_name(code: u16) -> Option<&'static str> {
    Some(match code {
        0x110 => "Left Button",
        0x111 => "Right Button",
        0x112 => "Middle Button",
        0x113 => "Side Button",
        0x114 => "Extra Button",
        0x115 => "Forward Button",
        0x116 => "Back Button",
        _ => return None,
    })
}

fn modifier_label(mask: ModifierMask) -> String {
    let mut parts = Vec::new();
    if mask.contains(ModifierMask::CONTROL) {
        parts.push("Control");
    }
    if mask.contains(ModifierMask::ALT) {
        parts.push("Alt");
    }
    if mask.contains(ModifierMask::SHIFT) {
        parts.push("Shift");
    }
    if mask.contains(ModifierMask::META) {
        parts.push("Meta");
    }
    parts.join(" + ")
}
