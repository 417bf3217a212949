//! Event types dispatched through the element tree

/// Numeric event type identifier
pub type EventType = u32;

/// Built-in event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;
    pub const KEY_DOWN: EventType = 20;
    pub const TEXT_INPUT: EventType = 22;
    pub const MOUNT: EventType = 30;
    pub const UNMOUNT: EventType = 31;

    /// Human-readable name, for logging
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            POINTER_DOWN => "pointer_down",
            POINTER_UP => "pointer_up",
            POINTER_MOVE => "pointer_move",
            POINTER_ENTER => "pointer_enter",
            POINTER_LEAVE => "pointer_leave",
            FOCUS => "focus",
            BLUR => "blur",
            KEY_DOWN => "key_down",
            TEXT_INPUT => "text_input",
            MOUNT => "mount",
            UNMOUNT => "unmount",
            _ => "unknown",
        }
    }
}

/// Key codes delivered with KEY_DOWN
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Escape,
    Enter,
    Other(u32),
}

impl KeyCode {
    /// Raw code carried in event contexts
    pub fn to_raw(self) -> u32 {
        match self {
            KeyCode::Backspace => 8,
            KeyCode::Enter => 13,
            KeyCode::Escape => 27,
            KeyCode::Other(code) => code,
        }
    }

    pub fn from_raw(code: u32) -> Self {
        match code {
            8 => KeyCode::Backspace,
            13 => KeyCode::Enter,
            27 => KeyCode::Escape,
            other => KeyCode::Other(other),
        }
    }
}
