//! Raw input events as delivered by the kernel input layer.

/// `EV_SYN`: synchronization marker between event batches.
pub const EV_SYN: u16 = 0x00;

/// `EV_KEY`: a key changed state.
pub const EV_KEY: u16 = 0x01;

/// Key event values.
pub const KEY_RELEASED: i32 = 0;
pub const KEY_PRESSED: i32 = 1;
pub const KEY_REPEATED: i32 = 2;

/// One hardware state change: `{type, code, value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawInputEvent {
    pub const fn new(event_type: u16, code: u16, value: i32) -> Self {
        RawInputEvent {
            event_type,
            code,
            value,
        }
    }

    /// A key-press event for `code`.
    pub const fn key_press(code: u16) -> Self {
        RawInputEvent::new(EV_KEY, code, KEY_PRESSED)
    }

    /// A key-release event for `code`.
    pub const fn key_release(code: u16) -> Self {
        RawInputEvent::new(EV_KEY, code, KEY_RELEASED)
    }

    /// An `EV_SYN` report marker.
    pub const fn sync() -> Self {
        RawInputEvent::new(EV_SYN, 0, 0)
    }

    /// `true` for a key transitioning from released to pressed.
    ///
    /// Releases and autorepeats are not presses.
    pub fn is_key_press(&self) -> bool {
        self.event_type == EV_KEY && self.value == KEY_PRESSED
    }
}

impl From<evdev::InputEvent> for RawInputEvent {
    fn from(event: evdev::InputEvent) -> Self {
        RawInputEvent::new(event.event_type().0, event.code(), event.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_key_value_one_is_a_press() {
        assert!(RawInputEvent::key_press(30).is_key_press());
        assert!(!RawInputEvent::key_release(30).is_key_press());
        assert!(!RawInputEvent::new(EV_KEY, 30, KEY_REPEATED).is_key_press());
        assert!(!RawInputEvent::new(0x04, 30, KEY_PRESSED).is_key_press());
        assert!(!RawInputEvent::sync().is_key_press());
    }
}
