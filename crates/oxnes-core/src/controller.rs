//! Standard controller port.
//!
//! The controller is a parallel-in/serial-out shift register. Raising the
//! strobe latches all eight buttons; with the strobe low each read of
//! $4016/$4017 shifts out one bit in the order A, B, Select, Start, Up,
//! Down, Left, Right. After eight reads the port returns 1.

/// The eight controller buttons in shift order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// A button (bit 0).
    A,
    /// B button.
    B,
    /// Select.
    Select,
    /// Start.
    Start,
    /// D-pad up.
    Up,
    /// D-pad down.
    Down,
    /// D-pad left.
    Left,
    /// D-pad right.
    Right,
}

impl Button {
    /// Bit position within the latched byte.
    #[must_use]
    fn bit(self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::Select => 2,
            Self::Start => 3,
            Self::Up => 4,
            Self::Down => 5,
            Self::Left => 6,
            Self::Right => 7,
        }
    }
}

/// One controller port's shift-register state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerPort {
    /// Live button levels, updated by the host.
    buttons: u8,
    strobe: bool,
    latched: u8,
    shift_index: u8,
}

impl ControllerPort {
    /// Create a port with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release a button.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= 1 << button.bit();
        } else {
            self.buttons &= !(1 << button.bit());
        }
    }

    /// Drive the strobe line ($4016 bit 0). While high the current button
    /// levels are latched and the shift position held at A.
    pub fn set_strobe(&mut self, level: bool) {
        self.strobe = level;
        if level {
            self.latched = self.buttons;
            self.shift_index = 0;
        }
    }

    /// Serial read. Returns one bit per read once the strobe drops; reads
    /// past the eighth bit return 1.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            // Latch stays refreshed and pinned to the A button.
            self.latched = self.buttons;
            return self.latched & 1;
        }
        if self.shift_index >= 8 {
            return 1;
        }
        let bit = (self.latched >> self.shift_index) & 1;
        self.shift_index += 1;
        bit
    }

    /// Reset to power-on state (buttons stay as the host set them).
    pub fn reset(&mut self) {
        self.strobe = false;
        self.latched = 0;
        self.shift_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_readout_order() {
        let mut port = ControllerPort::new();
        port.set_button(Button::A, true);
        port.set_button(Button::Start, true);

        port.set_strobe(true);
        port.set_strobe(false);

        let bits: Vec<u8> = (0..8).map(|_| port.read()).collect();
        assert_eq!(bits, [1, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ninth_read_returns_one() {
        let mut port = ControllerPort::new();
        port.set_strobe(true);
        port.set_strobe(false);
        for _ in 0..8 {
            let _ = port.read();
        }
        assert_eq!(port.read(), 1);
        assert_eq!(port.read(), 1);
    }

    #[test]
    fn test_strobe_high_pins_to_a() {
        let mut port = ControllerPort::new();
        port.set_button(Button::A, true);
        port.set_strobe(true);

        assert_eq!(port.read(), 1);
        assert_eq!(port.read(), 1); // Not advancing

        port.set_button(Button::A, false);
        assert_eq!(port.read(), 0); // Tracks the live level while strobed
    }

    #[test]
    fn test_release_after_latch_keeps_snapshot() {
        let mut port = ControllerPort::new();
        port.set_button(Button::B, true);
        port.set_strobe(true);
        port.set_strobe(false);
        port.set_button(Button::B, false);

        let _ = port.read(); // A
        assert_eq!(port.read(), 1); // B was held at latch time
    }

    #[test]
    fn test_restrobe_restarts_sequence() {
        let mut port = ControllerPort::new();
        port.set_button(Button::A, true);
        port.set_strobe(true);
        port.set_strobe(false);
        let _ = port.read();
        let _ = port.read();

        port.set_strobe(true);
        port.set_strobe(false);
        assert_eq!(port.read(), 1); // Back at A
    }
}
