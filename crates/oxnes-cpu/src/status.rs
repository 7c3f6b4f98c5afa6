//! 6502 status register flags.
//!
//! The processor status register P holds seven one-bit flags plus an
//! always-set unused bit. The B flag only exists on the copies of P pushed
//! to the stack: BRK/PHP push it set, IRQ/NMI push it clear.

use bitflags::bitflags;

bitflags! {
    /// Processor status flags (the P register).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Carry flag (C).
        const CARRY = 0x01;
        /// Zero flag (Z).
        const ZERO = 0x02;
        /// Interrupt disable (I).
        const INTERRUPT_DISABLE = 0x04;
        /// Decimal mode (D). Honored as a bit; the 2A03 performs no BCD.
        const DECIMAL = 0x08;
        /// Break flag (B). Only meaningful on pushed copies of P.
        const BREAK = 0x10;
        /// Unused bit, always reads as set.
        const UNUSED = 0x20;
        /// Overflow flag (V).
        const OVERFLOW = 0x40;
        /// Negative flag (N).
        const NEGATIVE = 0x80;
    }
}

impl Status {
    /// Power-on value: I and U set.
    #[must_use]
    pub const fn power_on() -> Self {
        Self::from_bits_truncate(0x24)
    }

    /// Set or clear the zero and negative flags from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::ZERO, value == 0);
        self.set(Self::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::power_on()
    }
}
