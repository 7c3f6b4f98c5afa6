//! 6502 CPU core.
//!
//! The interpreter charges cycles by performing the same bus-access pattern
//! as the silicon: every memory access and every internal cycle goes through
//! a single tick path that advances the cycle counter and notifies the bus.
//! Instruction cycle counts therefore emerge from the dummy reads and
//! page-cross penalties of each addressing mode instead of a lookup table.

use crate::addressing::{page_crossed, AddressingMode};
use crate::bus::Bus;
use crate::opcodes::{Mnemonic, OPCODE_TABLE};
use crate::status::Status;

/// NMI vector location.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Ricoh 2A03 CPU core (MOS 6502 without decimal arithmetic).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer (offset into page $01).
    pub sp: u8,
    /// Status flags.
    pub status: Status,
    /// Total cycles executed. Monotonically increasing; every bus access
    /// advances it by exactly one.
    pub cycles: u64,
    /// Cycles to burn before the next instruction (DMA stalls).
    pub stall: u32,
    /// Edge-triggered NMI latch.
    nmi_pending: bool,
    /// Level-triggered IRQ line.
    irq_line: bool,
    /// CPU halted by a JAM opcode.
    jammed: bool,
}

impl Cpu {
    /// Create a new CPU in power-on state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: Status::power_on(),
            cycles: 0,
            stall: 0,
            nmi_pending: false,
            irq_line: false,
            jammed: false,
        }
    }

    /// Reset the CPU.
    ///
    /// Simulates the RESET sequence: SP decremented by 3 (no writes), I set,
    /// PC loaded from the reset vector. Takes 7 cycles, all ticked through
    /// the bus.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.sp = self.sp.wrapping_sub(3);
        self.status.insert(Status::INTERRUPT_DISABLE);
        self.nmi_pending = false;
        self.irq_line = false;
        self.jammed = false;
        self.stall = 0;

        for _ in 0..5 {
            self.tick(bus);
        }
        let lo = self.read8(bus, RESET_VECTOR);
        let hi = self.read8(bus, RESET_VECTOR.wrapping_add(1));
        self.pc = u16::from(hi) << 8 | u16::from(lo);
    }

    /// Latch a non-maskable interrupt (edge-triggered).
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the IRQ line (level-triggered; serviced while low and I clear).
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Add DMA stall cycles, burned before the next instruction.
    pub fn add_stall(&mut self, cycles: u32) {
        self.stall += cycles;
    }

    /// Check if the CPU has executed a JAM opcode.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// Execute one instruction (or burn a pending stall) and return the
    /// number of CPU cycles elapsed.
    ///
    /// Interrupts are polled at the instruction boundary: a pending NMI wins
    /// over IRQ, and IRQ is ignored while the I flag is set.
    pub fn step_instruction(&mut self, bus: &mut impl Bus) -> u32 {
        let start = self.cycles;

        if self.stall > 0 {
            let n = self.stall;
            self.stall = 0;
            for _ in 0..n {
                self.tick(bus);
            }
            return (self.cycles - start) as u32;
        }

        if self.jammed {
            self.tick(bus);
            return 1;
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(bus, NMI_VECTOR);
            return (self.cycles - start) as u32;
        }
        if self.irq_line && !self.status.contains(Status::INTERRUPT_DISABLE) {
            self.interrupt(bus, IRQ_VECTOR);
            return (self.cycles - start) as u32;
        }

        let opcode = self.fetch8(bus);
        self.execute(bus, opcode);

        (self.cycles - start) as u32
    }

    // =====================================================================
    // Cycle and bus primitives
    // =====================================================================

    /// Advance one CPU cycle and notify the bus.
    #[inline]
    fn tick(&mut self, bus: &mut impl Bus) {
        self.cycles += 1;
        bus.on_cpu_cycle();
    }

    /// Read a byte, charging one cycle.
    #[inline]
    fn read8(&mut self, bus: &mut impl Bus, addr: u16) -> u8 {
        self.tick(bus);
        bus.read(addr)
    }

    /// Write a byte, charging one cycle.
    #[inline]
    fn write8(&mut self, bus: &mut impl Bus, addr: u16, value: u8) {
        self.tick(bus);
        bus.write(addr, value);
    }

    /// Fetch the byte at PC and advance PC.
    #[inline]
    fn fetch8(&mut self, bus: &mut impl Bus) -> u8 {
        let value = self.read8(bus, self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit little-endian operand at PC.
    #[inline]
    fn fetch16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.fetch8(bus));
        let hi = u16::from(self.fetch8(bus));
        hi << 8 | lo
    }

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        self.write8(bus, 0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read8(bus, 0x0100 | u16::from(self.sp))
    }

    /// Service an interrupt: 2 internal cycles, 3 pushes, 2 vector fetches.
    /// Pushes P with B clear and U set, then sets I.
    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.tick(bus);
        self.tick(bus);
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
        let pushed = (self.status | Status::UNUSED) & !Status::BREAK;
        self.push(bus, pushed.bits());
        self.status.insert(Status::INTERRUPT_DISABLE);
        let lo = self.read8(bus, vector);
        let hi = self.read8(bus, vector.wrapping_add(1));
        self.pc = u16::from(hi) << 8 | u16::from(lo);
    }

    // =====================================================================
    // Addressing
    // =====================================================================

    /// Resolve the effective address of a memory operand.
    ///
    /// `forced_dummy` selects the write/RMW flavor of indexed modes: a dummy
    /// read at the unindexed-high address happens on every access instead of
    /// only on page crossings.
    fn operand_addr(&mut self, bus: &mut impl Bus, mode: AddressingMode, forced_dummy: bool) -> u16 {
        match mode {
            AddressingMode::ZeroPage => u16::from(self.fetch8(bus)),
            AddressingMode::ZeroPageX => {
                let base = self.fetch8(bus);
                let _ = self.read8(bus, u16::from(base));
                u16::from(base.wrapping_add(self.x))
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch8(bus);
                let _ = self.read8(bus, u16::from(base));
                u16::from(base.wrapping_add(self.y))
            }
            AddressingMode::Absolute => self.fetch16(bus),
            AddressingMode::AbsoluteX => self.absolute_indexed(bus, self.x, forced_dummy),
            AddressingMode::AbsoluteY => self.absolute_indexed(bus, self.y, forced_dummy),
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch8(bus);
                let _ = self.read8(bus, u16::from(ptr));
                let ptr = ptr.wrapping_add(self.x);
                let lo = u16::from(self.read8(bus, u16::from(ptr)));
                let hi = u16::from(self.read8(bus, u16::from(ptr.wrapping_add(1))));
                hi << 8 | lo
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch8(bus);
                let lo = u16::from(self.read8(bus, u16::from(ptr)));
                let hi = u16::from(self.read8(bus, u16::from(ptr.wrapping_add(1))));
                let base = hi << 8 | lo;
                let addr = base.wrapping_add(u16::from(self.y));
                if forced_dummy || page_crossed(base, addr) {
                    let _ = self.read8(bus, (base & 0xFF00) | (addr & 0x00FF));
                }
                addr
            }
            AddressingMode::Implied
            | AddressingMode::Accumulator
            | AddressingMode::Immediate
            | AddressingMode::Indirect
            | AddressingMode::Relative => unreachable!("mode has no memory operand"),
        }
    }

    fn absolute_indexed(&mut self, bus: &mut impl Bus, index: u8, forced_dummy: bool) -> u16 {
        let base = self.fetch16(bus);
        let addr = base.wrapping_add(u16::from(index));
        if forced_dummy || page_crossed(base, addr) {
            let _ = self.read8(bus, (base & 0xFF00) | (addr & 0x00FF));
        }
        addr
    }

    /// Fetch the value of a read operand (immediate or memory).
    fn load_operand(&mut self, bus: &mut impl Bus, mode: AddressingMode) -> u8 {
        if mode == AddressingMode::Immediate {
            self.fetch8(bus)
        } else {
            let addr = self.operand_addr(bus, mode, false);
            self.read8(bus, addr)
        }
    }

    /// Store to a write operand (dummy read on indexed modes).
    fn store_operand(&mut self, bus: &mut impl Bus, mode: AddressingMode, value: u8) {
        let addr = self.operand_addr(bus, mode, true);
        self.write8(bus, addr, value);
    }

    /// Read-modify-write: read, dummy write of the old value, write the new.
    /// Returns the written value so combined undocumented ops can use it.
    fn rmw<F>(&mut self, bus: &mut impl Bus, mode: AddressingMode, f: F) -> u8
    where
        F: FnOnce(&mut Self, u8) -> u8,
    {
        if mode == AddressingMode::Accumulator {
            let _ = self.read8(bus, self.pc);
            let result = f(self, self.a);
            self.a = result;
            result
        } else {
            let addr = self.operand_addr(bus, mode, true);
            let old = self.read8(bus, addr);
            self.write8(bus, addr, old);
            let new = f(self, old);
            self.write8(bus, addr, new);
            new
        }
    }

    /// Burn the second cycle of an implied instruction (dummy read at PC).
    #[inline]
    fn implied_cycle(&mut self, bus: &mut impl Bus) {
        let _ = self.read8(bus, self.pc);
    }

    fn branch(&mut self, bus: &mut impl Bus, taken: bool) {
        let offset = self.fetch8(bus) as i8;
        if taken {
            let _ = self.read8(bus, self.pc);
            let target = self.pc.wrapping_add(offset as u16);
            if page_crossed(self.pc, target) {
                let _ = self.read8(bus, (self.pc & 0xFF00) | (target & 0x00FF));
            }
            self.pc = target;
        }
    }

    // =====================================================================
    // Dispatch
    // =====================================================================

    #[allow(clippy::too_many_lines)] // One arm per mnemonic.
    fn execute(&mut self, bus: &mut impl Bus, opcode: u8) {
        let info = OPCODE_TABLE[opcode as usize];
        let mode = info.mode;

        match info.mnemonic {
            // Loads
            Mnemonic::Lda => {
                let v = self.load_operand(bus, mode);
                self.a = v;
                self.status.set_zn(v);
            }
            Mnemonic::Ldx => {
                let v = self.load_operand(bus, mode);
                self.x = v;
                self.status.set_zn(v);
            }
            Mnemonic::Ldy => {
                let v = self.load_operand(bus, mode);
                self.y = v;
                self.status.set_zn(v);
            }
            Mnemonic::Lax => {
                let v = self.load_operand(bus, mode);
                self.a = v;
                self.x = v;
                self.status.set_zn(v);
            }

            // Stores
            Mnemonic::Sta => self.store_operand(bus, mode, self.a),
            Mnemonic::Stx => self.store_operand(bus, mode, self.x),
            Mnemonic::Sty => self.store_operand(bus, mode, self.y),
            Mnemonic::Sax => self.store_operand(bus, mode, self.a & self.x),

            // Arithmetic / logic
            Mnemonic::Adc => {
                let v = self.load_operand(bus, mode);
                self.adc(v);
            }
            Mnemonic::Sbc => {
                let v = self.load_operand(bus, mode);
                self.sbc(v);
            }
            Mnemonic::And => {
                let v = self.load_operand(bus, mode);
                self.a &= v;
                self.status.set_zn(self.a);
            }
            Mnemonic::Ora => {
                let v = self.load_operand(bus, mode);
                self.a |= v;
                self.status.set_zn(self.a);
            }
            Mnemonic::Eor => {
                let v = self.load_operand(bus, mode);
                self.a ^= v;
                self.status.set_zn(self.a);
            }
            Mnemonic::Cmp => {
                let v = self.load_operand(bus, mode);
                self.compare(self.a, v);
            }
            Mnemonic::Cpx => {
                let v = self.load_operand(bus, mode);
                self.compare(self.x, v);
            }
            Mnemonic::Cpy => {
                let v = self.load_operand(bus, mode);
                self.compare(self.y, v);
            }
            Mnemonic::Bit => {
                let v = self.load_operand(bus, mode);
                self.bit(v);
            }

            // Shifts / rotates / memory increments
            Mnemonic::Asl => {
                self.rmw(bus, mode, Self::asl);
            }
            Mnemonic::Lsr => {
                self.rmw(bus, mode, Self::lsr);
            }
            Mnemonic::Rol => {
                self.rmw(bus, mode, Self::rol);
            }
            Mnemonic::Ror => {
                self.rmw(bus, mode, Self::ror);
            }
            Mnemonic::Inc => {
                self.rmw(bus, mode, |cpu, v| {
                    let r = v.wrapping_add(1);
                    cpu.status.set_zn(r);
                    r
                });
            }
            Mnemonic::Dec => {
                self.rmw(bus, mode, |cpu, v| {
                    let r = v.wrapping_sub(1);
                    cpu.status.set_zn(r);
                    r
                });
            }

            // Combined undocumented RMW ops
            Mnemonic::Slo => {
                let r = self.rmw(bus, mode, Self::asl);
                self.a |= r;
                self.status.set_zn(self.a);
            }
            Mnemonic::Rla => {
                let r = self.rmw(bus, mode, Self::rol);
                self.a &= r;
                self.status.set_zn(self.a);
            }
            Mnemonic::Sre => {
                let r = self.rmw(bus, mode, Self::lsr);
                self.a ^= r;
                self.status.set_zn(self.a);
            }
            Mnemonic::Rra => {
                let r = self.rmw(bus, mode, Self::ror);
                self.adc(r);
            }
            Mnemonic::Dcp => {
                let r = self.rmw(bus, mode, |_, v| v.wrapping_sub(1));
                self.compare(self.a, r);
            }
            Mnemonic::Isb => {
                let r = self.rmw(bus, mode, |_, v| v.wrapping_add(1));
                self.sbc(r);
            }

            // Register transfers and increments
            Mnemonic::Tax => {
                self.implied_cycle(bus);
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Mnemonic::Tay => {
                self.implied_cycle(bus);
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Mnemonic::Txa => {
                self.implied_cycle(bus);
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tya => {
                self.implied_cycle(bus);
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tsx => {
                self.implied_cycle(bus);
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Mnemonic::Txs => {
                self.implied_cycle(bus);
                self.sp = self.x;
            }
            Mnemonic::Inx => {
                self.implied_cycle(bus);
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Iny => {
                self.implied_cycle(bus);
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Mnemonic::Dex => {
                self.implied_cycle(bus);
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Dey => {
                self.implied_cycle(bus);
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            // Flag operations
            Mnemonic::Clc => {
                self.implied_cycle(bus);
                self.status.remove(Status::CARRY);
            }
            Mnemonic::Sec => {
                self.implied_cycle(bus);
                self.status.insert(Status::CARRY);
            }
            Mnemonic::Cli => {
                self.implied_cycle(bus);
                self.status.remove(Status::INTERRUPT_DISABLE);
            }
            Mnemonic::Sei => {
                self.implied_cycle(bus);
                self.status.insert(Status::INTERRUPT_DISABLE);
            }
            Mnemonic::Cld => {
                self.implied_cycle(bus);
                self.status.remove(Status::DECIMAL);
            }
            Mnemonic::Sed => {
                self.implied_cycle(bus);
                self.status.insert(Status::DECIMAL);
            }
            Mnemonic::Clv => {
                self.implied_cycle(bus);
                self.status.remove(Status::OVERFLOW);
            }

            // Stack
            Mnemonic::Pha => {
                self.implied_cycle(bus);
                self.push(bus, self.a);
            }
            Mnemonic::Php => {
                self.implied_cycle(bus);
                let pushed = self.status | Status::BREAK | Status::UNUSED;
                self.push(bus, pushed.bits());
            }
            Mnemonic::Pla => {
                self.implied_cycle(bus);
                self.tick(bus);
                self.a = self.pull(bus);
                self.status.set_zn(self.a);
            }
            Mnemonic::Plp => {
                self.implied_cycle(bus);
                self.tick(bus);
                let bits = self.pull(bus);
                self.status = Status::from_bits_truncate(bits);
                self.status.remove(Status::BREAK);
                self.status.insert(Status::UNUSED);
            }

            // Jumps and subroutines
            Mnemonic::Jmp => {
                if mode == AddressingMode::Indirect {
                    let ptr = self.fetch16(bus);
                    let lo = u16::from(self.read8(bus, ptr));
                    // Page-wrap bug: the high byte never leaves the page.
                    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                    let hi = u16::from(self.read8(bus, hi_addr));
                    self.pc = hi << 8 | lo;
                } else {
                    self.pc = self.fetch16(bus);
                }
            }
            Mnemonic::Jsr => {
                let lo = self.fetch8(bus);
                let _ = self.read8(bus, 0x0100 | u16::from(self.sp));
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                let hi = self.read8(bus, self.pc);
                self.pc = u16::from(hi) << 8 | u16::from(lo);
            }
            Mnemonic::Rts => {
                self.implied_cycle(bus);
                self.tick(bus);
                let lo = u16::from(self.pull(bus));
                let hi = u16::from(self.pull(bus));
                self.pc = (hi << 8 | lo).wrapping_add(1);
                self.tick(bus);
            }
            Mnemonic::Rti => {
                self.implied_cycle(bus);
                self.tick(bus);
                let bits = self.pull(bus);
                self.status = Status::from_bits_truncate(bits);
                self.status.remove(Status::BREAK);
                self.status.insert(Status::UNUSED);
                let lo = u16::from(self.pull(bus));
                let hi = u16::from(self.pull(bus));
                self.pc = hi << 8 | lo;
            }
            Mnemonic::Brk => {
                // Padding byte is fetched and discarded; PC+1 is pushed.
                let _ = self.fetch8(bus);
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                let pushed = self.status | Status::BREAK | Status::UNUSED;
                self.push(bus, pushed.bits());
                self.status.insert(Status::INTERRUPT_DISABLE);
                let lo = u16::from(self.read8(bus, IRQ_VECTOR));
                let hi = u16::from(self.read8(bus, IRQ_VECTOR.wrapping_add(1)));
                self.pc = hi << 8 | lo;
            }

            // Branches
            Mnemonic::Bcc => {
                let taken = !self.status.contains(Status::CARRY);
                self.branch(bus, taken);
            }
            Mnemonic::Bcs => {
                let taken = self.status.contains(Status::CARRY);
                self.branch(bus, taken);
            }
            Mnemonic::Beq => {
                let taken = self.status.contains(Status::ZERO);
                self.branch(bus, taken);
            }
            Mnemonic::Bne => {
                let taken = !self.status.contains(Status::ZERO);
                self.branch(bus, taken);
            }
            Mnemonic::Bmi => {
                let taken = self.status.contains(Status::NEGATIVE);
                self.branch(bus, taken);
            }
            Mnemonic::Bpl => {
                let taken = !self.status.contains(Status::NEGATIVE);
                self.branch(bus, taken);
            }
            Mnemonic::Bvc => {
                let taken = !self.status.contains(Status::OVERFLOW);
                self.branch(bus, taken);
            }
            Mnemonic::Bvs => {
                let taken = self.status.contains(Status::OVERFLOW);
                self.branch(bus, taken);
            }

            // NOPs still perform their operand accesses (and page-cross
            // penalties) so timing-sensitive code stays aligned.
            Mnemonic::Nop => match mode {
                AddressingMode::Implied => self.implied_cycle(bus),
                AddressingMode::Immediate => {
                    let _ = self.fetch8(bus);
                }
                _ => {
                    let addr = self.operand_addr(bus, mode, false);
                    let _ = self.read8(bus, addr);
                }
            },

            Mnemonic::Jam => {
                self.implied_cycle(bus);
                self.jammed = true;
                log::warn!("CPU jammed by opcode ${opcode:02X} at ${:04X}", self.pc);
            }
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RamBus {
        ram: Vec<u8>,
        ticks: u64,
    }

    impl RamBus {
        fn new() -> Self {
            Self {
                ram: vec![0; 0x10000],
                ticks: 0,
            }
        }

        fn load(&mut self, addr: u16, bytes: &[u8]) {
            let addr = addr as usize;
            self.ram[addr..addr + bytes.len()].copy_from_slice(bytes);
        }
    }

    impl Bus for RamBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.ram[addr as usize] = value;
        }

        fn on_cpu_cycle(&mut self) {
            self.ticks += 1;
        }

        fn peek(&self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }
    }

    fn cpu_at(bus: &mut RamBus, pc: u16) -> Cpu {
        let mut cpu = Cpu::new();
        bus.ram[0xFFFC] = pc as u8;
        bus.ram[0xFFFD] = (pc >> 8) as u8;
        cpu.reset(bus);
        cpu
    }

    #[test]
    fn test_self_test_program() {
        let mut bus = RamBus::new();
        bus.load(
            0x0000,
            &[
                0xA2, 0x10, 0x9A, 0xA9, 0x05, 0x85, 0x10, 0xA9, 0x03, 0x65, 0x10, 0x85, 0x11,
                0xE8, 0x86, 0x12, 0x00,
            ],
        );
        let mut cpu = cpu_at(&mut bus, 0x0000);

        for _ in 0..10 {
            cpu.step_instruction(&mut bus);
        }

        assert_eq!(bus.ram[0x10], 0x05);
        assert_eq!(bus.ram[0x11], 0x08);
        assert_eq!(bus.ram[0x12], 0x11);
    }

    #[test]
    fn test_every_cycle_ticks_the_bus() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xA9, 0x42, 0x85, 0x10, 0xEA]);
        let mut cpu = cpu_at(&mut bus, 0x8000);

        let before_cycles = cpu.cycles;
        let before_ticks = bus.ticks;
        let mut elapsed = 0;
        for _ in 0..3 {
            elapsed += u64::from(cpu.step_instruction(&mut bus));
        }

        assert_eq!(cpu.cycles - before_cycles, elapsed);
        assert_eq!(bus.ticks - before_ticks, elapsed);
    }

    #[test]
    fn test_implied_and_immediate_cycle_counts() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xEA, 0xA9, 0x05]);
        let mut cpu = cpu_at(&mut bus, 0x8000);

        assert_eq!(cpu.step_instruction(&mut bus), 2); // NOP
        assert_eq!(cpu.step_instruction(&mut bus), 2); // LDA #
    }

    #[test]
    fn test_absolute_x_page_cross_costs_extra_cycle() {
        let mut bus = RamBus::new();
        // LDA $10F0,X twice with different X values.
        bus.load(0x8000, &[0xBD, 0xF0, 0x10, 0xBD, 0xF0, 0x10]);
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.x = 0x05; // $10F5: same page
        assert_eq!(cpu.step_instruction(&mut bus), 4);

        cpu.x = 0x20; // $1110: crosses
        assert_eq!(cpu.step_instruction(&mut bus), 5);
    }

    #[test]
    fn test_sta_absolute_x_always_five_cycles() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0x9D, 0xF0, 0x10, 0x9D, 0xF0, 0x10]);
        let mut cpu = cpu_at(&mut bus, 0x8000);
        cpu.a = 0xAA;

        cpu.x = 0x05;
        assert_eq!(cpu.step_instruction(&mut bus), 5);
        cpu.x = 0x20;
        assert_eq!(cpu.step_instruction(&mut bus), 5);
        assert_eq!(bus.ram[0x10F5], 0xAA);
        assert_eq!(bus.ram[0x1110], 0xAA);
    }

    #[test]
    fn test_branch_cycle_counts() {
        let mut bus = RamBus::new();
        // BNE not taken (Z set), BEQ taken same page, BEQ taken across page.
        bus.load(0x8000, &[0xD0, 0x02, 0xF0, 0x02]);
        bus.load(0x80F0, &[0xF0, 0x20]);
        let mut cpu = cpu_at(&mut bus, 0x8000);
        cpu.status.insert(Status::ZERO);

        assert_eq!(cpu.step_instruction(&mut bus), 2); // Not taken
        assert_eq!(cpu.step_instruction(&mut bus), 3); // Taken, same page
        assert_eq!(cpu.pc, 0x8006);

        cpu.pc = 0x80F0;
        assert_eq!(cpu.step_instruction(&mut bus), 4); // Taken, crosses page
        assert_eq!(cpu.pc, 0x8112);
    }

    #[test]
    fn test_jmp_indirect_page_wrap_bug() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0x6C, 0xFF, 0x10]);
        bus.ram[0x10FF] = 0x34;
        bus.ram[0x1100] = 0x56; // Would be the correct high byte
        bus.ram[0x1000] = 0x12; // Actually fetched
        let mut cpu = cpu_at(&mut bus, 0x8000);

        assert_eq!(cpu.step_instruction(&mut bus), 5);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn test_rmw_absolute_x_is_seven_cycles() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xFE, 0x00, 0x20]); // INC $2000,X
        bus.ram[0x2004] = 0x41;
        let mut cpu = cpu_at(&mut bus, 0x8000);
        cpu.x = 0x04;

        assert_eq!(cpu.step_instruction(&mut bus), 7);
        assert_eq!(bus.ram[0x2004], 0x42);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
        bus.load(0x9000, &[0x60]); // RTS
        let mut cpu = cpu_at(&mut bus, 0x8000);

        assert_eq!(cpu.step_instruction(&mut bus), 6);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.step_instruction(&mut bus), 6);
        assert_eq!(cpu.pc, 0x8003);
    }

    #[test]
    fn test_nmi_sequence() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xEA]);
        bus.ram[0xFFFA] = 0x00;
        bus.ram[0xFFFB] = 0x90;
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.trigger_nmi();
        assert_eq!(cpu.step_instruction(&mut bus), 7);
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.status.contains(Status::INTERRUPT_DISABLE));

        // Pushed status has B clear and U set.
        let pushed = bus.ram[0x0100 + usize::from(cpu.sp) + 1];
        assert_eq!(pushed & Status::BREAK.bits(), 0);
        assert_ne!(pushed & Status::UNUSED.bits(), 0);
    }

    #[test]
    fn test_irq_masked_by_i_flag() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xEA, 0x58, 0xEA]); // NOP, CLI, NOP
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.set_irq(true);
        cpu.step_instruction(&mut bus); // NOP: I still set, no interrupt
        assert_eq!(cpu.pc, 0x8001);

        cpu.step_instruction(&mut bus); // CLI
        cpu.step_instruction(&mut bus); // IRQ serviced at boundary
        assert_eq!(cpu.pc, 0x9000);
    }

    #[test]
    fn test_brk_pushes_b_set() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0x00]);
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut cpu = cpu_at(&mut bus, 0x8000);

        assert_eq!(cpu.step_instruction(&mut bus), 7);
        assert_eq!(cpu.pc, 0x9000);
        let pushed = bus.ram[0x0100 + usize::from(cpu.sp) + 1];
        assert_ne!(pushed & Status::BREAK.bits(), 0);

        // Return address is PC+2 (the byte after the padding byte).
        let ret_lo = bus.ram[0x0100 + usize::from(cpu.sp) + 2];
        let ret_hi = bus.ram[0x0100 + usize::from(cpu.sp) + 3];
        assert_eq!(u16::from(ret_hi) << 8 | u16::from(ret_lo), 0x8002);
    }

    #[test]
    fn test_stall_burns_before_next_instruction() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xEA, 0xEA]);
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.step_instruction(&mut bus);
        cpu.add_stall(513);
        assert_eq!(cpu.step_instruction(&mut bus), 513);
        assert_eq!(cpu.pc, 0x8001); // No instruction executed during stall
        assert_eq!(cpu.step_instruction(&mut bus), 2);
    }

    #[test]
    fn test_jam_halts_cpu() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0x02]);
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.step_instruction(&mut bus);
        assert!(cpu.is_jammed());
        let pc = cpu.pc;
        assert_eq!(cpu.step_instruction(&mut bus), 1);
        assert_eq!(cpu.pc, pc);
    }

    #[test]
    fn test_lax_loads_both_registers() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xA7, 0x10]); // LAX $10
        bus.ram[0x10] = 0x5A;
        let mut cpu = cpu_at(&mut bus, 0x8000);

        cpu.step_instruction(&mut bus);
        assert_eq!(cpu.a, 0x5A);
        assert_eq!(cpu.x, 0x5A);
    }

    #[test]
    fn test_dcp_decrements_then_compares() {
        let mut bus = RamBus::new();
        bus.load(0x8000, &[0xC7, 0x10]); // DCP $10
        bus.ram[0x10] = 0x43;
        let mut cpu = cpu_at(&mut bus, 0x8000);
        cpu.a = 0x42;

        assert_eq!(cpu.step_instruction(&mut bus), 5);
        assert_eq!(bus.ram[0x10], 0x42);
        assert!(cpu.status.contains(Status::ZERO));
        assert!(cpu.status.contains(Status::CARRY));
    }
}
