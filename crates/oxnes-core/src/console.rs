//! Console facade.
//!
//! Owns the CPU and the bus (which in turn owns the PPU, APU, controllers,
//! and mapper), drives the per-frame instruction loop, and exposes the
//! public emulation surface: cartridge insertion, button events, the
//! framebuffer, and the audio drain.

use oxnes_cpu::Cpu;
use oxnes_mappers::{create_mapper, Cartridge, LoadError};
use oxnes_ppu::FRAME_SIZE;

use crate::bus::NesBus;
use crate::controller::Button;

/// NES emulation timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// Default CPU cycles emulated per call to `next_frame`.
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// PPU dots per scanline.
    pub const PPU_DOTS_PER_SCANLINE: u16 = 341;
    /// Total scanlines per frame, vblank included.
    pub const PPU_SCANLINES: u16 = 262;
}

/// The emulated console.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
    cycles_per_frame: u32,
    frames: u64,
}

impl Console {
    /// Create a console with no cartridge inserted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: NesBus::new(),
            cycles_per_frame: timing::CPU_CYCLES_PER_FRAME,
            frames: 0,
        }
    }

    /// Decode an iNES image and insert it.
    ///
    /// On success the mapper, PPU, APU, and CPU are reset in that order
    /// (the CPU last so it fetches the new reset vector). On failure the
    /// console is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for a bad header, truncated payload, or
    /// unsupported mapper.
    pub fn insert_cartridge(&mut self, rom_data: &[u8]) -> Result<(), LoadError> {
        let cart = Cartridge::load(rom_data)?;
        let mapper = create_mapper(&cart)?;
        log::info!(
            "inserted cartridge: mapper {} ({} KiB PRG, {} KiB CHR{})",
            cart.mapper_id,
            cart.prg_rom.len() / 1024,
            cart.chr_rom.len().max(if cart.chr_is_ram { 8192 } else { 0 }) / 1024,
            if cart.chr_is_ram { " RAM" } else { "" },
        );

        self.bus.insert_mapper(mapper);
        self.bus.reset();
        self.cpu = Cpu::new();
        self.cpu.reset(&mut self.bus);
        self.frames = 0;
        Ok(())
    }

    /// Reset the console, keeping the inserted cartridge.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu = Cpu::new();
        self.cpu.reset(&mut self.bus);
        self.frames = 0;
    }

    /// Override the per-frame CPU cycle budget (default 29,780).
    pub fn set_cpu_cycles_per_frame(&mut self, cycles: u32) {
        self.cycles_per_frame = cycles.max(1);
    }

    /// Press a controller 1 button.
    pub fn press_button(&mut self, button: Button) {
        self.bus.controller1.set_button(button, true);
    }

    /// Release a controller 1 button.
    pub fn release_button(&mut self, button: Button) {
        self.bus.controller1.set_button(button, false);
    }

    /// Execute a single CPU instruction (or burn a pending DMA stall).
    /// Returns the CPU cycles elapsed.
    pub fn step_instruction(&mut self) -> u32 {
        if self.bus.take_nmi() {
            self.cpu.trigger_nmi();
        }
        self.cpu.set_irq(self.bus.irq_asserted());

        let cycles = self.cpu.step_instruction(&mut self.bus);

        let stall = self.bus.take_dma_stall();
        if stall > 0 {
            self.cpu.add_stall(stall);
        }
        cycles
    }

    /// Run one frame's worth of CPU cycles.
    ///
    /// Does nothing until a cartridge is inserted.
    pub fn next_frame(&mut self) {
        if !self.bus.has_cartridge() {
            return;
        }

        let mut remaining = i64::from(self.cycles_per_frame);
        while remaining > 0 {
            remaining -= i64::from(self.step_instruction());
        }
        self.frames += 1;
    }

    /// The current 256x240 framebuffer of packed `0x00RRGGBB` pixels.
    #[must_use]
    pub fn frame_buffer(&self) -> &[u32; FRAME_SIZE] {
        self.bus.ppu.frame_buffer()
    }

    /// Drain buffered audio samples into `out`; returns the count written.
    /// Samples are mono floats in [-1, 1] at 44.1 kHz.
    pub fn drain_apu_samples(&mut self, out: &mut [f32]) -> usize {
        self.bus.apu.drain_samples(out)
    }

    /// Total CPU cycles executed.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles
    }

    /// Frames emulated since the last reset.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Side-effect-free memory read for debugging and tests.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// The CPU, for debugging.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The bus, for debugging.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable bus access, for tests and debugging front-ends.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Mutable CPU access, for tests and debugging front-ends.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal NROM image: NOP slide with the reset vector at $8000.
    fn nop_rom() -> Vec<u8> {
        let mut rom = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
        rom.extend_from_slice(&[0; 8]);
        let mut prg = vec![0xEA; 32768];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        rom.extend_from_slice(&prg);
        rom.extend_from_slice(&[0; 8192]); // CHR
        rom
    }

    #[test]
    fn test_insert_and_run_frame() {
        let mut console = Console::new();
        console.insert_cartridge(&nop_rom()).unwrap();

        console.next_frame();
        assert_eq!(console.frames(), 1);
        assert!(console.cycles() >= u64::from(timing::CPU_CYCLES_PER_FRAME));
    }

    #[test]
    fn test_next_frame_without_cartridge_is_noop() {
        let mut console = Console::new();
        console.next_frame();
        assert_eq!(console.frames(), 0);
        assert_eq!(console.cycles(), 0);
    }

    #[test]
    fn test_bad_rom_leaves_console_untouched() {
        let mut console = Console::new();
        console.insert_cartridge(&nop_rom()).unwrap();
        console.next_frame();
        let cycles = console.cycles();

        assert!(console.insert_cartridge(&[0x00, 0x01]).is_err());
        assert_eq!(console.cycles(), cycles);
        console.next_frame();
        assert_eq!(console.frames(), 2);
    }

    #[test]
    fn test_insert_then_reset_is_idempotent() {
        let mut console = Console::new();
        console.insert_cartridge(&nop_rom()).unwrap();
        let pc_after_insert = console.cpu().pc;
        let cycles_after_insert = console.cycles();

        console.next_frame();
        console.reset();
        assert_eq!(console.cpu().pc, pc_after_insert);
        assert_eq!(console.cycles(), cycles_after_insert);
        assert_eq!(console.frames(), 0);
    }

    #[test]
    fn test_cycle_budget_override() {
        let mut console = Console::new();
        console.insert_cartridge(&nop_rom()).unwrap();
        let base = console.cycles();

        console.set_cpu_cycles_per_frame(100);
        console.next_frame();
        let used = console.cycles() - base;
        // Budget plus at most one instruction of overshoot.
        assert!((100..110).contains(&used), "used {used} cycles");
    }

    #[test]
    fn test_frame_buffer_dimensions() {
        let console = Console::new();
        assert_eq!(console.frame_buffer().len(), 256 * 240);
    }

    #[test]
    fn test_audio_accumulates_per_frame() {
        let mut console = Console::new();
        console.insert_cartridge(&nop_rom()).unwrap();
        console.next_frame();

        let mut out = [0.0f32; 2048];
        let count = console.drain_apu_samples(&mut out);
        assert!((700..800).contains(&count), "got {count} samples");
    }
}
