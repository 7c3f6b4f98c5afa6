//! MMC5 (Mapper 5).
//!
//! Nintendo's most capable mapper, used by Castlevania III and the Koei
//! strategy titles. Beyond flexible PRG/CHR sub-banking it routes the
//! entire nametable space itself, carries 1 KiB of internal EXRAM with four
//! operating modes (including per-tile extended attributes), counts
//! scanlines for its IRQ, and exposes an 8x8 hardware multiplier.
//!
//! The PPU keeps it informed through the progress hooks on the `Mapper`
//! trait: sprite-fetch window edges (CHR set selection in 8x16 sprite
//! mode), scanline ends (IRQ counter), vblank start (in-frame flag), and
//! nametable fetch addresses (extended attribute lookup).
//!
//! Register map (CPU):
//! - $5100/$5101: PRG / CHR mode
//! - $5102/$5103: PRG-RAM write-protect keys
//! - $5104: EXRAM mode, $5105: nametable mapping
//! - $5106/$5107: fill-mode tile and attribute
//! - $5113: PRG-RAM bank, $5114-$5117: PRG banks
//! - $5120-$5127: CHR set A, $5128-$512B: CHR set B, $5130: CHR upper bits
//! - $5203: IRQ scanline target, $5204: IRQ status/enable
//! - $5205/$5206: multiplier factors; reads return the product
//! - $5C00-$5FFF: EXRAM window

use crate::cartridge::Cartridge;
use crate::mapper::{Mapper, Mirroring};

const EXRAM_SIZE: usize = 1024;
const PRG_RAM_SIZE: usize = 64 * 1024;

/// MMC5 mapper.
pub struct Mmc5 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    /// Internal extended RAM.
    exram: [u8; EXRAM_SIZE],
    /// The console's 2 KiB of nametable RAM, owned here because MMC5
    /// routes every nametable access itself.
    ciram: [u8; 2048],

    prg_mode: u8,
    chr_mode: u8,
    prg_ram_protect1: u8,
    prg_ram_protect2: u8,
    exram_mode: u8,
    nt_mapping: u8,
    fill_tile: u8,
    fill_attr: u8,

    prg_ram_bank: u8,
    /// $5114-$5117. Bit 7 of the first three selects ROM over PRG-RAM;
    /// $5117 is always ROM.
    prg_banks: [u8; 4],

    /// $5120-$5127 with the $5130 upper bits folded in at write time.
    chr_regs_a: [u16; 8],
    /// $5128-$512B, mirrored across both pattern halves.
    chr_regs_b: [u16; 4],
    chr_upper: u8,
    /// In 8x8 sprite mode all fetches use whichever set was written last.
    last_chr_set_b: bool,

    sprite_size_8x16: bool,
    fetching_sprites: bool,

    irq_target: u8,
    irq_enabled: bool,
    irq_pending: bool,
    in_frame: bool,
    scanline_counter: u8,

    mult_a: u8,
    mult_b: u8,

    /// Nametable offset of the most recent tile fetch, for extended
    /// attribute lookup.
    ex_attr_index: usize,
    mirroring: Mirroring,
}

impl Mmc5 {
    /// Create an MMC5 mapper from a decoded cartridge.
    #[must_use]
    pub fn new(cart: &Cartridge) -> Self {
        Self {
            prg_rom: cart.prg_rom.clone(),
            chr: cart.chr_data(),
            chr_is_ram: cart.chr_is_ram,
            prg_ram: vec![0; PRG_RAM_SIZE],
            exram: [0; EXRAM_SIZE],
            ciram: [0; 2048],
            prg_mode: 3,
            chr_mode: 3,
            prg_ram_protect1: 0,
            prg_ram_protect2: 0,
            exram_mode: 0,
            nt_mapping: 0,
            fill_tile: 0,
            fill_attr: 0,
            prg_ram_bank: 0,
            prg_banks: [0, 0, 0, 0xFF],
            chr_regs_a: [0; 8],
            chr_regs_b: [0; 4],
            chr_upper: 0,
            last_chr_set_b: false,
            sprite_size_8x16: false,
            fetching_sprites: false,
            irq_target: 0,
            irq_enabled: false,
            irq_pending: false,
            in_frame: false,
            scanline_counter: 0,
            mult_a: 0xFF,
            mult_b: 0xFF,
            ex_attr_index: 0,
            mirroring: cart.mirroring,
        }
    }

    fn prg_ram_writable(&self) -> bool {
        self.prg_ram_protect1 & 0x03 == 0x02 && self.prg_ram_protect2 & 0x03 == 0x01
    }

    /// Resolve a $8000-$FFFF access to (is_rom, byte offset).
    fn prg_target(&self, addr: u16) -> (bool, usize) {
        let reg = |i: usize| self.prg_banks[i];
        let rom_8k = |bank: usize, addr: u16| {
            let banks = (self.prg_rom.len() / 8192).max(1);
            (bank % banks) * 8192 + (addr & 0x1FFF) as usize
        };
        let ram_8k = |bank: usize, addr: u16| {
            let banks = (self.prg_ram.len() / 8192).max(1);
            (bank % banks) * 8192 + (addr & 0x1FFF) as usize
        };
        // 16 KiB windows use the register's even/odd pair of 8 KiB banks.
        let pick_16k = |reg: u8, addr: u16| {
            let bank = ((reg & 0x7F) & 0xFE) as usize + usize::from(addr & 0x2000 != 0);
            (reg & 0x80 != 0, bank)
        };

        match self.prg_mode {
            0 => {
                // One 32 KiB ROM window from $5117.
                let bank = ((reg(3) & 0x7C) as usize) + ((addr as usize >> 13) & 0x03);
                (true, rom_8k(bank, addr))
            }
            1 => {
                let (is_rom, bank) = if addr < 0xC000 {
                    pick_16k(reg(1), addr)
                } else {
                    let (_, bank) = pick_16k(reg(3), addr);
                    (true, bank)
                };
                if is_rom {
                    (true, rom_8k(bank, addr))
                } else {
                    (false, ram_8k(bank, addr))
                }
            }
            2 => match addr {
                0x8000..=0xBFFF => {
                    let (is_rom, bank) = pick_16k(reg(1), addr);
                    if is_rom {
                        (true, rom_8k(bank, addr))
                    } else {
                        (false, ram_8k(bank, addr))
                    }
                }
                0xC000..=0xDFFF => {
                    let is_rom = reg(2) & 0x80 != 0;
                    let bank = (reg(2) & 0x7F) as usize;
                    if is_rom {
                        (true, rom_8k(bank, addr))
                    } else {
                        (false, ram_8k(bank, addr))
                    }
                }
                _ => (true, rom_8k((reg(3) & 0x7F) as usize, addr)),
            },
            _ => {
                let index = ((addr as usize >> 13) & 0x03).min(3);
                let r = reg(index);
                let is_rom = index == 3 || r & 0x80 != 0;
                let bank = (r & 0x7F) as usize;
                if is_rom {
                    (true, rom_8k(bank, addr))
                } else {
                    (false, ram_8k(bank, addr))
                }
            }
        }
    }

    /// CHR offset through set A ($5120-$5127).
    fn chr_offset_a(&self, addr: u16) -> usize {
        let addr = addr & 0x1FFF;
        let (bank, size) = match self.chr_mode {
            0 => (self.chr_regs_a[7] as usize, 8192),
            1 => (self.chr_regs_a[if addr < 0x1000 { 3 } else { 7 }] as usize, 4096),
            2 => (
                self.chr_regs_a[(((addr >> 11) & 3) as usize) * 2 + 1] as usize,
                2048,
            ),
            _ => (self.chr_regs_a[((addr >> 10) & 7) as usize] as usize, 1024),
        };
        self.chr_index(bank, size, addr)
    }

    /// CHR offset through set B ($5128-$512B), which covers 4 KiB and
    /// repeats over both pattern halves.
    fn chr_offset_b(&self, addr: u16) -> usize {
        let addr = addr & 0x1FFF;
        let (bank, size) = match self.chr_mode {
            0 => (self.chr_regs_b[3] as usize, 8192),
            1 => (self.chr_regs_b[3] as usize, 4096),
            2 => (
                self.chr_regs_b[(((addr >> 11) & 1) as usize) * 2 + 1] as usize,
                2048,
            ),
            _ => (self.chr_regs_b[((addr >> 10) & 3) as usize] as usize, 1024),
        };
        self.chr_index(bank, size, addr)
    }

    fn chr_index(&self, bank: usize, size: usize, addr: u16) -> usize {
        let banks = (self.chr.len() / size).max(1);
        (bank % banks) * size + (addr as usize) % size
    }

    /// Per-tile 4 KiB CHR bank from EXRAM, extended attribute mode only.
    fn chr_offset_extended(&self, addr: u16) -> usize {
        let ex = self.exram[self.ex_attr_index];
        let bank = (usize::from(self.chr_upper) << 6) | usize::from(ex & 0x3F);
        self.chr_index(bank, 4096, addr & 0x0FFF)
    }

    /// Replicate a 2-bit attribute into all four quadrant slots.
    fn replicate_attr(attr: u8) -> u8 {
        let attr = attr & 0x03;
        attr | attr << 2 | attr << 4 | attr << 6
    }
}

impl Mapper for Mmc5 {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        let value = self.cpu_peek(addr);
        if addr == 0x5204 {
            // Reading IRQ status acknowledges the pending flag.
            self.irq_pending = false;
        }
        value
    }

    fn cpu_peek(&self, addr: u16) -> u8 {
        match addr {
            0x5204 => u8::from(self.irq_pending) << 7 | u8::from(self.in_frame) << 6,
            0x5205 => (u16::from(self.mult_a) * u16::from(self.mult_b)) as u8,
            0x5206 => ((u16::from(self.mult_a) * u16::from(self.mult_b)) >> 8) as u8,
            0x5C00..=0x5FFF => {
                // EXRAM is CPU-readable only in modes 2 and 3.
                if self.exram_mode >= 2 {
                    self.exram[(addr & 0x03FF) as usize]
                } else {
                    0
                }
            }
            0x6000..=0x7FFF => {
                let banks = (self.prg_ram.len() / 8192).max(1);
                let bank = (self.prg_ram_bank as usize) % banks;
                self.prg_ram[bank * 8192 + (addr & 0x1FFF) as usize]
            }
            0x8000..=0xFFFF => {
                let (is_rom, offset) = self.prg_target(addr);
                if is_rom {
                    self.prg_rom.get(offset).copied().unwrap_or(0)
                } else {
                    self.prg_ram.get(offset).copied().unwrap_or(0)
                }
            }
            _ => 0,
        }
    }

    #[allow(clippy::too_many_lines)] // One arm per register.
    fn cpu_write(&mut self, addr: u16, value: u8, _cpu_cycle: u64) {
        match addr {
            0x5100 => self.prg_mode = value & 0x03,
            0x5101 => self.chr_mode = value & 0x03,
            0x5102 => self.prg_ram_protect1 = value & 0x03,
            0x5103 => self.prg_ram_protect2 = value & 0x03,
            0x5104 => self.exram_mode = value & 0x03,
            0x5105 => self.nt_mapping = value,
            0x5106 => self.fill_tile = value,
            0x5107 => self.fill_attr = value & 0x03,
            0x5113 => self.prg_ram_bank = value & 0x0F,
            0x5114..=0x5117 => self.prg_banks[(addr - 0x5114) as usize] = value,
            0x5120..=0x5127 => {
                self.chr_regs_a[(addr - 0x5120) as usize] =
                    u16::from(value) | u16::from(self.chr_upper) << 8;
                self.last_chr_set_b = false;
            }
            0x5128..=0x512B => {
                self.chr_regs_b[(addr - 0x5128) as usize] =
                    u16::from(value) | u16::from(self.chr_upper) << 8;
                self.last_chr_set_b = true;
            }
            0x5130 => self.chr_upper = value & 0x03,
            0x5203 => self.irq_target = value,
            0x5204 => self.irq_enabled = value & 0x80 != 0,
            0x5205 => self.mult_a = value,
            0x5206 => self.mult_b = value,
            0x5C00..=0x5FFF => {
                // Mode 3 EXRAM is read-only; other modes accept writes.
                if self.exram_mode != 3 {
                    self.exram[(addr & 0x03FF) as usize] = value;
                }
            }
            0x6000..=0x7FFF => {
                if self.prg_ram_writable() {
                    let banks = (self.prg_ram.len() / 8192).max(1);
                    let bank = (self.prg_ram_bank as usize) % banks;
                    self.prg_ram[bank * 8192 + (addr & 0x1FFF) as usize] = value;
                }
            }
            0x8000..=0xFFFF => {
                let (is_rom, offset) = self.prg_target(addr);
                if !is_rom && self.prg_ram_writable() {
                    if let Some(byte) = self.prg_ram.get_mut(offset) {
                        *byte = value;
                    }
                }
            }
            _ => {}
        }
    }

    fn ppu_read(&mut self, addr: u16) -> u8 {
        let background_fetch = !self.fetching_sprites;
        let offset = if self.exram_mode == 1 && background_fetch {
            self.chr_offset_extended(addr)
        } else if self.sprite_size_8x16 {
            if self.fetching_sprites {
                self.chr_offset_a(addr)
            } else {
                self.chr_offset_b(addr)
            }
        } else if self.last_chr_set_b {
            self.chr_offset_b(addr)
        } else {
            self.chr_offset_a(addr)
        };
        self.chr.get(offset).copied().unwrap_or(0)
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            let offset = self.chr_offset_a(addr);
            if let Some(byte) = self.chr.get_mut(offset) {
                *byte = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending && self.irq_enabled
    }

    fn irq_acknowledge(&mut self) {
        self.irq_pending = false;
    }

    fn owns_nametables(&self) -> bool {
        true
    }

    fn nt_read(&mut self, addr: u16) -> u8 {
        let addr = addr & 0x0FFF;
        let offset = (addr & 0x03FF) as usize;
        let is_attr = offset >= 0x3C0;

        // Extended attribute mode replaces every attribute fetch with the
        // 2-bit palette from the last fetched tile's EXRAM byte.
        if self.exram_mode == 1 && is_attr && !self.fetching_sprites {
            let ex = self.exram[self.ex_attr_index];
            return Self::replicate_attr(ex >> 6);
        }

        let quadrant = (addr >> 10) & 0x03;
        match (self.nt_mapping >> (quadrant * 2)) & 0x03 {
            0 => self.ciram[offset],
            1 => self.ciram[0x400 + offset],
            2 => {
                if self.exram_mode < 2 {
                    self.exram[offset]
                } else {
                    0
                }
            }
            _ => {
                if is_attr {
                    Self::replicate_attr(self.fill_attr)
                } else {
                    self.fill_tile
                }
            }
        }
    }

    fn nt_write(&mut self, addr: u16, value: u8) {
        let addr = addr & 0x0FFF;
        let offset = (addr & 0x03FF) as usize;
        let quadrant = (addr >> 10) & 0x03;
        match (self.nt_mapping >> (quadrant * 2)) & 0x03 {
            0 => self.ciram[offset] = value,
            1 => self.ciram[0x400 + offset] = value,
            2 => {
                if self.exram_mode < 2 {
                    self.exram[offset] = value;
                }
            }
            _ => {}
        }
    }

    fn set_fetching_sprites(&mut self, fetching: bool) {
        self.fetching_sprites = fetching;
    }

    fn set_sprite_size_8x16(&mut self, is_8x16: bool) {
        self.sprite_size_8x16 = is_8x16;
    }

    fn on_scanline_end(&mut self, scanline: u16) {
        self.in_frame = true;
        self.scanline_counter = scanline as u8;
        if self.irq_target != 0 && self.scanline_counter == self.irq_target {
            self.irq_pending = true;
        }
    }

    fn start_vblank(&mut self) {
        self.in_frame = false;
        self.scanline_counter = 0;
    }

    fn notify_nametable_fetch(&mut self, addr: u16) {
        self.ex_attr_index = (addr & 0x03FF) as usize;
    }

    fn mapper_number(&self) -> u8 {
        5
    }

    fn mapper_name(&self) -> &'static str {
        "MMC5"
    }

    fn reset(&mut self) {
        self.prg_mode = 3;
        self.chr_mode = 3;
        self.exram_mode = 0;
        self.nt_mapping = 0;
        self.prg_banks = [0, 0, 0, 0xFF];
        self.chr_regs_a = [0; 8];
        self.chr_regs_b = [0; 4];
        self.chr_upper = 0;
        self.last_chr_set_b = false;
        self.irq_target = 0;
        self.irq_enabled = false;
        self.irq_pending = false;
        self.in_frame = false;
        self.scanline_counter = 0;
    }
}
