//! MMC1 (Mapper 1).
//!
//! Nintendo's first ASIC mapper, configured through a 5-bit serial shift
//! register clocked LSB-first by writes to $8000-$FFFF. Used by The Legend
//! of Zelda, Metroid, Final Fantasy.
//!
//! - $8000-$9FFF: control (mirroring, PRG mode, CHR mode)
//! - $A000-$BFFF: CHR bank 0
//! - $C000-$DFFF: CHR bank 1
//! - $E000-$FFFF: PRG bank (bit 4 disables PRG-RAM)
//!
//! The hardware ignores a serial write that lands on the CPU cycle right
//! after the previous one (consecutive-write suppression); games such as
//! Bill & Ted rely on it.

use crate::cartridge::Cartridge;
use crate::mapper::{Mapper, Mirroring};

/// PRG-ROM banking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PrgMode {
    /// Switch 32 KiB at $8000; low bank bit ignored.
    Switch32K,
    /// Fix first bank at $8000, switch 16 KiB at $C000.
    FixFirst,
    /// Fix last bank at $C000, switch 16 KiB at $8000.
    #[default]
    FixLast,
}

/// CHR banking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChrMode {
    /// Switch 8 KiB at a time; low bank bit ignored.
    #[default]
    Switch8K,
    /// Two independent 4 KiB banks.
    Switch4K,
}

/// MMC1 mapper.
#[derive(Debug, Clone)]
pub struct Mmc1 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    prg_banks: usize,

    shift_reg: u8,
    shift_count: u8,
    /// Cycle stamp of the last accepted serial write; writes within one
    /// cycle of it are dropped.
    last_write_cycle: Option<u64>,

    mirroring: Mirroring,
    prg_mode: PrgMode,
    chr_mode: ChrMode,
    chr_bank_0: u8,
    chr_bank_1: u8,
    prg_bank: u8,
    prg_ram_enabled: bool,
}

impl Mmc1 {
    /// Create an MMC1 mapper from a decoded cartridge.
    #[must_use]
    pub fn new(cart: &Cartridge) -> Self {
        Self {
            prg_rom: cart.prg_rom.clone(),
            chr: cart.chr_data(),
            chr_is_ram: cart.chr_is_ram,
            prg_ram: vec![0; 8 * 1024],
            prg_banks: (cart.prg_rom.len() / 16384).max(1),
            shift_reg: 0,
            shift_count: 0,
            last_write_cycle: None,
            mirroring: cart.mirroring,
            prg_mode: PrgMode::FixLast,
            chr_mode: ChrMode::Switch8K,
            chr_bank_0: 0,
            chr_bank_1: 0,
            prg_bank: 0,
            prg_ram_enabled: true,
        }
    }

    /// Clock one bit into the shift register, committing on the fifth.
    fn write_shift(&mut self, addr: u16, value: u8, cpu_cycle: u64) {
        // Consecutive-cycle writes are ignored by the hardware.
        if let Some(last) = self.last_write_cycle {
            if cpu_cycle.wrapping_sub(last) <= 1 {
                return;
            }
        }
        self.last_write_cycle = Some(cpu_cycle);

        // Bit 7 set resets the shift register and restores PRG fix-last.
        if value & 0x80 != 0 {
            self.shift_reg = 0;
            self.shift_count = 0;
            self.prg_mode = PrgMode::FixLast;
            return;
        }

        self.shift_reg |= (value & 1) << self.shift_count;
        self.shift_count += 1;

        if self.shift_count == 5 {
            let committed = self.shift_reg;
            match (addr >> 13) & 0x03 {
                0 => self.write_control(committed),
                1 => self.chr_bank_0 = committed,
                2 => self.chr_bank_1 = committed,
                3 => {
                    self.prg_bank = committed & 0x0F;
                    self.prg_ram_enabled = committed & 0x10 == 0;
                }
                _ => unreachable!(),
            }
            self.shift_reg = 0;
            self.shift_count = 0;
        }
    }

    fn write_control(&mut self, value: u8) {
        self.mirroring = match value & 0x03 {
            0 => Mirroring::SingleScreenLower,
            1 => Mirroring::SingleScreenUpper,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        };
        self.prg_mode = match (value >> 2) & 0x03 {
            0 | 1 => PrgMode::Switch32K,
            2 => PrgMode::FixFirst,
            _ => PrgMode::FixLast,
        };
        self.chr_mode = if value & 0x10 != 0 {
            ChrMode::Switch4K
        } else {
            ChrMode::Switch8K
        };
    }

    fn prg_offset(&self, addr: u16) -> usize {
        let bank = match self.prg_mode {
            PrgMode::Switch32K => {
                let base = (self.prg_bank & 0x0E) as usize;
                if addr < 0xC000 { base } else { base + 1 }
            }
            PrgMode::FixFirst => {
                if addr < 0xC000 {
                    0
                } else {
                    self.prg_bank as usize
                }
            }
            PrgMode::FixLast => {
                if addr < 0xC000 {
                    self.prg_bank as usize
                } else {
                    self.prg_banks - 1
                }
            }
        };
        (bank % self.prg_banks) * 16384 + (addr & 0x3FFF) as usize
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let chr_4k_banks = (self.chr.len() / 4096).max(1);
        let bank = match self.chr_mode {
            ChrMode::Switch8K => (self.chr_bank_0 & 0x1E) as usize + usize::from(addr >= 0x1000),
            ChrMode::Switch4K => {
                if addr < 0x1000 {
                    self.chr_bank_0 as usize
                } else {
                    self.chr_bank_1 as usize
                }
            }
        };
        (bank % chr_4k_banks) * 4096 + (addr & 0x0FFF) as usize
    }
}

impl Mapper for Mmc1 {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self.cpu_peek(addr)
    }

    fn cpu_peek(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => {
                if self.prg_ram_enabled {
                    self.prg_ram[(addr & 0x1FFF) as usize]
                } else {
                    0
                }
            }
            0x8000..=0xFFFF => {
                let offset = self.prg_offset(addr);
                self.prg_rom.get(offset).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8, cpu_cycle: u64) {
        match addr {
            0x6000..=0x7FFF => {
                if self.prg_ram_enabled {
                    self.prg_ram[(addr & 0x1FFF) as usize] = value;
                }
            }
            0x8000..=0xFFFF => self.write_shift(addr, value, cpu_cycle),
            _ => {}
        }
    }

    fn ppu_read(&mut self, addr: u16) -> u8 {
        let offset = self.chr_offset(addr);
        self.chr.get(offset).copied().unwrap_or(0)
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            let offset = self.chr_offset(addr);
            if let Some(byte) = self.chr.get_mut(offset) {
                *byte = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_number(&self) -> u8 {
        1
    }

    fn mapper_name(&self) -> &'static str {
        "MMC1"
    }

    fn reset(&mut self) {
        self.shift_reg = 0;
        self.shift_count = 0;
        self.last_write_cycle = None;
        self.prg_mode = PrgMode::FixLast;
    }
}
