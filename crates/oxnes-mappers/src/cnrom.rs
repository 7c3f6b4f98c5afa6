//! CNROM (Mapper 3).
//!
//! CHR-only banking: any write to $8000-$FFFF selects an 8 KiB CHR bank.
//! PRG is unbanked, mirrored like NROM. Used by Gradius, Arkanoid.

use crate::cartridge::Cartridge;
use crate::mapper::{Mapper, Mirroring};

/// CNROM mapper.
#[derive(Debug, Clone)]
pub struct Cnrom {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_bank: u8,
    chr_banks: usize,
    mirroring: Mirroring,
}

impl Cnrom {
    /// Create a CNROM mapper from a decoded cartridge.
    #[must_use]
    pub fn new(cart: &Cartridge) -> Self {
        let chr = cart.chr_data();
        Self {
            prg_rom: cart.prg_rom.clone(),
            chr_banks: (chr.len() / 8192).max(1),
            chr,
            chr_bank: 0,
            mirroring: cart.mirroring,
        }
    }
}

impl Mapper for Cnrom {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self.cpu_peek(addr)
    }

    fn cpu_peek(&self, addr: u16) -> u8 {
        if addr >= 0x8000 {
            let offset = (addr as usize - 0x8000) % self.prg_rom.len().max(1);
            self.prg_rom.get(offset).copied().unwrap_or(0)
        } else {
            0
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8, _cpu_cycle: u64) {
        if addr >= 0x8000 {
            self.chr_bank = value;
        }
    }

    fn ppu_read(&mut self, addr: u16) -> u8 {
        let bank = self.chr_bank as usize % self.chr_banks;
        self.chr
            .get(bank * 8192 + (addr & 0x1FFF) as usize)
            .copied()
            .unwrap_or(0)
    }

    fn ppu_write(&mut self, _addr: u16, _value: u8) {
        // CNROM boards carry CHR-ROM; writes are ignored.
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_number(&self) -> u8 {
        3
    }

    fn mapper_name(&self) -> &'static str {
        "CNROM"
    }

    fn reset(&mut self) {
        self.chr_bank = 0;
    }
}
