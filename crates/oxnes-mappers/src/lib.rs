//! NES cartridge loading and mapper implementations.
//!
//! This crate parses iNES ROM images and provides the mapper hardware that
//! sits between the console buses and cartridge memory.
//!
//! # Supported Mappers
//!
//! | Mapper | Name | Description |
//! |--------|------|-------------|
//! | 0 | NROM | No banking, simplest boards |
//! | 1 | MMC1 | Serial shift-register configuration |
//! | 2 | UxROM | PRG banking only |
//! | 3 | CNROM | CHR banking only |
//! | 4 | MMC3 | Fine-grained banking + A12 scanline IRQ |
//! | 5 | MMC5 | Sub-banking, EXRAM, nametable routing, scanline IRQ |
//! | 7 | AxROM | 32 KiB PRG banks + single-screen select |
//!
//! # Example
//!
//! ```no_run
//! use oxnes_mappers::{create_mapper, Cartridge};
//!
//! let rom_data = std::fs::read("game.nes").expect("failed to read ROM");
//! let cart = Cartridge::load(&rom_data).expect("failed to parse ROM");
//! let mut mapper = create_mapper(&cart).expect("unsupported mapper");
//!
//! let opcode = mapper.cpu_read(0x8000);
//! let tile = mapper.ppu_read(0x0000);
//! ```

pub mod cartridge;
pub mod mapper;

mod axrom;
mod cnrom;
mod mmc1;
mod mmc3;
mod mmc5;
mod nrom;
mod uxrom;

pub use axrom::Axrom;
pub use cartridge::{Cartridge, LoadError};
pub use cnrom::Cnrom;
pub use mapper::{Mapper, Mirroring};
pub use mmc1::Mmc1;
pub use mmc3::Mmc3;
pub use mmc5::Mmc5;
pub use nrom::Nrom;
pub use uxrom::Uxrom;

/// Create a mapper instance for a decoded cartridge.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedMapper`] for mapper ids outside the
/// supported set.
pub fn create_mapper(cart: &Cartridge) -> Result<Box<dyn Mapper>, LoadError> {
    match cart.mapper_id {
        0 => Ok(Box::new(Nrom::new(cart))),
        1 => Ok(Box::new(Mmc1::new(cart))),
        2 => Ok(Box::new(Uxrom::new(cart))),
        3 => Ok(Box::new(Cnrom::new(cart))),
        4 => Ok(Box::new(Mmc3::new(cart))),
        5 => Ok(Box::new(Mmc5::new(cart))),
        7 => Ok(Box::new(Axrom::new(cart))),
        n => Err(LoadError::UnsupportedMapper(n)),
    }
}

/// Get the list of supported mapper numbers.
#[must_use]
pub fn supported_mappers() -> &'static [u8] {
    &[0, 1, 2, 3, 4, 5, 7]
}

/// Check if a mapper number is supported.
#[must_use]
pub fn is_mapper_supported(mapper: u8) -> bool {
    supported_mappers().contains(&mapper)
}
