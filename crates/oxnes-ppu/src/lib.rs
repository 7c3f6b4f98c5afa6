//! Dot-accurate Ricoh 2C02 PPU.
//!
//! The PPU advances one dot per [`Ppu::tick`] call; the console bus ticks
//! it three times per CPU cycle. All pattern-table traffic flows through
//! the cartridge mapper so that address-line observers (MMC3's A12 edge
//! counter, MMC5's fetch classification) see exactly the accesses the
//! rendering pipeline makes.
//!
//! Module map:
//! - [`registers`]: PPUCTRL/PPUMASK/PPUSTATUS bit definitions
//! - [`scroll`]: the loopy v/t/x/w scroll state
//! - [`background`]: tile fetch latches and shift registers
//! - [`oam`] / [`sprites`]: sprite memory, evaluation, and slots
//! - [`vram`]: nametable CIRAM and palette RAM
//! - [`palette`]: the fixed 64-color master palette

pub mod background;
pub mod oam;
pub mod palette;
pub mod ppu;
pub mod registers;
pub mod scroll;
pub mod sprites;
pub mod vram;

pub use oam::Oam;
pub use palette::SYSTEM_PALETTE;
pub use ppu::{Ppu, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::Scroll;
