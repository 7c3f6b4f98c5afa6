//! PPU control, mask, and status registers.

use bitflags::bitflags;

bitflags! {
    /// PPUCTRL ($2000), write-only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuCtrl: u8 {
        /// Base nametable select, low bit.
        const NAMETABLE_LO = 0x01;
        /// Base nametable select, high bit.
        const NAMETABLE_HI = 0x02;
        /// VRAM address increment: 0 = +1 (across), 1 = +32 (down).
        const VRAM_INCREMENT = 0x04;
        /// Sprite pattern table select (8x8 sprites only).
        const SPRITE_TABLE = 0x08;
        /// Background pattern table select.
        const BG_TABLE = 0x10;
        /// Sprite size: 0 = 8x8, 1 = 8x16.
        const SPRITE_SIZE = 0x20;
        /// PPU master/slave select (unused on a stock console).
        const MASTER_SLAVE = 0x40;
        /// Generate NMI at the start of vertical blank.
        const NMI_ENABLE = 0x80;
    }
}

impl PpuCtrl {
    /// VRAM address increment applied after PPUDATA access.
    #[must_use]
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Background pattern table base address.
    #[must_use]
    pub fn bg_table_addr(self) -> u16 {
        if self.contains(Self::BG_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite pattern table base address (ignored for 8x16 sprites).
    #[must_use]
    pub fn sprite_table_addr(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite height in pixels.
    #[must_use]
    pub fn sprite_height(self) -> u16 {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }

    /// NMI generation enabled.
    #[must_use]
    pub fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

bitflags! {
    /// PPUMASK ($2001), write-only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuMask: u8 {
        /// Greyscale: palette indices are ANDed with $30.
        const GREYSCALE = 0x01;
        /// Show background in the leftmost 8 pixels.
        const SHOW_BG_LEFT = 0x02;
        /// Show sprites in the leftmost 8 pixels.
        const SHOW_SPRITES_LEFT = 0x04;
        /// Enable background rendering.
        const SHOW_BG = 0x08;
        /// Enable sprite rendering.
        const SHOW_SPRITES = 0x10;
        /// Emphasize red.
        const EMPHASIZE_RED = 0x20;
        /// Emphasize green.
        const EMPHASIZE_GREEN = 0x40;
        /// Emphasize blue.
        const EMPHASIZE_BLUE = 0x80;
    }
}

impl PpuMask {
    /// Rendering is enabled when background or sprites are shown; this is
    /// what gates the whole fetch/scroll machinery.
    #[must_use]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BG | Self::SHOW_SPRITES)
    }
}

bitflags! {
    /// PPUSTATUS ($2002) readable bits; the low five bits are open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        /// More than 8 sprites matched a scanline.
        const SPRITE_OVERFLOW = 0x20;
        /// Sprite 0 overlapped an opaque background pixel.
        const SPRITE_ZERO_HIT = 0x40;
        /// Vertical blank in progress. Cleared by reading $2002.
        const VBLANK = 0x80;
    }
}
