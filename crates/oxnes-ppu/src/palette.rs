//! Fixed 2C02 master palette.
//!
//! Maps the 64 composite-video colors the PPU can generate to packed
//! `0x00RRGGBB` values, using the widely used NESDev reference palette.

/// 64-entry palette index to RGB lookup.
pub static SYSTEM_PALETTE: [u32; 64] = [
    // $00-$0F
    0x0054_5454, 0x0000_1E74, 0x0008_1090, 0x0030_0088, 0x0044_0064, 0x005C_0030, 0x0054_0400,
    0x003C_1800, 0x0020_2A00, 0x0008_3A00, 0x0000_4000, 0x0000_3C00, 0x0000_323C, 0x0000_0000,
    0x0000_0000, 0x0000_0000,
    // $10-$1F
    0x0098_9698, 0x0008_4CC4, 0x0030_32EC, 0x005C_1EE4, 0x0088_14B0, 0x00A0_1464, 0x0098_2220,
    0x0078_3C00, 0x0054_5A00, 0x0028_7200, 0x0008_7C00, 0x0000_7628, 0x0000_6678, 0x0000_0000,
    0x0000_0000, 0x0000_0000,
    // $20-$2F
    0x00EC_EEEC, 0x004C_9AEC, 0x0078_7CEC, 0x00B0_62EC, 0x00E4_54EC, 0x00EC_58B4, 0x00EC_6A64,
    0x00D4_8820, 0x00A0_AA00, 0x0074_C400, 0x004C_D020, 0x0038_CC6C, 0x0038_B4CC, 0x003C_3C3C,
    0x0000_0000, 0x0000_0000,
    // $30-$3F
    0x00EC_EEEC, 0x00A8_CCEC, 0x00BC_BCEC, 0x00D4_B2EC, 0x00EC_AEEC, 0x00EC_AED4, 0x00EC_B4B0,
    0x00E4_C490, 0x00CC_D278, 0x00B4_DE78, 0x00A8_E290, 0x0098_E2B4, 0x00A0_D6E4, 0x00A0_A2A0,
    0x0000_0000, 0x0000_0000,
];

/// Look up the RGB color for a 6-bit palette index.
#[inline]
#[must_use]
pub fn rgb(index: u8) -> u32 {
    SYSTEM_PALETTE[(index & 0x3F) as usize]
}
