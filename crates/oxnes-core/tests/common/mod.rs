//! Shared ROM builders for the integration tests.
#![allow(dead_code)] // Each test binary uses a different subset.

/// Assemble an iNES image from raw parts.
///
/// `prg` must be a multiple of 16 KiB and `chr` a multiple of 8 KiB (or
/// empty for CHR-RAM boards).
pub fn build_ines(mapper_id: u8, flags6_low: u8, prg: &[u8], chr: &[u8]) -> Vec<u8> {
    assert_eq!(prg.len() % 16384, 0);
    assert_eq!(chr.len() % 8192, 0);

    let mut image = vec![0x4E, 0x45, 0x53, 0x1A];
    image.push((prg.len() / 16384) as u8);
    image.push((chr.len() / 8192) as u8);
    image.push((mapper_id << 4) | flags6_low);
    image.push(mapper_id & 0xF0);
    image.extend_from_slice(&[0; 8]);
    image.extend_from_slice(prg);
    image.extend_from_slice(chr);
    image
}

/// 32 KiB NROM image: NOP slide with the reset vector at `entry`.
/// `flags6_low` carries the mirroring bits.
pub fn nrom_image(flags6_low: u8, entry: u16) -> Vec<u8> {
    let mut prg = vec![0xEA; 32768];
    prg[0x7FFC] = entry as u8;
    prg[0x7FFD] = (entry >> 8) as u8;
    build_ines(0, flags6_low, &prg, &[0; 8192])
}

/// NROM image with a program placed at $8000 (also the reset vector).
pub fn nrom_with_program(program: &[u8]) -> Vec<u8> {
    let mut prg = vec![0xEA; 32768];
    prg[..program.len()].copy_from_slice(program);
    prg[0x7FFC] = 0x00;
    prg[0x7FFD] = 0x80;
    build_ines(0, 0, &prg, &[0; 8192])
}

/// The MMC1 bank-switch fixture: 2x16 KiB PRG, bank 0 filled with $A0 and
/// bank 1 with $B0, reset vector $1234 in the last bank.
pub fn mmc1_bank_image() -> Vec<u8> {
    let mut prg = vec![0xA0; 16384];
    let mut bank1 = vec![0xB0; 16384];
    bank1[0x3FFC] = 0x34;
    bank1[0x3FFD] = 0x12;
    prg.extend_from_slice(&bank1);
    build_ines(1, 0, &prg, &[0; 8192])
}

/// 64 KiB MMC3 image, NOP-filled PRG with the reset vector at $8000.
pub fn mmc3_image() -> Vec<u8> {
    let mut prg = vec![0xEA; 65536];
    let last = prg.len() - 16384;
    prg[last + 0x3FFC] = 0x00;
    prg[last + 0x3FFD] = 0x80;
    build_ines(4, 0, &prg, &[0; 8192])
}

/// 128 KiB MMC5 image, NOP-filled PRG.
pub fn mmc5_image() -> Vec<u8> {
    // Mode-3 power-on maps the last 8 KiB bank at $E000, so the reset
    // vector lives at the end of the image; point it at $8000.
    let mut prg = vec![0xEA; 131072];
    let len = prg.len();
    prg[len - 4] = 0x00;
    prg[len - 3] = 0x80;
    build_ines(5, 0, &prg, &[0; 8192])
}
