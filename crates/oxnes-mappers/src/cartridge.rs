//! iNES ROM image parsing.
//!
//! Decodes the fixed 16-byte iNES header and splits the payload into PRG-ROM
//! and CHR-ROM. A 512-byte trainer, when flagged, is skipped. A CHR count of
//! zero means the board carries 8 KiB of CHR-RAM instead of ROM.

use crate::Mirroring;

/// Errors that can occur when loading a ROM image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The file does not start with the iNES magic "NES\x1A".
    #[error("invalid iNES header magic")]
    HeaderInvalid,

    /// Declared PRG/CHR sizes exceed the payload.
    #[error("ROM truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Mapper id outside the supported set {0, 1, 2, 3, 4, 5, 7}.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// Decoded iNES image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    /// PRG-ROM bytes (multiple of 16 KiB).
    pub prg_rom: Vec<u8>,
    /// CHR-ROM bytes; empty when the board uses CHR-RAM.
    pub chr_rom: Vec<u8>,
    /// True when CHR is 8 KiB of RAM rather than ROM.
    pub chr_is_ram: bool,
    /// iNES mapper number.
    pub mapper_id: u8,
    /// Header-declared nametable mirroring.
    pub mirroring: Mirroring,
}

impl Cartridge {
    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
    const HEADER_LEN: usize = 16;
    const TRAINER_LEN: usize = 512;

    /// Parse an iNES image from raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::HeaderInvalid`] on a bad magic and
    /// [`LoadError::Truncated`] when the payload is shorter than the header
    /// declares. Mapper support is checked later by
    /// [`create_mapper`](crate::create_mapper).
    pub fn load(data: &[u8]) -> Result<Self, LoadError> {
        if data.len() < Self::HEADER_LEN || data[0..4] != Self::MAGIC {
            return Err(LoadError::HeaderInvalid);
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;
        let flags6 = data[6];
        let flags7 = data[7];

        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);
        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = Self::HEADER_LEN;
        if flags6 & 0x04 != 0 {
            // Trainer payload precedes PRG; nothing in it matters here.
            offset += Self::TRAINER_LEN;
        }

        let prg_len = prg_banks * 16 * 1024;
        let chr_len = chr_banks * 8 * 1024;
        let expected = offset + prg_len + chr_len;
        if data.len() < expected {
            return Err(LoadError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let prg_rom = data[offset..offset + prg_len].to_vec();
        offset += prg_len;
        let chr_rom = data[offset..offset + chr_len].to_vec();

        log::debug!(
            "loaded iNES image: mapper {mapper_id}, {prg_banks}x16K PRG, {chr_banks}x8K CHR, {mirroring:?}"
        );

        Ok(Self {
            prg_rom,
            chr_rom,
            chr_is_ram: chr_banks == 0,
            mapper_id,
            mirroring,
        })
    }

    /// CHR contents for a mapper: the ROM data, or zeroed 8 KiB of RAM.
    #[must_use]
    pub fn chr_data(&self) -> Vec<u8> {
        if self.chr_is_ram {
            vec![0; 8 * 1024]
        } else {
            self.chr_rom.clone()
        }
    }
}

/// Build a minimal iNES image in memory; shared by the mapper unit tests.
#[cfg(test)]
pub(crate) fn build_ines(
    mapper_id: u8,
    prg_banks: u8,
    chr_banks: u8,
    flags6_low: u8,
    fill: impl Fn(usize) -> u8,
) -> Vec<u8> {
    let mut image = vec![0x4E, 0x45, 0x53, 0x1A];
    image.push(prg_banks);
    image.push(chr_banks);
    image.push((mapper_id << 4) | flags6_low);
    image.push(mapper_id & 0xF0);
    image.extend_from_slice(&[0; 8]);
    let payload = prg_banks as usize * 16384 + chr_banks as usize * 8192;
    image.extend((0..payload).map(fill));
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_image() {
        let image = build_ines(0, 2, 1, 0x01, |_| 0xAB);
        let cart = Cartridge::load(&image).unwrap();
        assert_eq!(cart.mapper_id, 0);
        assert_eq!(cart.prg_rom.len(), 32768);
        assert_eq!(cart.chr_rom.len(), 8192);
        assert!(!cart.chr_is_ram);
        assert_eq!(cart.mirroring, Mirroring::Vertical);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut image = build_ines(0, 1, 1, 0, |_| 0);
        image[0] = 0x4D;
        assert_eq!(Cartridge::load(&image), Err(LoadError::HeaderInvalid));
    }

    #[test]
    fn test_short_file_rejected() {
        assert_eq!(
            Cartridge::load(&[0x4E, 0x45, 0x53]),
            Err(LoadError::HeaderInvalid)
        );
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let mut image = build_ines(0, 2, 1, 0, |_| 0);
        image.truncate(16 + 1024);
        assert!(matches!(
            Cartridge::load(&image),
            Err(LoadError::Truncated { .. })
        ));
    }

    #[test]
    fn test_trainer_is_skipped() {
        let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0, 0x04, 0];
        image.extend_from_slice(&[0; 8]);
        image.extend_from_slice(&[0xFF; 512]); // Trainer
        image.extend(std::iter::repeat(0x7E).take(16384)); // PRG

        let cart = Cartridge::load(&image).unwrap();
        assert_eq!(cart.prg_rom[0], 0x7E);
        assert!(cart.chr_is_ram);
    }

    #[test]
    fn test_mapper_nibbles_combine() {
        let image = build_ines(0x42, 1, 1, 0, |_| 0);
        let cart = Cartridge::load(&image).unwrap();
        assert_eq!(cart.mapper_id, 0x42);
    }

    #[test]
    fn test_four_screen_flag() {
        let image = build_ines(0, 1, 1, 0x08, |_| 0);
        let cart = Cartridge::load(&image).unwrap();
        assert_eq!(cart.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn test_payload_round_trip() {
        let image = build_ines(0, 1, 1, 0, |i| (i & 0xFF) as u8);
        let cart = Cartridge::load(&image).unwrap();
        let mut reassembled = Vec::new();
        reassembled.extend_from_slice(&cart.prg_rom);
        reassembled.extend_from_slice(&cart.chr_rom);
        assert_eq!(reassembled, image[16..]);
    }
}
