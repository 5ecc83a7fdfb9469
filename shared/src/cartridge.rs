//! Game Boy cartridge header format.
//!
//! Only the header is understood here: enough to identify a ROM and check
//! that it is plausibly a cartridge image before handing it to a runtime.

use std::ops::Range;

use thiserror::Error;

/// Size of the DMG boot ROM in bytes.
pub const BOOT_ROM_SIZE: usize = 0x100;

/// Size of one 32 KiB ROM bank pair; the smallest cartridge.
pub const BANK_SIZE: usize = 0x8000;

/// End of the cartridge header (exclusive). A ROM shorter than this has no header.
pub const HEADER_END: usize = 0x150;

const TITLE: Range<usize> = 0x134..0x144;
const CARTRIDGE_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const HEADER_CHECKSUM: usize = 0x14D;
const CHECKSUM_RANGE: Range<usize> = 0x134..0x14D;

/// Largest ROM size code defined by the header format (8 MiB).
const MAX_ROM_SIZE_CODE: u8 = 8;

/// Cartridge parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    /// ROM is too short to contain a header
    #[error("ROM too small: {0} bytes (header ends at 0x150)")]
    TooSmall(usize),

    /// ROM size code outside 0x00-0x08
    #[error("unknown ROM size code 0x{0:02X}")]
    UnknownRomSize(u8),

    /// Boot ROM is not exactly 256 bytes
    #[error("invalid boot ROM size: {0} bytes (expected 256)")]
    InvalidBootRom(usize),
}

/// Fields decoded from the cartridge header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    /// Game title, trimmed of padding
    pub title: String,
    /// Raw cartridge type byte (mapper and extras)
    pub cartridge_type: u8,
    /// Declared ROM size in bytes
    pub rom_size: usize,
    /// Checksum byte stored in the header
    pub header_checksum: u8,
    /// Whether the stored checksum matches the computed one
    pub checksum_valid: bool,
}

impl CartridgeHeader {
    /// Parse the header of a game ROM.
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < HEADER_END {
            return Err(CartridgeError::TooSmall(rom.len()));
        }

        let size_code = rom[ROM_SIZE];
        if size_code > MAX_ROM_SIZE_CODE {
            return Err(CartridgeError::UnknownRomSize(size_code));
        }

        let header_checksum = rom[HEADER_CHECKSUM];

        Ok(Self {
            title: parse_title(&rom[TITLE]),
            cartridge_type: rom[CARTRIDGE_TYPE],
            rom_size: BANK_SIZE << size_code,
            header_checksum,
            checksum_valid: compute_header_checksum(rom) == Some(header_checksum),
        })
    }

    /// Human-readable mapper name for the cartridge type byte, if known.
    pub fn cartridge_type_name(&self) -> Option<&'static str> {
        cartridge_type_name(self.cartridge_type)
    }
}

/// Compute the header checksum over 0x134..=0x14C.
///
/// Returns `None` if `rom` ends before the checksummed range does.
pub fn compute_header_checksum(rom: &[u8]) -> Option<u8> {
    rom.get(CHECKSUM_RANGE).map(|bytes| {
        bytes
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
    })
}

/// Check that a boot ROM image has the expected size.
pub fn validate_boot_rom(bytes: &[u8]) -> Result<(), CartridgeError> {
    if bytes.len() != BOOT_ROM_SIZE {
        return Err(CartridgeError::InvalidBootRom(bytes.len()));
    }
    Ok(())
}

/// Mapper name for a cartridge type byte.
pub fn cartridge_type_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "ROM ONLY",
        0x01 => "MBC1",
        0x02 => "MBC1+RAM",
        0x03 => "MBC1+RAM+BATTERY",
        0x05 => "MBC2",
        0x06 => "MBC2+BATTERY",
        0x08 => "ROM+RAM",
        0x09 => "ROM+RAM+BATTERY",
        0x0F => "MBC3+TIMER+BATTERY",
        0x10 => "MBC3+TIMER+RAM+BATTERY",
        0x11 => "MBC3",
        0x12 => "MBC3+RAM",
        0x13 => "MBC3+RAM+BATTERY",
        0x19 => "MBC5",
        0x1A => "MBC5+RAM",
        0x1B => "MBC5+RAM+BATTERY",
        0x1C => "MBC5+RUMBLE",
        0x1D => "MBC5+RUMBLE+RAM",
        0x1E => "MBC5+RUMBLE+RAM+BATTERY",
        _ => return None,
    };
    Some(name)
}

// Title stops at the first NUL; CGB-era carts reuse the tail bytes as flags.
fn parse_title(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| (0x20..0x7F).contains(&b))
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end()
        .to_string()
}
