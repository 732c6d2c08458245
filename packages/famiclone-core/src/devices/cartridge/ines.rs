//! Helpers for parsing iNES ROM images

use thiserror::Error;

pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;
pub const PRG_CHUNK_LEN: usize = 0x4000;
pub const CHR_CHUNK_LEN: usize = 0x2000;

/// The identification string opening every iNES image.
pub const MAGIC: [u8; 4] = *b"NES\x1A";

/// A fatal cartridge-load failure. These only ever surface during setup,
/// before the first tick runs.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read ROM image: {0}")]
    Io(#[from] std::io::Error),
    #[error("ROM image is {0} bytes, shorter than the 16-byte iNES header")]
    TruncatedHeader(usize),
    #[error("bad identification string {0:02X?}, expected \"NES\\x1A\"")]
    BadMagic([u8; 4]),
    #[error("ROM image truncated: header promises {expected} bytes of data, found {found}")]
    TruncatedData { expected: usize, found: usize },
    #[error("mapper {0} is not supported")]
    UnsupportedMapper(u8),
}

bitflags! {
    /// Byte 6 of the header: mirroring, battery, trainer, and the low
    /// nybble of the mapper number.
    pub struct INesFlags6: u8 {
        /// 0 = horizontal (vertical arrangement), 1 = vertical mirroring
        const VERTICAL_MIRRORING = 0x01;
        /// Battery-backed PRG RAM is present
        const HAS_PERSISTENT_MEMORY = 0x02;
        /// A 512-byte trainer sits between the header and PRG data
        const HAS_TRAINER = 0x04;
        /// Use four-screen VRAM instead of mirroring
        const USE_FOUR_SCREEN_VRAM = 0x08;
        /// The lower nybble of the mapper number
        const LOWER_MAPPER_NYBBLE = 0xF0;
    }
}

bitflags! {
    /// Byte 7 of the header: console variant, format indicator, and the
    /// high nybble of the mapper number.
    pub struct INesFlags7: u8 {
        const VS_UNISYSTEM_ROM = 0x01;
        const PLAYCHOICE_10 = 0x02;
        /// If this field equals 2, the remaining header is iNES 2.0
        const IS_INES_2_0 = 0x0C;
        /// The upper nybble of the mapper number
        const UPPER_MAPPER_NYBBLE = 0xF0;
    }
}

/// The decoded 16-byte header. The five reserved tail bytes are dropped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct INesHeader {
    /// The size of the PRG chunk, in 16k units. Will not be 0.
    pub prg_chunks: usize,
    /// The size of the CHR chunk, in 8k units.
    pub chr_chunks: usize,
    pub flags_6: INesFlags6,
    pub flags_7: INesFlags7,
}

impl INesHeader {
    /// The mapper number, assembled from its two nybbles.
    pub fn mapper_id(&self) -> u8 {
        let lower = (self.flags_6 & INesFlags6::LOWER_MAPPER_NYBBLE).bits() >> 4;
        let upper = (self.flags_7 & INesFlags7::UPPER_MAPPER_NYBBLE).bits();
        upper | lower
    }

    pub fn has_trainer(&self) -> bool {
        self.flags_6.contains(INesFlags6::HAS_TRAINER)
    }
}

/// Parse the leading 16 bytes of an iNES image.
pub fn parse_header(bytes: &[u8]) -> Result<INesHeader, CartridgeError> {
    if bytes.len() < HEADER_LEN {
        return Err(CartridgeError::TruncatedHeader(bytes.len()));
    }
    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if magic != MAGIC {
        return Err(CartridgeError::BadMagic(magic));
    }
    Ok(INesHeader {
        prg_chunks: if bytes[4] == 0 { 1 } else { bytes[4] as usize },
        chr_chunks: bytes[5] as usize,
        flags_6: INesFlags6::from_bits_truncate(bytes[6]),
        flags_7: INesFlags7::from_bits_truncate(bytes[7]),
    })
}
