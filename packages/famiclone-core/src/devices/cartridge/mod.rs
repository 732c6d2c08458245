//! The cartridge: PRG/CHR storage behind a mapper.

mod ines;
mod mapper;

pub use ines::{CartridgeError, INesFlags6, INesFlags7, INesHeader};
pub use mapper::{Mapper, Nrom};

use std::fs;
use std::path::Path;

/// How the cartridge wires its nametable address lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

pub struct Cartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    mirroring: Mirroring,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Build a cartridge from an in-memory iNES image.
    pub fn from_bytes(buf: &[u8]) -> Result<Cartridge, CartridgeError> {
        let header = ines::parse_header(buf)?;

        let mapper_id = header.mapper_id();
        // CHR chunk count 0 means the board carries 8k of CHR RAM instead
        let chr_writable = header.chr_chunks == 0;
        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => Box::new(Nrom::new(header.prg_chunks, chr_writable)),
            id => return Err(CartridgeError::UnsupportedMapper(id)),
        };

        let mut offset = ines::HEADER_LEN;
        if header.has_trainer() {
            offset += ines::TRAINER_LEN;
        }
        let prg_len = header.prg_chunks * ines::PRG_CHUNK_LEN;
        let chr_len = header.chr_chunks * ines::CHR_CHUNK_LEN;
        let expected = offset + prg_len + chr_len;
        if buf.len() < expected {
            return Err(CartridgeError::TruncatedData {
                expected,
                found: buf.len(),
            });
        }

        let prg = buf[offset..offset + prg_len].to_vec();
        let chr = if chr_writable {
            vec![0u8; ines::CHR_CHUNK_LEN]
        } else {
            buf[offset + prg_len..offset + prg_len + chr_len].to_vec()
        };

        let mirroring = if header.flags_6.contains(INesFlags6::VERTICAL_MIRRORING) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        log::debug!(
            "cartridge: mapper {}, {} x 16k PRG, {} x 8k CHR{}, {:?} mirroring",
            mapper_id,
            header.prg_chunks,
            header.chr_chunks,
            if chr_writable { " (RAM)" } else { "" },
            mirroring
        );

        Ok(Cartridge {
            prg,
            chr,
            mirroring,
            mapper,
        })
    }

    /// Load a cartridge from an iNES ROM file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Cartridge, CartridgeError> {
        let buf = fs::read(path)?;
        Cartridge::from_bytes(&buf)
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Service a CPU-bus read; `None` if the mapper doesn't claim `addr`.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        self.mapper
            .cpu_map_read(addr)
            .map(|mapped| self.prg[mapped as usize])
    }

    /// Service a CPU-bus write. Returns whether the write landed.
    pub fn cpu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.cpu_map_write(addr) {
            Some(mapped) => {
                self.prg[mapped as usize] = data;
                true
            }
            None => {
                if addr >= 0x8000 {
                    log::warn!("write of {:02X} to read-only PRG at {:04X}", data, addr);
                }
                false
            }
        }
    }

    /// Service a PPU-bus read; `None` if the mapper doesn't claim `addr`.
    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        self.mapper
            .ppu_map_read(addr)
            .map(|mapped| self.chr[mapped as usize])
    }

    /// Service a PPU-bus write. Returns whether the write landed.
    pub fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.ppu_map_write(addr) {
            Some(mapped) => {
                self.chr[mapped as usize] = data;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_image(prg_chunks: u8, chr_chunks: u8, flags_6: u8) -> Vec<u8> {
        let mut image = vec![0u8; 16];
        image[..4].copy_from_slice(b"NES\x1A");
        image[4] = prg_chunks;
        image[5] = chr_chunks;
        image[6] = flags_6;
        image.extend(vec![0u8; prg_chunks as usize * 0x4000]);
        image.extend(vec![0u8; chr_chunks as usize * 0x2000]);
        image
    }

    #[test]
    fn loads_a_plain_nrom_image() {
        let mut image = build_image(1, 1, 0x00);
        image[16] = 0xA9; // first PRG byte
        let cart = Cartridge::from_bytes(&image).expect("image should load");
        assert_eq!(cart.cpu_read(0x8000), Some(0xA9));
        // single 16k bank mirrors into the upper half
        assert_eq!(cart.cpu_read(0xC000), Some(0xA9));
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn skips_a_trainer_blob() {
        let mut image = vec![0u8; 16];
        image[..4].copy_from_slice(b"NES\x1A");
        image[4] = 1;
        image[5] = 1;
        image[6] = 0x04; // trainer present
        image.extend(vec![0xEE; 512]);
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0x42;
        image.extend(prg);
        image.extend(vec![0u8; 0x2000]);
        let cart = Cartridge::from_bytes(&image).expect("image should load");
        assert_eq!(cart.cpu_read(0x8000), Some(0x42));
    }

    #[test]
    fn rejects_unknown_mappers() {
        let image = build_image(1, 1, 0x10); // mapper 1
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn rejects_truncated_data() {
        let mut image = build_image(2, 1, 0x00);
        image.truncate(16 + 0x4000); // half the promised PRG
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::TruncatedData { .. })
        ));
    }

    #[test]
    fn refuses_prg_writes_on_nrom() {
        let image = build_image(1, 1, 0x00);
        let mut cart = Cartridge::from_bytes(&image).expect("image should load");
        assert!(!cart.cpu_write(0x8000, 0xFF));
        assert_eq!(cart.cpu_read(0x8000), Some(0x00));
    }

    #[test]
    fn chr_ram_accepts_writes() {
        let image = build_image(1, 0, 0x00);
        let mut cart = Cartridge::from_bytes(&image).expect("image should load");
        assert!(cart.ppu_write(0x0123, 0x55));
        assert_eq!(cart.ppu_read(0x0123), Some(0x55));
    }
}
