//! Address translation between the console's buses and cartridge storage.

/// A mapper rewrites CPU/PPU bus addresses into offsets local to the
/// cartridge's ROM (or RAM) arrays.
///
/// `Some(offset)` is a successful translation; `None` means the address is
/// not the mapper's to answer, or (on the write paths) that the write is
/// refused because the target is read-only.
pub trait Mapper {
    fn cpu_map_read(&self, addr: u16) -> Option<u32>;
    fn cpu_map_write(&self, addr: u16) -> Option<u32>;
    fn ppu_map_read(&self, addr: u16) -> Option<u32>;
    fn ppu_map_write(&self, addr: u16) -> Option<u32>;
}

/// Mapper 0: no banking hardware at all.
///
/// PRG occupies $8000-$FFFF, mirrored when the cartridge only carries a
/// single 16k bank. CHR is an 8k window at the bottom of the PPU space,
/// writable only when the cartridge shipped CHR RAM instead of ROM.
pub struct Nrom {
    prg_mask: u16,
    chr_writable: bool,
}

impl Nrom {
    pub fn new(prg_chunks: usize, chr_writable: bool) -> Nrom {
        Nrom {
            prg_mask: if prg_chunks > 1 { 0x7FFF } else { 0x3FFF },
            chr_writable,
        }
    }
}

impl Mapper for Nrom {
    fn cpu_map_read(&self, addr: u16) -> Option<u32> {
        if addr >= 0x8000 {
            Some(u32::from(addr & self.prg_mask))
        } else {
            None
        }
    }

    fn cpu_map_write(&self, _addr: u16) -> Option<u32> {
        // PRG is ROM on this board
        None
    }

    fn ppu_map_read(&self, addr: u16) -> Option<u32> {
        if addr <= 0x1FFF {
            Some(u32::from(addr))
        } else {
            None
        }
    }

    fn ppu_map_write(&self, addr: u16) -> Option<u32> {
        if self.chr_writable && addr <= 0x1FFF {
            Some(u32::from(addr))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_a_single_prg_bank() {
        let mapper = Nrom::new(1, false);
        assert_eq!(mapper.cpu_map_read(0x8000), Some(0x0000));
        assert_eq!(mapper.cpu_map_read(0xC000), Some(0x0000));
        assert_eq!(mapper.cpu_map_read(0xFFFC), Some(0x3FFC));
    }

    #[test]
    fn maps_two_prg_banks_flat() {
        let mapper = Nrom::new(2, false);
        assert_eq!(mapper.cpu_map_read(0x8000), Some(0x0000));
        assert_eq!(mapper.cpu_map_read(0xC000), Some(0x4000));
        assert_eq!(mapper.cpu_map_read(0xFFFC), Some(0x7FFC));
    }

    #[test]
    fn ignores_addresses_below_prg_space() {
        let mapper = Nrom::new(1, false);
        assert_eq!(mapper.cpu_map_read(0x7FFF), None);
    }

    #[test]
    fn refuses_rom_writes() {
        let mapper = Nrom::new(1, false);
        assert_eq!(mapper.cpu_map_write(0x8000), None);
        assert_eq!(mapper.ppu_map_write(0x0000), None);
    }

    #[test]
    fn allows_chr_ram_writes() {
        let mapper = Nrom::new(1, true);
        assert_eq!(mapper.ppu_map_write(0x1234), Some(0x1234));
        assert_eq!(mapper.ppu_map_write(0x2000), None);
    }
}
