//! The CPU-visible face of the picture processor.
//!
//! Rendering is out of scope here; what the rest of the machine needs from
//! the PPU is its eight control ports (with their read side-effects), the
//! VRAM behind PPUADDR/PPUDATA, and a dot counter that raises VBlank NMIs
//! and marks frame boundaries for the clock coordinator.

use super::bus::BusPeekResult;
use super::cartridge::{Cartridge, Mirroring};

bitflags! {
    /// $PPUCTRL
    pub struct PpuCtrl: u8 {
        const NAMETABLE_SELECT = 0x03;
        /// 0 = add 1 to the VRAM address per PPUDATA access, 1 = add 32
        const VRAM_INCREMENT = 0x04;
        const SPRITE_TABLE_SELECT = 0x08;
        const BG_TABLE_SELECT = 0x10;
        const SPRITE_SIZE = 0x20;
        const MASTER_SLAVE = 0x40;
        /// Generate an NMI when VBlank begins
        const NMI_ENABLE = 0x80;
    }
}

bitflags! {
    /// $PPUMASK
    pub struct PpuMask: u8 {
        const GREYSCALE = 0x01;
        const BG_LEFT_COLUMN = 0x02;
        const SPRITE_LEFT_COLUMN = 0x04;
        const BG_ENABLE = 0x08;
        const SPRITE_ENABLE = 0x10;
        const EMPHASIZE_RED = 0x20;
        const EMPHASIZE_GREEN = 0x40;
        const EMPHASIZE_BLUE = 0x80;
    }
}

bitflags! {
    /// $PPUSTATUS; only the top three bits exist in silicon.
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0x20;
        const SPRITE_ZERO_HIT = 0x40;
        const VBLANK = 0x80;
    }
}

const PORT_PPUCTRL: u16 = 0;
const PORT_PPUMASK: u16 = 1;
const PORT_PPUSTATUS: u16 = 2;
const PORT_OAMADDR: u16 = 3;
const PORT_OAMDATA: u16 = 4;
const PORT_PPUSCROLL: u16 = 5;
const PORT_PPUADDR: u16 = 6;
const PORT_PPUDATA: u16 = 7;

const DOTS_PER_SCANLINE: u16 = 341;
const VBLANK_SCANLINE: i16 = 241;
const LAST_SCANLINE: i16 = 260;

pub struct Ppu2C02 {
    ctrl: PpuCtrl,
    mask: PpuMask,
    status: PpuStatus,
    /// PPUADDR/PPUSCROLL share a two-write latch
    addr_latch: bool,
    vram_addr: u16,
    /// VRAM reads land one access late, through this buffer
    data_buffer: u8,
    nametable: [u8; 0x0800],
    palette: [u8; 32],
    dot: u16,
    scanline: i16,
    /// Frame parity; odd frames run one dot short while rendering
    odd_frame: bool,
    nmi_ready: bool,
    frame_ready: bool,
}

impl Ppu2C02 {
    pub fn new() -> Ppu2C02 {
        Ppu2C02 {
            ctrl: PpuCtrl::empty(),
            mask: PpuMask::empty(),
            status: PpuStatus::empty(),
            addr_latch: false,
            vram_addr: 0,
            data_buffer: 0,
            nametable: [0u8; 0x0800],
            palette: [0u8; 32],
            dot: 0,
            scanline: -1,
            odd_frame: false,
            nmi_ready: false,
            frame_ready: false,
        }
    }

    /// Advance one PPU dot.
    pub fn tick(&mut self) {
        self.dot += 1;
        // odd frames drop the final idle dot of the pre-render line, but
        // only while rendering is switched on
        if self.scanline == -1
            && self.dot == DOTS_PER_SCANLINE - 1
            && self.odd_frame
            && self.rendering_enabled()
        {
            self.dot += 1;
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = -1;
                self.odd_frame = !self.odd_frame;
                self.frame_ready = true;
            }
        }
        if self.scanline == VBLANK_SCANLINE && self.dot == 1 {
            self.status.insert(PpuStatus::VBLANK);
            if self.ctrl.contains(PpuCtrl::NMI_ENABLE) {
                self.nmi_ready = true;
            }
        }
        if self.scanline == -1 && self.dot == 1 {
            self.status.remove(
                PpuStatus::VBLANK | PpuStatus::SPRITE_ZERO_HIT | PpuStatus::SPRITE_OVERFLOW,
            );
        }
    }

    /// Whether a VBlank NMI is waiting to be plumbed to the CPU.
    pub fn nmi_ready(&self) -> bool {
        self.nmi_ready
    }

    pub fn ack_nmi(&mut self) {
        self.nmi_ready = false;
    }

    /// Whether the dot counter has wrapped a whole frame.
    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn ack_frame(&mut self) {
        self.frame_ready = false;
    }

    fn rendering_enabled(&self) -> bool {
        self.mask
            .intersects(PpuMask::BG_ENABLE | PpuMask::SPRITE_ENABLE)
    }

    /// Read one of the eight control ports, side-effects included.
    pub fn register_read(&mut self, port: u16, cart: &Cartridge) -> u8 {
        match port {
            PORT_PPUSTATUS => {
                // the low five bits echo stale bus contents
                let value = self.status.bits() | (self.data_buffer & 0x1F);
                self.status.remove(PpuStatus::VBLANK);
                self.addr_latch = false;
                value
            }
            PORT_OAMDATA => 0,
            PORT_PPUDATA => {
                let mut value = self.data_buffer;
                self.data_buffer = self.vram_read(self.vram_addr, cart);
                // palette reads skip the buffer delay
                if self.vram_addr >= 0x3F00 {
                    value = self.data_buffer;
                }
                self.advance_vram_addr();
                value
            }
            _ => 0,
        }
    }

    /// Deterministic port read for debugger use: no flag clears, no
    /// buffer churn.
    pub fn register_peek(&self, port: u16) -> BusPeekResult {
        match port {
            PORT_PPUSTATUS => {
                BusPeekResult::Result(self.status.bits() | (self.data_buffer & 0x1F))
            }
            // reading these ports churns internal state, so no
            // deterministic value can be offered
            PORT_OAMDATA | PORT_PPUDATA => BusPeekResult::MutableRead,
            _ => BusPeekResult::Unmapped,
        }
    }

    /// Write one of the eight control ports.
    pub fn register_write(&mut self, port: u16, data: u8, cart: &mut Cartridge) {
        match port {
            PORT_PPUCTRL => self.ctrl = PpuCtrl::from_bits_truncate(data),
            PORT_PPUMASK => self.mask = PpuMask::from_bits_truncate(data),
            PORT_PPUSTATUS => {} // read-only
            // OAM is not modeled; its ports accept and drop traffic
            PORT_OAMADDR | PORT_OAMDATA => {}
            PORT_PPUSCROLL => {
                // scroll positions don't matter without rendering, but the
                // shared write latch still has to toggle
                self.addr_latch = !self.addr_latch;
            }
            PORT_PPUADDR => {
                if self.addr_latch {
                    self.vram_addr = (self.vram_addr & 0xFF00) | u16::from(data);
                } else {
                    self.vram_addr = (u16::from(data) << 8) | (self.vram_addr & 0x00FF);
                }
                self.addr_latch = !self.addr_latch;
            }
            PORT_PPUDATA => {
                self.vram_write(self.vram_addr, data, cart);
                self.advance_vram_addr();
            }
            _ => {}
        }
    }

    fn advance_vram_addr(&mut self) {
        let step = if self.ctrl.contains(PpuCtrl::VRAM_INCREMENT) {
            32
        } else {
            1
        };
        self.vram_addr = self.vram_addr.wrapping_add(step) & 0x3FFF;
    }

    fn vram_read(&self, addr: u16, cart: &Cartridge) -> u8 {
        let addr = addr & 0x3FFF;
        if let Some(value) = cart.ppu_read(addr) {
            value
        } else if addr < 0x3F00 {
            self.nametable[nametable_index(addr, cart.mirroring())]
        } else {
            self.palette[palette_index(addr)]
        }
    }

    fn vram_write(&mut self, addr: u16, data: u8, cart: &mut Cartridge) {
        let addr = addr & 0x3FFF;
        if cart.ppu_write(addr, data) {
            return;
        }
        if addr < 0x2000 {
            // pattern ROM refused the write
        } else if addr < 0x3F00 {
            self.nametable[nametable_index(addr, cart.mirroring())] = data;
        } else {
            self.palette[palette_index(addr)] = data;
        }
    }
}

impl Default for Ppu2C02 {
    fn default() -> Self {
        Ppu2C02::new()
    }
}

/// Fold a $2000-$3EFF nametable address into the 2 KiB of physical VRAM.
fn nametable_index(addr: u16, mirroring: Mirroring) -> usize {
    let nt_addr = (addr - 0x2000) & 0x0FFF;
    let index = match mirroring {
        // horizontal mirroring rewires address pin 11 onto CIRAM A10
        Mirroring::Horizontal => (nt_addr & 0x3FF) | ((nt_addr & 0x800) >> 1),
        Mirroring::Vertical => nt_addr & 0x7FF,
    };
    index as usize
}

/// Fold a $3F00-$3FFF palette address into the 32-byte palette RAM,
/// aliasing the sprite backdrop entries onto the background ones.
fn palette_index(addr: u16) -> usize {
    let index = (addr & 0x001F) as usize;
    match index {
        0x10 | 0x14 | 0x18 | 0x1C => index - 0x10,
        _ => index,
    }
}
