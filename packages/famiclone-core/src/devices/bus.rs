//! The CPU-side address bus and the device map hanging off of it.

use super::cartridge::Cartridge;
use super::mem::Ram;
use super::ppu::Ppu2C02;

/// Trait for an object that services CPU bus traffic.
pub trait CpuBus {
    /// Read from the bus at the given address, triggering any side-effects
    /// the addressed device has (PPU status reads clear flags, for one).
    fn read(&mut self, addr: u16) -> u8;

    /// Attempt to deterministically read from the bus.
    ///
    /// Returns `None` when such a read is impossible without side-effects
    /// (mutable-read control ports) or when nothing answers at `addr`. The
    /// disassembler only ever touches the bus through this method.
    fn peek(&self, addr: u16) -> Option<u8>;

    /// Write to the bus with the given data.
    fn write(&mut self, addr: u16, data: u8);
}

#[derive(Debug, Eq, PartialEq)]
pub enum BusPeekResult {
    Unmapped,
    MutableRead,
    Result(u8),
}

impl BusPeekResult {
    /// Unwrap to a byte, substituting the last value seen on the bus.
    pub fn unwrap(&self, last_bus_value: u8) -> u8 {
        match self {
            BusPeekResult::Result(val) => *val,
            _ => last_bus_value,
        }
    }

    pub fn to_optional(&self) -> Option<u8> {
        match self {
            BusPeekResult::Result(val) => Some(*val),
            _ => None,
        }
    }
}

/// Trait for a device that may be mounted to and driven by the bus.
pub trait BusDevice {
    /// Read from the device at a device-local address.
    fn read(&mut self, addr: u16, last_bus_value: u8) -> u8;

    /// Immutably and deterministically read from the device.
    fn peek(&self, addr: u16) -> BusPeekResult;

    /// Write to the device at a device-local address.
    fn write(&mut self, addr: u16, value: u8);
}

pub struct Range {
    start: u16,
    end: u16,
    mask: u16,
}

impl Range {
    pub const fn new(start: u16, end: u16, mask: u16) -> Range {
        Range { start, end, mask }
    }

    /// Given a bus address, return the device-local address, or None if the
    /// bus address falls outside this Range.
    pub fn map(&self, test_addr: u16) -> Option<u16> {
        if test_addr < self.start || test_addr > self.end {
            None
        } else {
            Some((test_addr - self.start) & self.mask)
        }
    }
}

pub mod cpu_memory_map {
    use super::Range;

    pub enum Device {
        Ram,
        Ppu,
        Cartridge,
        Unmapped,
    }

    /// The 2 KiB work RAM, mirrored through $1FFF
    pub const RAM: Range = Range::new(0x0000, 0x1FFF, 0x07FF);

    /// The 8 PPU control ports, mirrored through $3FFF
    pub const PPU: Range = Range::new(0x2000, 0x3FFF, 0x0007);

    /// Everything from here up belongs to the cartridge connector
    pub const CARTRIDGE_START: u16 = 0x4020;

    /// Given a bus address, return the addressed device and a local address.
    ///
    /// Cartridge space is left untranslated: the mapper speaks bus
    /// addresses, not connector-local ones.
    pub fn match_addr(addr: u16) -> (Device, u16) {
        if let Some(local) = RAM.map(addr) {
            (Device::Ram, local)
        } else if let Some(local) = PPU.map(addr) {
            (Device::Ppu, local)
        } else if addr >= CARTRIDGE_START {
            (Device::Cartridge, addr)
        } else {
            (Device::Unmapped, addr)
        }
    }
}

/// The memory side of the console: work RAM, the PPU's control ports, and
/// the cartridge connector, dispatched by address.
///
/// The CPU borrows this mutably for the duration of a tick, which is what
/// lets the CPU and its peripherals live in one owning container without a
/// reference cycle.
pub struct SystemBus {
    pub(crate) ram: Ram,
    pub(crate) ppu: Ppu2C02,
    pub(crate) cart: Cartridge,
    /// The last value driven onto the bus, read back for open-bus accesses
    last_bus_value: u8,
}

impl SystemBus {
    pub fn new(cart: Cartridge) -> SystemBus {
        SystemBus {
            ram: Ram::new(0x0800),
            ppu: Ppu2C02::new(),
            cart,
            last_bus_value: 0x00,
        }
    }
}

impl CpuBus for SystemBus {
    fn read(&mut self, addr: u16) -> u8 {
        use cpu_memory_map::Device;
        let value = match cpu_memory_map::match_addr(addr) {
            (Device::Ram, local) => self.ram.read(local, self.last_bus_value),
            (Device::Ppu, local) => self.ppu.register_read(local, &self.cart),
            (Device::Cartridge, addr) => self.cart.cpu_read(addr).unwrap_or(self.last_bus_value),
            (Device::Unmapped, _) => self.last_bus_value,
        };
        self.last_bus_value = value;
        value
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        use cpu_memory_map::Device;
        match cpu_memory_map::match_addr(addr) {
            (Device::Ram, local) => self.ram.peek(local).to_optional(),
            (Device::Ppu, local) => self.ppu.register_peek(local).to_optional(),
            (Device::Cartridge, addr) => self.cart.cpu_read(addr),
            (Device::Unmapped, _) => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        use cpu_memory_map::Device;
        match cpu_memory_map::match_addr(addr) {
            (Device::Ram, local) => self.ram.write(local, data),
            (Device::Ppu, local) => self.ppu.register_write(local, data, &mut self.cart),
            (Device::Cartridge, addr) => {
                self.cart.cpu_write(addr, data);
            }
            (Device::Unmapped, _) => {}
        }
        self.last_bus_value = data;
    }
}
