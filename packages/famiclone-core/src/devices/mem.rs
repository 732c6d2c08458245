//! Module for memory devices, such as the console's work RAM

use super::bus::{BusDevice, BusPeekResult};

pub struct Ram {
    buf: Vec<u8>,
}

impl BusDevice for Ram {
    fn read(&mut self, addr: u16, last_bus_value: u8) -> u8 {
        self.peek(addr).unwrap(last_bus_value)
    }

    fn peek(&self, addr: u16) -> BusPeekResult {
        match self.buf.get(addr as usize) {
            Some(val) => BusPeekResult::Result(*val),
            None => BusPeekResult::Unmapped,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(cell) = self.buf.get_mut(addr as usize) {
            *cell = value;
        }
    }
}

impl Ram {
    pub fn new(size: usize) -> Ram {
        Ram {
            buf: vec![0u8; size],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_writes() {
        let mut ram = Ram::new(0x0800);
        ram.write(0x0123, 0xAB);
        assert_eq!(ram.peek(0x0123), BusPeekResult::Result(0xAB));
        assert_eq!(ram.read(0x0123, 0x00), 0xAB);
    }

    #[test]
    fn out_of_range_is_unmapped() {
        let ram = Ram::new(0x0800);
        assert_eq!(ram.peek(0x0800), BusPeekResult::Unmapped);
    }
}
