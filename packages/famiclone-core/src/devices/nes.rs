//! The console as a whole unit: CPU plus bus, plus the master clock that
//! keeps them in ratio.

use std::collections::BTreeMap;
use std::path::Path;

use super::bus::{CpuBus, SystemBus};
use super::cartridge::{Cartridge, CartridgeError};
use super::cpu::{self, Cpu6502};

/// Guard for the frame-stepping loop; a frame takes ~89k ticks, so blowing
/// far past that means the counter logic is broken.
const MAX_TICKS_PER_FRAME: u32 = 1_000_000;

pub struct Nes {
    cpu: Cpu6502,
    bus: SystemBus,
    /// Master tick counter; the CPU runs on every third tick
    clock_counter: u64,
}

impl Nes {
    pub fn new(cart: Cartridge) -> Nes {
        let mut nes = Nes {
            cpu: Cpu6502::new(),
            bus: SystemBus::new(cart),
            clock_counter: 0,
        };
        nes.cpu.reset(&mut nes.bus);
        nes
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Nes, CartridgeError> {
        Ok(Nes::new(Cartridge::from_file(path)?))
    }

    pub fn cpu(&self) -> &Cpu6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu6502 {
        &mut self.cpu
    }

    /// Advance the whole machine one master tick: one PPU dot, and a CPU
    /// tick on every third call. A VBlank NMI raised by the PPU is held
    /// until the CPU reaches an instruction boundary.
    pub fn tick(&mut self) {
        self.clock_counter += 1;
        self.bus.ppu.tick();
        if self.clock_counter % 3 == 0 {
            self.cpu.tick(&mut self.bus);
        }
        if self.bus.ppu.nmi_ready() && self.cpu.complete() {
            self.bus.ppu.ack_nmi();
            self.cpu.nmi(&mut self.bus);
        }
    }

    /// Run the machine forward until the CPU lands on an instruction
    /// boundary, having executed at least one CPU tick. Mid-instruction
    /// this drains the remainder; at a boundary it runs one instruction.
    pub fn step_instruction(&mut self) {
        loop {
            self.tick();
            if self.cpu.complete() && self.clock_counter % 3 == 0 {
                break;
            }
        }
    }

    /// Run the machine to the end of the current video frame, then on to
    /// the next instruction boundary so the debugger sees settled state.
    pub fn step_frame(&mut self) {
        let mut guard = 0u32;
        while !self.bus.ppu.frame_ready() {
            self.tick();
            guard += 1;
            if guard > MAX_TICKS_PER_FRAME {
                panic!("PPU never signalled a finished frame");
            }
        }
        self.bus.ppu.ack_frame();
        while !self.cpu.complete() {
            self.tick();
        }
    }

    /// Hardware reset, delivered on an instruction boundary.
    pub fn reset(&mut self) {
        self.drain_instruction();
        self.cpu.reset(&mut self.bus);
    }

    /// Maskable interrupt, delivered on an instruction boundary.
    pub fn irq(&mut self) {
        self.drain_instruction();
        self.cpu.irq(&mut self.bus);
    }

    /// Non-maskable interrupt, delivered on an instruction boundary.
    pub fn nmi(&mut self) {
        self.drain_instruction();
        self.cpu.nmi(&mut self.bus);
    }

    /// Disassemble a window of the address space without touching state.
    pub fn disassemble(&self, start: i32, end: i32) -> BTreeMap<i32, String> {
        cpu::disassemble(&self.cpu, &self.bus, start, end)
    }

    fn drain_instruction(&mut self) {
        while !self.cpu.complete() {
            self.tick();
        }
    }
}

/// The container doubles as the CPU's bus for outside callers (tests and
/// the debugger), so memory can be seeded and inspected through the same
/// interface the CPU uses.
impl CpuBus for Nes {
    fn read(&mut self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        self.bus.peek(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.bus.write(addr, data)
    }
}
