//! Emulator for the MOS 6502 derivative at the heart of the console.
//!
//! Binary Coded Decimal is not supported; the console's CPU variant had the
//! decimal mode disabled in hardware, so the D flag is storage only.

mod disasm;
mod registers;
mod table;

pub use disasm::disassemble;
pub use registers::Status;
pub use table::{AddrMode, CpuFn, Opcode, OPCODE_TABLE};

use crate::bytes_to_addr;
use crate::devices::bus::CpuBus;

/// The stack lives on page 1, addressed as `0x0100 + stkp`.
const STACK_BASE: u16 = 0x0100;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;
const NMI_VECTOR: u16 = 0xFFFA;
/// Hardcoded cycle charges for the interrupt entry sequences.
const RESET_CYCLES: u8 = 8;
const IRQ_CYCLES: u8 = 7;
const NMI_CYCLES: u8 = 8;

pub struct Cpu6502 {
    /// The accumulator
    pub a: u8,
    /// X index register
    pub x: u8,
    /// Y index register
    pub y: u8,
    /// Stack pointer; the stack grows downward from $01FF and wraps
    pub stkp: u8,
    /// Program counter
    pub pc: u16,
    /// Status register
    pub status: Status,
    /// Operand latch for the instruction in flight
    pub fetched: u8,
    /// Effective-address latch
    pub addr_abs: u16,
    /// Sign-extended branch offset latch
    pub addr_rel: u16,
    /// Opcode of the instruction in flight
    pub opcode: u8,
    /// Host ticks still owed to the instruction in flight. When this is 0
    /// the CPU sits on an instruction boundary.
    pub cycles: u8,
}

impl Cpu6502 {
    pub fn new() -> Cpu6502 {
        Cpu6502 {
            a: 0,
            x: 0,
            y: 0,
            stkp: 0xFD,
            pc: 0x0000,
            status: Status::UNUSED | Status::IRQ_DISABLE,
            fetched: 0x00,
            addr_abs: 0x0000,
            addr_rel: 0x0000,
            opcode: 0x00,
            cycles: 0,
        }
    }

    /// Advance the CPU by one clock tick.
    ///
    /// On an instruction boundary this fetches, decodes, and executes the
    /// next instruction in full, charging its whole cycle count up front;
    /// the remaining ticks of that instruction only burn the counter down.
    pub fn tick(&mut self, bus: &mut dyn CpuBus) {
        if self.cycles == 0 {
            self.opcode = bus.read(self.pc);
            self.pc = self.pc.wrapping_add(1);
            self.status.insert(Status::UNUSED);

            let op = &OPCODE_TABLE[self.opcode as usize];
            self.cycles = op.cycles;
            let page_crossed = (op.addrmode)(self, bus);
            let wants_extra = (op.operate)(self, bus);
            // the penalty only lands when the mode crossed a page AND the
            // operation actually went back to memory for its operand
            if page_crossed && wants_extra {
                self.cycles += 1;
            }
        }
        self.cycles -= 1;
    }

    /// True when the CPU sits on an instruction boundary.
    pub fn complete(&self) -> bool {
        self.cycles == 0
    }

    /// Hardware reset: registers to their warm-start state, `pc` through
    /// the reset vector. RAM is deliberately left alone, as on the metal.
    pub fn reset(&mut self, bus: &mut dyn CpuBus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.stkp = 0xFD;
        self.status = Status::UNUSED | Status::IRQ_DISABLE;

        let lo = bus.read(RESET_VECTOR);
        let hi = bus.read(RESET_VECTOR.wrapping_add(1));
        self.pc = bytes_to_addr!(lo, hi);

        self.addr_abs = 0x0000;
        self.addr_rel = 0x0000;
        self.fetched = 0x00;

        self.cycles = RESET_CYCLES;
        log::trace!("reset: pc loaded as {:04X}", self.pc);
    }

    /// Maskable interrupt request. Ignored while the I flag is set.
    pub fn irq(&mut self, bus: &mut dyn CpuBus) {
        if self.status.contains(Status::IRQ_DISABLE) {
            return;
        }
        log::trace!("irq taken at pc {:04X}", self.pc);
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles = IRQ_CYCLES;
    }

    /// Non-maskable interrupt request.
    pub fn nmi(&mut self, bus: &mut dyn CpuBus) {
        log::trace!("nmi taken at pc {:04X}", self.pc);
        self.interrupt(bus, NMI_VECTOR);
        self.cycles = NMI_CYCLES;
    }

    fn interrupt(&mut self, bus: &mut dyn CpuBus, vector: u16) {
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, (self.pc & 0x00FF) as u8);

        self.status.remove(Status::BREAK);
        self.status.insert(Status::UNUSED | Status::IRQ_DISABLE);
        self.push(bus, self.status.bits());

        let lo = bus.read(vector);
        let hi = bus.read(vector.wrapping_add(1));
        self.pc = bytes_to_addr!(lo, hi);
    }

    /// Push a byte onto the page-1 stack.
    pub fn push(&mut self, bus: &mut dyn CpuBus, data: u8) {
        bus.write(STACK_BASE + u16::from(self.stkp), data);
        self.stkp = self.stkp.wrapping_sub(1);
    }

    /// Pop a byte off the page-1 stack.
    pub fn pop(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.stkp = self.stkp.wrapping_add(1);
        bus.read(STACK_BASE + u16::from(self.stkp))
    }

    /// Load the operand for the instruction in flight into `fetched`.
    ///
    /// Implied-mode instructions already latched the accumulator there, so
    /// only the other modes go back out to the bus.
    pub(crate) fn fetch(&mut self, bus: &mut dyn CpuBus) -> u8 {
        if OPCODE_TABLE[self.opcode as usize].mode != AddrMode::IMP {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    pub(crate) fn set_zn(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Cpu6502 {
    fn default() -> Self {
        Cpu6502::new()
    }
}
