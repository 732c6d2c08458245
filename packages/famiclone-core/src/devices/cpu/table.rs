//! The dispatch table: one descriptor per opcode byte, pairing an
//! addressing-mode routine with an operation routine and a base cycle count.
//!
//! Undocumented opcodes are present too: the ones that behave as no-ops
//! dispatch to `nop`, the rest land on the `xxx` trap. Their cycle counts
//! match the silicon so a program leaning on them keeps time.

use std::fmt;

use super::{Cpu6502, Status, IRQ_VECTOR};
use crate::bytes_to_addr;
use crate::devices::bus::CpuBus;

/// Both halves of an instruction have this shape. The returned flag means
/// "may need an extra cycle": a page crossing for addressing modes,
/// extra-cycle eligibility for operations. The penalty is only charged when
/// both sides report it.
pub type CpuFn = fn(&mut Cpu6502, &mut dyn CpuBus) -> bool;

/// Addressing-mode tag, used where the mode has to be inspected after the
/// fact: operand fetching, shift write-back, and the disassembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    IMP,
    IMM,
    ZP0,
    ZPX,
    ZPY,
    REL,
    ABS,
    ABX,
    ABY,
    IND,
    IZX,
    IZY,
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An immutable instruction descriptor.
pub struct Opcode {
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    pub addrmode: CpuFn,
    pub operate: CpuFn,
    pub cycles: u8,
}

macro_rules! op {
    ($mnemonic: literal, $operate: ident, $addrmode: ident, $mode: ident, $cycles: literal) => {
        Opcode {
            mnemonic: $mnemonic,
            mode: AddrMode::$mode,
            addrmode: Cpu6502::$addrmode,
            operate: Cpu6502::$operate,
            cycles: $cycles,
        }
    };
}

#[rustfmt::skip]
pub static OPCODE_TABLE: [Opcode; 256] = [
    // 0x00
    op!("BRK", brk, imm, IMM, 7), op!("ORA", ora, izx, IZX, 6), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 3), op!("ORA", ora, zp0, ZP0, 3), op!("ASL", asl, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("PHP", php, imp, IMP, 3), op!("ORA", ora, imm, IMM, 2), op!("ASL", asl, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("???", nop, imp, IMP, 4), op!("ORA", ora, abs, ABS, 4), op!("ASL", asl, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0x10
    op!("BPL", bpl, rel, REL, 2), op!("ORA", ora, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("ORA", ora, zpx, ZPX, 4), op!("ASL", asl, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("CLC", clc, imp, IMP, 2), op!("ORA", ora, aby, ABY, 4), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("ORA", ora, abx, ABX, 4), op!("ASL", asl, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
    // 0x20
    op!("JSR", jsr, abs, ABS, 6), op!("AND", and, izx, IZX, 6), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("BIT", bit, zp0, ZP0, 3), op!("AND", and, zp0, ZP0, 3), op!("ROL", rol, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("PLP", plp, imp, IMP, 4), op!("AND", and, imm, IMM, 2), op!("ROL", rol, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("BIT", bit, abs, ABS, 4), op!("AND", and, abs, ABS, 4), op!("ROL", rol, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0x30
    op!("BMI", bmi, rel, REL, 2), op!("AND", and, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("AND", and, zpx, ZPX, 4), op!("ROL", rol, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("SEC", sec, imp, IMP, 2), op!("AND", and, aby, ABY, 4), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("AND", and, abx, ABX, 4), op!("ROL", rol, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
    // 0x40
    op!("RTI", rti, imp, IMP, 6), op!("EOR", eor, izx, IZX, 6), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 3), op!("EOR", eor, zp0, ZP0, 3), op!("LSR", lsr, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("PHA", pha, imp, IMP, 3), op!("EOR", eor, imm, IMM, 2), op!("LSR", lsr, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("JMP", jmp, abs, ABS, 3), op!("EOR", eor, abs, ABS, 4), op!("LSR", lsr, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0x50
    op!("BVC", bvc, rel, REL, 2), op!("EOR", eor, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("EOR", eor, zpx, ZPX, 4), op!("LSR", lsr, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("CLI", cli, imp, IMP, 2), op!("EOR", eor, aby, ABY, 4), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("EOR", eor, abx, ABX, 4), op!("LSR", lsr, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
    // 0x60
    op!("RTS", rts, imp, IMP, 6), op!("ADC", adc, izx, IZX, 6), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 3), op!("ADC", adc, zp0, ZP0, 3), op!("ROR", ror, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("PLA", pla, imp, IMP, 4), op!("ADC", adc, imm, IMM, 2), op!("ROR", ror, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("JMP", jmp, ind, IND, 5), op!("ADC", adc, abs, ABS, 4), op!("ROR", ror, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0x70
    op!("BVS", bvs, rel, REL, 2), op!("ADC", adc, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("ADC", adc, zpx, ZPX, 4), op!("ROR", ror, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("SEI", sei, imp, IMP, 2), op!("ADC", adc, aby, ABY, 4), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("ADC", adc, abx, ABX, 4), op!("ROR", ror, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
    // 0x80
    op!("???", nop, imp, IMP, 2), op!("STA", sta, izx, IZX, 6), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 6),
    op!("STY", sty, zp0, ZP0, 3), op!("STA", sta, zp0, ZP0, 3), op!("STX", stx, zp0, ZP0, 3), op!("???", xxx, imp, IMP, 3),
    op!("DEY", dey, imp, IMP, 2), op!("???", nop, imp, IMP, 2), op!("TXA", txa, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("STY", sty, abs, ABS, 4), op!("STA", sta, abs, ABS, 4), op!("STX", stx, abs, ABS, 4), op!("???", xxx, imp, IMP, 4),
    // 0x90
    op!("BCC", bcc, rel, REL, 2), op!("STA", sta, izy, IZY, 6), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 6),
    op!("STY", sty, zpx, ZPX, 4), op!("STA", sta, zpx, ZPX, 4), op!("STX", stx, zpy, ZPY, 4), op!("???", xxx, imp, IMP, 4),
    op!("TYA", tya, imp, IMP, 2), op!("STA", sta, aby, ABY, 5), op!("TXS", txs, imp, IMP, 2), op!("???", xxx, imp, IMP, 5),
    op!("???", nop, imp, IMP, 5), op!("STA", sta, abx, ABX, 5), op!("???", xxx, imp, IMP, 5), op!("???", xxx, imp, IMP, 5),
    // 0xA0
    op!("LDY", ldy, imm, IMM, 2), op!("LDA", lda, izx, IZX, 6), op!("LDX", ldx, imm, IMM, 2), op!("???", xxx, imp, IMP, 6),
    op!("LDY", ldy, zp0, ZP0, 3), op!("LDA", lda, zp0, ZP0, 3), op!("LDX", ldx, zp0, ZP0, 3), op!("???", xxx, imp, IMP, 3),
    op!("TAY", tay, imp, IMP, 2), op!("LDA", lda, imm, IMM, 2), op!("TAX", tax, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("LDY", ldy, abs, ABS, 4), op!("LDA", lda, abs, ABS, 4), op!("LDX", ldx, abs, ABS, 4), op!("???", xxx, imp, IMP, 4),
    // 0xB0
    op!("BCS", bcs, rel, REL, 2), op!("LDA", lda, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 5),
    op!("LDY", ldy, zpx, ZPX, 4), op!("LDA", lda, zpx, ZPX, 4), op!("LDX", ldx, zpy, ZPY, 4), op!("???", xxx, imp, IMP, 4),
    op!("CLV", clv, imp, IMP, 2), op!("LDA", lda, aby, ABY, 4), op!("TSX", tsx, imp, IMP, 2), op!("???", xxx, imp, IMP, 4),
    op!("LDY", ldy, abx, ABX, 4), op!("LDA", lda, abx, ABX, 4), op!("LDX", ldx, aby, ABY, 4), op!("???", xxx, imp, IMP, 4),
    // 0xC0
    op!("CPY", cpy, imm, IMM, 2), op!("CMP", cmp, izx, IZX, 6), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("CPY", cpy, zp0, ZP0, 3), op!("CMP", cmp, zp0, ZP0, 3), op!("DEC", dec, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("INY", iny, imp, IMP, 2), op!("CMP", cmp, imm, IMM, 2), op!("DEX", dex, imp, IMP, 2), op!("???", xxx, imp, IMP, 2),
    op!("CPY", cpy, abs, ABS, 4), op!("CMP", cmp, abs, ABS, 4), op!("DEC", dec, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0xD0
    op!("BNE", bne, rel, REL, 2), op!("CMP", cmp, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("CMP", cmp, zpx, ZPX, 4), op!("DEC", dec, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("CLD", cld, imp, IMP, 2), op!("CMP", cmp, aby, ABY, 4), op!("NOP", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("CMP", cmp, abx, ABX, 4), op!("DEC", dec, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
    // 0xE0
    op!("CPX", cpx, imm, IMM, 2), op!("SBC", sbc, izx, IZX, 6), op!("???", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("CPX", cpx, zp0, ZP0, 3), op!("SBC", sbc, zp0, ZP0, 3), op!("INC", inc, zp0, ZP0, 5), op!("???", xxx, imp, IMP, 5),
    op!("INX", inx, imp, IMP, 2), op!("SBC", sbc, imm, IMM, 2), op!("NOP", nop, imp, IMP, 2), op!("???", sbc, imp, IMP, 2),
    op!("CPX", cpx, abs, ABS, 4), op!("SBC", sbc, abs, ABS, 4), op!("INC", inc, abs, ABS, 6), op!("???", xxx, imp, IMP, 6),
    // 0xF0
    op!("BEQ", beq, rel, REL, 2), op!("SBC", sbc, izy, IZY, 5), op!("???", xxx, imp, IMP, 2), op!("???", xxx, imp, IMP, 8),
    op!("???", nop, imp, IMP, 4), op!("SBC", sbc, zpx, ZPX, 4), op!("INC", inc, zpx, ZPX, 6), op!("???", xxx, imp, IMP, 6),
    op!("SED", sed, imp, IMP, 2), op!("SBC", sbc, aby, ABY, 4), op!("NOP", nop, imp, IMP, 2), op!("???", xxx, imp, IMP, 7),
    op!("???", nop, imp, IMP, 4), op!("SBC", sbc, abx, ABX, 4), op!("INC", inc, abx, ABX, 7), op!("???", xxx, imp, IMP, 7),
];

// Addressing modes. Each derives the effective address for the operation
// half and reports whether indexing carried into a new page.
impl Cpu6502 {
    /// Implied (and accumulator): no operand bytes; latch A into `fetched`.
    fn imp(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.fetched = self.a;
        false
    }

    /// Immediate: the operand is the byte after the opcode.
    fn imm(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.addr_abs = self.pc;
        self.pc = self.pc.wrapping_add(1);
        false
    }

    /// Zero page: one operand byte addressing somewhere in $00xx.
    fn zp0(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.addr_abs = u16::from(bus.read(self.pc));
        self.pc = self.pc.wrapping_add(1);
        self.addr_abs &= 0x00FF;
        false
    }

    /// Zero page indexed by X; the sum wraps within the page.
    fn zpx(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.addr_abs = u16::from(bus.read(self.pc).wrapping_add(self.x));
        self.pc = self.pc.wrapping_add(1);
        false
    }

    /// Zero page indexed by Y; the sum wraps within the page.
    fn zpy(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.addr_abs = u16::from(bus.read(self.pc).wrapping_add(self.y));
        self.pc = self.pc.wrapping_add(1);
        false
    }

    /// Relative: a signed 8-bit displacement for the branch family, kept
    /// sign-extended in `addr_rel`.
    fn rel(&mut self, bus: &mut dyn CpuBus) -> bool {
        let mut rel = u16::from(bus.read(self.pc));
        self.pc = self.pc.wrapping_add(1);
        if rel & 0x0080 != 0 {
            rel |= 0xFF00;
        }
        self.addr_rel = rel;
        false
    }

    /// Absolute: a full little-endian 16-bit address.
    fn abs(&mut self, bus: &mut dyn CpuBus) -> bool {
        let lo = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let hi = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.addr_abs = bytes_to_addr!(lo, hi);
        false
    }

    /// Absolute indexed by X; crossing into a new page costs a cycle.
    fn abx(&mut self, bus: &mut dyn CpuBus) -> bool {
        let lo = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let hi = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.addr_abs = bytes_to_addr!(lo, hi).wrapping_add(u16::from(self.x));
        (self.addr_abs & 0xFF00) != (u16::from(hi) << 8)
    }

    /// Absolute indexed by Y; crossing into a new page costs a cycle.
    fn aby(&mut self, bus: &mut dyn CpuBus) -> bool {
        let lo = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let hi = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.addr_abs = bytes_to_addr!(lo, hi).wrapping_add(u16::from(self.y));
        (self.addr_abs & 0xFF00) != (u16::from(hi) << 8)
    }

    /// Indirect, used only by JMP. Faithfully reproduces the silicon bug:
    /// when the pointer's low byte is $FF the high byte is fetched from the
    /// start of the same page instead of carrying into the next one.
    fn ind(&mut self, bus: &mut dyn CpuBus) -> bool {
        let ptr_lo = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let ptr_hi = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let ptr = bytes_to_addr!(ptr_lo, ptr_hi);

        let lo = bus.read(ptr);
        let hi = if ptr_lo == 0xFF {
            bus.read(ptr & 0xFF00)
        } else {
            bus.read(ptr.wrapping_add(1))
        };
        self.addr_abs = bytes_to_addr!(lo, hi);
        false
    }

    /// Indexed indirect (zp,X): the X-offset zero-page cell holds a full
    /// pointer, read with zero-page wraparound.
    fn izx(&mut self, bus: &mut dyn CpuBus) -> bool {
        let t = bus.read(self.pc).wrapping_add(self.x);
        self.pc = self.pc.wrapping_add(1);
        let lo = bus.read(u16::from(t));
        let hi = bus.read(u16::from(t.wrapping_add(1)));
        self.addr_abs = bytes_to_addr!(lo, hi);
        false
    }

    /// Indirect indexed (zp),Y: the zero-page cell holds a pointer which Y
    /// then offsets; crossing into a new page costs a cycle.
    fn izy(&mut self, bus: &mut dyn CpuBus) -> bool {
        let t = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let lo = bus.read(u16::from(t));
        let hi = bus.read(u16::from(t.wrapping_add(1)));
        self.addr_abs = bytes_to_addr!(lo, hi).wrapping_add(u16::from(self.y));
        (self.addr_abs & 0xFF00) != (u16::from(hi) << 8)
    }
}

// Operations. ALU math happens in 16-bit and is masked back down so the
// host's overflow semantics never leak into flag computation.
impl Cpu6502 {
    /// Shared adder behind ADC and SBC. `operand` is already widened; SBC
    /// passes it inverted, which turns the same circuit into subtraction.
    fn add_to_accumulator(&mut self, operand: u16) {
        let a = u16::from(self.a);
        let carry = u16::from(self.status.contains(Status::CARRY));
        let sum = a + operand + carry;
        self.status.set(Status::CARRY, sum > 0x00FF);
        self.status
            .set(Status::OVERFLOW, ((a ^ sum) & !(a ^ operand)) & 0x0080 != 0);
        self.a = (sum & 0x00FF) as u8;
        self.set_zn(self.a);
    }

    /// Shared core of the branch family: charge a cycle for taking the
    /// branch, another if the destination sits on a different page.
    fn branch_if(&mut self, condition: bool) {
        if condition {
            self.cycles += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel);
            if (self.addr_abs & 0xFF00) != (self.pc & 0xFF00) {
                self.cycles += 1;
            }
            self.pc = self.addr_abs;
        }
    }

    /// Shared core of CMP/CPX/CPY.
    fn compare_with(&mut self, reg: u8) {
        let result = u16::from(reg).wrapping_sub(u16::from(self.fetched));
        self.status.set(Status::CARRY, reg >= self.fetched);
        self.set_zn((result & 0x00FF) as u8);
    }

    /// Shift results go to the accumulator in implied mode, else to memory.
    fn write_shift_result(&mut self, bus: &mut dyn CpuBus, result: u8) {
        if OPCODE_TABLE[self.opcode as usize].mode == AddrMode::IMP {
            self.a = result;
        } else {
            bus.write(self.addr_abs, result);
        }
    }

    fn adc(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.fetch(bus);
        self.add_to_accumulator(u16::from(self.fetched));
        true
    }

    fn and(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.a &= self.fetch(bus);
        self.set_zn(self.a);
        true
    }

    fn asl(&mut self, bus: &mut dyn CpuBus) -> bool {
        let shifted = u16::from(self.fetch(bus)) << 1;
        self.status.set(Status::CARRY, shifted & 0xFF00 != 0);
        let result = (shifted & 0x00FF) as u8;
        self.set_zn(result);
        self.write_shift_result(bus, result);
        false
    }

    fn bcc(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(!self.status.contains(Status::CARRY));
        false
    }

    fn bcs(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(self.status.contains(Status::CARRY));
        false
    }

    fn beq(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(self.status.contains(Status::ZERO));
        false
    }

    fn bit(&mut self, bus: &mut dyn CpuBus) -> bool {
        let value = self.fetch(bus);
        self.status.set(Status::ZERO, self.a & value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
        self.status.set(Status::OVERFLOW, value & 0x40 != 0);
        false
    }

    fn bmi(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(self.status.contains(Status::NEGATIVE));
        false
    }

    fn bne(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(!self.status.contains(Status::ZERO));
        false
    }

    fn bpl(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(!self.status.contains(Status::NEGATIVE));
        false
    }

    /// Software interrupt. Dispatched through the immediate mode, and with
    /// the extra increment here the pushed return address skips a padding
    /// byte after the opcode.
    fn brk(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.pc = self.pc.wrapping_add(1);

        self.status.insert(Status::IRQ_DISABLE);
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, (self.pc & 0x00FF) as u8);

        self.status.insert(Status::BREAK);
        self.push(bus, self.status.bits());
        self.status.remove(Status::BREAK);

        let lo = bus.read(IRQ_VECTOR);
        let hi = bus.read(IRQ_VECTOR.wrapping_add(1));
        self.pc = bytes_to_addr!(lo, hi);
        false
    }

    fn bvc(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(!self.status.contains(Status::OVERFLOW));
        false
    }

    fn bvs(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.branch_if(self.status.contains(Status::OVERFLOW));
        false
    }

    fn clc(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.remove(Status::CARRY);
        false
    }

    fn cld(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.remove(Status::DECIMAL);
        false
    }

    fn cli(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.remove(Status::IRQ_DISABLE);
        false
    }

    fn clv(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.remove(Status::OVERFLOW);
        false
    }

    fn cmp(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.fetch(bus);
        self.compare_with(self.a);
        true
    }

    fn cpx(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.fetch(bus);
        self.compare_with(self.x);
        false
    }

    fn cpy(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.fetch(bus);
        self.compare_with(self.y);
        false
    }

    fn dec(&mut self, bus: &mut dyn CpuBus) -> bool {
        let value = self.fetch(bus).wrapping_sub(1);
        bus.write(self.addr_abs, value);
        self.set_zn(value);
        false
    }

    fn dex(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.x = self.x.wrapping_sub(1);
        self.set_zn(self.x);
        false
    }

    fn dey(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.y = self.y.wrapping_sub(1);
        self.set_zn(self.y);
        false
    }

    fn eor(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.a ^= self.fetch(bus);
        self.set_zn(self.a);
        true
    }

    fn inc(&mut self, bus: &mut dyn CpuBus) -> bool {
        let value = self.fetch(bus).wrapping_add(1);
        bus.write(self.addr_abs, value);
        self.set_zn(value);
        false
    }

    fn inx(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.x = self.x.wrapping_add(1);
        self.set_zn(self.x);
        false
    }

    fn iny(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.y = self.y.wrapping_add(1);
        self.set_zn(self.y);
        false
    }

    fn jmp(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.pc = self.addr_abs;
        false
    }

    fn jsr(&mut self, bus: &mut dyn CpuBus) -> bool {
        let ret = self.pc.wrapping_sub(1);
        self.push(bus, (ret >> 8) as u8);
        self.push(bus, (ret & 0x00FF) as u8);
        self.pc = self.addr_abs;
        false
    }

    fn lda(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.a = self.fetch(bus);
        self.set_zn(self.a);
        true
    }

    fn ldx(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.x = self.fetch(bus);
        self.set_zn(self.x);
        true
    }

    fn ldy(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.y = self.fetch(bus);
        self.set_zn(self.y);
        true
    }

    fn lsr(&mut self, bus: &mut dyn CpuBus) -> bool {
        let value = self.fetch(bus);
        self.status.set(Status::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.set_zn(result);
        self.write_shift_result(bus, result);
        false
    }

    /// Official NOP plus the undocumented variants that share its slot.
    /// A few of those read (and discard) a memory operand, so they are
    /// eligible for the page-cross penalty.
    fn nop(&mut self, _bus: &mut dyn CpuBus) -> bool {
        matches!(self.opcode, 0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC)
    }

    fn ora(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.a |= self.fetch(bus);
        self.set_zn(self.a);
        true
    }

    fn pha(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.push(bus, self.a);
        false
    }

    /// Push status with B and U raised, then drop them from the live
    /// register; the boundary logic re-raises U before the next opcode.
    fn php(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.push(bus, (self.status | Status::BREAK | Status::UNUSED).bits());
        self.status.remove(Status::BREAK | Status::UNUSED);
        false
    }

    fn pla(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.a = self.pop(bus);
        self.set_zn(self.a);
        false
    }

    fn plp(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.status = Status::from_bits_truncate(self.pop(bus));
        self.status.insert(Status::UNUSED);
        false
    }

    fn rol(&mut self, bus: &mut dyn CpuBus) -> bool {
        let rotated =
            (u16::from(self.fetch(bus)) << 1) | u16::from(self.status.contains(Status::CARRY));
        self.status.set(Status::CARRY, rotated & 0xFF00 != 0);
        let result = (rotated & 0x00FF) as u8;
        self.set_zn(result);
        self.write_shift_result(bus, result);
        false
    }

    fn ror(&mut self, bus: &mut dyn CpuBus) -> bool {
        let value = self.fetch(bus);
        let result = (u8::from(self.status.contains(Status::CARRY)) << 7) | (value >> 1);
        self.status.set(Status::CARRY, value & 0x01 != 0);
        self.set_zn(result);
        self.write_shift_result(bus, result);
        false
    }

    fn rti(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.status = Status::from_bits_truncate(self.pop(bus));
        self.status.remove(Status::BREAK | Status::UNUSED);
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        self.pc = bytes_to_addr!(lo, hi);
        false
    }

    fn rts(&mut self, bus: &mut dyn CpuBus) -> bool {
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        self.pc = bytes_to_addr!(lo, hi).wrapping_add(1);
        false
    }

    fn sbc(&mut self, bus: &mut dyn CpuBus) -> bool {
        self.fetch(bus);
        self.add_to_accumulator(u16::from(self.fetched) ^ 0x00FF);
        true
    }

    fn sec(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.insert(Status::CARRY);
        false
    }

    fn sed(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.insert(Status::DECIMAL);
        false
    }

    fn sei(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.status.insert(Status::IRQ_DISABLE);
        false
    }

    fn sta(&mut self, bus: &mut dyn CpuBus) -> bool {
        bus.write(self.addr_abs, self.a);
        false
    }

    fn stx(&mut self, bus: &mut dyn CpuBus) -> bool {
        bus.write(self.addr_abs, self.x);
        false
    }

    fn sty(&mut self, bus: &mut dyn CpuBus) -> bool {
        bus.write(self.addr_abs, self.y);
        false
    }

    fn tax(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.x = self.a;
        self.set_zn(self.x);
        false
    }

    fn tay(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.y = self.a;
        self.set_zn(self.y);
        false
    }

    fn tsx(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.x = self.stkp;
        self.set_zn(self.x);
        false
    }

    fn txa(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.a = self.x;
        self.set_zn(self.a);
        false
    }

    fn txs(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.stkp = self.x;
        false
    }

    fn tya(&mut self, _bus: &mut dyn CpuBus) -> bool {
        self.a = self.y;
        self.set_zn(self.a);
        false
    }

    /// Trap for opcodes with no defined behavior; executes as a no-op.
    fn xxx(&mut self, _bus: &mut dyn CpuBus) -> bool {
        log::warn!(
            "illegal opcode {:02X} at {:04X} executed as NOP",
            self.opcode,
            self.pc.wrapping_sub(1)
        );
        false
    }
}
