//! Disassembler: a pure function from a memory view to an address→text map,
//! built to feed a debugger's code pane.

use std::collections::BTreeMap;

use super::table::{AddrMode, OPCODE_TABLE};
use super::Cpu6502;
use crate::bytes_to_addr;
use crate::devices::bus::CpuBus;

/// Disassemble the range `start..=end` of the bus address space.
///
/// Reads go through `peek` exclusively, so disassembling never perturbs
/// the machine; anything unmapped (or only mutably readable) decodes as
/// zero. The line carrying the current `pc` is marked with a `"> "`
/// prefix. A negative `start` pads the low end of the map with blank
/// entries, which keeps a fixed-height debugger pane simple to fill when
/// `pc` sits near the bottom of the address space.
pub fn disassemble(
    cpu: &Cpu6502,
    bus: &dyn CpuBus,
    start: i32,
    end: i32,
) -> BTreeMap<i32, String> {
    let mut listing = BTreeMap::new();

    let mut addr = start;
    if start < 0 {
        for pad in start..0 {
            listing.insert(pad, String::new());
        }
        addr = 0;
    }

    let peek = |at: i32| bus.peek(at as u16).unwrap_or(0x00);

    while addr <= end && addr <= 0xFFFF {
        let line_addr = addr;

        let opcode = peek(addr);
        addr += 1;
        let entry = &OPCODE_TABLE[opcode as usize];

        let operand = match entry.mode {
            AddrMode::IMP => String::new(),
            AddrMode::IMM => {
                let value = peek(addr);
                addr += 1;
                format!("#${:02X} ", value)
            }
            AddrMode::ZP0 | AddrMode::ZPX | AddrMode::ZPY | AddrMode::IZX | AddrMode::IZY => {
                let lo = peek(addr);
                addr += 1;
                format!("${:02X} ", lo)
            }
            AddrMode::ABS | AddrMode::ABX | AddrMode::ABY | AddrMode::IND => {
                let lo = peek(addr);
                addr += 1;
                let hi = peek(addr);
                addr += 1;
                format!("${:04X} ", bytes_to_addr!(lo, hi))
            }
            AddrMode::REL => {
                let offset = peek(addr);
                addr += 1;
                let target = (addr + i32::from(offset as i8)) & 0xFFFF;
                format!("${:02X} [${:04X}] ", offset, target)
            }
        };

        let marker = if i32::from(cpu.pc) == line_addr {
            "> "
        } else {
            "  "
        };
        listing.insert(
            line_addr,
            format!(
                "{}${:04X}: {} {}{{{}}}",
                marker, line_addr, entry.mnemonic, operand, entry.mode
            ),
        );
    }

    listing
}
