//! Reset, IRQ, NMI, and BRK entry/exit sequences.

mod util;

use famiclone_core::devices::cpu::{Cpu6502, Status};
use util::{cpu_at, step, FlatBus};

#[test]
fn reset_loads_the_vector_and_charges_eight_cycles() {
    let mut bus = FlatBus::new();
    bus.set_reset_vector(0xC000);
    bus.mem[0x0123] = 0x42;

    let mut cpu = Cpu6502::new();
    cpu.a = 0x11;
    cpu.x = 0x22;
    cpu.y = 0x33;
    cpu.reset(&mut bus);

    assert_eq!(cpu.pc, 0xC000);
    assert_eq!((cpu.a, cpu.x, cpu.y), (0, 0, 0));
    assert_eq!(cpu.stkp, 0xFD);
    assert!(cpu.status.contains(Status::UNUSED));
    assert!(cpu.status.contains(Status::IRQ_DISABLE));
    assert_eq!(cpu.cycles, 8);
    // reset does not touch memory
    assert_eq!(bus.mem[0x0123], 0x42);
}

#[test]
fn irq_is_masked_by_the_interrupt_disable_flag() {
    let mut bus = FlatBus::new();
    bus.set_irq_vector(0x9000);
    let mut cpu = cpu_at(0x8123);
    cpu.status.insert(Status::IRQ_DISABLE);
    let stkp = cpu.stkp;

    cpu.irq(&mut bus);

    assert_eq!(cpu.pc, 0x8123, "masked irq must not move pc");
    assert_eq!(cpu.stkp, stkp, "masked irq must not touch the stack");
    assert_eq!(cpu.cycles, 0);
}

#[test]
fn irq_pushes_state_and_jumps_through_the_vector() {
    let mut bus = FlatBus::new();
    bus.set_irq_vector(0x9000);
    let mut cpu = cpu_at(0x8123);
    cpu.status.remove(Status::IRQ_DISABLE);
    cpu.status.insert(Status::CARRY);
    let stkp = cpu.stkp;

    cpu.irq(&mut bus);

    assert_eq!(cpu.pc, 0x9000);
    assert_eq!(cpu.cycles, 7);
    assert_eq!(cpu.stkp, stkp.wrapping_sub(3), "three bytes pushed");
    // return address, high then low
    assert_eq!(bus.mem[0x0100 + stkp as usize], 0x81);
    assert_eq!(bus.mem[0x0100 + stkp.wrapping_sub(1) as usize], 0x23);
    // pushed status has B clear, U set, I set
    let pushed = Status::from_bits_truncate(bus.mem[0x0100 + stkp.wrapping_sub(2) as usize]);
    assert!(!pushed.contains(Status::BREAK));
    assert!(pushed.contains(Status::UNUSED));
    assert!(pushed.contains(Status::IRQ_DISABLE));
    assert!(pushed.contains(Status::CARRY));
    // and the live register now masks further irqs
    assert!(cpu.status.contains(Status::IRQ_DISABLE));
}

#[test]
fn nmi_ignores_the_mask_and_charges_eight_cycles() {
    let mut bus = FlatBus::new();
    bus.set_nmi_vector(0xA000);
    let mut cpu = cpu_at(0x8123);
    cpu.status.insert(Status::IRQ_DISABLE);
    let stkp = cpu.stkp;

    cpu.nmi(&mut bus);

    assert_eq!(cpu.pc, 0xA000);
    assert_eq!(cpu.cycles, 8);
    assert_eq!(cpu.stkp, stkp.wrapping_sub(3));
}

#[test]
fn rti_returns_to_the_interrupted_instruction() {
    let mut bus = FlatBus::new();
    bus.set_irq_vector(0x9000);
    bus.load(0x9000, &[0x40]); // RTI
    bus.load(0x8123, &[0xEA]);

    let mut cpu = cpu_at(0x8123);
    cpu.status.remove(Status::IRQ_DISABLE);
    cpu.status.insert(Status::CARRY);

    cpu.irq(&mut bus);
    while !cpu.complete() {
        cpu.tick(&mut bus);
    }

    step(&mut cpu, &mut bus); // RTI
    assert_eq!(cpu.pc, 0x8123);
    assert!(cpu.status.contains(Status::CARRY), "flags restored");
    // the entry sequence raises I before pushing, so the restored image
    // carries the mask with it
    assert!(cpu.status.contains(Status::IRQ_DISABLE));
}

#[test]
fn brk_vectors_like_an_irq_with_the_break_bit_pushed() {
    let mut bus = FlatBus::new();
    bus.set_irq_vector(0x9000);
    bus.load(0x8000, &[0x00]); // BRK
    let mut cpu = cpu_at(0x8000);
    cpu.status.remove(Status::IRQ_DISABLE);
    let stkp = cpu.stkp;

    assert_eq!(step(&mut cpu, &mut bus), 7);

    assert_eq!(cpu.pc, 0x9000);
    // the immediate fetch and BRK's own increment both advance pc, so the
    // pushed return address lands past a padding byte, at $8003
    assert_eq!(bus.mem[0x0100 + stkp as usize], 0x80);
    assert_eq!(bus.mem[0x0100 + stkp.wrapping_sub(1) as usize], 0x03);
    let pushed = Status::from_bits_truncate(bus.mem[0x0100 + stkp.wrapping_sub(2) as usize]);
    assert!(pushed.contains(Status::BREAK));
    assert!(!cpu.status.contains(Status::BREAK), "live B bit drops again");
    assert!(cpu.status.contains(Status::IRQ_DISABLE));
}

#[test]
fn interrupt_after_an_instruction_lands_before_the_next_fetch() {
    let mut bus = FlatBus::new();
    bus.set_irq_vector(0x9000);
    bus.load(0x8000, &[0xEA, 0xEA]); // NOP NOP
    let mut cpu = cpu_at(0x8000);
    cpu.status.remove(Status::IRQ_DISABLE);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x8001);

    // delivered on the boundary, observed by the next fetch
    cpu.irq(&mut bus);
    while !cpu.complete() {
        cpu.tick(&mut bus);
    }
    assert_eq!(cpu.pc, 0x9000);
}
