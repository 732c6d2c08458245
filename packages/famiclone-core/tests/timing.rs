//! Cycle-accounting tests: base costs, branch charges, and the
//! page-cross penalty gating.

mod util;

use famiclone_core::devices::cpu::{Status, OPCODE_TABLE};
use util::{cpu_at, step, FlatBus};

#[test]
fn every_descriptor_charges_at_least_two_cycles() {
    for (opcode, entry) in OPCODE_TABLE.iter().enumerate() {
        assert!(
            entry.cycles >= 2,
            "opcode {:02X} ({}) below the 2-cycle floor",
            opcode,
            entry.mnemonic
        );
    }
}

#[test]
fn branch_not_taken_costs_base_cycles() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0xD0, 0x04]); // BNE +4
    let mut cpu = cpu_at(0x8000);
    cpu.status.insert(Status::ZERO); // condition fails

    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.pc, 0x8002);
}

#[test]
fn branch_taken_costs_one_extra_cycle() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0xD0, 0x04]); // BNE +4, target $8006
    let mut cpu = cpu_at(0x8000);
    cpu.status.remove(Status::ZERO);

    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.pc, 0x8006);
}

#[test]
fn branch_crossing_a_page_costs_two_extra_cycles() {
    let mut bus = FlatBus::new();
    bus.load(0x80FD, &[0xD0, 0x04]); // BNE +4, target $8103
    let mut cpu = cpu_at(0x80FD);
    cpu.status.remove(Status::ZERO);

    // the taking tick charges 2 + 1 + 1 and burns one immediately
    cpu.tick(&mut bus);
    assert_eq!(cpu.cycles, 3);

    let mut ticks = 1;
    while !cpu.complete() {
        cpu.tick(&mut bus);
        ticks += 1;
    }
    assert_eq!(ticks, 4);
    assert_eq!(cpu.pc, 0x8103);
}

#[test]
fn backward_branch_crossing_a_page_also_pays() {
    let mut bus = FlatBus::new();
    bus.load(0x8002, &[0xD0, 0xFA]); // BNE -6, target $7FFE
    let mut cpu = cpu_at(0x8002);
    cpu.status.remove(Status::ZERO);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.pc, 0x7FFE);
}

#[test]
fn indexed_read_pays_for_a_page_cross() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0xBD, 0xFF, 0x80]); // LDA $80FF,X
    let mut cpu = cpu_at(0x8000);
    cpu.x = 0x01; // $80FF + 1 = $8100, new page

    assert_eq!(step(&mut cpu, &mut bus), 5);
}

#[test]
fn indexed_read_within_a_page_stays_at_base() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0xBD, 0x00, 0x80]); // LDA $8000,X
    let mut cpu = cpu_at(0x8000);
    cpu.x = 0x01;

    assert_eq!(step(&mut cpu, &mut bus), 4);
}

#[test]
fn indexed_store_never_pays_the_penalty() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0x9D, 0xFF, 0x00]); // STA $00FF,X
    let mut cpu = cpu_at(0x8000);
    cpu.x = 0x01; // crosses into page 1, but stores aren't eligible

    assert_eq!(step(&mut cpu, &mut bus), 5);
    assert_eq!(bus.mem[0x0100], cpu.a);
}

#[test]
fn indirect_indexed_read_pays_on_cross() {
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0xB1, 0x10]); // LDA ($10),Y
    bus.mem[0x0010] = 0xFF;
    bus.mem[0x0011] = 0x20; // pointer $20FF
    let mut cpu = cpu_at(0x8000);
    cpu.y = 0x01; // lands on $2100

    assert_eq!(step(&mut cpu, &mut bus), 6);
}

#[test]
fn simple_instructions_keep_their_listed_cost() {
    let cases: &[(&[u8], u32)] = &[
        (&[0xEA], 2),             // NOP
        (&[0xA9, 0x00], 2),       // LDA #
        (&[0xA5, 0x10], 3),       // LDA zp
        (&[0xAD, 0x00, 0x02], 4), // LDA abs
        (&[0x48], 3),             // PHA
        (&[0x68], 4),             // PLA
        (&[0x20, 0x00, 0x90], 6), // JSR
        (&[0x00], 7),             // BRK
    ];
    for (program, expected) in cases {
        let mut bus = FlatBus::new();
        bus.load(0x8000, program);
        let mut cpu = cpu_at(0x8000);
        assert_eq!(
            step(&mut cpu, &mut bus),
            *expected,
            "wrong cost for opcode {:02X}",
            program[0]
        );
    }
}

#[test]
fn undocumented_nops_keep_hardware_timing() {
    // $1C reads abs,X on hardware; the table carries its 4-cycle cost
    let mut bus = FlatBus::new();
    bus.load(0x8000, &[0x1C]);
    let mut cpu = cpu_at(0x8000);
    assert_eq!(step(&mut cpu, &mut bus), 4);
}
