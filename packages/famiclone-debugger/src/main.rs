//! Terminal debugger for the famiclone core.
//!
//! Single-letter commands drive the machine:
//!   c  step one instruction      f  step one frame
//!   r  reset                     i  raise IRQ
//!   n  raise NMI                 d  disassemble around pc
//!   q  quit

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use famiclone_core::devices::bus::CpuBus;
use famiclone_core::devices::cpu::Status;
use famiclone_core::devices::nes::Nes;
use structopt::StructOpt;

/// Lines of disassembly to show past the current pc.
const DISASSEMBLY_WINDOW: i32 = 0x20;

#[derive(Debug, StructOpt)]
#[structopt(name = "famiclone-debugger", about = "Step a ROM through the famiclone core.")]
struct CliOptions {
    /// Path to an iNES ROM image
    rom: PathBuf,
}

fn main() {
    env_logger::init();
    let options = CliOptions::from_args();

    let mut nes = match Nes::from_file(&options.rom) {
        Ok(nes) => nes,
        Err(err) => {
            eprintln!("failed to load {}: {}", options.rom.display(), err);
            process::exit(1);
        }
    };
    log::info!("loaded {}", options.rom.display());

    print_status(&nes);
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().expect("stdout should flush");

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(err) => {
                eprintln!("stdin error: {}", err);
                break;
            }
        }

        match line.trim() {
            "c" => {
                nes.step_instruction();
                print_status(&nes);
            }
            "f" => {
                nes.step_frame();
                print_status(&nes);
            }
            "r" => {
                nes.reset();
                print_status(&nes);
            }
            "i" => {
                nes.irq();
                print_status(&nes);
            }
            "n" => {
                nes.nmi();
                print_status(&nes);
            }
            "d" => print_disassembly(&nes),
            "q" => break,
            "" => {}
            other => {
                println!("unknown command {:?}", other);
                print_help();
            }
        }
    }
}

fn print_help() {
    println!("commands: c=step  f=frame  r=reset  i=irq  n=nmi  d=disassemble  q=quit");
}

fn print_status(nes: &Nes) {
    let cpu = nes.cpu();
    let flag = |bit: Status, label: char| {
        if cpu.status.contains(bit) {
            label.to_ascii_uppercase()
        } else {
            label.to_ascii_lowercase()
        }
    };
    println!(
        "A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} PC:{:04X}  [{}{}{}{}{}{}{}{}]",
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.stkp,
        cpu.pc,
        flag(Status::NEGATIVE, 'n'),
        flag(Status::OVERFLOW, 'v'),
        flag(Status::UNUSED, 'u'),
        flag(Status::BREAK, 'b'),
        flag(Status::DECIMAL, 'd'),
        flag(Status::IRQ_DISABLE, 'i'),
        flag(Status::ZERO, 'z'),
        flag(Status::CARRY, 'c'),
    );
    if let Some(line) = nes.disassemble(i32::from(cpu.pc), i32::from(cpu.pc)).values().next() {
        println!("{}", line);
    }
    // a peek at the zero page head often tells the story during stepping
    let zp: Vec<String> = (0x0000..0x0008)
        .map(|addr| format!("{:02X}", nes.peek(addr).unwrap_or(0)))
        .collect();
    println!("ZP: {}", zp.join(" "));
}

fn print_disassembly(nes: &Nes) {
    let pc = i32::from(nes.cpu().pc);
    for line in nes.disassemble(pc, pc + DISASSEMBLY_WINDOW).values() {
        println!("{}", line);
    }
}
