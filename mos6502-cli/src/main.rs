//! Sample host for the `mos6502` core crate: loads a raw binary image into a
//! flat 64KiB RAM, points the reset vector at it, and steps the CPU while
//! logging each executed opcode until it hits `BRK` or a step budget runs out.
//!
//! This binary is deliberately thin — argument parsing, file loading and
//! program placement are the "external collaborator" concerns the core CPU
//! never touches.

use std::path::PathBuf;

use clap::Parser;
use mos6502::{Bus, RamBus, MOS6502};
use thiserror::Error;

#[derive(Parser)]
#[command(author, version, about = "Run a raw 6502 binary image against the mos6502 core")]
struct Cli {
    /// Path to a raw binary image to load into RAM.
    #[arg(long)]
    load: PathBuf,

    /// Address to load the image at, and to point the reset vector to.
    #[arg(long, default_value = "0x0200", value_parser = parse_u16)]
    origin: u16,

    /// Stop after this many steps even if BRK is never hit.
    #[arg(long, default_value_t = 100_000)]
    max_steps: u64,
}

#[derive(Error, Debug)]
enum HostError {
    #[error("failed to read program image {path}: {source}")]
    ReadImage { path: PathBuf, source: std::io::Error },
    #[error("program image is {len} bytes, too large to fit in RAM from origin {origin:#06X}")]
    ImageTooLarge { len: usize, origin: u16 },
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let without_prefix = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
    match without_prefix {
        Some(hex) => u16::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None => s.parse::<u16>().map_err(|e| e.to_string()),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        log::error!("{error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), HostError> {
    let image = std::fs::read(&cli.load).map_err(|source| HostError::ReadImage {
        path: cli.load.clone(),
        source,
    })?;

    if cli.origin as usize + image.len() > RamBus::SIZE {
        return Err(HostError::ImageTooLarge { len: image.len(), origin: cli.origin });
    }

    let mut bus = RamBus::new().with_memory_at(cli.origin, &image);
    bus.write_u16(mos6502::RESET_VECTOR_ADDRESS, cli.origin);

    let mut cpu = MOS6502::new(&bus);
    log::info!("loaded {} bytes at {:#06X}, PC = {:#06X}", image.len(), cli.origin, cpu.pc);

    for step_count in 0..cli.max_steps {
        let outcome = cpu.step(&mut bus);

        if let Some(opcode) = outcome.opcode {
            log::debug!("step {step_count}: opcode {:#04X}, ~{} cycles, PC now {:#06X}", opcode, outcome.cycles, cpu.pc);

            if opcode == 0x00 {
                log::info!("halted on BRK after {} steps", step_count + 1);
                return Ok(());
            }
        }
    }

    log::warn!("step budget of {} exhausted without hitting BRK", cli.max_steps);
    Ok(())
}
