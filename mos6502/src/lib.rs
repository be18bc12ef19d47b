//! An instruction-accurate emulator for the MOS Technology 6502 microprocessor.
//!
//! The [`MOS6502`] struct owns nothing but register state; it communicates with
//! memory and devices entirely through the [`Bus`] trait supplied by the caller.
//! A single [`MOS6502::step`] call fetches, decodes and executes exactly one
//! instruction (or services a latched interrupt), matching the 6502 reference
//! bit-for-bit: sign-extended relative branches, zero-page wraparound, the
//! indirect-`JMP` page-boundary bug, overflow-flag computation and stack
//! conventions in page 1.

mod addressable;
mod addressing_mode;
mod bus;
mod cpu;
mod error;
mod instruction;
mod interrupt;
mod opcode;
mod register;
mod status;

pub use addressable::{Addressable, AddressableTarget};
pub use addressing_mode::{Addressing, AddressingMode};
pub use bus::{Bus, RamBus};
pub use cpu::{StepOutcome, MOS6502};
pub use error::Error;
pub use instruction::{Instruction, InstructionSignature};
pub use interrupt::{PendingInterrupt, IRQ_VECTOR_ADDRESS, NMI_VECTOR_ADDRESS, RESET_VECTOR_ADDRESS};
pub use opcode::Opcode;
pub use status::{Status, StatusFlag};

/// A 16-bit memory address on the CPU's address bus.
pub type Address = u16;

/// The number of operand bytes an addressing mode consumed after the opcode.
pub type BytesUsed = u16;

/// A best-effort, non-hardware-exact cycle count (see [`StepOutcome`]).
pub type CyclesTaken = u32;

pub type Result<A> = std::result::Result<A, Error>;
