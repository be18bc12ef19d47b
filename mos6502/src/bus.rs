use crate::Address;

/// An abstract, 16-bit addressable byte-oriented memory with injectable read/write.
///
/// The CPU never assumes any address is backed by RAM: a `Bus` implementation may
/// map RAM, ROM, or side-effectful memory-mapped devices at its own discretion.
/// Every fetch, operand load, store and stack operation the CPU performs routes
/// through a `Bus`. Implementations must tolerate duplicate reads of the same
/// address within one instruction; the 6502 itself performs dummy reads during
/// some indexed addressing modes, though this crate does not require a `Bus` to
/// model their side effects specially.
pub trait Bus {
    fn read_u8(&self, address: Address) -> u8;

    fn write_u8(&mut self, address: Address, value: u8);

    /// Read a little-endian `u16` starting at `address`.
    fn read_u16(&self, address: Address) -> u16 {
        let lo = self.read_u8(address);
        let hi = self.read_u8(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a little-endian `u16` starting at `address`.
    fn write_u16(&mut self, address: Address, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_u8(address, lo);
        self.write_u8(address.wrapping_add(1), hi);
    }
}

/// A flat 64KiB RAM `Bus`, used by this crate's own tests and by the sample host
/// (`mos6502-cli`). Every address outside the program image and vectors reads
/// back as `0x00` until written.
pub struct RamBus {
    pub memory: [u8; RamBus::SIZE],
}

impl RamBus {
    pub const SIZE: usize = 65536;

    pub fn new() -> RamBus {
        RamBus { memory: [0; RamBus::SIZE] }
    }

    /// Write `bytes` starting at `start`, for test setup convenience.
    pub fn with_memory_at(mut self, start: u16, bytes: &[u8]) -> RamBus {
        let start = start as usize;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Write `bytes` at `$0200` (this crate's test-program convention, spec.md §6)
    /// and point the reset vector at them.
    pub fn with_program(mut self, bytes: &[u8]) -> RamBus {
        const PROGRAM_START: u16 = 0x0200;
        self = self.with_memory_at(PROGRAM_START, bytes);
        self.write_u16(RESET_VECTOR_ADDRESS, PROGRAM_START);
        self
    }
}

impl Default for RamBus {
    fn default() -> RamBus {
        RamBus::new()
    }
}

impl Bus for RamBus {
    fn read_u8(&self, address: Address) -> u8 {
        self.memory[address as usize]
    }

    fn write_u8(&mut self, address: Address, value: u8) {
        self.memory[address as usize] = value;
    }
}

use crate::interrupt::RESET_VECTOR_ADDRESS;
