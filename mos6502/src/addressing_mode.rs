use std::fmt;

use crate::{Address, Bus, BytesUsed};

/// Which of the twelve addressing routines (plus the accumulator special case,
/// spec.md §9) an opcode uses, independent of any operand bytes. Looked up
/// from the dispatch table alongside an [`crate::Opcode`]; paired with the bytes
/// following the opcode at decode time to produce an [`Addressing`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AddressingMode {
    /// No memory operand; the instruction acts on registers alone (e.g. `INX`).
    Implied,

    /// The instruction's operand is the accumulator itself (e.g. `ROL A`).
    ///
    /// Modeled as its own variant rather than folded into `Implied` so that
    /// shift/rotate operations can match on it directly instead of carrying a
    /// separate "is this implied" boolean that would make address `0` ambiguous
    /// with "no address" (spec.md §9).
    Accumulator,

    /// A literal operand byte follows the opcode.
    Immediate,

    /// One operand byte `d`; effective address is `$00d`.
    ZeroPage,
    /// One operand byte `d`; effective address is `(d + X) mod 256`.
    ZeroPageX,
    /// One operand byte `d`; effective address is `(d + Y) mod 256`.
    ZeroPageY,

    /// One operand byte, a signed 8-bit branch displacement.
    Relative,

    /// Two operand bytes (lo, hi); effective address is `(hi<<8) | lo`.
    Absolute,
    /// Two operand bytes plus `X`, 16-bit wrapping.
    AbsoluteX,
    /// Two operand bytes plus `Y`, 16-bit wrapping.
    AbsoluteY,

    /// Two operand bytes addressing a pointer; honors the page-wraparound hardware bug.
    Indirect,
    /// One operand byte `d`; pointer read from `(d+X) mod 256`.
    IndexedIndirect,
    /// One operand byte `d`; pointer read from `d`, then `+ Y`.
    IndirectIndexed,
}

impl AddressingMode {
    /// How many operand bytes follow the opcode for this mode.
    pub fn operand_len(&self) -> BytesUsed {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Read this mode's operand bytes from `bus` starting at `address` (the byte
    /// right after the opcode), producing a resolved [`Addressing`] and the
    /// number of bytes consumed.
    pub fn read_addressing(&self, address: Address, bus: &impl Bus) -> (Addressing, BytesUsed) {
        let addressing = match self {
            AddressingMode::Implied => Addressing::Implied,
            AddressingMode::Accumulator => Addressing::Accumulator,
            AddressingMode::Immediate => Addressing::Immediate(bus.read_u8(address)),
            AddressingMode::ZeroPage => Addressing::ZeroPage(bus.read_u8(address)),
            AddressingMode::ZeroPageX => Addressing::ZeroPageX(bus.read_u8(address)),
            AddressingMode::ZeroPageY => Addressing::ZeroPageY(bus.read_u8(address)),
            AddressingMode::Relative => Addressing::Relative(bus.read_u8(address) as i8),
            AddressingMode::Absolute => Addressing::Absolute(bus.read_u16(address)),
            AddressingMode::AbsoluteX => Addressing::AbsoluteX(bus.read_u16(address)),
            AddressingMode::AbsoluteY => Addressing::AbsoluteY(bus.read_u16(address)),
            AddressingMode::Indirect => Addressing::Indirect(bus.read_u16(address)),
            AddressingMode::IndexedIndirect => Addressing::IndexedIndirect(bus.read_u8(address)),
            AddressingMode::IndirectIndexed => Addressing::IndirectIndexed(bus.read_u8(address)),
        };

        (addressing, self.operand_len())
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A fully decoded addressing mode: the raw operand byte(s) read from the bus at
/// decode time, not yet combined with register state. [`Addressable::resolve`]
/// turns this into a concrete target (memory address, the accumulator, or an
/// immediate value).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Addressing {
    Implied,
    Accumulator,
    Immediate(u8),
    ZeroPage(u8),
    ZeroPageX(u8),
    ZeroPageY(u8),
    Relative(i8),
    Absolute(u16),
    AbsoluteX(u16),
    AbsoluteY(u16),
    Indirect(u16),
    IndexedIndirect(u8),
    IndirectIndexed(u8),
}
