use crate::addressing_mode::Addressing;
use crate::register::Register;
use crate::{Address, Bus, MOS6502};

/// Where an [`Addressing`] ultimately points, once combined with CPU register state.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AddressableTarget {
    /// The instruction operates on the accumulator directly (shift/rotate's `A` variant,
    /// and the throwaway operand of `Implied`-mode instructions like `NOP`/`INX`).
    Accumulator,
    /// A literal value, not backed by any address (`Immediate`).
    Immediate(u8),
    /// A concrete bus address.
    Memory(Address),
}

/// A resolved [`Addressing`]: the effective address (or accumulator/immediate
/// target) an instruction will read, write or modify, plus whether resolving it
/// crossed a page boundary (spec.md §4.2 — informational only; it does not
/// change the semantic result, only the optional cycle count).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Addressable {
    pub target: AddressableTarget,
    pub page_boundary_crossed: bool,
}

impl Addressable {
    /// Resolve `addressing` against the CPU's current register state and bus contents.
    pub fn resolve(addressing: Addressing, cpu: &MOS6502, bus: &impl Bus) -> Addressable {
        let (target, page_boundary_crossed) = match addressing {
            Addressing::Implied => (AddressableTarget::Accumulator, false),
            Addressing::Accumulator => (AddressableTarget::Accumulator, false),
            Addressing::Immediate(value) => (AddressableTarget::Immediate(value), false),

            Addressing::ZeroPage(d) => (AddressableTarget::Memory(d as Address), false),
            Addressing::ZeroPageX(d) => {
                (AddressableTarget::Memory(d.wrapping_add(cpu.x) as Address), false)
            }
            Addressing::ZeroPageY(d) => {
                (AddressableTarget::Memory(d.wrapping_add(cpu.y) as Address), false)
            }

            Addressing::Relative(offset) => {
                // `cpu.pc` has already been advanced past this instruction's operand
                // byte by the time an operation runs (spec.md §4.2's "PC_after_operand").
                let base = cpu.pc;
                let target = base.wrapping_add(offset as i16 as u16);
                let crossed = (base & 0xFF00) != (target & 0xFF00);
                (AddressableTarget::Memory(target), crossed)
            }

            Addressing::Absolute(address) => (AddressableTarget::Memory(address), false),
            Addressing::AbsoluteX(base) => {
                let target = base.wrapping_add(cpu.x as u16);
                (AddressableTarget::Memory(target), pages_differ(base, target))
            }
            Addressing::AbsoluteY(base) => {
                let target = base.wrapping_add(cpu.y as u16);
                (AddressableTarget::Memory(target), pages_differ(base, target))
            }

            Addressing::Indirect(pointer) => {
                // The 6502 indirect-JMP hardware bug: the high byte of the target is
                // fetched from the *same page* as the pointer's low byte, never crossing
                // into the next page, when the pointer's low byte is $FF.
                let hi_address = if pointer & 0x00FF == 0x00FF {
                    pointer & 0xFF00
                } else {
                    pointer.wrapping_add(1)
                };

                let lo = bus.read_u8(pointer);
                let hi = bus.read_u8(hi_address);
                (AddressableTarget::Memory(u16::from_le_bytes([lo, hi])), false)
            }

            Addressing::IndexedIndirect(d) => {
                let pointer = d.wrapping_add(cpu.x);
                let lo = bus.read_u8(pointer as Address);
                let hi = bus.read_u8(pointer.wrapping_add(1) as Address);
                (AddressableTarget::Memory(u16::from_le_bytes([lo, hi])), false)
            }

            Addressing::IndirectIndexed(d) => {
                let lo = bus.read_u8(d as Address);
                let hi = bus.read_u8(d.wrapping_add(1) as Address);
                let base = u16::from_le_bytes([lo, hi]);
                let target = base.wrapping_add(cpu.y as u16);
                (AddressableTarget::Memory(target), pages_differ(base, target))
            }
        };

        Addressable { target, page_boundary_crossed }
    }

    pub fn address(&self) -> Option<Address> {
        match self.target {
            AddressableTarget::Memory(address) => Some(address),
            _ => None,
        }
    }

    pub fn read(&self, cpu: &MOS6502, bus: &impl Bus) -> u8 {
        match self.target {
            AddressableTarget::Accumulator => cpu.a,
            AddressableTarget::Immediate(value) => value,
            AddressableTarget::Memory(address) => bus.read_u8(address),
        }
    }

    pub fn write(&self, cpu: &mut MOS6502, bus: &mut impl Bus, value: u8) {
        match self.target {
            AddressableTarget::Immediate(_) => {
                unreachable!("no 6502 instruction writes through an Immediate operand")
            }
            AddressableTarget::Accumulator => cpu.write_register(Register::A, value),
            AddressableTarget::Memory(address) => bus.write_u8(address, value),
        }
    }

    /// Read-modify-write: read the current value, apply `f`, write the result back,
    /// and update `Zero`/`Negative` from the result (spec.md §4.4 — shifts, `INC`/`DEC`
    /// affect these flags even when the target is memory, not just the accumulator).
    pub fn modify(&self, cpu: &mut MOS6502, bus: &mut impl Bus, f: impl FnOnce(u8) -> u8) -> (u8, u8) {
        let input = self.read(cpu, bus);
        let output = f(input);
        self.write(cpu, bus, output);
        cpu.p.set_zero_negative(output);
        (input, output)
    }
}

fn pages_differ(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}
