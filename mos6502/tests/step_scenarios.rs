//! Black-box tests exercising only the public `mos6502` API (`MOS6502`,
//! `RamBus`, `Bus`, `StatusFlag`) — no access to crate-internal fields.
//! Complements the `#[cfg(test)]` unit tests colocated with each module,
//! which check internal helpers directly.

use mos6502::{Bus, RamBus, StatusFlag, MOS6502};

fn cpu_stepped_n_times(program: &[u8], steps: usize) -> (MOS6502, RamBus) {
    let mut bus = RamBus::new().with_program(program);
    let mut cpu = MOS6502::new(&bus);
    for _ in 0..steps {
        cpu.step(&mut bus);
    }
    (cpu, bus)
}

#[test]
fn pha_pla_round_trips_any_byte_without_other_stack_activity() {
    for b in [0x00u8, 0x01, 0x7F, 0x80, 0xFF] {
        let (cpu, _bus) = cpu_stepped_n_times(&[0xA9, b, 0x48, 0xA9, 0x00, 0x68], 4);
        assert_eq!(cpu.a, b);
    }
}

#[test]
fn lda_immediate_sets_zero_and_negative_for_every_byte() {
    for b in 0u8..=255 {
        let mut bus = RamBus::new().with_program(&[0xA9, b]);
        let mut cpu = MOS6502::new(&bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.p.get(StatusFlag::Zero), b == 0, "b = {b:#04X}");
        assert_eq!(cpu.p.get(StatusFlag::Negative), (b & 0x80) != 0, "b = {b:#04X}");
    }
}

#[test]
fn step_never_leaves_unused_flag_clear() {
    let (cpu, _) = cpu_stepped_n_times(&[0xA9, 0x00, 0x18, 0x38, 0xEA], 4);
    assert!(cpu.p.get(StatusFlag::Unused));
}

#[test]
fn reset_twice_in_a_row_is_idempotent() {
    let bus = RamBus::new().with_program(&[0xEA]);
    let mut cpu = MOS6502::new(&bus);
    cpu.reset(&bus);
    let after_one_reset = cpu;
    cpu.reset(&bus);
    assert_eq!(cpu.a, after_one_reset.a);
    assert_eq!(cpu.x, after_one_reset.x);
    assert_eq!(cpu.y, after_one_reset.y);
    assert_eq!(cpu.sp, after_one_reset.sp);
    assert_eq!(cpu.pc, after_one_reset.pc);
}

#[test]
fn zero_page_x_wraps_at_page_boundary() {
    // LDX #$01; LDA #$42; STA $FF,X -- stores into $00, not $0100.
    let mut bus = RamBus::new().with_program(&[0xA2, 0x01, 0xA9, 0x42, 0x95, 0xFF]);
    let mut cpu = MOS6502::new(&bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(bus.read_u8(0x0000), 0x42);
    assert_eq!(bus.read_u8(0x0100), 0x00);
}

#[test]
fn brk_reports_its_opcode_byte_through_step_outcome() {
    let mut bus = RamBus::new().with_program(&[0x00]);
    let mut cpu = MOS6502::new(&bus);
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.opcode_or_brk(), 0x00);
}
