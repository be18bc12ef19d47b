pub const NMI_VECTOR_ADDRESS: u16 = 0xFFFA;
pub const RESET_VECTOR_ADDRESS: u16 = 0xFFFC;
pub const IRQ_VECTOR_ADDRESS: u16 = 0xFFFE;

/// A latch set by external collaborators (`trigger_nmi`/`trigger_irq`) and cleared
/// by [`crate::MOS6502::step`] at instruction boundaries only.
///
/// Unlike real 6502 hardware (where NMI and IRQ are independent lines) this models
/// a single pending slot, per spec: a later `trigger_nmi` always escalates over a
/// pending IRQ, since NMI has priority and is edge-triggered.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default)]
pub enum PendingInterrupt {
    #[default]
    None,
    Nmi,
    Irq,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub(crate) enum InterruptKind {
    Nmi,
    Irq,
    Brk,
}

impl InterruptKind {
    pub fn vector_address(&self) -> u16 {
        match self {
            InterruptKind::Nmi => NMI_VECTOR_ADDRESS,
            InterruptKind::Irq => IRQ_VECTOR_ADDRESS,
            InterruptKind::Brk => IRQ_VECTOR_ADDRESS,
        }
    }
}
