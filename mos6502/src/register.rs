#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Register {
    A,
    X,
    Y,
    P,
    Sp,
}
