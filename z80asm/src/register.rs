use std::fmt::Display;

/// 8-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    B,
    C,
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "a"),
            Self::B => write!(f, "b"),
            Self::C => write!(f, "c"),
        }
    }
}

/// 16-bit register pairs, including the stack pointer and the index register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterPair {
    AF,
    BC,
    HL,
    SP,
    IX,
}

impl Display for RegisterPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AF => write!(f, "af"),
            Self::BC => write!(f, "bc"),
            Self::HL => write!(f, "hl"),
            Self::SP => write!(f, "sp"),
            Self::IX => write!(f, "ix"),
        }
    }
}
