use std::fmt::Display;

use crate::register::{Register, RegisterPair};

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Label(String);

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assembler directives understood by sjasmplus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Origin(u16),
    Device(String),
    /// Writes a `.sna` snapshot that starts executing at the given label.
    SaveSnapshot { file_name: String, start: Label },
}

impl Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin(address) => write!(f, "org ${address:04X}"),
            Self::Device(name) => write!(f, "DEVICE {name}"),
            Self::SaveSnapshot { file_name, start } => {
                write!(f, "SAVESNA \"{file_name}\", {start}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `ld r, n`
    LoadImmediate(Register, u8),
    /// `ld r, r'`
    Load(Register, Register),
    /// `ld rr, nn`, rendered in hex
    LoadPairImmediate(RegisterPair, u16),
    /// `ld rr, rr'`; `ld ix, hl` is an sjasmplus fake instruction
    LoadPair(RegisterPair, RegisterPair),
    /// `ld r, (ix + d)`
    LoadIndexed(Register, i8),
    /// `ld (ix + d), r`
    StoreIndexed(i8, Register),
    /// `add rr, rr'`
    AddPair(RegisterPair, RegisterPair),
    /// `add a, r`
    Add(Register),
    /// `adc a, r`
    AddWithCarry(Register),
    /// `sub r`
    Subtract(Register),
    /// `or r`
    Or(Register),
    /// `xor n`
    XorImmediate(u8),
    Negate,
    Push(RegisterPair),
    Pop(RegisterPair),
    Call(Label),
    /// `jp z, label`
    JumpIfZero(Label),
    Restart(u8),
    Return,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadImmediate(register, value) => write!(f, "ld {register}, {value}"),
            Self::Load(target, source) => write!(f, "ld {target}, {source}"),
            Self::LoadPairImmediate(pair, value) => write!(f, "ld {pair}, ${value:02X}"),
            Self::LoadPair(target, source) => write!(f, "ld {target}, {source}"),
            Self::LoadIndexed(register, displacement) => {
                write!(f, "ld {register}, {}", IndexedAddress(*displacement))
            }
            Self::StoreIndexed(displacement, register) => {
                write!(f, "ld {}, {register}", IndexedAddress(*displacement))
            }
            Self::AddPair(target, source) => write!(f, "add {target}, {source}"),
            Self::Add(register) => write!(f, "add a, {register}"),
            Self::AddWithCarry(register) => write!(f, "adc a, {register}"),
            Self::Subtract(register) => write!(f, "sub {register}"),
            Self::Or(register) => write!(f, "or {register}"),
            Self::XorImmediate(value) => write!(f, "xor {value}"),
            Self::Negate => write!(f, "neg"),
            Self::Push(pair) => write!(f, "push {pair}"),
            Self::Pop(pair) => write!(f, "pop {pair}"),
            Self::Call(label) => write!(f, "call {label}"),
            Self::JumpIfZero(label) => write!(f, "jp z, {label}"),
            Self::Restart(vector) => write!(f, "rst ${vector:02X}"),
            Self::Return => write!(f, "ret"),
        }
    }
}

/// `(ix + d)` with the sign of `d` spelled out.
struct IndexedAddress(i8);

impl Display for IndexedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "(ix - {})", self.0.unsigned_abs())
        } else {
            write!(f, "(ix + {})", self.0)
        }
    }
}
