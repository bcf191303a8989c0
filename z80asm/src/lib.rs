//! A typed model of the slice of Z80 assembly the compiler emits, rendered as
//! sjasmplus source lines.

pub mod instruction;
pub mod listing;
pub mod register;

pub use instruction::{Directive, Instruction, Label};
pub use listing::{Line, Listing, ListingBuilder, ListingError};
pub use register::{Register, RegisterPair};

/// Indentation put in front of every directive and instruction line.
pub const INDENTATION: &str = "    ";
