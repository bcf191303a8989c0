pub mod analysis;
pub mod compiler;
pub mod parser;
pub mod scanner;
pub mod token;

/// The function the program preamble calls.
pub const ENTRY_POINT: &str = "main";
