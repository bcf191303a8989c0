use std::collections::HashMap;

/// Bytes taken by one `push`.
pub const WORD_SIZE: i32 = 2;

/// Maps variables to their byte offset from the current stack pointer.
///
/// There is no frame pointer, so every push moves all known variables one word further away from
/// the stack top. The newest variable always sits at offset 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    variable_offsets: HashMap<String, i32>,
    local_slots: usize,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a local that was just pushed. Counts towards the slots popped on return.
    pub fn add_variable(&mut self, name: impl Into<String>) {
        self.bind_pushed(name.into());
        self.local_slots += 1;
    }

    /// Records an argument the caller pushed, which the caller also pops.
    pub fn add_parameter(&mut self, name: impl Into<String>) {
        self.bind_pushed(name.into());
    }

    fn bind_pushed(&mut self, name: String) {
        self.variable_offsets.insert(name, -WORD_SIZE);
        self.shift(WORD_SIZE);
    }

    /// Moves every variable by `bytes`, for pushes and pops that bind no name.
    pub fn shift(&mut self, bytes: i32) {
        for offset in self.variable_offsets.values_mut() {
            *offset += bytes;
        }
    }

    #[must_use]
    pub fn get_variable_offset(&self, name: &str) -> Option<i32> {
        self.variable_offsets.get(name).copied()
    }

    /// Number of locals pushed in the current function that are still on the stack.
    #[must_use]
    pub const fn local_slots(&self) -> usize {
        self.local_slots
    }
}
