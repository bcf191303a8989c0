use std::{collections::HashSet, fmt::Display};

use thiserror::Error;

use crate::{
    INDENTATION,
    instruction::{Directive, Instruction, Label},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("Label `{0}` is defined more than once")]
    DuplicateLabel(Label),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Directive(Directive),
    Label(Label),
    Instruction(Instruction),
    Blank,
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directive(directive) => write!(f, "{INDENTATION}{directive}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Instruction(instruction) => write!(f, "{INDENTATION}{instruction}"),
            Self::Blank => Ok(()),
        }
    }
}

/// A finished, ordered sequence of assembly lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub struct Listing {
    lines: Vec<Line>,
}

impl Listing {
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Only the instructions, without labels, directives or blank lines.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.lines.iter().filter_map(|line| match line {
            Line::Instruction(instruction) => Some(instruction),
            _ => None,
        })
    }

    #[must_use]
    pub fn to_text_lines(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    /// Wraps the listing so that sjasmplus writes a ZX Spectrum 48K snapshot starting at `start`.
    pub fn into_snapshot(self, source_name: &str, start: Label) -> Self {
        let mut lines = Vec::with_capacity(self.lines.len() + 3);

        lines.push(Line::Directive(Directive::Device("ZXSPECTRUM48".to_string())));
        lines.extend(self.lines);
        lines.push(Line::Blank);
        lines.push(Line::Directive(Directive::SaveSnapshot {
            file_name: format!("{source_name}.sna"),
            start,
        }));

        Self { lines }
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

/// Collects lines in emission order and hands out unique generated labels.
#[derive(Debug, Default)]
pub struct ListingBuilder {
    lines: Vec<Line>,
    defined_labels: HashSet<Label>,
    duplicate_label: Option<Label>,
    next_label_id: usize,
}

impl ListingBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directive(&mut self, directive: Directive) {
        self.lines.push(Line::Directive(directive));
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.lines.push(Line::Instruction(instruction));
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::Blank);
    }

    /// Places `label` at the current position. Defining a label twice is reported by `build`.
    pub fn label(&mut self, label: Label) {
        if !self.defined_labels.insert(label.clone()) && self.duplicate_label.is_none() {
            self.duplicate_label = Some(label.clone());
        }

        self.lines.push(Line::Label(label));
    }

    /// Returns a label named `<prefix>_<n>` where `n` is unique within this listing.
    pub fn fresh_label(&mut self, prefix: &str) -> Label {
        let label = Label::new(format!("{prefix}_{}", self.next_label_id));
        self.next_label_id += 1;

        label
    }

    /// # Errors
    /// Returns an error if any label was defined more than once
    pub fn build(self) -> Result<Listing, ListingError> {
        if let Some(label) = self.duplicate_label {
            return Err(ListingError::DuplicateLabel(label));
        }

        Ok(Listing { lines: self.lines })
    }
}
