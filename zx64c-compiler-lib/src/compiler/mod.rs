//! Emits Z80 assembly for a type-checked program.
//!
//! Values live in `a`. Binary operators spill their left operand to the stack and recover it into
//! `b` once the right operand is in `a`. Every `let` and every assignment to a new name pushes
//! `af`, so variables are read back at their offset plus one, the byte holding `a`. Assigning to a
//! name that already has a slot overwrites that byte in place.

pub mod environment;

use thiserror::Error;
use tracing::{debug, trace};
use z80asm::{
    Directive, Instruction, Label, Listing, ListingBuilder, ListingError, Register, RegisterPair,
};

use crate::{
    ENTRY_POINT,
    parser::ast::{Expression, ExpressionKind, Function, Program, Statement, StatementKind},
};
use environment::{Environment, WORD_SIZE};

/// Load address of the program, the start of uncontended RAM on a 48K Spectrum.
pub const ORIGIN: u16 = 0x8000;
/// ROM restart that prints the character code held in `a`.
const PRINT_RESTART: u8 = 0x10;
const START_LABEL: &str = "start";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Variable `{0}` has no stack slot")]
    UnknownVariable(String),
    #[error("Variable `{name}` is {offset} bytes from the stack top, out of indexed addressing range")]
    FrameTooLarge { name: String, offset: i32 },
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// # Errors
/// Fails on programs that did not pass analysis, or whose frames outgrow indexed addressing
pub fn generate(program: &Program) -> Result<Listing, CodegenError> {
    let mut generator = CodeGenerator::new();
    generator.program(program)?;

    let listing = generator.into_listing()?;
    debug!(lines = listing.lines().len(), "generated listing");

    Ok(listing)
}

/// Same as [`generate`], wrapped so that sjasmplus also writes `<source_name>.sna`.
///
/// # Errors
/// See [`generate`]
pub fn generate_snapshot(program: &Program, source_name: &str) -> Result<Listing, CodegenError> {
    Ok(generate(program)?.into_snapshot(source_name, Label::new(START_LABEL)))
}

#[derive(Debug, Default)]
pub struct CodeGenerator {
    builder: ListingBuilder,
    environment: Environment,
}

impl CodeGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// # Errors
    /// Returns an error if a label was defined twice, e.g. a function called `start`
    pub fn into_listing(self) -> Result<Listing, CodegenError> {
        Ok(self.builder.build()?)
    }

    /// # Errors
    /// See [`generate`]
    pub fn program(&mut self, program: &Program) -> Result<(), CodegenError> {
        self.builder.directive(Directive::Origin(ORIGIN));
        self.builder.blank();
        self.builder.label(Label::new(START_LABEL));
        self.builder.emit(Instruction::Call(Label::new(ENTRY_POINT)));
        self.builder.emit(Instruction::Return);

        for function in &program.functions {
            self.builder.blank();
            self.function(function)?;
        }

        Ok(())
    }

    /// # Errors
    /// See [`generate`]
    pub fn function(&mut self, function: &Function) -> Result<(), CodegenError> {
        trace!(name = %function.name, "generating function");

        self.environment = Environment::new();
        for parameter in &function.parameters {
            self.environment.add_parameter(parameter.name.as_str());
        }
        // return address
        self.environment.shift(WORD_SIZE);

        self.builder.label(Label::new(function.name.as_str()));
        for statement in &function.body.statements {
            self.statement(statement)?;
        }

        self.pop_slots(self.environment.local_slots());
        self.builder.emit(Instruction::Return);

        Ok(())
    }

    /// # Errors
    /// See [`generate`]
    pub fn statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match &statement.kind {
            StatementKind::Expression(expression) => self.expression(expression)?,
            StatementKind::Print(value) => {
                self.expression(value)?;
                self.builder.emit(Instruction::Restart(PRINT_RESTART));
            }
            StatementKind::Assignment { name, rhs } => {
                self.expression(rhs)?;

                if self.environment.get_variable_offset(name).is_some() {
                    self.write_variable(name)?;
                } else {
                    self.push_local(name);
                }
            }
            StatementKind::Let { name, value, .. } => {
                self.expression(value)?;
                self.push_local(name);
            }
            StatementKind::Return(value) => {
                self.expression(value)?;
                self.pop_slots(self.environment.local_slots());
                self.builder.emit(Instruction::Return);
            }
            StatementKind::If { condition, body } => {
                self.expression(condition)?;
                self.builder.emit(Instruction::Or(Register::A));

                let end = self.builder.fresh_label("if_end");
                self.builder.emit(Instruction::JumpIfZero(end.clone()));

                let outer = self.environment.clone();
                for statement in &body.statements {
                    self.statement(statement)?;
                }
                self.pop_slots(self.environment.local_slots() - outer.local_slots());
                self.environment = outer;

                self.builder.label(end);
            }
        }

        Ok(())
    }

    /// Leaves the value of `expression` in `a`.
    ///
    /// # Errors
    /// See [`generate`]
    pub fn expression(&mut self, expression: &Expression) -> Result<(), CodegenError> {
        match &expression.kind {
            ExpressionKind::Unsignedint(value) => {
                self.builder
                    .emit(Instruction::LoadImmediate(Register::A, *value));
            }
            ExpressionKind::Bool(value) => {
                self.builder
                    .emit(Instruction::LoadImmediate(Register::A, u8::from(*value)));
            }
            ExpressionKind::Identifier(name) => self.read_variable(name)?,
            ExpressionKind::Negation(operand) => {
                self.expression(operand)?;
                self.builder.emit(Instruction::Negate);
            }
            ExpressionKind::Addition(lhs, rhs) => {
                self.binary_operands(lhs, rhs)?;
                self.builder.emit(Instruction::Add(Register::B));
            }
            ExpressionKind::Subtraction(lhs, rhs) => {
                self.binary_operands(lhs, rhs)?;
                self.builder.emit(Instruction::Load(Register::C, Register::A));
                self.builder.emit(Instruction::Load(Register::A, Register::B));
                self.builder.emit(Instruction::Subtract(Register::C));
            }
            ExpressionKind::NotEqual(lhs, rhs) => {
                self.binary_operands(lhs, rhs)?;
                self.emit_not_equal();
            }
            ExpressionKind::Equal(lhs, rhs) => {
                self.binary_operands(lhs, rhs)?;
                self.emit_not_equal();
                self.builder.emit(Instruction::XorImmediate(1));
            }
            ExpressionKind::FunctionCall { name, arguments } => {
                for argument in arguments {
                    self.expression(argument)?;
                    self.push_anonymous();
                }

                self.builder.emit(Instruction::Call(Label::new(name.as_str())));

                for _ in arguments {
                    self.pop_anonymous();
                }
            }
        }

        Ok(())
    }

    /// Leaves `rhs` in `a` and `lhs` in `b`.
    fn binary_operands(&mut self, lhs: &Expression, rhs: &Expression) -> Result<(), CodegenError> {
        self.expression(lhs)?;
        self.push_anonymous();
        self.expression(rhs)?;
        self.pop_anonymous();

        Ok(())
    }

    // `neg` sets carry iff `a` was not zero, and `ld` keeps the flags.
    fn emit_not_equal(&mut self) {
        self.builder.emit(Instruction::Subtract(Register::B));
        self.builder.emit(Instruction::Negate);
        self.builder.emit(Instruction::LoadImmediate(Register::A, 0));
        self.builder.emit(Instruction::AddWithCarry(Register::A));
    }

    fn push_local(&mut self, name: &str) {
        self.builder.emit(Instruction::Push(RegisterPair::AF));
        self.environment.add_variable(name);
    }

    fn push_anonymous(&mut self) {
        self.builder.emit(Instruction::Push(RegisterPair::AF));
        self.environment.shift(WORD_SIZE);
    }

    fn pop_anonymous(&mut self) {
        self.builder.emit(Instruction::Pop(RegisterPair::BC));
        self.environment.shift(-WORD_SIZE);
    }

    /// Drops `count` pushed words without touching `a`.
    fn pop_slots(&mut self, count: usize) {
        for _ in 0..count {
            self.builder.emit(Instruction::Pop(RegisterPair::BC));
        }
    }

    fn read_variable(&mut self, name: &str) -> Result<(), CodegenError> {
        let displacement = self.displacement_of(name)?;
        self.index_stack_top();
        self.builder
            .emit(Instruction::LoadIndexed(Register::A, displacement));

        Ok(())
    }

    fn write_variable(&mut self, name: &str) -> Result<(), CodegenError> {
        let displacement = self.displacement_of(name)?;
        self.index_stack_top();
        self.builder
            .emit(Instruction::StoreIndexed(displacement, Register::A));

        Ok(())
    }

    /// Displacement from `ix` to the byte of `name`'s slot that holds `a`.
    fn displacement_of(&self, name: &str) -> Result<i8, CodegenError> {
        let offset = self
            .environment
            .get_variable_offset(name)
            .ok_or_else(|| CodegenError::UnknownVariable(name.to_string()))?;

        i8::try_from(offset + 1).map_err(|_| CodegenError::FrameTooLarge {
            name: name.to_string(),
            offset,
        })
    }

    // Leaves `a` and the stack untouched.
    fn index_stack_top(&mut self) {
        self.builder
            .emit(Instruction::LoadPairImmediate(RegisterPair::HL, 0));
        self.builder
            .emit(Instruction::AddPair(RegisterPair::HL, RegisterPair::SP));
        self.builder
            .emit(Instruction::LoadPair(RegisterPair::IX, RegisterPair::HL));
    }
}
