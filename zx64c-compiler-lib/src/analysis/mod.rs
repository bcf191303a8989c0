pub mod environment;
pub mod type_check;
pub mod types;

use thiserror::Error;
use tracing::debug;

use crate::{analysis::type_check::TypecheckError, parser::ast};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("type check failed:\n{0}")]
    TypeCheck(#[from] TypecheckError),
}

impl AnalysisError {
    /// Every individual diagnostic, one per line of user-facing output.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::TypeCheck(error) => error.leaves().map(ToString::to_string).collect(),
        }
    }
}

/// # Errors
/// Returns an error if the program is not well-formed
pub fn analyse(program: &ast::Program) -> Result<(), AnalysisError> {
    type_check::type_check(program)?;

    debug!("analysis passed");

    Ok(())
}
