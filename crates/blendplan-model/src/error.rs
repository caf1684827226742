use blendplan_solver::SolutionStatus;
use thiserror::Error;

/// Problems with the input tables, detected before any variable is created
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Table {0} is empty")]
    EmptyTable(&'static str),
    #[error("No quality specs declared")]
    NoSpecs,
    #[error("Row {row} of table {table} has {found} values, expected {expected}")]
    RowWidth {
        table: &'static str,
        row: String,
        expected: usize,
        found: usize,
    },
    #[error("Duplicate name {name} in table {table}")]
    DuplicateName { table: &'static str, name: String },
    #[error("Table {table} names {name}, which is not in table {reference}")]
    UnknownName {
        table: &'static str,
        reference: &'static str,
        name: String,
    },
    #[error("Table {table} is missing a row for {name}")]
    MissingName { table: &'static str, name: String },
    #[error("Non-finite value in row {row} of table {table}")]
    NonFinite { table: &'static str, row: String },
    #[error("Invalid {field}: {reason}")]
    InvalidScalar { field: &'static str, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a planning run that did not produce a report
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("No plan satisfies all constraints")]
    Infeasible,
    #[error("Objective can be decreased without limit")]
    Unbounded,
    #[error("Solver error: {0}")]
    Solver(String),
}

impl PlanError {
    /// Solver status this outcome corresponds to, if the solver ran
    pub fn status(&self) -> Option<SolutionStatus> {
        match self {
            PlanError::InvalidInput(_) => None,
            PlanError::Infeasible => Some(SolutionStatus::Infeasible),
            PlanError::Unbounded => Some(SolutionStatus::Unbounded),
            PlanError::Solver(_) => Some(SolutionStatus::Error),
        }
    }
}
