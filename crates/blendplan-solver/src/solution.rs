use crate::problem::VarId;

/// The result of solving an LP problem
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable, indexed by [`VarId`]
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Engine-provided diagnostic text (populated on error)
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// Solver encountered an error
    Error,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SolutionStatus::Optimal => "OPTIMAL",
            SolutionStatus::Infeasible => "INFEASIBLE",
            SolutionStatus::Unbounded => "UNBOUNDED",
            SolutionStatus::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Information about a violated constraint
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            message: None,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values: Vec::new(),
            objective_value: f64::INFINITY,
            message: None,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: f64::NEG_INFINITY,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolutionStatus::Error,
            values: Vec::new(),
            objective_value: f64::NAN,
            message: Some(message.into()),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value of a variable; zero when the solution carries no values
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}
