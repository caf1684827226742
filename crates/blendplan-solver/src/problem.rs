use thiserror::Error;

use crate::solution::ConstraintViolation;

/// Handle to a variable registered with an [`LpProblem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in the problem's variable pool
    pub fn index(self) -> usize {
        self.0
    }
}

/// A decision variable with bounds
#[derive(Debug, Clone)]
pub struct Variable {
    /// Name used in diagnostics
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// Sparse linear expression: sum of coefficient * variable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn with(mut self, var: VarId, coefficient: f64) -> Self {
        self.add(var, coefficient);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression for the given variable values
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl Extend<(VarId, f64)> for LinearExpr {
    fn extend<I: IntoIterator<Item = (VarId, f64)>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

/// Represents a linear programming problem
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Variable pool, indexed by [`VarId`]
    pub variables: Vec<Variable>,
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Objective {
    pub expr: LinearExpr,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    pub expr: LinearExpr,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// Structural defects that make a problem unsolvable before any engine runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Constraint {constraint} references unknown variable #{index}")]
    UnknownVariable { constraint: String, index: usize },
    #[error("Non-finite coefficient in {0}")]
    NonFiniteCoefficient(String),
    #[error("Non-finite right-hand side in {0}")]
    NonFiniteRhs(String),
    #[error("Variable {name} has lower bound {lower} above upper bound {upper}")]
    InvertedBounds { name: String, lower: f64, upper: f64 },
}

impl Default for LpProblem {
    fn default() -> Self {
        Self::new()
    }
}

impl LpProblem {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            objective: Objective {
                expr: LinearExpr::new(),
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    /// Register a variable with the given bounds and return its handle
    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    pub fn set_objective(&mut self, expr: LinearExpr, minimize: bool) {
        self.objective = Objective { expr, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, expr: LinearExpr, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Dense objective coefficients, one per variable, with repeated terms summed
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.variables.len()];
        for &(var, coef) in &self.objective.expr.terms {
            if let Some(slot) = coefficients.get_mut(var.0) {
                *slot += coef;
            }
        }
        coefficients
    }

    /// Check that every expression references registered variables and that all numbers are finite
    pub fn validate(&self) -> Result<(), ModelError> {
        for v in &self.variables {
            if v.lower > v.upper {
                return Err(ModelError::InvertedBounds {
                    name: v.name.clone(),
                    lower: v.lower,
                    upper: v.upper,
                });
            }
        }

        let named = std::iter::once(("objective", &self.objective.expr))
            .chain(self.constraints.iter().map(|c| (c.name.as_str(), &c.expr)));
        for (name, expr) in named {
            for &(var, coef) in &expr.terms {
                if var.0 >= self.variables.len() {
                    return Err(ModelError::UnknownVariable {
                        constraint: name.to_string(),
                        index: var.0,
                    });
                }
                if !coef.is_finite() {
                    return Err(ModelError::NonFiniteCoefficient(name.to_string()));
                }
            }
        }

        for c in &self.constraints {
            if !c.rhs.is_finite() {
                return Err(ModelError::NonFiniteRhs(c.name.clone()));
            }
        }

        Ok(())
    }

    /// Find which constraints are violated by a given assignment, worst first.
    ///
    /// `tolerance` is relative: each row allows `tolerance * max(1, |rhs|, sum |coef * value|)`.
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for c in &self.constraints {
            let lhs = c.expr.evaluate(values);
            let magnitude: f64 = c
                .expr
                .terms
                .iter()
                .map(|&(var, coef)| (coef * values.get(var.0).copied().unwrap_or(0.0)).abs())
                .sum();
            let tolerance = tolerance * magnitude.max(c.rhs.abs()).max(1.0);

            let (violation_amount, description) = match c.op {
                ConstraintOp::Le if lhs > c.rhs + tolerance => {
                    let amt = lhs - c.rhs;
                    (amt, format!("{} exceeds maximum of {:.4} by {:.4}", c.name, c.rhs, amt))
                }
                ConstraintOp::Ge if lhs < c.rhs - tolerance => {
                    let amt = c.rhs - lhs;
                    (amt, format!("{} is below minimum of {:.4} by {:.4}", c.name, c.rhs, amt))
                }
                ConstraintOp::Eq if (lhs - c.rhs).abs() > tolerance => (
                    (lhs - c.rhs).abs(),
                    format!("{} requires exactly {:.4} but got {:.4}", c.name, c.rhs, lhs),
                ),
                _ => continue,
            };

            violations.push(ConstraintViolation {
                constraint: c.name.clone(),
                required: c.rhs,
                actual: lhs,
                violation_amount,
                description,
            });
        }

        for (j, v) in self.variables.iter().enumerate() {
            let value = values.get(j).copied().unwrap_or(0.0);
            let tolerance = tolerance * value.abs().max(1.0);
            if value < v.lower - tolerance {
                violations.push(ConstraintViolation {
                    constraint: format!("{}_lower", v.name),
                    required: v.lower,
                    actual: value,
                    violation_amount: v.lower - value,
                    description: format!("{} is below its lower bound {:.4}", v.name, v.lower),
                });
            } else if value > v.upper + tolerance {
                violations.push(ConstraintViolation {
                    constraint: format!("{}_upper", v.name),
                    required: v.upper,
                    actual: value,
                    violation_amount: value - v.upper,
                    description: format!("{} is above its upper bound {:.4}", v.name, v.upper),
                });
            }
        }

        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        violations
    }
}
