use std::collections::BTreeMap;

use microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::problem::{ConstraintOp, LinearExpr, LpProblem};
use crate::solution::Solution;

/// A linear-programming engine: takes an assembled problem, reports status and values
pub trait Engine {
    fn solve(&self, problem: &LpProblem) -> Solution;
}

/// Engine backed by the `microlp` simplex implementation
pub struct Solver {
    /// Tolerance for constraints that collapse to `0 op rhs`
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Merge repeated variables and drop zero coefficients
    fn collapse(expr: &LinearExpr) -> BTreeMap<usize, f64> {
        let mut merged = BTreeMap::new();
        for &(var, coef) in &expr.terms {
            *merged.entry(var.index()).or_insert(0.0) += coef;
        }
        merged.retain(|_, coef| *coef != 0.0);
        merged
    }

    /// An empty row reads `0 op rhs`; the engine cannot take it, so decide it here
    fn empty_row_holds(&self, op: ConstraintOp, rhs: f64) -> bool {
        match op {
            ConstraintOp::Le => 0.0 <= rhs + self.tolerance,
            ConstraintOp::Ge => 0.0 >= rhs - self.tolerance,
            ConstraintOp::Eq => rhs.abs() <= self.tolerance,
        }
    }
}

impl Engine for Solver {
    fn solve(&self, problem: &LpProblem) -> Solution {
        if let Err(e) = problem.validate() {
            return Solution::error(e.to_string());
        }

        let direction = if problem.objective.minimize {
            OptimizationDirection::Minimize
        } else {
            OptimizationDirection::Maximize
        };
        let mut lp = Problem::new(direction);

        let vars: Vec<_> = problem
            .objective_coefficients()
            .into_iter()
            .zip(&problem.variables)
            .map(|(coef, v)| lp.add_var(coef, (v.lower, v.upper)))
            .collect();

        for c in &problem.constraints {
            let terms = Self::collapse(&c.expr);
            if terms.is_empty() {
                if self.empty_row_holds(c.op, c.rhs) {
                    continue;
                }
                return Solution::infeasible();
            }

            let op = match c.op {
                ConstraintOp::Le => ComparisonOp::Le,
                ConstraintOp::Ge => ComparisonOp::Ge,
                ConstraintOp::Eq => ComparisonOp::Eq,
            };
            let expr: Vec<_> = terms.into_iter().map(|(j, coef)| (vars[j], coef)).collect();
            lp.add_constraint(expr, op, c.rhs);
        }

        match lp.solve() {
            Ok(solution) => {
                let values = vars.iter().map(|&v| *solution.var_value(v)).collect();
                Solution::optimal(values, solution.objective())
            }
            Err(microlp::Error::Infeasible) => Solution::infeasible(),
            Err(microlp::Error::Unbounded) => Solution::unbounded(),
            Err(microlp::Error::InternalError(msg)) => Solution::error(msg),
        }
    }
}
