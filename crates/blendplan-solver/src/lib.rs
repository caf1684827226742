mod engine;
mod problem;
mod solution;

pub use engine::{Engine, Solver};
pub use problem::{Constraint, ConstraintOp, LinearExpr, LpProblem, ModelError, Objective, VarId, Variable};
pub use solution::{ConstraintViolation, Solution, SolutionStatus};
