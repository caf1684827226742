use blendplan_solver::{ConstraintViolation, LpProblem, Solution};
use tracing::debug;

use crate::constraints::ConstraintGenerator;
use crate::data::ProblemData;
use crate::objective::compose_objective;
use crate::variables::VariableStore;

/// The assembled LP for one planning run, ready for an engine
#[derive(Debug, Clone)]
pub struct BlendModel {
    pub lp: LpProblem,
    pub vars: VariableStore,
}

impl BlendModel {
    pub fn build(data: &ProblemData) -> Self {
        let mut lp = LpProblem::new();
        let vars = VariableStore::allocate(&mut lp, data);
        ConstraintGenerator::new(data, &vars).emit(&mut lp);
        compose_objective(data, &vars, &mut lp);

        debug!(
            blendstocks = data.blendstocks().len(),
            products = data.products().len(),
            specs = data.specs().len(),
            periods = data.num_periods(),
            variables = lp.num_variables(),
            constraints = lp.num_constraints(),
            "built blend model"
        );

        Self { lp, vars }
    }

    /// Constraints the solution breaks by more than `tolerance`
    pub fn violations(&self, solution: &Solution, tolerance: f64) -> Vec<ConstraintViolation> {
        self.lp.violations(&solution.values, tolerance)
    }
}
