use blendplan_solver::{ConstraintOp, LinearExpr, LpProblem};

use crate::data::ProblemData;
use crate::variables::VariableStore;

/// Defines purchase_cost[i] = sum_j buy[j][i] * cost[j][i] and minimizes
/// the sum over periods.
///
/// Only purchases are priced. Holding inventory and blending product cost
/// nothing in this model, so `Hold`, `Blend`, and `Produced` never enter the
/// objective.
pub fn compose_objective(data: &ProblemData, vars: &VariableStore, lp: &mut LpProblem) {
    for i in data.periods() {
        let mut spend = LinearExpr::new().with(vars.purchase_cost(i), 1.0);
        spend.extend(
            data.blendstocks()
                .iter()
                .enumerate()
                .map(|(j, b)| (vars.buy(j, i), -b.cost[i])),
        );
        lp.add_constraint(format!("purchase_cost[{}]", i), spend, ConstraintOp::Eq, 0.0);
    }

    let total: LinearExpr = data.periods().map(|i| (vars.purchase_cost(i), 1.0)).collect();
    lp.set_objective(total, true);
}
