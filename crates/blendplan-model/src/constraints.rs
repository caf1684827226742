use blendplan_solver::{ConstraintOp, LinearExpr, LpProblem};

use crate::data::ProblemData;
use crate::variables::VariableStore;

/// Emits the inventory, demand, and quality constraints of the blending model
pub struct ConstraintGenerator<'a> {
    data: &'a ProblemData,
    vars: &'a VariableStore,
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(data: &'a ProblemData, vars: &'a VariableStore) -> Self {
        Self { data, vars }
    }

    pub fn emit(&self, lp: &mut LpProblem) {
        self.opening_inventory(lp);
        self.production(lp);
        self.inventory_balance(lp);
        self.tankage_limits(lp);
        self.quality(lp);
    }

    /// hold[j][0] = opening inventory
    fn opening_inventory(&self, lp: &mut LpProblem) {
        for (j, b) in self.data.blendstocks().iter().enumerate() {
            lp.add_constraint(
                format!("opening_inventory[{}]", b.name),
                LinearExpr::new().with(self.vars.hold(j, 0), 1.0),
                ConstraintOp::Eq,
                b.opening_inventory,
            );
        }
    }

    /// produced[k][i] = sum_j blend[k][j][i], and produced[k][i] >= demand
    fn production(&self, lp: &mut LpProblem) {
        let blendstocks = self.data.blendstocks().len();

        for (k, p) in self.data.products().iter().enumerate() {
            for i in self.data.periods() {
                let produced = self.vars.produced(k, i);

                let mut balance = LinearExpr::new().with(produced, 1.0);
                balance.extend((0..blendstocks).map(|j| (self.vars.blend(k, j, i), -1.0)));
                lp.add_constraint(format!("produced[{}][{}]", p.name, i), balance, ConstraintOp::Eq, 0.0);

                lp.add_constraint(
                    format!("demand[{}][{}]", p.name, i),
                    LinearExpr::new().with(produced, 1.0),
                    ConstraintOp::Ge,
                    self.data.demand(),
                );
            }
        }
    }

    /// hold[j][i] + buy[j][i] - sum_k blend[k][j][i] carries into hold[j][i+1].
    ///
    /// The last period has nothing to carry into; its consumption is only
    /// capped by what is on hand (closing stock >= 0).
    fn inventory_balance(&self, lp: &mut LpProblem) {
        let products = self.data.products().len();
        let last = self.data.last_period();

        for (j, b) in self.data.blendstocks().iter().enumerate() {
            for i in self.data.periods() {
                let mut available = LinearExpr::new()
                    .with(self.vars.hold(j, i), 1.0)
                    .with(self.vars.buy(j, i), 1.0);
                available.extend((0..products).map(|k| (self.vars.blend(k, j, i), -1.0)));

                if i < last {
                    available.add(self.vars.hold(j, i + 1), -1.0);
                    lp.add_constraint(
                        format!("inventory_balance[{}][{}]", b.name, i),
                        available,
                        ConstraintOp::Eq,
                        0.0,
                    );
                } else {
                    lp.add_constraint(
                        format!("closing_stock[{}][{}]", b.name, i),
                        available,
                        ConstraintOp::Ge,
                        0.0,
                    );
                }
            }
        }
    }

    /// SL_min <= sum_j hold[j][i] <= SL_max
    fn tankage_limits(&self, lp: &mut LpProblem) {
        let tankage = self.data.tankage();
        let blendstocks = self.data.blendstocks().len();

        for i in self.data.periods() {
            let held: LinearExpr = (0..blendstocks).map(|j| (self.vars.hold(j, i), 1.0)).collect();
            lp.add_constraint(format!("tankage_min[{}]", i), held.clone(), ConstraintOp::Ge, tankage.min);
            lp.add_constraint(format!("tankage_max[{}]", i), held, ConstraintOp::Le, tankage.max);
        }
    }

    /// quality[l][k][i] = sum_j blend[k][j][i] * q[j][l], banded by the product's
    /// min/max ratio times produced[k][i] so the bound stays linear
    fn quality(&self, lp: &mut LpProblem) {
        let blendstocks = self.data.blendstocks();

        for i in self.data.periods() {
            for (k, p) in self.data.products().iter().enumerate() {
                let produced = self.vars.produced(k, i);

                for (l, s) in self.data.specs().iter().enumerate() {
                    let quality = self.vars.blended_quality(l, k, i);

                    let mut accounting = LinearExpr::new().with(quality, 1.0);
                    accounting.extend(
                        blendstocks
                            .iter()
                            .enumerate()
                            .map(|(j, b)| (self.vars.blend(k, j, i), -b.quality[l])),
                    );
                    lp.add_constraint(
                        format!("quality[{}][{}][{}]", s.name, p.name, i),
                        accounting,
                        ConstraintOp::Eq,
                        0.0,
                    );

                    lp.add_constraint(
                        format!("quality_min[{}][{}][{}]", s.name, p.name, i),
                        LinearExpr::new().with(quality, 1.0).with(produced, -p.quality_min[l]),
                        ConstraintOp::Ge,
                        0.0,
                    );
                    lp.add_constraint(
                        format!("quality_max[{}][{}][{}]", s.name, p.name, i),
                        LinearExpr::new().with(quality, 1.0).with(produced, -p.quality_max[l]),
                        ConstraintOp::Le,
                        0.0,
                    );
                }
            }
        }
    }
}
