use blendplan_solver::{Solution, SolutionStatus};
use serde::Serialize;

use crate::data::ProblemData;
use crate::variables::VariableStore;

/// Solved plan: what to buy, hold, and blend in every period
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub status: SolutionStatus,
    pub total_cost: f64,
    pub periods: Vec<PeriodReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub period: usize,
    pub purchase_cost: f64,
    pub blendstocks: Vec<BlendstockReport>,
    pub products: Vec<ProductReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlendstockReport {
    pub name: String,
    /// Inventory carried into the period
    pub held: f64,
    pub bought: f64,
    /// bought * unit cost for the period
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductReport {
    pub name: String,
    pub produced: f64,
    pub blend: Vec<BlendLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlendLine {
    pub blendstock: String,
    pub quantity: f64,
}

/// Engine round-off can leave `-0.0` or `-1e-13` on variables bounded below by 0
fn quantity(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

impl PlanReport {
    /// Read an optimal solution back into a report; `None` for any other status
    pub fn extract(data: &ProblemData, vars: &VariableStore, solution: &Solution) -> Option<Self> {
        if !solution.is_optimal() {
            return None;
        }

        let blendstocks = data.blendstocks();

        let periods = data
            .periods()
            .map(|i| PeriodReport {
                period: i,
                purchase_cost: quantity(solution.value(vars.purchase_cost(i))),
                blendstocks: blendstocks
                    .iter()
                    .enumerate()
                    .map(|(j, b)| {
                        let bought = quantity(solution.value(vars.buy(j, i)));
                        BlendstockReport {
                            name: b.name.clone(),
                            held: quantity(solution.value(vars.hold(j, i))),
                            bought,
                            cost: bought * b.cost[i],
                        }
                    })
                    .collect(),
                products: data
                    .products()
                    .iter()
                    .enumerate()
                    .map(|(k, p)| ProductReport {
                        name: p.name.clone(),
                        produced: quantity(solution.value(vars.produced(k, i))),
                        blend: blendstocks
                            .iter()
                            .enumerate()
                            .map(|(j, b)| BlendLine {
                                blendstock: b.name.clone(),
                                quantity: quantity(solution.value(vars.blend(k, j, i))),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Some(Self {
            status: solution.status,
            total_cost: solution.objective_value,
            periods,
        })
    }

    pub fn period(&self, period: usize) -> Option<&PeriodReport> {
        self.periods.get(period)
    }

    /// Quantity of `product` blended in `period`
    pub fn produced(&self, period: usize, product: &str) -> Option<f64> {
        self.period(period)?.product(product).map(|p| p.produced)
    }

    /// Quantity of `blendstock` consumed into `product` in `period`
    pub fn blended(&self, period: usize, product: &str, blendstock: &str) -> Option<f64> {
        self.period(period)?
            .product(product)?
            .blend
            .iter()
            .find(|line| line.blendstock == blendstock)
            .map(|line| line.quantity)
    }

    /// Sum of bought * cost over all periods and blendstocks
    pub fn purchase_total(&self) -> f64 {
        self.periods
            .iter()
            .flat_map(|p| &p.blendstocks)
            .map(|b| b.cost)
            .sum()
    }
}

impl PeriodReport {
    pub fn product(&self, name: &str) -> Option<&ProductReport> {
        self.products.iter().find(|p| p.name == name)
    }

    pub fn blendstock(&self, name: &str) -> Option<&BlendstockReport> {
        self.blendstocks.iter().find(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use blendplan_solver::LpProblem;

    use super::*;
    use crate::testing::two_period_tables;

    #[test]
    fn test_non_optimal_yields_no_report() {
        let data = two_period_tables().build().unwrap();
        let mut lp = LpProblem::new();
        let vars = VariableStore::allocate(&mut lp, &data);

        assert!(PlanReport::extract(&data, &vars, &Solution::infeasible()).is_none());
        assert!(PlanReport::extract(&data, &vars, &Solution::unbounded()).is_none());
        assert!(PlanReport::extract(&data, &vars, &Solution::error("boom")).is_none());
    }

    #[test]
    fn test_extract_reads_values_by_key() {
        let data = two_period_tables().build().unwrap();
        let mut lp = LpProblem::new();
        let vars = VariableStore::allocate(&mut lp, &data);

        let mut values = vec![0.0; lp.num_variables()];
        values[vars.produced(0, 1).index()] = 12.0;
        values[vars.blend(0, 0, 1).index()] = 10.0;
        values[vars.blend(0, 1, 1).index()] = 2.0;
        values[vars.buy(0, 1).index()] = 10.0;
        values[vars.hold(1, 1).index()] = 5.0;
        values[vars.purchase_cost(1).index()] = 110.0;
        let solution = Solution::optimal(values, 110.0);

        let report = PlanReport::extract(&data, &vars, &solution).unwrap();

        assert_eq!(report.status, SolutionStatus::Optimal);
        assert_eq!(report.total_cost, 110.0);
        assert_eq!(report.periods.len(), 2);
        assert_eq!(report.produced(1, "91R"), Some(12.0));
        assert_eq!(report.produced(0, "91R"), Some(0.0));
        assert_eq!(report.blended(1, "91R", "Alk"), Some(10.0));
        assert_eq!(report.blended(1, "91R", "LSR"), Some(2.0));
        assert_eq!(report.blended(1, "95R", "LSR"), None);
        assert_eq!(report.produced(2, "91R"), None);

        let period = report.period(1).unwrap();
        assert_eq!(period.purchase_cost, 110.0);
        let alk = period.blendstock("Alk").unwrap();
        assert_eq!(alk.bought, 10.0);
        assert_eq!(alk.cost, 110.0);
        assert_eq!(period.blendstock("LSR").unwrap().held, 5.0);
        assert_eq!(report.purchase_total(), 110.0);
    }

    #[test]
    fn test_round_off_below_zero_is_reported_as_zero() {
        let data = two_period_tables().build().unwrap();
        let mut lp = LpProblem::new();
        let vars = VariableStore::allocate(&mut lp, &data);

        let mut values = vec![0.0; lp.num_variables()];
        values[vars.hold(0, 1).index()] = -0.0;
        values[vars.blend(0, 1, 0).index()] = -1e-13;
        values[vars.buy(1, 0).index()] = -2e-12;
        let report = PlanReport::extract(&data, &vars, &Solution::optimal(values, 0.0)).unwrap();

        let held = report.period(1).unwrap().blendstock("Alk").unwrap().held;
        assert_eq!(held, 0.0);
        assert!(held.is_sign_positive());
        assert_eq!(report.blended(0, "91R", "LSR"), Some(0.0));

        let lsr = report.period(0).unwrap().blendstock("LSR").unwrap();
        assert_eq!(lsr.bought, 0.0);
        assert!(lsr.cost.is_sign_positive());
        assert_eq!(format!("{:.2}", held), "0.00");
    }
}
