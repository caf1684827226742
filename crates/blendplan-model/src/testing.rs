use blendplan_solver::{Engine, LpProblem, Solution, SolutionStatus};

use crate::data::TankageLimits;
use crate::tables::{InventoryRow, PlanTables, TableRow};

/// Two blendstocks, one product, two specs, two periods
pub(crate) fn two_period_tables() -> PlanTables {
    PlanTables {
        specs: vec!["RON".to_string(), "MON".to_string()],
        quality: vec![TableRow::new("Alk", [95.0, 87.0]), TableRow::new("LSR", [75.0, 65.0])],
        cost: vec![TableRow::new("Alk", [10.0, 11.0]), TableRow::new("LSR", [7.0, 7.0])],
        quality_min: vec![TableRow::new("91R", [91.0, 81.0])],
        quality_max: vec![TableRow::new("91R", [99.0, 99.0])],
        opening_inventory: vec![InventoryRow {
            name: "LSR".to_string(),
            quantity: 5.0,
        }],
        demand: 10.0,
        tankage: TankageLimits { min: 0.0, max: 100.0 },
    }
}

/// One blendstock whose single quality equals the product's band exactly
pub(crate) fn exact_spec_tables() -> PlanTables {
    PlanTables {
        specs: vec!["RON".to_string()],
        quality: vec![TableRow::new("Alk", [95.0])],
        cost: vec![TableRow::new("Alk", [10.0])],
        quality_min: vec![TableRow::new("95R", [95.0])],
        quality_max: vec![TableRow::new("95R", [95.0])],
        opening_inventory: vec![InventoryRow {
            name: "Alk".to_string(),
            quantity: 0.0,
        }],
        demand: 100.0,
        tankage: TankageLimits { min: 0.0, max: 1000.0 },
    }
}

/// Engine stand-in that reports a fixed status without solving
pub(crate) struct FakeEngine {
    pub status: SolutionStatus,
}

impl Engine for FakeEngine {
    fn solve(&self, problem: &LpProblem) -> Solution {
        match self.status {
            SolutionStatus::Optimal => Solution::optimal(vec![0.0; problem.num_variables()], 0.0),
            SolutionStatus::Infeasible => Solution::infeasible(),
            SolutionStatus::Unbounded => Solution::unbounded(),
            SolutionStatus::Error => Solution::error("numerical failure"),
        }
    }
}
