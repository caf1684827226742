use blendplan_solver::{ConstraintViolation, Engine, Solution, SolutionStatus, Solver};
use tracing::{info, warn};

use crate::data::ProblemData;
use crate::error::PlanError;
use crate::model::BlendModel;
use crate::report::PlanReport;
use crate::tables::PlanTables;

/// Runs one optimization: build the model, hand it to the engine, read back the plan
pub struct Planner<E = Solver> {
    engine: E,
    /// Tolerance for the post-solve constraint check
    tolerance: f64,
}

/// A model together with the engine's answer for it
#[derive(Debug, Clone)]
pub struct SolvedModel {
    pub model: BlendModel,
    pub solution: Solution,
    /// Constraints an optimal solution breaks beyond the planner's tolerance
    pub violations: Vec<ConstraintViolation>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::with_engine(Solver::new())
    }
}

impl<E: Engine> Planner<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            tolerance: 1e-6,
        }
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Build and solve without interpreting the status
    pub fn solve(&self, data: &ProblemData) -> SolvedModel {
        let model = BlendModel::build(data);
        let solution = self.engine.solve(&model.lp);
        info!(status = %solution.status, objective = solution.objective_value, "solve finished");

        let violations = if solution.is_optimal() {
            model.violations(&solution, self.tolerance)
        } else {
            Vec::new()
        };
        for v in &violations {
            warn!(constraint = %v.constraint, amount = v.violation_amount, "{}", v.description);
        }

        SolvedModel {
            model,
            solution,
            violations,
        }
    }

    pub fn plan(&self, data: &ProblemData) -> Result<PlanReport, PlanError> {
        let SolvedModel { model, solution, .. } = self.solve(data);

        match solution.status {
            SolutionStatus::Optimal => PlanReport::extract(data, &model.vars, &solution)
                .ok_or_else(|| PlanError::Solver("optimal solution without values".to_string())),
            SolutionStatus::Infeasible => Err(PlanError::Infeasible),
            SolutionStatus::Unbounded => Err(PlanError::Unbounded),
            SolutionStatus::Error => Err(PlanError::Solver(
                solution.message.unwrap_or_else(|| "unknown engine failure".to_string()),
            )),
        }
    }

    /// Validate raw tables, then plan
    pub fn plan_tables(&self, tables: &PlanTables) -> Result<PlanReport, PlanError> {
        let data = tables.build()?;
        self.plan(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TankageLimits;
    use crate::testing::{FakeEngine, exact_spec_tables, two_period_tables};

    const TOL: f64 = 1e-6;

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < TOL * expected.abs().max(1.0),
            "{} = {} (expected {})",
            what,
            actual,
            expected
        );
    }

    /// Check conservation, demand, quality banding, holding bounds, and
    /// objective consistency on a solved model
    fn assert_plan_properties(data: &ProblemData, solved: &SolvedModel) {
        let SolvedModel { model, solution, .. } = solved;
        let vars = &model.vars;
        let v = |id| solution.value(id);
        let tol = |x: f64| 1e-6 * x.abs().max(1.0);
        let products = data.products().len();
        let blendstocks = data.blendstocks();

        for i in data.periods() {
            for j in 0..blendstocks.len() {
                let consumed: f64 = (0..products).map(|k| v(vars.blend(k, j, i))).sum();
                let available = v(vars.hold(j, i)) + v(vars.buy(j, i));
                if i < data.last_period() {
                    let next = v(vars.hold(j, i + 1));
                    assert!(
                        (available - consumed - next).abs() < tol(available.max(consumed)),
                        "conservation [{}][{}]",
                        j,
                        i
                    );
                } else {
                    assert!(available - consumed > -tol(available), "closing stock [{}][{}]", j, i);
                }
            }

            let held: f64 = (0..blendstocks.len()).map(|j| v(vars.hold(j, i))).sum();
            assert!(held >= data.tankage().min - tol(held), "tankage_min[{}]", i);
            assert!(held <= data.tankage().max + tol(held), "tankage_max[{}]", i);

            for (k, p) in data.products().iter().enumerate() {
                let produced = v(vars.produced(k, i));
                assert!(produced >= data.demand() - tol(produced), "demand[{}][{}]", k, i);

                for l in 0..data.specs().len() {
                    let quality: f64 = blendstocks
                        .iter()
                        .enumerate()
                        .map(|(j, b)| v(vars.blend(k, j, i)) * b.quality[l])
                        .sum();
                    assert!(quality >= p.quality_min[l] * produced - tol(quality), "quality_min");
                    assert!(quality <= p.quality_max[l] * produced + tol(quality), "quality_max");
                }
            }
        }

        let spend: f64 = data
            .periods()
            .flat_map(|i| blendstocks.iter().enumerate().map(move |(j, b)| (i, j, b)))
            .map(|(i, j, b)| v(vars.buy(j, i)) * b.cost[i])
            .sum();
        assert!((spend - solution.objective_value).abs() < tol(spend), "objective consistency");
    }

    #[test]
    fn test_single_blendstock_exactly_on_spec() {
        let data = exact_spec_tables().build().unwrap();
        let planner = Planner::new();

        let solved = planner.solve(&data);
        assert_eq!(solved.solution.status, SolutionStatus::Optimal);
        assert_close(solved.solution.value(solved.model.vars.buy(0, 0)), 100.0, "buy");
        assert_plan_properties(&data, &solved);
        assert!(solved.violations.is_empty());

        let report = planner.plan(&data).unwrap();
        assert_eq!(report.status, SolutionStatus::Optimal);
        assert_close(report.total_cost, 1000.0, "objective");
        assert_close(report.produced(0, "95R").unwrap(), 100.0, "produced");
        assert_close(report.blended(0, "95R", "Alk").unwrap(), 100.0, "blend");
    }

    #[test]
    fn test_unreachable_quality_is_infeasible() {
        let mut tables = exact_spec_tables();
        tables.quality_min[0].values = vec![96.0];
        tables.quality_max[0].values = vec![99.0];

        let err = Planner::new().plan_tables(&tables).unwrap_err();
        assert!(matches!(err, PlanError::Infeasible));
        assert_eq!(err.status(), Some(SolutionStatus::Infeasible));
    }

    #[test]
    fn test_inverted_quality_band_is_infeasible() {
        let mut tables = two_period_tables();
        tables.quality_min[0].values = vec![95.0, 81.0];
        tables.quality_max[0].values = vec![91.0, 99.0];

        assert!(matches!(Planner::new().plan_tables(&tables), Err(PlanError::Infeasible)));
    }

    #[test]
    fn test_opening_inventory_above_tankage_is_infeasible() {
        // opening stock is 1 (Alk, default) + 5 (LSR) = 6
        let mut tables = two_period_tables();
        tables.tankage = TankageLimits { min: 0.0, max: 3.0 };

        assert!(matches!(Planner::new().plan_tables(&tables), Err(PlanError::Infeasible)));
    }

    #[test]
    fn test_two_period_plan_properties() {
        let data = two_period_tables().build().unwrap();
        let solved = Planner::new().solve(&data);

        assert_eq!(solved.solution.status, SolutionStatus::Optimal);
        assert_plan_properties(&data, &solved);
    }

    #[test]
    fn test_refinery_dataset() {
        let tables = PlanTables::from_json(include_str!("../../../data/refinery.json")).unwrap();
        let data = tables.build().unwrap();
        assert_eq!(data.num_periods(), 4);

        let solved = Planner::new().solve(&data);
        assert_eq!(solved.solution.status, SolutionStatus::Optimal);
        assert_plan_properties(&data, &solved);
        assert!(
            solved.violations.is_empty(),
            "round-off reported as violations: {:?}",
            solved.violations.iter().map(|v| &v.constraint).collect::<Vec<_>>()
        );
        assert!(solved.model.violations(&solved.solution, 1e-6).is_empty());

        let report = Planner::new().plan(&data).unwrap();
        assert_eq!(report.periods.len(), 4);
        assert!((report.purchase_total() - report.total_cost).abs() < 1e-6 * report.total_cost);
        for period in &report.periods {
            for product in &period.products {
                let blended: f64 = product.blend.iter().map(|b| b.quantity).sum();
                assert!((blended - product.produced).abs() < 1e-6 * product.produced.max(1.0));
            }
        }
    }

    #[test]
    fn test_tolerance_controls_reported_violations() {
        // all-zero values leave every demand row short by 10
        let data = two_period_tables().build().unwrap();
        let engine = || FakeEngine {
            status: SolutionStatus::Optimal,
        };

        let strict = Planner::with_engine(engine()).solve(&data);
        assert!(strict.violations.iter().any(|v| v.constraint == "demand[91R][0]"));

        let loose = Planner::with_engine(engine()).with_tolerance(10.0).solve(&data);
        assert!(loose.violations.is_empty());

        let infeasible = Planner::with_engine(FakeEngine {
            status: SolutionStatus::Infeasible,
        })
        .solve(&data);
        assert!(infeasible.violations.is_empty());
    }

    #[test]
    fn test_invalid_input_fails_before_solving() {
        let mut tables = two_period_tables();
        tables.cost[0].values.push(12.0);

        let planner = Planner::with_engine(FakeEngine {
            status: SolutionStatus::Optimal,
        });
        let err = planner.plan_tables(&tables).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_engine_statuses_are_surfaced() {
        let data = two_period_tables().build().unwrap();
        let plan = |status| Planner::with_engine(FakeEngine { status }).plan(&data);

        assert!(matches!(plan(SolutionStatus::Infeasible), Err(PlanError::Infeasible)));
        assert!(matches!(plan(SolutionStatus::Unbounded), Err(PlanError::Unbounded)));
        match plan(SolutionStatus::Error) {
            Err(PlanError::Solver(msg)) => assert_eq!(msg, "numerical failure"),
            other => panic!("expected solver error, got {:?}", other),
        }

        let report = plan(SolutionStatus::Optimal).unwrap();
        assert_eq!(report.total_cost, 0.0);
        assert_eq!(report.periods.len(), 2);
    }
}
